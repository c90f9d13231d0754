// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for backend communication.

use thiserror::Error;

/// A single request to the processing backend failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent or its body could not be read
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },

    /// The backend answered with a non-success status
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// The body did not have the expected shape
    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse {
        endpoint: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn transport(endpoint: &'static str, err: impl std::fmt::Display) -> Self {
        ApiError::Transport {
            endpoint,
            message: err.to_string(),
        }
    }

    pub fn malformed(endpoint: &'static str, err: impl std::fmt::Display) -> Self {
        ApiError::MalformedResponse {
            endpoint,
            message: err.to_string(),
        }
    }
}

/// Why a submission ended in the failed state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    #[error("upload failed: {0}")]
    Upload(ApiError),

    #[error("processing did not finish after {attempts} status checks")]
    TimedOut { attempts: u32 },

    #[error("submission worker stopped unexpectedly")]
    WorkerLost,
}
