// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Communication with the remote image-processing backend.

pub mod client;
pub mod error;
pub mod protocol;
