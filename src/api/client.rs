// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! HTTP client for the image-processing backend.
//!
//! The backend exposes three endpoints:
//!
//! - `POST /image-processing`: multipart `image` (binary) + `strokes` (JSON)
//! - `GET /processing-status`: `{"status": "..."}`, `"done"` when finished
//! - `GET /get-processed-images`: object of base64-encoded JPEG payloads
//!
//! Calls are blocking; the submission worker runs them off the UI thread.

use super::error::ApiError;
use base64::{engine::general_purpose, Engine as _};
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServiceConfig;

pub const UPLOAD_PATH: &str = "/image-processing";
pub const STATUS_PATH: &str = "/processing-status";
pub const RESULTS_PATH: &str = "/get-processed-images";

/// Status value that ends the poll loop.
pub const DONE_STATUS: &str = "done";

/// Everything needed for one upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub mime_type: String,
    pub image_bytes: Arc<[u8]>,
    /// Strokes in native image pixels, already JSON-encoded.
    pub strokes_json: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessingStatus {
    pub status: String,
}

impl ProcessingStatus {
    pub fn is_done(&self) -> bool {
        self.status == DONE_STATUS
    }
}

/// One base64 image payload returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArtifact {
    /// Field name in the response, e.g. `sam_image`.
    pub name: String,
    pub payload: String,
}

impl ResultArtifact {
    /// Payload as a `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.payload)
    }

    /// Raw encoded image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ApiError> {
        general_purpose::STANDARD
            .decode(self.payload.trim())
            .map_err(|e| ApiError::malformed(RESULTS_PATH, format!("{}: {}", self.name, e)))
    }
}

/// The artifacts of a finished run, sorted by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessedImages {
    pub artifacts: Vec<ResultArtifact>,
}

/// The remote side of a submission.
pub trait ProcessingService: Send + Sync {
    fn upload(&self, request: &UploadRequest) -> Result<(), ApiError>;
    fn processing_status(&self) -> Result<ProcessingStatus, ApiError>;
    fn processed_images(&self) -> Result<ProcessedImages, ApiError>;
}

pub struct HttpProcessingService {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpProcessingService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ApiError::transport("client", e))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_text(&self, path: &'static str) -> Result<String, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .map_err(|e| ApiError::transport(path, e))?;
        check_status(path, response.status())?;
        response.text().map_err(|e| ApiError::transport(path, e))
    }
}

impl ProcessingService for HttpProcessingService {
    fn upload(&self, request: &UploadRequest) -> Result<(), ApiError> {
        let image = Part::bytes(request.image_bytes.to_vec())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|e| ApiError::transport(UPLOAD_PATH, e))?;
        let form = Form::new()
            .part("image", image)
            .text("strokes", request.strokes_json.clone());

        let response = self
            .http
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .map_err(|e| ApiError::transport(UPLOAD_PATH, e))?;
        check_status(UPLOAD_PATH, response.status())
    }

    fn processing_status(&self) -> Result<ProcessingStatus, ApiError> {
        let body = self.get_text(STATUS_PATH)?;
        parse_status(&body)
    }

    fn processed_images(&self) -> Result<ProcessedImages, ApiError> {
        let body = self.get_text(RESULTS_PATH)?;
        parse_processed_images(&body)
    }
}

fn check_status(endpoint: &'static str, status: reqwest::StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
        })
    }
}

pub fn parse_status(body: &str) -> Result<ProcessingStatus, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::malformed(STATUS_PATH, e))
}

/// Collect every string field of the response object as an artifact.
pub fn parse_processed_images(body: &str) -> Result<ProcessedImages, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::malformed(RESULTS_PATH, e))?;
    let serde_json::Value::Object(fields) = value else {
        return Err(ApiError::malformed(RESULTS_PATH, "expected a JSON object"));
    };

    let mut artifacts: Vec<ResultArtifact> = fields
        .into_iter()
        .filter_map(|(name, value)| match value {
            serde_json::Value::String(payload) => Some(ResultArtifact { name, payload }),
            other => {
                log::warn!("Skipping non-image field '{}' in results: {}", name, other);
                None
            }
        })
        .collect();
    artifacts.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ProcessedImages { artifacts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_done() {
        let status = parse_status(r#"{"status": "done"}"#).unwrap();
        assert!(status.is_done());
    }

    #[test]
    fn test_parse_status_other_values() {
        for raw in ["processing", "idle", "error", "DONE"] {
            let body = serde_json::json!({ "status": raw }).to_string();
            assert!(!parse_status(&body).unwrap().is_done());
        }
    }

    #[test]
    fn test_parse_status_missing_field() {
        let err = parse_status(r#"{"state": "done"}"#).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { endpoint: STATUS_PATH, .. }));
    }

    #[test]
    fn test_parse_processed_images() {
        let body = serde_json::json!({
            "trend_image": "dHJlbmQ=",
            "sam_image": "c2Ft",
            "count": 3
        })
        .to_string();

        let images = parse_processed_images(&body).unwrap();
        let names: Vec<&str> = images.artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["sam_image", "trend_image"]);
        assert_eq!(images.artifacts[0].decode().unwrap(), b"sam");
        assert_eq!(images.artifacts[0].data_uri(), "data:image/jpeg;base64,c2Ft");
    }

    #[test]
    fn test_parse_processed_images_rejects_non_object() {
        assert!(parse_processed_images("[]").is_err());
        assert!(parse_processed_images("not json").is_err());
    }

    #[test]
    fn test_bad_base64_is_malformed() {
        let artifact = ResultArtifact {
            name: "sam_image".to_string(),
            payload: "%%%".to_string(),
        };
        assert!(matches!(artifact.decode(), Err(ApiError::MalformedResponse { .. })));
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let config = ServiceConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..ServiceConfig::default()
        };
        let service = HttpProcessingService::new(&config).unwrap();
        assert_eq!(service.url(STATUS_PATH), "http://localhost:5000/processing-status");
    }
}
