// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module reads an image file, decodes it to RGBA pixels for display,
//! and keeps the original encoded bytes so they can be uploaded unchanged.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// A decoded image together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub file_name: String,
    pub mime_type: String,
    /// Encoded file contents, uploaded as-is.
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage, MediaError> {
    let bytes = std::fs::read(path).map_err(|source| MediaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    decode_image(file_name, bytes)
}

/// Decode in-memory image bytes. The MIME type is guessed from `file_name`,
/// falling back to the sniffed content format.
pub fn decode_image(file_name: String, bytes: Vec<u8>) -> Result<LoadedImage, MediaError> {
    let decoded = image::load_from_memory(&bytes)?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(MediaError::EmptyImage { width, height });
    }

    let mime_type = image::ImageFormat::from_path(&file_name)
        .ok()
        .or_else(|| image::guess_format(&bytes).ok())
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string());

    Ok(LoadedImage {
        file_name,
        mime_type,
        bytes: bytes.into(),
        width,
        height,
        pixels: decoded.to_rgba8().into_raw(),
    })
}
