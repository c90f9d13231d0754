// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stroke serialization for the processing backend.
//!
//! Strokes travel as a JSON array of `{"points": [{"x": .., "y": ..}]}`
//! objects in native image pixel coordinates.

use crate::models::stroke::Stroke;
use anyhow::Result;

/// Encode strokes as the JSON text sent in the `strokes` form field.
pub fn strokes_to_json(strokes: &[Stroke]) -> Result<String> {
    let json = serde_json::to_string(strokes)?;
    Ok(json)
}
