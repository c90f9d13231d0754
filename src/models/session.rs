// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation session state.
//!
//! A session starts when an image is loaded and is replaced wholesale when
//! the next one is. It owns the image, its initial fit, the viewport, the
//! strokes and the pointer controller, so loading a new image resets all
//! of them at once.

use super::stroke::StrokeStore;
use crate::api::client::UploadRequest;
use crate::config::DisplayConfig;
use crate::io::media::LoadedImage;
use crate::io::serialization::strokes_to_json;
use crate::ui::interaction::{PointerEvent, PointerInteractionController};
use crate::util::geometry::{self, InitialFit, ViewportState, WheelDirection};
use anyhow::Result;
use std::sync::Arc;

/// The image being annotated. Pixels are handed to the renderer separately.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

pub struct Session {
    pub image: SourceImage,
    pub fit: InitialFit,
    pub viewport: ViewportState,
    pub strokes: StrokeStore,
    pub controller: PointerInteractionController,
}

impl Session {
    pub fn new(image: &LoadedImage, display: &DisplayConfig) -> Self {
        let fit = InitialFit::compute(image.width, image.height, display.width, display.height);
        log::info!(
            "New session for {} ({}x{}), fit scale {:.4} (inverse {:.4})",
            image.file_name,
            image.width,
            image.height,
            fit.scale,
            fit.inverse_scale
        );

        Self {
            image: SourceImage {
                file_name: image.file_name.clone(),
                mime_type: image.mime_type.clone(),
                bytes: Arc::clone(&image.bytes),
                width: image.width,
                height: image.height,
            },
            fit,
            viewport: fit.initial_viewport(),
            strokes: StrokeStore::new(),
            controller: PointerInteractionController::new(fit.box_center()),
        }
    }

    /// Feed one pointer event through the controller. Returns true if
    /// the strokes or the viewport changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.controller
            .handle(event, &mut self.viewport, &mut self.strokes)
    }

    /// Zoom one step about the display box centre, as the wheel does.
    pub fn zoom_step(&mut self, direction: WheelDirection) {
        self.viewport =
            geometry::zoom_at_center(&self.viewport, direction.zoom_factor(), self.fit.box_center());
    }

    pub fn reset_view(&mut self) {
        self.viewport = self.fit.initial_viewport();
    }

    /// Build the upload for the current strokes, scaled to native pixels.
    pub fn upload_request(&self) -> Result<UploadRequest> {
        let native = self.strokes.to_image_space_scaled(self.fit.inverse_scale);
        Ok(UploadRequest {
            file_name: self.image.file_name.clone(),
            mime_type: self.image.mime_type.clone(),
            image_bytes: Arc::clone(&self.image.bytes),
            strokes_json: strokes_to_json(&native)?,
        })
    }
}
