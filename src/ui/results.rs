// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Processed result gallery.
//!
//! Shows each image returned by the backend under its field name.

use crate::api::client::{ProcessedImages, ResultArtifact};

/// Width of one result thumbnail in points.
const THUMBNAIL_WIDTH: f32 = 400.0;

struct ResultItem {
    artifact: ResultArtifact,
    texture: egui::TextureHandle,
}

pub struct ResultGallery {
    items: Vec<ResultItem>,
}

impl ResultGallery {
    /// Decode every artifact into a texture. Undecodable artifacts are skipped.
    pub fn from_images(ctx: &egui::Context, images: &ProcessedImages) -> Self {
        let items = images
            .artifacts
            .iter()
            .filter_map(|artifact| match decode_artifact(artifact) {
                Ok(color_image) => {
                    let texture = ctx.load_texture(
                        format!("result_{}", artifact.name),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    Some(ResultItem {
                        artifact: artifact.clone(),
                        texture,
                    })
                }
                Err(e) => {
                    log::error!("Failed to decode result '{}': {}", artifact.name, e);
                    None
                }
            })
            .collect();

        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn decode_artifact(artifact: &ResultArtifact) -> anyhow::Result<egui::ColorImage> {
    let bytes = artifact.decode()?;
    let decoded = image::load_from_memory(&bytes)?.to_rgba8();
    let size = [decoded.width() as usize, decoded.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw()))
}

/// Display the gallery in a horizontal strip.
pub fn show(ui: &mut egui::Ui, gallery: &ResultGallery) {
    if gallery.is_empty() {
        ui.label(egui::RichText::new("No decodable result images").weak());
        return;
    }

    egui::ScrollArea::horizontal().show(ui, |ui| {
        ui.horizontal_top(|ui| {
            for item in &gallery.items {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(&item.artifact.name).strong());
                        if ui.small_button("Copy data URI").clicked() {
                            ui.output_mut(|o| o.copied_text = item.artifact.data_uri());
                        }
                    });
                    let size = item.texture.size_vec2();
                    let scale = THUMBNAIL_WIDTH / size.x.max(1.0);
                    ui.image((item.texture.id(), size * scale));
                });
            }
        });
    });
}
