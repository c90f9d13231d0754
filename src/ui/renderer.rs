// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame rendering for the annotation canvas and the overview.
//!
//! Rendering is a pure function of the image, a viewport and the strokes:
//! it returns the shapes for one frame and the canvas widget paints them.

use crate::config::DisplayConfig;
use crate::models::stroke::Stroke;
use crate::util::geometry::{self, InitialFit, ViewportState};

/// Scale of the overview relative to the fitted image.
pub const OVERVIEW_SCALE: f64 = 0.5;

/// Stroke width of the overview, in screen pixels.
pub const OVERVIEW_STROKE_WIDTH: f32 = 1.0;

const BACKGROUND: egui::Color32 = egui::Color32::from_gray(40);

/// A drawable image and its size in working-resolution pixels.
#[derive(Debug, Clone, Copy)]
pub struct ImageHandle {
    pub texture: egui::TextureId,
    pub width: f64,
    pub height: f64,
}

impl ImageHandle {
    pub fn fitted(texture: egui::TextureId, fit: &InitialFit) -> Self {
        Self {
            texture,
            width: fit.display_width,
            height: fit.display_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: egui::Color32,
    /// Width at zoom 1.
    pub width: f32,
}

impl From<&DisplayConfig> for StrokeStyle {
    fn from(display: &DisplayConfig) -> Self {
        let [r, g, b] = display.stroke_color;
        Self {
            color: egui::Color32::from_rgb(r, g, b),
            width: display.stroke_width,
        }
    }
}

/// Shapes for the interactive canvas: background, zoomed image, then strokes
/// with their width scaled by zoom.
pub fn render_frame(
    target: egui::Rect,
    image: &ImageHandle,
    viewport: &ViewportState,
    strokes: &[Stroke],
    style: &StrokeStyle,
) -> Vec<egui::Shape> {
    let width = style.width * viewport.zoom as f32;
    draw(target, image, viewport, strokes, egui::Stroke::new(width, style.color))
}

/// Shapes for the overview: the whole image at a fixed half scale with thin
/// strokes, independent of the interactive zoom and pan.
pub fn render_overview(
    target: egui::Rect,
    image: &ImageHandle,
    strokes: &[Stroke],
    style: &StrokeStyle,
) -> Vec<egui::Shape> {
    let viewport = ViewportState {
        offset_x: 0.0,
        offset_y: 0.0,
        zoom: OVERVIEW_SCALE,
    };
    draw(
        target,
        image,
        &viewport,
        strokes,
        egui::Stroke::new(OVERVIEW_STROKE_WIDTH, style.color),
    )
}

/// Size of the overview canvas for a fitted image.
pub fn overview_size(image: &ImageHandle) -> egui::Vec2 {
    egui::vec2(
        (image.width * OVERVIEW_SCALE) as f32,
        (image.height * OVERVIEW_SCALE) as f32,
    )
}

fn draw(
    target: egui::Rect,
    image: &ImageHandle,
    viewport: &ViewportState,
    strokes: &[Stroke],
    stroke: egui::Stroke,
) -> Vec<egui::Shape> {
    let mut shapes = Vec::with_capacity(strokes.len() * 2 + 2);
    shapes.push(egui::Shape::rect_filled(target, 0.0, BACKGROUND));

    let image_rect = egui::Rect::from_min_size(
        target.min + egui::vec2(viewport.offset_x as f32, viewport.offset_y as f32),
        egui::vec2(
            (image.width * viewport.zoom) as f32,
            (image.height * viewport.zoom) as f32,
        ),
    );
    shapes.push(egui::Shape::image(
        image.texture,
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    ));

    for s in strokes {
        let points: Vec<egui::Pos2> = s
            .points()
            .iter()
            .map(|p| {
                let screen = geometry::to_screen_space(*p, viewport);
                target.min + egui::vec2(screen.x as f32, screen.y as f32)
            })
            .collect();

        let radius = stroke.width / 2.0;
        if let [only] = points.as_slice() {
            // A click without movement still leaves a visible dot
            shapes.push(egui::Shape::circle_filled(*only, radius, stroke.color));
        } else {
            // Polylines have butt ends and no joins; a disc on every vertex
            // rounds both.
            let joints: Vec<egui::Shape> = points
                .iter()
                .map(|p| egui::Shape::circle_filled(*p, radius, stroke.color))
                .collect();
            shapes.push(egui::Shape::line(points, stroke));
            shapes.extend(joints);
        }
    }

    shapes
}
