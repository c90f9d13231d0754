// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformations between screen
//! space (the zoomed/panned canvas) and image space (the working
//! resolution the strokes are recorded in), plus the one-time fit that
//! maps the working resolution back to the image's native pixels.

use crate::models::stroke::Point;

/// Zoom factor applied for one wheel notch towards the user (zoom in).
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Zoom factor applied for one wheel notch away from the user (zoom out).
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// A position in screen space, relative to the canvas' top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Affine map from image space to screen space: `screen = image * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Always strictly positive.
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Direction of a wheel notch, using the DOM convention (negative delta = up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

impl WheelDirection {
    pub fn from_delta(delta_y: f64) -> Self {
        if delta_y < 0.0 {
            WheelDirection::Up
        } else {
            WheelDirection::Down
        }
    }

    pub fn zoom_factor(self) -> f64 {
        match self {
            WheelDirection::Up => ZOOM_IN_FACTOR,
            WheelDirection::Down => ZOOM_OUT_FACTOR,
        }
    }
}

/// Convert a screen position to image space.
pub fn to_image_space(screen: ScreenPos, viewport: &ViewportState) -> Point {
    Point::new(
        (screen.x - viewport.offset_x) / viewport.zoom,
        (screen.y - viewport.offset_y) / viewport.zoom,
    )
}

/// Convert an image-space point to a screen position.
pub fn to_screen_space(image: Point, viewport: &ViewportState) -> ScreenPos {
    ScreenPos {
        x: image.x * viewport.zoom + viewport.offset_x,
        y: image.y * viewport.zoom + viewport.offset_y,
    }
}

/// Scale the viewport by `factor`, keeping the image point under `center` fixed.
///
/// Non-positive or non-finite factors leave the viewport untouched so the
/// zoom can never reach zero.
pub fn zoom_at_center(viewport: &ViewportState, factor: f64, center: ScreenPos) -> ViewportState {
    if !(factor.is_finite() && factor > 0.0) {
        log::warn!("Ignoring invalid zoom factor {}", factor);
        return *viewport;
    }

    ViewportState {
        offset_x: center.x - (center.x - viewport.offset_x) * factor,
        offset_y: center.y - (center.y - viewport.offset_y) * factor,
        zoom: viewport.zoom * factor,
    }
}

/// Translate the viewport by a screen-space delta.
pub fn pan(viewport: &ViewportState, dx: f64, dy: f64) -> ViewportState {
    ViewportState {
        offset_x: viewport.offset_x + dx,
        offset_y: viewport.offset_y + dy,
        zoom: viewport.zoom,
    }
}

/// Scale that fits an image into the fixed display box, computed once per image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialFit {
    /// Native pixels -> displayed pixels.
    pub scale: f64,
    /// Displayed pixels -> native pixels.
    pub inverse_scale: f64,
    /// Size of the image once fitted, in displayed pixels.
    pub display_width: f64,
    pub display_height: f64,
    /// Size of the display box the image was fitted into.
    pub box_width: f64,
    pub box_height: f64,
}

impl InitialFit {
    /// Fit an image of `width`x`height` native pixels into a `box_width`x`box_height` box.
    ///
    /// Callers guarantee all four dimensions are non-zero.
    pub fn compute(width: u32, height: u32, box_width: u32, box_height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        let (bw, bh) = (box_width as f64, box_height as f64);
        let scale = (bw / w).min(bh / h);

        Self {
            scale,
            inverse_scale: 1.0 / scale,
            display_width: w * scale,
            display_height: h * scale,
            box_width: bw,
            box_height: bh,
        }
    }

    /// Viewport that shows the fitted image centred in the box at zoom 1.
    pub fn initial_viewport(&self) -> ViewportState {
        ViewportState {
            offset_x: (self.box_width - self.display_width) / 2.0,
            offset_y: (self.box_height - self.display_height) / 2.0,
            zoom: 1.0,
        }
    }

    /// Fixed anchor for wheel zoom: the centre of the display box.
    pub fn box_center(&self) -> ScreenPos {
        ScreenPos::new(self.box_width / 2.0, self.box_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn viewports() -> Vec<ViewportState> {
        vec![
            ViewportState::default(),
            ViewportState { offset_x: 0.0, offset_y: 100.0, zoom: 1.0 },
            ViewportState { offset_x: -250.5, offset_y: 33.3, zoom: 2.357 },
            ViewportState { offset_x: 12.0, offset_y: -7.5, zoom: 0.125 },
        ]
    }

    #[test]
    fn test_screen_image_roundtrip() {
        let points = [
            ScreenPos::new(0.0, 0.0),
            ScreenPos::new(400.0, 300.0),
            ScreenPos::new(-12.5, 999.75),
        ];

        for viewport in viewports() {
            for p in points {
                let back = to_screen_space(to_image_space(p, &viewport), &viewport);
                assert!((back.x - p.x).abs() < EPS);
                assert!((back.y - p.y).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_zoom_keeps_center_fixed() {
        let center = ScreenPos::new(400.0, 300.0);

        for viewport in viewports() {
            for factor in [ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR, 3.0, 0.01] {
                let anchored = to_image_space(center, &viewport);
                let zoomed = zoom_at_center(&viewport, factor, center);
                let after = to_screen_space(anchored, &zoomed);

                assert!((after.x - center.x).abs() < 1e-6);
                assert!((after.y - center.y).abs() < 1e-6);
                assert!((zoomed.zoom - viewport.zoom * factor).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_zoom_rejects_invalid_factor() {
        let viewport = ViewportState { offset_x: 5.0, offset_y: 6.0, zoom: 2.0 };
        let center = ScreenPos::new(1.0, 1.0);

        assert_eq!(zoom_at_center(&viewport, 0.0, center), viewport);
        assert_eq!(zoom_at_center(&viewport, -1.1, center), viewport);
        assert_eq!(zoom_at_center(&viewport, f64::NAN, center), viewport);
    }

    #[test]
    fn test_pan_moves_offset_only() {
        let viewport = ViewportState { offset_x: 10.0, offset_y: 20.0, zoom: 1.5 };
        let panned = pan(&viewport, -3.0, 4.5);

        assert_eq!(panned.offset_x, 7.0);
        assert_eq!(panned.offset_y, 24.5);
        assert_eq!(panned.zoom, 1.5);
    }

    #[test]
    fn test_wheel_direction_factor() {
        assert_eq!(WheelDirection::from_delta(-120.0).zoom_factor(), ZOOM_IN_FACTOR);
        assert_eq!(WheelDirection::from_delta(120.0).zoom_factor(), ZOOM_OUT_FACTOR);
    }

    #[test]
    fn test_initial_fit_landscape_image() {
        let fit = InitialFit::compute(1000, 500, 800, 600);

        assert!((fit.scale - 0.8).abs() < EPS);
        assert!((fit.inverse_scale - 1.25).abs() < EPS);
        assert!((fit.display_width - 800.0).abs() < EPS);
        assert!((fit.display_height - 400.0).abs() < EPS);

        let viewport = fit.initial_viewport();
        assert_eq!(viewport, ViewportState { offset_x: 0.0, offset_y: 100.0, zoom: 1.0 });

        let working = to_image_space(ScreenPos::new(100.0, 100.0), &viewport);
        assert!((working.x - 100.0).abs() < EPS);
        assert!(working.y.abs() < EPS);

        let native = working.scaled(fit.inverse_scale);
        assert!((native.x - 125.0).abs() < EPS);
        assert!(native.y.abs() < EPS);
    }

    #[test]
    fn test_initial_fit_portrait_image() {
        let fit = InitialFit::compute(300, 1200, 800, 600);

        assert!((fit.scale - 0.5).abs() < EPS);
        assert!((fit.display_width - 150.0).abs() < EPS);
        assert!((fit.display_height - 600.0).abs() < EPS);
        assert_eq!(fit.initial_viewport().offset_x, 325.0);
        assert_eq!(fit.box_center(), ScreenPos::new(400.0, 300.0));
    }
}
