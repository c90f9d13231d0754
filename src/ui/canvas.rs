// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and annotation.
//!
//! This module provides the interactive canvas, where users draw strokes
//! and pan/zoom the image, and the read-only overview beside it.

use super::interaction::{Gesture, PointerButton, PointerEvent};
use super::renderer::{self, ImageHandle, StrokeStyle};
use crate::models::session::Session;
use crate::util::geometry::{ScreenPos, WheelDirection};

/// Display the interactive canvas and feed it this frame's pointer input.
///
/// Returns true if the strokes or the viewport changed.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut Session,
    image: &ImageHandle,
    style: &StrokeStyle,
) -> bool {
    let size = egui::vec2(session.fit.box_width as f32, session.fit.box_height as f32);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
    let rect = response.rect;
    let hovered = response.hovered();

    let events = ui.input(|i| i.events.clone());
    let mut changed = false;
    for event in &events {
        if let Some(pointer_event) = translate(event, rect, hovered) {
            changed |= session.handle_pointer(pointer_event);
        }
    }

    match session.controller.gesture() {
        Gesture::Panning { .. } => ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing),
        Gesture::Drawing => ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair),
        Gesture::Idle if hovered => ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair),
        Gesture::Idle => {}
    }

    painter.extend(renderer::render_frame(
        rect,
        image,
        &session.viewport,
        session.strokes.strokes(),
        style,
    ));

    if !session.controller.suppresses_context_menu() {
        response.context_menu(|ui| {
            if ui.button("Zoom In").clicked() {
                session.zoom_step(WheelDirection::Up);
                ui.close_menu();
            }
            if ui.button("Zoom Out").clicked() {
                session.zoom_step(WheelDirection::Down);
                ui.close_menu();
            }
            if ui.button("Reset View").clicked() {
                session.reset_view();
                ui.close_menu();
            }
        });
    }

    changed
}

/// Display the overview of the whole image with the current strokes.
pub fn show_overview(ui: &mut egui::Ui, session: &Session, image: &ImageHandle, style: &StrokeStyle) {
    let (response, painter) =
        ui.allocate_painter(renderer::overview_size(image), egui::Sense::hover());
    painter.extend(renderer::render_overview(
        response.rect,
        image,
        session.strokes.strokes(),
        style,
    ));
}

/// Convert an egui input event to a canvas-relative pointer event.
///
/// Presses and wheel only count while the canvas is the hovered widget, so
/// input aimed at a popup or menu drawn over it is left alone. Moves and
/// releases are always forwarded so a gesture can leave the canvas.
fn translate(event: &egui::Event, rect: egui::Rect, hovered: bool) -> Option<PointerEvent> {
    let local = |pos: egui::Pos2| {
        let rel = pos - rect.min;
        ScreenPos::new(rel.x as f64, rel.y as f64)
    };

    match event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed,
            ..
        } => {
            let button = match button {
                egui::PointerButton::Primary => PointerButton::Primary,
                egui::PointerButton::Secondary => PointerButton::Secondary,
                egui::PointerButton::Middle => PointerButton::Middle,
                _ => return None,
            };
            if *pressed {
                (hovered && rect.contains(*pos)).then(|| PointerEvent::Down {
                    button,
                    pos: local(*pos),
                })
            } else {
                Some(PointerEvent::Up {
                    button,
                    pos: local(*pos),
                })
            }
        }
        egui::Event::PointerMoved(pos) => Some(PointerEvent::Move { pos: local(*pos) }),
        egui::Event::PointerGone => Some(PointerEvent::Gone),
        // egui's positive y scrolls up; the controller expects DOM deltas
        egui::Event::MouseWheel { delta, .. } if hovered && delta.y != 0.0 => {
            Some(PointerEvent::Wheel {
                delta_y: -delta.y as f64,
            })
        }
        _ => None,
    }
}
