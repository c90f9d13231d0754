// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer gesture handling for the annotation canvas.
//!
//! Raw pointer and wheel events are classified into gestures: the primary
//! button draws, the secondary button pans, and the wheel zooms about the
//! fixed centre of the display box. Only one gesture runs at a time; a
//! second button pressed mid-gesture is ignored until the first is released.

use crate::models::stroke::StrokeStore;
use crate::util::geometry::{self, ScreenPos, ViewportState, WheelDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer input in canvas-relative screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, pos: ScreenPos },
    Move { pos: ScreenPos },
    Up { button: PointerButton, pos: ScreenPos },
    /// DOM sign convention: negative is wheel-up.
    Wheel { delta_y: f64 },
    /// The pointer left the window; a release may never arrive.
    Gone,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Drawing,
    /// Panning, with the pointer position of the previous event.
    Panning { last: ScreenPos },
}

#[derive(Debug, Clone)]
pub struct PointerInteractionController {
    gesture: Gesture,
    zoom_anchor: ScreenPos,
}

impl PointerInteractionController {
    pub fn new(zoom_anchor: ScreenPos) -> Self {
        Self {
            gesture: Gesture::Idle,
            zoom_anchor,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// The host must not open a context menu while the secondary button pans.
    pub fn suppresses_context_menu(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Apply one event. Returns true if the viewport or strokes changed.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        viewport: &mut ViewportState,
        strokes: &mut StrokeStore,
    ) -> bool {
        match (self.gesture, event) {
            (Gesture::Idle, PointerEvent::Down { button: PointerButton::Primary, pos }) => {
                strokes.begin_stroke(geometry::to_image_space(pos, viewport));
                self.gesture = Gesture::Drawing;
                log::debug!("Draw started at ({:.1}, {:.1})", pos.x, pos.y);
                true
            }
            (Gesture::Idle, PointerEvent::Down { button: PointerButton::Secondary, pos }) => {
                self.gesture = Gesture::Panning { last: pos };
                log::debug!("Pan started");
                false
            }
            (Gesture::Drawing, PointerEvent::Move { pos }) => {
                strokes.extend_active_stroke(geometry::to_image_space(pos, viewport));
                true
            }
            (Gesture::Panning { last }, PointerEvent::Move { pos }) => {
                *viewport = geometry::pan(viewport, pos.x - last.x, pos.y - last.y);
                self.gesture = Gesture::Panning { last: pos };
                true
            }
            (Gesture::Drawing, PointerEvent::Up { button: PointerButton::Primary, .. }) => {
                strokes.end_stroke();
                self.gesture = Gesture::Idle;
                log::debug!("Draw ended, {} strokes", strokes.len());
                false
            }
            (Gesture::Panning { .. }, PointerEvent::Up { button: PointerButton::Secondary, .. }) => {
                self.gesture = Gesture::Idle;
                log::debug!("Pan ended");
                false
            }
            (Gesture::Drawing, PointerEvent::Gone) => {
                strokes.end_stroke();
                self.gesture = Gesture::Idle;
                log::debug!("Pointer gone, draw ended");
                false
            }
            (Gesture::Panning { .. }, PointerEvent::Gone) => {
                self.gesture = Gesture::Idle;
                log::debug!("Pointer gone, pan ended");
                false
            }
            (_, PointerEvent::Wheel { delta_y }) => {
                let factor = WheelDirection::from_delta(delta_y).zoom_factor();
                *viewport = geometry::zoom_at_center(viewport, factor, self.zoom_anchor);
                log::debug!("Zoom now {:.3}", viewport.zoom);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stroke::Point;

    const EPS: f64 = 1e-9;

    struct Rig {
        controller: PointerInteractionController,
        viewport: ViewportState,
        strokes: StrokeStore,
    }

    impl Rig {
        fn new(viewport: ViewportState) -> Self {
            Self {
                controller: PointerInteractionController::new(ScreenPos::new(400.0, 300.0)),
                viewport,
                strokes: StrokeStore::new(),
            }
        }

        fn send(&mut self, event: PointerEvent) -> bool {
            self.controller.handle(event, &mut self.viewport, &mut self.strokes)
        }

        fn down(&mut self, button: PointerButton, x: f64, y: f64) -> bool {
            self.send(PointerEvent::Down { button, pos: ScreenPos::new(x, y) })
        }

        fn up(&mut self, button: PointerButton) -> bool {
            self.send(PointerEvent::Up { button, pos: ScreenPos::default() })
        }

        fn move_to(&mut self, x: f64, y: f64) -> bool {
            self.send(PointerEvent::Move { pos: ScreenPos::new(x, y) })
        }
    }

    #[test]
    fn test_draw_records_image_space_points() {
        let mut rig = Rig::new(ViewportState { offset_x: 10.0, offset_y: 20.0, zoom: 2.0 });

        rig.down(PointerButton::Primary, 30.0, 40.0);
        rig.move_to(50.0, 60.0);
        rig.up(PointerButton::Primary);

        assert_eq!(rig.strokes.len(), 1);
        assert_eq!(
            rig.strokes.strokes()[0].points(),
            &[Point::new(10.0, 10.0), Point::new(20.0, 20.0)]
        );
        assert_eq!(rig.controller.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_moves_without_gesture_are_ignored() {
        let mut rig = Rig::new(ViewportState::default());
        assert!(!rig.move_to(5.0, 5.0));
        assert!(rig.strokes.is_empty());
        assert_eq!(rig.viewport, ViewportState::default());
    }

    #[test]
    fn test_pan_uses_delta_from_previous_event() {
        let mut rig = Rig::new(ViewportState::default());

        rig.down(PointerButton::Secondary, 100.0, 100.0);
        assert!(rig.controller.suppresses_context_menu());
        rig.move_to(110.0, 95.0);
        rig.move_to(130.0, 95.0);
        rig.up(PointerButton::Secondary);
        rig.move_to(500.0, 500.0);

        assert_eq!(rig.viewport.offset_x, 30.0);
        assert_eq!(rig.viewport.offset_y, -5.0);
        assert_eq!(rig.viewport.zoom, 1.0);
        assert!(rig.strokes.is_empty());
        assert!(!rig.controller.suppresses_context_menu());
    }

    #[test]
    fn test_second_gesture_is_ignored_while_active() {
        let mut rig = Rig::new(ViewportState::default());

        rig.down(PointerButton::Primary, 0.0, 0.0);
        assert!(!rig.down(PointerButton::Secondary, 0.0, 0.0));
        rig.move_to(10.0, 0.0);
        assert!(!rig.up(PointerButton::Secondary));
        assert_eq!(rig.controller.gesture(), Gesture::Drawing);
        rig.move_to(20.0, 0.0);
        rig.up(PointerButton::Primary);

        assert_eq!(rig.viewport, ViewportState::default());
        assert_eq!(rig.strokes.strokes()[0].points().len(), 3);

        rig.down(PointerButton::Secondary, 0.0, 0.0);
        rig.down(PointerButton::Primary, 0.0, 0.0);
        rig.move_to(5.0, 5.0);
        assert_eq!(rig.strokes.len(), 1);
        assert_eq!(rig.viewport.offset_x, 5.0);
    }

    #[test]
    fn test_pointer_gone_ends_gesture() {
        let mut rig = Rig::new(ViewportState::default());

        rig.down(PointerButton::Primary, 0.0, 0.0);
        rig.send(PointerEvent::Gone);
        assert_eq!(rig.controller.gesture(), Gesture::Idle);
        assert!(!rig.strokes.is_drawing());
        rig.move_to(10.0, 10.0);
        assert_eq!(rig.strokes.strokes()[0].points().len(), 1);

        rig.down(PointerButton::Secondary, 0.0, 0.0);
        rig.send(PointerEvent::Gone);
        rig.move_to(50.0, 50.0);
        assert_eq!(rig.viewport, ViewportState::default());
    }

    #[test]
    fn test_middle_button_does_nothing() {
        let mut rig = Rig::new(ViewportState::default());
        assert!(!rig.down(PointerButton::Middle, 1.0, 1.0));
        assert_eq!(rig.controller.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_wheel_zooms_about_box_center_not_cursor() {
        let mut rig = Rig::new(ViewportState { offset_x: 0.0, offset_y: 100.0, zoom: 1.0 });
        let center = ScreenPos::new(400.0, 300.0);
        let anchored = geometry::to_image_space(center, &rig.viewport);

        rig.move_to(12.0, 34.0);
        rig.send(PointerEvent::Wheel { delta_y: -100.0 });
        assert!((rig.viewport.zoom - 1.1).abs() < EPS);

        let after = geometry::to_screen_space(anchored, &rig.viewport);
        assert!((after.x - center.x).abs() < 1e-6);
        assert!((after.y - center.y).abs() < 1e-6);

        rig.send(PointerEvent::Wheel { delta_y: 100.0 });
        assert!((rig.viewport.zoom - 0.99).abs() < EPS);
    }

    #[test]
    fn test_drawing_after_zoom_lands_under_cursor() {
        let mut rig = Rig::new(ViewportState::default());
        rig.send(PointerEvent::Wheel { delta_y: -1.0 });

        rig.down(PointerButton::Primary, 400.0, 300.0);
        let point = rig.strokes.strokes()[0].points()[0];
        let screen = geometry::to_screen_space(point, &rig.viewport);
        assert!((screen.x - 400.0).abs() < 1e-6);
        assert!((screen.y - 300.0).abs() < 1e-6);
    }
}
