// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stroke data structures.
//!
//! This module defines freehand strokes and the store that owns them for
//! the lifetime of one annotation session, including undo/redo.

use serde::Serialize;

/// A 2D point in image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiply both coordinates by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// One continuous freehand line. Never empty; points are in drawing order.
///
/// Serializes as `{"points": [{"x": .., "y": ..}, ..]}`, the shape the
/// processing backend expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `first`.
    pub fn new(first: Point) -> Self {
        Self {
            points: vec![first],
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| p.scaled(factor)).collect(),
        }
    }
}

/// Ordered strokes plus the stack of undone strokes.
///
/// The visible list and the undone stack never share a stroke: undo moves
/// the last stroke onto the stack, redo moves it back. Starting a new
/// stroke empties the undone stack.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
    undone: Vec<Stroke>,
    active: bool,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new one-point stroke and make it the active one.
    pub fn begin_stroke(&mut self, point: Point) {
        self.strokes.push(Stroke::new(point));
        self.undone.clear();
        self.active = true;
    }

    /// Append a point to the active stroke.
    ///
    /// Does nothing when no stroke is active, since an extend can arrive
    /// after the gesture that owned it has already ended.
    pub fn extend_active_stroke(&mut self, point: Point) {
        if !self.active {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(point);
        }
    }

    /// Mark that no stroke is being drawn.
    pub fn end_stroke(&mut self) {
        self.active = false;
    }

    /// Move the most recent stroke onto the undone stack.
    pub fn undo(&mut self) {
        if let Some(stroke) = self.strokes.pop() {
            // The popped stroke may be the one being drawn.
            self.active = false;
            self.undone.push(stroke);
            log::debug!("Undo, {} strokes remain", self.strokes.len());
        }
    }

    /// Restore the most recently undone stroke.
    pub fn redo(&mut self) {
        if let Some(stroke) = self.undone.pop() {
            self.active = false;
            self.strokes.push(stroke);
            log::debug!("Redo, {} strokes visible", self.strokes.len());
        }
    }

    /// Copy of the strokes with every coordinate multiplied by `inverse_scale`.
    pub fn to_image_space_scaled(&self, inverse_scale: f64) -> Vec<Stroke> {
        self.strokes.iter().map(|s| s.scaled(inverse_scale)).collect()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_stroke_counts_follow_begin_and_extend() {
        let mut store = StrokeStore::new();
        // 3 strokes with 2, 0 and 4 extends respectively
        let plan = [2usize, 0, 4];

        for (i, extends) in plan.iter().enumerate() {
            store.begin_stroke(p(i as f64, 0.0));
            for j in 0..*extends {
                store.extend_active_stroke(p(i as f64, j as f64 + 1.0));
            }
            store.end_stroke();
        }

        assert_eq!(store.len(), plan.len());
        for (stroke, extends) in store.strokes().iter().zip(plan) {
            assert_eq!(stroke.points().len(), 1 + extends);
        }
    }

    #[test]
    fn test_extend_without_stroke_is_noop() {
        let mut store = StrokeStore::new();
        store.extend_active_stroke(p(1.0, 1.0));
        assert!(store.is_empty());

        store.begin_stroke(p(0.0, 0.0));
        store.end_stroke();
        store.extend_active_stroke(p(5.0, 5.0));
        assert_eq!(store.strokes()[0].points(), &[p(0.0, 0.0)]);
    }

    #[test]
    fn test_undo_then_redo_restores_list() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(0.0, 0.0));
        store.extend_active_stroke(p(1.0, 1.0));
        store.end_stroke();
        store.begin_stroke(p(2.0, 2.0));
        store.end_stroke();
        let before = store.strokes().to_vec();

        store.undo();
        assert_eq!(store.len(), 1);
        assert!(store.can_redo());

        store.redo();
        assert_eq!(store.strokes(), before.as_slice());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_undo_redo_is_lifo() {
        let mut store = StrokeStore::new();
        for i in 0..3 {
            store.begin_stroke(p(i as f64, 0.0));
            store.end_stroke();
        }

        store.undo();
        store.undo();
        store.redo();

        let firsts: Vec<f64> = store.strokes().iter().map(|s| s.points()[0].x).collect();
        assert_eq!(firsts, vec![0.0, 1.0]);
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut store = StrokeStore::new();
        store.undo();
        store.redo();
        assert!(store.is_empty());
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_new_stroke_discards_redo() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(0.0, 0.0));
        store.end_stroke();
        store.begin_stroke(p(1.0, 0.0));
        store.end_stroke();

        store.undo();
        store.undo();
        store.begin_stroke(p(9.0, 9.0));
        store.end_stroke();
        store.redo();

        assert_eq!(store.len(), 1);
        assert_eq!(store.strokes()[0].points()[0], p(9.0, 9.0));
    }

    #[test]
    fn test_undo_during_draw_stops_extending() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(0.0, 0.0));
        store.end_stroke();
        store.begin_stroke(p(1.0, 1.0));
        store.undo();
        store.extend_active_stroke(p(2.0, 2.0));

        assert_eq!(store.strokes()[0].points(), &[p(0.0, 0.0)]);
        assert!(!store.is_drawing());
    }

    #[test]
    fn test_scaled_copy_leaves_store_untouched() {
        let mut store = StrokeStore::new();
        store.begin_stroke(p(100.0, 0.0));
        store.extend_active_stroke(p(8.0, 4.0));
        store.end_stroke();

        let scaled = store.to_image_space_scaled(1.25);
        assert_eq!(scaled[0].points(), &[p(125.0, 0.0), p(10.0, 5.0)]);
        assert_eq!(store.strokes()[0].points()[0], p(100.0, 0.0));
    }

    #[test]
    fn test_wire_shape() {
        let stroke = Stroke::new(p(1.5, 2.0));
        let json = serde_json::to_value(&stroke).unwrap();
        assert_eq!(json, serde_json::json!({ "points": [{ "x": 1.5, "y": 2.0 }] }));
    }
}
