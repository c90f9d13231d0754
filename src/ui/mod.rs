// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the StrokeSeg application.

pub mod canvas;
pub mod interaction;
pub mod renderer;
pub mod results;
pub mod toolbar;
