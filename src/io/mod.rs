// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images and stroke payloads.

pub mod media;
pub mod serialization;
