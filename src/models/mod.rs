// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session and stroke data.

pub mod session;
pub mod stroke;
