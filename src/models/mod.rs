// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for the canvas, its grid and the placed images.

pub mod canvas;
pub mod grid;
pub mod layout;
pub mod placed_image;
