// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the layout core.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    /// A referenced image file does not exist.
    #[error("image file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The layout file could not be parsed.
    #[error("invalid layout format in {}: {message}", path.display())]
    InvalidFormat { path: PathBuf, message: String },

    /// A value was rejected at the mutating call (no state was changed).
    #[error("invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: f64 },

    /// The file exists but is not a loadable raster image.
    #[error("cannot load image {}: {message}", path.display())]
    UnreadableImage { path: PathBuf, message: String },

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode layout: {0}")]
    Encode(String),

    #[error("no file path given and no current layout file")]
    NoPath,
}

impl LayoutError {
    pub(crate) fn invalid(what: &'static str, value: f64) -> Self {
        LayoutError::InvalidValue { what, value }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LayoutError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
