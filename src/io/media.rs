// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module answers the one question the layout core has about an
//! image, "what is its native pixel size", and decodes pixels for display.

use crate::error::{LayoutError, Result};
use std::path::Path;

/// Supplies native pixel dimensions for image files.
pub trait ImageSource {
    /// Native `(width, height)` of the image at `path`.
    ///
    /// A missing file is [`LayoutError::NotFound`]; a file that cannot be
    /// read as a raster image is [`LayoutError::UnreadableImage`].
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)>;
}

/// Reads image headers from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSource;

impl ImageSource for FileImageSource {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        if !path.exists() {
            return Err(LayoutError::NotFound(path.to_path_buf()));
        }
        image::image_dimensions(path).map_err(|e| LayoutError::UnreadableImage {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Decoded RGBA pixels ready for upload as a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode an image file to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    if !path.exists() {
        return Err(LayoutError::NotFound(path.to_path_buf()));
    }
    let img = image::open(path).map_err(|e| LayoutError::UnreadableImage {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_of_real_png() {
        let path = std::env::temp_dir().join(format!("texlayout_media_{}.png", std::process::id()));
        image::RgbaImage::new(40, 24).save(&path).unwrap();

        assert_eq!(FileImageSource.dimensions(&path).unwrap(), (40, 24));
        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (40, 24));
        assert_eq!(loaded.pixels.len(), 40 * 24 * 4);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let path = Path::new("definitely/not/here.png");
        assert!(matches!(
            FileImageSource.dimensions(path),
            Err(LayoutError::NotFound(_))
        ));
    }

    #[test]
    fn test_non_image_is_unreadable() {
        let path = std::env::temp_dir().join(format!("texlayout_media_{}.txt", std::process::id()));
        std::fs::write(&path, "not an image").unwrap();
        assert!(matches!(
            FileImageSource.dimensions(&path),
            Err(LayoutError::UnreadableImage { .. })
        ));
        std::fs::remove_file(&path).ok();
    }
}
