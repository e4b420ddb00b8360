// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persistent application settings.
//!
//! Window geometry, the last grid settings and the last canvas size are
//! read at startup and written when the window closes.

use crate::error::{LayoutError, Result};
use crate::models::canvas::GridUpdate;
use crate::models::grid::{GridMode, GridModel};
use crate::models::layout::DEFAULT_CANVAS_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub visible: bool,
    pub size: f64,
    pub mode: GridMode,
    pub snap_enabled: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::from(&GridModel::default())
    }
}

impl From<&GridModel> for GridSettings {
    fn from(grid: &GridModel) -> Self {
        Self {
            visible: grid.visible,
            size: grid.spacing().value(),
            mode: grid.mode(),
            snap_enabled: grid.snap_enabled,
        }
    }
}

impl GridSettings {
    pub fn to_update(&self) -> GridUpdate {
        GridUpdate {
            visible: Some(self.visible),
            mode: Some(self.mode),
            spacing: Some(self.size),
            snap_enabled: Some(self.snap_enabled),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Inner window size in logical points.
    #[serde(default)]
    pub window_size: Option<[f32; 2]>,
    #[serde(default)]
    pub window_position: Option<[f32; 2]>,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default = "default_canvas_size")]
    pub canvas_width: f64,
    #[serde(default = "default_canvas_size")]
    pub canvas_height: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            window_size: None,
            window_position: None,
            grid: GridSettings::default(),
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
        }
    }
}

fn default_canvas_size() -> f64 {
    DEFAULT_CANVAS_SIZE
}

impl AppSettings {
    /// Platform config location, e.g. `~/.config/texlayout/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "texlayout")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LayoutError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| LayoutError::InvalidFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from the default location. A missing or unreadable settings
    /// file yields the defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).map_err(|e| LayoutError::Encode(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LayoutError::io(parent, e))?;
        }
        std::fs::write(path, contents).map_err(|e| LayoutError::io(path, e))
    }

    pub fn save_default(&self) -> Result<()> {
        match Self::default_path() {
            Some(path) => self.save(&path),
            None => Err(LayoutError::NoPath),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::canvas::Canvas;
    use crate::models::grid::GridSpacing;

    #[test]
    fn test_settings_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("texlayout_settings_{}", std::process::id()))
            .join("settings.json");
        let settings = AppSettings {
            window_size: Some([1200.0, 800.0]),
            window_position: Some([100.0, 50.0]),
            grid: GridSettings {
                visible: false,
                size: 25.0,
                mode: GridMode::PercentOfWidth,
                snap_enabled: true,
            },
            canvas_width: 2048.0,
            canvas_height: 512.0,
        };
        settings.save(&path).unwrap();
        assert_eq!(AppSettings::load(&path).unwrap(), settings);
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{ "canvas_width": 640 }"#).unwrap();
        assert_eq!(settings.canvas_width, 640.0);
        assert_eq!(settings.canvas_height, DEFAULT_CANVAS_SIZE);
        assert_eq!(settings.grid, GridSettings::default());
    }

    #[test]
    fn test_grid_settings_apply_to_canvas() {
        let settings = GridSettings {
            visible: true,
            size: 10.0,
            mode: GridMode::PercentOfWidth,
            snap_enabled: false,
        };
        let mut canvas = Canvas::default();
        canvas.set_grid(settings.to_update()).unwrap();
        assert_eq!(canvas.grid().spacing(), GridSpacing::PercentOfWidth(10.0));
        assert!(!canvas.grid().snap_enabled);
        assert_eq!(GridSettings::from(canvas.grid()), settings);
    }
}
