// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layout serialization and deserialization.
//!
//! This module converts a [`Canvas`] to and from the layout document,
//! normalizing positions to fractions of the canvas, and reads and writes
//! layout files in JSON (working files and exports) or YAML (exports).

use crate::error::{LayoutError, Result};
use crate::io::media::ImageSource;
use crate::models::canvas::{Canvas, GridUpdate};
use crate::models::layout::{
    CanvasRecord, GridRecord, ImageRecord, LayoutDocument, ScaleEncoding, LAYOUT_VERSION,
};
use crate::models::placed_image::Placeable;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// A problem that made part of a layout unusable while the rest loaded.
#[derive(Debug)]
pub enum LoadWarning {
    /// The image could not be placed (missing or unreadable file).
    SkippedImage {
        index: usize,
        filepath: String,
        error: LayoutError,
    },
    /// The image entry itself is malformed.
    MalformedImage { index: usize, message: String },
    /// The canvas size was unusable; the default size was used instead.
    InvalidCanvas { width: f64, height: f64 },
    /// The grid settings were unusable; the default grid was kept.
    InvalidGrid { error: LayoutError },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::SkippedImage {
                index,
                filepath,
                error,
            } => write!(f, "image {} ({}) skipped: {}", index, filepath, error),
            LoadWarning::MalformedImage { index, message } => {
                write!(f, "image {} skipped: {}", index, message)
            }
            LoadWarning::InvalidCanvas { width, height } => {
                write!(f, "invalid canvas size {}x{}, using default", width, height)
            }
            LoadWarning::InvalidGrid { error } => write!(f, "grid settings ignored: {}", error),
        }
    }
}

/// Result of loading a layout document.
#[derive(Debug)]
pub struct LoadedLayout {
    pub canvas: Canvas,
    pub warnings: Vec<LoadWarning>,
    pub version: String,
    /// Top-level fields this tool does not interpret, such as `lod`.
    pub extra: Map<String, Value>,
}

/// Reader-side document. Images stay untyped so that one bad entry only
/// costs that entry.
#[derive(Debug, Deserialize)]
struct RawLayout {
    #[serde(default)]
    version: Option<String>,
    #[serde(default, alias = "canvas_size")]
    canvas: CanvasRecord,
    #[serde(default)]
    grid: Option<GridRecord>,
    #[serde(default)]
    images: Vec<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Converts between a canvas and the layout document.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutSerializer {
    encoding: ScaleEncoding,
}

impl LayoutSerializer {
    pub fn new(encoding: ScaleEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> ScaleEncoding {
        self.encoding
    }

    /// Build the document for `canvas`. Images are written bottom to top.
    pub fn serialize(&self, canvas: &Canvas, extra_fields: Map<String, Value>) -> LayoutDocument {
        let grid = canvas.grid();
        LayoutDocument {
            version: LAYOUT_VERSION.to_string(),
            canvas: CanvasRecord {
                width: canvas.width(),
                height: canvas.height(),
            },
            grid: GridRecord {
                visible: grid.visible,
                size: grid.spacing().value(),
                snap_enabled: grid.snap_enabled,
                mode: grid.mode(),
            },
            images: canvas
                .items_by_z()
                .into_iter()
                .map(|item| item.to_normalized(canvas.width(), canvas.height(), self.encoding))
                .collect(),
            extra: extra_fields,
        }
    }

    /// Pretty-printed JSON for `canvas`.
    pub fn to_json_string(&self, canvas: &Canvas) -> Result<String> {
        let document = self.serialize(canvas, Map::new());
        serde_json::to_string_pretty(&document).map_err(|e| LayoutError::Encode(e.to_string()))
    }

    /// Parse a JSON layout and rebuild the canvas it describes.
    ///
    /// `origin` names the document in errors and anchors relative image
    /// paths. Images whose file is missing or unreadable are skipped with
    /// a warning.
    pub fn deserialize(
        &self,
        document: &str,
        origin: &Path,
        source: &dyn ImageSource,
    ) -> Result<LoadedLayout> {
        let raw: RawLayout =
            serde_json::from_str(document).map_err(|e| LayoutError::InvalidFormat {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(self.build(raw, origin, source))
    }

    fn deserialize_yaml(
        &self,
        document: &str,
        origin: &Path,
        source: &dyn ImageSource,
    ) -> Result<LoadedLayout> {
        let raw: RawLayout =
            serde_yaml::from_str(document).map_err(|e| LayoutError::InvalidFormat {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(self.build(raw, origin, source))
    }

    fn build(&self, raw: RawLayout, origin: &Path, source: &dyn ImageSource) -> LoadedLayout {
        let mut warnings = Vec::new();

        let mut canvas = match Canvas::new(raw.canvas.width, raw.canvas.height) {
            Ok(canvas) => canvas,
            Err(_) => {
                warnings.push(LoadWarning::InvalidCanvas {
                    width: raw.canvas.width,
                    height: raw.canvas.height,
                });
                Canvas::default()
            }
        };

        if let Some(grid) = raw.grid {
            let update = GridUpdate {
                visible: Some(grid.visible),
                mode: Some(grid.mode),
                spacing: Some(grid.size),
                snap_enabled: Some(grid.snap_enabled),
                ..Default::default()
            };
            if let Err(error) = canvas.set_grid(update) {
                warnings.push(LoadWarning::InvalidGrid { error });
            }
        }

        let base_dir = origin.parent();
        for (index, value) in raw.images.into_iter().enumerate() {
            let record: ImageRecord = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(e) => {
                    warnings.push(LoadWarning::MalformedImage {
                        index,
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            if record.filepath.is_empty() {
                warnings.push(LoadWarning::MalformedImage {
                    index,
                    message: "missing filepath".to_string(),
                });
                continue;
            }
            if let Err(error) = self.place(&mut canvas, &record, base_dir, source) {
                warnings.push(LoadWarning::SkippedImage {
                    index,
                    filepath: record.filepath.clone(),
                    error,
                });
            }
        }

        for warning in &warnings {
            log::warn!("{}: {}", origin.display(), warning);
        }
        // A freshly loaded canvas starts without a notification backlog.
        canvas.drain_events();

        LoadedLayout {
            canvas,
            warnings,
            version: raw.version.unwrap_or_else(|| LAYOUT_VERSION.to_string()),
            extra: raw.extra,
        }
    }

    fn place(
        &self,
        canvas: &mut Canvas,
        record: &ImageRecord,
        base_dir: Option<&Path>,
        source: &dyn ImageSource,
    ) -> Result<()> {
        let path = resolve_image_path(&record.filepath, base_dir);
        let native = source.dimensions(&path)?;
        let material = Some(record.material_name.clone()).filter(|n| !n.is_empty());
        // The item keeps the path as written; only reads use the resolved one.
        let id = canvas.add(record.filepath.clone(), material, native, record.mesh_index)?;

        let position = canvas.from_normalized(record.position);
        let (canvas_w, canvas_h) = (canvas.width(), canvas.height());
        let item = canvas
            .item_mut(id)
            .ok_or_else(|| LayoutError::NotFound(path.clone()))?;

        item.set_source_path(path);
        item.set_position(position);
        match self.encoding {
            ScaleEncoding::Multiplier => item.set_scale(record.scale.x, record.scale.y),
            ScaleEncoding::CanvasFraction => {
                let (native_w, native_h) = item.native_size();
                item.set_scale(
                    record.scale.x * canvas_w / native_w,
                    record.scale.y * canvas_h / native_h,
                );
            }
        }
        item.set_rotation(record.rotation);
        if record.z_index.is_finite() {
            item.z_order = record.z_index;
        }
        item.visible = record.visible;
        Ok(())
    }
}

/// Use the path as written when it exists, otherwise look for it next to
/// the layout file.
fn resolve_image_path(filepath: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(filepath);
    if path.is_absolute() || path.exists() {
        return path;
    }
    match base_dir {
        Some(dir) if dir.join(&path).exists() => dir.join(&path),
        _ => path,
    }
}

/// Tracks the working layout file and performs load, save and export.
#[derive(Debug, Default)]
pub struct LayoutManager {
    current_file: Option<PathBuf>,
    serializer: LayoutSerializer,
}

impl LayoutManager {
    pub fn new(serializer: LayoutSerializer) -> Self {
        Self {
            current_file: None,
            serializer,
        }
    }

    pub fn serializer(&self) -> &LayoutSerializer {
        &self.serializer
    }

    /// The working file, if the layout has been loaded or saved.
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Start a fresh, unsaved layout.
    pub fn new_layout(&mut self, width: f64, height: f64) -> Result<Canvas> {
        let canvas = Canvas::new(width, height)?;
        self.current_file = None;
        Ok(canvas)
    }

    /// Load a layout file (YAML for `.yaml`/`.yml`, JSON otherwise) and make
    /// it the working file.
    pub fn load(&mut self, path: &Path, source: &dyn ImageSource) -> Result<LoadedLayout> {
        if !path.exists() {
            return Err(LayoutError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|e| LayoutError::io(path, e))?;
        let loaded = if is_yaml(path) {
            self.serializer.deserialize_yaml(&text, path, source)?
        } else {
            self.serializer.deserialize(&text, path, source)?
        };

        log::info!(
            "Loaded layout {} ({} images, {} warnings)",
            path.display(),
            loaded.canvas.len(),
            loaded.warnings.len()
        );
        self.current_file = Some(path.to_path_buf());
        Ok(loaded)
    }

    /// Save to `path`, or to the working file when `path` is `None`.
    /// `.json` is appended to paths without an extension.
    pub fn save(&mut self, canvas: &Canvas, path: Option<&Path>) -> Result<PathBuf> {
        let target = match path.or(self.current_file.as_deref()) {
            Some(p) => with_json_extension(p),
            None => return Err(LayoutError::NoPath),
        };
        let document = self.serializer.serialize(canvas, Map::new());
        export_json(&document, &target)?;

        log::info!("Saved layout to {}", target.display());
        self.current_file = Some(target.clone());
        Ok(target)
    }

    /// Write an export copy tagged with `lod`. The working file is unchanged.
    pub fn export(&self, canvas: &Canvas, path: &Path, lod: i64) -> Result<PathBuf> {
        let mut extra = Map::new();
        extra.insert("lod".to_string(), Value::from(lod));
        let document = self.serializer.serialize(canvas, extra);

        let target = if is_yaml(path) {
            export_yaml(&document, path)?;
            path.to_path_buf()
        } else {
            let target = with_json_extension(path);
            export_json(&document, &target)?;
            target
        };
        log::info!("Exported layout (lod {}) to {}", lod, target.display());
        Ok(target)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn with_json_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("json")
    }
}

/// Write a layout document as pretty-printed JSON.
pub fn export_json(document: &LayoutDocument, path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(document).map_err(|e| LayoutError::Encode(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| LayoutError::io(path, e))
}

/// Write a layout document as YAML.
pub fn export_yaml(document: &LayoutDocument, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(document).map_err(|e| LayoutError::Encode(e.to_string()))?;
    std::fs::write(path, yaml).map_err(|e| LayoutError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::{GridMode, GridSpacing};
    use crate::util::geometry::Point;
    use std::collections::HashMap;

    struct FakeImages(HashMap<PathBuf, (u32, u32)>);

    impl FakeImages {
        fn with(entries: &[(&str, (u32, u32))]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(p, size)| (PathBuf::from(p), *size))
                    .collect(),
            )
        }
    }

    impl ImageSource for FakeImages {
        fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
            self.0
                .get(path)
                .copied()
                .ok_or_else(|| LayoutError::NotFound(path.to_path_buf()))
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("texlayout_{}_{}", std::process::id(), name))
    }

    fn origin() -> &'static Path {
        Path::new("layout.json")
    }

    #[test]
    fn test_round_trip_positions() {
        let images = FakeImages::with(&[("a.png", (64, 32)), ("b.png", (100, 100))]);
        let serializer = LayoutSerializer::default();

        for (w, h) in [(1024.0, 1024.0), (777.0, 333.0), (1.0, 4096.0), (1920.0, 1080.0)] {
            let mut canvas = Canvas::new(w, h).unwrap();
            let a = canvas.add("a.png", None, (64, 32), 0).unwrap();
            let b = canvas.add("b.png", Some("metal".into()), (100, 100), 2).unwrap();
            canvas.item_mut(a).unwrap().set_position(Point::new(123.456, 78.9));
            canvas.item_mut(b).unwrap().set_position(Point::new(w * 0.7, h * 0.3));
            canvas.item_mut(b).unwrap().set_scale(1.5, 0.25);

            let json = serializer.to_json_string(&canvas).unwrap();
            let loaded = serializer.deserialize(&json, origin(), &images).unwrap();
            assert!(loaded.warnings.is_empty());
            assert_eq!(loaded.canvas.len(), 2);

            for original in canvas.items() {
                let restored = loaded
                    .canvas
                    .items()
                    .iter()
                    .find(|i| i.filepath == original.filepath)
                    .unwrap();
                assert!((restored.position().x - original.position().x).abs() < 1e-9);
                assert!((restored.position().y - original.position().y).abs() < 1e-9);
                assert_eq!(restored.scale(), original.scale());
                assert_eq!(restored.material_name, original.material_name);
                assert_eq!(restored.mesh_index, original.mesh_index);
                assert_eq!(restored.z_order(), original.z_order());
            }
        }
    }

    #[test]
    fn test_round_trip_canvas_fraction_encoding() {
        let images = FakeImages::with(&[("a.png", (200, 100))]);
        let serializer = LayoutSerializer::new(ScaleEncoding::CanvasFraction);

        let mut canvas = Canvas::new(800.0, 400.0).unwrap();
        let id = canvas.add("a.png", None, (200, 100), 0).unwrap();
        canvas.item_mut(id).unwrap().set_scale(2.0, 0.5);

        let document = serializer.serialize(&canvas, Map::new());
        assert_eq!(document.images[0].scale.x, 0.5);
        assert_eq!(document.images[0].scale.y, 0.125);

        let json = serde_json::to_string(&document).unwrap();
        let loaded = serializer.deserialize(&json, origin(), &images).unwrap();
        let item = &loaded.canvas.items()[0];
        assert!((item.scale().0 - 2.0).abs() < 1e-12);
        assert!((item.scale().1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_serialized_shape() {
        let mut canvas = Canvas::new(1000.0, 500.0).unwrap();
        let id = canvas.add("tex/a.png", None, (10, 20), 1).unwrap();
        canvas.item_mut(id).unwrap().set_position(Point::new(250.0, 125.0));

        let mut extra = Map::new();
        extra.insert("lod".into(), Value::from(2));
        let document = LayoutSerializer::default().serialize(&canvas, extra);
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(value["version"], "1.0");
        assert_eq!(value["canvas"]["width"], 1000.0);
        assert_eq!(value["grid"]["size"], 50.0);
        assert_eq!(value["grid"]["mode"], "pixels");
        assert_eq!(value["lod"], 2);
        let image = &value["images"][0];
        assert_eq!(image["filepath"], "tex/a.png");
        assert_eq!(image["material_name"], "a");
        assert_eq!(image["mesh_index"], 1);
        assert_eq!(image["position"]["x"], 0.25);
        assert_eq!(image["position"]["y"], 0.25);
        assert_eq!(image["scale"]["x"], 1.0);
        assert_eq!(image["zIndex"], 0.0);
        assert_eq!(image["visible"], true);
    }

    #[test]
    fn test_missing_image_is_skipped_with_warning() {
        let images = FakeImages::with(&[("b.png", (10, 10)), ("c.png", (10, 10))]);
        let json = r#"{
            "version": "1.0",
            "canvas": { "width": 512, "height": 512 },
            "images": [
                { "filepath": "missing.png", "position": { "x": 0.1, "y": 0.1 } },
                { "filepath": "b.png", "position": { "x": 0.5, "y": 0.25 } },
                { "filepath": "c.png" }
            ]
        }"#;

        let loaded = LayoutSerializer::default()
            .deserialize(json, origin(), &images)
            .unwrap();
        assert_eq!(loaded.canvas.len(), 2);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(matches!(
            &loaded.warnings[0],
            LoadWarning::SkippedImage { index: 0, error: LayoutError::NotFound(_), .. }
        ));
        let b = &loaded.canvas.items()[0];
        assert_eq!(b.position(), Point::new(256.0, 128.0));
    }

    #[test]
    fn test_defaults_and_legacy_canvas_key() {
        let images = FakeImages::with(&[]);
        let loaded = LayoutSerializer::default()
            .deserialize("{}", origin(), &images)
            .unwrap();
        assert_eq!((loaded.canvas.width(), loaded.canvas.height()), (1024.0, 1024.0));
        assert_eq!(loaded.version, "1.0");

        let loaded = LayoutSerializer::default()
            .deserialize(
                r#"{ "canvas_size": { "width": 640, "height": 480 } }"#,
                origin(),
                &images,
            )
            .unwrap();
        assert_eq!((loaded.canvas.width(), loaded.canvas.height()), (640.0, 480.0));

        let loaded = LayoutSerializer::default()
            .deserialize(r#"{ "canvas": { "height": 300 } }"#, origin(), &images)
            .unwrap();
        assert_eq!((loaded.canvas.width(), loaded.canvas.height()), (1024.0, 300.0));
    }

    #[test]
    fn test_grid_settings_are_restored() {
        let images = FakeImages::with(&[]);
        let json = r#"{ "grid": { "visible": false, "size": 25, "snap_enabled": false, "mode": "percent" } }"#;
        let loaded = LayoutSerializer::default()
            .deserialize(json, origin(), &images)
            .unwrap();
        let grid = loaded.canvas.grid();
        assert!(!grid.visible);
        assert!(!grid.snap_enabled);
        assert_eq!(grid.spacing(), GridSpacing::PercentOfWidth(25.0));

        let loaded = LayoutSerializer::default()
            .deserialize(r#"{ "grid": { "size": 40 } }"#, origin(), &images)
            .unwrap();
        assert_eq!(loaded.canvas.grid().mode(), GridMode::Pixels);
        assert_eq!(loaded.canvas.grid().spacing(), GridSpacing::Pixels(40.0));
    }

    #[test]
    fn test_bad_values_degrade_to_warnings() {
        let images = FakeImages::with(&[("a.png", (10, 10))]);
        let json = r#"{
            "canvas": { "width": -5, "height": 100 },
            "grid": { "size": 0 },
            "images": [
                { "filepath": "a.png", "mesh_index": -1 },
                { "material_name": "no path" },
                { "filepath": "a.png", "scale": { "x": -2, "y": 0 }, "rotation": 450 }
            ]
        }"#;
        let loaded = LayoutSerializer::default()
            .deserialize(json, origin(), &images)
            .unwrap();

        assert_eq!(loaded.warnings.len(), 4);
        assert!(matches!(loaded.warnings[0], LoadWarning::InvalidCanvas { .. }));
        assert!(matches!(loaded.warnings[1], LoadWarning::InvalidGrid { .. }));
        assert_eq!(loaded.canvas.width(), 1024.0);
        assert_eq!(loaded.canvas.len(), 1);
        let item = &loaded.canvas.items()[0];
        let (sx, sy) = item.scale();
        assert!(sx > 0.0 && sy > 0.0);
        assert!((item.rotation() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_json_names_the_file() {
        let images = FakeImages::with(&[]);
        let err = LayoutSerializer::default()
            .deserialize("{ not json", Path::new("broken.json"), &images)
            .unwrap_err();
        match err {
            LayoutError::InvalidFormat { path, .. } => assert_eq!(path, PathBuf::from("broken.json")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_lod_is_kept_in_extra() {
        let images = FakeImages::with(&[]);
        let loaded = LayoutSerializer::default()
            .deserialize(r#"{ "lod": 3, "tool": "x" }"#, origin(), &images)
            .unwrap();
        assert_eq!(loaded.extra.get("lod"), Some(&Value::from(3)));
        assert_eq!(loaded.extra.get("tool"), Some(&Value::from("x")));
    }

    #[test]
    fn test_manager_save_load_and_export() {
        let png = temp_path("tile.png");
        image::RgbaImage::new(32, 16).save(&png).unwrap();

        let mut canvas = Canvas::new(256.0, 128.0).unwrap();
        let id = canvas
            .add(png.to_string_lossy().into_owned(), None, (32, 16), 0)
            .unwrap();
        canvas.item_mut(id).unwrap().set_position(Point::new(64.0, 32.0));

        let mut manager = LayoutManager::default();
        assert!(matches!(manager.save(&canvas, None), Err(LayoutError::NoPath)));

        let saved = manager.save(&canvas, Some(&temp_path("work"))).unwrap();
        assert_eq!(saved.extension().and_then(|s| s.to_str()), Some("json"));
        assert_eq!(manager.current_file(), Some(saved.as_path()));

        let export = manager.export(&canvas, &temp_path("export.yaml"), 1).unwrap();
        assert_eq!(manager.current_file(), Some(saved.as_path()));

        let source = crate::io::media::FileImageSource;
        let loaded = manager.load(&export, &source).unwrap();
        assert_eq!(loaded.canvas.len(), 1);
        assert_eq!(loaded.canvas.items()[0].position(), Point::new(64.0, 32.0));
        assert_eq!(loaded.extra.get("lod"), Some(&Value::from(1)));

        let loaded = manager.load(&saved, &source).unwrap();
        assert_eq!(loaded.canvas.width(), 256.0);
        assert!(loaded.extra.get("lod").is_none());

        for path in [png, saved, export] {
            std::fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_relative_filepath_is_kept_as_written() {
        let dir = temp_path("relative");
        std::fs::create_dir_all(dir.join("tex")).unwrap();
        image::RgbaImage::new(8, 8).save(dir.join("tex").join("a.png")).unwrap();
        let layout = dir.join("layout.json");
        std::fs::write(
            &layout,
            r#"{ "canvas": { "width": 64, "height": 64 }, "images": [ { "filepath": "tex/a.png" } ] }"#,
        )
        .unwrap();

        let mut manager = LayoutManager::default();
        let loaded = manager
            .load(&layout, &crate::io::media::FileImageSource)
            .unwrap();
        assert!(loaded.warnings.is_empty());
        let item = &loaded.canvas.items()[0];
        assert_eq!(item.filepath, "tex/a.png");
        assert_eq!(item.source_path(), dir.join("tex/a.png").as_path());

        let document = manager.serializer().serialize(&loaded.canvas, Map::new());
        assert_eq!(document.images[0].filepath, "tex/a.png");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let mut manager = LayoutManager::default();
        let source = crate::io::media::FileImageSource;
        let err = manager
            .load(Path::new("no/such/layout.json"), &source)
            .unwrap_err();
        assert!(matches!(err, LayoutError::NotFound(_)));
        assert!(manager.current_file().is_none());
    }
}
