// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the canvas model, the interaction controller and the
//! layout manager, and wires the UI panels to them.

use crate::ui::canvas::{self, TextureCache, ViewState};
use crate::ui::properties::{self, PropertiesAction};
use crate::ui::toolbar::{self, ToolbarAction, ToolbarState};
use std::sync::mpsc::{channel, Receiver, Sender};
use texlayout::interaction::InteractionController;
use texlayout::io::media::{self, FileImageSource, LoadedImage};
use texlayout::io::serialization::LayoutManager;
use texlayout::io::settings::{AppSettings, GridSettings};
use texlayout::models::canvas::{Canvas, CanvasEvent, GridUpdate};
use texlayout::models::placed_image::{ItemId, Placeable};
use texlayout::LayoutError;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "tga", "tif", "tiff"];
const LAYOUT_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Decoded texture from the background loader, tagged with the canvas
/// generation it was requested for.
struct TextureResult {
    generation: u64,
    item: ItemId,
    result: texlayout::Result<LoadedImage>,
}

/// Main application state.
pub struct TexLayoutApp {
    canvas: Canvas,
    controller: InteractionController,
    layouts: LayoutManager,

    /// Display textures per item
    textures: TextureCache,
    texture_sender: Sender<TextureResult>,
    texture_receiver: Receiver<TextureResult>,
    /// Bumped whenever the canvas is replaced; item ids restart per canvas
    generation: u64,
    pending_textures: usize,

    view: ViewState,
    toolbar: ToolbarState,
    settings: AppSettings,
    export_lod: i64,
    status: Option<String>,
}

impl TexLayoutApp {
    pub fn new(settings: AppSettings) -> Self {
        let mut canvas = match Canvas::new(settings.canvas_width, settings.canvas_height) {
            Ok(canvas) => canvas,
            Err(e) => {
                log::warn!("Ignoring saved canvas size: {}", e);
                Canvas::default()
            }
        };
        if let Err(e) = canvas.set_grid(settings.grid.to_update()) {
            log::warn!("Ignoring saved grid settings: {}", e);
        }
        canvas.drain_events();

        let (texture_sender, texture_receiver) = channel();
        Self {
            toolbar: ToolbarState {
                canvas_width: canvas.width(),
                canvas_height: canvas.height(),
            },
            canvas,
            controller: InteractionController::new(),
            layouts: LayoutManager::default(),
            textures: TextureCache::new(),
            texture_sender,
            texture_receiver,
            generation: 0,
            pending_textures: 0,
            view: ViewState::default(),
            settings,
            export_lod: 0,
            status: None,
        }
    }

    fn fail(&mut self, error: LayoutError) {
        log::error!("{}", error);
        self.status = Some(error.to_string());
    }

    fn report<T>(&mut self, result: texlayout::Result<T>, success: impl FnOnce(T) -> String) {
        match result {
            Ok(value) => self.status = Some(success(value)),
            Err(e) => self.fail(e),
        }
    }

    /// Swap in a new canvas and reload every texture for it.
    fn replace_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        self.controller = InteractionController::new();
        self.generation += 1;
        self.pending_textures = 0;
        self.textures.clear();
        self.toolbar.canvas_width = self.canvas.width();
        self.toolbar.canvas_height = self.canvas.height();

        let ids: Vec<ItemId> = self.canvas.items().iter().map(|item| item.id()).collect();
        for id in ids {
            self.request_texture(id);
        }
    }

    /// Decode an item's image on a background thread.
    fn request_texture(&mut self, id: ItemId) {
        let Some(item) = self.canvas.item(id) else {
            return;
        };
        let path = item.source_path().to_path_buf();
        let sender = self.texture_sender.clone();
        let generation = self.generation;
        self.textures.insert(id, None);
        self.pending_textures += 1;

        std::thread::spawn(move || {
            let result = media::load_image(&path);
            let _ = sender.send(TextureResult {
                generation,
                item: id,
                result,
            });
        });
    }

    fn receive_textures(&mut self, ctx: &egui::Context) {
        while let Ok(loaded) = self.texture_receiver.try_recv() {
            if loaded.generation != self.generation {
                continue;
            }
            self.pending_textures = self.pending_textures.saturating_sub(1);
            if self.canvas.item(loaded.item).is_none() {
                continue;
            }
            match loaded.result {
                Ok(img) => {
                    let size = [img.width as usize, img.height as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &img.pixels);
                    let texture = ctx.load_texture(
                        format!("item{}", loaded.item),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    self.textures.insert(loaded.item, Some(texture));
                }
                Err(e) => log::warn!("No texture for {}: {}", loaded.item, e),
            }
        }
    }

    fn handle_canvas_events(&mut self) {
        for event in self.canvas.drain_events() {
            log::debug!("Canvas event: {:?}", event);
            match event {
                CanvasEvent::ItemAdded(id) => self.request_texture(id),
                CanvasEvent::ItemRemoved(id) => {
                    self.textures.remove(&id);
                }
                CanvasEvent::Cleared => {
                    self.textures.clear();
                    self.toolbar.canvas_width = self.canvas.width();
                    self.toolbar.canvas_height = self.canvas.height();
                }
                CanvasEvent::CanvasResized { width, height } => {
                    self.toolbar.canvas_width = width;
                    self.toolbar.canvas_height = height;
                }
                CanvasEvent::SelectionChanged(_) | CanvasEvent::GridChanged => {}
            }
        }
    }

    fn new_layout(&mut self) {
        match self
            .layouts
            .new_layout(self.toolbar.canvas_width, self.toolbar.canvas_height)
        {
            Ok(canvas) => {
                self.replace_canvas(canvas);
                self.status = Some("New layout".to_string());
            }
            Err(e) => self.fail(e),
        }
    }

    fn open_layout(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Layouts", &LAYOUT_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        match self.layouts.load(&path, &FileImageSource) {
            Ok(mut loaded) => {
                for warning in &loaded.warnings {
                    log::warn!("{}", warning);
                }
                // Keep the user's grid line style across files.
                let style = GridUpdate {
                    line_color: Some(self.canvas.grid().line_color),
                    line_width: Some(self.canvas.grid().line_width),
                    ..Default::default()
                };
                if let Err(e) = loaded.canvas.set_grid(style) {
                    log::warn!("{}", e);
                }
                loaded.canvas.drain_events();

                self.status = Some(if loaded.warnings.is_empty() {
                    format!("Opened {}", path.display())
                } else {
                    format!(
                        "Opened {} with {} warning(s)",
                        path.display(),
                        loaded.warnings.len()
                    )
                });
                self.replace_canvas(loaded.canvas);
            }
            Err(e) => self.fail(e),
        }
    }

    fn save_layout(&mut self) {
        match self.layouts.save(&self.canvas, None) {
            Err(LayoutError::NoPath) => self.save_layout_as(),
            result => self.report(result, |path| format!("Saved {}", path.display())),
        }
    }

    fn save_layout_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("layout.json")
            .save_file()
        {
            let result = self.layouts.save(&self.canvas, Some(&path));
            self.report(result, |path| format!("Saved {}", path.display()));
        }
    }

    fn export_layout(&mut self, yaml: bool) {
        let dialog = if yaml {
            rfd::FileDialog::new()
                .add_filter("YAML", &["yaml", "yml"])
                .set_file_name("layout.yaml")
        } else {
            rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name("layout.json")
        };
        if let Some(path) = dialog.save_file() {
            let result = self.layouts.export(&self.canvas, &path, self.export_lod);
            self.report(result, |path| format!("Exported {}", path.display()));
        }
    }

    fn add_images(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_files()
        else {
            return;
        };
        let mut last = None;
        for path in paths {
            match self
                .canvas
                .add_from_file(&path, None, None, 0, &FileImageSource)
            {
                Ok(id) => last = Some(id),
                Err(e) => {
                    log::error!("Failed to add image: {}", e);
                    self.status = Some(e.to_string());
                }
            }
        }
        if last.is_some() {
            self.canvas.select(last);
        }
    }

    fn copy_layout(&mut self, ctx: &egui::Context) {
        match self.layouts.serializer().to_json_string(&self.canvas) {
            Ok(json) => {
                ctx.output_mut(|o| o.copied_text = json);
                self.status = Some("Layout copied to clipboard".to_string());
            }
            Err(e) => self.fail(e),
        }
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.canvas.selected() {
            if self.controller.active_item() == Some(id) {
                self.controller = InteractionController::new();
            }
            self.canvas.remove(id);
        }
    }

    fn apply_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::None => {}
            ToolbarAction::AddImages => self.add_images(),
            ToolbarAction::ResizeCanvas { width, height } => {
                let result = self.canvas.set_size(width, height);
                self.report(result, |_| format!("Canvas resized to {} × {}", width, height));
            }
            ToolbarAction::UpdateGrid(update) => {
                if let Err(e) = self.canvas.set_grid(update) {
                    self.fail(e);
                }
            }
        }
    }

    fn apply_properties_action(&mut self, action: PropertiesAction) {
        match action {
            PropertiesAction::None => {}
            PropertiesAction::Select(id) => self.canvas.select(Some(id)),
            PropertiesAction::Delete(id) => {
                self.canvas.select(Some(id));
                self.delete_selected();
            }
            PropertiesAction::SetVisible(id, visible) => self.canvas.set_visible(id, visible),
            PropertiesAction::BringToFront(id) => self.canvas.bring_to_front(id),
            PropertiesAction::SendToBack(id) => self.canvas.send_to_back(id),
            PropertiesAction::SetMaterial(id, name) => {
                if let Some(item) = self.canvas.item_mut(id) {
                    item.material_name = name;
                }
            }
            PropertiesAction::SetMeshIndex(id, mesh_index) => {
                if let Some(item) = self.canvas.item_mut(id) {
                    item.mesh_index = mesh_index;
                }
            }
            PropertiesAction::SetPosition {
                id,
                position,
                commit,
            } => self.canvas.move_item(id, position, commit),
            PropertiesAction::SetSize {
                id,
                width,
                height,
                commit,
            } => {
                if let Err(e) = self.canvas.resize_item(id, width, height, commit) {
                    self.fail(e);
                }
            }
            PropertiesAction::SetRotation(id, degrees) => {
                if let Some(item) = self.canvas.item_mut(id) {
                    item.set_rotation(degrees);
                }
            }
        }
    }

    /// Remember window geometry and the last grid and canvas settings.
    fn save_settings(&mut self, ctx: &egui::Context) {
        let (inner, outer) = ctx.input(|i| (i.viewport().inner_rect, i.viewport().outer_rect));
        if let Some(rect) = inner {
            self.settings.window_size = Some([rect.width(), rect.height()]);
        }
        if let Some(rect) = outer {
            self.settings.window_position = Some([rect.min.x, rect.min.y]);
        }
        self.settings.grid = GridSettings::from(self.canvas.grid());
        self.settings.canvas_width = self.canvas.width();
        self.settings.canvas_height = self.canvas.height();

        match self.settings.save_default() {
            Ok(()) => log::info!("Saved settings"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

impl eframe::App for TexLayoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_textures(ctx);
        if self.pending_textures > 0 {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Layout").clicked() {
                        self.new_layout();
                        ui.close_menu();
                    }
                    if ui.button("Open Layout...").clicked() {
                        self.open_layout();
                        ui.close_menu();
                    }
                    if ui.button("Save").clicked() {
                        self.save_layout();
                        ui.close_menu();
                    }
                    if ui.button("Save As...").clicked() {
                        self.save_layout_as();
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.menu_button("Export", |ui| {
                        ui.add(egui::DragValue::new(&mut self.export_lod).prefix("LOD "));
                        if ui.button("Export as JSON...").clicked() {
                            self.export_layout(false);
                            ui.close_menu();
                        }
                        if ui.button("Export as YAML...").clicked() {
                            self.export_layout(true);
                            ui.close_menu();
                        }
                    });
                    if ui.button("Copy Layout JSON").clicked() {
                        self.copy_layout(ctx);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.button("Add Images...").clicked() {
                        self.add_images();
                        ui.close_menu();
                    }
                    let selected = self.canvas.selected();
                    if ui
                        .add_enabled(selected.is_some(), egui::Button::new("Bring to Front"))
                        .clicked()
                    {
                        if let Some(id) = selected {
                            self.canvas.bring_to_front(id);
                        }
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(selected.is_some(), egui::Button::new("Send to Back"))
                        .clicked()
                    {
                        if let Some(id) = selected {
                            self.canvas.send_to_back(id);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(selected.is_some(), egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        self.delete_selected();
                        ui.close_menu();
                    }
                    if ui.button("Clear Canvas").clicked() {
                        self.canvas.clear();
                        self.controller = InteractionController::new();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.view.zoom = (self.view.zoom * 1.25).min(20.0);
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.view.zoom = (self.view.zoom / 1.25).max(0.05);
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.view.zoom = 1.0;
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, self.canvas.grid(), &mut self.toolbar))
            .inner;
        self.apply_toolbar_action(toolbar_action);

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.pending_textures > 0 {
                    ui.spinner();
                }
                let file = self
                    .layouts
                    .current_file()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "Untitled".to_string());
                ui.label(format!(
                    "{}  |  {} × {}  |  {} image(s)",
                    file,
                    self.canvas.width(),
                    self.canvas.height(),
                    self.canvas.len()
                ));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| properties::show(ui, &self.canvas))
            .inner;
        self.apply_properties_action(properties_action);

        // Central canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let action = canvas::show(
                ui,
                &mut self.canvas,
                &mut self.controller,
                &self.textures,
                &mut self.view,
            );
            if let canvas::CanvasAction::Moved(id) = action {
                if let Some(item) = self.canvas.item(id) {
                    let p = item.position();
                    log::debug!("{} now at ({:.1}, {:.1})", id, p.x, p.y);
                }
            }
        });

        // Escape cancels a gesture in progress, otherwise deselects
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            match self.controller.active_item() {
                Some(id) => {
                    if let Some(item) = self.canvas.item_mut(id) {
                        self.controller.cancel(item);
                    }
                }
                None => self.canvas.select(None),
            }
        }

        // Only process if no text field is focused
        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace))
        {
            self.delete_selected();
        }

        self.handle_canvas_events();

        if ctx.input(|i| i.viewport().close_requested()) {
            self.save_settings(ctx);
        }
    }
}
