// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with canvas size and grid controls.

use texlayout::models::canvas::GridUpdate;
use texlayout::models::grid::{GridMode, GridModel, MAX_PERCENT, MIN_PERCENT};

/// Pending edits that are only applied on request.
pub struct ToolbarState {
    pub canvas_width: f64,
    pub canvas_height: f64,
}

/// Actions requested from the toolbar.
pub enum ToolbarAction {
    None,
    AddImages,
    ResizeCanvas { width: f64, height: f64 },
    UpdateGrid(GridUpdate),
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, grid: &GridModel, state: &mut ToolbarState) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("➕ Add Image").clicked() {
            action = ToolbarAction::AddImages;
        }

        ui.separator();

        ui.label("Canvas:");
        ui.add(
            egui::DragValue::new(&mut state.canvas_width)
                .speed(1.0)
                .clamp_range(1.0..=16384.0),
        );
        ui.label("×");
        ui.add(
            egui::DragValue::new(&mut state.canvas_height)
                .speed(1.0)
                .clamp_range(1.0..=16384.0),
        );
        if ui.button("Apply").clicked() {
            action = ToolbarAction::ResizeCanvas {
                width: state.canvas_width,
                height: state.canvas_height,
            };
        }

        ui.separator();

        let mut visible = grid.visible;
        if ui.checkbox(&mut visible, "Grid").changed() {
            action = ToolbarAction::UpdateGrid(GridUpdate {
                visible: Some(visible),
                ..Default::default()
            });
        }

        let mut snap = grid.snap_enabled;
        if ui.checkbox(&mut snap, "Snap").changed() {
            action = ToolbarAction::UpdateGrid(GridUpdate {
                snap_enabled: Some(snap),
                ..Default::default()
            });
        }

        let mut mode = grid.mode();
        egui::ComboBox::from_id_source("grid_mode")
            .selected_text(mode_label(mode))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut mode, GridMode::Pixels, mode_label(GridMode::Pixels));
                ui.selectable_value(
                    &mut mode,
                    GridMode::PercentOfWidth,
                    mode_label(GridMode::PercentOfWidth),
                );
            });
        if mode != grid.mode() {
            action = ToolbarAction::UpdateGrid(GridUpdate {
                mode: Some(mode),
                ..Default::default()
            });
        }

        let mut spacing = grid.spacing().value();
        let drag = match grid.mode() {
            GridMode::Pixels => egui::DragValue::new(&mut spacing)
                .speed(1.0)
                .clamp_range(1.0..=4096.0)
                .suffix(" px"),
            GridMode::PercentOfWidth => egui::DragValue::new(&mut spacing)
                .speed(0.5)
                .clamp_range(MIN_PERCENT..=MAX_PERCENT)
                .suffix(" %"),
        };
        if ui.add(drag).changed() {
            action = ToolbarAction::UpdateGrid(GridUpdate {
                spacing: Some(spacing),
                ..Default::default()
            });
        }
    });

    action
}

fn mode_label(mode: GridMode) -> &'static str {
    match mode {
        GridMode::Pixels => "Pixels",
        GridMode::PercentOfWidth => "% of width",
    }
}
