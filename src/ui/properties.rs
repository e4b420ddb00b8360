// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image properties panel.
//!
//! Shows the layer list and lets the user edit the selected image's
//! material name, mesh index, position, size and rotation.

use texlayout::models::canvas::Canvas;
use texlayout::models::placed_image::{ItemId, Placeable, PlacedImage};
use texlayout::util::geometry::Point;

/// Actions that can be triggered from the properties panel.
pub enum PropertiesAction {
    None,
    Select(ItemId),
    Delete(ItemId),
    SetVisible(ItemId, bool),
    BringToFront(ItemId),
    SendToBack(ItemId),
    SetMaterial(ItemId, String),
    SetMeshIndex(ItemId, u32),
    /// `commit` is set once the edit is finished (drag released or focus
    /// lost); only then is the value snapped to the grid.
    SetPosition { id: ItemId, position: Point, commit: bool },
    SetSize { id: ItemId, width: f64, height: f64, commit: bool },
    SetRotation(ItemId, f64),
}

/// Display the properties panel.
pub fn show(ui: &mut egui::Ui, canvas: &Canvas) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Properties");
    ui.separator();

    match canvas.selected().and_then(|id| canvas.item(id)) {
        Some(item) => item_properties(ui, item, &mut action),
        None => {
            ui.label(egui::RichText::new("No image selected").italics().weak());
        }
    }

    ui.separator();
    ui.heading(format!("Layers ({})", canvas.len()));

    egui::ScrollArea::vertical().show(ui, |ui| {
        // Topmost first
        for item in canvas.items_by_z().into_iter().rev() {
            let id = item.id();
            ui.horizontal(|ui| {
                let mut visible = item.visible;
                if ui.checkbox(&mut visible, "").changed() {
                    action = PropertiesAction::SetVisible(id, visible);
                }
                let selected = canvas.selected() == Some(id);
                let label = format!("{} (mesh {})", item.material_name, item.mesh_index);
                if ui.selectable_label(selected, label).clicked() {
                    action = PropertiesAction::Select(id);
                }
            });
        }
    });

    action
}

fn item_properties(ui: &mut egui::Ui, item: &PlacedImage, action: &mut PropertiesAction) {
    let id = item.id();

    ui.label(egui::RichText::new(&item.filepath).small().weak());
    ui.label(format!(
        "Native size: {} × {}",
        item.native_width(),
        item.native_height()
    ));

    egui::Grid::new("image_properties")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Material:");
            let mut material = item.material_name.clone();
            let response = ui.text_edit_singleline(&mut material);
            if response.changed() {
                *action = PropertiesAction::SetMaterial(id, material);
            }
            ui.end_row();

            ui.label("Mesh index:");
            let mut mesh_index = item.mesh_index;
            if ui
                .add(egui::DragValue::new(&mut mesh_index).speed(0.1))
                .changed()
            {
                *action = PropertiesAction::SetMeshIndex(id, mesh_index);
            }
            ui.end_row();

            let position = item.position();
            let (mut x, mut y) = (position.x, position.y);
            ui.label("Position:");
            ui.horizontal(|ui| {
                let edits = [
                    ui.add(egui::DragValue::new(&mut x).speed(1.0).prefix("x ")),
                    ui.add(egui::DragValue::new(&mut y).speed(1.0).prefix("y ")),
                ];
                if let Some(commit) = edit_state(&edits) {
                    *action = PropertiesAction::SetPosition {
                        id,
                        position: Point::new(x, y),
                        commit,
                    };
                }
            });
            ui.end_row();

            let (mut w, mut h) = item.effective_size();
            ui.label("Size:");
            ui.horizontal(|ui| {
                let edits = [
                    ui.add(
                        egui::DragValue::new(&mut w)
                            .speed(1.0)
                            .clamp_range(1.0..=16384.0)
                            .prefix("w "),
                    ),
                    ui.add(
                        egui::DragValue::new(&mut h)
                            .speed(1.0)
                            .clamp_range(1.0..=16384.0)
                            .prefix("h "),
                    ),
                ];
                if let Some(commit) = edit_state(&edits) {
                    *action = PropertiesAction::SetSize {
                        id,
                        width: w,
                        height: h,
                        commit,
                    };
                }
            });
            ui.end_row();

            let mut rotation = item.rotation();
            ui.label("Rotation:");
            if ui
                .add(egui::DragValue::new(&mut rotation).speed(1.0).suffix("°"))
                .changed()
            {
                *action = PropertiesAction::SetRotation(id, rotation);
            }
            ui.end_row();

            ui.label("Z-order:");
            ui.label(format!("{}", item.z_order));
            ui.end_row();
        });

    ui.horizontal(|ui| {
        if ui.button("Bring to Front").clicked() {
            *action = PropertiesAction::BringToFront(id);
        }
        if ui.button("Send to Back").clicked() {
            *action = PropertiesAction::SendToBack(id);
        }
    });

    if ui.button("🗑 Delete").clicked() {
        *action = PropertiesAction::Delete(id);
    }
}

/// `Some(false)` while a value is being edited, `Some(true)` when the edit
/// is finished, `None` when nothing happened.
fn edit_state(responses: &[egui::Response]) -> Option<bool> {
    let commit = responses
        .iter()
        .any(|r| r.drag_stopped() || r.lost_focus());
    let changed = responses.iter().any(|r| r.changed());
    (commit || changed).then_some(commit)
}
