// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layout canvas view.
//!
//! Draws the canvas, its grid and the placed images, and forwards pointer
//! gestures to the interaction controller. Canvas coordinates are mapped
//! to the screen with a fit-to-panel scale times the user zoom.

use std::collections::HashMap;
use texlayout::interaction::{Corner, InteractionController, HANDLE_SIZE};
use texlayout::models::canvas::Canvas;
use texlayout::models::placed_image::{ItemId, Placeable};
use texlayout::util::geometry::{Point, Rect};

/// Per-item texture slot; `None` while decoding or after a failed load.
pub type TextureCache = HashMap<ItemId, Option<egui::TextureHandle>>;

const HANDLE_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 120, 215);

/// User-controlled view state.
pub struct ViewState {
    pub zoom: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    Selected(Option<ItemId>),
    Moved(ItemId),
}

/// Mapping between canvas pixels and screen points.
struct Viewport {
    origin: egui::Pos2,
    scale: f32,
}

impl Viewport {
    fn to_screen(&self, p: Point) -> egui::Pos2 {
        egui::pos2(
            self.origin.x + p.x as f32 * self.scale,
            self.origin.y + p.y as f32 * self.scale,
        )
    }

    fn rect_to_screen(&self, r: &Rect) -> egui::Rect {
        egui::Rect::from_min_max(self.to_screen(r.min), self.to_screen(r.max))
    }

    fn to_canvas(&self, pos: egui::Pos2) -> Point {
        Point::new(
            ((pos.x - self.origin.x) / self.scale) as f64,
            ((pos.y - self.origin.y) / self.scale) as f64,
        )
    }
}

/// Display the canvas and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    canvas: &mut Canvas,
    controller: &mut InteractionController,
    textures: &TextureCache,
    view: &mut ViewState,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    let area = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(area, egui::Sense::click_and_drag());

    // Ctrl+scroll / pinch zoom
    if response.hovered() {
        let zoom_delta = ui.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            view.zoom = (view.zoom * zoom_delta).clamp(0.05, 20.0);
        }
    }

    let (cw, ch) = (canvas.width() as f32, canvas.height() as f32);
    let fit = (area.width() / cw).min(area.height() / ch);
    let scale = (fit * view.zoom).max(f32::EPSILON);
    let size = egui::vec2(cw * scale, ch * scale);
    let viewport = Viewport {
        origin: area.center() - size / 2.0,
        scale,
    };
    // Keep handles a constant size on screen.
    controller.set_handle_size(HANDLE_SIZE / scale as f64);

    handle_pointer(ui, &response, canvas, controller, &viewport, &mut action);

    let painter = ui.painter_at(area);
    painter.rect_filled(area, 0.0, egui::Color32::from_gray(40));
    let canvas_rect = egui::Rect::from_min_size(viewport.origin, size);
    painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(240));

    for item in canvas.items_by_z() {
        if !item.is_visible() {
            continue;
        }
        let rect = viewport.rect_to_screen(&item.bounding_box());
        match textures.get(&item.id()) {
            Some(Some(texture)) => {
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            _ => {
                painter.rect_filled(rect, 0.0, egui::Color32::from_gray(180));
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    &item.material_name,
                    egui::FontId::proportional(12.0),
                    egui::Color32::BLACK,
                );
            }
        }
    }

    draw_grid(&painter, canvas, &viewport);
    painter.rect_stroke(canvas_rect, 0.0, egui::Stroke::new(1.0, egui::Color32::BLACK));

    if let Some(item) = canvas.selected().and_then(|id| canvas.item(id)) {
        draw_selection(&painter, item, &viewport, controller.handle_size() as f32 * scale);
    }

    action
}

fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    canvas: &mut Canvas,
    controller: &mut InteractionController,
    viewport: &Viewport,
    action: &mut CanvasAction,
) {
    if response.drag_started() {
        let start = ui
            .input(|i| i.pointer.press_origin())
            .or(response.interact_pointer_pos());
        if let Some(pos) = start {
            let p = viewport.to_canvas(pos);
            // Handles of the selected item take priority; they stick out
            // past the item's edges.
            let target = canvas
                .selected()
                .filter(|id| {
                    canvas
                        .item(*id)
                        .is_some_and(|item| controller.handle_at_canvas(item, p).is_some())
                })
                .or_else(|| canvas.item_at(p));
            if target != canvas.selected() {
                canvas.select(target);
                *action = CanvasAction::Selected(target);
            }
            // A gesture whose release was never seen is abandoned.
            if let Some(stale) = controller.active_item().filter(|id| Some(*id) != target) {
                match canvas.item_mut(stale) {
                    Some(item) => controller.cancel(item),
                    None => *controller = InteractionController::new(),
                }
            }
            if let Some(item) = target.and_then(|id| canvas.item_mut(id)) {
                controller.begin(item, p);
            }
        }
    }

    if let Some(id) = controller.active_item() {
        let pointer = response.interact_pointer_pos().map(|pos| viewport.to_canvas(pos));
        if let (Some(item), Some(p)) = (canvas.item_mut(id), pointer) {
            if response.drag_stopped() {
                controller.end(item, p);
                *action = CanvasAction::Moved(id);
            } else if response.dragged() {
                controller.update(item, p);
            }
        } else if response.drag_stopped() {
            if let Some(item) = canvas.item_mut(id) {
                controller.cancel(item);
            }
        }
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let target = canvas.item_at(viewport.to_canvas(pos));
            canvas.select(target);
            *action = CanvasAction::Selected(target);
        }
    }

    if let Some(hover) = response.hover_pos() {
        let p = viewport.to_canvas(hover);
        let corner = controller.kind().and_then(|kind| match kind {
            texlayout::GestureKind::Resize(corner) => Some(corner),
            texlayout::GestureKind::Drag => None,
        });
        let corner = corner.or_else(|| {
            canvas
                .selected()
                .and_then(|id| canvas.item(id))
                .and_then(|item| controller.handle_at_canvas(item, p))
        });
        match corner {
            Some(Corner::TopLeft) | Some(Corner::BottomRight) => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeNwSe)
            }
            Some(Corner::TopRight) | Some(Corner::BottomLeft) => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeNeSw)
            }
            None if controller.active_item().is_some() => {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing)
            }
            None => {}
        }
    }
}

fn draw_grid(painter: &egui::Painter, canvas: &Canvas, viewport: &Viewport) {
    let grid = canvas.grid();
    if !grid.visible {
        return;
    }
    let [r, g, b, a] = grid.line_color;
    let stroke = egui::Stroke::new(grid.line_width, egui::Color32::from_rgba_unmultiplied(r, g, b, a));
    let (w, h) = (canvas.width(), canvas.height());

    for x in grid.line_positions(w) {
        painter.line_segment(
            [viewport.to_screen(Point::new(x, 0.0)), viewport.to_screen(Point::new(x, h))],
            stroke,
        );
    }
    for y in grid.line_positions(h) {
        painter.line_segment(
            [viewport.to_screen(Point::new(0.0, y)), viewport.to_screen(Point::new(w, y))],
            stroke,
        );
    }
}

/// Dashed outline plus the four corner handles.
fn draw_selection(
    painter: &egui::Painter,
    item: &texlayout::PlacedImage,
    viewport: &Viewport,
    handle_px: f32,
) {
    let bounds = item.bounding_box();
    let rect = viewport.rect_to_screen(&bounds);
    let outline = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(egui::Shape::dashed_line(
        &outline,
        egui::Stroke::new(2.0, HANDLE_COLOR),
        6.0,
        4.0,
    ));

    for corner in Corner::ALL {
        let center = viewport.to_screen(corner.of(&bounds));
        painter.rect_filled(
            egui::Rect::from_center_size(center, egui::vec2(handle_px, handle_px)),
            0.0,
            HANDLE_COLOR,
        );
    }
}
