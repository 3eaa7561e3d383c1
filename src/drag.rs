use egui::{Color32, CornerRadius, Id, LayerId, Order, Pos2, Rect, Stroke, StrokeKind, Vec2};

use crate::app::{App, COLOR_DROP_PREVIEW};
use crate::db::{PartId, PartKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drag {
    /// Dragging a new part out of the palette. Nothing exists until it's dropped.
    Palette { kind: PartKind },
    Move {
        id: PartId,
        /// Part origin relative to the pointer.
        offset: Vec2,
    },
    Resize {
        id: PartId,
    },
}

impl App {
    /// `mouse` is in canvas coordinates.
    pub fn handle_dragging(&mut self, ctx: &egui::Context, mouse: Pos2) {
        match self.drag {
            Some(Drag::Palette { kind }) => self.draw_drop_preview(ctx, kind, mouse),
            Some(Drag::Move { id, offset }) => {
                if !self.circuit.move_part(id, mouse + offset) {
                    // Deleted mid-drag
                    self.drag = None;
                }
            }
            Some(Drag::Resize { id }) => {
                let Some(part) = self.circuit.find_part(id) else {
                    self.drag = None;
                    return;
                };
                let pos = part.pos;
                self.circuit.resize_part(id, mouse - pos, pos);
            }
            None => {}
        }
    }

    pub fn handle_drag_end(&mut self, mouse: Pos2) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        match drag {
            Drag::Palette { kind } => {
                let size = kind.default_size();
                let pos = mouse - size / 2.0;
                if self.canvas_rect.contains(self.to_screen(mouse)) {
                    self.drop_part(kind, pos);
                }
            }
            Drag::Move { .. } | Drag::Resize { .. } => {}
        }
    }

    fn draw_drop_preview(&self, ctx: &egui::Context, kind: PartKind, mouse: Pos2) {
        let painter = ctx.layer_painter(LayerId::new(Order::Tooltip, Id::new("drop_preview")));
        let rect = Rect::from_center_size(self.to_screen(mouse), kind.default_size());
        painter.rect_filled(rect, CornerRadius::same(6), COLOR_DROP_PREVIEW);
        painter.rect_stroke(
            rect,
            CornerRadius::same(6),
            Stroke::new(1.5, Color32::LIGHT_BLUE),
            StrokeKind::Outside,
        );
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            kind.to_string(),
            egui::FontId::default(),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use egui::{pos2, vec2};

    use super::*;

    fn app_with_canvas() -> App {
        let mut app = App::default();
        app.canvas_rect = Rect::from_min_size(pos2(100.0, 50.0), vec2(800.0, 600.0));
        app
    }

    #[test]
    fn palette_drop_inside_canvas_adds_centered_part() {
        let mut app = app_with_canvas();
        app.drag = Some(Drag::Palette {
            kind: PartKind::Led,
        });
        app.handle_drag_end(pos2(200.0, 200.0));

        assert!(app.drag.is_none());
        let part = app.circuit.parts().next().cloned();
        assert_eq!(part.as_ref().map(|p| p.pos), Some(pos2(160.0, 160.0)));
        assert_eq!(app.selected, part.map(|p| p.id));
    }

    #[test]
    fn palette_drop_outside_canvas_is_discarded() {
        let mut app = app_with_canvas();
        app.drag = Some(Drag::Palette {
            kind: PartKind::Button,
        });
        app.handle_drag_end(pos2(-500.0, 10.0));
        assert!(app.circuit.is_empty());
    }

    #[test]
    fn move_and_resize_follow_pointer() {
        let mut app = app_with_canvas();
        let id = app.drop_part(PartKind::Controller, pos2(0.0, 0.0));
        let ctx = egui::Context::default();

        app.drag = Some(Drag::Move {
            id,
            offset: vec2(-10.0, -10.0),
        });
        app.handle_dragging(&ctx, pos2(60.0, 70.0));
        assert_eq!(app.circuit.find_part(id).map(|p| p.pos), Some(pos2(50.0, 60.0)));

        app.drag = Some(Drag::Resize { id });
        app.handle_dragging(&ctx, pos2(350.0, 260.0));
        assert_eq!(
            app.circuit.find_part(id).map(|p| p.size),
            Some(vec2(300.0, 200.0))
        );
    }

    #[test]
    fn dragging_a_deleted_part_cancels() {
        let mut app = app_with_canvas();
        let id = app.drop_part(PartKind::Led, pos2(0.0, 0.0));
        app.circuit.remove_part(id);
        app.drag = Some(Drag::Move {
            id,
            offset: Vec2::ZERO,
        });
        app.handle_dragging(&egui::Context::default(), pos2(5.0, 5.0));
        assert!(app.drag.is_none());
        assert!(app.circuit.is_empty());
    }
}
