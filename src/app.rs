use std::fmt::Write as _;

use egui::{
    Align, Color32, CornerRadius, Key, Layout, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2,
    pos2, vec2,
};

use crate::codegen::{self, SketchOptions};
use crate::config::EditorConfig;
use crate::db::{Circuit, Part, PartId, PartKind};
use crate::drag::Drag;
use crate::pins::{self, PinSpace};
use crate::simulator::{SimulationState, Simulator};

pub const PALETTE_BUTTON_SIZE: Vec2 = vec2(140.0, 40.0);
pub const INSPECTOR_WIDTH: f32 = 240.0;
pub const CODE_VIEW_WIDTH: f32 = 420.0;

pub const GRID_SIZE: f32 = 20.0;
pub const COLOR_GRID_LIGHT: Color32 = Color32::from_rgb(230, 230, 230);
pub const COLOR_GRID_DARK: Color32 = Color32::from_rgb(40, 40, 40);

pub const COLOR_SELECTION_HIGHLIGHT: Color32 = Color32::from_rgb(90, 160, 255);
pub const COLOR_HOVER_OUTLINE: Color32 = Color32::GRAY;
pub const COLOR_DROP_PREVIEW: Color32 = Color32::from_rgba_premultiplied(40, 80, 140, 120);
pub const COLOR_NOTICE: Color32 = Color32::from_rgb(230, 160, 40);

pub const PART_CORNER_RADIUS: u8 = 6;
pub const OUTLINE_THICKNESS: f32 = 2.0;
pub const HEADER_INSET: f32 = 10.0;

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct App {
    // Only these toggles survive a restart
    pub show_code: bool,
    pub show_debug: bool,

    #[serde(skip)]
    pub config: EditorConfig,
    #[serde(skip)]
    pub circuit: Circuit,
    #[serde(skip)]
    pub simulator: Simulator,
    #[serde(skip)]
    pub selected: Option<PartId>,
    #[serde(skip)]
    pub hovered: Option<PartId>,
    #[serde(skip)]
    pub drag: Option<Drag>,
    /// Last pin warning or rejection, shown in the inspector.
    #[serde(skip)]
    pub notice: Option<String>,
    /// Screen rect of the canvas in the last frame. Canvas coordinates are relative to its corner.
    #[serde(skip)]
    pub canvas_rect: Rect,
}

impl Default for App {
    fn default() -> Self {
        let config = EditorConfig::default();
        let circuit = Circuit::new(config.pin_space);
        Self {
            show_code: false,
            show_debug: false,
            config,
            circuit,
            simulator: Simulator::new(),
            selected: None,
            hovered: None,
            drag: None,
            notice: None,
            canvas_rect: Rect::NOTHING,
        }
    }
}

impl eframe::App for App {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::left("palette")
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_palette(ui);
            });

        if self.show_code {
            egui::SidePanel::right("code_view")
                .default_width(CODE_VIEW_WIDTH)
                .resizable(true)
                .show(ctx, |ui| {
                    self.draw_code_view(ui);
                });
        }

        egui::SidePanel::right("inspector")
            .exact_width(INSPECTOR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_inspector(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        if self.show_debug {
            let mut open = true;
            egui::Window::new("Debug")
                .open(&mut open)
                .default_width(360.0)
                .show(ctx, |ui| {
                    egui_logger::logger_ui().show(ui);
                    ui.separator();
                    let mut dbg = self.debug_string();
                    egui::ScrollArea::vertical()
                        .id_salt("debug_state")
                        .max_height(240.0)
                        .show(ui, |ui| {
                            ui.add(egui::TextEdit::multiline(&mut dbg).code_editor());
                        });
                });
            self.show_debug = open;
        }

        self.handle_pointer(ctx);
        self.handle_deletion(ctx);
    }
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Place a part dropped from the palette and select it.
    pub fn drop_part(&mut self, kind: PartKind, pos: Pos2) -> PartId {
        let placed = self.circuit.add_part(kind, pos);
        self.notice = placed.warning.map(|w| w.to_string());
        self.selected = Some(placed.id);
        placed.id
    }

    pub fn delete_part(&mut self, id: PartId) {
        self.circuit.remove_part(id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.drag = None;
        self.notice = None;
    }

    pub fn assign_pin(&mut self, id: PartId, pin: u8) {
        match self.circuit.set_pin(id, pin) {
            Ok(()) => {
                log::info!("part {id} moved to pin {pin}");
                self.notice = None;
            }
            Err(e) => {
                log::warn!("pin change rejected: {e}");
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn toggle_simulation(&mut self) {
        if self.simulator.toggle() == SimulationState::Running {
            self.selected = None;
            self.drag = None;
        }
    }

    pub fn clear(&mut self) {
        self.circuit.clear();
        self.simulator.stop();
        self.selected = None;
        self.hovered = None;
        self.drag = None;
        self.notice = None;
    }

    pub fn sketch(&self) -> String {
        codegen::generate_with(
            &self.circuit,
            &SketchOptions {
                baud_rate: self.config.baud_rate,
            },
        )
    }

    fn draw_toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("pinboard");
            ui.add_space(16.0);

            let run_label = if self.simulator.is_running() {
                "⏹ Stop"
            } else {
                "▶ Run"
            };
            if ui.button(run_label).clicked() {
                self.toggle_simulation();
            }
            ui.toggle_value(&mut self.show_code, "</> Code");
            ui.add_space(16.0);

            if ui
                .add_enabled(!self.simulator.is_running(), egui::Button::new("Clear"))
                .clicked()
            {
                self.clear();
            }
            if ui.button("Export sketch").clicked()
                && let Err(e) = self.export_sketch()
            {
                log::error!("Failed to export sketch: {e}");
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                egui::widgets::global_theme_preference_buttons(ui);
                ui.add_space(16.0);
                ui.checkbox(&mut self.show_debug, "Debug");
            });
        });
    }

    fn draw_palette(&mut self, ui: &mut Ui) {
        ui.heading("Parts");
        ui.add_space(8.0);
        let editable = !self.simulator.is_running();
        for kind in PartKind::ALL {
            let resp = ui.add_enabled(
                editable,
                egui::Button::new(kind.to_string())
                    .sense(Sense::click_and_drag())
                    .min_size(PALETTE_BUTTON_SIZE),
            );
            if resp.drag_started() {
                self.drag = Some(Drag::Palette { kind });
            }
            ui.add_space(8.0);
        }
        ui.label("drag a part onto the canvas");
    }

    fn draw_inspector(&mut self, ui: &mut Ui) {
        ui.heading("Inspector");
        ui.separator();

        let Some(part) = self.selected.and_then(|id| self.circuit.find_part(id)).cloned() else {
            ui.label("No Selection");
            ui.small("Select a component to edit its properties.");
            return;
        };

        ui.label("ID");
        ui.monospace(part.id.to_string());
        ui.add_space(8.0);
        ui.label("Type");
        ui.strong(part.kind.to_string());
        ui.add_space(8.0);

        if part.kind.takes_pin() {
            ui.label("Digital Pin");
            let choices = pins::pin_choices(&self.circuit, self.circuit.pin_space(), part.id);
            let selected_text = part
                .pin
                .map(|p| format!("Pin {p}"))
                .unwrap_or_else(|| "Select Pin...".to_owned());
            let mut picked = None;
            egui::ComboBox::from_id_salt("pin_select")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for choice in choices {
                        let text = if choice.available {
                            format!("Pin {}", choice.pin)
                        } else {
                            format!("Pin {} (Used)", choice.pin)
                        };
                        let resp = ui.add_enabled_ui(choice.available, |ui| {
                            ui.selectable_label(part.pin == Some(choice.pin), text)
                        });
                        if resp.inner.clicked() {
                            picked = Some(choice.pin);
                        }
                    }
                });
            if let Some(pin) = picked {
                self.assign_pin(part.id, pin);
            }
            ui.small("Connects to the Arduino board.");
            ui.add_space(8.0);
        }

        if let Some(notice) = &self.notice {
            ui.colored_label(COLOR_NOTICE, notice);
            ui.add_space(8.0);
        }

        if ui
            .add_enabled(!self.simulator.is_running(), egui::Button::new("Delete"))
            .clicked()
        {
            self.delete_part(part.id);
        }
    }

    fn draw_code_view(&mut self, ui: &mut Ui) {
        let code = self.sketch();
        ui.horizontal(|ui| {
            ui.heading("sketch.ino");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("Export").clicked()
                    && let Err(e) = self.export_sketch()
                {
                    log::error!("Failed to export sketch: {e}");
                }
                if ui.button("Copy").clicked() {
                    ui.ctx().copy_text(code.clone());
                }
            });
        });
        ui.separator();

        let theme = egui_extras::syntax_highlighting::CodeTheme::from_memory(ui.ctx(), ui.style());
        let job =
            egui_extras::syntax_highlighting::highlight(ui.ctx(), ui.style(), &theme, &code, "cpp");
        egui::ScrollArea::both()
            .id_salt("code_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add(egui::Label::new(job).selectable(true).extend());
            });
    }

    fn draw_canvas(&mut self, ui: &mut Ui) {
        let resp = ui.allocate_response(ui.available_size(), Sense::click());
        self.canvas_rect = resp.rect;
        ui.set_clip_rect(self.canvas_rect);

        Self::draw_grid(ui, self.canvas_rect);

        if resp.clicked() && !self.simulator.is_running() {
            self.selected = None;
        }

        if let Some(controller) = self.circuit.first_controller().cloned() {
            self.draw_wires(ui, &controller);
        }

        self.hovered = None;
        let mut any_button_held = false;
        for id in self.circuit.ids() {
            any_button_held |= self.draw_part(ui, id);
        }
        self.simulator.set_button_held(any_button_held);

        if self.circuit.is_empty() {
            ui.painter().text(
                self.canvas_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Drop parts here",
                egui::FontId::proportional(18.0),
                Color32::GRAY,
            );
        }
    }

    fn draw_grid(ui: &Ui, canvas_rect: Rect) {
        let grid_color = if ui.visuals().dark_mode {
            COLOR_GRID_DARK
        } else {
            COLOR_GRID_LIGHT
        };
        let painter = ui.painter();

        let mut x = canvas_rect.left();
        while x <= canvas_rect.right() {
            painter.line_segment(
                [pos2(x, canvas_rect.top()), pos2(x, canvas_rect.bottom())],
                Stroke::new(1.0, grid_color),
            );
            x += GRID_SIZE;
        }
        let mut y = canvas_rect.top();
        while y <= canvas_rect.bottom() {
            painter.line_segment(
                [pos2(canvas_rect.left(), y), pos2(canvas_rect.right(), y)],
                Stroke::new(1.0, grid_color),
            );
            y += GRID_SIZE;
        }
    }

    /// Lines from every wired LED and button to its header pin on the board.
    fn draw_wires(&self, ui: &Ui, controller: &Part) {
        let space = self.circuit.pin_space();
        let stroke = Stroke::new(
            self.config.canvas.wire_thickness,
            self.config.canvas.wire_color,
        );
        for part in self.circuit.parts() {
            let Some(pin) = part.pin else {
                continue;
            };
            let from = self.to_screen(part.rect().center_top());
            let to = self.to_screen(header_point(controller, space, pin));
            ui.painter().line_segment([from, to], stroke);
            ui.painter().text(
                from.lerp(to, 0.5),
                egui::Align2::LEFT_BOTTOM,
                format!("D{pin}"),
                egui::FontId::monospace(11.0),
                self.config.canvas.wire_color,
            );
        }
    }

    /// Draws one part and handles its pointer input. Returns true if it's a
    /// button being held down during simulation.
    fn draw_part(&mut self, ui: &mut Ui, id: PartId) -> bool {
        let Some(part) = self.circuit.find_part(id).cloned() else {
            return false;
        };
        let rect = part.rect().translate(self.canvas_rect.min.to_vec2());
        let resp = ui.interact(rect, egui::Id::new(("part", id)), Sense::click_and_drag());
        let running = self.simulator.is_running();
        let held = running && part.kind == PartKind::Button && resp.is_pointer_button_down_on();

        if resp.hovered() {
            self.hovered = Some(id);
        }
        if !running {
            if resp.clicked() {
                self.selected = Some(id);
            }
            if resp.drag_started()
                && let Some(mouse) = self.mouse_pos_canvas(ui.ctx())
            {
                self.selected = Some(id);
                self.drag = Some(Drag::Move {
                    id,
                    offset: part.pos - mouse,
                });
            }
        }

        self.paint_part(ui, &part, rect, held);

        if !running && self.selected == Some(id) {
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(PART_CORNER_RADIUS),
                Stroke::new(OUTLINE_THICKNESS, COLOR_SELECTION_HIGHLIGHT),
                StrokeKind::Outside,
            );
            self.draw_resize_handle(ui, id, rect);
        } else if self.hovered == Some(id) && self.drag.is_none() {
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(PART_CORNER_RADIUS),
                Stroke::new(OUTLINE_THICKNESS, COLOR_HOVER_OUTLINE),
                StrokeKind::Outside,
            );
        }

        held
    }

    fn paint_part(&self, ui: &Ui, part: &Part, rect: Rect, held: bool) {
        let colors = &self.config.canvas;
        let painter = ui.painter();
        let radius = CornerRadius::same(PART_CORNER_RADIUS);
        let text_color = Color32::WHITE;

        match part.kind {
            PartKind::Controller => {
                painter.rect_filled(rect, radius, colors.controller_color);
                let space = self.circuit.pin_space();
                for pin in space.iter() {
                    let p = self.to_screen(header_point(part, space, pin));
                    painter.rect_filled(
                        Rect::from_center_size(p, vec2(6.0, 6.0)),
                        CornerRadius::ZERO,
                        Color32::BLACK,
                    );
                    painter.text(
                        p + vec2(0.0, 6.0),
                        egui::Align2::CENTER_TOP,
                        pin.to_string(),
                        egui::FontId::monospace(8.0),
                        text_color,
                    );
                }
            }
            PartKind::Led => {
                painter.rect_filled(rect, radius, colors.button_color);
                let lit = self.simulator.led_on();
                let color = if lit {
                    colors.led_on_color
                } else {
                    colors.led_off_color
                };
                let r = rect.width().min(rect.height()) * 0.3;
                if lit {
                    painter.circle_filled(
                        rect.center(),
                        r * 1.6,
                        colors.led_on_color.gamma_multiply(0.3),
                    );
                }
                painter.circle_filled(rect.center(), r, color);
            }
            PartKind::Button => {
                painter.rect_filled(rect, radius, colors.button_color);
                let color = if held {
                    colors.button_pressed_color
                } else {
                    Color32::DARK_GRAY
                };
                let r = rect.width().min(rect.height()) * 0.25;
                painter.circle_filled(rect.center(), r, color);
            }
        }

        let caption = match (part.kind.takes_pin(), part.pin) {
            (true, Some(pin)) => format!("{} · D{pin}", part.kind),
            (true, None) => format!("{} · no pin", part.kind),
            (false, _) => part.kind.to_string(),
        };
        painter.text(
            rect.center_bottom() - vec2(0.0, 4.0),
            egui::Align2::CENTER_BOTTOM,
            caption,
            egui::FontId::proportional(12.0),
            text_color,
        );
    }

    fn draw_resize_handle(&mut self, ui: &mut Ui, id: PartId, rect: Rect) {
        let size = self.config.canvas.resize_handle_size;
        let handle = Rect::from_center_size(rect.right_bottom(), Vec2::splat(size));
        let resp = ui.interact(handle, egui::Id::new(("resize", id)), Sense::drag());
        ui.painter()
            .rect_filled(handle, CornerRadius::ZERO, COLOR_SELECTION_HIGHLIGHT);
        if resp.drag_started() {
            self.drag = Some(Drag::Resize { id });
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context) {
        if self.drag.is_none() {
            return;
        }
        let Some(mouse) = self.mouse_pos_canvas(ctx) else {
            return;
        };
        self.handle_dragging(ctx, mouse);
        if ctx.input(|i| i.pointer.any_released()) {
            self.handle_drag_end(mouse);
        }
    }

    fn handle_deletion(&mut self, ctx: &egui::Context) {
        if self.simulator.is_running() || ctx.wants_keyboard_input() {
            return;
        }
        let pressed = ctx.input(|i| i.key_pressed(Key::Delete) || i.key_pressed(Key::Backspace));
        if pressed && let Some(id) = self.selected {
            self.delete_part(id);
        }
    }

    fn debug_string(&self) -> String {
        let mut out = String::new();
        writeln!(out, "selected: {:?}", self.selected).ok();
        writeln!(out, "hovered: {:?}", self.hovered).ok();
        writeln!(out, "drag: {:?}", self.drag).ok();
        writeln!(out, "canvas: {:?}", self.canvas_rect).ok();

        writeln!(out, "\n=== Simulation ===").ok();
        writeln!(out, "state: {:?}", self.simulator.state()).ok();
        writeln!(out, "button held: {}", self.simulator.button_held()).ok();
        writeln!(out, "led on: {}", self.simulator.led_on()).ok();

        writeln!(out, "\n").ok();
        out.push_str(&self.circuit.display());
        out
    }

    pub fn to_screen(&self, canvas_pos: Pos2) -> Pos2 {
        canvas_pos + self.canvas_rect.min.to_vec2()
    }

    fn mouse_pos_canvas(&self, ctx: &egui::Context) -> Option<Pos2> {
        ctx.pointer_interact_pos()
            .map(|p| p - self.canvas_rect.min.to_vec2())
    }
}

/// Where `pin` sits on the controller's header strip, in canvas coordinates.
pub fn header_point(controller: &Part, space: PinSpace, pin: u8) -> Pos2 {
    let slots = space.len().max(1) as f32;
    let index = f32::from(pin.saturating_sub(space.first));
    let rect = controller.rect();
    pos2(
        rect.left() + rect.width() * (index + 0.5) / slots,
        rect.top() + HEADER_INSET,
    )
}
