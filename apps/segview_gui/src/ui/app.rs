use client_core::{
    controls::{DEFAULT_THRESHOLD, THRESHOLD_STEP},
    ConnectionHandle, ConnectionState, ScreenPoint, Session, SessionEvent,
};
use crossbeam_channel::Receiver;
use eframe::egui;
use shared::domain::{InteractionMode, PromptLabel};

use crate::{
    controller::{events::UiEvent, orchestration::sync_connection_state},
    ui::surface::TextureSurface,
};

pub struct SegViewApp {
    session: Session<TextureSurface, ConnectionHandle>,
    ui_rx: Receiver<UiEvent>,
    status: Option<String>,
}

impl SegViewApp {
    pub fn new(ctx: &egui::Context, connection: ConnectionHandle, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            session: Session::new(TextureSurface::new(ctx), connection),
            ui_rx,
            status: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event.into_session_event() {
                Ok(event) => self.session.handle(event),
                Err(message) => self.status = Some(message),
            }
        }
        sync_connection_state(&mut self.session);
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let mut pending = Vec::new();
        let controls = self.session.controls_mut();

        ui.horizontal_wrapped(|ui| {
            ui.label("Source");
            ui.add(egui::TextEdit::singleline(&mut controls.source).desired_width(180.0));
            if ui.button("Start").clicked() {
                pending.push(SessionEvent::StartClicked);
            }
            ui.separator();

            let mut mode = controls.mode;
            egui::ComboBox::from_id_salt("interaction_mode")
                .selected_text(mode.as_str())
                .show_ui(ui, |ui| {
                    for option in [InteractionMode::Text, InteractionMode::Interactive] {
                        ui.selectable_value(&mut mode, option, option.as_str());
                    }
                });
            if mode != controls.mode {
                pending.push(SessionEvent::ModeSelected(mode));
            }

            egui::ComboBox::from_id_salt("prompt_label")
                .selected_text(controls.label.display_name())
                .show_ui(ui, |ui| {
                    for option in [PromptLabel::Foreground, PromptLabel::Background] {
                        ui.selectable_value(&mut controls.label, option, option.display_name());
                    }
                });
            ui.separator();

            ui.label("Text prompt");
            let text = ui.add(
                egui::TextEdit::singleline(&mut controls.text_prompt)
                    .hint_text("e.g. person")
                    .desired_width(160.0),
            );
            if text.changed() {
                pending.push(SessionEvent::TextPromptEdited);
            }
            if ui.button("Clear").clicked() {
                pending.push(SessionEvent::ClearClicked);
            }
            ui.separator();

            let mask = ui.add(
                egui::Slider::new(&mut controls.mask_threshold, 0.0..=1.0)
                    .text("Mask")
                    .step_by(THRESHOLD_STEP)
                    .show_value(false),
            );
            if mask.changed() {
                pending.push(SessionEvent::MaskThresholdMoved);
            }
            ui.monospace(&controls.mask_threshold_readout);

            let mut score = controls.score_threshold.unwrap_or(DEFAULT_THRESHOLD);
            let score_slider = ui.add(
                egui::Slider::new(&mut score, 0.0..=1.0)
                    .text("Score")
                    .step_by(THRESHOLD_STEP),
            );
            if score_slider.changed() {
                controls.score_threshold = Some(score);
                pending.push(SessionEvent::ScoreThresholdMoved);
            }
        });

        for event in pending {
            self.session.handle(event);
        }
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        let stats = self.session.stats();
        ui.horizontal(|ui| {
            let state = self.session.connection();
            let color = match state {
                ConnectionState::Open => egui::Color32::from_rgb(80, 200, 120),
                ConnectionState::Connecting => egui::Color32::from_rgb(230, 180, 60),
                ConnectionState::Closed => egui::Color32::from_rgb(220, 80, 80),
            };
            ui.colored_label(color, format!("WS: {state}"));
            ui.separator();
            ui.label(format!("RGB FPS: {}", stats.rgb_fps));
            ui.label(format!("SEG FPS: {}", stats.seg_fps));
            ui.label(format!("Mode: {}", stats.mode));
            ui.label(&stats.prompt_status);
            if let Some(status) = &self.status {
                ui.separator();
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), status);
            }
        });
    }

    fn show_composite(&mut self, ui: &mut egui::Ui) {
        let surface = self.session.renderer().surface();
        let Some(texture) = surface.texture().map(|texture| texture.id()) else {
            ui.centered_and_justified(|ui| ui.label("Waiting for frames..."));
            return;
        };
        let pixels = surface.pixel_size();
        let available = ui.available_size();
        let scale = (available.x / pixels.x).min(available.y / pixels.y).max(0.0);

        let (rect, response) = ui.allocate_exact_size(pixels * scale, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.image(
            texture,
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if self.session.renderer_mut().surface_mut().place(rect) {
            self.session.handle(SessionEvent::SurfaceMoved);
        }

        self.handle_pointer(ui, &response);
        self.paint_overlay(&painter);
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let (pressed, released, position) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.interact_pos(),
            )
        });
        let Some(position) = position else {
            return;
        };
        let point = ScreenPoint::new(position.x, position.y);

        let on_panel = self
            .session
            .mapping()
            .is_some_and(|mapping| mapping.display_rect.contains(point));
        if pressed && response.hovered() && on_panel {
            self.session.handle(SessionEvent::PointerDown(point));
        }
        if released && self.session.gesture().is_some() {
            self.session.handle(SessionEvent::PointerUp(point));
        }
    }

    fn paint_overlay(&self, painter: &egui::Painter) {
        if self.session.controls().mode != InteractionMode::Interactive {
            return;
        }
        let Some(mapping) = self.session.mapping() else {
            return;
        };
        let panel = egui::Rect::from_min_size(
            egui::pos2(mapping.display_rect.left, mapping.display_rect.top),
            egui::vec2(mapping.display_rect.width, mapping.display_rect.height),
        );
        painter.rect_stroke(
            panel,
            egui::CornerRadius::ZERO,
            egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255)),
            egui::StrokeKind::Inside,
        );

        let Some(gesture) = self.session.gesture() else {
            return;
        };
        let Some(start) = mapping.to_screen(gesture.start) else {
            return;
        };
        let Some(current) = painter.ctx().pointer_latest_pos() else {
            return;
        };
        let preview = egui::Rect::from_two_pos(egui::pos2(start.x, start.y), panel.clamp(current));
        painter.rect_stroke(
            preview,
            egui::CornerRadius::ZERO,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 210, 60)),
            egui::StrokeKind::Middle,
        );
    }
}

impl eframe::App for SegViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("segview_controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_controls(ui);
            ui.add_space(2.0);
            self.show_status(ui);
            ui.add_space(4.0);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_composite(ui);
        });

        if self.session.gesture().is_some() {
            ctx.request_repaint();
        }
    }
}
