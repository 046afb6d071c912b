//! egui renderer for the classifier window.

use crate::egui_app::controller::ClassifierController;
use eframe::egui::{self, Color32, Frame, Margin, RichText, TextureHandle, TextureOptions, Ui};

/// Smallest window size that still fits the button, photo and label.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(360.0, 480.0);

/// Renders the UI from the controller's state.
pub struct EguiApp {
    controller: ClassifierController,
    notifier_installed: bool,
    photo_tex: Option<(u64, TextureHandle)>,
}

impl EguiApp {
    pub fn new(controller: ClassifierController) -> Self {
        Self {
            controller,
            notifier_installed: false,
            photo_tex: None,
        }
    }

    fn install_notifier(&mut self, ctx: &egui::Context) {
        if self.notifier_installed {
            return;
        }
        let ctx = ctx.clone();
        self.controller
            .set_result_notifier(move || ctx.request_repaint());
        self.notifier_installed = true;
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::NONE.fill(Color32::BLACK).inner_margin(Margin::same(4)))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(&status.badge_label)
                            .color(Color32::BLACK)
                            .background_color(status.badge_color),
                    );
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_main(&mut self, ctx: &egui::Context) {
        let backdrop = self.controller.ui.backdrop;
        egui::CentralPanel::default()
            .frame(
                Frame::NONE
                    .fill(backdrop.fill())
                    .inner_margin(Margin::same(16)),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    if ui
                        .button(RichText::new("Pick photo").size(18.0))
                        .clicked()
                    {
                        self.controller.pick_photo_via_dialog();
                    }
                    ui.add_space(12.0);
                    self.render_photo(ui);
                    ui.add_space(12.0);
                    ui.label(
                        RichText::new(self.controller.prediction_text())
                            .size(20.0)
                            .color(backdrop.text()),
                    );
                });
            });
    }

    fn render_photo(&mut self, ui: &mut Ui) {
        let Some(photo) = &self.controller.ui.photo else {
            self.photo_tex = None;
            return;
        };
        let stale = self
            .photo_tex
            .as_ref()
            .is_none_or(|(generation, _)| *generation != photo.generation);
        if stale {
            let tex = ui.ctx().load_texture(
                "picked_photo",
                photo.image.clone(),
                TextureOptions::LINEAR,
            );
            self.photo_tex = Some((photo.generation, tex));
        }
        if let Some((_, tex)) = &self.photo_tex {
            let max = egui::vec2(ui.available_width(), ui.available_height() * 0.7);
            ui.add(egui::Image::new(tex).max_size(max).maintain_aspect_ratio(true));
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.install_notifier(ctx);
        self.controller.poll_background_jobs();
        self.render_status(ctx);
        self.render_main(ctx);
    }
}
