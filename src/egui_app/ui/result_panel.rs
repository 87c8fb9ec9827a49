use super::EguiApp;
use super::style;
use crate::egui_app::view_model::{ResultView, WorkflowView};
use eframe::egui::{self, Frame, Margin, RichText, Ui};

impl EguiApp {
    pub(super) fn render_result_panel(&mut self, ui: &mut Ui, view: &WorkflowView) {
        let palette = style::palette();
        Frame::new()
            .fill(palette.bg_secondary)
            .stroke(style::section_stroke())
            .inner_margin(Margin::same(16))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(
                    RichText::new("Analysis Results")
                        .size(16.0)
                        .strong()
                        .color(palette.text_primary),
                );
                ui.add_space(10.0);
                if let Some(result) = &view.result {
                    self.render_result(ui, result);
                } else if view.busy {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label(
                            RichText::new("Analyzing MRI scan...").color(palette.text_muted),
                        );
                    });
                } else {
                    ui.label(
                        RichText::new("Upload an image and run the analysis to see results here.")
                            .color(palette.text_muted),
                    );
                }
            });
    }

    fn render_result(&mut self, ui: &mut Ui, result: &ResultView) {
        let palette = style::palette();
        let accent = style::detection_color(result.has_tumor);

        ui.label(RichText::new("Detection Status").color(palette.text_muted));
        ui.label(
            RichText::new(result.status_label)
                .size(18.0)
                .strong()
                .color(accent),
        );
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Confidence Level").color(palette.text_muted));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(&result.confidence_label).strong());
            });
        });
        ui.add(
            egui::ProgressBar::new(result.confidence_fraction)
                .fill(accent)
                .desired_height(10.0),
        );
        ui.add_space(8.0);
        ui.label(RichText::new(&result.message).color(palette.text_primary));
        ui.add_space(12.0);

        Frame::new()
            .fill(palette.bg_primary)
            .stroke(egui::Stroke::new(1.0, palette.accent_copper))
            .inner_margin(Margin::same(10))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(
                    RichText::new("Important Medical Disclaimer:")
                        .strong()
                        .color(palette.accent_copper),
                );
                ui.label(RichText::new(result.disclaimer).color(palette.text_muted));
            });
        ui.add_space(12.0);

        if ui.button("Analyze Another Image").clicked() {
            self.controller.reset_workflow();
        }
    }
}
