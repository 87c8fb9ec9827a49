use super::EguiApp;
use super::style;
use crate::egui_app::view_model::{FileSummary, WorkflowView};
use eframe::egui::{self, Frame, Margin, RichText, Ui};

const PREVIEW_MAX_HEIGHT: f32 = 320.0;

impl EguiApp {
    pub(super) fn render_upload_panel(&mut self, ui: &mut Ui, view: &WorkflowView) {
        let palette = style::palette();
        Frame::new()
            .fill(palette.bg_secondary)
            .stroke(style::section_stroke())
            .inner_margin(Margin::same(16))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(
                    RichText::new("Upload MRI Scan")
                        .size(16.0)
                        .strong()
                        .color(palette.text_primary),
                );
                ui.add_space(10.0);
                match &view.file {
                    None => self.render_drop_zone(ui, view.drag_active),
                    Some(file) => self.render_selected_file(ui, view, file),
                }
            });
    }

    fn render_drop_zone(&mut self, ui: &mut Ui, drag_active: bool) {
        let palette = style::palette();
        let zone = Frame::new()
            .fill(style::drop_zone_fill(drag_active))
            .stroke(style::drop_zone_stroke(drag_active))
            .inner_margin(Margin::symmetric(16, 40))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("Drop your MRI image here")
                            .size(15.0)
                            .color(palette.text_primary),
                    );
                    ui.label(
                        RichText::new("or click to browse files • Supports JPEG, PNG, TIFF")
                            .color(palette.text_muted),
                    );
                    ui.add_space(12.0);
                    ui.button("Select Image").clicked()
                })
                .inner
            });
        let zone_clicked = zone.response.interact(egui::Sense::click()).clicked();
        if zone.inner || zone_clicked {
            self.controller.open_file_dialog();
        }
    }

    fn render_selected_file(&mut self, ui: &mut Ui, view: &WorkflowView, file: &FileSummary) {
        let palette = style::palette();
        Frame::new()
            .fill(style::drop_zone_fill(view.drag_active))
            .stroke(style::drop_zone_stroke(view.drag_active))
            .inner_margin(Margin::same(8))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| self.render_preview(ui));
            });
        ui.add_space(8.0);
        ui.label(RichText::new(&file.name).strong().color(palette.text_primary));
        ui.label(RichText::new(&file.detail).color(palette.text_muted));
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let analyze = ui.add_enabled(view.can_analyze, egui::Button::new(view.analyze_label));
            if view.busy {
                ui.add(egui::Spinner::new());
            }
            if analyze.clicked() {
                self.controller.analyze();
            }
            if ui.button("Remove").clicked() {
                self.controller.reset_workflow();
            }
        });
    }

    fn render_preview(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        if let Some((_, texture)) = &self.preview_tex {
            let max = egui::vec2(ui.available_width(), PREVIEW_MAX_HEIGHT);
            ui.add(
                egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                    .max_size(max),
            );
            return;
        }
        let preview = &self.controller.ui.preview;
        if preview.loading {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label(RichText::new("Loading preview...").color(palette.text_muted));
            });
        } else if preview.error.is_some() {
            ui.label(RichText::new("Preview unavailable").color(palette.text_muted));
        }
    }
}
