//! egui renderer for the application UI.

mod chrome;
mod result_panel;
pub mod style;
mod update;
mod upload_panel;

use std::sync::Arc;

use crate::egui_app::controller::EguiController;
use crate::inference::InferenceClient;
use eframe::egui::{self, TextureHandle, TextureOptions};

/// Smallest window size that still fits both cards side by side.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(760.0, 560.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    /// Uploaded preview texture, keyed by selection generation.
    preview_tex: Option<(u64, TextureHandle)>,
}

impl EguiApp {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self {
            controller: EguiController::new(client),
            visuals_set: false,
            preview_tex: None,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn sync_preview_texture(&mut self, ctx: &egui::Context) {
        let preview = &self.controller.ui.preview;
        let (Some(generation), Some(image)) = (preview.generation, preview.image.as_ref()) else {
            self.preview_tex = None;
            return;
        };
        if self
            .preview_tex
            .as_ref()
            .is_some_and(|(loaded, _)| *loaded == generation)
        {
            return;
        }
        let color =
            egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
        let texture = ctx.load_texture(
            format!("scan_preview_{generation}"),
            color,
            TextureOptions::LINEAR,
        );
        self.preview_tex = Some((generation, texture));
    }
}
