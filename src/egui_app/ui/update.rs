use std::time::Duration;

use eframe::egui;

use super::EguiApp;

const PENDING_REPAINT: Duration = Duration::from_millis(50);

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        let hovering = self.handle_file_drops(ctx);
        self.controller.poll_background_jobs();
        self.sync_preview_texture(ctx);
        self.render_ui(ctx);
        if hovering || self.controller.has_pending_work() {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}

impl EguiApp {
    /// Feed window-level drag and drop into the controller. Returns whether
    /// files are hovering over the window.
    fn handle_file_drops(&mut self, ctx: &egui::Context) -> bool {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        if dropped.is_empty() {
            self.controller.update_drag_hover(hovering);
        } else {
            self.controller.handle_dropped_files(dropped);
        }
        hovering
    }

    fn render_ui(&mut self, ctx: &egui::Context) {
        self.render_status(ctx);
        self.render_header(ctx);
        let view = self.controller.view();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.columns(2, |columns| {
                        self.render_upload_panel(&mut columns[0], &view);
                        self.render_result_panel(&mut columns[1], &view);
                    });
                });
        });
    }
}
