//! Bridges the upload-and-analyze workflow to the egui UI.

mod jobs;
mod preview;

use crate::egui_app::state::UiState;
use crate::egui_app::ui::style::{self, StatusTone};
use crate::egui_app::view_model::{self, WorkflowView};
use crate::inference::InferenceClient;
use crate::workflow::acquisition::guess_mime;
use crate::workflow::{AnalyzeOutcome, FileCandidate, Settled, SubmitOutcome, Workflow};
use jobs::{ControllerJobs, JobMessage};
use preview::{PreviewDecodeResult, PreviewJob};
use rfd::FileDialog;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Extensions offered by the file picker.
pub const PICKER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

/// Maintains app state and bridges core logic to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    workflow: Workflow,
    jobs: ControllerJobs,
}

impl EguiController {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self {
            ui: UiState::default(),
            workflow: Workflow::new(client),
            jobs: ControllerJobs::new(),
        }
    }

    pub fn view(&self) -> WorkflowView {
        view_model::workflow_view(&self.workflow)
    }

    /// True while anything is pending that needs frames to keep polling.
    pub fn has_pending_work(&self) -> bool {
        self.workflow.is_analyzing() || self.jobs.pending_preview().is_some()
    }

    /// Pick an image with the native dialog.
    pub fn open_file_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Images", PICKER_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.select_path(&path);
    }

    /// Offer a file on disk as the new selection.
    pub fn select_path(&mut self, path: &Path) {
        match FileCandidate::from_path(path) {
            Ok(candidate) => {
                let outcome = self.workflow.submit(candidate);
                self.apply_submit_outcome(outcome);
            }
            Err(err) => self.set_status(
                format!("Failed to open {}: {err}", path.display()),
                StatusTone::Error,
            ),
        }
    }

    /// Track files hovering over the window.
    pub fn update_drag_hover(&mut self, hovering: bool) {
        match (hovering, self.workflow.is_drag_active()) {
            (true, false) => self.workflow.drag_enter(),
            (true, true) => self.workflow.drag_over(),
            (false, true) => self.workflow.drag_leave(),
            (false, false) => {}
        }
    }

    /// Handle a drop; only the first file is considered.
    pub fn handle_dropped_files(&mut self, files: Vec<egui::DroppedFile>) {
        let Some(first) = files.first() else {
            let outcome = self.workflow.drop_files(Vec::new());
            self.apply_submit_outcome(outcome);
            return;
        };
        match dropped_candidate(first) {
            Ok(candidate) => {
                let outcome = self.workflow.drop_files(std::iter::once(candidate));
                if files.len() > 1 {
                    info!("Dropped {} files; using the first", files.len());
                }
                self.apply_submit_outcome(outcome);
            }
            Err(err) => {
                self.workflow.drag_leave();
                self.set_status(format!("Failed to read dropped file: {err}"), StatusTone::Error);
            }
        }
    }

    pub fn analyze(&mut self) {
        match self.workflow.analyze() {
            AnalyzeOutcome::Dispatched { .. } => {
                let name = self
                    .workflow
                    .selected()
                    .map(|file| file.name.clone())
                    .unwrap_or_default();
                self.set_status(format!("Analyzing {name}"), StatusTone::Busy);
            }
            AnalyzeOutcome::NoFile => {
                self.set_status("Select an image first", StatusTone::Warning);
            }
            AnalyzeOutcome::AlreadyInFlight => {}
        }
    }

    /// Drop the file and any result; backs both "Remove" and "Analyze Another Image".
    pub fn reset_workflow(&mut self) {
        self.workflow.clear();
        self.jobs.clear_preview();
        self.ui.preview.clear();
        self.set_status("Drop an MRI image to get started", StatusTone::Idle);
    }

    /// Drain settled analyses and finished background jobs.
    pub fn poll_background_jobs(&mut self) {
        for settled in self.workflow.poll() {
            self.apply_settlement(settled);
        }
        while let Ok(message) = self.jobs.try_recv_message() {
            match message {
                JobMessage::PreviewDecoded(result) => self.apply_preview(result),
            }
        }
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = style::status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = label.into();
        self.ui.status.badge_color = color;
        self.ui.status.tone = tone;
    }

    fn apply_submit_outcome(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Accepted { generation } => {
                let Some(file) = self.workflow.selected() else {
                    return;
                };
                let status = format!("Selected {}", file.name);
                let job = PreviewJob {
                    generation,
                    content: file.content.clone(),
                };
                self.ui.preview.clear();
                self.ui.preview.generation = Some(generation);
                self.ui.preview.loading = true;
                self.jobs.begin_preview_decode(job);
                self.set_status(status, StatusTone::Info);
            }
            SubmitOutcome::Rejected(reason) => {
                self.set_status(reason.to_string(), StatusTone::Warning);
            }
        }
    }

    fn apply_settlement(&mut self, settled: Settled) {
        match settled {
            Settled::Applied { succeeded, .. } => {
                let Some(result) = self.workflow.result() else {
                    return;
                };
                if succeeded {
                    let view = view_model::result_view(result);
                    let text = format!(
                        "Analysis complete: {} ({})",
                        view.status_label, view.confidence_label
                    );
                    self.set_status(text, StatusTone::Info);
                } else {
                    let text = format!("Analysis failed: {}", result.message);
                    self.set_status(text, StatusTone::Error);
                }
            }
            Settled::Stale { .. } => {
                self.set_status(
                    "Discarded analysis of a previously selected image",
                    StatusTone::Info,
                );
            }
            Settled::Superseded { .. } => {}
        }
    }

    fn apply_preview(&mut self, decoded: PreviewDecodeResult) {
        let current = self.workflow.selected().map(|file| file.generation);
        if current != Some(decoded.generation) {
            return;
        }
        if self.jobs.pending_preview() == Some(decoded.generation) {
            self.jobs.clear_preview();
        }
        self.ui.preview.loading = false;
        match decoded.result {
            Ok(image) => {
                self.ui.preview.image = Some(image);
                self.ui.preview.error = None;
            }
            Err(err) => {
                warn!("Preview decode failed: {err}");
                self.ui.preview.image = None;
                self.ui.preview.error = Some(err);
            }
        }
    }
}

/// Describe a dropped file. The MIME type reported by the windowing system
/// wins; otherwise it is guessed from the file name.
fn dropped_candidate(file: &egui::DroppedFile) -> io::Result<FileCandidate> {
    let mut candidate = if let Some(path) = &file.path {
        FileCandidate::from_path(path)?
    } else if let Some(bytes) = &file.bytes {
        let mime = guess_mime(Path::new(&file.name));
        FileCandidate::from_bytes(file.name.clone(), mime, Arc::clone(bytes))
    } else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} carried no data", file.name),
        ));
    };
    let declared = file.mime.trim();
    if !declared.is_empty() {
        candidate.mime = declared.to_string();
    }
    Ok(candidate)
}
