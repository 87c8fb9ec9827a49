//! Helpers to convert workflow data into egui-facing view structs.

use crate::workflow::result::MEDICAL_DISCLAIMER;
use crate::workflow::{AnalysisResult, SelectedFile, Workflow, WorkflowState};

pub const ANALYZE_LABEL: &str = "Analyze Image";
pub const ANALYZING_LABEL: &str = "Analyzing...";
pub const TUMOR_LABEL: &str = "Tumor Detected";
pub const NO_TUMOR_LABEL: &str = "No Tumor Detected";

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkflowView {
    pub state: WorkflowState,
    pub drag_active: bool,
    pub file: Option<FileSummary>,
    pub can_analyze: bool,
    pub analyze_label: &'static str,
    pub busy: bool,
    /// Only present in [`WorkflowState::ResultReady`].
    pub result: Option<ResultView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultView {
    pub has_tumor: bool,
    pub status_label: &'static str,
    pub confidence_label: String,
    /// Confidence in `0.0..=1.0` for the progress bar.
    pub confidence_fraction: f32,
    pub message: String,
    pub disclaimer: &'static str,
}

pub fn workflow_view(workflow: &Workflow) -> WorkflowView {
    let state = workflow.state();
    let busy = state == WorkflowState::Analyzing;
    WorkflowView {
        state,
        drag_active: workflow.is_drag_active(),
        file: workflow.selected().map(file_summary),
        can_analyze: workflow.selected().is_some() && !busy,
        analyze_label: if busy { ANALYZING_LABEL } else { ANALYZE_LABEL },
        busy,
        result: match (state, workflow.result()) {
            (WorkflowState::ResultReady, Some(result)) => Some(result_view(result)),
            _ => None,
        },
    }
}

pub fn file_summary(file: &SelectedFile) -> FileSummary {
    FileSummary {
        name: file.name.clone(),
        detail: format!("{} • Ready for analysis", size_label(file.size)),
    }
}

/// Byte count as megabytes with two decimals.
pub fn size_label(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

pub fn result_view(result: &AnalysisResult) -> ResultView {
    ResultView {
        has_tumor: result.has_tumor,
        status_label: if result.has_tumor {
            TUMOR_LABEL
        } else {
            NO_TUMOR_LABEL
        },
        confidence_label: format!("{}%", result.confidence),
        confidence_fraction: f32::from(result.confidence.min(100)) / 100.0,
        message: result.message.clone(),
        disclaimer: MEDICAL_DISCLAIMER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::FileCandidate;
    use crate::workflow::orchestrator::test_support::{GatedClient, StubClient};
    use std::sync::Arc;

    fn png(size: usize) -> FileCandidate {
        FileCandidate::from_bytes("scan.png", "image/png", Arc::from(vec![0u8; size]))
    }

    #[test]
    fn size_label_uses_two_decimals() {
        assert_eq!(size_label(0), "0.00 MB");
        assert_eq!(size_label(1024 * 1024), "1.00 MB");
        assert_eq!(size_label(2_621_440), "2.50 MB");
        assert_eq!(size_label(1536), "0.00 MB");
    }

    #[test]
    fn idle_view_offers_nothing_to_analyze() {
        let workflow = Workflow::new(StubClient::detecting(1, 0.5));
        let view = workflow_view(&workflow);
        assert_eq!(view.state, WorkflowState::Idle);
        assert!(view.file.is_none());
        assert!(!view.can_analyze);
        assert!(view.result.is_none());
        assert_eq!(view.analyze_label, ANALYZE_LABEL);
    }

    #[test]
    fn selected_file_is_summarized() {
        let mut workflow = Workflow::new(StubClient::detecting(1, 0.5));
        workflow.submit(png(3 * 1024 * 1024));
        let view = workflow_view(&workflow);
        assert_eq!(
            view.file,
            Some(FileSummary {
                name: "scan.png".into(),
                detail: "3.00 MB • Ready for analysis".into(),
            })
        );
        assert!(view.can_analyze);
    }

    #[test]
    fn analyzing_view_disables_button_and_hides_result() {
        let (client, release) = GatedClient::new();
        let mut workflow = Workflow::new(client);
        workflow.submit(png(4));
        workflow.analyze();

        let view = workflow_view(&workflow);
        assert!(view.busy);
        assert!(!view.can_analyze);
        assert_eq!(view.analyze_label, ANALYZING_LABEL);
        assert!(view.result.is_none());

        drop(release);
        workflow.wait_for_settlement();
    }

    #[test]
    fn result_view_formats_positive_result() {
        let mut workflow = Workflow::new(StubClient::detecting(1, 0.87));
        workflow.submit(png(4));
        workflow.analyze();
        workflow.wait_for_settlement();

        let view = workflow_view(&workflow);
        let result = view.result.expect("result view");
        assert!(result.has_tumor);
        assert_eq!(result.status_label, TUMOR_LABEL);
        assert_eq!(result.confidence_label, "87%");
        assert!((result.confidence_fraction - 0.87).abs() < f32::EPSILON);
        assert_eq!(result.disclaimer, MEDICAL_DISCLAIMER);
    }

    #[test]
    fn failed_result_reads_as_no_tumor_at_zero_percent() {
        let view = result_view(&AnalysisResult {
            has_tumor: false,
            confidence: 0,
            message: "file too large".into(),
        });
        assert_eq!(view.status_label, NO_TUMOR_LABEL);
        assert_eq!(view.confidence_label, "0%");
        assert_eq!(view.confidence_fraction, 0.0);
        assert_eq!(view.message, "file too large");
    }
}
