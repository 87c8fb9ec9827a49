use std::sync::Arc;

use tracing::info;

use super::acquisition::{AcquisitionController, FileCandidate, SelectedFile, SubmitOutcome};
use super::orchestrator::{AnalysisOrchestrator, AnalyzeOutcome, Settled};
use super::result::AnalysisResult;
use crate::inference::InferenceClient;

/// Coarse phase of the workflow, derived on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    FileSelected,
    Analyzing,
    ResultReady,
}

impl WorkflowState {
    pub fn derive(has_file: bool, in_flight: bool, has_result: bool) -> Self {
        if in_flight {
            Self::Analyzing
        } else if has_result {
            Self::ResultReady
        } else if has_file {
            Self::FileSelected
        } else {
            Self::Idle
        }
    }
}

/// Acquisition plus orchestration behind one handle.
pub struct Workflow {
    acquisition: AcquisitionController,
    orchestrator: AnalysisOrchestrator,
}

impl Workflow {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self {
            acquisition: AcquisitionController::new(),
            orchestrator: AnalysisOrchestrator::new(client),
        }
    }

    pub fn state(&self) -> WorkflowState {
        WorkflowState::derive(
            self.acquisition.selected().is_some(),
            self.orchestrator.is_in_flight(),
            self.orchestrator.result().is_some(),
        )
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.acquisition.selected()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.orchestrator.result()
    }

    pub fn is_analyzing(&self) -> bool {
        self.orchestrator.is_in_flight()
    }

    pub fn is_drag_active(&self) -> bool {
        self.acquisition.is_drag_active()
    }

    /// Offer a picker selection. An accepted file drops the current result.
    pub fn submit(&mut self, candidate: FileCandidate) -> SubmitOutcome {
        let outcome = self.acquisition.submit(candidate);
        self.after_submit(&outcome);
        outcome
    }

    /// Offer the files of a drop; only the first one is considered.
    pub fn drop_files(
        &mut self,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> SubmitOutcome {
        let outcome = self.acquisition.drop_files(candidates);
        self.after_submit(&outcome);
        outcome
    }

    pub fn drag_enter(&mut self) {
        self.acquisition.drag_enter();
    }

    pub fn drag_over(&mut self) {
        self.acquisition.drag_over();
    }

    pub fn drag_leave(&mut self) {
        self.acquisition.drag_leave();
    }

    pub fn analyze(&mut self) -> AnalyzeOutcome {
        self.orchestrator.analyze(self.acquisition.selected())
    }

    /// Apply settled calls; call once per frame.
    pub fn poll(&mut self) -> Vec<Settled> {
        let generation = self.acquisition.selected().map(|file| file.generation);
        self.orchestrator.poll(generation)
    }

    /// Return to [`WorkflowState::Idle`] from any state.
    pub fn clear(&mut self) {
        info!("Workflow reset");
        self.acquisition.clear();
        self.orchestrator.reset();
    }

    fn after_submit(&mut self, outcome: &SubmitOutcome) {
        if outcome.is_accepted() {
            self.orchestrator.invalidate_result();
        }
    }

    #[cfg(test)]
    pub(crate) fn wait_for_settlement(&mut self) -> Vec<Settled> {
        let generation = self.acquisition.selected().map(|file| file.generation);
        self.orchestrator
            .wait_for_settlement(generation, std::time::Duration::from_secs(5))
    }
}
