//! Upload-and-analyze workflow.
//!
//! [`Workflow`] pairs the [`AcquisitionController`] (what file is selected)
//! with the [`AnalysisOrchestrator`] (the running call and its result). All
//! state is owned by the caller's thread; only the detection call itself
//! runs on a worker.

pub mod acquisition;
pub mod orchestrator;
pub mod result;
mod state;

pub use acquisition::{
    AcquisitionController, FileCandidate, FileContent, RejectReason, SelectedFile, SubmitOutcome,
};
pub use orchestrator::{AnalysisOrchestrator, AnalysisRequest, AnalyzeOutcome, Settled};
pub use result::AnalysisResult;
pub use state::{Workflow, WorkflowState};
