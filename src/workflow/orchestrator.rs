//! Dispatches analysis requests and applies their settlements.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::{debug, info, warn};

use super::acquisition::{FileContent, SelectedFile};
use super::result::AnalysisResult;
use crate::inference::{Detection, InferenceClient, InferenceError};

/// Upload built from exactly one [`SelectedFile`] right before dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Generation of the selection this request was built from.
    pub generation: u64,
    pub file_name: String,
    pub mime: String,
    pub content: FileContent,
}

impl AnalysisRequest {
    pub fn from_selected(file: &SelectedFile) -> Self {
        Self {
            generation: file.generation,
            file_name: file.name.clone(),
            mime: file.mime.clone(),
            content: file.content.clone(),
        }
    }

    pub fn read_content(&self) -> Result<Vec<u8>, InferenceError> {
        self.content
            .read()
            .map_err(|source| InferenceError::ReadFile {
                name: self.file_name.clone(),
                source,
            })
    }
}

/// What `analyze` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    Dispatched { request_id: u64 },
    NoFile,
    AlreadyInFlight,
}

/// How a settlement drained by `poll` was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settled {
    /// The result now reflects this settlement; `succeeded` is false when
    /// the call failed and the result carries a failure message.
    Applied { generation: u64, succeeded: bool },
    /// The selection changed while the request ran; the result was discarded.
    Stale { generation: u64 },
    /// A reset happened after dispatch; the settlement was ignored.
    Superseded { request_id: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InFlight {
    request_id: u64,
    generation: u64,
}

struct Settlement {
    request_id: u64,
    generation: u64,
    outcome: Result<Detection, InferenceError>,
}

/// Owns the in-flight flag and the latest [`AnalysisResult`].
///
/// Calls run on worker threads; their settlements queue on a channel and are
/// only applied by [`AnalysisOrchestrator::poll`], so all state changes
/// happen on the caller's thread.
pub struct AnalysisOrchestrator {
    client: Arc<dyn InferenceClient>,
    in_flight: Option<InFlight>,
    result: Option<AnalysisResult>,
    next_request_id: u64,
    settle_tx: Sender<Settlement>,
    settle_rx: Receiver<Settlement>,
}

impl AnalysisOrchestrator {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        let (settle_tx, settle_rx) = mpsc::channel();
        Self {
            client,
            in_flight: None,
            result: None,
            next_request_id: 1,
            settle_tx,
            settle_rx,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Start analyzing `selected` unless nothing is selected or a call is
    /// already running. Calls are never retried.
    pub fn analyze(&mut self, selected: Option<&SelectedFile>) -> AnalyzeOutcome {
        let Some(file) = selected else {
            debug!("Analyze ignored: no file selected");
            return AnalyzeOutcome::NoFile;
        };
        if self.in_flight.is_some() {
            debug!("Analyze ignored: request already in flight");
            return AnalyzeOutcome::AlreadyInFlight;
        }

        let request = AnalysisRequest::from_selected(file);
        let request_id = self.take_request_id();
        let generation = request.generation;
        self.in_flight = Some(InFlight {
            request_id,
            generation,
        });
        info!(
            "Dispatching analysis #{request_id} for {} (generation {generation})",
            request.file_name
        );

        let client = Arc::clone(&self.client);
        let tx = self.settle_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("analysis-{request_id}"))
            .spawn(move || {
                let outcome = client.detect(&request);
                let _ = tx.send(Settlement {
                    request_id,
                    generation,
                    outcome,
                });
            });
        if let Err(err) = spawned {
            warn!("Failed to start analysis worker: {err}");
            let _ = self.settle_tx.send(Settlement {
                request_id,
                generation,
                outcome: Err(InferenceError::Transport(format!(
                    "failed to start worker: {err}"
                ))),
            });
        }
        AnalyzeOutcome::Dispatched { request_id }
    }

    /// Apply every settlement that has arrived since the last poll.
    ///
    /// `current_generation` is the generation of the file selected right now;
    /// results for any other generation are normalized and then dropped.
    pub fn poll(&mut self, current_generation: Option<u64>) -> Vec<Settled> {
        let mut settled = Vec::new();
        loop {
            match self.settle_rx.try_recv() {
                Ok(settlement) => settled.push(self.apply(settlement, current_generation)),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        settled
    }

    /// Forget the result and stop waiting for the running call.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.result = None;
    }

    /// Drop the current result; used when a new file is selected.
    pub fn invalidate_result(&mut self) {
        self.result = None;
    }

    fn apply(&mut self, settlement: Settlement, current_generation: Option<u64>) -> Settled {
        let Settlement {
            request_id,
            generation,
            outcome,
        } = settlement;
        if self.in_flight.map(|flight| flight.request_id) != Some(request_id) {
            debug!("Ignoring settlement of superseded analysis #{request_id}");
            return Settled::Superseded { request_id };
        }
        self.in_flight = None;

        if let Err(err) = &outcome {
            warn!("Analysis #{request_id} failed: {err}");
        }
        let succeeded = outcome.is_ok();
        let result = AnalysisResult::from_outcome(&outcome);
        if current_generation != Some(generation) {
            warn!(
                "Discarding analysis #{request_id} for generation {generation}; selection changed"
            );
            return Settled::Stale { generation };
        }
        info!(
            "Analysis #{request_id} settled: tumor={} confidence={}%",
            result.has_tumor, result.confidence
        );
        self.result = Some(result);
        Settled::Applied {
            generation,
            succeeded,
        }
    }

    fn take_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1).max(1);
        id
    }

    /// Poll until at least one settlement arrives or `timeout` passes.
    #[cfg(test)]
    pub(crate) fn wait_for_settlement(
        &mut self,
        current_generation: Option<u64>,
        timeout: std::time::Duration,
    ) -> Vec<Settled> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let settled = self.poll(current_generation);
            if !settled.is_empty() || std::time::Instant::now() >= deadline {
                return settled;
            }
            thread::sleep(std::time::Duration::from_millis(2));
        }
    }
}
