use super::preview::{self, PreviewDecodeResult, PreviewJob};
use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};
use tracing::warn;

type TryRecvError = std::sync::mpsc::TryRecvError;

pub(crate) enum JobMessage {
    PreviewDecoded(PreviewDecodeResult),
}

/// Background work owned by the controller, reported back over one channel.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    pending_preview: Option<u64>,
}

impl ControllerJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = mpsc::channel();
        Self {
            message_tx,
            message_rx,
            pending_preview: None,
        }
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(crate) fn pending_preview(&self) -> Option<u64> {
        self.pending_preview
    }

    /// Decode a preview on a worker. Replaces any pending decode; older
    /// results are filtered out by generation when they arrive.
    pub(crate) fn begin_preview_decode(&mut self, job: PreviewJob) {
        let generation = job.generation;
        self.pending_preview = Some(generation);
        let tx = self.message_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("preview-{generation}"))
            .spawn(move || {
                let result = preview::run_preview_job(job);
                let _ = tx.send(JobMessage::PreviewDecoded(result));
            });
        if let Err(err) = spawned {
            warn!("Failed to start preview decode: {err}");
            let _ = self.message_tx.send(JobMessage::PreviewDecoded(PreviewDecodeResult {
                generation,
                result: Err(format!("Preview unavailable: {err}")),
            }));
        }
    }

    pub(crate) fn clear_preview(&mut self) {
        self.pending_preview = None;
    }
}
