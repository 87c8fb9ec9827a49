//! Client side of the external tumor-detection service.
//!
//! The workflow only talks to [`InferenceClient`]; [`HttpInferenceClient`]
//! is the production implementation that posts the scan to `/detect`.

pub mod api;
mod multipart;

pub use api::HttpInferenceClient;

use crate::workflow::AnalysisRequest;

/// Class identifier the service uses for "tumor detected".
pub const POSITIVE_CLASS: i64 = 1;

/// Raw prediction returned by a successful detection call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub predicted_class: i64,
    /// Model confidence in `[0, 1]`.
    pub confidence_score: f64,
}

impl Detection {
    pub fn is_positive(&self) -> bool {
        self.predicted_class == POSITIVE_CLASS
    }
}

/// Every way a detection call can fail.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The upload could not be built because the file was unreadable.
    #[error("Failed to read {name}: {source}")]
    ReadFile {
        name: String,
        source: std::io::Error,
    },
    /// The service could not be reached or the connection broke.
    #[error("HTTP error: {0}")]
    Transport(String),
    /// The service reported a failure: a non-success status with a JSON
    /// body, or a success status whose body carries only an `error`.
    #[error("Server error (HTTP {status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },
    /// The response body was not the JSON the service promises.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Performs one detection call. Implementations must be callable from a
/// worker thread.
pub trait InferenceClient: Send + Sync {
    fn detect(&self, request: &AnalysisRequest) -> Result<Detection, InferenceError>;
}
