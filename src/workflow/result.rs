//! Normalization of detection outcomes into [`AnalysisResult`].

use crate::inference::{Detection, InferenceError};

pub const POSITIVE_MESSAGE: &str = "Potential brain tumor detected. Please consult with a medical professional for further evaluation.";
pub const NEGATIVE_MESSAGE: &str = "No brain tumor detected in the MRI scan.";
/// Shown for transport failures, unreadable files and malformed responses.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
/// Shown when the service reports a failure without an error text.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed.";
pub const MEDICAL_DISCLAIMER: &str = "This AI analysis is for informational purposes only and should not replace professional medical diagnosis. Always consult with qualified medical professionals for proper diagnosis and treatment decisions.";

/// Outcome of one settled analysis, success or failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisResult {
    pub has_tumor: bool,
    /// Whole-number percentage in `0..=100`; always `0` for failures.
    pub confidence: u8,
    pub message: String,
}

impl AnalysisResult {
    pub fn from_outcome(outcome: &Result<Detection, InferenceError>) -> Self {
        match outcome {
            Ok(detection) => Self::from_detection(detection),
            Err(err) => Self::from_error(err),
        }
    }

    pub fn from_detection(detection: &Detection) -> Self {
        let has_tumor = detection.is_positive();
        Self {
            has_tumor,
            confidence: confidence_percent(detection.confidence_score),
            message: if has_tumor {
                POSITIVE_MESSAGE
            } else {
                NEGATIVE_MESSAGE
            }
            .to_string(),
        }
    }

    pub fn from_error(err: &InferenceError) -> Self {
        let message = match err {
            InferenceError::Server {
                message: Some(message),
                ..
            } => message.as_str(),
            InferenceError::Server { message: None, .. } => ANALYSIS_FAILED_MESSAGE,
            InferenceError::ReadFile { .. }
            | InferenceError::Transport(_)
            | InferenceError::InvalidResponse(_) => NETWORK_ERROR_MESSAGE,
        };
        Self::failure(message)
    }

    fn failure(message: &str) -> Self {
        Self {
            has_tumor: false,
            confidence: 0,
            message: message.to_string(),
        }
    }
}

/// Scale a `[0, 1]` score to a rounded percentage (half away from zero).
///
/// Out-of-range scores are clamped; non-finite scores map to `0`.
pub fn confidence_percent(score: f64) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(predicted_class: i64, confidence_score: f64) -> Detection {
        Detection {
            predicted_class,
            confidence_score,
        }
    }

    #[test]
    fn positive_detection_uses_positive_template() {
        let result = AnalysisResult::from_detection(&detection(1, 0.87));
        assert_eq!(
            result,
            AnalysisResult {
                has_tumor: true,
                confidence: 87,
                message: POSITIVE_MESSAGE.into(),
            }
        );
    }

    #[test]
    fn negative_detection_rounds_up_to_hundred() {
        let result = AnalysisResult::from_detection(&detection(0, 0.995));
        assert!(!result.has_tumor);
        assert_eq!(result.confidence, 100);
        assert_eq!(result.message, NEGATIVE_MESSAGE);
    }

    #[test]
    fn unknown_class_is_not_positive() {
        let result = AnalysisResult::from_detection(&detection(2, 0.5));
        assert!(!result.has_tumor);
        assert_eq!(result.message, NEGATIVE_MESSAGE);
    }

    #[test]
    fn confidence_matches_rounded_score_across_range() {
        for step in 0..=1000 {
            let score = step as f64 / 1000.0;
            let percent = confidence_percent(score);
            assert!(percent <= 100);
            assert_eq!(percent as f64, (score * 100.0).round(), "score {score}");
        }
    }

    #[test]
    fn confidence_clamps_out_of_range_scores() {
        assert_eq!(confidence_percent(1.7), 100);
        assert_eq!(confidence_percent(-0.2), 0);
        assert_eq!(confidence_percent(f64::NAN), 0);
        assert_eq!(confidence_percent(f64::INFINITY), 0);
    }

    #[test]
    fn server_error_text_is_surfaced_verbatim() {
        let err = InferenceError::Server {
            status: 400,
            message: Some("file too large".into()),
        };
        let result = AnalysisResult::from_error(&err);
        assert_eq!(
            result,
            AnalysisResult {
                has_tumor: false,
                confidence: 0,
                message: "file too large".into(),
            }
        );
    }

    #[test]
    fn server_error_without_text_uses_generic_message() {
        let err = InferenceError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(AnalysisResult::from_error(&err).message, ANALYSIS_FAILED_MESSAGE);
    }

    #[test]
    fn transport_read_and_parse_failures_use_network_message() {
        let errors = [
            InferenceError::Transport("connection refused".into()),
            InferenceError::InvalidResponse("expected value".into()),
            InferenceError::ReadFile {
                name: "scan.png".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
        ];
        for err in &errors {
            let result = AnalysisResult::from_error(err);
            assert!(!result.has_tumor);
            assert_eq!(result.confidence, 0);
            assert_eq!(result.message, NETWORK_ERROR_MESSAGE);
        }
    }

    #[test]
    fn normalization_is_deterministic() {
        let ok: Result<Detection, InferenceError> = Ok(detection(1, 0.4321));
        assert_eq!(
            AnalysisResult::from_outcome(&ok),
            AnalysisResult::from_outcome(&ok)
        );
        let failed: Result<Detection, InferenceError> =
            Err(InferenceError::Transport("reset".into()));
        assert_eq!(
            AnalysisResult::from_outcome(&failed),
            AnalysisResult::from_outcome(&failed)
        );
    }
}
