//! HTTP implementation of [`InferenceClient`] for the `/detect` endpoint.

use serde::Deserialize;
use tracing::debug;

use super::multipart::{self, FilePart};
use super::{Detection, InferenceClient, InferenceError};
use crate::config::InferenceSettings;
use crate::http_client;
use crate::workflow::AnalysisRequest;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Posts scans to `{base_url}/detect` as `multipart/form-data`.
pub struct HttpInferenceClient {
    agent: ureq::Agent,
    detect_url: String,
}

impl HttpInferenceClient {
    /// Build a client for an already-validated configuration.
    pub fn new(settings: &InferenceSettings) -> Self {
        Self {
            agent: http_client::agent(settings.timeouts()),
            detect_url: settings.detect_url(),
        }
    }

    pub fn detect_url(&self) -> &str {
        &self.detect_url
    }
}

impl InferenceClient for HttpInferenceClient {
    fn detect(&self, request: &AnalysisRequest) -> Result<Detection, InferenceError> {
        let bytes = request.read_content()?;
        let body = multipart::encode(&FilePart {
            field: FILE_FIELD,
            file_name: &request.file_name,
            content_type: &request.mime,
            bytes: &bytes,
        });
        debug!(
            "POST {} ({} byte body) for generation {}",
            self.detect_url,
            body.bytes.len(),
            request.generation
        );

        let response = match self
            .agent
            .post(&self.detect_url)
            .set("Accept", "application/json")
            .set("Content-Type", &body.content_type)
            .send_bytes(&body.bytes)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let text = http_client::read_body_limited(response, MAX_RESPONSE_BYTES)
                    .map_err(InferenceError::InvalidResponse)?;
                return Err(parse_error_response(status, &text));
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(InferenceError::Transport(err.to_string()));
            }
        };

        let status = response.status();
        let text = http_client::read_body_limited(response, MAX_RESPONSE_BYTES)
            .map_err(InferenceError::InvalidResponse)?;
        parse_detection(status, &text)
    }
}

#[derive(Deserialize)]
struct DetectionWire {
    predicted_class: Option<i64>,
    confidence_score: Option<f64>,
    #[serde(default)]
    error: serde_json::Value,
}

/// Parse a success-status body. A body that lacks the prediction but carries
/// an `error` is a server-reported failure even though the status was 2xx.
fn parse_detection(status: u16, body: &str) -> Result<Detection, InferenceError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(InferenceError::InvalidResponse("Empty response body".into()));
    }
    let wire: DetectionWire = serde_json::from_str(trimmed)
        .map_err(|err| InferenceError::InvalidResponse(format!("{err}: {trimmed}")))?;
    match (wire.predicted_class, wire.confidence_score) {
        (Some(predicted_class), Some(confidence_score)) => Ok(Detection {
            predicted_class,
            confidence_score,
        }),
        _ => match error_message(&wire.error) {
            Some(message) => Err(InferenceError::Server {
                status,
                message: Some(message),
            }),
            None => Err(InferenceError::InvalidResponse(format!(
                "Missing predicted_class/confidence_score: {trimmed}"
            ))),
        },
    }
}

/// Map a non-success response. A JSON body counts as a server-reported
/// failure (with its `error` text when present); anything else is treated
/// as a malformed response.
fn parse_error_response(status: u16, body: &str) -> InferenceError {
    let trimmed = body.trim();
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => InferenceError::Server {
            status,
            message: value.get("error").and_then(error_message),
        },
        Err(err) => InferenceError::InvalidResponse(format!("HTTP {status}: {err}: {trimmed}")),
    }
}

/// Display text for an `error` value. Strings are trimmed; other non-empty
/// values are shown as JSON.
fn error_message(error: &serde_json::Value) -> Option<String> {
    match error {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::AnalysisResult;

    #[test]
    fn parses_detection_body() {
        let detection =
            parse_detection(200, r#"{"predicted_class": 1, "confidence_score": 0.8731}"#).unwrap();
        assert_eq!(
            detection,
            Detection {
                predicted_class: 1,
                confidence_score: 0.8731
            }
        );
        assert!(detection.is_positive());
    }

    #[test]
    fn detection_with_missing_field_is_invalid() {
        let err = parse_detection(200, r#"{"predicted_class": 0}"#).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidResponse(_)));
    }

    #[test]
    fn non_json_success_body_is_invalid() {
        let err = parse_detection(200, "<html>gateway</html>").unwrap_err();
        assert!(matches!(err, InferenceError::InvalidResponse(_)));
        let err = parse_detection(200, "   ").unwrap_err();
        assert!(err.to_string().contains("Empty response body"));
    }

    #[test]
    fn error_body_carries_server_message() {
        let err = parse_error_response(400, r#"{"error": "file too large"}"#);
        assert!(matches!(
            err,
            InferenceError::Server { status: 400, message: Some(ref message) } if message == "file too large"
        ));
    }

    #[test]
    fn error_body_without_message_has_none() {
        for body in [
            r#"{"detail": "nope"}"#,
            r#"{"error": ""}"#,
            r#"{"error": null}"#,
            "[]",
        ] {
            let err = parse_error_response(500, body);
            assert!(
                matches!(err, InferenceError::Server { status: 500, message: None }),
                "unexpected mapping for {body}: {err:?}"
            );
        }
    }

    #[test]
    fn non_string_error_is_rendered_as_json() {
        let err = parse_error_response(500, r#"{"error": 42}"#);
        assert!(matches!(
            err,
            InferenceError::Server { status: 500, message: Some(ref message) } if message == "42"
        ));
        let err = parse_error_response(500, r#"{"error": {"code": "oom"}}"#);
        assert!(matches!(
            err,
            InferenceError::Server { message: Some(ref message), .. } if message == r#"{"code":"oom"}"#
        ));
    }

    #[test]
    fn success_status_with_error_field_reports_server_message() {
        let outcome = parse_detection(200, r#"{"error": "model not loaded"}"#);
        assert!(matches!(
            outcome,
            Err(InferenceError::Server { status: 200, message: Some(ref message) }) if message == "model not loaded"
        ));
        let result = AnalysisResult::from_outcome(&outcome);
        assert_eq!(result.message, "model not loaded");
        assert_eq!(result.confidence, 0);
        assert!(!result.has_tumor);
    }

    #[test]
    fn success_status_with_blank_error_stays_invalid() {
        let err = parse_detection(200, r#"{"error": "  "}"#).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidResponse(_)));
    }

    #[test]
    fn non_json_error_body_is_invalid_response() {
        let err = parse_error_response(502, "Bad Gateway");
        assert!(matches!(err, InferenceError::InvalidResponse(_)));
    }

    #[test]
    fn client_targets_detect_route() {
        let settings = InferenceSettings {
            base_url: "http://127.0.0.1:9/".into(),
            ..InferenceSettings::default()
        };
        assert_eq!(
            HttpInferenceClient::new(&settings).detect_url(),
            "http://127.0.0.1:9/detect"
        );
    }
}
