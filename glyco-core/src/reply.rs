//! Interpretation of what comes back from `POST /predict`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Substituted when an error body is not JSON at all.
pub const UNKNOWN_ERROR: &str = "Unknown error";
/// Substituted when an error body parses but carries no usable `detail`.
pub const REQUEST_FAILED: &str = "Request failed";

/// Typed view of a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// 1 is a positive classification, anything else negative.
    pub prediction: i64,
    /// Per-class scores; the index is the class label.
    #[serde(default)]
    pub probability: Option<Vec<f64>>,
}

/// A successful reply: the typed response plus the body exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReply {
    pub response: PredictionResponse,
    pub raw: Value,
}

impl PredictionReply {
    pub fn from_json(raw: Value) -> Result<Self, SubmitError> {
        let response = PredictionResponse::deserialize(&raw)
            .map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;
        Ok(Self { response, raw })
    }

    /// Turn an HTTP status and body into a reply or a renderable error.
    pub fn from_http(status: u16, body: &[u8]) -> Result<Self, SubmitError> {
        if !(200..300).contains(&status) {
            let message = error_detail(body);
            warn!(status, %message, "prediction service reported an error");
            return Err(SubmitError::Server { status, message });
        }

        let raw: Value = serde_json::from_slice(body)
            .map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;
        let reply = Self::from_json(raw)?;
        debug!(prediction = reply.response.prediction, "prediction reply parsed");
        Ok(reply)
    }

    /// The raw body, pretty-printed with two-space indentation.
    pub fn pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

/// Failures after a request was issued. Every variant is terminal for its submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// The request never completed (refused, DNS, TLS, timeout).
    #[error("request could not be completed: {0}")]
    Transport(String),

    /// Non-2xx status; `message` is the server's detail or a fallback.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx, but the body is not a prediction.
    #[error("invalid prediction response: {0}")]
    MalformedResponse(String),
}

fn error_detail(body: &[u8]) -> String {
    let detail = match serde_json::from_slice::<Value>(body) {
        Ok(v) => v.get("detail").cloned().unwrap_or(Value::Null),
        Err(_) => Value::String(UNKNOWN_ERROR.to_string()),
    };

    match detail {
        Value::String(s) if !s.is_empty() => s,
        Value::Null | Value::Bool(false) | Value::String(_) => REQUEST_FAILED.to_string(),
        Value::Number(n) if n.as_f64() == Some(0.0) => REQUEST_FAILED.to_string(),
        // FastAPI validation errors put a list of objects in `detail`.
        other => other.to_string(),
    }
}
