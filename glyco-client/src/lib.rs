// HTTP side of glyco: sends the coerced form to the prediction service
// and turns whatever comes back into a reply or a renderable error.
// The controller in glyco-core decides what gets shown.

pub mod cli;
pub mod config;

use std::time::Duration;

use glyco_core::{FormError, PredictionFormController, PredictionReply, PredictionRequest, SubmitError};
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info, trace};

pub use config::{load_config, ClientConfig};

/// Anything that can answer a prediction request.
#[allow(async_fn_in_trait)]
pub trait PredictionService {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionReply, SubmitError>;
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("build http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// reqwest-backed client for `POST /predict`.
#[derive(Debug, Clone)]
pub struct PredictClient {
    http: reqwest::Client,
    base_url: Url,
    predict_url: Url,
}

impl PredictClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason,
        };

        let base_url = Url::parse(&config.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base_url.scheme())));
        }
        // resolved like a same-origin fetch: an absolute path replaces the base path
        let predict_url = base_url
            .join(&config.predict_path)
            .map_err(|e| invalid(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        debug!(%predict_url, timeout_secs = config.timeout_secs, "prediction client ready");
        Ok(Self {
            http,
            base_url,
            predict_url,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Single POST; no retries.
    pub async fn send(&self, request: &PredictionRequest) -> Result<PredictionReply, SubmitError> {
        trace!(url = %self.predict_url, "posting prediction request");
        let response = self
            .http
            .post(self.predict_url.clone())
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport)?;
        debug!(status, bytes = body.len(), "prediction response received");

        PredictionReply::from_http(status, &body)
    }

    /// `GET` the service root and report the status code.
    pub async fn check(&self) -> Result<u16, SubmitError> {
        let response = self
            .http
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        info!(url = %self.base_url, status, "prediction service reachable");
        Ok(status)
    }
}

impl PredictionService for PredictClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionReply, SubmitError> {
        self.send(request).await
    }
}

/// Flatten the error and its `source()` chain so the root cause is visible.
fn transport(err: reqwest::Error) -> SubmitError {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    SubmitError::Transport(message)
}

/// One full submission: validate, send, render. Blocked forms never reach `service`.
pub async fn submit_with<S: PredictionService>(
    controller: &mut PredictionFormController,
    service: &S,
) -> Result<(), FormError> {
    let submission = controller.submit()?;
    let outcome = service.predict(&submission.request).await;
    controller.complete(submission.id, outcome);
    Ok(())
}
