//! The prediction form controller.
//!
//! One controller per form. It owns the field values, the loading state and
//! the result panel, and it is driven entirely by method calls:
//! - `submit` validates and hands back the request to send,
//! - `complete` feeds the network outcome back in,
//! - `reset` and `copy_json` arm timers that `tick` later fires.
//!
//! In-flight requests are never cancelled. A reply that lands after a reset
//! still renders; last write wins.

use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::render::ResultView;
use crate::reply::{PredictionReply, SubmitError};
use crate::{FormError, FormFields, PredictionRequest};

pub const SUBMIT_LABEL: &str = "Predict";
pub const SUBMITTING_LABEL: &str = "Predicting…";
pub const COPY_LABEL: &str = "Copy JSON";
pub const COPIED_LABEL: &str = "Copied";

/// Delay between a form reset and clearing the result panel.
pub const RESET_CLEAR_DELAY: Duration = Duration::from_millis(10);
/// How long the copy action shows its "Copied" feedback.
pub const COPY_FEEDBACK: Duration = Duration::from_millis(1500);

/// Destination of the copy-JSON action.
pub trait Clipboard {
    fn copy_text(&mut self, text: &str);
}

/// A validated request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: Uuid,
    pub request: PredictionRequest,
}

/// Enabled state and label of the form's buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub submit_enabled: bool,
    pub reset_enabled: bool,
    pub submit_label: &'static str,
}

#[derive(Debug, Default)]
pub struct PredictionFormController {
    fields: FormFields,
    in_flight: Option<Uuid>,
    result: ResultView,
    validation: Option<FormError>,
    clear_at: Option<Instant>,
    copied_until: Option<Instant>,
}

impl PredictionFormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(fields: FormFields) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    pub fn result(&self) -> &ResultView {
        &self.result
    }

    /// Feedback from the last blocked submission, if any.
    pub fn validation(&self) -> Option<&FormError> {
        self.validation.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn controls(&self) -> ControlState {
        let loading = self.is_loading();
        ControlState {
            submit_enabled: !loading,
            reset_enabled: !loading,
            submit_label: if loading { SUBMITTING_LABEL } else { SUBMIT_LABEL },
        }
    }

    pub fn copy_label(&self) -> &'static str {
        if self.copied_until.is_some() {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    /// Validate and coerce the form. On success the controller enters the
    /// loading state with an empty result panel and the caller must send
    /// `submission.request`, then report back through [`Self::complete`].
    pub fn submit(&mut self) -> Result<Submission, FormError> {
        if let Some(id) = self.in_flight {
            debug!(%id, "submit ignored, request already in flight");
            return Err(FormError::Busy);
        }

        let request = match PredictionRequest::from_fields(&self.fields) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "form is invalid, submission blocked");
                self.validation = Some(err.clone());
                return Err(err);
            }
        };

        let id = Uuid::new_v4();
        info!(%id, "submitting prediction request");
        self.validation = None;
        self.in_flight = Some(id);
        self.show(ResultView::Empty);

        Ok(Submission { id, request })
    }

    /// Render the outcome of a submission and leave the loading state,
    /// whichever way the request went.
    pub fn complete(&mut self, id: Uuid, outcome: Result<PredictionReply, SubmitError>) {
        match self.in_flight {
            Some(current) if current == id => {}
            _ => warn!(%id, "outcome for a submission that is not in flight"),
        }

        match &outcome {
            Ok(reply) => info!(%id, prediction = reply.response.prediction, "prediction received"),
            Err(err) => warn!(%id, %err, "prediction failed"),
        }

        self.show(ResultView::from_outcome(&outcome));
        self.in_flight = None;
    }

    /// Native form reset: fields go back to their defaults now, the result
    /// panel clears once `RESET_CLEAR_DELAY` has passed.
    pub fn reset(&mut self, now: Instant) {
        info!("resetting form");
        self.fields = FormFields::default();
        self.validation = None;
        self.clear_at = Some(now + RESET_CLEAR_DELAY);
    }

    /// Fire due timers. Returns true when anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.clear_at.is_some_and(|at| at <= now) {
            trace!("deferred result clear");
            self.clear_at = None;
            self.show(ResultView::Empty);
            changed = true;
        }

        if self.copied_until.is_some_and(|at| at <= now) {
            self.copied_until = None;
            changed = true;
        }

        changed
    }

    /// Earliest pending timer, for scheduling the next `tick`.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.clear_at, self.copied_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Copy the displayed JSON. Returns false when no JSON block is shown.
    pub fn copy_json(&mut self, now: Instant, clipboard: &mut impl Clipboard) -> bool {
        let Some(json) = self.result.json() else {
            debug!("nothing to copy");
            return false;
        };

        clipboard.copy_text(json);
        debug!(bytes = json.len(), "copied result json");
        self.copied_until = Some(now + COPY_FEEDBACK);
        true
    }

    fn show(&mut self, view: ResultView) {
        self.result = view;
        // a fresh panel gets a fresh copy button
        self.copied_until = None;
    }
}
