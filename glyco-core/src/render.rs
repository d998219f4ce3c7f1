//! Result panel view model.
//!
//! Front ends draw a `ResultView`; they never look at the reply directly.

use crate::reply::{PredictionReply, SubmitError};

const TEXT_BAR_WIDTH: usize = 20;

/// Classification outcome and its presentation tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Positive,
    Negative,
}

impl Outcome {
    pub fn from_prediction(prediction: i64) -> Self {
        if prediction == 1 {
            Outcome::Positive
        } else {
            Outcome::Negative
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Positive => "Positive (has diabetes)",
            Outcome::Negative => "Negative (no diabetes)",
        }
    }

    /// A positive diagnosis is shown with the warning tone.
    pub fn is_warning(&self) -> bool {
        matches!(self, Outcome::Positive)
    }
}

/// One entry of the probability vector. `class_index` is the class label.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilitySegment {
    pub class_index: usize,
    pub value: f64,
    pub percent: String,
    /// Bar fill in `[0, 1]`.
    pub fill: f32,
}

impl ProbabilitySegment {
    fn new(class_index: usize, value: f64) -> Self {
        let fill = if value.is_finite() {
            value.clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        Self {
            class_index,
            value,
            percent: format_percent(value),
            fill,
        }
    }

    pub fn class_label(&self) -> String {
        format!("class {}", self.class_index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub outcome: Outcome,
    pub segments: Vec<ProbabilitySegment>,
    /// Exactly the text the copy action puts on the clipboard.
    pub json: String,
}

impl PredictionView {
    pub fn from_reply(reply: &PredictionReply) -> Self {
        let segments = reply
            .response
            .probability
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, v)| ProbabilitySegment::new(i, *v))
            .collect();

        Self {
            outcome: Outcome::from_prediction(reply.response.prediction),
            segments,
            json: reply.pretty_json(),
        }
    }

    pub fn headline(&self) -> String {
        format!("Prediction: {}", self.outcome.label())
    }
}

/// What the result area currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResultView {
    /// Initial and reset state: nothing at all.
    #[default]
    Empty,
    Error {
        message: String,
    },
    Prediction(PredictionView),
}

impl ResultView {
    pub fn from_outcome(outcome: &Result<PredictionReply, SubmitError>) -> Self {
        match outcome {
            Ok(reply) => ResultView::Prediction(PredictionView::from_reply(reply)),
            Err(err) => ResultView::Error {
                message: err.to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResultView::Empty)
    }

    /// JSON block text, present only for a rendered prediction.
    pub fn json(&self) -> Option<&str> {
        match self {
            ResultView::Prediction(view) => Some(&view.json),
            _ => None,
        }
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        match self {
            ResultView::Empty => String::new(),
            ResultView::Error { message } => format!("Error: {message}"),
            ResultView::Prediction(view) => {
                let mut out = view.headline();
                out.push('\n');
                for segment in &view.segments {
                    let filled = (segment.fill * TEXT_BAR_WIDTH as f32).round() as usize;
                    out.push_str(&format!(
                        "{:<8} {:>7} [{}{}]\n",
                        segment.class_label(),
                        segment.percent,
                        "#".repeat(filled),
                        " ".repeat(TEXT_BAR_WIDTH - filled),
                    ));
                }
                out.push_str(&view.json);
                out
            }
        }
    }
}

/// `value * 100` with one decimal and a `%` sign, rounded the way `toFixed(1)`
/// rounds: from the exact binary value, with exact ties going away from zero.
pub fn format_percent(value: f64) -> String {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return format!("{scaled}%");
    }
    // std formatting breaks exact ties to even; only those need correcting
    let magnitude = scaled.abs();
    let lower = (magnitude * 10.0).floor();
    if magnitude.mul_add(10.0, -(lower + 0.5)) == 0.0 {
        let rounded = (lower + 1.0) / 10.0;
        return format!("{:.1}%", rounded.copysign(scaled));
    }
    format!("{scaled:.1}%")
}
