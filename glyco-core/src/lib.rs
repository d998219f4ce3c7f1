//! glyco-core: form schema, wire model and the sans-IO prediction form controller.
//!
//! Design rules:
//! - Category codes are opaque integers owned by the prediction service.
//! - Field text is only coerced after the whole form passes native validity.
//! - No range checks; anything that parses is passed through.
//! - The controller never performs I/O; callers feed it time and network outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Path of the prediction endpoint relative to the service base URL.
pub const PREDICT_PATH: &str = "/predict";

/// How a field's text is coerced before it goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Base-10 integer parsing (category codes, 0/1 flags).
    Integer,
    /// Floating point parsing (measurements).
    Float,
}

/// The eight inputs of the prediction form, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Gender,
    Hypertension,
    HeartDisease,
    SmokingHistory,
    Bmi,
    Hba1cLevel,
    BloodGlucoseLevel,
    AgeCategory,
}

impl Field {
    pub const COUNT: usize = 8;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Gender,
        Field::Hypertension,
        Field::HeartDisease,
        Field::SmokingHistory,
        Field::Bmi,
        Field::Hba1cLevel,
        Field::BloodGlucoseLevel,
        Field::AgeCategory,
    ];

    /// JSON key used by the prediction service.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Field::Gender => "gender",
            Field::Hypertension => "hypertension",
            Field::HeartDisease => "heart_disease",
            Field::SmokingHistory => "smoking_history",
            Field::Bmi => "bmi",
            Field::Hba1cLevel => "HbA1c_level",
            Field::BloodGlucoseLevel => "blood_glucose_level",
            Field::AgeCategory => "age_category",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Gender => "Gender",
            Field::Hypertension => "Hypertension",
            Field::HeartDisease => "Heart disease",
            Field::SmokingHistory => "Smoking history",
            Field::Bmi => "BMI",
            Field::Hba1cLevel => "HbA1c level",
            Field::BloodGlucoseLevel => "Blood glucose level",
            Field::AgeCategory => "Age category",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Bmi | Field::Hba1cLevel | Field::BloodGlucoseLevel => FieldKind::Float,
            _ => FieldKind::Integer,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Raw text of every form input, as typed. `Default` is the reset state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: [String; Field::COUNT],
}

impl FormFields {
    /// Build from values given in `Field::ALL` order.
    pub fn from_values<S: Into<String>>(values: [S; Field::COUNT]) -> Self {
        Self {
            values: values.map(Into::into),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Mutable access for text widgets.
    pub fn value_mut(&mut self, field: Field) -> &mut String {
        &mut self.values[field.index()]
    }

    /// Native validity: every field required and a valid number literal.
    /// Reports the first invalid field in form order.
    pub fn validate(&self) -> Result<(), FormError> {
        for field in Field::ALL {
            let text = self.get(field).trim();
            if text.is_empty() {
                return Err(FormError::Missing { field });
            }
            if !is_valid_number(text) {
                return Err(FormError::NotNumeric {
                    field,
                    value: text.to_string(),
                });
            }
        }
        trace!("form passed native validity");
        Ok(())
    }
}

/// The JSON body of `POST /predict`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub gender: i64,
    pub hypertension: i64,
    pub heart_disease: i64,
    pub smoking_history: i64,
    pub bmi: f64,
    #[serde(rename = "HbA1c_level")]
    pub hba1c_level: f64,
    pub blood_glucose_level: f64,
    pub age_category: i64,
}

impl PredictionRequest {
    /// Validate the form, then coerce each field to its declared kind.
    pub fn from_fields(fields: &FormFields) -> Result<Self, FormError> {
        fields.validate()?;

        let int = |field: Field| parse_integer(field, fields.get(field).trim());
        let float = |field: Field| parse_float(field, fields.get(field).trim());

        let request = Self {
            gender: int(Field::Gender)?,
            hypertension: int(Field::Hypertension)?,
            heart_disease: int(Field::HeartDisease)?,
            smoking_history: int(Field::SmokingHistory)?,
            bmi: float(Field::Bmi)?,
            hba1c_level: float(Field::Hba1cLevel)?,
            blood_glucose_level: float(Field::BloodGlucoseLevel)?,
            age_category: int(Field::AgeCategory)?,
        };
        debug!(?request, "coerced prediction request");
        Ok(request)
    }
}

/// Reasons a submission is blocked before any request is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{} is required", .field.label())]
    Missing { field: Field },

    #[error("{} must be a number (got {value:?})", .field.label())]
    NotNumeric { field: Field, value: String },

    #[error("{} must start with a whole number (got {value:?})", .field.label())]
    NotInteger { field: Field, value: String },

    #[error("a prediction request is already in flight")]
    Busy,
}

impl FormError {
    /// The input the feedback should point at, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            FormError::Missing { field }
            | FormError::NotNumeric { field, .. }
            | FormError::NotInteger { field, .. } => Some(*field),
            FormError::Busy => None,
        }
    }
}

/// HTML "valid floating-point number": `-?(d+(.d+)?|.d+)([eE][+-]?d+)?`.
fn is_valid_number(text: &str) -> bool {
    let b = text.as_bytes();
    let digits = |mut i: usize| {
        let start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        (i, i - start)
    };

    let mut i = usize::from(b.first() == Some(&b'-'));
    let (next, int_digits) = digits(i);
    i = next;

    let mut frac_digits = 0;
    if b.get(i) == Some(&b'.') {
        let (next, n) = digits(i + 1);
        if n == 0 {
            return false;
        }
        i = next;
        frac_digits = n;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let (next, n) = digits(i);
        if n == 0 {
            return false;
        }
        i = next;
    }
    i == b.len()
}

/// Leading-integer parse: `"3.7"` -> 3, `"1e3"` -> 1.
fn parse_integer(field: Field, text: &str) -> Result<i64, FormError> {
    let sign_len = usize::from(text.starts_with('-'));
    let digit_len = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    text[..sign_len + digit_len]
        .parse::<i64>()
        .map_err(|_| FormError::NotInteger {
            field,
            value: text.to_string(),
        })
}

/// Overflow to infinity is an error, as in HTML float parsing.
fn parse_float(field: Field, text: &str) -> Result<f64, FormError> {
    let not_numeric = || FormError::NotNumeric {
        field,
        value: text.to_string(),
    };
    let value = text.parse::<f64>().map_err(|_| not_numeric())?;
    if !value.is_finite() {
        return Err(not_numeric());
    }
    Ok(value)
}

pub mod controller;
pub mod render;
pub mod reply;

pub use controller::{
    Clipboard, ControlState, PredictionFormController, Submission, COPIED_LABEL, COPY_FEEDBACK,
    COPY_LABEL, RESET_CLEAR_DELAY, SUBMITTING_LABEL, SUBMIT_LABEL,
};
pub use render::{format_percent, Outcome, PredictionView, ProbabilitySegment, ResultView};
pub use reply::{PredictionReply, PredictionResponse, SubmitError, REQUEST_FAILED, UNKNOWN_ERROR};
