//! Classified evaluation outcomes.
//!
//! Every accepted request produces exactly one [`EvaluationOutcome`],
//! delivered to the controller through the bridge. The outcome shape is
//! serde-serializable so the hosting transport can ship it without this
//! crate owning a wire format.

use serde::{Deserialize, Serialize};

use crate::evaluator::{EvalError, GuestValue};
use crate::models::failure::ParseFailure;
use crate::trace;

/// Display hint derived from the runtime type of a produced guest value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Any value without a more specific rendering.
    Generic,
    /// A guest string value.
    String,
    /// A guest character value.
    Character,
    /// A guest numeric value.
    Numeric,
}

impl ValueKind {
    /// Classify a guest value into a display hint.
    ///
    /// The character hint relies on a textual heuristic inherited from the
    /// original bridge: a value rendered as a single-quoted one-character
    /// literal (exactly three characters) is reported as a character, so a
    /// real three-character quoted *string* misclassifies the same way.
    /// Preserved as-is, not fixed.
    #[must_use]
    pub fn classify(value: &GuestValue) -> Self {
        match value {
            GuestValue::Number(_) => Self::Numeric,
            GuestValue::Text(text) => {
                if text.chars().count() == 3 && text.starts_with('\'') && text.ends_with('\'') {
                    Self::Character
                } else {
                    Self::String
                }
            }
            GuestValue::Other(_) => Self::Generic,
        }
    }
}

/// The single, final classified result of one evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum EvaluationOutcome {
    /// The fragment executed and produced no value.
    Void,
    /// The fragment produced a value.
    Value {
        /// Textual rendering of the value.
        text: String,
        /// Display hint derived from the value's runtime type.
        hint: ValueKind,
    },
    /// The fragment failed to parse.
    SyntaxError {
        /// Structured parse failure from the evaluator.
        failure: ParseFailure,
        /// The offending source, verbatim as submitted.
        source: String,
    },
    /// Guest code, or the evaluator layer itself, failed at runtime.
    RuntimeFailure {
        /// Type name of the underlying failure.
        type_name: String,
        /// Failure message.
        message: String,
        /// Sanitized, indented trace with internal frames removed.
        trace: String,
        /// Short operator-facing message, when the failure exposed one.
        short_message: Option<String>,
    },
    /// The target session already had an evaluation in flight.
    Busy,
}

impl EvaluationOutcome {
    /// Classify the result of one `evaluate` call into an outcome.
    ///
    /// Runs exactly once per accepted request, at the point the evaluation
    /// task finishes.
    #[must_use]
    pub fn classify(
        result: std::result::Result<Option<GuestValue>, EvalError>,
        source: &str,
    ) -> Self {
        match result {
            Ok(None) => Self::Void,
            Ok(Some(value)) => Self::Value {
                hint: ValueKind::classify(&value),
                text: value.into_rendering(),
            },
            Err(EvalError::Parse(failure)) => Self::SyntaxError {
                failure,
                source: source.to_owned(),
            },
            Err(EvalError::Guest(failure)) => Self::RuntimeFailure {
                type_name: failure.type_name,
                message: failure.message,
                trace: trace::sanitize(&failure.trace),
                short_message: None,
            },
            Err(EvalError::Defect(defect)) => Self::RuntimeFailure {
                type_name: defect.type_name,
                message: defect.message,
                trace: trace::sanitize(&defect.trace),
                short_message: defect.short_message,
            },
        }
    }
}
