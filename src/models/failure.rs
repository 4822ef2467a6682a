//! Structured guest failure payloads handed over by the evaluator.

use serde::{Deserialize, Serialize};

/// Structured parse failure reported by the guest evaluator for malformed
/// source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ParseFailure {
    /// Parser message, e.g. `unbalanced parenthesis`.
    pub message: String,
    /// One-based line of the offending token, when the parser knows it.
    pub line: Option<u32>,
    /// One-based column of the offending token, when the parser knows it.
    pub column: Option<u32>,
}

/// A guest-level exception raised while the submitted fragment executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestFailure {
    /// Guest type name of the raised exception.
    pub type_name: String,
    /// Exception message.
    pub message: String,
    /// Raw trace lines: summary first, innermost frame next.
    pub trace: Vec<String>,
}

/// A failure raised by the evaluator layer itself rather than by guest
/// code, e.g. a defect in a guest value's own display conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalDefect {
    /// Type name of the failure.
    pub type_name: String,
    /// Failure message.
    pub message: String,
    /// Raw trace lines: summary first, innermost frame next.
    pub trace: Vec<String>,
    /// Short operator-facing message, when the failure exposes one.
    pub short_message: Option<String>,
}
