//! Guest evaluator abstraction.
//!
//! The [`Evaluator`] trait decouples the session core from the embedded
//! guest-language interpreter. The core never parses or executes source
//! itself; it hands a fragment to the evaluator and classifies whatever
//! comes back.

use std::future::Future;
use std::pin::Pin;

use crate::classpath::ClasspathCategory;
use crate::models::failure::{EvalDefect, GuestFailure, ParseFailure};
use crate::Result;

/// A guest value produced by a successful evaluation.
///
/// Closed representation of the evaluator's value rendering; the display
/// hint is derived from these tags once, at outcome-construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestValue {
    /// A guest string value, rendered with the evaluator's own quoting.
    Text(String),
    /// A guest numeric value rendered in decimal form.
    Number(String),
    /// Any other guest value rendered through its display conversion.
    Other(String),
}

impl GuestValue {
    /// Textual rendering shipped to the controller.
    #[must_use]
    pub fn rendering(&self) -> &str {
        match self {
            Self::Text(text) | Self::Number(text) | Self::Other(text) => text,
        }
    }

    /// Consume the value, yielding its textual rendering.
    #[must_use]
    pub fn into_rendering(self) -> String {
        match self {
            Self::Text(text) | Self::Number(text) | Self::Other(text) => text,
        }
    }
}

/// Failure modes of a single `evaluate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The evaluator wrapped a guest-level exception whose cause is a
    /// parse-class failure: the source never executed.
    Parse(ParseFailure),
    /// The evaluator wrapped a guest-level exception raised while the
    /// fragment executed.
    Guest(GuestFailure),
    /// The evaluator layer itself failed, outside any guest exception
    /// wrapping.
    Defect(EvalDefect),
}

/// One embedded guest-language interpreter instance.
///
/// Implementations wrap the actual interpreter; evaluation may block for an
/// arbitrary, guest-controlled duration (guest code may loop, or wait on
/// redirected console input).
pub trait Evaluator: Send + Sync {
    /// Evaluate one source fragment.
    ///
    /// Returns `Ok(None)` when the fragment produced no value — the void
    /// sentinel, e.g. for an assignment — and `Ok(Some(value))` otherwise.
    fn evaluate(
        &self,
        source: &str,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<Option<GuestValue>, EvalError>> + Send + '_>>;

    /// Make a resource path visible to guest code in this interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Evaluator`](crate::HostError::Evaluator) if the
    /// interpreter rejects the path.
    fn add_classpath_entry(
        &self,
        category: ClasspathCategory,
        path: &str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Constructs fresh evaluators for newly created sessions.
pub trait EvaluatorFactory: Send + Sync {
    /// Build a new interpreter instance.
    ///
    /// The caller seeds every accumulated classpath entry into the result
    /// before the session backed by it becomes usable.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Evaluator`](crate::HostError::Evaluator) if the
    /// interpreter cannot be constructed.
    fn build(&self) -> Pin<Box<dyn Future<Output = Result<Box<dyn Evaluator>>> + Send + '_>>;
}
