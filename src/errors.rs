//! Error types shared across the crate.

use std::fmt::{Display, Formatter};

/// Shared result type.
pub type Result<T> = std::result::Result<T, HostError>;

/// Host-side error enumeration covering all synchronous failure modes.
///
/// Guest evaluation failures never appear here: anything attributable to a
/// single evaluation request is packaged into that request's
/// [`EvaluationOutcome`](crate::models::outcome::EvaluationOutcome) and
/// delivered asynchronously instead.
#[derive(Debug)]
pub enum HostError {
    /// A session with the requested name is already registered.
    DuplicateSession(String),
    /// No session with the requested name is registered.
    UnknownSession(String),
    /// Controller channel transport failure.
    Transport(String),
    /// Evaluator construction or classpath propagation failure.
    Evaluator(String),
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSession(name) => write!(f, "duplicate session: {name}"),
            Self::UnknownSession(name) => write!(f, "unknown session: {name}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Evaluator(msg) => write!(f, "evaluator: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}
