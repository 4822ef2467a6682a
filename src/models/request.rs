//! Evaluation request model.

/// One evaluation request originating in the controller process.
///
/// Ephemeral: requests are consumed by the coordinator and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    /// Source fragment to evaluate.
    pub source: String,
    /// Target session name; `None` targets the active session.
    pub session: Option<String>,
}

impl EvaluationRequest {
    /// Build a request against the active session.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            session: None,
        }
    }

    /// Build a request against a named session.
    #[must_use]
    pub fn for_session(source: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            session: Some(session.into()),
        }
    }
}
