//! Outcome delivery bridge to the controller process.
//!
//! The controller may be unreachable at any moment — mid-shutdown, or the
//! transport may simply have dropped. Delivery and the one-way
//! notifications therefore tolerate transport failures: they are logged
//! locally and swallowed, never propagated into the coordinator or the
//! evaluation task.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::outcome::EvaluationOutcome;
use crate::Result;

/// Session-lifecycle notifications carried alongside outcomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum SessionEvent {
    /// A named session was created and seeded.
    Created {
        /// Session name.
        session: String,
    },
    /// A named session was removed.
    Removed {
        /// Session name.
        session: String,
    },
    /// A session's interpreter became unreachable: its evaluation task
    /// panicked beyond what the evaluator could classify. The session
    /// itself stays registered and idle.
    Unreachable {
        /// Session label.
        session: String,
    },
}

/// One-way channel into the controller process.
///
/// Implementations wrap the actual transport. Every method may fail with a
/// transport error, which the [`Bridge`] tolerates on the notification
/// paths.
pub trait ControllerChannel: Send + Sync {
    /// Deliver the final outcome of one evaluation request.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Transport`](crate::HostError::Transport) if the
    /// controller cannot be reached.
    fn deliver_outcome(
        &self,
        outcome: EvaluationOutcome,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Forward redirected guest output (an outbound "print" notification).
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Transport`](crate::HostError::Transport) if the
    /// controller cannot be reached.
    fn notify_stream_output(&self, text: &str)
        -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Announce a session-lifecycle event.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Transport`](crate::HostError::Transport) if the
    /// controller cannot be reached.
    fn notify_session_event(
        &self,
        event: SessionEvent,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Ask the controller for one line of console input.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Transport`](crate::HostError::Transport) if the
    /// controller cannot answer.
    fn request_console_input(&self) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

/// Failure-tolerant wrapper over the controller channel.
#[derive(Clone)]
pub struct Bridge {
    channel: Arc<dyn ControllerChannel>,
}

impl Bridge {
    /// Wrap a controller channel.
    #[must_use]
    pub fn new(channel: Arc<dyn ControllerChannel>) -> Self {
        Self { channel }
    }

    /// Deliver an outcome; a transport failure is logged and swallowed.
    pub async fn deliver(&self, outcome: EvaluationOutcome) {
        if let Err(err) = self.channel.deliver_outcome(outcome).await {
            warn!(%err, "outcome delivery failed; controller unreachable");
        }
    }

    /// Forward redirected guest output; failures are logged and swallowed.
    pub async fn stream_output(&self, text: &str) {
        if let Err(err) = self.channel.notify_stream_output(text).await {
            warn!(%err, "stream output notification failed");
        }
    }

    /// Announce a session-lifecycle event; failures are logged and
    /// swallowed.
    pub async fn session_event(&self, event: SessionEvent) {
        if let Err(err) = self.channel.notify_session_event(event).await {
            warn!(%err, "session event notification failed");
        }
    }

    /// Pull one line of console input from the controller.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Transport`](crate::HostError::Transport) when
    /// the controller cannot answer. Unlike the one-way notifications this
    /// is request-response: the blocked guest needs an answer, so the
    /// failure surfaces to the evaluator that asked.
    pub async fn console_input(&self) -> Result<String> {
        self.channel.request_console_input().await
    }
}
