//! Execution coordination: busy gating, per-request tasks, outcome
//! classification.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, info_span, warn, Instrument};

use crate::bridge::{Bridge, SessionEvent};
use crate::models::outcome::EvaluationOutcome;
use crate::models::request::EvaluationRequest;
use crate::registry::SessionRegistry;
use crate::session::{BusyGuard, Session};
use crate::Result;

/// Accepts evaluation requests and runs each accepted one on its own task.
///
/// One task is spawned per accepted request, uncapped: there is no queue,
/// no backpressure, and no ordering across sessions. Within a session the
/// busy gate admits at most one evaluation at a time.
pub struct ExecutionCoordinator {
    registry: Arc<SessionRegistry>,
    bridge: Bridge,
}

impl ExecutionCoordinator {
    /// Build a coordinator over a registry and a delivery bridge.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, bridge: Bridge) -> Self {
        Self { registry, bridge }
    }

    /// Submit one evaluation request.
    ///
    /// Never blocks on the evaluation itself: session resolution and the
    /// busy check are the only synchronous steps. A busy session produces a
    /// `Busy` outcome through the bridge and nothing is spawned for it.
    ///
    /// Returns the join handle of the evaluation task when one was
    /// dispatched; production callers drop it, tests await it.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownSession`](crate::HostError::UnknownSession)
    /// when the request names a session that does not exist — before any
    /// task is spawned and before any busy flag is touched. Everything
    /// attributable to the evaluation itself arrives asynchronously as an
    /// [`EvaluationOutcome`], never as an error from `submit`.
    pub async fn submit(&self, request: EvaluationRequest) -> Result<Option<JoinHandle<()>>> {
        let session = self.registry.resolve(request.session.as_deref()).await?;

        let Some(guard) = BusyGuard::acquire(&session) else {
            info!(session = session.label(), "session busy; rejecting request");
            self.bridge.deliver(EvaluationOutcome::Busy).await;
            return Ok(None);
        };

        let bridge = self.bridge.clone();
        let handle = tokio::spawn(evaluate_task(session, guard, bridge, request.source));
        Ok(Some(handle))
    }
}

/// The per-request evaluation task.
///
/// Runs the evaluator on an inner task so a panicking interpreter is
/// contained: the busy guard is held out here and resets the flag on every
/// exit path, before the outcome leaves through the bridge.
async fn evaluate_task(session: Arc<Session>, guard: BusyGuard, bridge: Bridge, source: String) {
    let span = info_span!("evaluate", session = session.label());
    async {
        let eval_session = Arc::clone(&session);
        let eval_source = source.clone();
        let inner = tokio::spawn(async move {
            let result = eval_session.evaluator().evaluate(&eval_source).await;
            EvaluationOutcome::classify(result, &eval_source)
        });

        match inner.await {
            Ok(outcome) => {
                drop(guard);
                bridge.deliver(outcome).await;
            }
            Err(err) => {
                drop(guard);
                warn!(session = session.label(), %err, "evaluation task panicked");
                bridge
                    .session_event(SessionEvent::Unreachable {
                        session: session.label().to_owned(),
                    })
                    .await;
            }
        }
    }
    .instrument(span)
    .await;
}
