//! The session manager facade.
//!
//! Composes the registry, the classpath accumulator, and the execution
//! coordinator behind one object. Constructed once by the hosting process
//! and passed explicitly wherever it is needed — there is no process-wide
//! instance, so tests run several managers side by side.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::bridge::{Bridge, ControllerChannel, SessionEvent};
use crate::classpath::{ClasspathAccumulator, ClasspathCategory};
use crate::coordinator::ExecutionCoordinator;
use crate::evaluator::EvaluatorFactory;
use crate::models::request::EvaluationRequest;
use crate::registry::SessionRegistry;
use crate::session::Session;
use crate::{HostError, Result};

/// Hosts evaluation sessions and brokers requests between the controller
/// channel and the guest evaluators.
pub struct SessionManager {
    registry: Arc<SessionRegistry>,
    classpath: ClasspathAccumulator,
    coordinator: ExecutionCoordinator,
    bridge: Bridge,
    /// Serializes classpath accumulation against session creation so every
    /// session observes every entry exactly once, in accumulation order.
    consistency: Mutex<()>,
}

impl SessionManager {
    /// Build a manager and its default session.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Evaluator`] if the default evaluator cannot be
    /// built.
    pub async fn start(
        default_factory: &dyn EvaluatorFactory,
        channel: Arc<dyn ControllerChannel>,
    ) -> Result<Self> {
        let evaluator = default_factory.build().await?;
        let registry = Arc::new(SessionRegistry::new(evaluator));
        let bridge = Bridge::new(channel);
        let coordinator = ExecutionCoordinator::new(Arc::clone(&registry), bridge.clone());
        info!("session manager started");
        Ok(Self {
            registry,
            classpath: ClasspathAccumulator::new(),
            coordinator,
            bridge,
            consistency: Mutex::new(()),
        })
    }

    /// The session registry, for lookup and direct inspection.
    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// The failure-tolerant bridge; guest IO paths use it directly.
    #[must_use]
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Create a named session: build its evaluator, seed every classpath
    /// entry accumulated so far in accumulation order, then register it.
    ///
    /// The session becomes eligible for targeting and activation as soon as
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DuplicateSession`] if the name is taken, or
    /// [`HostError::Evaluator`] if building or seeding fails — the session
    /// is not registered in that case.
    pub async fn create_session(&self, name: &str, factory: &dyn EvaluatorFactory) -> Result<()> {
        {
            let _consistency = self.consistency.lock().await;
            if self.registry.contains(name).await {
                return Err(HostError::DuplicateSession(name.to_owned()));
            }
            let evaluator = factory.build().await?;
            self.classpath.seed(evaluator.as_ref()).await?;
            self.registry
                .register(name, Session::named(name, evaluator))
                .await?;
        }
        self.bridge
            .session_event(SessionEvent::Created {
                session: name.to_owned(),
            })
            .await;
        Ok(())
    }

    /// Remove a named session. Idempotent; never touches the default
    /// session. The active pointer is not repointed — call
    /// [`activate_default`](Self::activate_default) when removing the
    /// active session.
    pub async fn remove_session(&self, name: &str) {
        if self.registry.remove(name).await {
            self.bridge
                .session_event(SessionEvent::Removed {
                    session: name.to_owned(),
                })
                .await;
        }
    }

    /// Accumulate a classpath entry and fan it out to the default session
    /// and every named session, in registration order.
    ///
    /// Idempotent by path value. Per-session propagation failures are
    /// logged and do not stop the fan-out.
    pub async fn add_classpath_entry(&self, category: ClasspathCategory, path: &str) {
        let _consistency = self.consistency.lock().await;
        let Some(entry) = self.classpath.record(category, path).await else {
            return;
        };
        let sessions = self.registry.all_sessions().await;
        ClasspathAccumulator::propagate(&entry, &sessions).await;
    }

    /// Point the active session at `name`; returns its busy hint.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownSession`] if absent.
    pub async fn set_active(&self, name: &str) -> Result<bool> {
        self.registry.set_active(name).await
    }

    /// Point the active session back at the default; returns its busy hint.
    pub async fn activate_default(&self) -> bool {
        self.registry.set_active_default().await
    }

    /// Submit an evaluation request.
    ///
    /// See [`ExecutionCoordinator::submit`] for the full contract.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownSession`] for an unknown target session.
    pub async fn submit(&self, request: EvaluationRequest) -> Result<Option<JoinHandle<()>>> {
        self.coordinator.submit(request).await
    }
}
