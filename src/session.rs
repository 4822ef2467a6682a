//! One named evaluation context and its busy gate.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::evaluator::Evaluator;

/// A named, stateful evaluation context wrapping one guest evaluator.
///
/// The busy flag is the per-session mutual-exclusion gate: it stays true
/// for the entire span between request acceptance and outcome production.
/// A removed-and-recreated name yields a fresh `Session`; instances are
/// never reused across removal.
pub struct Session {
    name: Option<String>,
    evaluator: Box<dyn Evaluator>,
    busy: AtomicBool,
}

impl Session {
    /// Wrap an evaluator as the reserved default session.
    #[must_use]
    pub fn default_session(evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            name: None,
            evaluator,
            busy: AtomicBool::new(false),
        }
    }

    /// Wrap an evaluator as a named session.
    #[must_use]
    pub fn named(name: impl Into<String>, evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            name: Some(name.into()),
            evaluator,
            busy: AtomicBool::new(false),
        }
    }

    /// Name the session was registered under, or `None` for the default.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Label used in logs and lifecycle events.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("default")
    }

    /// Borrow the wrapped evaluator.
    #[must_use]
    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// Whether an evaluation is currently in flight.
    ///
    /// Advisory: the flag can flip immediately after the read. Only
    /// [`try_claim`](Self::try_claim) decides admission.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn claim(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// RAII release of a session's busy gate.
///
/// Dropping the guard resets the flag, so the reset happens on every exit
/// path of the evaluation task, including panics.
#[derive(Debug)]
pub struct BusyGuard {
    session: Arc<Session>,
}

impl BusyGuard {
    /// Atomically claim a session's busy gate.
    ///
    /// Returns a reset guard when the session was idle, or `None` when an
    /// evaluation is already in flight. The read-check-then-set is a single
    /// compare-exchange, so two concurrent claims cannot both succeed.
    #[must_use]
    pub fn acquire(session: &Arc<Session>) -> Option<Self> {
        session.claim().then(|| Self {
            session: Arc::clone(session),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.session.busy.store(false, Ordering::Release);
    }
}
