//! Session registry: the default session, named sessions, and the active
//! pointer.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::evaluator::Evaluator;
use crate::session::Session;
use crate::{HostError, Result};

/// Named sessions, indexed for lookup and ordered for fan-out.
#[derive(Default)]
struct NamedSessions {
    by_name: HashMap<String, Arc<Session>>,
    /// Registration order; classpath fan-out walks sessions in this order.
    order: Vec<String>,
}

/// Owns the permanent default session plus every named session.
pub struct SessionRegistry {
    default: Arc<Session>,
    named: RwLock<NamedSessions>,
    /// Name of the active session; `None` selects the default.
    active: RwLock<Option<String>>,
}

impl SessionRegistry {
    /// Build a registry around the permanent default session.
    #[must_use]
    pub fn new(default_evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            default: Arc::new(Session::default_session(default_evaluator)),
            named: RwLock::new(NamedSessions::default()),
            active: RwLock::new(None),
        }
    }

    /// The permanent default session.
    #[must_use]
    pub fn default_session(&self) -> Arc<Session> {
        Arc::clone(&self.default)
    }

    /// Whether `name` is currently registered.
    pub async fn contains(&self, name: &str) -> bool {
        self.named.read().await.by_name.contains_key(name)
    }

    /// Register a freshly built session under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DuplicateSession`] if the name is taken.
    pub async fn register(&self, name: &str, session: Session) -> Result<Arc<Session>> {
        let mut named = self.named.write().await;
        if named.by_name.contains_key(name) {
            return Err(HostError::DuplicateSession(name.to_owned()));
        }
        let session = Arc::new(session);
        named.by_name.insert(name.to_owned(), Arc::clone(&session));
        named.order.push(name.to_owned());
        info!(session = name, "session registered");
        Ok(session)
    }

    /// Remove a named session. Idempotent; the default session is not
    /// removable, and the active pointer is left untouched — callers that
    /// removed the active session call
    /// [`set_active_default`](Self::set_active_default).
    ///
    /// Returns whether an entry was actually evicted.
    pub async fn remove(&self, name: &str) -> bool {
        let mut named = self.named.write().await;
        if named.by_name.remove(name).is_none() {
            return false;
        }
        named.order.retain(|registered| registered != name);
        info!(session = name, "session removed");
        true
    }

    /// Look up a named session.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownSession`] if absent.
    pub async fn lookup(&self, name: &str) -> Result<Arc<Session>> {
        self.named
            .read()
            .await
            .by_name
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| HostError::UnknownSession(name.to_owned()))
    }

    /// Resolve a request's target: an explicit name, or the active session.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownSession`] if the explicit name — or the
    /// name the active pointer still holds after a removal — is absent.
    pub async fn resolve(&self, name: Option<&str>) -> Result<Arc<Session>> {
        match name {
            Some(explicit) => self.lookup(explicit).await,
            None => {
                let active = self.active.read().await.clone();
                match active {
                    Some(current) => self.lookup(&current).await,
                    None => Ok(self.default_session()),
                }
            }
        }
    }

    /// Point the active session at `name`.
    ///
    /// Returns whether the newly active session was busy at switch time — a
    /// hint, not a guarantee, since the flag can flip immediately after.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownSession`] if absent.
    pub async fn set_active(&self, name: &str) -> Result<bool> {
        let session = self.lookup(name).await?;
        *self.active.write().await = Some(name.to_owned());
        info!(session = name, "session activated");
        Ok(session.is_busy())
    }

    /// Point the active session back at the default.
    ///
    /// Returns the default session's busy hint.
    pub async fn set_active_default(&self) -> bool {
        *self.active.write().await = None;
        info!("default session activated");
        self.default.is_busy()
    }

    /// Snapshot of the default session followed by every named session in
    /// registration order, for classpath fan-out.
    pub async fn all_sessions(&self) -> Vec<Arc<Session>> {
        let named = self.named.read().await;
        let mut sessions = Vec::with_capacity(1 + named.order.len());
        sessions.push(Arc::clone(&self.default));
        for name in &named.order {
            if let Some(session) = named.by_name.get(name) {
                sessions.push(Arc::clone(session));
            }
        }
        sessions
    }
}
