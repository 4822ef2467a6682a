//! Classpath accumulation and fan-out propagation.
//!
//! Entries accumulate over the process lifetime and are never removed.
//! Every live session receives every entry: existing sessions through
//! best-effort fan-out when an entry arrives, new sessions through seeding
//! before they are registered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::evaluator::Evaluator;
use crate::session::Session;
use crate::Result;

/// Conceptual origin of a classpath entry.
///
/// Categories distinguish propagation targets in the surrounding build
/// system; for accumulation they share one dedup set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClasspathCategory {
    /// Source roots of the open project.
    Project,
    /// Build output directories.
    Build,
    /// External libraries resolved by the build.
    External,
    /// Paths added explicitly by the operator.
    Extra,
}

/// One accumulated resource-path entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ClasspathEntry {
    /// Origin category.
    pub category: ClasspathCategory,
    /// Resource path, unique across all categories.
    pub path: String,
}

/// Ordered, deduplicated, append-only set of classpath entries.
#[derive(Default)]
pub struct ClasspathAccumulator {
    entries: Mutex<Vec<ClasspathEntry>>,
}

impl ClasspathAccumulator {
    /// Build an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` if its value has not been seen before, in any category.
    ///
    /// Returns the recorded entry on first sighting — the caller fans it
    /// out to the live sessions — and `None` for a duplicate.
    pub async fn record(&self, category: ClasspathCategory, path: &str) -> Option<ClasspathEntry> {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|entry| entry.path == path) {
            return None;
        }
        let entry = ClasspathEntry {
            category,
            path: path.to_owned(),
        };
        entries.push(entry.clone());
        Some(entry)
    }

    /// Full accumulated sequence, in accumulation order.
    pub async fn entries(&self) -> Vec<ClasspathEntry> {
        self.entries.lock().await.clone()
    }

    /// Seed a freshly built evaluator with every accumulated entry, in
    /// accumulation order.
    ///
    /// # Errors
    ///
    /// Returns the first seeding failure: a session must not become usable
    /// with a partial classpath.
    pub async fn seed(&self, evaluator: &dyn Evaluator) -> Result<()> {
        for entry in self.entries().await {
            evaluator
                .add_classpath_entry(entry.category, &entry.path)
                .await?;
        }
        Ok(())
    }

    /// Best-effort fan-out of one entry to a set of sessions.
    ///
    /// A propagation failure on one session is logged and does not stop
    /// propagation to the rest.
    pub async fn propagate(entry: &ClasspathEntry, sessions: &[Arc<Session>]) {
        for session in sessions {
            if let Err(err) = session
                .evaluator()
                .add_classpath_entry(entry.category, &entry.path)
                .await
            {
                warn!(
                    session = session.label(),
                    path = %entry.path,
                    %err,
                    "classpath propagation failed"
                );
            }
        }
    }
}
