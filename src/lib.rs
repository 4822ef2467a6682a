#![forbid(unsafe_code)]

//! Evaluator session manager with a cross-process execution bridge.
//!
//! Hosts named, stateful code-evaluation sessions inside a worker process.
//! Each request from the controller process runs on its own task behind a
//! per-session busy gate, and exactly one classified outcome per request
//! travels back through a failure-tolerant delivery bridge. Classpath
//! entries accumulated over the process lifetime stay consistent across
//! every live session.

pub mod bridge;
pub mod classpath;
pub mod coordinator;
pub mod errors;
pub mod evaluator;
pub mod manager;
pub mod models;
pub mod registry;
pub mod session;
pub mod trace;

pub use errors::{HostError, Result};
pub use manager::SessionManager;
