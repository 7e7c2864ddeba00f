//! Terminal sessions and the registry that owns them.
//!
//! A session is one logical tab backed by exactly one PTY process. Sessions
//! are partitioned by project path; the registry only exposes the active
//! project's sessions for display and lifecycle decisions.

mod registry;
mod types;

pub use registry::{DEFAULT_NAME_PREFIX, Removal, SessionRegistry};
pub use types::{Session, SessionId, SessionStatus, TabInfo};
