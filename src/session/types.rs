//! Session identity and status types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque session identifier.
///
/// Ids are only ever minted by a [`PtyBridge`](crate::bridge::PtyBridge), so an
/// id always corresponds to exactly one backend process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a bridge-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Liveness status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Nothing running in the foreground.
    #[default]
    Idle,
    /// Most recently focused or created session.
    Active,
    /// The backend reports foreground work.
    Busy,
}

impl SessionStatus {
    /// Returns the lowercase name used in logs and the tab bar.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Busy => "busy",
        }
    }
}

/// One logical terminal tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Bridge-assigned identifier.
    pub id: SessionId,
    /// User-facing label.
    pub name: String,
    /// Current status.
    pub status: SessionStatus,
    /// Project this session belongs to.
    pub project_path: PathBuf,
}

/// Tab bar row for one session of the active project.
#[derive(Debug, Clone, PartialEq)]
pub struct TabInfo {
    /// Position in display order (0-based).
    pub index: usize,
    /// Session identifier.
    pub id: SessionId,
    /// Tab name.
    pub name: String,
    /// Session status.
    pub status: SessionStatus,
    /// Whether this is the active session.
    pub is_active: bool,
}
