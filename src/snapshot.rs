//! Workspace snapshot: the layout and tab list of one project, serializable
//! so a later run can rebuild it against fresh sessions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::SplitDirection;
use crate::session::SessionId;

/// Snapshot file name.
const SNAPSHOT_FILE: &str = "workspace.json";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A saved session. The id is informational; restore mints new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Session id at save time.
    pub id: SessionId,
    /// Display name.
    pub name: String,
}

/// A saved pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneEntry {
    /// Index into [`WorkspaceSnapshot::sessions`].
    pub session_index: usize,
    /// Relative weight.
    pub size: f32,
}

/// Serializable view of a project's sessions and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    /// Format version.
    pub version: u32,
    /// Project the sessions belong to.
    pub project_path: PathBuf,
    /// Split direction.
    pub direction: SplitDirection,
    /// Panes in render order.
    pub panes: Vec<PaneEntry>,
    /// Sessions in tab order.
    pub sessions: Vec<SessionEntry>,
    /// Position of the focused pane in `panes`.
    #[serde(default)]
    pub focused_pane_index: Option<usize>,
    /// Position of the active session in `sessions`.
    #[serde(default)]
    pub active_session_index: Option<usize>,
}

impl WorkspaceSnapshot {
    /// Creates an empty snapshot for `project_path`.
    #[must_use]
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            project_path: project_path.into(),
            direction: SplitDirection::None,
            panes: Vec::new(),
            sessions: Vec::new(),
            focused_pane_index: None,
            active_session_index: None,
        }
    }

    /// Returns the default snapshot path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termdeck")
            .join(SNAPSHOT_FILE)
    }

    /// Saves to the default path.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Loads from the default path.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load() -> io::Result<Option<Self>> {
        Self::load_from(&Self::default_path())
    }

    /// Saves to `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)?;

        tracing::info!("Workspace saved to {:?}", path);
        Ok(())
    }

    /// Loads from `path`. A missing file yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, cannot be parsed, or has
    /// a newer version.
    pub fn load_from(path: &Path) -> io::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported snapshot version {}", snapshot.version),
            ));
        }

        tracing::info!("Workspace loaded from {:?}", path);
        Ok(Some(snapshot))
    }
}
