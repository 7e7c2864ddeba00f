//! PTY bridge: the boundary to the process-management collaborator.
//!
//! The bridge owns the real processes. The rest of the crate only sees
//! session ids, fire-and-forget commands, and three global event streams
//! (data, exit, status) demultiplexed by session id.

mod events;
pub mod mock;
mod native;

use std::future::Future;
use std::path::Path;

use thiserror::Error;

pub use events::{EventHub, PtyData, PtyExit, PtyStatus, Subscription};
pub use mock::{BridgeCall, MockPtyBridge};
pub use native::{NativePtyBridge, SpawnConfig};

use crate::session::SessionId;

/// Bridge error type.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Failed to create the PTY.
    #[error("Failed to create PTY: {0}")]
    Creation(String),

    /// Failed to spawn the shell process.
    #[error("Failed to spawn process: {0}")]
    Spawn(String),

    /// I/O error talking to the PTY.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session id is not known to the bridge.
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    /// The bridge was shut down.
    #[error("PTY bridge is closed")]
    Closed,
}

/// Contract of the process-management collaborator.
///
/// Only [`create`](Self::create) is awaited. `write`, `resize` and `kill`
/// are notifications: callers log a failure and carry on.
pub trait PtyBridge: Send + Sync + 'static {
    /// Starts a shell in `cwd` and returns its freshly minted id.
    ///
    /// Callers must not assume a session exists until this resolves.
    fn create(
        &self,
        cwd: &Path,
        name: Option<&str>,
    ) -> impl Future<Output = Result<SessionId, BridgeError>> + Send;

    /// Sends input bytes to a session.
    fn write(&self, id: &SessionId, data: &[u8]) -> Result<(), BridgeError>;

    /// Tells a session its grid size changed.
    fn resize(&self, id: &SessionId, cols: u16, rows: u16) -> Result<(), BridgeError>;

    /// Terminates a session's process.
    fn kill(&self, id: &SessionId) -> Result<(), BridgeError>;

    /// Registers a listener for output of every session.
    fn on_data(&self, listener: impl Fn(&PtyData) + Send + Sync + 'static) -> Subscription;

    /// Registers a listener for process exits of every session.
    fn on_exit(&self, listener: impl Fn(&PtyExit) + Send + Sync + 'static) -> Subscription;

    /// Registers a listener for busy/idle changes of every session.
    fn on_status_change(
        &self,
        listener: impl Fn(&PtyStatus) + Send + Sync + 'static,
    ) -> Subscription;
}
