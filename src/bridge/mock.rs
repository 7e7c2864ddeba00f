//! In-memory bridge for tests and headless use.
//!
//! Records every call and lets the caller inject output, exits and status
//! changes as if a backend had produced them.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{BridgeError, EventHub, PtyBridge, PtyData, PtyExit, PtyStatus, Subscription};
use crate::session::SessionId;

/// A call made against a [`MockPtyBridge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    /// `create(cwd, name)`.
    Create {
        /// Working directory requested.
        cwd: PathBuf,
        /// Name hint passed along.
        name: Option<String>,
    },
    /// `write(id, data)`.
    Write(SessionId, Vec<u8>),
    /// `resize(id, cols, rows)`.
    Resize(SessionId, u16, u16),
    /// `kill(id)`.
    Kill(SessionId),
}

#[derive(Default)]
struct MockState {
    next_id: usize,
    live: Vec<SessionId>,
    calls: Vec<BridgeCall>,
    fail_creates: usize,
    fail_after: Option<usize>,
    kill_fails: bool,
}

/// Scriptable bridge that never touches real processes.
#[derive(Clone, Default)]
pub struct MockPtyBridge {
    state: Arc<Mutex<MockState>>,
    data: Arc<EventHub<PtyData>>,
    exit: Arc<EventHub<PtyExit>>,
    status: Arc<EventHub<PtyStatus>>,
}

impl MockPtyBridge {
    /// Creates an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create` fail.
    pub fn fail_next_create(&self) {
        self.state.lock().fail_creates += 1;
    }

    /// Lets `successes` more creates through, then fails the one after.
    pub fn fail_create_after(&self, successes: usize) {
        self.state.lock().fail_after = Some(successes);
    }

    /// Makes every `kill` report an error (the session is still dropped).
    pub fn set_kill_fails(&self, fails: bool) {
        self.state.lock().kill_fails = fails;
    }

    /// Injects output for `id`.
    pub fn emit_data(&self, id: &SessionId, chunk: &[u8]) {
        self.data.emit(&PtyData {
            session: id.clone(),
            chunk: chunk.to_vec(),
        });
    }

    /// Injects a process exit for `id`.
    pub fn emit_exit(&self, id: &SessionId, code: i32) {
        self.exit.emit(&PtyExit {
            session: id.clone(),
            code,
        });
    }

    /// Injects a busy/idle change for `id`.
    pub fn emit_status(&self, id: &SessionId, busy: bool) {
        self.status.emit(&PtyStatus {
            session: id.clone(),
            busy,
        });
    }

    /// Returns every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BridgeCall> {
        self.state.lock().calls.clone()
    }

    /// Returns the resizes sent to `id`, oldest first.
    #[must_use]
    pub fn resizes_for(&self, id: &SessionId) -> Vec<(u16, u16)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                BridgeCall::Resize(sid, cols, rows) if sid == id => Some((*cols, *rows)),
                _ => None,
            })
            .collect()
    }

    /// Returns all bytes written to `id`, concatenated.
    #[must_use]
    pub fn writes_for(&self, id: &SessionId) -> Vec<u8> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                BridgeCall::Write(sid, data) if sid == id => Some(data.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Returns true if `kill` was called for `id`.
    #[must_use]
    pub fn killed(&self, id: &SessionId) -> bool {
        self.state
            .lock()
            .calls
            .iter()
            .any(|call| matches!(call, BridgeCall::Kill(sid) if sid == id))
    }

    /// Returns true if `id` was created and not yet killed.
    #[must_use]
    pub fn is_live(&self, id: &SessionId) -> bool {
        self.state.lock().live.contains(id)
    }

    /// Returns the number of sessions created and not killed.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }

    /// Returns the number of registered data listeners.
    #[must_use]
    pub fn data_listener_count(&self) -> usize {
        self.data.listener_count()
    }

    /// Returns the number of registered exit listeners.
    #[must_use]
    pub fn exit_listener_count(&self) -> usize {
        self.exit.listener_count()
    }

    fn create_now(&self, cwd: &Path, name: Option<&str>) -> Result<SessionId, BridgeError> {
        let mut state = self.state.lock();
        state.calls.push(BridgeCall::Create {
            cwd: cwd.to_path_buf(),
            name: name.map(str::to_string),
        });

        if state.fail_creates > 0 {
            state.fail_creates -= 1;
            return Err(BridgeError::Spawn("scripted failure".to_string()));
        }
        match state.fail_after {
            Some(0) => {
                state.fail_after = None;
                return Err(BridgeError::Spawn("scripted failure".to_string()));
            }
            Some(n) => state.fail_after = Some(n - 1),
            None => {}
        }

        state.next_id += 1;
        let id = SessionId::new(format!("term-{}", state.next_id));
        state.live.push(id.clone());
        Ok(id)
    }
}

impl PtyBridge for MockPtyBridge {
    fn create(
        &self,
        cwd: &Path,
        name: Option<&str>,
    ) -> impl Future<Output = Result<SessionId, BridgeError>> + Send {
        let result = self.create_now(cwd, name);
        async move {
            tokio::task::yield_now().await;
            result
        }
    }

    fn write(&self, id: &SessionId, data: &[u8]) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        state.calls.push(BridgeCall::Write(id.clone(), data.to_vec()));
        if state.live.contains(id) {
            Ok(())
        } else {
            Err(BridgeError::UnknownSession(id.clone()))
        }
    }

    fn resize(&self, id: &SessionId, cols: u16, rows: u16) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        state.calls.push(BridgeCall::Resize(id.clone(), cols, rows));
        if state.live.contains(id) {
            Ok(())
        } else {
            Err(BridgeError::UnknownSession(id.clone()))
        }
    }

    fn kill(&self, id: &SessionId) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        state.calls.push(BridgeCall::Kill(id.clone()));
        let was_live = state.live.contains(id);
        state.live.retain(|live| live != id);

        if state.kill_fails {
            return Err(BridgeError::Io(std::io::Error::other("scripted kill failure")));
        }
        if was_live {
            Ok(())
        } else {
            Err(BridgeError::UnknownSession(id.clone()))
        }
    }

    fn on_data(&self, listener: impl Fn(&PtyData) + Send + Sync + 'static) -> Subscription {
        self.data.subscribe(listener)
    }

    fn on_exit(&self, listener: impl Fn(&PtyExit) + Send + Sync + 'static) -> Subscription {
        self.exit.subscribe(listener)
    }

    fn on_status_change(
        &self,
        listener: impl Fn(&PtyStatus) + Send + Sync + 'static,
    ) -> Subscription {
        self.status.subscribe(listener)
    }
}
