//! Native PTY bridge using portable-pty.
//!
//! One reader thread per session forwards output in read order, so the
//! data stream preserves per-session ordering.

use std::collections::HashMap;
use std::future::Future;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use portable_pty::{Child, CommandBuilder, MasterPty, PtySize, native_pty_system};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BridgeError, EventHub, PtyBridge, PtyData, PtyExit, PtyStatus, Subscription};
use crate::session::SessionId;

/// Maximum read buffer size.
const READ_BUFFER_SIZE: usize = 4096;

/// How often the reader polls for an exit status after EOF.
const EXIT_POLL_ATTEMPTS: usize = 50;

/// Delay between exit status polls.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Exit code reported when the real one cannot be read.
const UNKNOWN_EXIT_CODE: i32 = -1;

/// How new sessions are spawned.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Shell to spawn (None = system default).
    pub shell: Option<PathBuf>,
    /// Arguments to the shell.
    pub args: Vec<String>,
    /// Environment variables to set.
    pub env: Vec<(String, String)>,
    /// Initial columns, until the first fit.
    pub cols: u16,
    /// Initial rows, until the first fit.
    pub rows: u16,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            shell: None,
            args: Vec::new(),
            env: vec![
                ("TERM".to_string(), "xterm-256color".to_string()),
                ("COLORTERM".to_string(), "truecolor".to_string()),
            ],
            cols: 80,
            rows: 24,
        }
    }
}

impl SpawnConfig {
    /// Sets the shell.
    #[must_use]
    pub fn shell(mut self, shell: Option<PathBuf>) -> Self {
        self.shell = shell;
        self
    }

    /// Sets the shell arguments.
    #[must_use]
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Sets the initial dimensions.
    #[must_use]
    pub fn size(mut self, cols: u16, rows: u16) -> Self {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self
    }
}

/// A live PTY session.
struct PtyInstance {
    /// Master PTY handle.
    master: Box<dyn MasterPty + Send>,
    /// Writer to the PTY.
    writer: Box<dyn Write + Send>,
    /// Child process, shared with the reader thread for exit codes.
    child: Arc<Mutex<Box<dyn Child + Send + Sync>>>,
    /// Shell process id.
    pid: Option<u32>,
    /// Last reported foreground state.
    busy: bool,
}

struct Shared {
    instances: Mutex<HashMap<SessionId, PtyInstance>>,
    config: RwLock<SpawnConfig>,
    data: EventHub<PtyData>,
    exit: EventHub<PtyExit>,
    status: EventHub<PtyStatus>,
}

impl Shared {
    fn spawn(self: &Arc<Self>, cwd: &Path, name: Option<&str>) -> Result<SessionId, BridgeError> {
        let config = self.config.read().clone();

        let pair = native_pty_system()
            .openpty(PtySize {
                rows: config.rows,
                cols: config.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| BridgeError::Creation(e.to_string()))?;

        let mut cmd = match &config.shell {
            Some(shell) => {
                let mut cmd = CommandBuilder::new(shell);
                for arg in &config.args {
                    cmd.arg(arg);
                }
                cmd
            }
            None => CommandBuilder::new_default_prog(),
        };
        for (key, value) in &config.env {
            cmd.env(key, value);
        }
        cmd.cwd(cwd);

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| BridgeError::Spawn(e.to_string()))?;
        // The slave must be closed here or reads never hit EOF after exit.
        drop(pair.slave);

        let pid = child.process_id();
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| BridgeError::Io(std::io::Error::other(e)))?;
        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| BridgeError::Io(std::io::Error::other(e)))?;

        let id = SessionId::new(format!("pty-{}", Uuid::new_v4()));
        let child = Arc::new(Mutex::new(child));

        self.instances.lock().insert(
            id.clone(),
            PtyInstance {
                master: pair.master,
                writer,
                child: Arc::clone(&child),
                pid,
                busy: false,
            },
        );

        spawn_reader(Arc::downgrade(self), id.clone(), reader, child);

        info!(
            "Spawned session {} ({}) in {} pid={:?}",
            id,
            name.unwrap_or("unnamed"),
            cwd.display(),
            pid
        );
        Ok(id)
    }
}

/// Forwards a session's output until EOF, then reports its exit.
fn spawn_reader(
    shared: Weak<Shared>,
    id: SessionId,
    mut reader: Box<dyn Read + Send>,
    child: Arc<Mutex<Box<dyn Child + Send + Sync>>>,
) {
    thread::spawn(move || {
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    let Some(shared) = shared.upgrade() else {
                        return;
                    };
                    shared.data.emit(&PtyData {
                        session: id.clone(),
                        chunk: buffer[..n].to_vec(),
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("Reader for {} stopped: {}", id, e);
                    break;
                }
            }
        }

        let code = wait_for_exit(&child);
        let Some(shared) = shared.upgrade() else {
            return;
        };
        // Killed sessions were removed already; nobody is listening for them.
        let registered = shared.instances.lock().contains_key(&id);
        if registered {
            info!("Session {} exited with code {}", id, code);
            shared.exit.emit(&PtyExit { session: id, code });
        }
    });
}

fn wait_for_exit(child: &Mutex<Box<dyn Child + Send + Sync>>) -> i32 {
    for _ in 0..EXIT_POLL_ATTEMPTS {
        match child.lock().try_wait() {
            Ok(Some(status)) => return status.exit_code() as i32,
            Ok(None) => {}
            Err(e) => {
                debug!("try_wait failed: {}", e);
                return UNKNOWN_EXIT_CODE;
            }
        }
        thread::sleep(EXIT_POLL_INTERVAL);
    }
    UNKNOWN_EXIT_CODE
}

/// PTY bridge spawning real shells on the local machine.
pub struct NativePtyBridge {
    shared: Arc<Shared>,
}

impl NativePtyBridge {
    /// Creates a bridge with the default spawn configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SpawnConfig::default())
    }

    /// Creates a bridge with a custom spawn configuration.
    #[must_use]
    pub fn with_config(config: SpawnConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                instances: Mutex::new(HashMap::new()),
                config: RwLock::new(config),
                data: EventHub::new(),
                exit: EventHub::new(),
                status: EventHub::new(),
            }),
        }
    }

    /// Replaces the shell used by sessions created from now on.
    pub fn set_shell(&self, shell: Option<PathBuf>) {
        self.shared.config.write().shell = shell;
    }

    /// Returns a copy of the spawn configuration.
    #[must_use]
    pub fn config(&self) -> SpawnConfig {
        self.shared.config.read().clone()
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.shared.instances.lock().len()
    }

    /// Compares each session's foreground process group with its shell and
    /// emits a status event for every session whose busy flag flipped.
    #[cfg(unix)]
    pub fn poll_status(&self) {
        let mut changes = Vec::new();
        {
            let mut instances = self.shared.instances.lock();
            for (id, instance) in instances.iter_mut() {
                let leader = instance.master.process_group_leader();
                let busy = match (leader, instance.pid) {
                    (Some(leader), Some(pid)) => leader as u32 != pid,
                    _ => false,
                };
                if busy != instance.busy {
                    instance.busy = busy;
                    changes.push(PtyStatus {
                        session: id.clone(),
                        busy,
                    });
                }
            }
        }

        for change in &changes {
            self.shared.status.emit(change);
        }
    }

    /// Foreground detection needs process groups; nothing to report here.
    #[cfg(not(unix))]
    pub fn poll_status(&self) {}

    /// Kills every session.
    pub fn shutdown(&self) {
        let ids: Vec<SessionId> = self.shared.instances.lock().keys().cloned().collect();
        for id in ids {
            if let Err(e) = self.kill(&id) {
                warn!("Failed to kill {} during shutdown: {}", id, e);
            }
        }
    }
}

impl Default for NativePtyBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NativePtyBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl PtyBridge for NativePtyBridge {
    fn create(
        &self,
        cwd: &Path,
        name: Option<&str>,
    ) -> impl Future<Output = Result<SessionId, BridgeError>> + Send {
        let shared = Arc::clone(&self.shared);
        let cwd = cwd.to_path_buf();
        let name = name.map(str::to_string);

        async move {
            let joined =
                tokio::task::spawn_blocking(move || shared.spawn(&cwd, name.as_deref())).await;
            match joined {
                Ok(result) => result,
                Err(e) => Err(BridgeError::Creation(e.to_string())),
            }
        }
    }

    fn write(&self, id: &SessionId, data: &[u8]) -> Result<(), BridgeError> {
        let mut instances = self.shared.instances.lock();
        let instance = instances
            .get_mut(id)
            .ok_or_else(|| BridgeError::UnknownSession(id.clone()))?;
        instance.writer.write_all(data)?;
        instance.writer.flush()?;
        Ok(())
    }

    fn resize(&self, id: &SessionId, cols: u16, rows: u16) -> Result<(), BridgeError> {
        let instances = self.shared.instances.lock();
        let instance = instances
            .get(id)
            .ok_or_else(|| BridgeError::UnknownSession(id.clone()))?;
        instance
            .master
            .resize(PtySize {
                rows: rows.max(1),
                cols: cols.max(1),
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| BridgeError::Io(std::io::Error::other(e)))
    }

    fn kill(&self, id: &SessionId) -> Result<(), BridgeError> {
        let instance = self
            .shared
            .instances
            .lock()
            .remove(id)
            .ok_or_else(|| BridgeError::UnknownSession(id.clone()))?;

        let killed = instance.child.lock().kill();

        // Reap off-thread so a stubborn child cannot stall the caller.
        let child = Arc::clone(&instance.child);
        thread::spawn(move || {
            let _ = child.lock().wait();
        });
        drop(instance);

        info!("Killed session {}", id);
        killed.map_err(BridgeError::Io)
    }

    fn on_data(&self, listener: impl Fn(&PtyData) + Send + Sync + 'static) -> Subscription {
        self.shared.data.subscribe(listener)
    }

    fn on_exit(&self, listener: impl Fn(&PtyExit) + Send + Sync + 'static) -> Subscription {
        self.shared.exit.subscribe(listener)
    }

    fn on_status_change(
        &self,
        listener: impl Fn(&PtyStatus) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.status.subscribe(listener)
    }
}
