//! Terminal frontend adapter: binds one emulator to one session.
//!
//! ```text
//! Uninitialized --mount--> Fitting --first successful fit--> Ready
//!        \                    \                                |
//!         +--------------------+----------dispose-------------+--> Disposed
//! ```
//!
//! Resize notifications reach the bridge only in `Ready`. The emulator is
//! created once and lives as long as the adapter; rebinding to another
//! session swaps the listeners, never the emulator.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::bridge::{PtyBridge, Subscription};
use crate::emulator::{ContainerSize, ScreenBuffer, TerminalEmulator};
use crate::session::SessionId;
use crate::settings::TerminalSettings;

/// Lifecycle state of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// Created, not yet listening.
    Uninitialized,
    /// Listening, waiting for a container that can be measured.
    Fitting,
    /// Fitted at least once; resizes are forwarded.
    Ready,
    /// Torn down; does nothing.
    Disposed,
}

/// Notice written when a session's process exits.
#[must_use]
pub fn exit_notice(code: i32) -> String {
    format!("\r\n[process exited with code {code}]\r\n")
}

/// One pane's connection between an emulator and a bridge session.
pub struct TerminalAdapter<B: PtyBridge, E: TerminalEmulator = ScreenBuffer> {
    bridge: Arc<B>,
    session: SessionId,
    emulator: Arc<Mutex<E>>,
    state: AdapterState,
    container: Option<ContainerSize>,
    subscriptions: Vec<Subscription>,
}

impl<B: PtyBridge, E: TerminalEmulator> TerminalAdapter<B, E> {
    /// Creates an unmounted adapter for `session`.
    pub fn new(bridge: Arc<B>, session: SessionId, settings: &TerminalSettings) -> Self {
        Self {
            bridge,
            session,
            emulator: Arc::new(Mutex::new(E::new(settings))),
            state: AdapterState::Uninitialized,
            container: None,
            subscriptions: Vec::new(),
        }
    }

    /// Returns the bound session.
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// Returns true once the first fit succeeded.
    pub fn is_ready(&self) -> bool {
        self.state == AdapterState::Ready
    }

    /// Shared handle to the emulator, for rendering.
    pub fn emulator(&self) -> Arc<Mutex<E>> {
        Arc::clone(&self.emulator)
    }

    /// Returns the emulator's `(cols, rows)`.
    pub fn dimensions(&self) -> (u16, u16) {
        self.emulator.lock().dimensions()
    }

    /// Returns the last container passed to [`fit`](Self::fit).
    pub fn container(&self) -> Option<ContainerSize> {
        self.container
    }

    /// Starts listening for the session's output and exit.
    pub fn mount(&mut self) {
        if self.state != AdapterState::Uninitialized {
            return;
        }
        self.subscribe();
        self.state = AdapterState::Fitting;
    }

    /// Fits the emulator to `container`.
    ///
    /// Returns false if the container cannot hold a single cell; the adapter
    /// then stays in its current state and the bridge is not told.
    pub fn fit(&mut self, container: ContainerSize) -> bool {
        if matches!(
            self.state,
            AdapterState::Uninitialized | AdapterState::Disposed
        ) {
            return false;
        }
        self.container = Some(container);

        let proposed = self.emulator.lock().propose_dimensions(container);
        let Some((cols, rows)) = proposed else {
            debug!(
                "Fit of {} failed for {}x{}px, resize suppressed",
                self.session, container.width, container.height
            );
            return false;
        };

        self.emulator.lock().resize(cols, rows);
        if self.state == AdapterState::Fitting {
            self.state = AdapterState::Ready;
        }
        self.notify_resize(cols, rows);
        true
    }

    /// Fits again to the last known container.
    pub fn refit(&mut self) -> bool {
        match self.container {
            Some(container) => self.fit(container),
            None => false,
        }
    }

    /// Sends keystrokes to the session.
    pub fn input(&self, data: &[u8]) {
        if self.state == AdapterState::Disposed {
            return;
        }
        if let Err(e) = self.bridge.write(&self.session, data) {
            warn!("Write to {} failed: {}", self.session, e);
        }
    }

    /// Applies new preferences to the live emulator, then re-fits.
    pub fn apply_settings(&mut self, settings: &TerminalSettings) {
        if self.state == AdapterState::Disposed {
            return;
        }
        self.emulator.lock().apply_settings(settings);
        self.refit();
    }

    /// Points the adapter at another session.
    ///
    /// Listeners for the old session are removed before the new ones are
    /// registered, so no old output can reach the emulator afterwards.
    pub fn rebind(&mut self, session: SessionId) {
        if session == self.session || self.state == AdapterState::Disposed {
            return;
        }
        trace!("Rebinding adapter {} -> {}", self.session, session);

        self.subscriptions.clear();
        self.session = session;
        self.emulator.lock().clear();

        if self.state != AdapterState::Uninitialized {
            self.subscribe();
            self.refit();
        }
    }

    /// Stops listening. Further calls are no-ops.
    pub fn dispose(&mut self) {
        self.subscriptions.clear();
        self.state = AdapterState::Disposed;
    }

    fn subscribe(&mut self) {
        let id = self.session.clone();
        let emulator = Arc::clone(&self.emulator);
        let data = self.bridge.on_data(move |event| {
            if event.session == id {
                emulator.lock().write(&event.chunk);
            }
        });

        let id = self.session.clone();
        let emulator = Arc::clone(&self.emulator);
        let exit = self.bridge.on_exit(move |event| {
            if event.session == id {
                emulator.lock().write(exit_notice(event.code).as_bytes());
            }
        });

        self.subscriptions = vec![data, exit];
    }

    fn notify_resize(&self, cols: u16, rows: u16) {
        if self.state != AdapterState::Ready {
            debug!("Resize of {} suppressed until ready", self.session);
            return;
        }
        if let Err(e) = self.bridge.resize(&self.session, cols, rows) {
            warn!("Resize of {} failed: {}", self.session, e);
        }
    }
}
