//! Platform location seam and the stream adapter.
//!
//! `LocationBackend` abstracts the host's continuous-fix API behind a
//! uniform interface; `GeoSource` enforces the stream contract: at most
//! one active watch, idempotent restart, failures delivered through the
//! same channel as fixes.

use std::collections::VecDeque;

use crate::{Fix, PermissionState, WatchError, WatchEvent, WatchId, WatchOptions};

/// Host positioning capability
pub trait LocationBackend {
    /// Capability probe; `false` means the platform has no location API
    /// at all.
    fn supported(&self) -> bool;

    /// Best-effort static permission check. Backends without permission
    /// introspection report `Prompt`.
    fn permission(&self) -> PermissionState;

    /// Begin a continuous fix stream.
    fn watch(&mut self, options: &WatchOptions) -> Result<WatchId, WatchError>;

    /// End a stream; unknown ids are ignored.
    fn clear_watch(&mut self, id: WatchId);

    /// Drain the next pending notification, if any.
    fn poll(&mut self) -> Option<WatchEvent>;
}

/// Adapter over a location backend
pub struct GeoSource<B> {
    backend: B,
    watch_id: Option<WatchId>,
    pending_error: Option<WatchError>,
}

impl<B: LocationBackend> GeoSource<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            watch_id: None,
            pending_error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_watching(&self) -> bool {
        self.watch_id.is_some()
    }

    /// Static permission check; a platform without the capability counts
    /// as denied.
    pub fn query_permission(&self) -> PermissionState {
        if !self.backend.supported() {
            return PermissionState::Denied;
        }
        self.backend.permission()
    }

    /// Start the fix stream, replacing any stream already running.
    ///
    /// Start failures do not return an error: they surface as a
    /// `WatchEvent::Error` on the next `poll`, the one arrival point
    /// subscribers already watch.
    pub fn start(&mut self, options: &WatchOptions) {
        self.stop();

        if !self.backend.supported() {
            tracing::warn!("location capability missing");
            self.pending_error = Some(WatchError::Unsupported);
            return;
        }

        match self.backend.watch(options) {
            Ok(id) => {
                tracing::info!("location watch {} started", id);
                self.watch_id = Some(id);
            }
            Err(err) => {
                tracing::warn!("location watch failed to start: {}", err);
                self.pending_error = Some(err);
            }
        }
    }

    /// End the fix stream; no-op when idle.
    pub fn stop(&mut self) {
        if let Some(id) = self.watch_id.take() {
            self.backend.clear_watch(id);
            tracing::info!("location watch {} cleared", id);
        }
        self.pending_error = None;
    }

    /// Next pending notification: start failures first, then stream
    /// events while a watch is active.
    pub fn poll(&mut self) -> Option<WatchEvent> {
        if let Some(err) = self.pending_error.take() {
            return Some(WatchEvent::Error(err));
        }
        if self.watch_id.is_some() {
            self.backend.poll()
        } else {
            None
        }
    }
}

/// Scripted backend for tests and demos
#[derive(Debug)]
pub struct SimulatedBackend {
    supported: bool,
    permission: PermissionState,
    queue: VecDeque<WatchEvent>,
    next_watch_id: WatchId,
    active: Option<WatchId>,
    last_options: Option<WatchOptions>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self {
            supported: true,
            permission: PermissionState::Prompt,
            queue: VecDeque::new(),
            next_watch_id: 1,
            active: None,
            last_options: None,
        }
    }

    /// A platform with no location API at all
    pub fn without_capability() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn set_permission(&mut self, state: PermissionState) {
        self.permission = state;
    }

    /// Queue a fix for delivery through `poll`
    pub fn push_fix(&mut self, fix: Fix) {
        self.queue.push_back(WatchEvent::Fix(fix));
    }

    /// Queue a stream error for delivery through `poll`
    pub fn push_error(&mut self, error: WatchError) {
        self.queue.push_back(WatchEvent::Error(error));
    }

    pub fn active_watches(&self) -> usize {
        usize::from(self.active.is_some())
    }

    /// Options passed to the most recent `watch` call
    pub fn last_options(&self) -> Option<&WatchOptions> {
        self.last_options.as_ref()
    }
}

impl LocationBackend for SimulatedBackend {
    fn supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> PermissionState {
        self.permission
    }

    fn watch(&mut self, options: &WatchOptions) -> Result<WatchId, WatchError> {
        let id = self.next_watch_id;
        self.next_watch_id += 1;
        self.active = Some(id);
        self.last_options = Some(options.clone());

        // Platforms report denial through the stream, not the watch call
        if self.permission == PermissionState::Denied {
            self.queue.push_back(WatchEvent::Error(WatchError::PermissionDenied));
        }

        Ok(id)
    }

    fn clear_watch(&mut self, id: WatchId) {
        if self.active == Some(id) {
            self.active = None;
            self.queue.clear();
        }
    }

    fn poll(&mut self) -> Option<WatchEvent> {
        if self.active.is_some() {
            self.queue.pop_front()
        } else {
            None
        }
    }
}
