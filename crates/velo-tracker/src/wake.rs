//! Display wake-hold management.
//!
//! Best effort throughout: a missing capability or a rejected request
//! leaves the session running without the hold. Acquire may resolve
//! late relative to the session that asked for it; a hold that resolves
//! after a release (or after a newer acquire) goes straight back to the
//! platform instead of leaking.

/// Opaque platform stay-awake resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeLockHandle(pub u64);

/// Wake-hold failure reasons
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WakeError {
    #[error("Platform has no wake-lock capability")]
    Unsupported,

    #[error("Wake-lock request rejected: {0}")]
    Rejected(String),
}

/// Host stay-awake capability
pub trait WakePlatform {
    /// Capability probe.
    fn supported(&self) -> bool;

    /// Request the stay-awake resource.
    fn request(&mut self) -> Result<WakeLockHandle, WakeError>;

    /// Return a resource to the platform; unknown handles are ignored.
    fn release(&mut self, handle: WakeLockHandle);
}

/// Ticket pairing an in-flight acquire with the hold generation that
/// requested it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireTicket(u64);

/// Keeps the display awake while tracking runs
pub struct WakeHold<P> {
    platform: P,
    held: Option<WakeLockHandle>,
    generation: u64,
}

impl<P: WakePlatform> WakeHold<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            held: None,
            generation: 0,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    /// Best-effort acquire: probe the capability, request, keep the
    /// handle or log the failure. Never fatal.
    pub fn acquire(&mut self) {
        let ticket = self.begin_acquire();
        if !self.platform.supported() {
            tracing::warn!("wake lock unavailable: no platform capability");
            return;
        }
        let result = self.platform.request();
        self.finish_acquire(ticket, result);
    }

    /// Open an acquire window tied to the current hold generation. A
    /// release or a newer acquire invalidates the ticket.
    pub fn begin_acquire(&mut self) -> AcquireTicket {
        self.generation += 1;
        AcquireTicket(self.generation)
    }

    /// Complete an in-flight acquire. A handle arriving on a stale
    /// ticket is returned to the platform rather than kept.
    pub fn finish_acquire(
        &mut self,
        ticket: AcquireTicket,
        result: Result<WakeLockHandle, WakeError>,
    ) {
        match result {
            Ok(handle) => {
                if ticket.0 != self.generation {
                    tracing::debug!("dropping stale wake-lock acquire");
                    self.platform.release(handle);
                    return;
                }
                if let Some(previous) = self.held.replace(handle) {
                    self.platform.release(previous);
                }
            }
            Err(err) => {
                tracing::warn!("wake lock failed: {}", err);
            }
        }
    }

    /// Release the hold if any; safe to call repeatedly or before any
    /// acquire. Invalidates in-flight acquires.
    pub fn release(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.held.take() {
            self.platform.release(handle);
        }
    }
}

/// Scripted wake platform for tests and demos
#[derive(Debug)]
pub struct SimulatedWakePlatform {
    supported: bool,
    fail_next: bool,
    next_handle: u64,
    outstanding: Vec<WakeLockHandle>,
}

impl Default for SimulatedWakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedWakePlatform {
    pub fn new() -> Self {
        Self {
            supported: true,
            fail_next: false,
            next_handle: 1,
            outstanding: Vec::new(),
        }
    }

    /// A platform with no wake-lock capability
    pub fn without_capability() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Make the next request fail, the way a dimmed display does
    pub fn fail_next_request(&mut self) {
        self.fail_next = true;
    }

    /// Handles requested but never released; should read zero once the
    /// hold is released
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }
}

impl WakePlatform for SimulatedWakePlatform {
    fn supported(&self) -> bool {
        self.supported
    }

    fn request(&mut self) -> Result<WakeLockHandle, WakeError> {
        if !self.supported {
            return Err(WakeError::Unsupported);
        }
        if self.fail_next {
            self.fail_next = false;
            return Err(WakeError::Rejected("display unavailable".into()));
        }
        let handle = WakeLockHandle(self.next_handle);
        self.next_handle += 1;
        self.outstanding.push(handle);
        Ok(handle)
    }

    fn release(&mut self, handle: WakeLockHandle) {
        self.outstanding.retain(|held| *held != handle);
    }
}
