//! Per-call context handed to hosted applications.
//!
//! `AppContext` carries the bits of shell state an application may need
//! while rendering or handling input, so the `HostApp` trait stays stable
//! and applications do not grow ad-hoc parameters.

use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct AppContext {
    focused: bool,
    now: Instant,
}

impl AppContext {
    pub const fn new(focused: bool, now: Instant) -> Self {
        Self { focused, now }
    }

    /// Whether the hosting window is the active one.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Timestamp of the input or frame being processed.
    pub const fn now(&self) -> Instant {
        self.now
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(false, Instant::now())
    }
}
