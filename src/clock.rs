// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Monotonic time source and window-boundary arithmetic.
//!
//! Time is read from `tokio::time::Instant`, so tests can freeze and
//! advance it with `tokio::time::pause()` / `advance()`.

use std::time::Duration;
use tokio::time::Instant;

/// Clock bound to a fixed window length.
#[derive(Debug, Clone, Copy)]
pub struct WindowClock {
    window: Duration,
}

impl WindowClock {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Current monotonic time.
    pub fn now(&self) -> Instant {
        Instant::now()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Time spent in the window that began at `start`. Zero if `now` precedes `start`.
    pub fn elapsed(&self, start: Instant, now: Instant) -> Duration {
        now.saturating_duration_since(start)
    }

    /// Whether the window that began at `start` is over at `now`.
    pub fn is_elapsed(&self, start: Instant, now: Instant) -> bool {
        self.elapsed(start, now) >= self.window
    }

    /// Time left in the window that began at `start`.
    pub fn remaining(&self, start: Instant, now: Instant) -> Duration {
        self.window.saturating_sub(self.elapsed(start, now))
    }

    /// Instant at which the window that began at `start` closes.
    pub fn window_end(&self, start: Instant) -> Instant {
        start + self.window
    }
}
