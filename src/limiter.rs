// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window admission gate for outbound requests.
//!
//! At most `limit` callers are admitted per window. Callers beyond the
//! limit are suspended until the window closes rather than rejected.
//!
//! The window is anchored at the first admission after an idle period, so
//! a burst of `limit + 1` requests always spans at least one full window.
//! The window state is only touched under the gate's lock, and the lock is
//! released before any caller waits.

use crate::clock::WindowClock;
use crate::config::RateLimitConfig;
use crate::error::{ApiError, Result};
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Outcome of a single pass through the critical section.
#[derive(Debug, Clone, Copy)]
enum SlotCheck {
    /// Slot granted
    Granted,
    /// Window is full
    Full {
        /// When the current window closes
        retry_at: Instant,
        /// Time until the window closes
        retry_after: Duration,
    },
}

/// Point-in-time view of the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Requests admitted in the current window
    pub issued: u32,
    /// Requests that may still be admitted without waiting
    pub remaining: u32,
    /// Time until the current window closes (zero when no window is open)
    pub resets_in: Duration,
}

/// Mutable window state. Only ever accessed through `RateLimiter::window`.
#[derive(Debug)]
struct Window {
    start: Instant,
    count: u32,
}

impl Window {
    fn roll(&mut self, now: Instant) {
        self.start = now;
        self.count = 0;
    }
}

/// Thread-safe admission gate.
#[derive(Debug)]
pub struct RateLimiter {
    limit: NonZeroU32,
    clock: WindowClock,
    window: Mutex<Window>,
}

impl RateLimiter {
    /// Create a gate admitting `limit` requests per `window`.
    pub fn new(limit: NonZeroU32, window: Duration) -> Self {
        let clock = WindowClock::new(window);
        Self {
            limit,
            window: Mutex::new(Window {
                start: clock.now(),
                count: 0,
            }),
            clock,
        }
    }

    /// Create a gate from a quota configuration.
    ///
    /// # Errors
    /// Returns [`ApiError::Configuration`] if the configured limit is zero.
    pub fn from_config(config: &RateLimitConfig) -> Result<Self> {
        let limit = NonZeroU32::new(config.request_limit)
            .ok_or_else(|| ApiError::config("request_limit must be positive"))?;
        Ok(Self::new(limit, config.window_duration()))
    }

    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    pub fn window(&self) -> Duration {
        self.clock.window()
    }

    /// Wait for a request slot.
    ///
    /// Returns as soon as the caller is admitted. If the current window is
    /// full the caller sleeps until it closes, then re-checks the live
    /// window; another waiter may have taken the fresh slots first.
    ///
    /// Dropping the returned future never consumes a slot.
    pub async fn acquire(&self) {
        loop {
            match self.check_slot().await {
                SlotCheck::Granted => return,
                SlotCheck::Full {
                    retry_at,
                    retry_after,
                } => {
                    debug!(
                        wait_ms = retry_after.as_millis() as u64,
                        limit = self.limit.get(),
                        "Request limit reached, waiting for the window to close"
                    );
                    tokio::time::sleep_until(retry_at).await;
                }
            }
        }
    }

    /// Wait for a request slot unless `cancel` completes first.
    ///
    /// A slot that is free right away is granted even if `cancel` has
    /// already completed.
    ///
    /// # Errors
    /// Returns [`ApiError::Interrupted`] when cancelled. The window is left
    /// exactly as if this caller had never arrived.
    pub async fn acquire_or_cancel<F>(&self, cancel: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = self.acquire() => Ok(()),
            () = cancel => {
                debug!("Wait for request slot cancelled");
                Err(ApiError::Interrupted)
            }
        }
    }

    /// Take a slot only if one is free right now.
    pub async fn try_acquire(&self) -> bool {
        matches!(self.check_slot().await, SlotCheck::Granted)
    }

    /// Roll the window if it has closed, discarding its count.
    ///
    /// A window that is still open is left untouched, so this can run at
    /// any time without undercounting. Returns whether a window was rolled.
    pub async fn expire_stale_window(&self) -> bool {
        let mut window = self.window.lock().await;
        let now = self.clock.now();
        if window.count > 0 && self.clock.is_elapsed(window.start, now) {
            trace!(issued = window.count, "Expiring stale window");
            window.roll(now);
            true
        } else {
            false
        }
    }

    /// Current window state as seen by the next caller.
    pub async fn snapshot(&self) -> WindowSnapshot {
        let window = self.window.lock().await;
        let now = self.clock.now();
        let limit = self.limit.get();

        if window.count == 0 || self.clock.is_elapsed(window.start, now) {
            WindowSnapshot {
                issued: 0,
                remaining: limit,
                resets_in: Duration::ZERO,
            }
        } else {
            WindowSnapshot {
                issued: window.count,
                remaining: limit.saturating_sub(window.count),
                resets_in: self.clock.remaining(window.start, now),
            }
        }
    }

    /// Single critical section: roll the window if due, then either take a
    /// slot or report when the window closes.
    async fn check_slot(&self) -> SlotCheck {
        let mut window = self.window.lock().await;
        let now = self.clock.now();
        let limit = self.limit.get();

        // An empty window is anchored at its first admission.
        if window.count == 0 || self.clock.is_elapsed(window.start, now) {
            window.roll(now);
        }

        if window.count < limit {
            window.count += 1;
            trace!(
                issued = window.count,
                remaining = limit - window.count,
                "Request slot granted"
            );
            SlotCheck::Granted
        } else {
            SlotCheck::Full {
                retry_at: self.clock.window_end(window.start),
                retry_after: self.clock.remaining(window.start, now),
            }
        }
    }
}
