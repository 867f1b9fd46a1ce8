// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Background task that expires idle windows.
//!
//! Ticks once per window and asks the gate to drop a window that has
//! already closed. The gate's own boundary check stays authoritative; this
//! only keeps stale counts from lingering while no requests are made.

use crate::error::{ApiError, Result};
use crate::limiter::RateLimiter;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Running resetter task and its stop signal.
struct Running {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Handle to the periodic window resetter.
///
/// Dropping the handle also stops the task.
pub struct WindowResetter {
    running: Mutex<Option<Running>>,
}

impl WindowResetter {
    /// Spawn the resetter on the current tokio runtime.
    ///
    /// The first tick fires one window after start.
    ///
    /// # Errors
    /// Returns [`ApiError::Configuration`] when called outside a tokio runtime.
    pub fn start(limiter: Arc<RateLimiter>) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| ApiError::config("a tokio runtime is required to start the window resetter"))?;

        let period = limiter.window();
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let rolled = limiter.expire_stale_window().await;
                        trace!(rolled, "Window resetter tick");
                    }
                }
            }
            debug!("Window resetter stopped");
        });

        debug!(period_ms = period.as_millis() as u64, "Window resetter started");
        Ok(Self {
            running: Mutex::new(Some(Running { stop, task })),
        })
    }

    /// Stop the task and wait for it to exit. Safe to call more than once.
    pub async fn shutdown(&self) {
        let running = self.running.lock().await.take();
        if let Some(Running { stop, task }) = running {
            // The task may already be gone if the runtime is shutting down.
            let _ = stop.send(());
            let _ = task.await;
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }
}
