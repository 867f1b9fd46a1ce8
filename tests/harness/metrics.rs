// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admission timeline collection for load tests.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Records when each caller was admitted, relative to a common start.
#[derive(Debug)]
pub struct AdmissionTimeline {
    start: Instant,
    admissions: Mutex<Vec<Duration>>,
}

impl AdmissionTimeline {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            admissions: Mutex::new(Vec::new()),
        }
    }

    /// Record an admission at the current time.
    pub fn record(&self) {
        let offset = Instant::now() - self.start;
        self.admissions.lock().unwrap().push(offset);
    }

    /// Admission offsets in ascending order.
    pub fn sorted(&self) -> Vec<Duration> {
        let mut admissions = self.admissions.lock().unwrap().clone();
        admissions.sort();
        admissions
    }

    pub fn total(&self) -> usize {
        self.admissions.lock().unwrap().len()
    }

    /// Largest number of admissions inside any half-open interval of length `window`.
    pub fn max_in_any_window(&self, window: Duration) -> usize {
        let admissions = self.sorted();
        let mut best = 0;
        let mut lo = 0;
        for hi in 0..admissions.len() {
            while admissions[hi] - admissions[lo] >= window {
                lo += 1;
            }
            best = best.max(hi - lo + 1);
        }
        best
    }

    /// Offset of the last admission.
    pub fn span(&self) -> Duration {
        self.sorted().last().copied().unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_max_in_any_window() {
        let timeline = AdmissionTimeline::new();
        timeline.record();
        timeline.record();
        tokio::time::advance(Duration::from_millis(900)).await;
        timeline.record();
        tokio::time::advance(Duration::from_millis(100)).await;
        timeline.record();

        assert_eq!(timeline.total(), 4);
        assert_eq!(timeline.max_in_any_window(Duration::from_secs(1)), 3);
        assert_eq!(timeline.span(), Duration::from_secs(1));
    }
}
