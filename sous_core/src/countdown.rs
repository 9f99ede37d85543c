//! Per-session countdown timer.
//!
//! Timers are finalized lazily: nothing ticks in the background. Remaining
//! time is recomputed from `(armed_at, duration, paused spans, now)` whenever
//! someone asks, and the query that observes zero flips the timer inactive.

use crate::types::TimerStatus;
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};

/// Longest countdown accepted: 30 days.
pub const MAX_DURATION_SECONDS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct CountdownTimer {
    duration_seconds: u64,
    armed_at: DateTime<Utc>,
    active: bool,
    paused_at: Option<DateTime<Utc>>,
    paused_total: Duration,
}

impl CountdownTimer {
    /// Start a countdown of `duration_seconds` from `now`.
    ///
    /// Durations must lie in `1..=MAX_DURATION_SECONDS`.
    pub fn arm(duration_seconds: i64, now: DateTime<Utc>) -> Result<Self> {
        if !(1..=MAX_DURATION_SECONDS).contains(&duration_seconds) {
            return Err(Error::InvalidDuration(duration_seconds));
        }

        Ok(Self {
            duration_seconds: duration_seconds as u64,
            armed_at: now,
            active: true,
            paused_at: None,
            paused_total: Duration::zero(),
        })
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn armed_at(&self) -> DateTime<Utc> {
        self.armed_at
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Current countdown state; deactivates the timer once it has run out.
    pub fn query(&mut self, now: DateTime<Utc>) -> TimerStatus {
        if !self.active {
            return TimerStatus::inactive();
        }

        let remaining = remaining_seconds(
            self.armed_at,
            self.duration_seconds,
            self.paused_total,
            self.paused_at,
            now,
        );

        if remaining == 0 {
            tracing::debug!("Countdown of {}s finished", self.duration_seconds);
            self.active = false;
            self.paused_at = None;
            return TimerStatus::inactive();
        }

        TimerStatus {
            active: true,
            paused: self.paused_at.is_some(),
            remaining_seconds: remaining,
        }
    }

    /// Stop the countdown. Idempotent.
    pub fn cancel(&mut self) {
        self.active = false;
        self.paused_at = None;
    }

    /// Freeze the countdown. No-op if finished, cancelled or already paused.
    pub fn pause(&mut self, now: DateTime<Utc>) -> TimerStatus {
        let status = self.query(now);
        if status.active && self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
        self.query(now)
    }

    /// Continue a paused countdown, shifting it by the paused span.
    pub fn resume(&mut self, now: DateTime<Utc>) -> TimerStatus {
        if let Some(paused_at) = self.paused_at.take() {
            if self.active {
                self.paused_total += (now - paused_at).max(Duration::zero());
            }
        }
        self.query(now)
    }
}

/// Whole seconds left, rounded up so a freshly armed timer reports its full duration.
pub fn remaining_seconds(
    armed_at: DateTime<Utc>,
    duration_seconds: u64,
    paused_total: Duration,
    paused_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> u64 {
    let observed_at = paused_at.unwrap_or(now);
    let elapsed_ms = ((observed_at - armed_at) - paused_total)
        .num_milliseconds()
        .max(0);
    let total_ms = i64::try_from(duration_seconds)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000);
    let left_ms = total_ms.saturating_sub(elapsed_ms).max(0);

    (left_ms as u64).div_ceil(1000)
}

/// Render seconds as `MM:SS`, or `H:MM:SS` past an hour.
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
