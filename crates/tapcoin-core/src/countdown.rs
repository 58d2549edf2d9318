//! Countdowns to fixed daily UTC reset hours.
//!
//! Remaining time is always recomputed from the current instant, never
//! decremented, so a late or skipped refresh cannot drift.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CountdownError;

/// A daily reset boundary for one timed activity.
///
/// Only constructible with an hour in 0..=23, including through serde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCountdownTarget")]
pub struct CountdownTarget {
    label: String,
    reset_hour_utc: u32,
}

#[derive(Deserialize)]
struct RawCountdownTarget {
    label: String,
    reset_hour_utc: u32,
}

impl TryFrom<RawCountdownTarget> for CountdownTarget {
    type Error = CountdownError;

    fn try_from(raw: RawCountdownTarget) -> Result<Self, Self::Error> {
        CountdownTarget::new(raw.label, raw.reset_hour_utc)
    }
}

impl CountdownTarget {
    pub fn new(label: impl Into<String>, reset_hour_utc: u32) -> Result<Self, CountdownError> {
        if reset_hour_utc > 23 {
            return Err(CountdownError::InvalidHour(reset_hour_utc));
        }
        Ok(Self {
            label: label.into(),
            reset_hour_utc,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn reset_hour_utc(&self) -> u32 {
        self.reset_hour_utc
    }

    pub fn default_targets() -> Vec<CountdownTarget> {
        vec![
            CountdownTarget {
                label: "Daily Reward".into(),
                reset_hour_utc: 0,
            },
            CountdownTarget {
                label: "Daily Cipher".into(),
                reset_hour_utc: 19,
            },
            CountdownTarget {
                label: "Daily Combo".into(),
                reset_hour_utc: 12,
            },
        ]
    }
}

/// One rendered countdown row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownView {
    pub label: String,
    pub reset_hour_utc: u32,
    pub remaining: String,
}

/// Time until the next occurrence of `reset_hour` UTC.
///
/// The boundary is hour-granular: once the current UTC hour has reached the
/// target hour, today's occurrence counts as elapsed.
pub fn time_remaining_duration(reset_hour: u32, now: DateTime<Utc>) -> Duration {
    let at_hour = NaiveTime::from_hms_opt(reset_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let mut target = now.date_naive().and_time(at_hour).and_utc();
    if now.hour() >= reset_hour {
        target += Duration::days(1);
    }
    target - now
}

/// `HH:MM` until the next reset. Minutes are truncated, seconds dropped.
pub fn time_remaining(reset_hour: u32, now: DateTime<Utc>) -> String {
    let ms = time_remaining_duration(reset_hour, now).num_milliseconds().max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    format!("{hours:02}:{minutes:02}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownScheduler {
    targets: Vec<CountdownTarget>,
    remaining: Vec<String>,
}

impl CountdownScheduler {
    /// Create a scheduler and compute every countdown once for `now`.
    pub fn new(targets: Vec<CountdownTarget>, now: DateTime<Utc>) -> Self {
        let mut scheduler = Self {
            remaining: vec![String::new(); targets.len()],
            targets,
        };
        scheduler.refresh(now);
        scheduler
    }

    pub fn targets(&self) -> &[CountdownTarget] {
        &self.targets
    }

    /// Recompute all countdowns from scratch.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        for (slot, target) in self.remaining.iter_mut().zip(&self.targets) {
            *slot = time_remaining(target.reset_hour_utc, now);
        }
    }

    /// Last computed value for the target with this label.
    pub fn remaining(&self, label: &str) -> Option<&str> {
        self.targets
            .iter()
            .position(|t| t.label == label)
            .map(|i| self.remaining[i].as_str())
    }

    pub fn views(&self) -> Vec<CountdownView> {
        self.targets
            .iter()
            .zip(&self.remaining)
            .map(|(target, remaining)| CountdownView {
                label: target.label.clone(),
                reset_hour_utc: target.reset_hour_utc,
                remaining: remaining.clone(),
            })
            .collect()
    }
}
