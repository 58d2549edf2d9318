//! Point total and level index.
//!
//! Level re-derivation is single-step: each call moves the index by at most
//! one tier, so a large jump across several thresholds is only caught up over
//! subsequent mutations.

use serde::{Deserialize, Serialize};

use crate::ledger::LevelLedger;

const SECONDS_PER_HOUR: u64 = 3600;

/// A level index transition produced by re-derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    points: u64,
    level_index: usize,
}

impl ProgressState {
    /// Seed a session. The level index is clamped into the table but is not
    /// re-derived, so a seed above the true tier is kept as given.
    pub fn new(ledger: &LevelLedger, seed_points: u64, seed_level_index: usize) -> Self {
        Self {
            points: seed_points,
            level_index: seed_level_index.min(ledger.last_index()),
        }
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// Add a manual increment, then re-derive once.
    pub fn apply_increment(&mut self, ledger: &LevelLedger, amount: u64) -> Option<LevelChange> {
        self.points = self.points.saturating_add(amount);
        self.rederive_level(ledger)
    }

    /// Apply one second of passive income, then re-derive once.
    ///
    /// The hourly rate is truncated to whole points per second; rates under
    /// 3600 contribute nothing. Returns the points added alongside any change.
    pub fn apply_passive_accrual(
        &mut self,
        ledger: &LevelLedger,
        rate_per_hour: u64,
    ) -> (u64, Option<LevelChange>) {
        let added = per_tick_accrual(rate_per_hour);
        self.points = self.points.saturating_add(added);
        (added, self.rederive_level(ledger))
    }

    /// Move at most one tier toward the tier that contains `points`.
    pub fn rederive_level(&mut self, ledger: &LevelLedger) -> Option<LevelChange> {
        let from = self.level_index;
        let has_higher = from < ledger.last_index();
        if has_higher && self.points >= ledger.min_points(from + 1) {
            self.level_index = from + 1;
        } else if from > 0 && self.points < ledger.min_points(from) {
            self.level_index = from - 1;
        } else {
            return None;
        }
        Some(LevelChange {
            from,
            to: self.level_index,
        })
    }
}

/// Whole points added per one-second tick for an hourly rate.
pub fn per_tick_accrual(rate_per_hour: u64) -> u64 {
    rate_per_hour / SECONDS_PER_HOUR
}
