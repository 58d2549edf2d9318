//! Tier table and the pure derivations built on it.
//!
//! The ledger never changes after construction. Everything here is a lookup:
//! tier names, rank badges, and the progress bar fraction toward the next tier.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One named bracket of point totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTier {
    pub name: String,
    pub min_points: u64,
}

impl LevelTier {
    pub fn new(name: impl Into<String>, min_points: u64) -> Self {
        Self {
            name: name.into(),
            min_points,
        }
    }
}

const DEFAULT_TIERS: [(&str, u64); 10] = [
    ("Bronze", 0),
    ("Silver", 5_000),
    ("Gold", 25_000),
    ("Platinum", 100_000),
    ("Diamond", 1_000_000),
    ("Epic", 2_000_000),
    ("Legendary", 10_000_000),
    ("Master", 50_000_000),
    ("GrandMaster", 100_000_000),
    ("Lord", 1_000_000_000),
];

/// Ordered tier table with strictly increasing thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelLedger {
    tiers: Vec<LevelTier>,
}

impl LevelLedger {
    /// Build a ledger, rejecting empty tables and non-increasing thresholds.
    pub fn new(tiers: Vec<LevelTier>) -> Result<Self, LedgerError> {
        if tiers.is_empty() {
            return Err(LedgerError::Empty);
        }
        for (index, pair) in tiers.windows(2).enumerate() {
            if pair[1].min_points <= pair[0].min_points {
                return Err(LedgerError::NotIncreasing {
                    index: index + 1,
                    previous: pair[0].min_points,
                    current: pair[1].min_points,
                });
            }
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[LevelTier] {
        &self.tiers
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    pub fn last_index(&self) -> usize {
        self.tiers.len() - 1
    }

    pub fn tier(&self, level_index: usize) -> &LevelTier {
        &self.tiers[level_index.min(self.last_index())]
    }

    pub fn tier_name(&self, level_index: usize) -> &str {
        &self.tier(level_index).name
    }

    pub fn min_points(&self, level_index: usize) -> u64 {
        self.tier(level_index).min_points
    }

    /// "7 / 10" style rank badge. Ranks are one-based.
    pub fn rank_label(&self, level_index: usize) -> String {
        format!("{} / {}", level_index.min(self.last_index()) + 1, self.tier_count())
    }

    /// Progress toward the next tier as a percentage.
    ///
    /// Capped at 100 but deliberately left uncapped below: a points total
    /// under the current tier's minimum yields a negative value.
    pub fn progress_fraction(&self, points: u64, level_index: usize) -> f64 {
        if level_index >= self.last_index() {
            return 100.0;
        }
        let current_min = self.tiers[level_index].min_points as f64;
        let next_min = self.tiers[level_index + 1].min_points as f64;
        let progress = (points as f64 - current_min) / (next_min - current_min) * 100.0;
        progress.min(100.0)
    }

    /// The tier a full scan would pick for `points`.
    ///
    /// Re-derivation does not use this; it steps one tier at a time.
    pub fn true_level_for(&self, points: u64) -> usize {
        self.tiers
            .iter()
            .rposition(|t| t.min_points <= points)
            .unwrap_or(0)
    }
}

impl Default for LevelLedger {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS
                .iter()
                .map(|(name, min)| LevelTier::new(*name, *min))
                .collect(),
        }
    }
}
