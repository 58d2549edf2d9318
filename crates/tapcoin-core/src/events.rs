use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::CountdownView;
use crate::floating::CoinId;

/// Every state change in a session produces an Event.
/// The renderer consumes them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Tapped {
        amount: u64,
        points: u64,
        coin_id: CoinId,
        x: f64,
        y: f64,
        at: DateTime<Utc>,
    },
    PassiveAccrued {
        added: u64,
        points: u64,
    },
    LevelChanged {
        from: usize,
        to: usize,
        level_name: String,
        points: u64,
    },
    CountdownsRefreshed {
        countdowns: Vec<CountdownView>,
        at: DateTime<Utc>,
    },
    CoinExpired {
        coin_id: CoinId,
    },
    WalletConnected {
        address: String,
    },
    /// Session torn down; no further ticks are applied after this.
    SessionEnded {
        points: u64,
        level_index: usize,
        at: DateTime<Utc>,
    },
}
