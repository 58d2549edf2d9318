//! Session controller.
//!
//! `GameSession` owns every piece of mutable state for one play session and
//! routes all mutation through named operations. Like the rest of the core it
//! has no internal threads: the caller supplies ticks, taps and the current
//! instant.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = GameSession::from_config(&config, Utc::now())?;
//! session.tap(120.0, 340.0, Utc::now());
//! session.accrual_tick();          // every second
//! session.countdown_tick(Utc::now()); // every minute
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::countdown::{CountdownScheduler, CountdownTarget, CountdownView};
use crate::error::{Result, WalletError};
use crate::events::Event;
use crate::floating::{CoinId, FloatingCoinEvent, FloatingEventQueue};
use crate::format::{format_points, format_rate};
use crate::ledger::LevelLedger;
use crate::progress::{LevelChange, ProgressState};
use crate::wallet::{WalletConnection, WalletProvider};

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub points: u64,
    pub points_label: String,
    pub level_index: usize,
    pub level_name: String,
    pub level_rank: String,
    /// May be negative when the level index sits above the true tier.
    pub progress_pct: f64,
    pub rate_label: String,
    pub tap_amount: u64,
    pub countdowns: Vec<CountdownView>,
    pub floating: Vec<FloatingCoinEvent>,
    pub wallet_connected: bool,
    pub wallet_label: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    id: Uuid,
    ledger: LevelLedger,
    progress: ProgressState,
    countdowns: CountdownScheduler,
    floating: FloatingEventQueue,
    wallet: WalletConnection,
    tap_amount: u64,
    profit_per_hour: u64,
}

impl GameSession {
    pub fn new(
        ledger: LevelLedger,
        seed_points: u64,
        seed_level_index: usize,
        tap_amount: u64,
        profit_per_hour: u64,
        targets: Vec<CountdownTarget>,
        now: DateTime<Utc>,
    ) -> Self {
        let progress = ProgressState::new(&ledger, seed_points, seed_level_index);
        Self {
            id: Uuid::new_v4(),
            ledger,
            progress,
            countdowns: CountdownScheduler::new(targets, now),
            floating: FloatingEventQueue::new(),
            wallet: WalletConnection::new(),
            tap_amount,
            profit_per_hour,
        }
    }

    /// Build a session from validated configuration.
    pub fn from_config(config: &Config, now: DateTime<Utc>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.ledger()?,
            config.progress.seed_points,
            config.progress.seed_level_index,
            config.progress.tap_amount,
            config.progress.profit_per_hour,
            config.countdowns.clone(),
            now,
        ))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn ledger(&self) -> &LevelLedger {
        &self.ledger
    }

    pub fn points(&self) -> u64 {
        self.progress.points()
    }

    pub fn level_index(&self) -> usize {
        self.progress.level_index()
    }

    pub fn level_name(&self) -> &str {
        self.ledger.tier_name(self.level_index())
    }

    pub fn progress_pct(&self) -> f64 {
        self.ledger
            .progress_fraction(self.points(), self.level_index())
    }

    pub fn countdowns(&self) -> &CountdownScheduler {
        &self.countdowns
    }

    pub fn floating(&self) -> &FloatingEventQueue {
        &self.floating
    }

    pub fn wallet(&self) -> &WalletConnection {
        &self.wallet
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            points: self.points(),
            points_label: format_points(self.points()),
            level_index: self.level_index(),
            level_name: self.level_name().to_string(),
            level_rank: self.ledger.rank_label(self.level_index()),
            progress_pct: self.progress_pct(),
            rate_label: format_rate(self.profit_per_hour),
            tap_amount: self.tap_amount,
            countdowns: self.countdowns.views(),
            floating: self.floating.live().to_vec(),
            wallet_connected: self.wallet.is_connected(),
            wallet_label: self.wallet.label(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// A tap at `(x, y)`: add the tap amount and spawn a floating coin.
    pub fn tap(&mut self, x: f64, y: f64, now: DateTime<Utc>) -> Vec<Event> {
        let change = self.progress.apply_increment(&self.ledger, self.tap_amount);
        let coin_id = self.floating.enqueue(x, y, self.tap_amount, now);
        let mut events = vec![Event::Tapped {
            amount: self.tap_amount,
            points: self.points(),
            coin_id,
            x,
            y,
            at: now,
        }];
        events.extend(self.level_event(change));
        events
    }

    /// One passive income tick.
    pub fn accrual_tick(&mut self) -> Vec<Event> {
        let (added, change) = self
            .progress
            .apply_passive_accrual(&self.ledger, self.profit_per_hour);
        debug!(added, points = self.points(), "Passive accrual");
        let mut events = vec![Event::PassiveAccrued {
            added,
            points: self.points(),
        }];
        events.extend(self.level_event(change));
        events
    }

    /// Recompute every countdown for `now`.
    pub fn countdown_tick(&mut self, now: DateTime<Utc>) -> Event {
        self.countdowns.refresh(now);
        Event::CountdownsRefreshed {
            countdowns: self.countdowns.views(),
            at: now,
        }
    }

    /// The renderer finished a coin's animation. Safe to call repeatedly.
    pub fn expire_coin(&mut self, id: CoinId) -> Option<Event> {
        self.floating
            .expire(id)
            .then_some(Event::CoinExpired { coin_id: id })
    }

    pub fn connect_wallet(
        &mut self,
        provider: Option<&mut dyn WalletProvider>,
    ) -> std::result::Result<Event, WalletError> {
        let address = self.wallet.connect(provider)?;
        Ok(Event::WalletConnected {
            address: address.to_string(),
        })
    }

    /// Drop all floating coins and report the final totals.
    pub fn end(&mut self, now: DateTime<Utc>) -> Event {
        self.floating.clear();
        Event::SessionEnded {
            points: self.points(),
            level_index: self.level_index(),
            at: now,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn level_event(&self, change: Option<LevelChange>) -> Option<Event> {
        let LevelChange { from, to } = change?;
        let level_name = self.ledger.tier_name(to).to_string();
        info!(from, to, level = %level_name, "Level changed");
        Some(Event::LevelChanged {
            from,
            to,
            level_name,
            points: self.points(),
        })
    }
}
