//! # Tapcoin Core Library
//!
//! Progression engine for an idle "tap to earn" game surface: a point total,
//! a tier derived from it, passive income applied every second, taps that add
//! a fixed increment, and countdowns to fixed daily UTC resets.
//!
//! ## Architecture
//!
//! - **Ledger**: immutable tier table, progress-bar derivation
//! - **Progress**: point total and single-step level re-derivation
//! - **Countdown**: `HH:MM` until each daily reset hour
//! - **Floating**: short-lived "+N" coins spawned by taps
//! - **Session**: controller owning all of the above
//! - **Runtime**: recurring tick tasks feeding one ordered input loop
//!
//! ## Key Components
//!
//! - [`GameSession`]: session controller
//! - [`SessionRuntime`]: tokio-driven tick scheduling
//! - [`Config`]: TOML configuration

pub mod config;
pub mod countdown;
pub mod error;
pub mod events;
pub mod floating;
pub mod format;
pub mod ledger;
pub mod progress;
pub mod runtime;
pub mod session;
pub mod wallet;

pub use config::Config;
pub use countdown::{time_remaining, CountdownScheduler, CountdownTarget, CountdownView};
pub use error::{ConfigError, CoreError, CountdownError, LedgerError, WalletError};
pub use events::Event;
pub use floating::{CoinId, FloatingCoinEvent, FloatingEventQueue, FLOAT_LIFETIME};
pub use format::{format_points, format_rate};
pub use ledger::{LevelLedger, LevelTier};
pub use progress::{LevelChange, ProgressState};
pub use runtime::{RecurringTask, SessionHandle, SessionInput, SessionRuntime};
pub use session::{GameSession, SessionSnapshot};
pub use wallet::{WalletAddress, WalletConnection, WalletProvider};
