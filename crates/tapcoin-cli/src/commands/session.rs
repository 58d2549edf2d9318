use clap::Args;
use serde::Serialize;
use tapcoin_core::{
    Config, Event, GameSession, SessionSnapshot, WalletAddress, WalletError, WalletProvider,
};

use super::instant_or_now;

#[derive(Args)]
pub struct StatusArgs {
    /// Compute countdowns for this RFC 3339 instant instead of now
    #[arg(long)]
    at: Option<String>,
    /// Attempt a wallet connection before printing
    #[arg(long)]
    connect: bool,
    /// Address handed back by the wallet provider (no provider if omitted)
    #[arg(long, requires = "connect")]
    wallet: Option<String>,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of one-second accrual ticks
    #[arg(long, default_value = "0")]
    ticks: u64,
    /// Number of taps, applied before the ticks
    #[arg(long, default_value = "0")]
    taps: u64,
    /// Compute countdowns for this RFC 3339 instant instead of now
    #[arg(long)]
    at: Option<String>,
}

/// Provider that answers with a fixed address.
struct StaticWallet {
    address: String,
}

impl WalletProvider for StaticWallet {
    fn name(&self) -> &str {
        "static"
    }

    fn connect(&mut self) -> Result<WalletAddress, WalletError> {
        Ok(WalletAddress(self.address.clone()))
    }
}

#[derive(Serialize)]
struct SimulationReport {
    #[serde(flatten)]
    snapshot: SessionSnapshot,
    taps: u64,
    ticks: u64,
    level_changes: usize,
    true_level_index: usize,
    true_level_name: String,
}

pub fn status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let now = instant_or_now(args.at.as_deref())?;
    let mut session = GameSession::from_config(&config, now)?;

    if args.connect {
        let mut provider = args.wallet.map(|address| StaticWallet { address });
        let provider = provider.as_mut().map(|p| p as &mut dyn WalletProvider);
        if let Err(e) = session.connect_wallet(provider) {
            eprintln!("notice: {e}");
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.snapshot(now))?);
    Ok(())
}

pub fn simulate(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let now = instant_or_now(args.at.as_deref())?;
    let mut session = GameSession::from_config(&config, now)?;

    let mut level_changes = 0usize;
    let mut count_changes = |events: &[Event]| {
        level_changes += events
            .iter()
            .filter(|e| matches!(e, Event::LevelChanged { .. }))
            .count();
    };
    for _ in 0..args.taps {
        let events = session.tap(0.0, 0.0, now);
        count_changes(&events);
        // No renderer here, so each coin is done as soon as it spawns.
        for event in &events {
            if let Event::Tapped { coin_id, .. } = event {
                session.expire_coin(*coin_id);
            }
        }
    }
    for _ in 0..args.ticks {
        count_changes(&session.accrual_tick());
    }

    let true_level_index = session.ledger().true_level_for(session.points());
    let report = SimulationReport {
        snapshot: session.snapshot(now),
        taps: args.taps,
        ticks: args.ticks,
        level_changes,
        true_level_index,
        true_level_name: session.ledger().tier_name(true_level_index).to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
