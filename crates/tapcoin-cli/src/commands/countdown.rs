use clap::Args;
use tapcoin_core::{Config, CountdownScheduler};

use super::instant_or_now;

#[derive(Args)]
pub struct CountdownArgs {
    /// Compute for this RFC 3339 instant instead of now
    #[arg(long)]
    at: Option<String>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CountdownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let now = instant_or_now(args.at.as_deref())?;
    let scheduler = CountdownScheduler::new(config.countdowns, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scheduler.views())?);
    } else {
        for view in scheduler.views() {
            println!(
                "{:<14} {:02}:00 UTC  {}",
                view.label, view.reset_hour_utc, view.remaining
            );
        }
    }
    Ok(())
}
