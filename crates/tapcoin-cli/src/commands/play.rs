use clap::Args;
use tapcoin_core::{Config, Event, GameSession, SessionRuntime, FLOAT_LIFETIME};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Args)]
pub struct PlayArgs {
    /// Stop automatically after this many seconds
    #[arg(long)]
    seconds: Option<u64>,
    /// Only print taps and level changes, not every tick
    #[arg(long)]
    quiet: bool,
}

/// Parse a tap line. A blank line taps at the origin.
fn parse_tap(line: &str) -> Option<(f64, f64)> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (None, _) => Some((0.0, 0.0)),
        (Some(x), Some(y)) => Some((x.parse().ok()?, y.parse().ok()?)),
        (Some(_), None) => None,
    }
}

fn is_noisy(event: &Event) -> bool {
    matches!(
        event,
        Event::PassiveAccrued { .. } | Event::CountdownsRefreshed { .. } | Event::CoinExpired { .. }
    )
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(play(config, args))
}

async fn play(config: Config, args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = GameSession::from_config(&config, chrono::Utc::now())?;
    let (runtime, handle) = SessionRuntime::start(
        session,
        config.accrual_interval(),
        config.countdown_interval(),
    );
    let (sink, mut events) = mpsc::unbounded_channel();
    println!(
        "{}",
        serde_json::to_string(&runtime.session().snapshot(chrono::Utc::now()))?
    );
    let session_task = tokio::spawn(runtime.with_event_sink(sink).run());

    let deadline = args.seconds.map(std::time::Duration::from_secs);
    let has_deadline = deadline.is_some();
    let stop = async move {
        match deadline {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(stop);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = &mut stop => break,
            line = lines.next_line(), if stdin_open => {
                match line? {
                    // Input ended: stop unless a deadline keeps the session going.
                    None if !has_deadline => break,
                    None => stdin_open = false,
                    Some(line) if line.trim() == "q" => break,
                    Some(line) => match parse_tap(&line) {
                        Some((x, y)) => {
                            handle.tap(x, y);
                        }
                        None => eprintln!("expected \"x y\", got {line:?}"),
                    },
                }
            }
            Some(event) = events.recv() => {
                // Stand-in renderer: expire each coin once its float animation would end.
                if let Event::Tapped { coin_id, .. } = &event {
                    let handle = handle.clone();
                    let coin_id = *coin_id;
                    tokio::spawn(async move {
                        tokio::time::sleep(FLOAT_LIFETIME).await;
                        handle.expire(coin_id);
                    });
                }
                if !(args.quiet && is_noisy(&event)) {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
        }
    }

    handle.shutdown();
    let session = session_task.await?;
    // Inputs queued before the shutdown were still applied; flush what they produced.
    while let Ok(event) = events.try_recv() {
        if !(args.quiet && is_noisy(&event)) {
            println!("{}", serde_json::to_string(&event)?);
        }
    }
    debug!(points = session.points(), "Session finished");
    Ok(())
}
