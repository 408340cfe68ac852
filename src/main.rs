use std::time::{SystemTime, UNIX_EPOCH};

use tickstep::balance::{BalanceConfig, BalanceEnv, BalanceNode, Session};
use tickstep::{Driver, DriverConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Optional first argument replays a previous run.
    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>()?,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
    };

    println!("═══════════════════════════════════════════════════════");
    println!("  tickstep - balance demo (seed {})", seed);
    println!("═══════════════════════════════════════════════════════");

    let mut driver = Driver::new(
        DriverConfig::new(seed),
        BalanceNode::Session(Session::new()),
        |config| BalanceEnv::from_driver(BalanceConfig::default(), config),
    )?;
    let summary = driver.run()?;

    println!();
    println!(
        "  Finished after {} ticks ({}), state hash {:016x}",
        summary.ticks, summary.final_state, summary.state_hash
    );
    Ok(())
}
