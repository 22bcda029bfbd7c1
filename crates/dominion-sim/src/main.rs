//! Dominion self-play simulator.
//!
//! Seats random players at a table, plays whole games and prints one JSON
//! report per game.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod table;

use config::SimConfig;
use table::Table;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SimConfig::from_env()?;
    info!(
        "Simulating {} games with {} players",
        config.games, config.players
    );

    let mut wins = vec![0usize; config.players];
    for number in 0..config.games {
        let mut table = Table::new(number, config.players, config.game_config(number))?;
        let report = table.play(config.max_decisions)?;

        for (seat, player) in table.game.players().iter().enumerate() {
            if report.winners.contains(&player.name) {
                wins[seat] += 1;
            }
        }
        println!("{}", serde_json::to_string(&report)?);
    }

    info!("Wins by seat: {:?}", wins);
    Ok(())
}
