//! A table of random players playing one game to the end.

use dominion_core::{Game, GameConfig, GameError, GameEvent, RandomDriver};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

const PLAYER_NAMES: [&str; 4] = ["Ada", "Brook", "Cyd", "Dale"];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Game did not finish within {0} decisions")]
    Unfinished(usize),

    #[error("Card count changed from {before} to {after}")]
    CardsLost { before: usize, after: usize },
}

/// Outcome of one game
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub game: usize,
    pub seed: Option<u64>,
    pub turns: u32,
    pub decisions: usize,
    pub scores: Vec<(String, i32)>,
    pub winners: Vec<String>,
    pub empty_piles: Vec<String>,
}

/// Seated players and the driver deciding for all of them
pub struct Table {
    pub number: usize,
    pub game: Game,
    driver: RandomDriver,
}

impl Table {
    pub fn new(number: usize, players: usize, config: GameConfig) -> Result<Self, TableError> {
        let driver = match config.seed {
            Some(seed) => RandomDriver::with_seed(seed),
            None => RandomDriver::new(),
        };
        let names = &PLAYER_NAMES[..players.min(PLAYER_NAMES.len())];
        let game = Game::with_players(names, config)?;

        Ok(Self {
            number,
            game,
            driver,
        })
    }

    /// Play until the game ends, checking that no card leaves the game
    pub fn play(&mut self, max_decisions: usize) -> Result<GameReport, TableError> {
        let before = self.game.total_cards();
        let events = self.game.start()?;
        log_events(&events);

        let mut decisions = 0;
        while let Some(events) = self.driver.resolve_pending(&mut self.game)? {
            log_events(&events);
            decisions += 1;
            if decisions >= max_decisions && !self.game.is_finished() {
                warn!("Table {} gave up after {} decisions", self.number, decisions);
                return Err(TableError::Unfinished(decisions));
            }
        }

        let after = self.game.total_cards();
        if after != before {
            return Err(TableError::CardsLost { before, after });
        }
        if !self.game.is_finished() {
            return Err(TableError::Unfinished(decisions));
        }

        info!(
            "Table {} finished after {} turns, won by {}",
            self.number,
            self.game.turn(),
            self.game.winners().join(" and ")
        );

        Ok(GameReport {
            game: self.number,
            seed: self.game.config().seed,
            turns: self.game.turn(),
            decisions,
            scores: self.game.scores(),
            winners: self.game.winners(),
            empty_piles: self
                .game
                .empty_piles()
                .iter()
                .map(|kind| kind.name().to_string())
                .collect(),
        })
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        debug!("{:?}", event);
    }
}
