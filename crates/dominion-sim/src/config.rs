//! Simulation settings read from the environment.

use dominion_core::{CardKind, GameConfig, GameError, MAX_PLAYERS, MIN_PLAYERS};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Player count must be between 2 and 4, got {0}")]
    PlayerCount(usize),

    #[error("Invalid kingdom: {0}")]
    Kingdom(#[from] GameError),
}

/// What to simulate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Players seated at each table
    pub players: usize,
    /// Number of games to play back to back
    pub games: usize,
    /// Seed of the first game; later games use the following seeds
    pub seed: Option<u64>,
    /// Kingdom cards; `None` uses the default kingdom
    pub kingdom: Option<Vec<CardKind>>,
    /// Upper bound on decisions per game
    pub max_decisions: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            players: 2,
            games: 1,
            seed: None,
            kingdom: None,
            max_decisions: 100_000,
        }
    }
}

impl SimConfig {
    /// Read `DOMINION_PLAYERS`, `DOMINION_GAMES`, `DOMINION_SEED`,
    /// `DOMINION_KINGDOM` (comma separated card names) and
    /// `DOMINION_MAX_DECISIONS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let players = parse_var(&lookup, "DOMINION_PLAYERS")?.unwrap_or(defaults.players);
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ConfigError::PlayerCount(players));
        }

        let kingdom = match lookup("DOMINION_KINGDOM") {
            Some(names) if !names.trim().is_empty() => Some(GameConfig::kingdom_from_names(
                names.split(',').map(str::trim).filter(|name| !name.is_empty()),
            )?),
            _ => None,
        };

        Ok(Self {
            players,
            games: parse_var(&lookup, "DOMINION_GAMES")?.unwrap_or(defaults.games),
            seed: parse_var(&lookup, "DOMINION_SEED")?,
            kingdom,
            max_decisions: parse_var(&lookup, "DOMINION_MAX_DECISIONS")?
                .unwrap_or(defaults.max_decisions),
        })
    }

    /// Engine configuration for the `game`th game of the run
    pub fn game_config(&self, game: usize) -> GameConfig {
        GameConfig {
            seed: self.seed.map(|seed| seed.wrapping_add(game as u64)),
            kingdom: self.kingdom.clone(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(None),
    }
}
