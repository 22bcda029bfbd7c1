//! Dominion - a deck-building card game engine
//!
//! This crate provides the core game logic, including:
//! - The card catalog with its immutable per-variant descriptors
//! - Supply piles, player zones, drawing and scoring
//! - A single-slot choice broker that suspends effects until a decision
//!   arrives
//! - Attack broadcasting with reactions
//! - The Action, Buy and Cleanup turn engine and the outer game loop
//!
//! # Architecture
//!
//! The engine never blocks. A driver calls `Game::start`, `Game::play_turn`
//! or `Game::play_card`; the game runs until a player must decide something
//! and then returns. The driver inspects `Game::pending_choice` and answers
//! with `Game::decide_option`. Every call returns the `GameEvent`s produced
//! along the way.
//!
//! # Modules
//!
//! - [`card`]: Card variants, type tags and the descriptor table
//! - [`supply`]: Supply piles and their setup sizes
//! - [`player`]: Player zones, counters, drawing and scoring
//! - [`choice`]: Options, pending choices and selection validation
//! - [`attack`]: Attack effects and reactions
//! - [`game`]: Game state machine and turn engine
//! - [`driver`]: A driver that decides at random

pub mod attack;
pub mod card;
pub mod choice;
pub mod driver;
mod effects;
pub mod events;
pub mod game;
pub mod player;
pub mod snapshot;
pub mod supply;

// Re-export commonly used types
pub use attack::Attack;
pub use card::{Card, CardId, CardKind, CardMint, CardSpec, CardType, UnknownCard};
pub use choice::{Answer, ChoiceOption, PendingChoice};
pub use driver::RandomDriver;
pub use events::{GainDestination, GameEvent};
pub use game::{Game, GameConfig, GameError, GamePhase, MAX_PLAYERS, MIN_PLAYERS};
pub use player::{Player, HAND_SIZE};
pub use snapshot::{ChoiceView, GameSnapshot, PileView, PlayerView};
pub use supply::{pile_size_for, Pile, Supply};
