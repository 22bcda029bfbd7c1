//! Events produced while the game runs.
//!
//! Every driving call returns the events produced since the previous one, in
//! the order they happened.

use crate::card::CardKind;
use crate::choice::ChoiceOption;
use crate::game::GamePhase;
use serde::{Deserialize, Serialize};

/// Zone a gained card lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GainDestination {
    Discard,
    Hand,
    /// On top of the deck
    Deck,
}

/// Events that result from driving the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // ==================== Turn Flow ====================
    /// A player's turn began
    TurnStarted { player: usize, turn: u32 },

    /// The active player moved to a new phase
    PhaseChanged { player: usize, phase: GamePhase },

    /// The active player finished cleanup
    TurnEnded { player: usize },

    /// The game is over
    GameFinished {
        /// Final scores in seating order
        scores: Vec<(String, i32)>,
    },

    // ==================== Cards ====================
    /// A card's effect started
    CardPlayed { player: usize, card: CardKind },

    /// Cards were drawn into hand
    CardsDrawn { player: usize, count: usize },

    /// A discard pile was shuffled into a new deck
    Reshuffled { player: usize },

    /// A card left the supply
    CardGained {
        player: usize,
        card: CardKind,
        to: GainDestination,
    },

    /// A card was moved to the trash
    CardTrashed { player: usize, card: CardKind },

    /// Cards were discarded outside cleanup
    CardsDiscarded { player: usize, count: usize },

    /// A card was put on top of a deck
    CardTopdecked { player: usize, card: CardKind },

    // ==================== Attacks ====================
    /// A reaction stopped an attack against its holder
    AttackBlocked {
        attacker: usize,
        target: usize,
        reaction: CardKind,
    },

    // ==================== Decisions ====================
    /// A decision is waiting on `player`
    ChoiceRequested {
        player: usize,
        options: Vec<ChoiceOption>,
        min_choices: usize,
        max_choices: Option<usize>,
    },

    /// A pending decision was resolved
    ChoiceResolved {
        player: usize,
        selected: Vec<ChoiceOption>,
    },
}
