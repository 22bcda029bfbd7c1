//! Serializable views of a running game.

use crate::card::{Card, CardKind};
use crate::game::{Game, GamePhase};
use crate::player::Player;
use serde::{Deserialize, Serialize};

/// Cards left in one supply pile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileView {
    pub card: CardKind,
    pub remaining: usize,
}

/// One player's zones and counters. Deck and discard are face down, so
/// only their sizes are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub deck: usize,
    pub hand: Vec<CardKind>,
    pub played: Vec<CardKind>,
    pub discard: usize,
    pub actions: u32,
    pub buys: u32,
    pub coins: u32,
    pub points: i32,
}

impl PlayerView {
    fn of(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            deck: player.deck.len(),
            hand: kinds(&player.hand),
            played: kinds(&player.played),
            discard: player.discard.len(),
            actions: player.actions,
            buys: player.buys,
            coins: player.coins,
            points: player.count_points(),
        }
    }
}

/// The outstanding decision, options rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceView {
    pub player: usize,
    pub options: Vec<String>,
    pub min_choices: usize,
    pub max_choices: Option<usize>,
}

/// Everything a driver needs to display the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub active_player: usize,
    pub turn: u32,
    pub piles: Vec<PileView>,
    pub players: Vec<PlayerView>,
    pub trash: Vec<CardKind>,
    pub pending: Option<ChoiceView>,
}

fn kinds(cards: &[Card]) -> Vec<CardKind> {
    cards.iter().map(|c| c.kind).collect()
}

impl GameSnapshot {
    pub fn of(game: &Game) -> Self {
        Self {
            phase: game.phase(),
            active_player: game.active_player(),
            turn: game.turn(),
            piles: game
                .supply()
                .piles()
                .iter()
                .map(|pile| PileView {
                    card: pile.kind,
                    remaining: pile.len(),
                })
                .collect(),
            players: game.players().iter().map(PlayerView::of).collect(),
            trash: kinds(game.trash()),
            pending: game.pending_choice().map(|choice| ChoiceView {
                player: choice.player,
                options: choice.options.iter().map(ToString::to_string).collect(),
                min_choices: choice.min_choices,
                max_choices: choice.max_choices,
            }),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
