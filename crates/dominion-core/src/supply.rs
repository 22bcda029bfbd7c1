//! The supply: one pile of cards per variant in play.
//!
//! Piles are kept in an explicit order (basic cards first, then the kingdom
//! in the order it was given) so that every listing of piles is stable.

use crate::card::{Card, CardKind, CardMint, CardType};
use serde::{Deserialize, Serialize};

/// Number of cards in each kingdom pile
const KINGDOM_PILE_SIZE: usize = 10;

/// Number of cards a supply pile starts with for the given player count
pub fn pile_size_for(kind: CardKind, player_count: usize) -> usize {
    let victory = if player_count > 2 { 12 } else { 8 };
    match kind {
        CardKind::Estate | CardKind::Duchy | CardKind::Province => victory,
        CardKind::Copper => 60usize.saturating_sub(7 * player_count),
        CardKind::Silver => 40,
        CardKind::Gold => 30,
        CardKind::Curse => 10 * player_count.saturating_sub(1),
        _ => KINGDOM_PILE_SIZE,
    }
}

/// Order in which the basic piles are laid out
const BASIC_LAYOUT: [CardKind; 7] = [
    CardKind::Estate,
    CardKind::Duchy,
    CardKind::Province,
    CardKind::Copper,
    CardKind::Silver,
    CardKind::Gold,
    CardKind::Curse,
];

/// A pile of identical cards; the top card is the last element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pile {
    pub kind: CardKind,
    cards: Vec<Card>,
}

impl Pile {
    fn new(kind: CardKind, count: usize, mint: &mut CardMint) -> Self {
        Self {
            kind,
            cards: mint.mint_n(kind, count),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card that would be gained next
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }
}

/// All piles available to gain from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Supply {
    piles: Vec<Pile>,
}

impl Supply {
    /// Build the supply for a game: the seven basic piles followed by one
    /// pile per kingdom card.
    pub fn new(player_count: usize, kingdom: &[CardKind], mint: &mut CardMint) -> Self {
        let piles = BASIC_LAYOUT
            .iter()
            .chain(kingdom.iter())
            .map(|&kind| Pile::new(kind, pile_size_for(kind, player_count), mint))
            .collect();

        Self { piles }
    }

    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    pub fn pile(&self, kind: CardKind) -> Option<&Pile> {
        self.piles.iter().find(|p| p.kind == kind)
    }

    pub fn contains(&self, kind: CardKind) -> bool {
        self.pile(kind).is_some()
    }

    /// Cards left in a pile; 0 for variants not in the supply
    pub fn pile_size(&self, kind: CardKind) -> usize {
        self.pile(kind).map_or(0, Pile::len)
    }

    /// Remove the top card of a pile
    pub fn take(&mut self, kind: CardKind) -> Option<Card> {
        self.piles
            .iter_mut()
            .find(|p| p.kind == kind)
            .and_then(|p| p.cards.pop())
    }

    /// Non-empty piles whose top card costs at most `limit`
    pub fn cards_costing_at_most(&self, limit: u32) -> Vec<CardKind> {
        self.cards_costing_at_most_where(limit, |_| true)
    }

    /// Like `cards_costing_at_most`, restricted to piles matching `filter`
    pub fn cards_costing_at_most_where<F>(&self, limit: u32, filter: F) -> Vec<CardKind>
    where
        F: Fn(CardKind) -> bool,
    {
        self.piles
            .iter()
            .filter(|p| p.top().is_some_and(|c| c.cost() <= limit))
            .map(|p| p.kind)
            .filter(|&kind| filter(kind))
            .collect()
    }

    /// Treasure piles whose top card costs at most `limit`
    pub fn treasures_costing_at_most(&self, limit: u32) -> Vec<CardKind> {
        self.cards_costing_at_most_where(limit, |kind| kind.has_type(CardType::Treasure))
    }

    /// Piles with no cards left
    pub fn empty_piles(&self) -> Vec<CardKind> {
        self.piles
            .iter()
            .filter(|p| p.is_empty())
            .map(|p| p.kind)
            .collect()
    }

    /// Total cards across all piles
    pub fn total_cards(&self) -> usize {
        self.piles.iter().map(Pile::len).sum()
    }
}
