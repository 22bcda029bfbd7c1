//! Player state and zone management.
//!
//! This module contains:
//! - Player struct with the four card zones (deck, hand, played, discard)
//! - Per-turn counters (actions, buys, coins) and the merchant bonus tracker
//! - Draw and reshuffle semantics
//! - Scoring

use crate::card::{Card, CardId, CardKind, CardMint, CardType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cards drawn into a fresh hand at cleanup
pub const HAND_SIZE: usize = 5;

/// Copper cards in a starting deck
const STARTING_COPPERS: usize = 7;

/// Estate cards in a starting deck
const STARTING_ESTATES: usize = 3;

/// Remove the card with the given identity from a zone
pub fn take_card(zone: &mut Vec<Card>, id: CardId) -> Option<Card> {
    let pos = zone.iter().position(|c| c.id == id)?;
    Some(zone.remove(pos))
}

/// A single player's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Display name
    pub name: String,
    /// Draw pile; the top card is the last element
    pub deck: Vec<Card>,
    /// Cards in hand
    pub hand: Vec<Card>,
    /// Cards played this turn
    pub played: Vec<Card>,
    /// Discard pile
    pub discard: Vec<Card>,
    /// Actions remaining this turn
    pub actions: u32,
    /// Buys remaining this turn
    pub buys: u32,
    /// Coins available to spend this turn
    pub coins: u32,
    /// Merchants played this turn, paid out as a Silver bonus at the buy phase
    pub merchant_bonus: Vec<CardId>,
    /// Number of times the discard pile was shuffled into the deck
    pub shuffles: u32,
}

impl Player {
    /// Create a new player with a shuffled starting deck of 7 Copper and 3
    /// Estate, five of which are dealt into the opening hand.
    pub fn new<R: Rng>(name: String, mint: &mut CardMint, rng: &mut R) -> Self {
        let mut cards = mint.mint_n(CardKind::Copper, STARTING_COPPERS);
        cards.extend(mint.mint_n(CardKind::Estate, STARTING_ESTATES));
        cards.shuffle(rng);

        let hand = cards.split_off(HAND_SIZE);

        Self {
            name,
            deck: cards,
            hand,
            played: Vec::new(),
            discard: Vec::new(),
            actions: 0,
            buys: 0,
            coins: 0,
            merchant_bonus: Vec::new(),
            shuffles: 0,
        }
    }

    /// Draw up to `count` cards from the deck.
    ///
    /// When the deck runs out the discard pile is shuffled into a new deck.
    /// If both are empty drawing stops short; the drawn cards are returned
    /// and placed nowhere.
    pub fn draw_cards<R: Rng>(&mut self, count: usize, rng: &mut R) -> Vec<Card> {
        let mut cards = Vec::with_capacity(count);
        while cards.len() < count {
            if self.deck.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.reshuffle(rng);
            }
            if let Some(card) = self.deck.pop() {
                cards.push(card);
            }
        }
        cards
    }

    /// Draw up to `count` cards into hand, returning how many were drawn
    pub fn draw_into_hand<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let cards = self.draw_cards(count, rng);
        let drawn = cards.len();
        self.hand.extend(cards);
        drawn
    }

    fn reshuffle<R: Rng>(&mut self, rng: &mut R) {
        debug!("{} shuffles {} discarded cards into a new deck", self.name, self.discard.len());
        self.discard.shuffle(rng);
        self.deck.append(&mut self.discard);
        self.shuffles += 1;
    }

    /// Remove a card from hand by identity
    pub fn take_from_hand(&mut self, id: CardId) -> Option<Card> {
        take_card(&mut self.hand, id)
    }

    /// Move a card from hand to the discard pile
    pub fn discard_from_hand(&mut self, id: CardId) -> bool {
        match self.take_from_hand(id) {
            Some(card) => {
                self.discard.push(card);
                true
            }
            None => false,
        }
    }

    /// Move a card from hand onto the top of the deck
    pub fn topdeck_from_hand(&mut self, id: CardId) -> bool {
        match self.take_from_hand(id) {
            Some(card) => {
                self.deck.push(card);
                true
            }
            None => false,
        }
    }

    /// Hand cards carrying the given tag, in hand order
    pub fn hand_cards_of(&self, card_type: CardType) -> Vec<Card> {
        self.hand.iter().filter(|c| c.is(card_type)).copied().collect()
    }

    /// Action cards in hand
    pub fn action_cards_in_hand(&self) -> Vec<Card> {
        self.hand_cards_of(CardType::Action)
    }

    /// Reaction cards in hand
    pub fn reactions_in_hand(&self) -> Vec<Card> {
        self.hand_cards_of(CardType::Reaction)
    }

    /// Does the hand hold at least one action card?
    pub fn has_action_cards(&self) -> bool {
        self.hand.iter().any(Card::is_action)
    }

    /// Summed coin value of every treasure in hand
    pub fn coin_value_of_hand(&self) -> u32 {
        self.hand.iter().map(Card::coins).sum()
    }

    /// Number of cards of the given kind in hand
    pub fn count_in_hand(&self, kind: CardKind) -> usize {
        self.hand.iter().filter(|c| c.kind == kind).count()
    }

    /// Every card the player owns, across all four zones
    pub fn owned_cards(&self) -> impl Iterator<Item = &Card> {
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.played.iter())
            .chain(self.discard.iter())
    }

    pub fn owned_card_count(&self) -> usize {
        self.deck.len() + self.hand.len() + self.played.len() + self.discard.len()
    }

    /// Cards that count toward the score: deck, hand and discard
    pub fn scored_cards(&self) -> impl Iterator<Item = &Card> {
        self.deck.iter().chain(self.hand.iter()).chain(self.discard.iter())
    }

    /// Victory points over deck, hand and discard
    pub fn count_points(&self) -> i32 {
        self.scored_cards()
            .filter(|c| c.is(CardType::Victory) || c.is(CardType::Curse))
            .map(|c| c.points(self))
            .sum()
    }

    /// Zero the counters, discard hand and played cards, draw a new hand
    pub fn cleanup<R: Rng>(&mut self, rng: &mut R) -> usize {
        self.actions = 0;
        self.buys = 0;
        self.coins = 0;
        self.discard.append(&mut self.hand);
        self.discard.append(&mut self.played);
        self.draw_into_hand(HAND_SIZE, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_player(mint: &mut CardMint) -> Player {
        let mut rng = StdRng::seed_from_u64(7);
        Player::new("Test".to_string(), mint, &mut rng)
    }

    #[test]
    fn test_starting_deal() {
        let mut mint = CardMint::new();
        let player = new_player(&mut mint);

        assert_eq!(player.deck.len(), 5);
        assert_eq!(player.hand.len(), 5);
        assert!(player.discard.is_empty());

        let coppers = player
            .owned_cards()
            .filter(|c| c.kind == CardKind::Copper)
            .count();
        assert_eq!(coppers, 7);
        assert_eq!(player.count_points(), 3);
    }

    #[test]
    fn test_draw_reshuffles_discard_once() {
        let mut mint = CardMint::new();
        let mut rng = StdRng::seed_from_u64(11);
        let mut player = new_player(&mut mint);

        player.discard.append(&mut player.hand);
        assert_eq!(player.discard.len(), 5);

        // Empty the deck, then draw into the discard pile
        let drawn = player.draw_cards(5, &mut rng);
        assert_eq!(drawn.len(), 5);
        assert_eq!(player.shuffles, 0);

        let drawn = player.draw_cards(2, &mut rng);
        assert_eq!(drawn.len(), 2);
        assert_eq!(player.shuffles, 1);
        assert_eq!(player.deck.len(), 3);
        assert!(player.discard.is_empty());
    }

    #[test]
    fn test_partial_draw_when_out_of_cards() {
        let mut mint = CardMint::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut player = new_player(&mut mint);

        let drawn = player.draw_into_hand(8, &mut rng);
        assert_eq!(drawn, 5);
        assert_eq!(player.hand.len(), 10);
        assert!(player.deck.is_empty());
        assert_eq!(player.shuffles, 0);
    }

    #[test]
    fn test_cleanup_resets_counters() {
        let mut mint = CardMint::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut player = new_player(&mut mint);
        player.actions = 2;
        player.buys = 1;
        player.coins = 4;
        let card = player.hand.pop().unwrap();
        player.played.push(card);

        let drawn = player.cleanup(&mut rng);

        assert_eq!(drawn, 5);
        assert_eq!((player.actions, player.buys, player.coins), (0, 0, 0));
        assert!(player.played.is_empty());
        assert_eq!(player.hand.len(), 5);
        assert_eq!(player.discard.len(), 5);
        assert_eq!(player.owned_card_count(), 10);
    }

    #[test]
    fn test_gardens_scales_with_owned_cards() {
        let mut mint = CardMint::new();
        let mut player = new_player(&mut mint);
        player.deck.truncate(2);
        player.hand.truncate(3);
        player.hand.push(mint.mint(CardKind::Gardens));

        // Six cards owned, at most 3 Estates: Gardens adds nothing
        let estates = player
            .owned_cards()
            .filter(|c| c.kind == CardKind::Estate)
            .count() as i32;
        assert_eq!(player.count_points(), estates);

        player.discard.extend(mint.mint_n(CardKind::Copper, 4));
        assert_eq!(player.owned_card_count(), 10);
        assert_eq!(player.count_points(), estates + 1);
    }

    #[test]
    fn test_gardens_ignores_played_cards() {
        let mut mint = CardMint::new();
        let mut player = new_player(&mut mint);
        player.hand.push(mint.mint(CardKind::Gardens));
        player.discard.extend(mint.mint_n(CardKind::Copper, 9));
        assert_eq!(player.scored_cards().count(), 20);
        assert_eq!(player.count_points(), 3 + 2);

        // Mid-turn, a card in play is owned but not scored
        let copper = player.discard.pop().unwrap();
        player.played.push(copper);
        assert_eq!(player.owned_card_count(), 20);
        assert_eq!(player.scored_cards().count(), 19);
        assert_eq!(player.count_points(), 3 + 1);
    }

    #[test]
    fn test_take_card_by_identity() {
        let mut mint = CardMint::new();
        let mut zone = mint.mint_n(CardKind::Copper, 3);
        let target = zone[1].id;

        let taken = take_card(&mut zone, target).unwrap();
        assert_eq!(taken.id, target);
        assert_eq!(zone.len(), 2);
        assert!(take_card(&mut zone, target).is_none());
    }
}
