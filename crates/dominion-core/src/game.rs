//! Core game state machine.
//!
//! This module contains the `Game` aggregate and the turn engine. The
//! running continuation is an explicit stack of `Frame`s: `run` pops frames
//! until the stack is empty, the game is over, or a frame has asked a player
//! for a decision. `decide_option` validates the answer and resumes.

use crate::attack::{self, Attack};
use crate::card::{Card, CardId, CardKind, CardMint, UnknownCard};
use crate::choice::{
    card_options, pile_options, render_options, selected_card, selected_pile, ChoiceOption, PendingChoice, Resume,
};
use crate::effects::{self, EffectStep};
use crate::events::{GainDestination, GameEvent};
use crate::player::Player;
use crate::snapshot::GameSnapshot;
use crate::supply::Supply;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fewest players a game can be set up with
pub const MIN_PLAYERS: usize = 2;

/// Most players a game can seat
pub const MAX_PLAYERS: usize = 4;

/// Empty supply piles that end the game
const EMPTY_PILES_TO_END: usize = 3;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Adding players
    Setup,
    /// Set up, between turns
    Ready,
    /// Active player may play action cards
    Action,
    /// Active player may buy cards
    Buy,
    /// Active player is cleaning up
    Cleanup,
    /// Game is over
    Finished,
}

/// Errors that can occur when driving the game
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not enough players: {0}, need at least 2")]
    NotEnoughPlayers(usize),

    #[error("Too many players: {0}, at most 4 can play")]
    TooManyPlayers(usize),

    #[error("Empty player name")]
    EmptyPlayerName,

    #[error("A player named {0} is already seated")]
    DuplicatePlayerName(String),

    #[error("No choice to be made")]
    NoPendingChoice,

    #[error("Bad choice index={index}. Choices:{options}")]
    InvalidIndex { index: usize, options: String },

    #[error("Too many choices: {chosen} selected, at most {max} allowed")]
    TooManyChoices { chosen: usize, max: usize },

    #[error("Too few choices: {chosen} selected, at least {min} required")]
    TooFewChoices { chosen: usize, min: usize },

    #[error("A choice is already pending")]
    ChoiceAlreadyPending,

    #[error("Game is already set up")]
    AlreadySetUp,

    #[error("Game is not set up")]
    NotSetUp,

    #[error("Game is over")]
    GameOver,

    #[error("A pending choice must be decided first")]
    ChoicePending,

    #[error("Card {0:?} is not in hand")]
    CardNotInHand(CardId),

    #[error("No player at seat {0}")]
    UnknownPlayer(usize),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("{0} cannot be used as a kingdom card")]
    NotAKingdomCard(String),

    #[error("{0} appears more than once in the kingdom")]
    DuplicateKingdomCard(String),
}

impl From<UnknownCard> for GameError {
    fn from(err: UnknownCard) -> Self {
        GameError::UnknownCard(err.0)
    }
}

/// Game configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Shuffle seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Kingdom piles; `None` uses `CardKind::DEFAULT_KINGDOM`
    pub kingdom: Option<Vec<CardKind>>,
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            kingdom: None,
        }
    }

    /// Kingdom cards this configuration sets up
    pub fn kingdom(&self) -> &[CardKind] {
        self.kingdom.as_deref().unwrap_or(&CardKind::DEFAULT_KINGDOM)
    }

    /// Parse and validate a kingdom from card names
    pub fn kingdom_from_names<I, S>(names: I) -> Result<Vec<CardKind>, GameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kingdom = names
            .into_iter()
            .map(|name| name.as_ref().parse::<CardKind>())
            .collect::<Result<Vec<_>, _>>()?;
        validate_kingdom(&kingdom)?;
        Ok(kingdom)
    }
}

/// Kingdom cards must be non-basic and distinct
pub fn validate_kingdom(kingdom: &[CardKind]) -> Result<(), GameError> {
    for (index, kind) in kingdom.iter().enumerate() {
        if kind.is_basic() {
            return Err(GameError::NotAKingdomCard(kind.name().to_string()));
        }
        if kingdom[..index].contains(kind) {
            return Err(GameError::DuplicateKingdomCard(kind.name().to_string()));
        }
    }
    Ok(())
}

/// One unit of pending work on the continuation stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    /// Outer loop: move to the next seat and queue its turn
    NextTurn,
    /// Begin the active player's turn
    TurnStart,
    /// Offer the next action card, if any may be played
    ActionStep,
    /// Count treasure and open the buy phase
    BuyPhase,
    /// Offer the next buy, if any remain
    BuyStep,
    /// Clean up and end the turn
    Cleanup,
    /// Run a card's effect; the card is already in play
    Play { player: usize, card: Card },
    /// Offer reactions to one attack target
    AttackTarget {
        attacker: usize,
        target: usize,
        attack: Attack,
    },
    /// Apply an attack with no reaction offer
    ApplyAttack {
        attacker: usize,
        target: usize,
        attack: Attack,
    },
    /// Resume a continuation with its selection
    Resolve {
        resume: Resume,
        selection: Vec<ChoiceOption>,
    },
    /// Card effect work that needs no decision
    Effect(EffectStep),
}

impl Frame {
    fn held_cards(&self) -> usize {
        match self {
            Frame::Resolve { resume, .. } => resume.held_cards(),
            Frame::Effect(step) => step.held_cards(),
            _ => 0,
        }
    }
}

/// The complete game state
#[derive(Debug, Clone)]
pub struct Game {
    /// Players in seating order, fixed at setup
    pub(crate) players: Vec<Player>,
    pub(crate) supply: Supply,
    pub(crate) trash: Vec<Card>,
    active_player: usize,
    phase: GamePhase,
    /// Turns started so far
    turn: u32,
    /// The single outstanding decision
    pending: Option<PendingChoice>,
    frames: Vec<Frame>,
    /// Events not yet returned to the driver
    events: Vec<GameEvent>,
    mint: CardMint,
    rng: StdRng,
    config: GameConfig,
}

impl Game {
    /// Create an empty game waiting for players
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            players: Vec::new(),
            supply: Supply::default(),
            trash: Vec::new(),
            active_player: 0,
            phase: GamePhase::Setup,
            turn: 0,
            pending: None,
            frames: Vec::new(),
            events: Vec::new(),
            mint: CardMint::new(),
            rng,
            config,
        }
    }

    /// Create a game with a fixed shuffle seed and the default kingdom
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig::with_seed(seed))
    }

    /// Create a game, seat the named players and set it up
    pub fn with_players(names: &[&str], config: GameConfig) -> Result<Self, GameError> {
        let mut game = Self::new(config);
        for name in names {
            game.add_player(name)?;
        }
        game.setup()?;
        Ok(game)
    }

    // ==================== Driving ====================

    /// Seat a new player, dealing their starting cards. Returns the seat.
    pub fn add_player(&mut self, name: &str) -> Result<usize, GameError> {
        if self.phase != GamePhase::Setup {
            return Err(GameError::AlreadySetUp);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(GameError::DuplicatePlayerName(name.to_string()));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::TooManyPlayers(self.players.len() + 1));
        }

        info!("{} joined the game", name);
        let player = Player::new(name.to_string(), &mut self.mint, &mut self.rng);
        self.players.push(player);
        Ok(self.players.len() - 1)
    }

    /// Lay out the supply and shuffle the seating order
    pub fn setup(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Setup {
            return Err(GameError::AlreadySetUp);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(self.players.len()));
        }

        let kingdom = self.config.kingdom().to_vec();
        validate_kingdom(&kingdom)?;

        self.supply = Supply::new(self.players.len(), &kingdom, &mut self.mint);
        self.players.shuffle(&mut self.rng);
        self.active_player = 0;
        self.phase = GamePhase::Ready;

        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        info!("Game set up, seating order: {}", names.join(", "));
        Ok(())
    }

    /// Play turns round-robin from the active player until the game ends,
    /// setting the game up first if needed
    pub fn start(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.phase == GamePhase::Setup {
            self.setup()?;
        }
        self.ensure_idle()?;

        info!("Starting game, {} goes first", self.players[self.active_player].name);
        self.frames.push(Frame::NextTurn);
        self.frames.push(Frame::TurnStart);
        self.run_and_drain()
    }

    /// Play one turn for the active player without advancing to the next
    pub fn play_turn(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_idle()?;
        self.frames.push(Frame::TurnStart);
        self.run_and_drain()
    }

    /// Move a card from a player's hand into play and run its effect.
    ///
    /// Uses no action; the turn engine does that bookkeeping itself.
    pub fn play_card(&mut self, player: usize, card: CardId) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_idle()?;
        let owner = self.players.get_mut(player).ok_or(GameError::UnknownPlayer(player))?;
        let card = owner.take_from_hand(card).ok_or(GameError::CardNotInHand(card))?;
        owner.played.push(card);

        self.frames.push(Frame::Play { player, card });
        self.run_and_drain()
    }

    /// Resolve `attack` from `attacker` against one explicit target, or
    /// against every other player in seating order. Each target may reveal
    /// a reaction first.
    pub fn attack(&mut self, attacker: usize, target: Option<usize>, attack: Attack) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_idle()?;
        for seat in std::iter::once(attacker).chain(target) {
            if seat >= self.players.len() {
                return Err(GameError::UnknownPlayer(seat));
            }
        }

        attack::broadcast(self, attacker, target, attack);
        self.run_and_drain()
    }

    /// Make `index` the active player
    pub fn set_active_player(&mut self, index: usize) -> Result<(), GameError> {
        self.ensure_idle()?;
        if index >= self.players.len() {
            return Err(GameError::UnknownPlayer(index));
        }
        self.active_player = index;
        Ok(())
    }

    /// Resolve the pending choice with the options at `indices`.
    ///
    /// On a validation error the choice stays pending and can be decided
    /// again.
    pub fn decide_option(&mut self, indices: &[usize]) -> Result<Vec<GameEvent>, GameError> {
        let pending = self.pending.take().ok_or(GameError::NoPendingChoice)?;

        let chosen = match pending.validate(indices) {
            Ok(chosen) => chosen,
            Err(err) => {
                warn!("{} made an invalid choice: {}", self.players[pending.player].name, err);
                self.pending = Some(pending);
                return Err(err);
            }
        };

        let selection = pending.pick(&chosen);
        debug!("{} chose options: {:?}", self.players[pending.player].name, chosen);
        self.emit(GameEvent::ChoiceResolved {
            player: pending.player,
            selected: selection.clone(),
        });

        self.frames.push(Frame::Resolve {
            resume: pending.resume,
            selection,
        });
        self.run_and_drain()
    }

    fn ensure_idle(&self) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Setup => Err(GameError::NotSetUp),
            GamePhase::Finished => Err(GameError::GameOver),
            _ if self.pending.is_some() => Err(GameError::ChoicePending),
            _ => Ok(()),
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run the continuation and hand back its events. Events from a failed
    /// run are dropped so they never leak into the next call.
    fn run_and_drain(&mut self) -> Result<Vec<GameEvent>, GameError> {
        match self.run() {
            Ok(()) => Ok(self.drain_events()),
            Err(err) => {
                warn!("Dropping {} events after error: {}", self.events.len(), err);
                self.events.clear();
                Err(err)
            }
        }
    }

    // ==================== Continuation ====================

    /// Run frames until the stack empties, a choice is pending, or the game
    /// ends
    fn run(&mut self) -> Result<(), GameError> {
        while self.pending.is_none() && self.phase != GamePhase::Finished {
            let Some(frame) = self.frames.pop() else {
                break;
            };
            self.step(frame)?;
        }
        Ok(())
    }

    fn step(&mut self, frame: Frame) -> Result<(), GameError> {
        match frame {
            Frame::NextTurn => {
                self.advance_turn();
                Ok(())
            }
            Frame::TurnStart => {
                self.begin_turn();
                Ok(())
            }
            Frame::ActionStep => self.action_step(),
            Frame::BuyPhase => {
                self.begin_buy_phase();
                Ok(())
            }
            Frame::BuyStep => self.buy_step(),
            Frame::Cleanup => {
                self.cleanup();
                Ok(())
            }
            Frame::Play { player, card } => effects::play(self, player, card),
            Frame::AttackTarget {
                attacker,
                target,
                attack,
            } => attack::offer_reactions(self, attacker, target, attack),
            Frame::ApplyAttack {
                attacker,
                target,
                attack,
            } => attack.apply(self, target, attacker),
            Frame::Resolve { resume, selection } => self.resume(resume, selection),
            Frame::Effect(step) => step.run(self),
        }
    }

    fn resume(&mut self, resume: Resume, selection: Vec<ChoiceOption>) -> Result<(), GameError> {
        match resume {
            Resume::PlayAction { player } => self.play_action(player, &selection),
            Resume::Buy { player } => {
                self.buy(player, &selection);
                Ok(())
            }
            Resume::React {
                attacker,
                target,
                attack,
            } => attack::resolve_reaction(self, attacker, target, attack, selected_card(&selection)),
            Resume::Effect(effect) => effect.resume(self, selection),
        }
    }

    /// Ask `player` to pick between `min` and `max` of `options`, resuming
    /// `resume` with the selection.
    ///
    /// With no options, or no more than `min`, the selection is forced and
    /// the continuation resumes at once without a pending choice. Must be
    /// the last thing a frame does.
    pub(crate) fn choose(
        &mut self,
        player: usize,
        options: Vec<ChoiceOption>,
        min: usize,
        max: Option<usize>,
        resume: Resume,
    ) -> Result<(), GameError> {
        if self.pending.is_some() {
            return Err(GameError::ChoiceAlreadyPending);
        }

        if options.len() <= min {
            debug!("{} is forced to take {} options", self.players[player].name, options.len());
            self.frames.push(Frame::Resolve {
                resume,
                selection: options,
            });
            return Ok(());
        }

        debug!("{} choose:{}", self.players[player].name, render_options(&options));
        self.emit(GameEvent::ChoiceRequested {
            player,
            options: options.clone(),
            min_choices: min,
            max_choices: max,
        });
        self.pending = Some(PendingChoice {
            player,
            options,
            min_choices: min,
            max_choices: max,
            resume,
        });
        Ok(())
    }

    pub(crate) fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    // ==================== Turn Engine ====================

    fn advance_turn(&mut self) {
        self.active_player = (self.active_player + 1) % self.players.len();
        self.frames.push(Frame::NextTurn);
        self.frames.push(Frame::TurnStart);
    }

    fn begin_turn(&mut self) {
        let player = self.active_player;
        self.turn += 1;
        self.players[player].actions = 1;

        info!("Turn {}: {} is starting action phase", self.turn, self.players[player].name);
        self.emit(GameEvent::TurnStarted {
            player,
            turn: self.turn,
        });
        self.set_phase(GamePhase::Action);

        // Frames run last-in first-out
        self.frames.push(Frame::Cleanup);
        self.frames.push(Frame::BuyPhase);
        self.frames.push(Frame::ActionStep);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.emit(GameEvent::PhaseChanged {
            player: self.active_player,
            phase,
        });
    }

    fn action_step(&mut self) -> Result<(), GameError> {
        let player = self.active_player;
        let owner = &self.players[player];
        if owner.actions == 0 {
            return Ok(());
        }
        let actions = owner.action_cards_in_hand();
        if actions.is_empty() {
            return Ok(());
        }

        debug!(
            "{} has {} actions and {} action cards in hand",
            owner.name,
            owner.actions,
            actions.len()
        );
        self.choose(player, card_options(&actions), 0, Some(1), Resume::PlayAction { player })
    }

    fn play_action(&mut self, player: usize, selection: &[ChoiceOption]) -> Result<(), GameError> {
        let Some(card) = selected_card(selection) else {
            info!("{} ends the action phase", self.players[player].name);
            return Ok(());
        };

        let owner = &mut self.players[player];
        let card = owner.take_from_hand(card.id).ok_or(GameError::CardNotInHand(card.id))?;
        owner.played.push(card);
        owner.actions = owner.actions.saturating_sub(1);

        // The effect finishes before the next action is offered
        self.frames.push(Frame::ActionStep);
        self.frames.push(Frame::Play { player, card });
        Ok(())
    }

    fn begin_buy_phase(&mut self) {
        let player = self.active_player;
        self.set_phase(GamePhase::Buy);

        let owner = &mut self.players[player];
        owner.actions = 0;
        owner.buys += 1;
        let bonus = owner.merchant_bonus.len() * owner.count_in_hand(CardKind::Silver);
        let coins = owner.coin_value_of_hand() + bonus as u32;
        owner.coins += coins;
        owner.merchant_bonus.clear();

        info!(
            "{} is starting buy phase with {} coins and {} buys",
            owner.name, owner.coins, owner.buys
        );
        self.frames.push(Frame::BuyStep);
    }

    fn buy_step(&mut self) -> Result<(), GameError> {
        let player = self.active_player;
        let owner = &self.players[player];
        if owner.buys == 0 {
            return Ok(());
        }

        let affordable = self.supply.cards_costing_at_most(owner.coins);
        self.choose(player, pile_options(&affordable), 0, Some(1), Resume::Buy { player })
    }

    fn buy(&mut self, player: usize, selection: &[ChoiceOption]) {
        let Some(kind) = selected_pile(selection) else {
            info!("{} ends the buy phase", self.players[player].name);
            return;
        };

        if self.gain(player, kind, GainDestination::Discard).is_some() {
            let owner = &mut self.players[player];
            owner.buys = owner.buys.saturating_sub(1);
            owner.coins = owner.coins.saturating_sub(kind.cost());
        }
        self.frames.push(Frame::BuyStep);
    }

    fn cleanup(&mut self) {
        let player = self.active_player;
        self.set_phase(GamePhase::Cleanup);

        let drawn = self.with_player_rng(player, |owner, rng| owner.cleanup(rng));
        info!("{} cleans up and draws {} cards", self.players[player].name, drawn);
        self.emit(GameEvent::CardsDrawn { player, count: drawn });
        self.emit(GameEvent::TurnEnded { player });
        self.phase = GamePhase::Ready;

        self.check_game_over();
    }

    /// Finish the game if the Province pile or enough other piles are empty
    fn check_game_over(&mut self) -> bool {
        if !self.end_condition_met() {
            return false;
        }

        self.phase = GamePhase::Finished;
        self.frames.clear();
        self.pending = None;

        let scores = self.scores();
        info!("Game is finished: {:?}", scores);
        self.emit(GameEvent::GameFinished { scores });
        true
    }

    fn end_condition_met(&self) -> bool {
        self.supply.pile_size(CardKind::Province) == 0 || self.supply.empty_piles().len() >= EMPTY_PILES_TO_END
    }

    // ==================== Zone Moves ====================

    /// Run `f` on a player with the game's rng, reporting any reshuffle
    fn with_player_rng<T, F>(&mut self, player: usize, f: F) -> T
    where
        F: FnOnce(&mut Player, &mut StdRng) -> T,
    {
        let owner = &mut self.players[player];
        let shuffles = owner.shuffles;
        let result = f(owner, &mut self.rng);
        if self.players[player].shuffles != shuffles {
            self.emit(GameEvent::Reshuffled { player });
        }
        result
    }

    /// Draw up to `count` cards into a player's hand
    pub(crate) fn draw(&mut self, player: usize, count: usize) -> usize {
        let drawn = self.with_player_rng(player, |owner, rng| owner.draw_into_hand(count, rng));
        debug!("{} draws {} cards", self.players[player].name, drawn);
        if drawn > 0 {
            self.emit(GameEvent::CardsDrawn { player, count: drawn });
        }
        drawn
    }

    /// Take up to `count` cards off a player's deck, placing them nowhere
    pub(crate) fn reveal(&mut self, player: usize, count: usize) -> Vec<Card> {
        let cards = self.with_player_rng(player, |owner, rng| owner.draw_cards(count, rng));
        debug!(
            "{} reveals {}",
            self.players[player].name,
            cards.iter().map(Card::name).collect::<Vec<_>>().join(", ")
        );
        cards
    }

    /// Gain the top card of `kind`'s pile. Returns `None` when the pile is
    /// empty or missing, or the seat is unknown.
    pub fn gain(&mut self, player: usize, kind: CardKind, to: GainDestination) -> Option<Card> {
        if player >= self.players.len() {
            return None;
        }
        let Some(card) = self.supply.take(kind) else {
            debug!("No {} left to gain", kind);
            return None;
        };

        let owner = &mut self.players[player];
        match to {
            GainDestination::Discard => owner.discard.push(card),
            GainDestination::Hand => owner.hand.push(card),
            GainDestination::Deck => owner.deck.push(card),
        }
        info!("{} gained {}", owner.name, card);
        self.emit(GameEvent::CardGained {
            player,
            card: kind,
            to,
        });
        Some(card)
    }

    pub(crate) fn trash_card(&mut self, player: usize, card: Card) {
        info!("{} trashes {}", self.players[player].name, card);
        self.trash.push(card);
        self.emit(GameEvent::CardTrashed {
            player,
            card: card.kind,
        });
    }

    pub(crate) fn discard_cards(&mut self, player: usize, cards: Vec<Card>) {
        if cards.is_empty() {
            return;
        }
        let count = cards.len();
        self.players[player].discard.extend(cards);
        self.emit(GameEvent::CardsDiscarded { player, count });
    }

    /// Put a card on top of a player's deck
    pub(crate) fn topdeck(&mut self, player: usize, card: Card) {
        debug!("{} puts {} on top of their deck", self.players[player].name, card);
        self.players[player].deck.push(card);
        self.emit(GameEvent::CardTopdecked {
            player,
            card: card.kind,
        });
    }

    // ==================== Queries ====================

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn active_player(&self) -> usize {
        self.active_player
    }

    /// Turns started so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Mutable access to a player's zones and counters
    pub fn player_mut(&mut self, index: usize) -> Option<&mut Player> {
        self.players.get_mut(index)
    }

    pub fn supply(&self) -> &Supply {
        &self.supply
    }

    pub fn trash(&self) -> &[Card] {
        &self.trash
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn pending_choice(&self) -> Option<&PendingChoice> {
        self.pending.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Supply piles whose top card costs at most `limit`
    pub fn cards_costing_at_most(&self, limit: u32) -> Vec<CardKind> {
        self.supply.cards_costing_at_most(limit)
    }

    pub fn empty_piles(&self) -> Vec<CardKind> {
        self.supply.empty_piles()
    }

    /// Points per player name
    pub fn count_points(&self) -> HashMap<String, i32> {
        self.players
            .iter()
            .map(|p| (p.name.clone(), p.count_points()))
            .collect()
    }

    /// Points per player in seating order
    pub fn scores(&self) -> Vec<(String, i32)> {
        self.players
            .iter()
            .map(|p| (p.name.clone(), p.count_points()))
            .collect()
    }

    /// Names of the players with the highest score
    pub fn winners(&self) -> Vec<String> {
        let scores = self.scores();
        let Some(best) = scores.iter().map(|(_, points)| *points).max() else {
            return Vec::new();
        };
        scores
            .into_iter()
            .filter(|(_, points)| *points == best)
            .map(|(name, _)| name)
            .collect()
    }

    /// Every card instance in the game: supply, trash, all zones and cards
    /// held by a waiting continuation. Constant once the game is set up.
    pub fn total_cards(&self) -> usize {
        let held = self.pending.as_ref().map_or(0, |p| p.resume.held_cards())
            + self.frames.iter().map(Frame::held_cards).sum::<usize>();

        self.supply.total_cards()
            + self.trash.len()
            + self.players.iter().map(Player::owned_card_count).sum::<usize>()
            + held
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::of(self)
    }
}
