//! Card effect scripts.
//!
//! `play` runs the part of a card's effect that needs no input. When the
//! effect needs a decision it asks for it as its last step, naming an
//! `EffectResume` that carries the rest of the effect. Once the decision is
//! made, `EffectResume::resume` continues with the selected options.

use crate::attack::{self, Attack, MILITIA_HAND_LIMIT};
use crate::card::{Card, CardKind, CardType};
use crate::choice::{
    answer_options, card_options, pile_options, selected_answer, selected_card, selected_cards, selected_pile,
    Answer, ChoiceOption, Resume,
};
use crate::events::{GainDestination, GameEvent};
use crate::game::{Frame, Game, GameError};
use crate::player::take_card;
use tracing::{debug, info};

/// Library draws until the hand holds this many cards
const LIBRARY_HAND_SIZE: usize = 7;

/// Most cards Chapel may trash
const CHAPEL_TRASH_LIMIT: usize = 4;

/// Cards Sentry looks at
const SENTRY_LOOK: usize = 2;

/// Treasures Adventurer digs for
const ADVENTURER_TREASURES: usize = 2;

/// Continuation of a card effect that is waiting on a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EffectResume {
    /// Cellar: discard the selection, then draw as many
    CellarDiscard { player: usize },
    /// Trash the selected hand cards
    TrashFromHand { player: usize },
    /// Discard the selected hand cards
    DiscardFromHand { player: usize },
    /// Put the selected hand cards on top of the deck
    TopdeckFromHand { player: usize },
    /// Harbinger: move the selected discard onto the deck
    HarbingerTopdeck { player: usize },
    /// Vassal: play the discarded action, or leave it in the discard pile
    VassalPlay { player: usize, card: Card },
    /// Gain the selected pile's top card
    GainCard { player: usize, to: GainDestination },
    /// Moneylender: trash a Copper for +3 coins
    MoneylenderTrash { player: usize },
    /// Remodel: trash the selection, then choose a gain
    RemodelTrash { player: usize },
    /// Throne Room: play the selected action twice
    ThroneRoomPlay { player: usize },
    /// Mine: trash the selected treasure, then choose a better one
    MineTrash { player: usize },
    /// Sentry: trash any of the looked-at cards
    SentryTrash { player: usize, revealed: Vec<Card> },
    /// Sentry: discard any of what is left
    SentryDiscard { player: usize, revealed: Vec<Card> },
    /// Sentry: the selected card goes back on top of the other
    SentryTopdeck { player: usize, revealed: Vec<Card> },
    /// Artisan: gain into hand, then put a hand card on the deck
    ArtisanGain { player: usize },
    /// Chancellor: move the whole deck into the discard pile
    ChancellorDeck { player: usize },
    /// Library: keep the drawn action or set it aside
    LibraryAside { player: usize, card: Card, aside: Vec<Card> },
    /// Bandit: trash the selected treasure, discard the rest
    BanditTrash { target: usize, revealed: Vec<Card> },
    /// Spy: discard the revealed card or put it back
    SpyDecide { target: usize, card: Card },
    /// Thief: trash the selected treasure, discard the rest
    ThiefTrash {
        attacker: usize,
        target: usize,
        revealed: Vec<Card>,
    },
    /// Thief: take the trashed treasure
    ThiefGain { attacker: usize, card: Card },
}

/// Effect work queued on the frame stack without a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EffectStep {
    /// Library: draw one card, unless the hand is full
    LibraryDraw { player: usize, aside: Vec<Card> },
}

impl EffectStep {
    /// Cards held outside every zone while this step waits
    pub(crate) fn held_cards(&self) -> usize {
        match self {
            EffectStep::LibraryDraw { aside, .. } => aside.len(),
        }
    }

    pub(crate) fn run(self, game: &mut Game) -> Result<(), GameError> {
        match self {
            EffectStep::LibraryDraw { player, aside } => {
                if game.players[player].hand.len() >= LIBRARY_HAND_SIZE {
                    game.discard_cards(player, aside);
                    return Ok(());
                }
                match game.reveal(player, 1).pop() {
                    None => {
                        game.discard_cards(player, aside);
                        Ok(())
                    }
                    Some(card) if card.is_action() => ask(
                        game,
                        player,
                        answer_options(&[Answer::Keep, Answer::SetAside]),
                        1,
                        Some(1),
                        EffectResume::LibraryAside { player, card, aside },
                    ),
                    Some(card) => {
                        put_in_hand(game, player, vec![card]);
                        game.push_frame(Frame::Effect(EffectStep::LibraryDraw { player, aside }));
                        Ok(())
                    }
                }
            }
        }
    }
}

/// Request a decision whose answer continues a card effect
fn ask(
    game: &mut Game,
    player: usize,
    options: Vec<ChoiceOption>,
    min: usize,
    max: Option<usize>,
    resume: EffectResume,
) -> Result<(), GameError> {
    game.choose(player, options, min, max, Resume::Effect(resume))
}

/// Ask for a supply pile costing at most `limit` to gain from
fn ask_gain(game: &mut Game, player: usize, limit: u32, resume: EffectResume) -> Result<(), GameError> {
    let affordable = game.supply.cards_costing_at_most(limit);
    ask(game, player, pile_options(&affordable), 1, Some(1), resume)
}

fn put_in_hand(game: &mut Game, player: usize, cards: Vec<Card>) {
    if cards.is_empty() {
        return;
    }
    game.emit(GameEvent::CardsDrawn {
        player,
        count: cards.len(),
    });
    game.players[player].hand.extend(cards);
}

fn discard_from_hand(game: &mut Game, player: usize, cards: &[Card]) -> usize {
    let discarded = cards
        .iter()
        .filter(|card| game.players[player].discard_from_hand(card.id))
        .count();
    if discarded > 0 {
        info!("{} discards {} cards", game.players[player].name, discarded);
        game.emit(GameEvent::CardsDiscarded {
            player,
            count: discarded,
        });
    }
    discarded
}

fn trash_from_hand(game: &mut Game, player: usize, card: Card) -> Result<Card, GameError> {
    let card = game.players[player]
        .take_from_hand(card.id)
        .ok_or(GameError::CardNotInHand(card.id))?;
    game.trash_card(player, card);
    Ok(card)
}

/// Run the immediate part of `card`'s effect; the card is already in play
pub(crate) fn play(game: &mut Game, player: usize, card: Card) -> Result<(), GameError> {
    info!("{} plays {}", game.players[player].name, card);
    game.emit(GameEvent::CardPlayed {
        player,
        card: card.kind,
    });

    match card.kind {
        CardKind::Cellar => {
            game.players[player].actions += 1;
            let hand = game.players[player].hand.clone();
            ask(
                game,
                player,
                card_options(&hand),
                0,
                None,
                EffectResume::CellarDiscard { player },
            )
        }

        CardKind::Chapel => {
            let hand = game.players[player].hand.clone();
            ask(
                game,
                player,
                card_options(&hand),
                0,
                Some(CHAPEL_TRASH_LIMIT),
                EffectResume::TrashFromHand { player },
            )
        }

        CardKind::Moat => {
            game.draw(player, 2);
            Ok(())
        }

        CardKind::Harbinger => {
            game.draw(player, 1);
            game.players[player].actions += 1;
            let discard = game.players[player].discard.clone();
            ask(
                game,
                player,
                card_options(&discard),
                0,
                Some(1),
                EffectResume::HarbingerTopdeck { player },
            )
        }

        CardKind::Merchant => {
            game.draw(player, 1);
            let owner = &mut game.players[player];
            owner.actions += 1;
            owner.merchant_bonus.push(card.id);
            Ok(())
        }

        CardKind::Vassal => {
            game.players[player].coins += 2;
            match game.reveal(player, 1).pop() {
                Some(top) if top.is_action() => ask(
                    game,
                    player,
                    answer_options(&[Answer::No, Answer::Yes]),
                    1,
                    Some(1),
                    EffectResume::VassalPlay { player, card: top },
                ),
                Some(top) => {
                    game.discard_cards(player, vec![top]);
                    Ok(())
                }
                None => Ok(()),
            }
        }

        CardKind::Village => {
            game.draw(player, 1);
            game.players[player].actions += 2;
            Ok(())
        }

        CardKind::Workshop => ask_gain(
            game,
            player,
            4,
            EffectResume::GainCard {
                player,
                to: GainDestination::Discard,
            },
        ),

        CardKind::Bureaucrat => {
            game.gain(player, CardKind::Silver, GainDestination::Deck);
            attack::broadcast(game, player, None, Attack::TopdeckVictory);
            Ok(())
        }

        CardKind::Militia => {
            game.players[player].coins += 2;
            attack::broadcast(game, player, None, Attack::DiscardDownTo(MILITIA_HAND_LIMIT));
            Ok(())
        }

        CardKind::Moneylender => {
            if game.players[player].count_in_hand(CardKind::Copper) == 0 {
                debug!("{} has no Copper to trash", game.players[player].name);
                return Ok(());
            }
            ask(
                game,
                player,
                answer_options(&[Answer::No, Answer::Yes]),
                1,
                Some(1),
                EffectResume::MoneylenderTrash { player },
            )
        }

        CardKind::Poacher => {
            game.draw(player, 1);
            let owner = &mut game.players[player];
            owner.actions += 1;
            owner.coins += 1;

            let hand = owner.hand.clone();
            let count = game.supply.empty_piles().len().min(hand.len());
            if count == 0 {
                return Ok(());
            }
            ask(
                game,
                player,
                card_options(&hand),
                count,
                Some(count),
                EffectResume::DiscardFromHand { player },
            )
        }

        CardKind::Remodel => {
            let hand = game.players[player].hand.clone();
            ask(
                game,
                player,
                card_options(&hand),
                1,
                Some(1),
                EffectResume::RemodelTrash { player },
            )
        }

        CardKind::Smithy => {
            game.draw(player, 3);
            Ok(())
        }

        CardKind::ThroneRoom => {
            let actions = game.players[player].action_cards_in_hand();
            ask(
                game,
                player,
                card_options(&actions),
                0,
                Some(1),
                EffectResume::ThroneRoomPlay { player },
            )
        }

        CardKind::Bandit => {
            game.gain(player, CardKind::Gold, GainDestination::Discard);
            attack::broadcast(game, player, None, Attack::TrashTreasure);
            Ok(())
        }

        CardKind::CouncilRoom => {
            game.draw(player, 4);
            game.players[player].buys += 1;
            for other in (0..game.players.len()).filter(|&p| p != player) {
                game.draw(other, 1);
            }
            Ok(())
        }

        CardKind::Festival => {
            let owner = &mut game.players[player];
            owner.actions += 2;
            owner.buys += 1;
            owner.coins += 2;
            Ok(())
        }

        CardKind::Laboratory => {
            game.draw(player, 2);
            game.players[player].actions += 1;
            Ok(())
        }

        CardKind::Library => {
            game.push_frame(Frame::Effect(EffectStep::LibraryDraw {
                player,
                aside: Vec::new(),
            }));
            Ok(())
        }

        CardKind::Market => {
            game.draw(player, 1);
            let owner = &mut game.players[player];
            owner.actions += 1;
            owner.buys += 1;
            owner.coins += 1;
            Ok(())
        }

        CardKind::Mine => {
            let treasures = game.players[player].hand_cards_of(CardType::Treasure);
            ask(
                game,
                player,
                card_options(&treasures),
                0,
                Some(1),
                EffectResume::MineTrash { player },
            )
        }

        CardKind::Sentry => {
            game.draw(player, 1);
            game.players[player].actions += 1;
            let revealed = game.reveal(player, SENTRY_LOOK);
            ask(
                game,
                player,
                card_options(&revealed),
                0,
                None,
                EffectResume::SentryTrash { player, revealed },
            )
        }

        CardKind::Witch => {
            game.draw(player, 2);
            attack::broadcast(game, player, None, Attack::GainCurse);
            Ok(())
        }

        CardKind::Artisan => ask_gain(game, player, 5, EffectResume::ArtisanGain { player }),

        CardKind::Chancellor => {
            game.players[player].coins += 2;
            if game.players[player].deck.is_empty() {
                return Ok(());
            }
            ask(
                game,
                player,
                answer_options(&[Answer::No, Answer::Yes]),
                1,
                Some(1),
                EffectResume::ChancellorDeck { player },
            )
        }

        CardKind::Woodcutter => {
            let owner = &mut game.players[player];
            owner.buys += 1;
            owner.coins += 2;
            Ok(())
        }

        CardKind::Feast => {
            // A second play through Throne Room finds it already gone
            if let Some(feast) = take_card(&mut game.players[player].played, card.id) {
                game.trash_card(player, feast);
            }
            ask_gain(
                game,
                player,
                5,
                EffectResume::GainCard {
                    player,
                    to: GainDestination::Discard,
                },
            )
        }

        CardKind::Spy => {
            game.draw(player, 1);
            game.players[player].actions += 1;
            attack::broadcast(game, player, None, Attack::Spy);
            // The attacker reveals first, with no reaction offered
            game.push_frame(Frame::ApplyAttack {
                attacker: player,
                target: player,
                attack: Attack::Spy,
            });
            Ok(())
        }

        CardKind::Thief => {
            attack::broadcast(game, player, None, Attack::Thief);
            Ok(())
        }

        CardKind::Adventurer => {
            let mut treasures = Vec::new();
            let mut others = Vec::new();
            while treasures.len() < ADVENTURER_TREASURES {
                match game.reveal(player, 1).pop() {
                    Some(card) if card.is_treasure() => treasures.push(card),
                    Some(card) => others.push(card),
                    None => break,
                }
            }
            put_in_hand(game, player, treasures);
            game.discard_cards(player, others);
            Ok(())
        }

        CardKind::Copper
        | CardKind::Silver
        | CardKind::Gold
        | CardKind::Estate
        | CardKind::Duchy
        | CardKind::Province
        | CardKind::Curse
        | CardKind::Gardens => {
            debug!("{} has no effect when played", card);
            Ok(())
        }
    }
}

impl EffectResume {
    /// Cards held outside every zone while this continuation waits
    pub(crate) fn held_cards(&self) -> usize {
        match self {
            EffectResume::VassalPlay { .. } | EffectResume::SpyDecide { .. } => 1,
            EffectResume::LibraryAside { aside, .. } => aside.len() + 1,
            EffectResume::SentryTrash { revealed, .. }
            | EffectResume::SentryDiscard { revealed, .. }
            | EffectResume::SentryTopdeck { revealed, .. }
            | EffectResume::BanditTrash { revealed, .. }
            | EffectResume::ThiefTrash { revealed, .. } => revealed.len(),
            _ => 0,
        }
    }

    /// Continue the effect with the options that were selected
    pub(crate) fn resume(self, game: &mut Game, selection: Vec<ChoiceOption>) -> Result<(), GameError> {
        match self {
            EffectResume::CellarDiscard { player } => {
                let discarded = discard_from_hand(game, player, &selected_cards(&selection));
                game.draw(player, discarded);
                Ok(())
            }

            EffectResume::TrashFromHand { player } => {
                for card in selected_cards(&selection) {
                    trash_from_hand(game, player, card)?;
                }
                Ok(())
            }

            EffectResume::DiscardFromHand { player } => {
                discard_from_hand(game, player, &selected_cards(&selection));
                Ok(())
            }

            EffectResume::TopdeckFromHand { player } => {
                for card in selected_cards(&selection) {
                    let card = game.players[player]
                        .take_from_hand(card.id)
                        .ok_or(GameError::CardNotInHand(card.id))?;
                    game.topdeck(player, card);
                }
                Ok(())
            }

            EffectResume::HarbingerTopdeck { player } => {
                if let Some(card) = selected_card(&selection) {
                    if let Some(card) = take_card(&mut game.players[player].discard, card.id) {
                        game.topdeck(player, card);
                    }
                }
                Ok(())
            }

            EffectResume::VassalPlay { player, card } => {
                if selected_answer(&selection) == Some(Answer::Yes) {
                    game.players[player].played.push(card);
                    game.push_frame(Frame::Play { player, card });
                } else {
                    game.discard_cards(player, vec![card]);
                }
                Ok(())
            }

            EffectResume::GainCard { player, to } => {
                if let Some(kind) = selected_pile(&selection) {
                    game.gain(player, kind, to);
                }
                Ok(())
            }

            EffectResume::MoneylenderTrash { player } => {
                if selected_answer(&selection) != Some(Answer::Yes) {
                    return Ok(());
                }
                let copper = game.players[player]
                    .hand
                    .iter()
                    .find(|c| c.kind == CardKind::Copper)
                    .copied();
                if let Some(copper) = copper {
                    trash_from_hand(game, player, copper)?;
                    game.players[player].coins += 3;
                }
                Ok(())
            }

            EffectResume::RemodelTrash { player } => match selected_card(&selection) {
                Some(card) => {
                    let trashed = trash_from_hand(game, player, card)?;
                    ask_gain(
                        game,
                        player,
                        trashed.cost() + 2,
                        EffectResume::GainCard {
                            player,
                            to: GainDestination::Discard,
                        },
                    )
                }
                None => Ok(()),
            },

            EffectResume::ThroneRoomPlay { player } => {
                let Some(card) = selected_card(&selection) else {
                    return Ok(());
                };
                let card = game.players[player]
                    .take_from_hand(card.id)
                    .ok_or(GameError::CardNotInHand(card.id))?;
                game.players[player].played.push(card);
                info!("{} plays {} twice", game.players[player].name, card);
                game.push_frame(Frame::Play { player, card });
                game.push_frame(Frame::Play { player, card });
                Ok(())
            }

            EffectResume::MineTrash { player } => match selected_card(&selection) {
                Some(card) => {
                    let trashed = trash_from_hand(game, player, card)?;
                    let treasures = game.supply.treasures_costing_at_most(trashed.cost() + 3);
                    ask(
                        game,
                        player,
                        pile_options(&treasures),
                        1,
                        Some(1),
                        EffectResume::GainCard {
                            player,
                            to: GainDestination::Hand,
                        },
                    )
                }
                None => Ok(()),
            },

            EffectResume::SentryTrash { player, revealed } => {
                let chosen = selected_cards(&selection);
                let (trashed, kept): (Vec<Card>, Vec<Card>) =
                    revealed.into_iter().partition(|c| chosen.contains(c));
                for card in trashed {
                    game.trash_card(player, card);
                }
                ask(
                    game,
                    player,
                    card_options(&kept),
                    0,
                    None,
                    EffectResume::SentryDiscard {
                        player,
                        revealed: kept,
                    },
                )
            }

            EffectResume::SentryDiscard { player, revealed } => {
                let chosen = selected_cards(&selection);
                let (discarded, kept): (Vec<Card>, Vec<Card>) =
                    revealed.into_iter().partition(|c| chosen.contains(c));
                game.discard_cards(player, discarded);
                if kept.len() > 1 {
                    return ask(
                        game,
                        player,
                        card_options(&kept),
                        1,
                        Some(1),
                        EffectResume::SentryTopdeck {
                            player,
                            revealed: kept,
                        },
                    );
                }
                for card in kept {
                    game.topdeck(player, card);
                }
                Ok(())
            }

            EffectResume::SentryTopdeck { player, revealed } => {
                let top = selected_card(&selection);
                let (top, rest): (Vec<Card>, Vec<Card>) = revealed.into_iter().partition(|c| Some(*c) == top);
                for card in rest.into_iter().chain(top) {
                    game.topdeck(player, card);
                }
                Ok(())
            }

            EffectResume::ArtisanGain { player } => {
                if let Some(kind) = selected_pile(&selection) {
                    game.gain(player, kind, GainDestination::Hand);
                }
                let hand = game.players[player].hand.clone();
                ask(
                    game,
                    player,
                    card_options(&hand),
                    1,
                    Some(1),
                    EffectResume::TopdeckFromHand { player },
                )
            }

            EffectResume::ChancellorDeck { player } => {
                if selected_answer(&selection) == Some(Answer::Yes) {
                    let owner = &mut game.players[player];
                    info!("{} puts {} deck cards into the discard pile", owner.name, owner.deck.len());
                    let mut deck = std::mem::take(&mut owner.deck);
                    owner.discard.append(&mut deck);
                }
                Ok(())
            }

            EffectResume::LibraryAside { player, card, mut aside } => {
                if selected_answer(&selection) == Some(Answer::SetAside) {
                    debug!("{} sets aside {}", game.players[player].name, card);
                    aside.push(card);
                } else {
                    put_in_hand(game, player, vec![card]);
                }
                game.push_frame(Frame::Effect(EffectStep::LibraryDraw { player, aside }));
                Ok(())
            }

            EffectResume::BanditTrash { target, revealed } => {
                let chosen = selected_card(&selection);
                let (trashed, rest): (Vec<Card>, Vec<Card>) = revealed.into_iter().partition(|c| Some(*c) == chosen);
                for card in trashed {
                    game.trash_card(target, card);
                }
                game.discard_cards(target, rest);
                Ok(())
            }

            EffectResume::SpyDecide { target, card } => {
                if selected_answer(&selection) == Some(Answer::Discard) {
                    game.discard_cards(target, vec![card]);
                } else {
                    game.topdeck(target, card);
                }
                Ok(())
            }

            EffectResume::ThiefTrash {
                attacker,
                target,
                revealed,
            } => {
                let chosen = selected_card(&selection);
                let (trashed, rest): (Vec<Card>, Vec<Card>) = revealed.into_iter().partition(|c| Some(*c) == chosen);
                game.discard_cards(target, rest);
                match trashed.into_iter().next() {
                    Some(card) => {
                        game.trash_card(target, card);
                        ask(
                            game,
                            attacker,
                            answer_options(&[Answer::Yes, Answer::No]),
                            1,
                            Some(1),
                            EffectResume::ThiefGain { attacker, card },
                        )
                    }
                    None => Ok(()),
                }
            }

            EffectResume::ThiefGain { attacker, card } => {
                if selected_answer(&selection) != Some(Answer::Yes) {
                    return Ok(());
                }
                if let Some(card) = take_card(&mut game.trash, card.id) {
                    info!("{} gains the trashed {}", game.players[attacker].name, card);
                    game.players[attacker].discard.push(card);
                    game.emit(GameEvent::CardGained {
                        player: attacker,
                        card: card.kind,
                        to: GainDestination::Discard,
                    });
                }
                Ok(())
            }
        }
    }
}
