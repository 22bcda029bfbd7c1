//! Attacks and reactions.
//!
//! An attack card names an `Attack` variant. Broadcasting it visits each
//! target in seating order; every target is first offered the reactions in
//! their hand, and only when none is revealed does the attack apply.

use crate::card::{Card, CardKind};
use crate::choice::{answer_options, card_options, Answer, Resume};
use crate::effects::EffectResume;
use crate::events::{GainDestination, GameEvent};
use crate::game::{Frame, Game, GameError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Hand size Militia's targets discard down to
pub const MILITIA_HAND_LIMIT: usize = 3;

/// Attack effects carried by attack cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attack {
    /// Witch: gain a Curse
    GainCurse,
    /// Militia: discard down to the given hand size
    DiscardDownTo(usize),
    /// Bureaucrat: put a Victory card from hand onto the deck
    TopdeckVictory,
    /// Bandit: reveal two, trash a non-Copper treasure, discard the rest
    TrashTreasure,
    /// Spy: reveal the top card; the attacker decides discard or put back
    Spy,
    /// Thief: reveal two; the attacker trashes a treasure and may gain it
    Thief,
}

impl Attack {
    /// Apply this attack to `target`. Any decision it needs is requested
    /// as the final step.
    pub(crate) fn apply(self, game: &mut Game, target: usize, attacker: usize) -> Result<(), GameError> {
        match self {
            Attack::GainCurse => {
                game.gain(target, CardKind::Curse, GainDestination::Discard);
                Ok(())
            }

            Attack::DiscardDownTo(limit) => {
                let hand = game.players[target].hand.clone();
                if hand.len() <= limit {
                    info!("{} has {} or fewer cards in hand", game.players[target].name, limit);
                    return Ok(());
                }
                let count = hand.len() - limit;
                game.choose(
                    target,
                    card_options(&hand),
                    count,
                    Some(count),
                    Resume::Effect(EffectResume::DiscardFromHand { player: target }),
                )
            }

            Attack::TopdeckVictory => {
                let victories: Vec<Card> = game.players[target]
                    .hand
                    .iter()
                    .filter(|c| c.is_victory())
                    .copied()
                    .collect();
                if victories.is_empty() {
                    info!("{} reveals a hand with no Victory cards", game.players[target].name);
                }
                game.choose(
                    target,
                    card_options(&victories),
                    1,
                    Some(1),
                    Resume::Effect(EffectResume::TopdeckFromHand { player: target }),
                )
            }

            Attack::TrashTreasure => {
                let revealed = game.reveal(target, 2);
                let candidates: Vec<Card> = revealed
                    .iter()
                    .filter(|c| c.is_treasure() && c.kind != CardKind::Copper)
                    .copied()
                    .collect();
                game.choose(
                    target,
                    card_options(&candidates),
                    1,
                    Some(1),
                    Resume::Effect(EffectResume::BanditTrash { target, revealed }),
                )
            }

            Attack::Spy => match game.reveal(target, 1).pop() {
                Some(card) => game.choose(
                    attacker,
                    answer_options(&[Answer::Discard, Answer::PutBack]),
                    1,
                    Some(1),
                    Resume::Effect(EffectResume::SpyDecide { target, card }),
                ),
                None => Ok(()),
            },

            Attack::Thief => {
                let revealed = game.reveal(target, 2);
                let treasures: Vec<Card> = revealed.iter().filter(|c| c.is_treasure()).copied().collect();
                game.choose(
                    attacker,
                    card_options(&treasures),
                    1,
                    Some(1),
                    Resume::Effect(EffectResume::ThiefTrash {
                        attacker,
                        target,
                        revealed,
                    }),
                )
            }
        }
    }
}

/// Queue `attack` against one explicit target, or every player but the
/// attacker in seating order. Each target is offered their reactions first.
pub(crate) fn broadcast(game: &mut Game, attacker: usize, target: Option<usize>, attack: Attack) {
    let targets: Vec<usize> = match target {
        Some(target) => vec![target],
        None => (0..game.players.len()).filter(|&p| p != attacker).collect(),
    };

    // Frames run last-in first-out; push the last target first
    for target in targets.into_iter().rev() {
        game.push_frame(Frame::AttackTarget {
            attacker,
            target,
            attack,
        });
    }
}

/// Offer `target` the reactions in their hand
pub(crate) fn offer_reactions(game: &mut Game, attacker: usize, target: usize, attack: Attack) -> Result<(), GameError> {
    let reactions = game.players[target].reactions_in_hand();
    game.choose(
        target,
        card_options(&reactions),
        0,
        Some(1),
        Resume::React {
            attacker,
            target,
            attack,
        },
    )
}

/// Resume after the reaction offer
pub(crate) fn resolve_reaction(
    game: &mut Game,
    attacker: usize,
    target: usize,
    attack: Attack,
    reaction: Option<Card>,
) -> Result<(), GameError> {
    match reaction {
        Some(card) => on_attack(game, card, attacker, target, attack),
        None => attack.apply(game, target, attacker),
    }
}

/// A revealed reaction responds to the attack in place of its effect
fn on_attack(game: &mut Game, reaction: Card, attacker: usize, target: usize, attack: Attack) -> Result<(), GameError> {
    match reaction.kind {
        CardKind::Moat => {
            info!(
                "{} reveals Moat and is unaffected by {:?} from {}",
                game.players[target].name, attack, game.players[attacker].name
            );
        }
        other => {
            // No response of its own: the attack is suppressed
            debug!("{} reveals {} against {:?}", game.players[target].name, other, attack);
        }
    }
    game.emit(GameEvent::AttackBlocked {
        attacker,
        target,
        reaction: reaction.kind,
    });
    Ok(())
}
