//! Decisions requested from players.
//!
//! A decision is offered as a `PendingChoice`: an option list, bounds on how
//! many options may be taken, and a `Resume` record naming the continuation
//! that runs once a valid selection arrives. At most one exists per game.

use crate::attack::Attack;
use crate::card::{Card, CardId, CardKind};
use crate::effects::EffectResume;
use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed answers offered by yes/no style questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
    Discard,
    PutBack,
    Keep,
    SetAside,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Discard => "discard",
            Answer::PutBack => "put back",
            Answer::Keep => "keep",
            Answer::SetAside => "set aside",
        };
        f.write_str(text)
    }
}

/// Something a player can choose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceOption {
    /// A specific card instance
    Card(Card),
    /// A supply pile, identified by its variant
    Pile(CardKind),
    /// A fixed answer
    Answer(Answer),
}

impl ChoiceOption {
    pub fn as_card(&self) -> Option<Card> {
        match self {
            ChoiceOption::Card(card) => Some(*card),
            _ => None,
        }
    }

    pub fn as_pile(&self) -> Option<CardKind> {
        match self {
            ChoiceOption::Pile(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_answer(&self) -> Option<Answer> {
        match self {
            ChoiceOption::Answer(answer) => Some(*answer),
            _ => None,
        }
    }
}

impl fmt::Display for ChoiceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceOption::Card(card) => write!(f, "{}", card),
            ChoiceOption::Pile(kind) => write!(f, "{}", kind),
            ChoiceOption::Answer(answer) => write!(f, "{}", answer),
        }
    }
}

/// Wrap cards as options
pub fn card_options(cards: &[Card]) -> Vec<ChoiceOption> {
    cards.iter().copied().map(ChoiceOption::Card).collect()
}

/// Wrap supply piles as options
pub fn pile_options(kinds: &[CardKind]) -> Vec<ChoiceOption> {
    kinds.iter().copied().map(ChoiceOption::Pile).collect()
}

/// Wrap answers as options
pub fn answer_options(answers: &[Answer]) -> Vec<ChoiceOption> {
    answers.iter().copied().map(ChoiceOption::Answer).collect()
}

/// Cards in a selection, in selection order
pub fn selected_cards(selection: &[ChoiceOption]) -> Vec<Card> {
    selection.iter().filter_map(ChoiceOption::as_card).collect()
}

pub fn selected_card(selection: &[ChoiceOption]) -> Option<Card> {
    selection.iter().find_map(ChoiceOption::as_card)
}

pub fn selected_pile(selection: &[ChoiceOption]) -> Option<CardKind> {
    selection.iter().find_map(ChoiceOption::as_pile)
}

pub fn selected_answer(selection: &[ChoiceOption]) -> Option<Answer> {
    selection.iter().find_map(ChoiceOption::as_answer)
}

/// Render options as ` 0 : Copper, 1 : Estate`
pub fn render_options(options: &[ChoiceOption]) -> String {
    options
        .iter()
        .enumerate()
        .map(|(index, option)| format!(" {} : {}", index, option))
        .collect::<Vec<_>>()
        .join(",")
}

/// The continuation waiting on a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resume {
    /// Action phase: the action card to play, or none to end the phase
    PlayAction { player: usize },
    /// Buy phase: the pile to buy from, or none to end the phase
    Buy { player: usize },
    /// Attack target: the reaction to reveal, or none to take the attack
    React {
        attacker: usize,
        target: usize,
        attack: Attack,
    },
    /// Remainder of a card effect
    Effect(EffectResume),
}

impl Resume {
    /// Cards that sit in no zone while this continuation waits
    pub(crate) fn held_cards(&self) -> usize {
        match self {
            Resume::Effect(effect) => effect.held_cards(),
            _ => 0,
        }
    }
}

/// The single outstanding decision
#[derive(Debug, Clone, Serialize)]
pub struct PendingChoice {
    /// Player who must decide
    pub player: usize,
    /// Options on offer
    pub options: Vec<ChoiceOption>,
    /// Fewest options that must be selected
    pub min_choices: usize,
    /// Most options that may be selected; `None` means up to all of them
    pub max_choices: Option<usize>,
    #[serde(skip)]
    pub(crate) resume: Resume,
}

impl PendingChoice {
    /// Validate a selection of option indices.
    ///
    /// Indices must be in range; repeats count once. Returns the distinct
    /// indices in the order they first appear.
    pub fn validate(&self, indices: &[usize]) -> Result<Vec<usize>, GameError> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.options.len()) {
            return Err(GameError::InvalidIndex {
                index,
                options: render_options(&self.options),
            });
        }

        let mut unique: Vec<usize> = Vec::with_capacity(indices.len());
        for &index in indices {
            if !unique.contains(&index) {
                unique.push(index);
            }
        }

        if let Some(max) = self.max_choices {
            if unique.len() > max {
                return Err(GameError::TooManyChoices {
                    chosen: unique.len(),
                    max,
                });
            }
        }

        if unique.len() < self.min_choices {
            return Err(GameError::TooFewChoices {
                chosen: unique.len(),
                min: self.min_choices,
            });
        }

        Ok(unique)
    }

    /// Options at the given indices, in the given order
    pub fn pick(&self, indices: &[usize]) -> Vec<ChoiceOption> {
        indices.iter().map(|&i| self.options[i]).collect()
    }

    /// Index of the option holding the given card
    pub fn position_of_card(&self, id: CardId) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.as_card().is_some_and(|c| c.id == id))
    }

    /// Index of the option naming the given pile
    pub fn position_of_pile(&self, kind: CardKind) -> Option<usize> {
        self.options.iter().position(|o| o.as_pile() == Some(kind))
    }

    /// Index of the option holding the given answer
    pub fn position_of_answer(&self, answer: Answer) -> Option<usize> {
        self.options.iter().position(|o| o.as_answer() == Some(answer))
    }

    /// Largest selection size this choice accepts
    pub fn upper_bound(&self) -> usize {
        self.max_choices
            .map_or(self.options.len(), |max| max.min(self.options.len()))
    }
}
