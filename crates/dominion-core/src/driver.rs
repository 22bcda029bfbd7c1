//! A driver that answers every decision at random.
//!
//! The driver never passes when it may select something, so buys keep
//! draining the supply and every game it drives reaches an end.

use crate::choice::PendingChoice;
use crate::events::GameEvent;
use crate::game::{Game, GameError};
use rand::prelude::*;
use rand::seq::index;
use tracing::debug;

/// Resolves pending choices with uniformly random valid selections
pub struct RandomDriver {
    rng: StdRng,
}

impl Default for RandomDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomDriver {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a valid selection for `choice`: at least one option whenever
    /// the upper bound allows it.
    pub fn choose_indices(&mut self, choice: &PendingChoice) -> Vec<usize> {
        let upper = choice.upper_bound();
        let lower = choice.min_choices.max(1).min(upper);
        let count = self.rng.gen_range(lower..=upper);
        index::sample(&mut self.rng, choice.options.len(), count).into_vec()
    }

    /// Decide the pending choice, if there is one
    pub fn resolve_pending(&mut self, game: &mut Game) -> Result<Option<Vec<GameEvent>>, GameError> {
        let Some(choice) = game.pending_choice() else {
            return Ok(None);
        };
        let indices = self.choose_indices(choice);
        game.decide_option(&indices).map(Some)
    }

    /// Start the game and decide every choice until it ends or
    /// `max_decisions` have been made. Returns the decisions made.
    pub fn play(&mut self, game: &mut Game, max_decisions: usize) -> Result<usize, GameError> {
        if game.pending_choice().is_none() && !game.is_finished() {
            game.start()?;
        }

        let mut decisions = 0;
        while decisions < max_decisions {
            if self.resolve_pending(game)?.is_none() {
                break;
            }
            decisions += 1;
        }

        debug!("Random driver made {} decisions", decisions);
        Ok(decisions)
    }
}
