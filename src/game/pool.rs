//! The draw pool: depletion-without-replacement card draws.

use crate::error::ActionError;
use crate::game::Card;
use crate::rng::GameRng;

/// Cards not yet drawn by any player.
#[derive(Debug, Clone, Default)]
pub struct DrawPool {
    cards: Vec<Card>,
}

impl DrawPool {
    /// Create a pool holding `cards`.
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Remove a uniformly chosen card.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::EmptyPool`] when no cards remain. The pool is
    /// left untouched in that case.
    pub fn draw(&mut self, rng: &mut GameRng) -> Result<Card, ActionError> {
        if self.cards.is_empty() {
            return Err(ActionError::EmptyPool);
        }
        let idx = rng.index(self.cards.len());
        // pool order is irrelevant
        Ok(self.cards.swap_remove(idx))
    }

    /// Number of cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the pool is depleted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate the remaining cards.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
