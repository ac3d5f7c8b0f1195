//! Player ledger: resources, hand and placement counters.

use serde::{Deserialize, Serialize};

use crate::game::{Card, CardId};

/// Seat index of a player, in registration order.
pub type PlayerId = usize;

/// Starting resources of a player.
///
/// `food + collections + hand` must equal the configured budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Starting food.
    pub food: u32,
    /// Starting collection tokens.
    pub collections: u32,
    /// Cards dealt from the pool at setup.
    pub hand: u32,
}

impl Allocation {
    /// Create an allocation.
    #[must_use]
    pub const fn new(food: u32, collections: u32, hand: u32) -> Self {
        Self {
            food,
            collections,
            hand,
        }
    }

    /// Sum of all parts, or `None` if it overflows a `u32`.
    #[must_use]
    pub const fn total(&self) -> Option<u32> {
        match self.food.checked_add(self.collections) {
            Some(partial) => partial.checked_add(self.hand),
            None => None,
        }
    }

    /// Sum of all parts without overflow.
    #[must_use]
    pub fn exact_total(&self) -> u64 {
        u64::from(self.food) + u64::from(self.collections) + u64::from(self.hand)
    }
}

impl Default for Allocation {
    fn default() -> Self {
        Self::new(5, 2, 3)
    }
}

/// Registration data for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Display name.
    pub name: String,
    /// Starting resources.
    #[serde(default)]
    pub allocation: Allocation,
}

impl PlayerSetup {
    /// Register a player with the default allocation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allocation: Allocation::default(),
        }
    }

    /// Use a specific allocation.
    #[must_use]
    pub const fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocation = allocation;
        self
    }
}

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Seat index.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    score: u32,
    food: u32,
    collections: u32,
    hand: Vec<Card>,
    placed_per_terrain: Vec<u32>,
    cards_placed: u32,
}

impl Player {
    /// Create a player with an empty hand.
    ///
    /// `terrains` is the number of terrains on the board; one placement
    /// counter is kept per terrain.
    #[must_use]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        food: u32,
        collections: u32,
        terrains: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            food,
            collections,
            hand: Vec::new(),
            placed_per_terrain: vec![0; terrains],
            cards_placed: 0,
        }
    }

    /// Points from challenge bonuses.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Food on hand.
    #[must_use]
    pub const fn food(&self) -> u32 {
        self.food
    }

    /// Collection tokens.
    #[must_use]
    pub const fn collections(&self) -> u32 {
        self.collections
    }

    /// Cards held but not placed.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Number of cards in hand.
    #[must_use]
    pub fn unplaced(&self) -> u32 {
        u32::try_from(self.hand.len()).unwrap_or(u32::MAX)
    }

    /// Total cards placed on any terrain.
    #[must_use]
    pub const fn cards_placed(&self) -> u32 {
        self.cards_placed
    }

    /// Cards placed on terrain `index`; 0 for unknown terrains.
    #[must_use]
    pub fn placed_in(&self, index: usize) -> u32 {
        self.placed_per_terrain.get(index).copied().unwrap_or(0)
    }

    /// Placement counters, one per terrain.
    #[must_use]
    pub fn placed_per_terrain(&self) -> &[u32] {
        &self.placed_per_terrain
    }

    /// Look up a card in hand.
    #[must_use]
    pub fn card_in_hand(&self, card: CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == card)
    }

    pub(crate) fn add_food(&mut self, amount: u32) {
        self.food = self.food.saturating_add(amount);
    }

    pub(crate) fn add_collections(&mut self, amount: u32) {
        self.collections = self.collections.saturating_add(amount);
    }

    pub(crate) fn receive(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Take a card out of hand and pay for it.
    ///
    /// Callers verify ownership, terrain index and affordability first, so
    /// both lookups below succeed; `None` means nothing was changed.
    pub(crate) fn spend_for_placement(&mut self, card: CardId, terrain: usize) -> Option<Card> {
        let pos = self.hand.iter().position(|c| c.id == card)?;
        let cost = self.hand[pos].cost;
        let counter = self.placed_per_terrain.get_mut(terrain)?;
        let food = self.food.checked_sub(cost)?;

        *counter += 1;
        self.food = food;
        self.cards_placed += 1;
        Some(self.hand.remove(pos))
    }

    pub(crate) fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    #[cfg(test)]
    pub(crate) fn placed_per_terrain_mut(&mut self) -> &mut [u32] {
        &mut self.placed_per_terrain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CardKind;

    fn card(id: CardId, cost: u32) -> Card {
        Card::new(id, CardKind::Cat, format!("Cat #{id}"), cost)
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new(0, "Ada", 5, 2, 3);
        assert_eq!(player.score(), 0);
        assert_eq!(player.food(), 5);
        assert_eq!(player.collections(), 2);
        assert_eq!(player.unplaced(), 0);
        assert_eq!(player.placed_per_terrain(), &[0, 0, 0]);
    }

    #[test]
    fn test_allocation_total() {
        assert_eq!(Allocation::default().total(), Some(10));
        assert_eq!(Allocation::new(10, 0, 0).total(), Some(10));
        assert_eq!(Allocation::new(u32::MAX, 1, 0).total(), None);
        assert_eq!(Allocation::new(u32::MAX, 1, 0).exact_total(), 1 << 32);
    }

    #[test]
    fn test_spend_for_placement() {
        let mut player = Player::new(0, "Ada", 5, 0, 2);
        player.receive(card(7, 3));
        let placed = player.spend_for_placement(7, 1).unwrap();
        assert_eq!(placed.id, 7);
        assert_eq!(player.food(), 2);
        assert_eq!(player.cards_placed(), 1);
        assert_eq!(player.placed_in(1), 1);
        assert_eq!(player.unplaced(), 0);
    }

    #[test]
    fn test_spend_refuses_without_mutation() {
        let mut player = Player::new(0, "Ada", 1, 0, 2);
        player.receive(card(7, 3));
        let before = player.clone();

        // unaffordable
        assert!(player.spend_for_placement(7, 0).is_none());
        // unknown terrain
        assert!(player.spend_for_placement(7, 5).is_none());
        // unknown card
        assert!(player.spend_for_placement(8, 0).is_none());

        assert_eq!(player, before);
    }

    #[test]
    fn test_award_accumulates() {
        let mut player = Player::new(0, "Ada", 0, 0, 1);
        player.award(10);
        player.award(10);
        assert_eq!(player.score(), 20);
    }

    #[test]
    fn test_placed_in_unknown_terrain_is_zero() {
        let player = Player::new(0, "Ada", 0, 0, 1);
        assert_eq!(player.placed_in(9), 0);
    }
}
