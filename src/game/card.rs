//! Cards and the card catalog.

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;

/// Unique identifier for a card within one game.
pub type CardId = u32;

/// Which deck a card was printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Regular cat card with a rolled food cost.
    Cat,
    /// Bonus card; always free to place.
    Bonus,
}

/// A single card. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Identifier, unique within the game.
    pub id: CardId,
    /// Deck the card belongs to.
    pub kind: CardKind,
    /// Display name.
    pub name: String,
    /// Food needed to place the card.
    pub cost: u32,
}

impl Card {
    /// Create a card.
    #[must_use]
    pub fn new(id: CardId, kind: CardKind, name: impl Into<String>, cost: u32) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            cost,
        }
    }
}

/// Deck composition for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Number of cat cards.
    pub cat_cards: u32,
    /// Number of bonus cards.
    pub bonus_cards: u32,
    /// Highest food cost a cat card can roll.
    pub max_cat_cost: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cat_cards: 52,
            bonus_cards: 24,
            max_cat_cost: 4,
        }
    }
}

impl CatalogConfig {
    /// Total number of cards in the catalog.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.cat_cards as usize + self.bonus_cards as usize
    }

    /// Build the full catalog, rolling cat card costs from `rng`.
    ///
    /// Ids are assigned sequentially from 1, cat cards first.
    #[must_use]
    pub fn build(&self, rng: &mut GameRng) -> Vec<Card> {
        let mut cards = Vec::with_capacity(self.total());
        let mut next_id: CardId = 1;

        for n in 1..=self.cat_cards {
            let cost = rng.range_inclusive(0, self.max_cat_cost);
            cards.push(Card::new(next_id, CardKind::Cat, format!("Cat #{n}"), cost));
            next_id += 1;
        }
        for n in 1..=self.bonus_cards {
            cards.push(Card::new(next_id, CardKind::Bonus, format!("Bonus #{n}"), 0));
            next_id += 1;
        }

        cards
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_catalog_size() {
        let config = CatalogConfig::default();
        assert_eq!(config.total(), 76);
        let cards = config.build(&mut GameRng::new(1));
        assert_eq!(cards.len(), 76);
    }

    #[test]
    fn test_ids_are_unique() {
        let cards = CatalogConfig::default().build(&mut GameRng::new(3));
        let ids: HashSet<_> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), cards.len());
    }

    #[test]
    fn test_costs_within_bounds() {
        let config = CatalogConfig {
            cat_cards: 200,
            bonus_cards: 10,
            max_cat_cost: 3,
        };
        for card in config.build(&mut GameRng::new(9)) {
            match card.kind {
                CardKind::Cat => assert!(card.cost <= 3),
                CardKind::Bonus => assert_eq!(card.cost, 0),
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = CatalogConfig::default();
        let a = config.build(&mut GameRng::new(42));
        let b = config.build(&mut GameRng::new(42));
        assert_eq!(a, b);
    }
}
