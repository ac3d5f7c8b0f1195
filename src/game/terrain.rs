//! Terrains and the board.
//!
//! A terrain is a bounded slot for cards. Whether it takes a given card
//! depends on its occupancy and on the board-wide [`RequirementRule`], read
//! against the terrain's own threshold. One rule governs the whole board so
//! requirement semantics never mix within a game.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::game::{Card, PlayerId};

/// How a terrain's threshold is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementRule {
    /// Thresholds are ignored; only capacity applies.
    Open,
    /// A card is accepted only if its food cost is at most the threshold.
    #[default]
    FoodCostCeiling,
    /// A card is accepted only if the placer holds at least `threshold`
    /// collections.
    CollectionGate,
}

/// Why a terrain refused a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Occupancy has reached capacity.
    Full,
    /// The card or the placer does not meet the threshold.
    RequirementUnmet,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "terrain is full"),
            Self::RequirementUnmet => write!(f, "requirement not met"),
        }
    }
}

/// Setup parameters for a single terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Maximum number of cards.
    pub capacity: u32,
    /// Optional requirement value, read according to the board rule.
    #[serde(default)]
    pub threshold: Option<u32>,
}

/// Setup parameters for the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Board-wide requirement rule.
    pub rule: RequirementRule,
    /// Terrains in index order.
    pub terrains: Vec<TerrainConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rule: RequirementRule::FoodCostCeiling,
            terrains: vec![
                TerrainConfig {
                    capacity: 4,
                    threshold: Some(1),
                },
                TerrainConfig {
                    capacity: 6,
                    threshold: Some(3),
                },
                TerrainConfig {
                    capacity: 8,
                    threshold: None,
                },
            ],
        }
    }
}

/// A placement zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terrain {
    /// Position on the board.
    pub index: usize,
    /// Maximum number of cards.
    pub capacity: u32,
    /// Requirement value, if any.
    pub threshold: Option<u32>,
    placed: Vec<Card>,
    /// Placer of each card, parallel to `placed`.
    owners: Vec<PlayerId>,
}

impl Terrain {
    /// Create an empty terrain.
    #[must_use]
    pub fn new(index: usize, capacity: u32, threshold: Option<u32>) -> Self {
        Self {
            index,
            capacity,
            threshold,
            placed: Vec::new(),
            owners: Vec::new(),
        }
    }

    /// Number of cards placed here.
    #[must_use]
    pub fn occupancy(&self) -> usize {
        self.placed.len()
    }

    /// Whether no more cards fit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.placed.len() >= self.capacity as usize
    }

    /// Cards placed here, in placement order.
    #[must_use]
    pub fn placed(&self) -> &[Card] {
        &self.placed
    }

    /// Who placed each card, parallel to [`Terrain::placed`].
    #[must_use]
    pub fn owners(&self) -> &[PlayerId] {
        &self.owners
    }

    /// Number of cards placed here by `player`.
    #[must_use]
    pub fn placed_by(&self, player: PlayerId) -> usize {
        self.owners.iter().filter(|&&owner| owner == player).count()
    }

    /// Check whether `card` may be placed here by a player holding
    /// `collections`.
    ///
    /// # Errors
    ///
    /// Returns the reason the card is refused.
    pub fn check(
        &self,
        rule: RequirementRule,
        card: &Card,
        collections: u32,
    ) -> Result<(), RejectReason> {
        if self.is_full() {
            return Err(RejectReason::Full);
        }
        let Some(threshold) = self.threshold else {
            return Ok(());
        };
        let met = match rule {
            RequirementRule::Open => true,
            RequirementRule::FoodCostCeiling => card.cost <= threshold,
            RequirementRule::CollectionGate => collections >= threshold,
        };
        if met {
            Ok(())
        } else {
            Err(RejectReason::RequirementUnmet)
        }
    }

    /// Whether `card` may be placed here.
    #[must_use]
    pub fn accepts(&self, rule: RequirementRule, card: &Card, collections: u32) -> bool {
        self.check(rule, card, collections).is_ok()
    }

    /// Place a card on behalf of `owner`.
    ///
    /// # Panics
    ///
    /// Panics if the terrain does not accept the card. Callers must check
    /// [`Terrain::accepts`] first.
    pub fn place(
        &mut self,
        rule: RequirementRule,
        card: Card,
        collections: u32,
        owner: PlayerId,
    ) {
        assert!(
            self.accepts(rule, &card, collections),
            "terrain {} cannot take card {} (occupancy {}/{})",
            self.index,
            card.id,
            self.occupancy(),
            self.capacity
        );
        self.placed.push(card);
        self.owners.push(owner);
    }
}

/// All terrains of a game under one requirement rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rule: RequirementRule,
    terrains: Vec<Terrain>,
}

impl Board {
    /// Build a board from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no terrains or any terrain has zero
    /// capacity.
    pub fn from_config(config: &BoardConfig) -> Result<Self, SetupError> {
        if config.terrains.is_empty() {
            return Err(SetupError::NoTerrains);
        }
        let mut terrains = Vec::with_capacity(config.terrains.len());
        for (index, tc) in config.terrains.iter().enumerate() {
            if tc.capacity == 0 {
                return Err(SetupError::ZeroCapacity { terrain: index });
            }
            terrains.push(Terrain::new(index, tc.capacity, tc.threshold));
        }
        Ok(Self {
            rule: config.rule,
            terrains,
        })
    }

    /// The board-wide requirement rule.
    #[must_use]
    pub const fn rule(&self) -> RequirementRule {
        self.rule
    }

    /// Number of terrains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terrains.len()
    }

    /// Whether the board has no terrains. Never true for a built board.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terrains.is_empty()
    }

    /// Get a terrain by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Terrain> {
        self.terrains.get(index)
    }

    /// Get a mutable terrain by index.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Terrain> {
        self.terrains.get_mut(index)
    }

    /// Iterate terrains in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Terrain> {
        self.terrains.iter()
    }
}
