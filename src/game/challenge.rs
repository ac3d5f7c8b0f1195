//! Challenges: per-round scoring rules keyed to a player metric.
//!
//! The queue is permuted once at setup and consumed one kind per round.
//! Evaluation is stateless: it only reads the players as they stand when the
//! round ends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Player, PlayerId};
use crate::rng::GameRng;

/// A challenge kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "terrain", rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Most collection tokens.
    MostCollections,
    /// Most food.
    MostFood,
    /// Most cards placed across all terrains.
    MostCardsPlaced,
    /// Most cards placed on the given terrain.
    MostCardsInTerrain(usize),
    /// Most cards still in hand.
    MostUnplacedCards,
}

impl ChallengeKind {
    /// Every challenge kind available on a board with `terrains` terrains.
    #[must_use]
    pub fn catalog(terrains: usize) -> Vec<Self> {
        let mut kinds = vec![Self::MostCollections, Self::MostFood, Self::MostCardsPlaced];
        kinds.extend((0..terrains).map(Self::MostCardsInTerrain));
        kinds.push(Self::MostUnplacedCards);
        kinds
    }

    /// The metric this challenge compares.
    #[must_use]
    pub fn metric(self, player: &Player) -> u32 {
        match self {
            Self::MostCollections => player.collections(),
            Self::MostFood => player.food(),
            Self::MostCardsPlaced => player.cards_placed(),
            Self::MostCardsInTerrain(index) => player.placed_in(index),
            Self::MostUnplacedCards => player.unplaced(),
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MostCollections => write!(f, "Most Collections"),
            Self::MostFood => write!(f, "Most Food"),
            Self::MostCardsPlaced => write!(f, "Most Cards Placed"),
            Self::MostCardsInTerrain(index) => write!(f, "Most Cards in Terrain {index}"),
            Self::MostUnplacedCards => write!(f, "Most Unplaced Cards"),
        }
    }
}

/// Challenge kinds in draw order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeQueue {
    order: Vec<ChallengeKind>,
}

impl ChallengeQueue {
    /// Permute `kinds` into a draw order.
    #[must_use]
    pub fn new(mut kinds: Vec<ChallengeKind>, rng: &mut GameRng) -> Self {
        rng.shuffle(&mut kinds);
        Self { order: kinds }
    }

    /// Take the next challenge, or `None` once every kind has been used.
    pub fn pop(&mut self) -> Option<ChallengeKind> {
        self.order.pop()
    }

    /// Kinds not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.order.len()
    }
}

/// Outcome of one round's challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResolution {
    /// Round the challenge closed.
    pub round: u32,
    /// Challenge evaluated.
    pub kind: ChallengeKind,
    /// Unique best player, if any.
    pub winner: Option<PlayerId>,
    /// Highest metric value seen.
    pub best: u32,
    /// Points awarded (0 when nobody won).
    pub bonus: u32,
}

/// Find the unique player with the highest metric for `kind`.
///
/// Nobody wins when the best value is zero or when two or more players
/// share it.
#[must_use]
pub fn evaluate(kind: ChallengeKind, players: &[Player]) -> Option<PlayerId> {
    let (winner, _) = leader(kind, players)?;
    winner
}

/// Best metric value and its unique holder.
///
/// Returns `None` for an empty player list.
fn leader(kind: ChallengeKind, players: &[Player]) -> Option<(Option<PlayerId>, u32)> {
    let best = players.iter().map(|p| kind.metric(p)).max()?;
    if best == 0 {
        return Some((None, 0));
    }
    let mut holders = players.iter().filter(|p| kind.metric(p) == best);
    let first = holders.next().map(|p| p.id);
    if holders.next().is_some() {
        return Some((None, best));
    }
    Some((first, best))
}

/// Evaluate `kind`, award `bonus` to the unique winner and report the result.
pub fn award(
    kind: ChallengeKind,
    round: u32,
    players: &mut [Player],
    bonus: u32,
) -> ChallengeResolution {
    let (winner, best) = leader(kind, players).unwrap_or((None, 0));
    let mut awarded = 0;
    if let Some(player) = winner.and_then(|id| players.iter_mut().find(|p| p.id == id)) {
        player.award(bonus);
        awarded = bonus;
    }
    ChallengeResolution {
        round,
        kind,
        winner,
        best,
        bonus: awarded,
    }
}
