//! Read-only views of a game: snapshots, deltas, events and results.
//!
//! None of these types hold references into the engine; they are plain
//! serializable values an output sink or outer layer can keep.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::game::{
    Action, ActionOutcome, Card, ChallengeKind, ChallengeResolution, Player, PlayerId,
    RequirementRule, Terrain,
};

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Building the pool, board, queue and players.
    Setup,
    /// Rounds are being played.
    Round,
    /// Computing the winner after the last round.
    FinalScoring,
    /// The game is over; the result is available.
    Terminal,
}

/// Where the game stands within the round structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCursor {
    /// Current round (1-indexed).
    pub round: u32,
    /// Current step within the round (1-indexed).
    pub step: u32,
    /// Steps in the current round.
    pub steps_in_round: u32,
    /// Seat of the player to act.
    pub seat: PlayerId,
}

/// Public view of a terrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainView {
    /// Terrain index.
    pub index: usize,
    /// Maximum number of cards.
    pub capacity: u32,
    /// Requirement value, if any.
    pub threshold: Option<u32>,
    /// Cards placed so far.
    pub occupancy: usize,
    /// Placed cards in placement order.
    pub cards: Vec<Card>,
    /// Seat that placed each card.
    pub owners: Vec<PlayerId>,
}

impl From<&Terrain> for TerrainView {
    fn from(terrain: &Terrain) -> Self {
        Self {
            index: terrain.index,
            capacity: terrain.capacity,
            threshold: terrain.threshold,
            occupancy: terrain.occupancy(),
            cards: terrain.placed().to_vec(),
            owners: terrain.owners().to_vec(),
        }
    }
}

/// Publicly visible player stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Seat index.
    pub seat: PlayerId,
    /// Display name.
    pub name: String,
    /// Challenge points.
    pub score: u32,
    /// Food.
    pub food: u32,
    /// Collection tokens.
    pub collections: u32,
    /// Cards placed in total.
    pub cards_placed: u32,
    /// Cards placed per terrain.
    pub placed_per_terrain: Vec<u32>,
    /// Cards in hand.
    pub unplaced: u32,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            seat: player.id,
            name: player.name.clone(),
            score: player.score(),
            food: player.food(),
            collections: player.collections(),
            cards_placed: player.cards_placed(),
            placed_per_terrain: player.placed_per_terrain().to_vec(),
            unplaced: player.unplaced(),
        }
    }
}

/// Snapshot of everything an output sink may show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Configured number of rounds.
    pub total_rounds: u32,
    /// Round, step and seat to act.
    pub cursor: TurnCursor,
    /// Challenge of the current round (`None` once the game is over).
    pub challenge: Option<ChallengeKind>,
    /// Cards left in the draw pool.
    pub pool_size: usize,
    /// Board-wide requirement rule.
    pub rule: RequirementRule,
    /// Terrains in index order.
    pub terrains: Vec<TerrainView>,
    /// Players in seat order.
    pub players: Vec<PlayerView>,
    /// Hand of the player to act (empty once the game is over).
    pub acting_hand: Vec<Card>,
    /// Challenges resolved so far.
    pub history: Vec<ChallengeResolution>,
}

/// What changed as a result of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDelta {
    /// Acting player's stats after the submission.
    pub player: Option<PlayerView>,
    /// Terrain touched by a placement.
    pub terrain: Option<TerrainView>,
    /// Cards left in the pool.
    pub pool_size: usize,
    /// Cursor after the submission.
    pub cursor: TurnCursor,
    /// Phase after the submission.
    pub phase: Phase,
    /// Challenge resolved because this submission ended a round.
    pub resolved: Option<ChallengeResolution>,
}

/// Result of [`GameEngine::submit_action`](crate::game::GameEngine::submit_action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// What the action did, or why it was refused.
    pub outcome: Result<ActionOutcome, ActionError>,
    /// Public changes.
    pub delta: StateDelta,
}

impl ActionResult {
    /// Whether the action was applied.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Why the action was refused, if it was.
    #[must_use]
    pub fn reason(&self) -> Option<&ActionError> {
        self.outcome.as_ref().err()
    }
}

/// Notification for an output sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A round began.
    RoundStarted {
        /// Round number.
        round: u32,
        /// Steps in the round.
        steps: u32,
        /// Challenge for the round.
        challenge: ChallengeKind,
    },
    /// An action was applied.
    ActionApplied {
        /// Acting seat.
        seat: PlayerId,
        /// Action taken.
        action: Action,
        /// What it did.
        outcome: ActionOutcome,
    },
    /// An action was refused.
    ActionRejected {
        /// Submitting seat.
        seat: PlayerId,
        /// Action submitted.
        action: Action,
        /// Why it was refused.
        error: ActionError,
    },
    /// A round's challenge was scored.
    ChallengeResolved(ChallengeResolution),
    /// The game ended.
    GameFinished {
        /// Winning seat.
        winner: PlayerId,
        /// Final scores in seat order.
        scores: Vec<u32>,
    },
}

/// Final per-player numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// Seat index.
    pub seat: PlayerId,
    /// Display name.
    pub name: String,
    /// Final score.
    pub score: u32,
    /// Challenges won.
    pub challenges_won: u32,
    /// Cards placed.
    pub cards_placed: u32,
    /// Cards left in hand.
    pub unplaced: u32,
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Seed the game was played with.
    pub seed: u64,
    /// Winning seat.
    pub winner: PlayerId,
    /// Final scores in seat order.
    pub scores: Vec<u32>,
    /// Rounds played.
    pub rounds_played: u32,
    /// Every challenge in the order it was resolved.
    pub challenges: Vec<ChallengeResolution>,
    /// Per-player summary in seat order.
    pub players: Vec<PlayerSummary>,
}

/// Pick the winner: highest score, ties going to the earliest seat.
///
/// Returns `None` only for an empty score list.
#[must_use]
pub fn select_winner(scores: &[u32]) -> Option<PlayerId> {
    let mut best: Option<(PlayerId, u32)> = None;
    for (seat, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((seat, score)),
        }
    }
    best.map(|(seat, _)| seat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_winner_tie_goes_to_first_registered() {
        assert_eq!(select_winner(&[30, 30, 20]), Some(0));
        assert_eq!(select_winner(&[20, 30, 30]), Some(1));
    }

    #[test]
    fn test_select_winner_unique_max() {
        assert_eq!(select_winner(&[0, 10, 40, 30]), Some(2));
    }

    #[test]
    fn test_select_winner_all_zero() {
        assert_eq!(select_winner(&[0, 0]), Some(0));
    }

    #[test]
    fn test_select_winner_empty() {
        assert_eq!(select_winner(&[]), None);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = GameEvent::GameFinished {
            winner: 1,
            scores: vec![0, 10],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"game_finished\""));
    }
}
