//! Error types for the rules engine.
//!
//! [`ActionError`] is an ordinary, recoverable outcome: it is returned inside
//! an [`ActionResult`](crate::game::ActionResult) and never changes state.
//! [`SetupError`] aborts game construction before any round starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{CardId, RejectReason};

/// Why a submitted action was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ActionError {
    /// Unrecognized action kind or malformed parameters.
    #[error("invalid action: {0}")]
    InvalidAction(String),
    /// The card is not in the acting player's hand.
    #[error("card {0} is not in hand")]
    InvalidCardReference(CardId),
    /// No terrain with this index exists on the board.
    #[error("no terrain with index {0}")]
    InvalidTerrainIndex(usize),
    /// The player cannot pay for the action.
    #[error("insufficient food: need {required}, have {available}")]
    InsufficientResources {
        /// Food required by the card.
        required: u32,
        /// Food the player holds.
        available: u32,
    },
    /// The terrain refused the card.
    #[error("terrain {terrain} rejected the card: {reason}")]
    TerrainRejected {
        /// Target terrain index.
        terrain: usize,
        /// Capacity or requirement.
        reason: RejectReason,
    },
    /// The draw pool is depleted.
    #[error("the draw pool is empty")]
    EmptyPool,
    /// Another player is due to act.
    #[error("not this player's turn (player {expected} is to act)")]
    OutOfTurn {
        /// Seat of the player who is to act.
        expected: usize,
    },
    /// No player is registered at this seat.
    #[error("no player at seat {0}")]
    UnknownPlayer(usize),
    /// The game has reached its terminal state.
    #[error("the game is over")]
    GameOver,
}

/// Fatal configuration errors raised while building a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Fewer players than the game supports.
    #[error("too few players: {0} (minimum {min})", min = crate::game::MIN_PLAYERS)]
    TooFewPlayers(usize),
    /// More players than the game supports.
    #[error("too many players: {0} (maximum {max})", max = crate::game::MAX_PLAYERS)]
    TooManyPlayers(usize),
    /// A starting allocation does not sum to the budget.
    #[error("starting allocation for {player} sums to {total}, expected {budget}")]
    AllocationMismatch {
        /// Player name.
        player: String,
        /// Sum of food, collections and hand size.
        total: u64,
        /// Configured budget.
        budget: u32,
    },
    /// The game must have at least one round.
    #[error("at least one round is required")]
    NoRounds,
    /// More rounds than distinct challenge kinds.
    #[error("{rounds} rounds configured but only {available} challenge kinds exist")]
    QueueUnderflow {
        /// Configured rounds.
        rounds: u32,
        /// Challenge kinds available for this board.
        available: usize,
    },
    /// The board has no terrains.
    #[error("the board needs at least one terrain")]
    NoTerrains,
    /// A terrain was configured with zero capacity.
    #[error("terrain {terrain} has zero capacity")]
    ZeroCapacity {
        /// Terrain index.
        terrain: usize,
    },
    /// Not enough cards to deal the starting hands.
    #[error("starting hands need {needed} cards but the pool holds {available}")]
    PoolTooSmall {
        /// Cards needed for all starting hands.
        needed: usize,
        /// Cards in the catalog.
        available: usize,
    },
}
