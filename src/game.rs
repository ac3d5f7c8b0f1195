//! Game layer.
//!
//! Implements the rules engine:
//! - Card catalog and draw pool (depletion without replacement)
//! - Terrains bounded by capacity and one board-wide requirement rule
//! - Player ledger and the four actions
//! - Challenge queue and per-round evaluation
//! - Round scheduling, final scoring and public snapshots

mod action;
mod card;
mod challenge;
mod config;
mod engine;
mod invariants;
mod player;
mod pool;
mod state;
mod terrain;

pub use action::{Action, ActionContext, ActionOutcome, resolve};
pub use card::{Card, CardId, CardKind, CatalogConfig};
pub use challenge::{ChallengeKind, ChallengeQueue, ChallengeResolution, award, evaluate};
pub use config::{GameConfig, RuleConfig};
pub use engine::{GameEngine, MAX_PLAYERS, MIN_PLAYERS};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use player::{Allocation, Player, PlayerId, PlayerSetup};
pub use pool::DrawPool;
pub use state::{
    ActionResult, GameEvent, GameResult, Phase, PlayerSummary, PlayerView, PublicState,
    StateDelta, TerrainView, TurnCursor, select_winner,
};
pub use terrain::{Board, BoardConfig, RejectReason, RequirementRule, Terrain, TerrainConfig};
