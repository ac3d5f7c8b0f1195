// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Catgame: a deterministic rules engine for a turn-based card and resource
//! game.
//!
//! Players spend food to place cat cards onto capacity-limited terrains,
//! collect resources, and draw from a shared pool, competing for a per-round
//! challenge bonus. The engine provides:
//! - Seeded, reproducible games (one injected RNG)
//! - Validation of every action before any state changes
//! - A passive state machine driven from outside
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / Session (input + output)    │
//! ├─────────────────────────────────────┤
//! │   Engine (rounds, challenges)       │
//! ├─────────────────────────────────────┤
//! │   Rules (pool, terrain, player)     │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod replay;
pub mod rng;
pub mod session;

pub use error::{ActionError, SetupError};

// Re-export key game types at crate root for convenience
pub use game::{
    Action, ActionResult, GameConfig, GameEngine, GameEvent, GameResult, PlayerId, PlayerSetup,
    PublicState,
};
pub use replay::{Recording, ReplayError, replay};
pub use rng::GameRng;
pub use session::{InputProvider, OutputSink, Session, SessionError, SessionLimits};
