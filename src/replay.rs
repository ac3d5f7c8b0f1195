//! Game recording and replay.
//!
//! Games are fully deterministic, so a recording only needs:
//! - `seed: u64` - the seed the engine was built with
//! - `config` and `players` - everything else passed to [`GameEngine::new`]
//! - `actions` - the accepted actions in the order they were applied
//!
//! Refused submissions never change the game and are not recorded. To view
//! the game after action N, rebuild it and resubmit the first N actions.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write as _};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{ActionError, SetupError};
use crate::game::{Action, GameConfig, GameEngine, GameResult, PlayerId, PlayerSetup};

/// One accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAction {
    /// Seat that acted.
    pub seat: PlayerId,
    /// What it did.
    pub action: Action,
}

/// Everything needed to play a game again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Seed the engine was built with.
    pub seed: u64,
    /// Game configuration.
    pub config: GameConfig,
    /// Player registrations in seat order.
    pub players: Vec<PlayerSetup>,
    /// Accepted actions in order.
    #[serde(default)]
    pub actions: Vec<RecordedAction>,
}

impl Recording {
    /// Create a recording with no actions yet.
    #[must_use]
    pub const fn new(seed: u64, config: GameConfig, players: Vec<PlayerSetup>) -> Self {
        Self {
            seed,
            config,
            players,
            actions: Vec::new(),
        }
    }

    /// Append an accepted action.
    pub fn push(&mut self, seat: PlayerId, action: Action) {
        self.actions.push(RecordedAction { seat, action });
    }

    /// Save as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Load a recording written by [`Recording::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Build a fresh engine at the start of this game.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored setup is not a valid game.
    pub fn start(&self) -> Result<GameEngine, ReplayError> {
        Ok(GameEngine::new(
            self.seed,
            self.config.clone(),
            self.players.clone(),
        )?)
    }
}

/// Error type for replay operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading or writing the recording failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The recording is not valid JSON for this format.
    #[error("malformed recording: {0}")]
    Json(#[from] serde_json::Error),
    /// The stored configuration cannot build a game.
    #[error("invalid game setup: {0}")]
    Setup(#[from] SetupError),
    /// A recorded action was refused on replay.
    #[error("recorded action {index} was refused: {error}")]
    Diverged {
        /// Position of the action in the recording.
        index: usize,
        /// Why the engine refused it.
        error: ActionError,
    },
    /// The recording ends before the game does.
    #[error("recording ends after {applied} actions without finishing the game")]
    Incomplete {
        /// Actions replayed.
        applied: usize,
    },
    /// Position outside the recording.
    #[error("position {requested} out of range (recording has {len} actions)")]
    OutOfRange {
        /// Requested position.
        requested: usize,
        /// Number of recorded actions.
        len: usize,
    },
}

/// Steps through a recording.
///
/// Moving backward rebuilds the game from the seed and replays up to the
/// target position.
#[derive(Debug, Clone)]
pub struct Replayer {
    recording: Recording,
    engine: GameEngine,
    position: usize,
}

impl Replayer {
    /// Start at position 0, before any action.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded setup is invalid.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        let engine = recording.start()?;
        Ok(Self {
            recording,
            engine,
            position: 0,
        })
    }

    /// The recording being replayed.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Game state after `position()` actions.
    #[must_use]
    pub const fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Number of actions applied so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Whether every recorded action has been applied.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position >= self.recording.actions.len()
    }

    /// Apply the next recorded action.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::OutOfRange`] at the end of the recording, or
    /// [`ReplayError::Diverged`] if the engine refuses the action.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        let index = self.position;
        let Some(recorded) = self.recording.actions.get(index) else {
            return Err(ReplayError::OutOfRange {
                requested: index + 1,
                len: self.recording.actions.len(),
            });
        };

        let result = self
            .engine
            .submit_action(recorded.seat, recorded.action);
        if let Err(error) = result.outcome {
            warn!(index, seat = recorded.seat, %error, "recording diverged");
            return Err(ReplayError::Diverged { index, error });
        }
        self.position += 1;
        Ok(())
    }

    /// Move to the state after `target` actions.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is past the end of the recording or an
    /// action along the way is refused.
    pub fn seek(&mut self, target: usize) -> Result<(), ReplayError> {
        let len = self.recording.actions.len();
        if target > len {
            return Err(ReplayError::OutOfRange {
                requested: target,
                len,
            });
        }
        if target < self.position {
            debug!(from = self.position, to = target, "rewinding replay");
            self.engine = self.recording.start()?;
            self.position = 0;
        }
        while self.position < target {
            self.step_forward()?;
        }
        Ok(())
    }

    /// Apply every remaining action and return the final result.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Diverged`] on a refused action and
    /// [`ReplayError::Incomplete`] if the game has not ended afterwards.
    pub fn finish(mut self) -> Result<GameResult, ReplayError> {
        while !self.at_end() {
            self.step_forward()?;
        }
        self.engine.result().ok_or(ReplayError::Incomplete {
            applied: self.position,
        })
    }
}

/// Replay a whole recording and return its result.
///
/// # Errors
///
/// See [`Replayer::new`] and [`Replayer::finish`].
pub fn replay(recording: &Recording) -> Result<GameResult, ReplayError> {
    Replayer::new(recording.clone())?.finish()
}
