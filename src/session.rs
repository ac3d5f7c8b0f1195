//! Session driver connecting input providers and an output sink to a game.
//!
//! The engine never waits for input. A session owns one provider per seat,
//! asks the provider of whichever seat is due for an action, submits it and
//! forwards the resulting events to a sink. When an action is refused the
//! provider is asked again with the reason; how often that may happen per
//! turn is bounded by [`SessionLimits`].

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::error::ActionError;
use crate::game::{Action, GameEngine, GameEvent, GameResult, PlayerId, PublicState};
use crate::replay::{RecordedAction, Recording};

/// Source of actions for one seat.
pub trait InputProvider {
    /// Choose the next action for `seat`.
    ///
    /// `rejected` carries the reason the previous choice for this turn was
    /// refused. Returning `None` abandons the game.
    fn next_action(
        &mut self,
        state: &PublicState,
        seat: PlayerId,
        rejected: Option<&ActionError>,
    ) -> Option<Action>;
}

/// Receiver of game notifications.
pub trait OutputSink {
    /// Handle one event.
    fn notify(&mut self, event: &GameEvent);
}

/// Bounds on provider behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Refused actions tolerated within one turn before the session stops.
    pub max_rejections_per_turn: u32,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_rejections_per_turn: 16,
        }
    }
}

/// Error type for session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// One provider per player is required.
    #[error("{providers} input providers for {players} players")]
    ProviderMismatch {
        /// Providers supplied.
        providers: usize,
        /// Players registered.
        players: usize,
    },
    /// A provider gave up.
    #[error("player {seat} abandoned the game")]
    Aborted {
        /// Seat whose provider returned no action.
        seat: PlayerId,
    },
    /// A provider kept submitting refused actions.
    #[error("player {seat} had {rejections} actions refused in one turn (last: {last})")]
    TooManyRejections {
        /// Offending seat.
        seat: PlayerId,
        /// Refusals in the turn.
        rejections: u32,
        /// Reason for the last refusal.
        last: ActionError,
    },
}

/// A game wired to its providers.
pub struct Session<'a> {
    engine: GameEngine,
    providers: Vec<Box<dyn InputProvider + 'a>>,
    limits: SessionLimits,
    log: Vec<RecordedAction>,
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("providers", &self.providers.len())
            .field("limits", &self.limits)
            .field("log", &self.log.len())
            .finish()
    }
}

impl<'a> Session<'a> {
    /// Wire `providers` (in seat order) to `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ProviderMismatch`] unless there is exactly one
    /// provider per player.
    pub fn new(
        engine: GameEngine,
        providers: Vec<Box<dyn InputProvider + 'a>>,
        limits: SessionLimits,
    ) -> Result<Self, SessionError> {
        let players = engine.players().len();
        if providers.len() != players {
            return Err(SessionError::ProviderMismatch {
                providers: providers.len(),
                players,
            });
        }
        Ok(Self {
            engine,
            providers,
            limits,
            log: Vec::new(),
        })
    }

    /// Play until the game ends.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider abandons the game or exceeds the
    /// rejection limit. The engine and the accepted-action log stay
    /// available for inspection.
    pub fn run(&mut self, sink: &mut dyn OutputSink) -> Result<GameResult, SessionError> {
        self.flush(sink);
        while let Some(seat) = self.engine.seat_to_act() {
            self.play_turn(seat, sink)?;
        }
        self.flush(sink);

        match self.engine.result() {
            Some(result) => Ok(result),
            None => unreachable!("no seat to act but the game has no result"),
        }
    }

    /// Ask `seat` for actions until one is accepted.
    fn play_turn(&mut self, seat: PlayerId, sink: &mut dyn OutputSink) -> Result<(), SessionError> {
        let mut rejected: Option<ActionError> = None;
        let mut rejections = 0;

        loop {
            let state = self.engine.public_state();
            let action = self.providers[seat]
                .next_action(&state, seat, rejected.as_ref())
                .ok_or(SessionError::Aborted { seat })?;

            let result = self.engine.submit_action(seat, action);
            self.flush(sink);

            match result.outcome {
                Ok(_) => {
                    self.log.push(RecordedAction { seat, action });
                    return Ok(());
                }
                Err(error) => {
                    rejections += 1;
                    warn!(seat, %action, %error, rejections, "action refused");
                    if rejections >= self.limits.max_rejections_per_turn {
                        return Err(SessionError::TooManyRejections {
                            seat,
                            rejections,
                            last: error,
                        });
                    }
                    rejected = Some(error);
                }
            }
        }
    }

    fn flush(&mut self, sink: &mut dyn OutputSink) {
        for event in self.engine.drain_events() {
            sink.notify(&event);
        }
    }

    /// The game being played.
    #[must_use]
    pub const fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Actions accepted so far, in order.
    #[must_use]
    pub fn log(&self) -> &[RecordedAction] {
        &self.log
    }

    /// Recording of the game so far.
    #[must_use]
    pub fn recording(&self) -> Recording {
        Recording {
            seed: self.engine.seed(),
            config: self.engine.config().clone(),
            players: self.engine.setups().to_vec(),
            actions: self.log.clone(),
        }
    }

    /// Give back the engine.
    #[must_use]
    pub fn into_engine(self) -> GameEngine {
        self.engine
    }
}

/// Drive `engine` to the end with one provider per seat.
///
/// Convenience wrapper around [`Session`] for callers that only need the
/// result.
///
/// # Errors
///
/// See [`Session::new`] and [`Session::run`].
pub fn run_session<'a>(
    engine: GameEngine,
    providers: Vec<Box<dyn InputProvider + 'a>>,
    sink: &mut dyn OutputSink,
    limits: SessionLimits,
) -> Result<GameResult, SessionError> {
    Session::new(engine, providers, limits)?.run(sink)
}

/// Provider that plays a fixed list of actions.
///
/// Once the script runs out the fallback action is used; without a
/// fallback the provider abandons the game.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    script: VecDeque<Action>,
    fallback: Option<Action>,
}

impl ScriptedProvider {
    /// Play `script` in order, then stop.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Action>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: None,
        }
    }

    /// Play the same action every turn.
    #[must_use]
    pub fn repeating(action: Action) -> Self {
        Self::new([]).with_fallback(action)
    }

    /// Use `action` once the script is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, action: Action) -> Self {
        self.fallback = Some(action);
        self
    }

    /// Actions left in the script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputProvider for ScriptedProvider {
    fn next_action(
        &mut self,
        _state: &PublicState,
        _seat: PlayerId,
        _rejected: Option<&ActionError>,
    ) -> Option<Action> {
        self.script.pop_front().or(self.fallback)
    }
}

/// Sink that keeps every event.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    /// Events in arrival order.
    pub events: Vec<GameEvent>,
}

impl OutputSink for EventLog {
    fn notify(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn notify(&mut self, _event: &GameEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, PlayerSetup};

    fn engine() -> GameEngine {
        GameEngine::new(
            21,
            GameConfig::default(),
            vec![PlayerSetup::new("Ada"), PlayerSetup::new("Bo")],
        )
        .unwrap()
    }

    fn boxed(p: ScriptedProvider) -> Box<dyn InputProvider> {
        Box::new(p)
    }

    #[test]
    fn test_provider_count_must_match() {
        let err = Session::new(
            engine(),
            vec![boxed(ScriptedProvider::repeating(Action::CollectFood))],
            SessionLimits::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SessionError::ProviderMismatch {
                providers: 1,
                players: 2
            }
        );
    }

    #[test]
    fn test_full_session_collects_events() {
        let providers = vec![
            boxed(ScriptedProvider::repeating(Action::CollectFood)),
            boxed(ScriptedProvider::repeating(Action::CollectStuff)),
        ];
        let mut session = Session::new(engine(), providers, SessionLimits::default()).unwrap();
        let mut sink = EventLog::default();

        let result = session.run(&mut sink).unwrap();

        assert_eq!(session.log().len(), 2 * (8 + 7 + 6 + 5));
        assert_eq!(result.rounds_played, 4);
        let rounds_started = sink
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundStarted { .. }))
            .count();
        assert_eq!(rounds_started, 4);
        assert!(matches!(
            sink.events.last(),
            Some(GameEvent::GameFinished { .. })
        ));
    }

    #[test]
    fn test_rejected_action_is_retried() {
        let providers = vec![
            boxed(
                ScriptedProvider::new([Action::PlaceCard {
                    card: 9999,
                    terrain: 0,
                }])
                .with_fallback(Action::CollectFood),
            ),
            boxed(ScriptedProvider::repeating(Action::CollectFood)),
        ];
        let mut session = Session::new(engine(), providers, SessionLimits::default()).unwrap();
        let mut sink = EventLog::default();
        session.run(&mut sink).unwrap();

        assert!(sink.events.iter().any(|e| matches!(
            e,
            GameEvent::ActionRejected {
                seat: 0,
                error: ActionError::InvalidCardReference(9999),
                ..
            }
        )));
        // the refused placement never reaches the log
        assert!(
            session
                .log()
                .iter()
                .all(|r| !matches!(r.action, Action::PlaceCard { .. }))
        );
    }

    #[test]
    fn test_rejection_limit() {
        let providers = vec![
            boxed(ScriptedProvider::repeating(Action::PlaceCard {
                card: 9999,
                terrain: 0,
            })),
            boxed(ScriptedProvider::repeating(Action::CollectFood)),
        ];
        let limits = SessionLimits {
            max_rejections_per_turn: 3,
        };
        let mut session = Session::new(engine(), providers, limits).unwrap();
        let err = session.run(&mut NullSink).unwrap_err();
        assert_eq!(
            err,
            SessionError::TooManyRejections {
                seat: 0,
                rejections: 3,
                last: ActionError::InvalidCardReference(9999),
            }
        );
    }

    #[test]
    fn test_run_session_matches_session() {
        let providers = || {
            vec![
                boxed(ScriptedProvider::repeating(Action::DrawCard)),
                boxed(ScriptedProvider::repeating(Action::CollectFood)),
            ]
        };
        let direct = run_session(engine(), providers(), &mut NullSink, SessionLimits::default())
            .unwrap();
        let mut session = Session::new(engine(), providers(), SessionLimits::default()).unwrap();
        assert_eq!(session.run(&mut NullSink).unwrap(), direct);
    }

    #[test]
    fn test_exhausted_script_aborts() {
        let providers = vec![
            boxed(ScriptedProvider::new([Action::CollectFood])),
            boxed(ScriptedProvider::repeating(Action::CollectFood)),
        ];
        let mut session = Session::new(engine(), providers, SessionLimits::default()).unwrap();
        let err = session.run(&mut NullSink).unwrap_err();
        assert_eq!(err, SessionError::Aborted { seat: 0 });
        assert_eq!(session.log().len(), 2);
        assert!(!session.engine().is_game_over());
    }
}
