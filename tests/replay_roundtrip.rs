//! Recording and replay tests through the filesystem.
//!
//! A played game is saved, loaded back and replayed; the replayed result
//! must match the live game exactly.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use catgame::game::{Allocation, RequirementRule};
use catgame::replay::{Recording, ReplayError, Replayer};
use catgame::session::{EventLog, InputProvider, ScriptedProvider, Session};
use catgame::{Action, ActionError, GameConfig, GameEngine, PlayerSetup, SessionLimits, replay};

fn played_session(seed: u64) -> (Recording, catgame::GameResult) {
    let mut config = GameConfig::default();
    config.board.rule = RequirementRule::CollectionGate;
    let setups = vec![
        PlayerSetup::new("Ada"),
        PlayerSetup::new("Bo").with_allocation(Allocation::new(4, 4, 2)),
    ];
    let engine = GameEngine::new(seed, config, setups).unwrap();

    // seat 0 tries a placement every other turn; refusals fall back to food
    let hand: Vec<u32> = engine.players()[0].hand().iter().map(|c| c.id).collect();
    let mut script = Vec::new();
    for (i, card) in hand.iter().enumerate() {
        script.push(Action::PlaceCard {
            card: *card,
            terrain: i % 3,
        });
        script.push(Action::DrawCard);
    }
    let providers: Vec<Box<dyn InputProvider>> = vec![
        Box::new(PlaceOrFood::new(script)),
        Box::new(ScriptedProvider::new([Action::CollectStuff, Action::DrawCard])
            .with_fallback(Action::CollectFood)),
    ];

    let mut session = Session::new(engine, providers, SessionLimits::default()).unwrap();
    let result = session.run(&mut EventLog::default()).unwrap();
    (session.recording(), result)
}

/// Plays a script, replacing any refused action with food collection.
struct PlaceOrFood {
    script: ScriptedProvider,
}

impl PlaceOrFood {
    fn new(script: Vec<Action>) -> Self {
        Self {
            script: ScriptedProvider::new(script).with_fallback(Action::CollectFood),
        }
    }
}

impl InputProvider for PlaceOrFood {
    fn next_action(
        &mut self,
        state: &catgame::PublicState,
        seat: usize,
        rejected: Option<&ActionError>,
    ) -> Option<Action> {
        if rejected.is_some() {
            return Some(Action::CollectFood);
        }
        self.script.next_action(state, seat, rejected)
    }
}

#[test]
fn test_save_load_replay_matches() {
    let (recording, result) = played_session(99);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");

    recording.save(&path).unwrap();
    let loaded = Recording::load(&path).unwrap();
    assert_eq!(loaded, recording);

    let replayed = replay(&loaded).unwrap();
    assert_eq!(replayed, result);
}

#[test]
fn test_recording_holds_only_accepted_actions() {
    let (recording, result) = played_session(5);
    let steps: usize = [8, 7, 6, 5].iter().sum();
    assert_eq!(recording.actions.len(), steps * 2);
    assert_eq!(result.rounds_played, 4);
}

#[test]
fn test_replayer_seek_matches_live_state() {
    let (recording, _) = played_session(17);
    let mut live = recording.start().unwrap();
    let mut replayer = Replayer::new(recording.clone()).unwrap();

    for (i, recorded) in recording.actions.iter().enumerate().take(30) {
        assert!(live.submit_action(recorded.seat, recorded.action).is_ok());
        replayer.step_forward().unwrap();
        assert_eq!(replayer.position(), i + 1);
        assert_eq!(replayer.engine().public_state(), live.public_state());
    }

    replayer.seek(3).unwrap();
    let mut fresh = recording.start().unwrap();
    for recorded in &recording.actions[..3] {
        let _ = fresh.submit_action(recorded.seat, recorded.action);
    }
    assert_eq!(replayer.engine().public_state(), fresh.public_state());
}

#[test]
fn test_tampered_recording_diverges() {
    let (mut recording, _) = played_session(23);
    recording.actions[4].seat = (recording.actions[4].seat + 1) % 2;
    assert!(matches!(
        replay(&recording),
        Err(ReplayError::Diverged { index: 4, .. })
    ));
}

#[test]
fn test_load_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Recording::load(&path), Err(ReplayError::Json(_))));

    let missing = dir.path().join("missing.json");
    assert!(matches!(Recording::load(&missing), Err(ReplayError::Io(_))));
}

#[test]
fn test_config_survives_roundtrip() {
    let (recording, _) = played_session(1);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");
    recording.save(&path).unwrap();

    let loaded = Recording::load(&path).unwrap();
    assert_eq!(loaded.config.board.rule, RequirementRule::CollectionGate);
    assert_eq!(loaded.players[1].allocation, Allocation::new(4, 4, 2));
}
