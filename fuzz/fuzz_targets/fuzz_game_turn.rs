#![no_main]

//! Whole game fuzzer.
//!
//! Feeds arbitrary submissions (including out-of-turn seats, unknown cards
//! and textual requests) into a game and checks after each one that:
//! 1. A refused submission changed nothing
//! 2. All game invariants still hold
//! 3. The game only ends through the round schedule

use arbitrary::Arbitrary;
use catgame::game::check_invariants;
use catgame::{Action, GameConfig, GameEngine, PlayerSetup};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated submission.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzSubmission {
    /// Place the n-th card of the acting hand.
    PlaceFromHand { slot: u8, terrain: u8 },
    /// Place an arbitrary card id.
    PlaceRaw { card: u32, terrain: u8 },
    CollectFood,
    CollectStuff,
    DrawCard,
    /// Submit for an arbitrary seat.
    Seat { seat: u8 },
    /// Submit a textual request.
    Request { kind: String, params: Vec<String> },
}

/// Structured input for game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameInput {
    seed: u64,
    /// Player count is 2 + players % 3.
    players: u8,
    submissions: Vec<FuzzSubmission>,
}

fuzz_target!(|input: GameInput| {
    let players = 2 + usize::from(input.players % 3);
    let setups = (0..players)
        .map(|i| PlayerSetup::new(format!("P{i}")))
        .collect();
    let Ok(mut game) = GameEngine::new(input.seed, GameConfig::default(), setups) else {
        return;
    };

    for submission in input.submissions.iter().take(300) {
        let Some(seat) = game.seat_to_act() else {
            break;
        };
        let before = game.public_state();

        let result = match submission {
            FuzzSubmission::PlaceFromHand { slot, terrain } => {
                let hand = &before.acting_hand;
                let Some(card) = hand.get(usize::from(*slot) % hand.len().max(1)) else {
                    continue;
                };
                game.submit_action(
                    seat,
                    Action::PlaceCard {
                        card: card.id,
                        terrain: usize::from(*terrain % 4),
                    },
                )
            }
            FuzzSubmission::PlaceRaw { card, terrain } => game.submit_action(
                seat,
                Action::PlaceCard {
                    card: *card,
                    terrain: usize::from(*terrain),
                },
            ),
            FuzzSubmission::CollectFood => game.submit_action(seat, Action::CollectFood),
            FuzzSubmission::CollectStuff => game.submit_action(seat, Action::CollectStuff),
            FuzzSubmission::DrawCard => game.submit_action(seat, Action::DrawCard),
            FuzzSubmission::Seat { seat } => {
                game.submit_action(usize::from(*seat), Action::CollectFood)
            }
            FuzzSubmission::Request { kind, params } => {
                let params: Vec<&str> = params.iter().map(String::as_str).collect();
                game.submit_request(seat, kind, &params)
            }
        };

        if !result.is_ok() {
            assert_eq!(game.public_state(), before, "refusal changed the game");
        }

        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
    }

    if game.is_game_over() {
        let result = game.result().expect("terminal game has a result");
        assert_eq!(result.rounds_played, game.config().rounds);
    } else {
        assert!(game.result().is_none());
    }
});
