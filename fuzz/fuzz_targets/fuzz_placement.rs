#![no_main]

//! Placement fuzzer.
//!
//! Builds arbitrary boards (any rule, capacities and thresholds) and hammers
//! them with placements, checking that terrains never overflow and that a
//! refused placement leaves the table exactly as it was.

use arbitrary::Arbitrary;
use catgame::game::{BoardConfig, RequirementRule, TerrainConfig, check_invariants};
use catgame::{Action, GameConfig, GameEngine, PlayerSetup};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct PlacementInput {
    seed: u64,
    rule: u8,
    /// (capacity, threshold) per terrain.
    terrains: Vec<(u8, Option<u8>)>,
    max_cat_cost: u8,
    /// (hand slot, terrain) per placement.
    placements: Vec<(u8, u8)>,
}

fuzz_target!(|input: PlacementInput| {
    let rule = match input.rule % 3 {
        0 => RequirementRule::Open,
        1 => RequirementRule::FoodCostCeiling,
        _ => RequirementRule::CollectionGate,
    };
    let terrains: Vec<TerrainConfig> = input
        .terrains
        .iter()
        .take(6)
        .map(|&(capacity, threshold)| TerrainConfig {
            capacity: u32::from(capacity % 12),
            threshold: threshold.map(|t| u32::from(t % 8)),
        })
        .collect();

    let mut config = GameConfig {
        board: BoardConfig { rule, terrains },
        rounds: 2,
        ..GameConfig::default()
    };
    config.catalog.max_cat_cost = u32::from(input.max_cat_cost % 8);

    let setups = vec![PlayerSetup::new("A"), PlayerSetup::new("B")];
    // Empty boards and zero capacities are setup errors, not panics
    let Ok(mut game) = GameEngine::new(input.seed, config, setups) else {
        return;
    };

    for &(slot, terrain) in input.placements.iter().take(200) {
        let Some(seat) = game.seat_to_act() else {
            break;
        };
        let before = game.public_state();
        let action = match before.acting_hand.get(usize::from(slot) % before.acting_hand.len().max(1)) {
            Some(card) => Action::PlaceCard {
                card: card.id,
                terrain: usize::from(terrain % 8),
            },
            None => Action::DrawCard,
        };

        let result = game.submit_action(seat, action);
        if !result.is_ok() {
            assert_eq!(game.public_state(), before);
            // keep the game moving
            let moved = game.submit_action(seat, Action::CollectFood);
            assert!(moved.is_ok());
        }

        for t in game.board().iter() {
            assert!(t.occupancy() <= t.capacity as usize);
        }
        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
    }
});
