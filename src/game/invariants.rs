//! Game invariants - sanity checks that detect bugs.
//!
//! Every accepted action must keep these true. A violation means the rules
//! code is wrong, never that a player did something illegal.

use std::collections::HashSet;

use crate::game::GameEngine;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(game: &GameEngine) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = game.board();

    for terrain in board.iter() {
        if terrain.occupancy() > terrain.capacity as usize {
            violations.push(InvariantViolation::new(format!(
                "Terrain {} holds {} cards > capacity {}",
                terrain.index,
                terrain.occupancy(),
                terrain.capacity
            )));
        }
    }

    for player in game.players() {
        let counters = player.placed_per_terrain();
        if counters.len() != board.len() {
            violations.push(InvariantViolation::new(format!(
                "Player {} tracks {} terrains, board has {}",
                player.id,
                counters.len(),
                board.len()
            )));
        }
        let sum: u32 = counters.iter().sum();
        if sum != player.cards_placed() {
            violations.push(InvariantViolation::new(format!(
                "Player {} per-terrain counters sum to {} but cards placed is {}",
                player.id,
                sum,
                player.cards_placed()
            )));
        }
    }

    for terrain in board.iter() {
        let claimed: u32 = game
            .players()
            .iter()
            .map(|p| p.placed_in(terrain.index))
            .sum();
        if claimed as usize != terrain.occupancy() {
            violations.push(InvariantViolation::new(format!(
                "Players claim {} cards on terrain {} which holds {}",
                claimed,
                terrain.index,
                terrain.occupancy()
            )));
        }
        if terrain.owners().len() != terrain.occupancy() {
            violations.push(InvariantViolation::new(format!(
                "Terrain {} records {} owners for {} cards",
                terrain.index,
                terrain.owners().len(),
                terrain.occupancy()
            )));
        }
        for player in game.players() {
            let owned = terrain.placed_by(player.id);
            if player.placed_in(terrain.index) as usize != owned {
                violations.push(InvariantViolation::new(format!(
                    "Player {} counts {} cards on terrain {} but owns {}",
                    player.id,
                    player.placed_in(terrain.index),
                    terrain.index,
                    owned
                )));
            }
        }
    }

    // Card conservation: every card is in exactly one place.
    let mut ids = HashSet::new();
    let mut duplicates = Vec::new();
    let located = game
        .pool()
        .iter()
        .chain(game.players().iter().flat_map(|p| p.hand().iter()))
        .chain(board.iter().flat_map(|t| t.placed().iter()));
    for card in located {
        if !ids.insert(card.id) {
            duplicates.push(card.id);
        }
    }
    if !duplicates.is_empty() {
        violations.push(InvariantViolation::new(format!(
            "Cards found in more than one place: {duplicates:?}"
        )));
    }
    if ids.len() + duplicates.len() != game.catalog_size() {
        violations.push(InvariantViolation::new(format!(
            "{} cards located but the catalog holds {}",
            ids.len() + duplicates.len(),
            game.catalog_size()
        )));
    }

    let budget = game.config().rules.starting_budget;
    for setup in game.setups() {
        if setup.allocation.total() != Some(budget) {
            violations.push(InvariantViolation::new(format!(
                "Player {} started with {} resources, budget is {}",
                setup.name,
                setup.allocation.exact_total(),
                budget
            )));
        }
    }

    let max_score = game
        .config()
        .rounds
        .saturating_mul(game.config().rules.challenge_bonus);
    for player in game.players() {
        if player.score() > max_score {
            violations.push(InvariantViolation::new(format!(
                "Player {} score {} exceeds the {} points available",
                player.id,
                player.score(),
                max_score
            )));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(game: &GameEngine) {
    let violations = check_invariants(game);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_game: &GameEngine) {}
