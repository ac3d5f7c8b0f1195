//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use catgame::game::{ActionOutcome, RequirementRule};
use catgame::{GameEvent, GameResult, PublicState};

/// Describe the board-wide requirement rule.
fn rule_text(rule: RequirementRule) -> &'static str {
    match rule {
        RequirementRule::Open => "no requirement",
        RequirementRule::FoodCostCeiling => "card cost must not exceed the threshold",
        RequirementRule::CollectionGate => "player needs threshold collections",
    }
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    let winner = result
        .players
        .get(result.winner)
        .map_or("Unknown", |p| p.name.as_str());
    let _ = writeln!(output, "  Winner: Player {} ({winner})", result.winner);
    let _ = writeln!(output, "  Rounds: {}\n", result.rounds_played);

    for challenge in &result.challenges {
        let _ = write!(output, "  Round {}: {} -> ", challenge.round, challenge.kind);
        match challenge.winner.and_then(|seat| result.players.get(seat)) {
            Some(p) => {
                let _ = writeln!(output, "{} (+{})", p.name, challenge.bonus);
            }
            None => output.push_str("no winner\n"),
        }
    }
    output.push('\n');

    for p in &result.players {
        let _ = writeln!(
            output,
            "  Player {}: {} points ({}) [{} challenges, {} placed, {} in hand]",
            p.seat, p.score, p.name, p.challenges_won, p.cards_placed, p.unplaced
        );
    }

    output
}

/// Format the table as seen by the player to act.
pub(super) fn format_state(state: &PublicState) -> String {
    let mut output = String::new();

    let cursor = state.cursor;
    let _ = writeln!(
        output,
        "Round {}/{} step {}/{}",
        cursor.round, state.total_rounds, cursor.step, cursor.steps_in_round
    );
    if let Some(challenge) = state.challenge {
        let _ = writeln!(output, "Challenge: {challenge}");
    }
    let _ = writeln!(
        output,
        "Pool: {} cards | Terrain rule: {}",
        state.pool_size,
        rule_text(state.rule)
    );

    for t in &state.terrains {
        let threshold = t
            .threshold
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        let _ = writeln!(
            output,
            "  Terrain {}: {}/{} (threshold {threshold})",
            t.index, t.occupancy, t.capacity
        );
    }
    for p in &state.players {
        let marker = if p.seat == cursor.seat { '>' } else { ' ' };
        let _ = writeln!(
            output,
            "{marker} {} [{}]: score {} food {} collections {} placed {:?} hand {}",
            p.name, p.seat, p.score, p.food, p.collections, p.placed_per_terrain, p.unplaced
        );
    }
    if !state.acting_hand.is_empty() {
        output.push_str("Hand:\n");
        for card in &state.acting_hand {
            let _ = writeln!(output, "  {} {} (cost {})", card.id, card.name, card.cost);
        }
    }

    output
}

/// Format one event as a single line.
pub(super) fn format_event(event: &GameEvent, names: &[String]) -> String {
    let name = |seat: usize| names.get(seat).map_or("Unknown", String::as_str);
    match event {
        GameEvent::RoundStarted {
            round,
            steps,
            challenge,
        } => format!("== Round {round}: {steps} steps, challenge {challenge} =="),
        GameEvent::ActionApplied { seat, outcome, .. } => {
            let what = match outcome {
                ActionOutcome::Placed {
                    card,
                    terrain,
                    cost,
                } => format!("placed card {card} on terrain {terrain} for {cost} food"),
                ActionOutcome::FoodCollected { amount } => format!("collected {amount} food"),
                ActionOutcome::StuffCollected { food_bonus: 0 } => "collected stuff".to_string(),
                ActionOutcome::StuffCollected { food_bonus } => {
                    format!("collected stuff and {food_bonus} food")
                }
                ActionOutcome::Drew { card } => format!("drew card {card}"),
            };
            format!("{} {what}", name(*seat))
        }
        GameEvent::ActionRejected { seat, error, .. } => {
            format!("{}: refused, {error}", name(*seat))
        }
        GameEvent::ChallengeResolved(res) => match res.winner {
            Some(seat) => format!(
                "{} wins {} with {} (+{})",
                name(seat),
                res.kind,
                res.best,
                res.bonus
            ),
            None => format!("Nobody wins {}", res.kind),
        },
        GameEvent::GameFinished { winner, scores } => {
            format!("Game over: {} wins, scores {scores:?}", name(*winner))
        }
    }
}
