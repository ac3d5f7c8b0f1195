//! Game configuration.
//!
//! Every tunable of a game lives here and is passed into
//! [`GameEngine::new`](crate::game::GameEngine::new). The whole tree is
//! serde-enabled so outer layers can load it from JSON; missing fields fall
//! back to the defaults.

use serde::{Deserialize, Serialize};

use crate::game::{BoardConfig, CatalogConfig};

/// Resource and scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Food gained by the collect-food action.
    pub collect_food_amount: u32,
    /// Extra food granted by the collect-stuff action (0 disables it).
    pub collect_stuff_food_bonus: u32,
    /// Points awarded to the unique winner of a challenge.
    pub challenge_bonus: u32,
    /// Required sum of food, collections and hand size at setup.
    pub starting_budget: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            collect_food_amount: 2,
            collect_stuff_food_bonus: 0,
            challenge_bonus: 10,
            starting_budget: 10,
        }
    }
}

/// Complete configuration of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of rounds.
    pub rounds: u32,
    /// Deck composition.
    pub catalog: CatalogConfig,
    /// Terrains and the requirement rule.
    pub board: BoardConfig,
    /// Resource and scoring rules.
    pub rules: RuleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds: 4,
            catalog: CatalogConfig::default(),
            board: BoardConfig::default(),
            rules: RuleConfig::default(),
        }
    }
}

impl GameConfig {
    /// Steps played in `round` (1-indexed).
    ///
    /// Earlier rounds get more steps: `2 * rounds - round + 1`, so four
    /// rounds play 8, 7, 6 and 5 steps.
    #[must_use]
    pub const fn steps_in_round(&self, round: u32) -> u32 {
        (self.rounds * 2).saturating_sub(round) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_in_round_four_rounds() {
        let config = GameConfig::default();
        let steps: Vec<_> = (1..=4).map(|r| config.steps_in_round(r)).collect();
        assert_eq!(steps, vec![8, 7, 6, 5]);
    }

    #[test]
    fn test_steps_strictly_decrease() {
        let config = GameConfig {
            rounds: 6,
            ..GameConfig::default()
        };
        for r in 1..6 {
            assert_eq!(config.steps_in_round(r), config.steps_in_round(r + 1) + 1);
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"rounds": 3}"#).unwrap();
        assert_eq!(config.rounds, 3);
        assert_eq!(config.rules, RuleConfig::default());
        assert_eq!(config.board, BoardConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
