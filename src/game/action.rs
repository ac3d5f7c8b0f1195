//! Player actions and their resolution against the ledger.
//!
//! Every action is checked completely before anything is mutated, so a
//! failed action leaves the player, board and pool exactly as they were.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::game::{Board, CardId, DrawPool, Player, RuleConfig};
use crate::rng::GameRng;

/// An action a player can take on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Pay a card's food cost and move it from hand onto a terrain.
    PlaceCard {
        /// Card in hand.
        card: CardId,
        /// Target terrain index.
        terrain: usize,
    },
    /// Gain food.
    CollectFood,
    /// Gain one collection token (plus the configured food bonus).
    CollectStuff,
    /// Draw a card from the pool.
    DrawCard,
}

impl Action {
    /// Parse a textual request such as `place 12 0`, `food`, `stuff` or
    /// `draw`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidAction`] for unknown kinds, missing or
    /// extra parameters and non-numeric parameters.
    pub fn from_request(kind: &str, params: &[&str]) -> Result<Self, ActionError> {
        let action = match kind.to_ascii_lowercase().as_str() {
            "place" | "place_card" => {
                let [card, terrain] = params else {
                    return Err(ActionError::InvalidAction(format!(
                        "place expects <card> <terrain>, got {} parameter(s)",
                        params.len()
                    )));
                };
                Self::PlaceCard {
                    card: parse_param(card, "card")?,
                    terrain: parse_param(terrain, "terrain")?,
                }
            }
            "food" | "collect_food" => Self::CollectFood,
            "stuff" | "collect_stuff" => Self::CollectStuff,
            "draw" | "draw_card" => Self::DrawCard,
            other => {
                return Err(ActionError::InvalidAction(format!(
                    "unknown action kind '{other}'"
                )));
            }
        };

        if !matches!(action, Self::PlaceCard { .. }) && !params.is_empty() {
            return Err(ActionError::InvalidAction(format!(
                "{kind} takes no parameters"
            )));
        }
        Ok(action)
    }
}

fn parse_param<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ActionError> {
    raw.parse()
        .map_err(|_| ActionError::InvalidAction(format!("{what} must be a number, got '{raw}'")))
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaceCard { card, terrain } => write!(f, "place card {card} on terrain {terrain}"),
            Self::CollectFood => write!(f, "collect food"),
            Self::CollectStuff => write!(f, "collect stuff"),
            Self::DrawCard => write!(f, "draw a card"),
        }
    }
}

/// What an accepted action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// A card moved from hand to a terrain.
    Placed {
        /// Card placed.
        card: CardId,
        /// Terrain it went to.
        terrain: usize,
        /// Food paid.
        cost: u32,
    },
    /// Food was collected.
    FoodCollected {
        /// Food gained.
        amount: u32,
    },
    /// A collection token was gained.
    StuffCollected {
        /// Extra food gained alongside the token.
        food_bonus: u32,
    },
    /// A card was drawn into hand.
    Drew {
        /// Card drawn.
        card: CardId,
    },
}

/// Shared state an action may touch besides the acting player.
#[derive(Debug)]
pub struct ActionContext<'a> {
    /// The board.
    pub board: &'a mut Board,
    /// The draw pool.
    pub pool: &'a mut DrawPool,
    /// The game RNG.
    pub rng: &'a mut GameRng,
    /// Resource rules.
    pub rules: &'a RuleConfig,
}

/// Apply `action` for `player`.
///
/// # Errors
///
/// Returns the reason the action was refused; nothing is mutated then.
pub fn resolve(
    action: &Action,
    player: &mut Player,
    ctx: ActionContext<'_>,
) -> Result<ActionOutcome, ActionError> {
    match *action {
        Action::PlaceCard { card, terrain } => place_card(player, ctx, card, terrain),
        Action::CollectFood => {
            let amount = ctx.rules.collect_food_amount;
            player.add_food(amount);
            Ok(ActionOutcome::FoodCollected { amount })
        }
        Action::CollectStuff => {
            let food_bonus = ctx.rules.collect_stuff_food_bonus;
            player.add_collections(1);
            player.add_food(food_bonus);
            Ok(ActionOutcome::StuffCollected { food_bonus })
        }
        Action::DrawCard => {
            let card = ctx.pool.draw(ctx.rng)?;
            let id = card.id;
            player.receive(card);
            Ok(ActionOutcome::Drew { card: id })
        }
    }
}

fn place_card(
    player: &mut Player,
    ctx: ActionContext<'_>,
    card_id: CardId,
    terrain_index: usize,
) -> Result<ActionOutcome, ActionError> {
    let rule = ctx.board.rule();
    let card = player
        .card_in_hand(card_id)
        .ok_or(ActionError::InvalidCardReference(card_id))?;
    let terrain = ctx
        .board
        .get_mut(terrain_index)
        .ok_or(ActionError::InvalidTerrainIndex(terrain_index))?;

    if player.food() < card.cost {
        return Err(ActionError::InsufficientResources {
            required: card.cost,
            available: player.food(),
        });
    }
    terrain
        .check(rule, card, player.collections())
        .map_err(|reason| ActionError::TerrainRejected {
            terrain: terrain_index,
            reason,
        })?;

    let collections = player.collections();
    let cost = card.cost;
    let Some(card) = player.spend_for_placement(card_id, terrain_index) else {
        unreachable!("placement of card {card_id} was validated but the ledger refused it");
    };
    terrain.place(rule, card, collections, player.id);

    Ok(ActionOutcome::Placed {
        card: card_id,
        terrain: terrain_index,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        BoardConfig, Card, CardKind, RejectReason, RequirementRule, TerrainConfig,
    };

    struct Table {
        board: Board,
        pool: DrawPool,
        rng: GameRng,
        rules: RuleConfig,
    }

    impl Table {
        fn new(rule: RequirementRule, terrains: &[(u32, Option<u32>)]) -> Self {
            let config = BoardConfig {
                rule,
                terrains: terrains
                    .iter()
                    .map(|&(capacity, threshold)| TerrainConfig {
                        capacity,
                        threshold,
                    })
                    .collect(),
            };
            Self {
                board: Board::from_config(&config).unwrap(),
                pool: DrawPool::new(vec![Card::new(100, CardKind::Cat, "Cat #100", 1)]),
                rng: GameRng::new(0),
                rules: RuleConfig::default(),
            }
        }

        fn apply(&mut self, action: &Action, player: &mut Player) -> Result<ActionOutcome, ActionError> {
            resolve(
                action,
                player,
                ActionContext {
                    board: &mut self.board,
                    pool: &mut self.pool,
                    rng: &mut self.rng,
                    rules: &self.rules,
                },
            )
        }
    }

    fn player_with(cards: &[(CardId, u32)], food: u32) -> Player {
        let mut player = Player::new(0, "Ada", food, 0, 2);
        for &(id, cost) in cards {
            player.receive(Card::new(id, CardKind::Cat, format!("Cat #{id}"), cost));
        }
        player
    }

    #[test]
    fn test_place_card_success() {
        let mut table = Table::new(RequirementRule::Open, &[(3, None), (3, None)]);
        let mut player = player_with(&[(1, 2)], 5);

        let outcome = table
            .apply(&Action::PlaceCard { card: 1, terrain: 1 }, &mut player)
            .unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::Placed {
                card: 1,
                terrain: 1,
                cost: 2
            }
        );
        assert_eq!(player.food(), 3);
        assert_eq!(player.cards_placed(), 1);
        assert_eq!(player.placed_in(1), 1);
        assert!(player.card_in_hand(1).is_none());
        assert_eq!(table.board.get(1).unwrap().occupancy(), 1);
    }

    #[test]
    fn test_place_card_error_order() {
        let mut table = Table::new(RequirementRule::Open, &[(1, None)]);
        let mut player = player_with(&[(1, 9)], 0);

        assert_eq!(
            table.apply(&Action::PlaceCard { card: 2, terrain: 7 }, &mut player),
            Err(ActionError::InvalidCardReference(2))
        );
        assert_eq!(
            table.apply(&Action::PlaceCard { card: 1, terrain: 7 }, &mut player),
            Err(ActionError::InvalidTerrainIndex(7))
        );
        assert_eq!(
            table.apply(&Action::PlaceCard { card: 1, terrain: 0 }, &mut player),
            Err(ActionError::InsufficientResources {
                required: 9,
                available: 0
            })
        );
    }

    #[test]
    fn test_place_card_terrain_rejects_without_mutation() {
        let mut table = Table::new(RequirementRule::FoodCostCeiling, &[(2, Some(1))]);
        let mut player = player_with(&[(1, 3)], 10);
        let before = player.clone();

        assert_eq!(
            table.apply(&Action::PlaceCard { card: 1, terrain: 0 }, &mut player),
            Err(ActionError::TerrainRejected {
                terrain: 0,
                reason: RejectReason::RequirementUnmet
            })
        );
        assert_eq!(player, before);
        assert_eq!(table.board.get(0).unwrap().occupancy(), 0);
    }

    #[test]
    fn test_place_card_full_terrain() {
        let mut table = Table::new(RequirementRule::Open, &[(1, None)]);
        let mut player = player_with(&[(1, 0), (2, 0)], 0);

        table
            .apply(&Action::PlaceCard { card: 1, terrain: 0 }, &mut player)
            .unwrap();
        assert_eq!(
            table.apply(&Action::PlaceCard { card: 2, terrain: 0 }, &mut player),
            Err(ActionError::TerrainRejected {
                terrain: 0,
                reason: RejectReason::Full
            })
        );
        assert_eq!(table.board.get(0).unwrap().occupancy(), 1);
    }

    #[test]
    fn test_collection_gate_uses_placer_collections() {
        let mut table = Table::new(RequirementRule::CollectionGate, &[(3, Some(1))]);
        let mut player = player_with(&[(1, 0)], 0);
        let place = Action::PlaceCard { card: 1, terrain: 0 };

        assert!(table.apply(&place, &mut player).is_err());
        table.apply(&Action::CollectStuff, &mut player).unwrap();
        assert!(table.apply(&place, &mut player).is_ok());
    }

    #[test]
    fn test_collect_food_uses_rule_amount() {
        let mut table = Table::new(RequirementRule::Open, &[(1, None)]);
        table.rules.collect_food_amount = 3;
        let mut player = player_with(&[], 1);

        let outcome = table.apply(&Action::CollectFood, &mut player).unwrap();
        assert_eq!(outcome, ActionOutcome::FoodCollected { amount: 3 });
        assert_eq!(player.food(), 4);
    }

    #[test]
    fn test_collect_stuff_food_bonus_is_configurable() {
        let mut table = Table::new(RequirementRule::Open, &[(1, None)]);
        let mut player = player_with(&[], 0);

        table.apply(&Action::CollectStuff, &mut player).unwrap();
        assert_eq!((player.collections(), player.food()), (1, 0));

        table.rules.collect_stuff_food_bonus = 1;
        table.apply(&Action::CollectStuff, &mut player).unwrap();
        assert_eq!((player.collections(), player.food()), (2, 1));
    }

    #[test]
    fn test_draw_card_then_empty_pool() {
        let mut table = Table::new(RequirementRule::Open, &[(1, None)]);
        let mut player = player_with(&[], 0);

        let outcome = table.apply(&Action::DrawCard, &mut player).unwrap();
        assert_eq!(outcome, ActionOutcome::Drew { card: 100 });
        assert_eq!(player.unplaced(), 1);

        let before = player.clone();
        assert_eq!(
            table.apply(&Action::DrawCard, &mut player),
            Err(ActionError::EmptyPool)
        );
        assert_eq!(player, before);
    }

    #[test]
    fn test_from_request() {
        assert_eq!(
            Action::from_request("place", &["4", "1"]),
            Ok(Action::PlaceCard { card: 4, terrain: 1 })
        );
        assert_eq!(Action::from_request("FOOD", &[]), Ok(Action::CollectFood));
        assert_eq!(Action::from_request("stuff", &[]), Ok(Action::CollectStuff));
        assert_eq!(Action::from_request("draw_card", &[]), Ok(Action::DrawCard));
    }

    #[test]
    fn test_from_request_rejects_bad_input() {
        assert!(matches!(
            Action::from_request("dance", &[]),
            Err(ActionError::InvalidAction(_))
        ));
        assert!(matches!(
            Action::from_request("place", &["4"]),
            Err(ActionError::InvalidAction(_))
        ));
        assert!(matches!(
            Action::from_request("place", &["x", "1"]),
            Err(ActionError::InvalidAction(_))
        ));
        assert!(matches!(
            Action::from_request("draw", &["1"]),
            Err(ActionError::InvalidAction(_))
        ));
    }
}
