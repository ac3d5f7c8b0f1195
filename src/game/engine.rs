//! The game engine: setup, round scheduling and final scoring.
//!
//! The engine is a passive state machine. It never asks for input; an outer
//! driver calls [`GameEngine::submit_action`] for the seat that is due and
//! reads [`GameEngine::public_state`] to render. Only accepted actions move
//! the turn cursor, so a refused action leaves the same player to act.
//!
//! Round `r` of `K` plays `2K - r + 1` steps; in every step each player acts
//! once in seat order. After the last step the round's challenge is scored
//! and the next round opens, or the game ends.

use tracing::{debug, info};

use crate::error::{ActionError, SetupError};
use crate::game::{
    Action, ActionContext, ActionResult, Board, ChallengeKind, ChallengeQueue,
    ChallengeResolution, DrawPool, GameConfig, GameEvent, GameResult, Phase, Player, PlayerId,
    PlayerSetup, PlayerSummary, PlayerView, PublicState, StateDelta, TerrainView, TurnCursor,
    assert_invariants, award, resolve, select_winner,
};
use crate::rng::GameRng;

/// Fewest players a game can have.
pub const MIN_PLAYERS: usize = 2;

/// Most players a game can have.
pub const MAX_PLAYERS: usize = 4;

/// Authoritative state of one game.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    setups: Vec<PlayerSetup>,
    rng: GameRng,
    pool: DrawPool,
    board: Board,
    players: Vec<Player>,
    queue: ChallengeQueue,
    challenge: Option<ChallengeKind>,
    cursor: TurnCursor,
    phase: Phase,
    history: Vec<ChallengeResolution>,
    events: Vec<GameEvent>,
    catalog_size: usize,
}

impl GameEngine {
    /// Build a game and open round 1.
    ///
    /// Randomness is drawn in a fixed order from one generator seeded with
    /// `seed`: card costs, then the challenge permutation, then starting
    /// hands in seat order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the player count is outside 2-4
    /// - no rounds are configured, or more rounds than challenge kinds
    /// - the board has no terrains or a zero-capacity terrain
    /// - a starting allocation does not sum to the budget
    /// - the catalog cannot cover every starting hand
    pub fn new(
        seed: u64,
        config: GameConfig,
        setups: Vec<PlayerSetup>,
    ) -> Result<Self, SetupError> {
        let num_players = setups.len();
        if num_players < MIN_PLAYERS {
            return Err(SetupError::TooFewPlayers(num_players));
        }
        if num_players > MAX_PLAYERS {
            return Err(SetupError::TooManyPlayers(num_players));
        }
        if config.rounds == 0 {
            return Err(SetupError::NoRounds);
        }

        let board = Board::from_config(&config.board)?;
        let kinds = ChallengeKind::catalog(board.len());
        if config.rounds as usize > kinds.len() {
            return Err(SetupError::QueueUnderflow {
                rounds: config.rounds,
                available: kinds.len(),
            });
        }

        let budget = config.rules.starting_budget;
        for setup in &setups {
            if setup.allocation.total() != Some(budget) {
                return Err(SetupError::AllocationMismatch {
                    player: setup.name.clone(),
                    total: setup.allocation.exact_total(),
                    budget,
                });
            }
        }

        let catalog_size = config.catalog.total();
        let needed: usize = setups.iter().map(|s| s.allocation.hand as usize).sum();
        if needed > catalog_size {
            return Err(SetupError::PoolTooSmall {
                needed,
                available: catalog_size,
            });
        }

        let mut rng = GameRng::new(seed);
        let mut pool = DrawPool::new(config.catalog.build(&mut rng));
        let queue = ChallengeQueue::new(kinds, &mut rng);

        let mut players = Vec::with_capacity(num_players);
        for (seat, setup) in setups.iter().enumerate() {
            let alloc = setup.allocation;
            let mut player = Player::new(
                seat,
                setup.name.clone(),
                alloc.food,
                alloc.collections,
                board.len(),
            );
            for _ in 0..alloc.hand {
                let card = pool.draw(&mut rng).map_err(|_| SetupError::PoolTooSmall {
                    needed,
                    available: catalog_size,
                })?;
                player.receive(card);
            }
            debug!(seat, name = %player.name, ?alloc, "player registered");
            players.push(player);
        }

        let mut engine = Self {
            cursor: TurnCursor {
                round: 0,
                step: 1,
                steps_in_round: 0,
                seat: 0,
            },
            config,
            setups,
            rng,
            pool,
            board,
            players,
            queue,
            challenge: None,
            phase: Phase::Setup,
            history: Vec::new(),
            events: Vec::new(),
            catalog_size,
        };
        engine.begin_round(1);
        Ok(engine)
    }

    /// Submit an action for `seat`.
    ///
    /// A refused action changes nothing; the reason is in the result.
    pub fn submit_action(&mut self, seat: PlayerId, action: Action) -> ActionResult {
        if let Err(error) = self.admit(seat) {
            return self.reject(seat, action, error);
        }

        let player = &mut self.players[seat];
        let ctx = ActionContext {
            board: &mut self.board,
            pool: &mut self.pool,
            rng: &mut self.rng,
            rules: &self.config.rules,
        };
        let outcome = match resolve(&action, player, ctx) {
            Ok(outcome) => outcome,
            Err(error) => return self.reject(seat, action, error),
        };

        debug!(
            round = self.cursor.round,
            step = self.cursor.step,
            seat,
            %action,
            "action applied"
        );
        let terrain = match action {
            Action::PlaceCard { terrain, .. } => self.board.get(terrain).map(TerrainView::from),
            _ => None,
        };
        self.events.push(GameEvent::ActionApplied {
            seat,
            action,
            outcome,
        });
        assert_invariants(self);

        let resolved = self.advance();
        ActionResult {
            outcome: Ok(outcome),
            delta: StateDelta {
                player: self.players.get(seat).map(PlayerView::from),
                terrain,
                pool_size: self.pool.len(),
                cursor: self.cursor,
                phase: self.phase,
                resolved,
            },
        }
    }

    /// Parse a textual request and submit it.
    ///
    /// Unknown kinds and malformed parameters are refused with
    /// [`ActionError::InvalidAction`] without touching the game.
    pub fn submit_request(&mut self, seat: PlayerId, kind: &str, params: &[&str]) -> ActionResult {
        match Action::from_request(kind, params) {
            Ok(action) => self.submit_action(seat, action),
            Err(error) => ActionResult {
                outcome: Err(error),
                delta: self.unchanged_delta(seat),
            },
        }
    }

    /// Snapshot of the board, the players and the round structure.
    #[must_use]
    pub fn public_state(&self) -> PublicState {
        let acting_hand = self
            .seat_to_act()
            .and_then(|seat| self.players.get(seat))
            .map(|p| p.hand().to_vec())
            .unwrap_or_default();

        PublicState {
            phase: self.phase,
            total_rounds: self.config.rounds,
            cursor: self.cursor,
            challenge: self.challenge,
            pool_size: self.pool.len(),
            rule: self.board.rule(),
            terrains: self.board.iter().map(TerrainView::from).collect(),
            players: self.players.iter().map(PlayerView::from).collect(),
            acting_hand,
            history: self.history.clone(),
        }
    }

    /// Final result; `None` until the game reaches the terminal phase.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if self.phase != Phase::Terminal {
            return None;
        }
        let scores: Vec<u32> = self.players.iter().map(Player::score).collect();
        let winner = select_winner(&scores)?;
        let players = self
            .players
            .iter()
            .map(|p| PlayerSummary {
                seat: p.id,
                name: p.name.clone(),
                score: p.score(),
                challenges_won: u32::try_from(
                    self.history.iter().filter(|r| r.winner == Some(p.id)).count(),
                )
                .unwrap_or(u32::MAX),
                cards_placed: p.cards_placed(),
                unplaced: p.unplaced(),
            })
            .collect();

        Some(GameResult {
            seed: self.rng.seed(),
            winner,
            scores,
            rounds_played: u32::try_from(self.history.len()).unwrap_or(u32::MAX),
            challenges: self.history.clone(),
            players,
        })
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Seat of the player to act, or `None` once the game is over.
    #[must_use]
    pub fn seat_to_act(&self) -> Option<PlayerId> {
        (self.phase == Phase::Round).then_some(self.cursor.seat)
    }

    /// Whether the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Terminal
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round, step and seat.
    #[must_use]
    pub const fn cursor(&self) -> TurnCursor {
        self.cursor
    }

    /// Challenge of the current round.
    #[must_use]
    pub const fn challenge(&self) -> Option<ChallengeKind> {
        self.challenge
    }

    /// Seed the game was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Configuration the game was built from.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Player registrations in seat order.
    #[must_use]
    pub fn setups(&self) -> &[PlayerSetup] {
        &self.setups
    }

    /// Players in seat order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The draw pool.
    #[must_use]
    pub const fn pool(&self) -> &DrawPool {
        &self.pool
    }

    /// Number of cards the game was built with.
    #[must_use]
    pub const fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    /// Challenges resolved so far.
    #[must_use]
    pub fn history(&self) -> &[ChallengeResolution] {
        &self.history
    }

    /// Challenge kinds still waiting in the queue.
    #[must_use]
    pub fn challenges_remaining(&self) -> usize {
        self.queue.remaining()
    }

    #[cfg(test)]
    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Check that `seat` may act now.
    fn admit(&self, seat: PlayerId) -> Result<(), ActionError> {
        if self.phase == Phase::Terminal {
            return Err(ActionError::GameOver);
        }
        if seat >= self.players.len() {
            return Err(ActionError::UnknownPlayer(seat));
        }
        if seat != self.cursor.seat {
            return Err(ActionError::OutOfTurn {
                expected: self.cursor.seat,
            });
        }
        Ok(())
    }

    fn reject(&mut self, seat: PlayerId, action: Action, error: ActionError) -> ActionResult {
        debug!(seat, %action, %error, "action rejected");
        self.events.push(GameEvent::ActionRejected {
            seat,
            action,
            error: error.clone(),
        });
        ActionResult {
            outcome: Err(error),
            delta: self.unchanged_delta(seat),
        }
    }

    fn unchanged_delta(&self, seat: PlayerId) -> StateDelta {
        StateDelta {
            player: self.players.get(seat).map(PlayerView::from),
            terrain: None,
            pool_size: self.pool.len(),
            cursor: self.cursor,
            phase: self.phase,
            resolved: None,
        }
    }

    /// Move the cursor past an accepted action.
    ///
    /// Returns the challenge resolution if this closed a round. After the
    /// last round the cursor stays on the final turn played.
    fn advance(&mut self) -> Option<ChallengeResolution> {
        if self.cursor.seat + 1 < self.players.len() {
            self.cursor.seat += 1;
            return None;
        }
        if self.cursor.step < self.cursor.steps_in_round {
            self.cursor.seat = 0;
            self.cursor.step += 1;
            return None;
        }

        let resolution = self.end_round();
        if self.cursor.round >= self.config.rounds {
            self.finish();
        } else {
            self.begin_round(self.cursor.round + 1);
        }
        Some(resolution)
    }

    fn begin_round(&mut self, round: u32) {
        let Some(kind) = self.queue.pop() else {
            unreachable!(
                "challenge queue was checked to hold {} rounds at setup",
                self.config.rounds
            );
        };
        let steps = self.config.steps_in_round(round);
        self.cursor = TurnCursor {
            round,
            step: 1,
            steps_in_round: steps,
            seat: 0,
        };
        self.challenge = Some(kind);
        self.phase = Phase::Round;

        info!(round, steps, challenge = %kind, "round started");
        self.events.push(GameEvent::RoundStarted {
            round,
            steps,
            challenge: kind,
        });
    }

    fn end_round(&mut self) -> ChallengeResolution {
        let round = self.cursor.round;
        let resolution = match self.challenge.take() {
            Some(kind) => award(
                kind,
                round,
                &mut self.players,
                self.config.rules.challenge_bonus,
            ),
            None => unreachable!("round {round} closed without a challenge"),
        };

        match resolution.winner {
            Some(seat) => info!(
                round,
                challenge = %resolution.kind,
                seat,
                best = resolution.best,
                "challenge won"
            ),
            None => info!(
                round,
                challenge = %resolution.kind,
                best = resolution.best,
                "challenge tied or empty, no award"
            ),
        }
        self.history.push(resolution);
        self.events.push(GameEvent::ChallengeResolved(resolution));
        resolution
    }

    fn finish(&mut self) {
        self.phase = Phase::FinalScoring;
        let scores: Vec<u32> = self.players.iter().map(Player::score).collect();
        // select_winner only fails on an empty list; setup guarantees players
        let winner = select_winner(&scores).unwrap_or_default();

        self.phase = Phase::Terminal;
        info!(winner, ?scores, "game finished");
        self.events.push(GameEvent::GameFinished { winner, scores });
    }
}
