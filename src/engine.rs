use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ai::choose_direction;
use crate::collision::{Collision, ai_collision, player_collision};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::food::spawn_position;
use crate::grid::{Cell, GridState};
use crate::input::{Direction, GameInput};
use crate::progression::{Progression, ScoreChange};
use crate::schedule::{ScheduledAction, Scheduler, TimerToken};
use crate::snake::Snake;

/// Session-level state of the player.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    /// Terminal until [`SimulationEngine::restart`].
    PlayerDefeated,
    /// No free cell was left for food. Terminal until restart; the state is
    /// the one from before the failed tick.
    GridFull,
}

/// Whether the AI snake is on the grid.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AiStatus {
    Active,
    RespawnPending { respawn_at: Duration },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Actor {
    Player,
    Ai,
}

/// Fire-and-forget notifications for rendering, audio and popups.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    FoodEaten { by: Actor },
    LevelUp { threshold: u32 },
    AiDefeated { by_player: bool },
    GameOver { final_score: u32 },
    AiRespawned,
    GridResized { tile_count: u16 },
    DoubleScoreEnded,
}

/// Complete mutable state of one session.
///
/// Fields are public so scenarios can be staged directly; during play the
/// state is only mutated through [`SimulationEngine`].
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: GridState,
    pub player: Snake,
    /// `None` while the AI waits to respawn.
    pub ai: Option<Snake>,
    pub food: Cell,
    pub progression: Progression,
    pub status: GameStatus,
    pub death_reason: Option<Collision>,
    pub tick_count: u64,
    scheduler: Scheduler,
    ai_respawn: Option<TimerToken>,
    double_score: Option<TimerToken>,
}

impl GameState {
    fn new<R: rand::Rng + ?Sized>(config: &EngineConfig, rng: &mut R) -> Result<Self, EngineError> {
        let grid = GridState::new(
            config.initial_tile_count,
            config.grid_growth_step,
            config.canvas_size,
        );
        let player = Snake::new(
            config.player_start,
            config.player_direction,
            config.initial_length,
        );
        let ai = Snake::new(config.ai_start, config.ai_direction, config.initial_length);

        let mut state = Self {
            grid,
            player,
            ai: Some(ai),
            food: Cell::new(0, 0),
            progression: Progression::new(config.points_per_level),
            status: GameStatus::Running,
            death_reason: None,
            tick_count: 0,
            scheduler: Scheduler::new(),
            ai_respawn: None,
            double_score: None,
        };

        state.food = match config.initial_food {
            Some(cell) if state.grid.contains(cell) && !state.is_occupied(cell) => cell,
            _ => spawn_position(rng, state.grid.tile_count(), |cell| state.is_occupied(cell))?,
        };

        Ok(state)
    }

    /// Returns true if a snake segment or a wall covers `cell`.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.player.occupies(cell)
            || self.ai.as_ref().is_some_and(|ai| ai.occupies(cell))
            || self.grid.is_wall(cell)
    }

    /// Number of deferred actions still waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }
}

/// Advances the player/AI arena one tick at a time.
///
/// Time is supplied by the caller as game time elapsed since the session
/// started; timers compare against it, so tests can drive the engine with a
/// fake clock.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: EngineConfig,
    state: GameState,
    rng: StdRng,
}

impl SimulationEngine {
    /// Creates an engine seeded from system entropy.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible sessions.
    pub fn new_with_seed(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, mut rng: StdRng) -> Result<Self, EngineError> {
        let state = GameState::new(&config, &mut rng)?;
        Ok(Self { config, state, rng })
    }

    /// Throws the session away and starts over; pending timers die with it.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.state = GameState::new(&self.config, &mut self.rng)?;
        info!("game restarted");
        Ok(())
    }

    /// Requests a player heading change. Reversals are silently ignored.
    pub fn set_player_direction(&mut self, direction: Direction) -> bool {
        if self.state.status != GameStatus::Running {
            return false;
        }
        self.state.player.request_direction(direction)
    }

    /// Starts (or restarts) the double-score modifier.
    pub fn activate_double_score(&mut self, now: Duration) -> bool {
        if self.state.status != GameStatus::Running {
            return false;
        }

        if let Some(token) = self.state.double_score.take() {
            self.state.scheduler.cancel(token);
        }
        let due = now + self.config.double_score_duration();
        self.state.double_score = Some(
            self.state
                .scheduler
                .schedule(due, ScheduledAction::ExpireDoubleScore),
        );
        self.state.progression.set_double_active(true);
        debug!("double score active until {due:?}");
        true
    }

    /// Applies one external input event.
    pub fn apply_input(&mut self, input: GameInput, now: Duration) {
        match input {
            GameInput::Direction(direction) => {
                let _ = self.set_player_direction(direction);
            }
            GameInput::DoubleScore => {
                let _ = self.activate_double_score(now);
            }
            GameInput::Pause | GameInput::Quit | GameInput::Confirm => {}
        }
    }

    /// Runs one tick at game time `now` and returns what happened, in order.
    ///
    /// Once the session is over this is a no-op returning no events. A tick
    /// that fails with [`EngineError::GridFull`] is rolled back entirely and
    /// leaves the engine in [`GameStatus::GridFull`].
    pub fn advance(&mut self, now: Duration) -> Result<Vec<GameEvent>, EngineError> {
        if self.state.status != GameStatus::Running {
            return Ok(Vec::new());
        }

        let before = self.state.clone();
        self.tick(now).inspect_err(|error| {
            warn!("tick {} abandoned: {error}", before.tick_count + 1);
            self.state = before;
            self.state.status = GameStatus::GridFull;
        })
    }

    fn tick(&mut self, now: Duration) -> Result<Vec<GameEvent>, EngineError> {
        let mut events = Vec::new();
        self.fire_due_actions(now, &mut events)?;
        self.state.tick_count += 1;

        self.state.player.move_forward();
        if let Some(collision) = player_collision(
            &self.state.player,
            self.state.ai.as_ref(),
            &self.state.grid,
            self.config.player_self_collision,
        ) {
            let final_score = self.state.progression.score();
            self.state.status = GameStatus::PlayerDefeated;
            self.state.death_reason = Some(collision);
            info!("player defeated by {collision:?} with score {final_score}");
            events.push(GameEvent::GameOver { final_score });
            return Ok(events);
        }

        if self.state.player.head() == self.state.food {
            self.state.player.grow();
            let change = self.state.progression.on_food_eaten();
            debug!("player ate food, score {} -> {}", change.old, change.new);
            events.push(GameEvent::FoodEaten { by: Actor::Player });
            self.schedule_level_ups(&change, now, &mut events);
            self.respawn_food()?;
        }

        self.advance_ai(now, &mut events)?;
        Ok(events)
    }

    fn advance_ai(
        &mut self,
        now: Duration,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        let state = &mut self.state;
        let Some(ai) = state.ai.as_mut() else {
            return Ok(());
        };

        let direction = choose_direction(ai, state.food, &state.grid);
        ai.request_direction(direction);
        ai.move_forward();

        match ai_collision(ai, &state.player, &state.grid) {
            Some(Collision::Opponent) => {
                let length = self.defeat_ai(now);
                let change = self.state.progression.on_ai_defeated(length);
                info!(
                    "AI of length {length} struck the player, score {} -> {}",
                    change.old, change.new
                );
                events.push(GameEvent::AiDefeated { by_player: true });
                self.schedule_level_ups(&change, now, events);
            }
            Some(collision) => {
                let length = self.defeat_ai(now);
                info!("AI of length {length} crashed ({collision:?})");
                events.push(GameEvent::AiDefeated { by_player: false });
            }
            None if ai.head() == state.food => {
                ai.grow();
                debug!("AI ate food, target length {}", ai.target_length());
                events.push(GameEvent::FoodEaten { by: Actor::Ai });
                self.respawn_food()?;
            }
            None => {}
        }

        Ok(())
    }

    /// Walls in the AI body, removes it and schedules its respawn.
    /// Returns the length of the removed body.
    fn defeat_ai(&mut self, now: Duration) -> usize {
        let Some(ai) = self.state.ai.take() else {
            return 0;
        };

        let added = self.state.grid.add_walls(ai.segments());
        let respawn_at = now + self.config.ai_respawn_delay();
        self.state.ai_respawn = Some(
            self.state
                .scheduler
                .schedule(respawn_at, ScheduledAction::RespawnAi),
        );
        debug!("{added} new wall cells, AI respawns at {respawn_at:?}");

        ai.len()
    }

    /// Emits one `LevelUp` per crossed threshold and queues one grid growth
    /// each, spaced by the growth delay.
    fn schedule_level_ups(
        &mut self,
        change: &ScoreChange,
        now: Duration,
        events: &mut Vec<GameEvent>,
    ) {
        let delay = self.config.grid_growth_delay();
        for &threshold in &change.thresholds {
            let previous = self
                .state
                .scheduler
                .latest_due(|action| matches!(action, ScheduledAction::GrowGrid { .. }));
            // The first growth also waits a full delay after the crossing.
            let due = previous.map_or(now, |previous| previous.max(now)) + delay;
            self.state
                .scheduler
                .schedule(due, ScheduledAction::GrowGrid { threshold });

            info!("level up at score {threshold}, grid grows at {due:?}");
            events.push(GameEvent::LevelUp { threshold });
        }
    }

    fn fire_due_actions(
        &mut self,
        now: Duration,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        while let Some(action) = self.state.scheduler.pop_due(now) {
            match action {
                ScheduledAction::RespawnAi => {
                    self.state.ai_respawn = None;
                    let center = self.state.grid.center();
                    self.state.ai = Some(Snake::new(
                        center,
                        self.config.ai_respawn_direction,
                        self.config.initial_length,
                    ));
                    debug!("AI respawned at ({}, {})", center.x, center.y);
                    events.push(GameEvent::AiRespawned);
                    if center == self.state.food {
                        self.respawn_food()?;
                    }
                }
                ScheduledAction::GrowGrid { threshold } => {
                    self.grow_grid();
                    let tile_count = self.state.grid.tile_count();
                    debug!("grid grew to {tile_count} for level threshold {threshold}");
                    events.push(GameEvent::GridResized { tile_count });
                }
                ScheduledAction::ExpireDoubleScore => {
                    self.state.double_score = None;
                    self.state.progression.set_double_active(false);
                    debug!("double score expired");
                    events.push(GameEvent::DoubleScoreEnded);
                }
            }
        }

        Ok(())
    }

    fn grow_grid(&mut self) {
        let state = &mut self.state;
        state.grid.resize();

        let tile_count = state.grid.tile_count();
        state.player.clamp_to(tile_count);
        if let Some(ai) = state.ai.as_mut() {
            ai.clamp_to(tile_count);
        }
        state.food = state.food.clamped(tile_count);
    }

    fn respawn_food(&mut self) -> Result<(), EngineError> {
        let state = &self.state;
        let food = spawn_position(&mut self.rng, state.grid.tile_count(), |cell| {
            state.is_occupied(cell)
        })?;
        self.state.food = food;
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for staging scenarios.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    #[must_use]
    pub fn ai_status(&self) -> AiStatus {
        if self.state.ai.is_some() {
            return AiStatus::Active;
        }

        let respawn_at = self
            .state
            .ai_respawn
            .and_then(|token| self.state.scheduler.due_of(token))
            .unwrap_or_default();
        AiStatus::RespawnPending { respawn_at }
    }

    #[must_use]
    pub fn tile_count(&self) -> u16 {
        self.state.grid.tile_count()
    }

    #[must_use]
    pub fn cell_pixel_size(&self) -> u32 {
        self.state.grid.cell_pixel_size()
    }

    pub fn player_segments(&self) -> impl Iterator<Item = &Cell> {
        self.state.player.segments()
    }

    /// AI segments head first; empty while the AI waits to respawn.
    pub fn ai_segments(&self) -> impl Iterator<Item = &Cell> {
        self.state.ai.iter().flat_map(|ai| ai.segments())
    }

    #[must_use]
    pub fn walls(&self) -> &BTreeSet<Cell> {
        self.state.grid.walls()
    }

    #[must_use]
    pub fn food(&self) -> Cell {
        self.state.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.progression.score()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.state.progression.level()
    }

    #[must_use]
    pub fn is_double_active(&self) -> bool {
        self.state.progression.is_double_active()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.state.tick_count
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::collision::Collision;
    use crate::config::EngineConfig;
    use crate::error::EngineError;
    use crate::grid::Cell;
    use crate::input::Direction;
    use crate::progression::Progression;
    use crate::snake::Snake;

    use super::{Actor, AiStatus, GameEvent, GameStatus, SimulationEngine};

    fn engine() -> SimulationEngine {
        SimulationEngine::new_with_seed(EngineConfig::default(), 1).expect("default config is playable")
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn cells(points: &[(i32, i32)]) -> Vec<Cell> {
        points.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn new_game_matches_configured_start() {
        let engine = engine();

        assert_eq!(engine.tile_count(), 40);
        assert_eq!(engine.cell_pixel_size(), 25);
        assert_eq!(engine.food(), Cell::new(15, 15));
        assert_eq!(engine.player_segments().copied().collect::<Vec<_>>(), cells(&[(10, 10)]));
        assert_eq!(engine.ai_segments().copied().collect::<Vec<_>>(), cells(&[(30, 30)]));
        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.ai_status(), AiStatus::Active);
    }

    #[test]
    fn player_eats_food_in_front() {
        let mut engine = engine();
        engine.state_mut().food = Cell::new(11, 10);

        let events = engine.advance(ms(200)).expect("tick should succeed");

        assert!(events.contains(&GameEvent::FoodEaten { by: Actor::Player }));
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.state().player.target_length(), 6);
        assert!(!engine.state().is_occupied(engine.food()));
    }

    #[test]
    fn double_score_doubles_until_it_expires() {
        let mut engine = engine();
        assert!(engine.activate_double_score(ms(0)));
        engine.state_mut().food = Cell::new(11, 10);

        engine.advance(ms(200)).expect("tick should succeed");
        assert_eq!(engine.score(), 2);

        let events = engine.advance(ms(10_000)).expect("tick should succeed");
        assert!(events.contains(&GameEvent::DoubleScoreEnded));
        assert!(!engine.is_double_active());

        let next = engine.state().player.next_head_position();
        engine.state_mut().food = next;
        engine.advance(ms(10_200)).expect("tick should succeed");
        assert_eq!(engine.score(), 3);
    }

    #[test]
    fn reactivating_double_score_extends_it() {
        let mut engine = engine();
        engine.activate_double_score(ms(0));
        engine.activate_double_score(ms(5_000));

        let events = engine.advance(ms(10_000)).expect("tick should succeed");

        assert!(!events.contains(&GameEvent::DoubleScoreEnded));
        assert!(engine.is_double_active());
    }

    #[test]
    fn player_leaving_grid_ends_game_without_further_changes() {
        let mut engine = engine();
        engine.state_mut().player = Snake::from_segments(cells(&[(0, 10), (1, 10)]), Direction::Left);
        let ai_before: Vec<Cell> = engine.ai_segments().copied().collect();

        let events = engine.advance(ms(200)).expect("tick should succeed");

        assert_eq!(events, vec![GameEvent::GameOver { final_score: 0 }]);
        assert_eq!(engine.status(), GameStatus::PlayerDefeated);
        assert_eq!(engine.state().death_reason, Some(Collision::Boundary));
        assert_eq!(engine.ai_segments().copied().collect::<Vec<_>>(), ai_before);

        assert!(engine.advance(ms(400)).expect("tick is a no-op").is_empty());
        assert_eq!(engine.tick_count(), 1);
    }

    #[test]
    fn player_hitting_wall_ends_game() {
        let mut engine = engine();
        engine.state_mut().grid.add_walls(&[Cell::new(11, 10)]);

        let events = engine.advance(ms(200)).expect("tick should succeed");

        assert_eq!(events, vec![GameEvent::GameOver { final_score: 0 }]);
        assert_eq!(engine.state().death_reason, Some(Collision::Wall));
    }

    #[test]
    fn player_hitting_ai_ends_game() {
        let mut engine = engine();
        engine.state_mut().ai = Some(Snake::from_segments(
            cells(&[(11, 9), (11, 10), (11, 11)]),
            Direction::Up,
        ));

        engine.advance(ms(200)).expect("tick should succeed");

        assert_eq!(engine.status(), GameStatus::PlayerDefeated);
        assert_eq!(engine.state().death_reason, Some(Collision::Opponent));
    }

    #[test]
    fn player_self_collision_follows_config() {
        let coiled = cells(&[(5, 5), (5, 6), (6, 6), (6, 5), (6, 4), (5, 4), (4, 4)]);

        let mut lenient = engine();
        lenient.state_mut().player = Snake::from_segments(coiled.clone(), Direction::Up);
        lenient.advance(ms(200)).expect("tick should succeed");
        assert_eq!(lenient.status(), GameStatus::Running);

        let config = EngineConfig {
            player_self_collision: true,
            ..EngineConfig::default()
        };
        let mut strict = SimulationEngine::new_with_seed(config, 1).expect("config is playable");
        strict.state_mut().player = Snake::from_segments(coiled, Direction::Up);
        strict.advance(ms(200)).expect("tick should succeed");
        assert_eq!(strict.status(), GameStatus::PlayerDefeated);
        assert_eq!(strict.state().death_reason, Some(Collision::SelfBody));
    }

    #[test]
    fn ai_striking_player_becomes_walls_and_scores() {
        let mut engine = engine();
        let state = engine.state_mut();
        state.player = Snake::from_segments(
            cells(&[(10, 10), (9, 10), (8, 10), (7, 10), (6, 10)]),
            Direction::Right,
        );
        state.ai = Some(Snake::from_segments(
            cells(&[(8, 9), (8, 8), (8, 7), (8, 6), (8, 5), (8, 4)]),
            Direction::Down,
        ));
        state.food = Cell::new(8, 20);

        let events = engine.advance(ms(1_000)).expect("tick should succeed");

        assert_eq!(events, vec![GameEvent::AiDefeated { by_player: true }]);
        assert_eq!(engine.score(), 6);
        assert_eq!(engine.walls().len(), 6);
        assert!(engine.walls().contains(&Cell::new(8, 10)));
        assert!(engine.walls().contains(&Cell::new(8, 5)));
        assert_eq!(engine.ai_segments().count(), 0);
        assert_eq!(
            engine.ai_status(),
            AiStatus::RespawnPending {
                respawn_at: ms(6_000)
            }
        );
        assert_eq!(engine.status(), GameStatus::Running);
    }

    #[test]
    fn ai_respawns_at_center_after_delay() {
        let mut engine = engine();
        engine.state_mut().grid.add_walls(&[Cell::new(30, 31), Cell::new(29, 30), Cell::new(31, 30)]);
        engine.state_mut().ai = Some(Snake::from_segments(cells(&[(30, 30), (30, 29)]), Direction::Down));

        let events = engine.advance(ms(200)).expect("tick should succeed");
        assert_eq!(events, vec![GameEvent::AiDefeated { by_player: false }]);
        assert_eq!(engine.score(), 0);

        let events = engine.advance(ms(5_000)).expect("tick should succeed");
        assert!(!events.contains(&GameEvent::AiRespawned));

        let events = engine.advance(ms(5_200)).expect("tick should succeed");
        assert!(events.contains(&GameEvent::AiRespawned));
        assert_eq!(engine.ai_status(), AiStatus::Active);

        let ai = engine.state().ai.as_ref().expect("AI is back");
        assert_eq!(ai.len(), 2);
        assert_eq!(ai.segments().nth(1), Some(&Cell::new(20, 20)));
        assert_eq!(ai.target_length(), 5);
    }

    #[test]
    fn crashed_ai_body_is_walled_once() {
        let mut engine = engine();
        engine.state_mut().grid.add_walls(&[Cell::new(4, 30), Cell::new(6, 30), Cell::new(5, 29)]);
        engine.state_mut().ai = Some(Snake::from_segments(cells(&[(5, 30), (5, 31)]), Direction::Up));

        engine.advance(ms(200)).expect("tick should succeed");

        // (5, 29) was already a wall; only (5, 30) is new.
        assert_eq!(engine.walls().len(), 4);
        assert!(engine.walls().contains(&Cell::new(5, 30)));
    }

    #[test]
    fn ai_eating_food_grows_without_scoring() {
        let mut engine = engine();
        engine.state_mut().food = Cell::new(30, 31);

        let events = engine.advance(ms(200)).expect("tick should succeed");

        assert_eq!(events, vec![GameEvent::FoodEaten { by: Actor::Ai }]);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.state().ai.as_ref().map(Snake::target_length), Some(6));
        assert_ne!(engine.food(), Cell::new(30, 31));
    }

    /// Player at (20,20) heading right, a 16-cell AI column about to run
    /// into its body, score 7.
    fn stage_ai_strike(engine: &mut SimulationEngine) {
        let state = engine.state_mut();
        state.progression = Progression::with_score(7, 10);
        state.player = Snake::from_segments(
            cells(&[(20, 20), (19, 20), (18, 20), (17, 20), (16, 20)]),
            Direction::Right,
        );
        let ai_body: Vec<Cell> = (4..=19).rev().map(|y| Cell::new(18, y)).collect();
        state.ai = Some(Snake::from_segments(ai_body, Direction::Down));
        state.food = Cell::new(18, 35);
    }

    #[test]
    fn big_score_jump_levels_up_per_threshold_and_grows_grid_later() {
        let mut engine = engine();
        stage_ai_strike(&mut engine);

        let events = engine.advance(ms(1_000)).expect("tick should succeed");

        assert_eq!(
            events,
            vec![
                GameEvent::AiDefeated { by_player: true },
                GameEvent::LevelUp { threshold: 10 },
                GameEvent::LevelUp { threshold: 20 },
            ]
        );
        assert_eq!(engine.score(), 23);
        assert_eq!(engine.tile_count(), 40);

        let events = engine.advance(ms(1_700)).expect("tick should succeed");
        assert!(events.contains(&GameEvent::GridResized { tile_count: 42 }));

        let events = engine.advance(ms(2_400)).expect("tick should succeed");
        assert!(events.contains(&GameEvent::GridResized { tile_count: 44 }));
        assert_eq!(engine.cell_pixel_size(), 1000 / 44);
    }

    #[test]
    fn restart_cancels_pending_timers() {
        let mut engine = engine();
        engine.activate_double_score(ms(0));
        stage_ai_strike(&mut engine);
        engine.advance(ms(1_000)).expect("tick should succeed");
        assert_eq!(engine.score(), 23);
        // Respawn, two grid growths and the double-score expiry.
        assert_eq!(engine.state().pending_timers(), 4);

        engine.restart().expect("restart should succeed");

        assert_eq!(engine.state().pending_timers(), 0);
        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.ai_status(), AiStatus::Active);
        assert_eq!(engine.score(), 0);
        assert!(!engine.is_double_active());

        let events = engine.advance(ms(20_000)).expect("tick should succeed");
        assert!(!events.contains(&GameEvent::DoubleScoreEnded));
        assert!(!events.contains(&GameEvent::AiRespawned));
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, GameEvent::GridResized { .. }))
        );
        assert_eq!(engine.tile_count(), 40);
        assert!(engine.walls().is_empty());
    }

    #[test]
    fn grid_full_rolls_back_the_tick_and_ends_the_session() {
        let config = EngineConfig {
            initial_tile_count: 3,
            player_start: Cell::new(0, 0),
            ai_start: Cell::new(2, 2),
            initial_food: Some(Cell::new(1, 0)),
            ..EngineConfig::default()
        };
        let mut engine = SimulationEngine::new_with_seed(config, 1).expect("config is playable");
        engine.state_mut().ai = None;
        let walls: Vec<Cell> = (0..3)
            .flat_map(|y| (0..3).map(move |x| Cell::new(x, y)))
            .filter(|cell| cell.y > 0 || cell.x > 1)
            .collect();
        engine.state_mut().grid.add_walls(&walls);

        let result = engine.advance(ms(200));

        assert_eq!(result, Err(EngineError::GridFull { tile_count: 3 }));
        assert_eq!(engine.status(), GameStatus::GridFull);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.state().player.head(), Cell::new(0, 0));
        assert_eq!(engine.state().player.target_length(), 5);
        assert_eq!(engine.food(), Cell::new(1, 0));

        assert_eq!(engine.advance(ms(400)), Ok(Vec::new()));
        assert!(!engine.set_player_direction(Direction::Down));
        assert!(!engine.activate_double_score(ms(400)));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.state().player.head(), Cell::new(0, 0));

        engine.restart().expect("restart should succeed");
        assert_eq!(engine.status(), GameStatus::Running);
    }

    #[test]
    fn respawned_ai_on_the_food_cell_moves_the_food() {
        let mut engine = engine();
        let state = engine.state_mut();
        state.player = Snake::from_segments(cells(&[(5, 5), (4, 5)]), Direction::Right);
        // Boxed into the corner, the AI has no safe move and crashes.
        state.ai = Some(Snake::from_segments(cells(&[(0, 0), (1, 0)]), Direction::Left));
        state.grid.add_walls(&[Cell::new(0, 1)]);

        let events = engine.advance(ms(200)).expect("tick should succeed");
        assert_eq!(events, vec![GameEvent::AiDefeated { by_player: false }]);
        assert_eq!(engine.score(), 0);

        let center = engine.state().grid.center();
        engine.state_mut().food = center;
        let events = engine.advance(ms(5_200)).expect("tick should succeed");

        assert_eq!(events.first(), Some(&GameEvent::AiRespawned));
        assert_ne!(engine.food(), center);
        assert!(!engine.state().is_occupied(engine.food()));
    }

    #[test]
    fn reverse_input_is_ignored() {
        let mut engine = engine();
        engine.state_mut().player = Snake::from_segments(cells(&[(10, 10), (9, 10)]), Direction::Right);

        assert!(!engine.set_player_direction(Direction::Left));
        assert!(engine.set_player_direction(Direction::Up));

        engine.advance(ms(200)).expect("tick should succeed");
        assert_eq!(engine.state().player.head(), Cell::new(10, 9));
    }

    #[test]
    fn food_never_lands_on_occupied_cells() {
        let mut engine = SimulationEngine::new_with_seed(EngineConfig::default(), 99)
            .expect("default config is playable");
        let mut now = Duration::ZERO;

        for tick in 0..120 {
            if engine.status() != GameStatus::Running {
                break;
            }
            // Steer the player towards the food so it keeps eating.
            let head = engine.state().player.head();
            let food = engine.food();
            let wanted = if food.x > head.x {
                Direction::Right
            } else if food.x < head.x {
                Direction::Left
            } else if food.y > head.y {
                Direction::Down
            } else {
                Direction::Up
            };
            engine.set_player_direction(wanted);

            now += ms(200);
            engine.advance(now).expect("tick should succeed");

            let state = engine.state();
            assert!(
                !state.is_occupied(state.food),
                "food overlaps a snake or a wall on tick {tick}"
            );
            assert!(state.player.len() <= state.player.target_length());
        }
    }
}
