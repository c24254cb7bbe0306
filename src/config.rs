use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Cell;
use crate::input::Direction;

/// Starting grid side length, in tiles.
pub const DEFAULT_TILE_COUNT: u16 = 40;

/// Tiles added to each side of the grid per level-up.
pub const DEFAULT_GRID_GROWTH_STEP: u16 = 2;

/// Rendered extent of the whole grid; tile size is derived from it.
pub const DEFAULT_CANVAS_SIZE: u32 = 1000;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Cooldown before a defeated AI snake re-enters the grid.
pub const DEFAULT_AI_RESPAWN_DELAY_MS: u64 = 5000;

/// Delay between a level-up and the matching grid growth.
pub const DEFAULT_GRID_GROWTH_DELAY_MS: u64 = 700;

/// How long a level-up notification stays on screen.
pub const DEFAULT_LEVEL_UP_POPUP_MS: u64 = 2400;

/// Lifetime of the double-score modifier.
pub const DEFAULT_DOUBLE_SCORE_DURATION_MS: u64 = 10_000;

/// Target length both snakes are created with.
pub const DEFAULT_SNAKE_LENGTH: usize = 5;

/// Score needed per level-up.
pub const POINTS_PER_LEVEL: u32 = 10;

/// Tunable parameters for one game session.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub initial_tile_count: u16,
    pub grid_growth_step: u16,
    pub canvas_size: u32,
    pub tick_interval_ms: u64,
    pub ai_respawn_delay_ms: u64,
    pub grid_growth_delay_ms: u64,
    pub level_up_popup_ms: u64,
    pub double_score_duration_ms: u64,
    pub initial_length: usize,
    pub points_per_level: u32,
    pub player_start: Cell,
    pub player_direction: Direction,
    pub ai_start: Cell,
    pub ai_direction: Direction,
    pub ai_respawn_direction: Direction,
    /// First food cell; a random free cell is used when unset or occupied.
    pub initial_food: Option<Cell>,
    /// Whether the player dies when its head runs into its own body.
    pub player_self_collision: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_tile_count: DEFAULT_TILE_COUNT,
            grid_growth_step: DEFAULT_GRID_GROWTH_STEP,
            canvas_size: DEFAULT_CANVAS_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            ai_respawn_delay_ms: DEFAULT_AI_RESPAWN_DELAY_MS,
            grid_growth_delay_ms: DEFAULT_GRID_GROWTH_DELAY_MS,
            level_up_popup_ms: DEFAULT_LEVEL_UP_POPUP_MS,
            double_score_duration_ms: DEFAULT_DOUBLE_SCORE_DURATION_MS,
            initial_length: DEFAULT_SNAKE_LENGTH,
            points_per_level: POINTS_PER_LEVEL,
            player_start: Cell::new(10, 10),
            player_direction: Direction::Right,
            ai_start: Cell::new(30, 30),
            ai_direction: Direction::Down,
            ai_respawn_direction: Direction::Down,
            initial_food: Some(Cell::new(15, 15)),
            player_self_collision: false,
        }
    }
}

impl EngineConfig {
    /// Loads a JSON config file on top of the defaults and validates it.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_tile_count == 0 {
            return Err(ConfigError::Invalid(
                "initial_tile_count must be positive".to_owned(),
            ));
        }
        if self.grid_growth_step == 0 {
            return Err(ConfigError::Invalid(
                "grid_growth_step must be positive".to_owned(),
            ));
        }
        if self.points_per_level == 0 {
            return Err(ConfigError::Invalid(
                "points_per_level must be positive".to_owned(),
            ));
        }
        if self.initial_length == 0 {
            return Err(ConfigError::Invalid(
                "initial_length must be positive".to_owned(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be positive".to_owned(),
            ));
        }

        for (name, cell) in [("player_start", self.player_start), ("ai_start", self.ai_start)] {
            if !cell.is_within(self.initial_tile_count) {
                return Err(ConfigError::Invalid(format!(
                    "{name} ({}, {}) lies outside the {n}x{n} grid",
                    cell.x,
                    cell.y,
                    n = self.initial_tile_count,
                )));
            }
        }

        if self.player_start == self.ai_start {
            return Err(ConfigError::Invalid(
                "player_start and ai_start must differ".to_owned(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn ai_respawn_delay(&self) -> Duration {
        Duration::from_millis(self.ai_respawn_delay_ms)
    }

    #[must_use]
    pub fn grid_growth_delay(&self) -> Duration {
        Duration::from_millis(self.grid_growth_delay_ms)
    }

    #[must_use]
    pub fn level_up_popup(&self) -> Duration {
        Duration::from_millis(self.level_up_popup_ms)
    }

    #[must_use]
    pub fn double_score_duration(&self) -> Duration {
        Duration::from_millis(self.double_score_duration_ms)
    }
}
