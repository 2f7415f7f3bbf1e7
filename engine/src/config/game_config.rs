use serde::{Deserialize, Serialize};

use super::Validate;

const DEFAULT_GRID_SIZE: u32 = 20;
const DEFAULT_TICK_INTERVAL_MS: u32 = 200;

const MIN_GRID_SIZE: u32 = 2;
const MAX_GRID_SIZE: u32 = 100;
const MIN_TICK_INTERVAL_MS: u32 = 10;
const MAX_TICK_INTERVAL_MS: u32 = 5000;

/// Comment block written above a saved `GameConfig`.
pub const GAME_CONFIG_HEADER: &str = "Snake engine settings.
grid_size: cells per side, 2 to 100.
tick_interval_ms: time between moves, 10 to 5000.
seed and log_prefix may be omitted.";

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct GameConfig {
    pub grid_size: u32,
    pub tick_interval_ms: u32,
    /// Fixed seed for food placement; a fresh random seed per run when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub log_prefix: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed: None,
            log_prefix: None,
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(format!(
                "Grid size must be between {} and {}, got {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE, self.grid_size
            ));
        }
        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            return Err(format!(
                "Tick interval must be between {}ms and {}ms, got {}ms",
                MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS, self.tick_interval_ms
            ));
        }
        Ok(())
    }
}
