use std::time::Duration;

use crate::config::{GameConfig, Validate};

/// Immutable per-session grid parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub size: usize,
    pub tick_interval: Duration,
}

impl GridConfig {
    pub fn new(size: usize, tick_interval_ms: u64) -> Result<Self, String> {
        if size == 0 {
            return Err("Grid size must be positive".to_string());
        }
        if tick_interval_ms == 0 {
            return Err("Tick interval must be positive".to_string());
        }
        Ok(Self {
            size,
            tick_interval: Duration::from_millis(tick_interval_ms),
        })
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }
}

impl TryFrom<&GameConfig> for GridConfig {
    type Error = String;

    fn try_from(config: &GameConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        GridConfig::new(config.grid_size as usize, config.tick_interval_ms as u64)
    }
}
