//! Draw engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::Result;

/// Tunables for draw operations and the world update loop.
///
/// Every field has a default, so a config file only needs to list the values
/// it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Maximum undo records kept per draw operation.
    pub max_undo_blocks: usize,
    /// Coordinates a single operation may visit in one batch before yielding.
    pub max_blocks_per_batch: usize,
    /// Block updates shared between all queued operations of a world per tick.
    pub blocks_per_tick: usize,
    /// Update loop period in milliseconds.
    pub tick_interval_ms: u64,
    /// Message the player a summary when an operation ends.
    pub announce_completion: bool,
    /// Write a summary line to the log when an operation ends.
    pub log_completion: bool,
    /// Number of clipboard slots per player.
    pub clipboard_slots: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_undo_blocks: 2_000_000,
            max_blocks_per_batch: 25_000,
            blocks_per_tick: 100_000,
            tick_interval_ms: 50,
            announce_completion: true,
            log_completion: true,
            clipboard_slots: 5,
        }
    }
}

impl DrawConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Load a config if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No draw config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Update loop period.
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
