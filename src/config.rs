//! Search configuration.
//!
//! Bundles the per-algorithm configurations so they can be read from a single
//! JSON file. Missing sections and fields fall back to their defaults.
//!
//! ```json
//! {
//!   "constrained": { "allowed_modes": ["bus", "metro", "walk"], "max_cost": 20.0 },
//!   "rounds": { "max_rounds": 4 },
//!   "evolution": { "population_size": 60, "generations": 80, "seed": 7 }
//! }
//! ```

use crate::error::{Result, RouterError};
use crate::search::{ConstrainedConfig, EvolutionConfig, RoundConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub constrained: ConstrainedConfig,
    pub rounds: RoundConfig,
    pub evolution: EvolutionConfig,
}

impl SearchConfig {
    /// Read a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.constrained;
        if c.allowed_modes.is_empty() {
            return Err(RouterError::InvalidConfig("at least one mode must be allowed".into()));
        }
        c.validate()?;
        if self.rounds.modes.is_empty() {
            return Err(RouterError::InvalidConfig("bounded-round search needs at least one mode".into()));
        }
        self.evolution.validate()
    }
}
