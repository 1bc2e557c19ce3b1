//! Engine configuration
//!
//! Every field has a default, so a partial JSON document is enough.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::ai::Difficulty;
use crate::board::Color;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ai: AiConfig,
    pub quality: QualityConfig,
    /// New sessions start ranked unless told otherwise.
    pub ranked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub color: Color,
    pub enabled: bool,
    pub difficulty: Difficulty,
    pub think_delay_ms: u64,
    /// Upper bound of the random tie-breaker added to each move score.
    pub jitter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Hanging a piece worth this much or more is tagged as the worst move.
    pub heavy_piece_value: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            quality: QualityConfig::default(),
            ranked: true,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            color: Color::Black,
            enabled: false,
            difficulty: Difficulty::Medium,
            think_delay_ms: 500,
            jitter: 0.5,
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            heavy_piece_value: 5,
        }
    }
}

impl AiConfig {
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The jitter must stay below the smallest score step (one pawn, ten
    /// points) or it would reorder moves instead of breaking ties.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..10.0).contains(&self.ai.jitter) {
            return Err(Error::Config(format!(
                "ai.jitter must be in [0, 10), got {}",
                self.ai.jitter
            )));
        }
        if self.quality.heavy_piece_value <= 0 {
            return Err(Error::Config(
                "quality.heavy_piece_value must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
