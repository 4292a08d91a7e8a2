//! Pipeline configuration from environment variables

use std::env;

use crate::error::AnalysisError;
use crate::pipeline::SelectionBounds;
use crate::selector::{DEFAULT_MAX_POSITIONS, DEFAULT_MIN_POSITIONS};

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Search depth requested from the engine APIs
    pub engine_depth: u32,

    /// Per-request timeout for engine API calls, in seconds
    pub engine_timeout_secs: u64,

    /// Selection floor/ceiling
    pub min_key_positions: usize,
    pub max_key_positions: usize,

    /// Skip engine APIs entirely and use the neutral provider
    pub offline: bool,
}

impl PipelineConfig {
    /// Load configuration from environment variables, with defaults
    /// for everything.
    pub fn load() -> Result<Self, AnalysisError> {
        let engine_depth = env::var("ENGINE_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);

        let engine_timeout_secs = env::var("ENGINE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let min_key_positions = env::var("MIN_KEY_POSITIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MIN_POSITIONS);

        let max_key_positions = env::var("MAX_KEY_POSITIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_POSITIONS);

        if min_key_positions == 0 || min_key_positions > max_key_positions {
            return Err(AnalysisError::Config(
                "MIN_KEY_POSITIONS must be >= 1 and <= MAX_KEY_POSITIONS",
            ));
        }

        let offline = env::var("ENGINE_OFFLINE").is_ok();

        Ok(Self {
            engine_depth,
            engine_timeout_secs,
            min_key_positions,
            max_key_positions,
            offline,
        })
    }

    pub fn bounds(&self) -> SelectionBounds {
        SelectionBounds {
            min_positions: self.min_key_positions,
            max_positions: self.max_key_positions,
        }
    }
}
