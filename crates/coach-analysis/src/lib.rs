//! Critical-position selection engine.
//!
//! Takes a finished game plus per-position engine evaluations and
//! picks the handful of positions most worth discussing afterwards:
//! feature extraction and tactical-pattern detection per snapshot,
//! criticality scoring and reason-code classification per position,
//! then a diversified selection across the game.

pub use chess;

pub mod analyzer;
pub mod board_utils;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod sampling;
pub mod selector;
pub mod tactics;

pub use analyzer::{analyze_position, PositionAnalysis, ReasonCode};
pub use config::PipelineConfig;
pub use error::AnalysisError;
pub use pipeline::{run_pipeline, SelectionBounds};
pub use sampling::sample_positions;
pub use selector::{select_key_positions, SelectedPosition};
pub use tactics::TacticalPattern;
