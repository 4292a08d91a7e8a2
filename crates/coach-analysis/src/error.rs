//! Analysis error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Movetext parse error: {0}")]
    Parse(#[from] coach_core::ParseError),

    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Engine error: {0}")]
    Engine(#[from] coach_engine::EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
