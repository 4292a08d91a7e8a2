//! External engine evaluation providers.
//!
//! The selection engine only consumes [`EngineEvaluation`] values; this
//! crate supplies them, either from public Stockfish HTTP APIs or from
//! the neutral offline provider. Transport failures surface as
//! [`EngineError`]; the pipeline substitutes the neutral fallback and
//! keeps going.

pub mod client;
pub mod error;

pub use client::EngineClient;
pub use error::EngineError;

use coach_core::EngineEvaluation;

/// Seam between the pipeline and whatever produces evaluations.
#[allow(async_fn_in_trait)]
pub trait EvaluatePosition {
    /// Evaluate one FEN snapshot.
    async fn evaluate(&self, fen: &str) -> Result<EngineEvaluation, EngineError>;
}

/// Provider that always returns the documented neutral fallback.
/// Used for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct NeutralEngine;

impl EvaluatePosition for NeutralEngine {
    async fn evaluate(&self, _fen: &str) -> Result<EngineEvaluation, EngineError> {
        Ok(EngineEvaluation::neutral())
    }
}
