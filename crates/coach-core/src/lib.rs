//! Shared types and game replay for the post-game coaching pipeline.
//!
//! Parses movetext (or full PGN) into SAN moves and replays them into
//! per-ply position snapshots that the analysis crate consumes.

pub mod error;
pub mod movetext;
pub mod replay;
pub mod types;

pub use error::ParseError;
pub use replay::GameReplay;
pub use types::{EngineEvaluation, PlayerColor, Position};
