use serde::{Deserialize, Serialize};

/// Side the coached player is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::White => "WHITE",
            PlayerColor::Black => "BLACK",
        }
    }
}

/// One board snapshot produced by the replayer. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Full FEN of the snapshot (placement, turn, castling, en passant).
    pub fen: String,
    /// Number of the full move that produced this snapshot (1-based).
    pub move_number: u32,
    /// Half-move counter, incremented for either side (1-based).
    pub half_move_number: u32,
    /// Whether the coached player is the side to move in this snapshot.
    pub is_player_turn: bool,
    /// UCI from-square/to-square pair of the move the side to move
    /// went on to play from this snapshot, e.g. "e2e4". None for the
    /// final position of a game.
    pub played_move: Option<String>,
}

/// Evaluation of a single position from the external engine service.
/// Treated as untrusted, approximate data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineEvaluation {
    /// Score in pawns from the mover's perspective.
    pub score: f64,
    /// Engine's suggested best move ("" when unknown).
    pub best_move: String,
    /// Opponent threat descriptors, if the provider reports any.
    pub threats: Vec<String>,
    /// Search depth reached.
    pub depth: u32,
}

impl EngineEvaluation {
    /// Documented fallback used when the engine is unavailable.
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            best_move: String::new(),
            threats: Vec::new(),
            depth: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_evaluation() {
        let eval = EngineEvaluation::neutral();
        assert_eq!(eval.score, 0.0);
        assert!(eval.best_move.is_empty());
        assert!(eval.threats.is_empty());
        assert_eq!(eval.depth, 0);
    }
}
