//! Position analysis: composes extracted features with the engine
//! evaluation into a criticality score, a reason code and a
//! move-quality score.

use std::str::FromStr;

use chess::{Board, MoveGen};
use serde::{Deserialize, Serialize};
use tracing::warn;

use coach_core::{EngineEvaluation, Position};

use crate::board_utils::parse_uci_move;
use crate::features::{extract_features, PositionFeatures};
use crate::tactics::TacticalPattern;

/// Swing/magnitude thresholds (pawns)
const SWING_THRESHOLD: f64 = 0.5;
const EVAL_MAGNITUDE_THRESHOLD: f64 = 1.0;
const MATERIAL_THRESHOLD: f64 = 2.0;

/// Per-factor criticality caps
const SWING_CAP: f64 = 30.0;
const PATTERN_CAP: f64 = 25.0;
const THREAT_CAP: f64 = 20.0;
const KING_SAFETY_CAP: f64 = 15.0;
const MOVE_QUALITY_CAP: f64 = 10.0;
const EVAL_MAGNITUDE_CAP: f64 = 10.0;
const MATERIAL_CAP: f64 = 5.0;

/// Move quality constants
const QUALITY_UNKNOWN: f64 = 0.5;
const QUALITY_BEST: f64 = 1.0;
const QUALITY_ILLEGAL: f64 = 0.0;
/// Fixed heuristic for a legal move that is not the engine's best.
/// A real implementation would re-evaluate the resulting position.
const QUALITY_DEFAULT: f64 = 0.6;

/// Quality below which a move counts as suboptimal for criticality.
const QUALITY_CONCERN_THRESHOLD: f64 = 0.7;
/// Quality below which a move suggests a missed opponent idea.
const QUALITY_POOR_THRESHOLD: f64 = 0.6;

/// Why a position was flagged for coaching. The wire spellings are
/// contract values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    OppIntent,
    ThreatAwareness,
    Transition,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::OppIntent => "OPP_INTENT",
            ReasonCode::ThreatAwareness => "THREAT_AWARENESS",
            ReasonCode::Transition => "TRANSITION",
        }
    }
}

/// Full analysis of one sampled position. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionAnalysis {
    // Position
    pub fen: String,
    pub move_number: u32,
    pub half_move_number: u32,
    pub is_player_turn: bool,
    pub played_move: Option<String>,

    // Engine evaluation
    pub eval_score: f64,
    pub best_move: String,
    pub threats: Vec<String>,
    pub depth: u32,

    // Derived features
    pub material_balance: f64,
    pub tactical_patterns: Vec<TacticalPattern>,
    pub king_safety_score: f64,
    pub piece_activity_score: f64,

    // Criticality
    pub move_quality_score: f64,
    pub criticality_score: f64,
    pub reason_code: ReasonCode,
}

/// Analyze one position. `previous_eval` is the evaluation score of
/// the previously sampled position (None for the first in a
/// sequence); it only feeds the transition terms.
pub fn analyze_position(
    position: &Position,
    evaluation: &EngineEvaluation,
    previous_eval: Option<f64>,
) -> PositionAnalysis {
    let board = match Board::from_str(&position.fen) {
        Ok(b) => Some(b),
        Err(_) => {
            warn!(fen = %position.fen, "Unreadable FEN, scoring with neutral features");
            None
        }
    };

    let features = match &board {
        Some(b) => {
            // The subject is not always the side to move; recover the
            // subject color from the snapshot's turn flag.
            let side_to_move = b.side_to_move();
            let subject = if position.is_player_turn {
                side_to_move
            } else {
                !side_to_move
            };
            extract_features(b, subject)
        }
        None => PositionFeatures::unreadable(),
    };

    let move_quality_score = score_move_quality(
        board.as_ref(),
        position.played_move.as_deref(),
        &evaluation.best_move,
    );

    let criticality_score = criticality(
        evaluation,
        previous_eval,
        &features,
        move_quality_score,
    );

    let reason_code = classify_reason(
        evaluation,
        previous_eval,
        &features.tactical_patterns,
        move_quality_score,
    );

    PositionAnalysis {
        fen: position.fen.clone(),
        move_number: position.move_number,
        half_move_number: position.half_move_number,
        is_player_turn: position.is_player_turn,
        played_move: position.played_move.clone(),
        eval_score: evaluation.score,
        best_move: evaluation.best_move.clone(),
        threats: evaluation.threats.clone(),
        depth: evaluation.depth,
        material_balance: features.material_balance,
        tactical_patterns: features.tactical_patterns,
        king_safety_score: features.king_safety_score,
        piece_activity_score: features.piece_activity_score,
        move_quality_score,
        criticality_score,
        reason_code,
    }
}

/// Score the move played from this position against the engine's best
/// move for it. Both refer to the side to move in the snapshot, so a
/// played move that is illegal here signals inconsistent input data.
///
/// Either move unknown -> 0.5; exact match -> 1.0; unparseable -> 0.5;
/// illegal -> 0.0; otherwise the fixed 0.6 default.
pub fn score_move_quality(
    board: Option<&Board>,
    played_move: Option<&str>,
    best_move: &str,
) -> f64 {
    let played = match played_move {
        Some(p) if !p.is_empty() => p,
        _ => return QUALITY_UNKNOWN,
    };
    if best_move.is_empty() {
        return QUALITY_UNKNOWN;
    }

    if played.eq_ignore_ascii_case(best_move) {
        return QUALITY_BEST;
    }

    let board = match board {
        Some(b) => b,
        None => return QUALITY_UNKNOWN,
    };
    let mv = match parse_uci_move(played) {
        Some(m) => m,
        None => return QUALITY_UNKNOWN,
    };

    // Data inconsistency, scored rather than raised
    if !MoveGen::new_legal(board).any(|legal| legal == mv) {
        return QUALITY_ILLEGAL;
    }

    QUALITY_DEFAULT
}

/// Composite criticality in [0,100]: independently capped
/// contributions, summed, then clamped.
fn criticality(
    evaluation: &EngineEvaluation,
    previous_eval: Option<f64>,
    features: &PositionFeatures,
    move_quality: f64,
) -> f64 {
    let mut score = 0.0;

    // 1. Evaluation swing against the previous sampled position
    if let Some(prev) = previous_eval {
        let swing = (evaluation.score - prev).abs();
        if swing > SWING_THRESHOLD {
            score += (swing * 15.0).min(SWING_CAP);
        }
    }

    // 2. Tactical patterns on the board
    let pattern_count = features.tactical_patterns.len();
    if pattern_count > 0 {
        score += (pattern_count as f64 * 8.0).min(PATTERN_CAP);
    }

    // 3. Engine-reported threats
    let threat_count = evaluation.threats.len();
    if threat_count > 0 {
        score += (threat_count as f64 * 5.0).min(THREAT_CAP);
    }

    // 4. King safety trouble
    if features.king_safety_score < 50.0 {
        score += (50.0 - features.king_safety_score) / 50.0 * KING_SAFETY_CAP;
    }

    // 5. Suboptimal played move
    if move_quality < QUALITY_CONCERN_THRESHOLD {
        score += (QUALITY_CONCERN_THRESHOLD - move_quality) / QUALITY_CONCERN_THRESHOLD
            * MOVE_QUALITY_CAP;
    }

    // 6. Large evaluation magnitude
    let eval_abs = evaluation.score.abs();
    if eval_abs > EVAL_MAGNITUDE_THRESHOLD {
        score += ((eval_abs - EVAL_MAGNITUDE_THRESHOLD) * 5.0).min(EVAL_MAGNITUDE_CAP);
    }

    // 7. Material imbalance
    let material_abs = features.material_balance.abs();
    if material_abs > MATERIAL_THRESHOLD {
        score += (material_abs - MATERIAL_THRESHOLD).min(MATERIAL_CAP);
    }

    score.clamp(0.0, 100.0)
}

/// Classification, not a score: first matching rule wins.
fn classify_reason(
    evaluation: &EngineEvaluation,
    previous_eval: Option<f64>,
    patterns: &[TacticalPattern],
    move_quality: f64,
) -> ReasonCode {
    if !patterns.is_empty() {
        return ReasonCode::ThreatAwareness;
    }
    if !evaluation.threats.is_empty() {
        return ReasonCode::ThreatAwareness;
    }
    if let Some(prev) = previous_eval {
        if (evaluation.score - prev).abs() > SWING_THRESHOLD {
            return ReasonCode::Transition;
        }
    }
    if evaluation.score.abs() > EVAL_MAGNITUDE_THRESHOLD {
        return ReasonCode::OppIntent;
    }
    if move_quality < QUALITY_POOR_THRESHOLD {
        return ReasonCode::OppIntent;
    }
    ReasonCode::ThreatAwareness
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn position(fen: &str, played: Option<&str>) -> Position {
        Position {
            fen: fen.to_string(),
            move_number: 12,
            half_move_number: 24,
            is_player_turn: true,
            played_move: played.map(String::from),
        }
    }

    fn evaluation(score: f64, best: &str, threats: &[&str]) -> EngineEvaluation {
        EngineEvaluation {
            score,
            best_move: best.to_string(),
            threats: threats.iter().map(|t| t.to_string()).collect(),
            depth: 15,
        }
    }

    #[test]
    fn test_move_quality_unknown_when_either_side_missing() {
        let board = Board::default();
        assert_eq!(score_move_quality(Some(&board), None, "e2e4"), 0.5);
        assert_eq!(score_move_quality(Some(&board), Some(""), "e2e4"), 0.5);
        assert_eq!(score_move_quality(Some(&board), Some("e2e4"), ""), 0.5);
    }

    #[test]
    fn test_move_quality_best_move_match_is_case_insensitive() {
        let board = Board::default();
        assert_eq!(score_move_quality(Some(&board), Some("E2E4"), "e2e4"), 1.0);
    }

    #[test]
    fn test_move_quality_match_wins_even_if_not_legal_here() {
        // Equality is checked before legality
        let board = Board::default();
        assert_eq!(score_move_quality(Some(&board), Some("e7e5"), "e7e5"), 1.0);
    }

    #[test]
    fn test_move_quality_illegal_move_scores_zero() {
        let board = Board::default();
        assert_eq!(score_move_quality(Some(&board), Some("e2e5"), "d2d4"), 0.0);
    }

    #[test]
    fn test_move_quality_legal_but_not_best() {
        let board = Board::default();
        assert_eq!(score_move_quality(Some(&board), Some("g1f3"), "e2e4"), 0.6);
    }

    #[test]
    fn test_move_quality_unparseable_played_move() {
        let board = Board::default();
        assert_eq!(score_move_quality(Some(&board), Some("??"), "e2e4"), 0.5);
    }

    #[test]
    fn test_criticality_eval_magnitude_only() {
        // eval 1.5, no previous, no patterns/threats, best move played:
        // only the magnitude term fires: min(10, 0.5*5) = 2.5
        let pos = position(START_FEN, Some("e2e4"));
        let eval = evaluation(1.5, "e2e4", &[]);
        let analysis = analyze_position(&pos, &eval, None);

        assert_eq!(analysis.move_quality_score, 1.0);
        assert!((analysis.criticality_score - 2.5).abs() < 1e-9);
        assert_eq!(analysis.reason_code, ReasonCode::OppIntent);
    }

    #[test]
    fn test_criticality_swing_term_capped() {
        let pos = position(START_FEN, Some("e2e4"));
        let eval = evaluation(0.0, "e2e4", &[]);
        // Swing of 5 pawns caps at 30
        let analysis = analyze_position(&pos, &eval, Some(5.0));
        assert!((analysis.criticality_score - 30.0).abs() < 1e-9);
        assert_eq!(analysis.reason_code, ReasonCode::Transition);
    }

    #[test]
    fn test_criticality_threat_term() {
        let pos = position(START_FEN, Some("e2e4"));
        let eval = evaluation(0.0, "e2e4", &["Nxe5", "Qh4"]);
        let analysis = analyze_position(&pos, &eval, None);
        assert!((analysis.criticality_score - 10.0).abs() < 1e-9);
        assert_eq!(analysis.reason_code, ReasonCode::ThreatAwareness);
    }

    #[test]
    fn test_reason_patterns_beat_transition() {
        // A pinned knight plus a 2-pawn swing must classify as
        // THREAT_AWARENESS, never TRANSITION
        let pos = position("4k3/8/8/4n3/8/8/8/4R2K w - - 0 1", Some("h1g1"));
        let eval = evaluation(2.0, "e1e5", &[]);
        let analysis = analyze_position(&pos, &eval, Some(0.0));
        assert!(!analysis.tactical_patterns.is_empty());
        assert_eq!(analysis.reason_code, ReasonCode::ThreatAwareness);
    }

    #[test]
    fn test_engine_agreeing_with_played_move_scores_full_quality() {
        // The engine names the same move the player went on to play
        // from a quiet position: quality must be exactly 1.0, nothing
        // contributes to criticality, and the classification stays at
        // the default
        let pos = position(START_FEN, Some("g1f3"));
        let eval = evaluation(0.3, "g1f3", &[]);
        let analysis = analyze_position(&pos, &eval, None);
        assert_eq!(analysis.move_quality_score, 1.0);
        assert_eq!(analysis.criticality_score, 0.0);
        assert_eq!(analysis.reason_code, ReasonCode::ThreatAwareness);
    }

    #[test]
    fn test_legal_non_best_move_keeps_the_default_quality() {
        // A sensible move the engine merely disagrees with must land
        // on 0.6, not on the illegal-move 0.0
        let pos = position(START_FEN, Some("d2d4"));
        let eval = evaluation(0.3, "e2e4", &[]);
        let analysis = analyze_position(&pos, &eval, None);
        assert_eq!(analysis.move_quality_score, 0.6);
        assert_eq!(analysis.reason_code, ReasonCode::ThreatAwareness);
    }

    #[test]
    fn test_reason_default_is_threat_awareness() {
        let pos = position(START_FEN, Some("e2e4"));
        let eval = evaluation(0.0, "e2e4", &[]);
        let analysis = analyze_position(&pos, &eval, None);
        assert_eq!(analysis.reason_code, ReasonCode::ThreatAwareness);
    }

    #[test]
    fn test_scores_stay_in_range() {
        // Pile every factor on at once
        let pos = position("4k3/8/8/4n3/8/8/8/4R2K w - - 0 1", Some("a1a2"));
        let eval = evaluation(9.9, "e1e5", &["a", "b", "c", "d", "e"]);
        let analysis = analyze_position(&pos, &eval, Some(-9.9));
        assert!((0.0..=100.0).contains(&analysis.criticality_score));
        assert!((0.0..=1.0).contains(&analysis.move_quality_score));
        assert!((0.0..=100.0).contains(&analysis.king_safety_score));
        assert!((0.0..=100.0).contains(&analysis.piece_activity_score));
    }

    #[test]
    fn test_reason_code_spellings() {
        assert_eq!(ReasonCode::OppIntent.as_str(), "OPP_INTENT");
        assert_eq!(ReasonCode::ThreatAwareness.as_str(), "THREAT_AWARENESS");
        assert_eq!(ReasonCode::Transition.as_str(), "TRANSITION");
        assert_eq!(
            serde_json::to_string(&ReasonCode::Transition).unwrap(),
            "\"TRANSITION\""
        );
    }
}
