//! Per-position feature extraction, pure functions over one snapshot.
//!
//! Everything here is computed fresh from the board; there is no
//! incremental state carried between positions.

use chess::{Board, Color, Piece};

use crate::board_utils::{attackers, attacks, king_square, piece_worth};
use crate::tactics::{detect_patterns, TacticalPattern};

const KING_SAFETY_MAX: f64 = 100.0;
const CHECK_PENALTY: f64 = 30.0;
const ATTACKER_PENALTY: f64 = 10.0;
const PAWN_SHIELD_BONUS: f64 = 5.0;

/// Divisor for per-piece attack counts when normalizing activity.
const ACTIVITY_NORMALIZER: f64 = 8.0;

/// Derived features for one snapshot, from the subject player's
/// perspective.
#[derive(Debug, Clone)]
pub struct PositionFeatures {
    pub material_balance: f64,
    pub tactical_patterns: Vec<TacticalPattern>,
    pub king_safety_score: f64,
    pub piece_activity_score: f64,
}

impl PositionFeatures {
    /// Features for a snapshot that could not be read. Neutral values
    /// that add nothing to criticality.
    pub fn unreadable() -> Self {
        Self {
            material_balance: 0.0,
            tactical_patterns: Vec::new(),
            king_safety_score: KING_SAFETY_MAX,
            piece_activity_score: 0.0,
        }
    }
}

/// Extract all features for the subject side.
pub fn extract_features(board: &Board, subject: Color) -> PositionFeatures {
    PositionFeatures {
        material_balance: material_balance(board, subject),
        tactical_patterns: detect_patterns(board, subject),
        king_safety_score: king_safety(board, subject),
        piece_activity_score: piece_activity(board, subject),
    }
}

/// Material balance in pawn units, positive when the subject is ahead.
///
/// Summed as per-kind count differences so equal material is exactly
/// zero, with no float residue from the summation order.
pub fn material_balance(board: &Board, subject: Color) -> f64 {
    const KINDS: [Piece; 5] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ];

    let mut balance = 0.0;
    for kind in KINDS {
        let own = (*board.pieces(kind) & *board.color_combined(subject)).popcnt();
        let theirs = (*board.pieces(kind) & *board.color_combined(!subject)).popcnt();
        balance += piece_worth(kind) * (own as f64 - theirs as f64);
    }
    balance
}

/// King safety score in [0,100], 100 = safest.
///
/// Start at 100; -30 when the king's square is attacked, -10 per
/// distinct attacker, +5 per friendly pawn on the three shield files
/// on the adjacent rank toward the board edge the king defends.
pub fn king_safety(board: &Board, subject: Color) -> f64 {
    let king_sq = king_square(board, subject);
    let mut score = KING_SAFETY_MAX;

    let attacker_count = attackers(board, !subject, king_sq).popcnt();
    if attacker_count > 0 {
        score -= CHECK_PENALTY;
        score -= attacker_count as f64 * ATTACKER_PENALTY;
    }

    let king_rank = king_sq.get_rank().to_index() as i32;
    let king_file = king_sq.get_file().to_index() as i32;
    let shield_rank = match subject {
        Color::White => king_rank - 1,
        Color::Black => king_rank + 1,
    };

    if (0..8).contains(&shield_rank) {
        for df in -1i32..=1 {
            let file = king_file + df;
            if !(0..8).contains(&file) {
                continue;
            }
            let sq = chess::Square::make_square(
                chess::Rank::from_index(shield_rank as usize),
                chess::File::from_index(file as usize),
            );
            if board.piece_on(sq) == Some(Piece::Pawn) && board.color_on(sq) == Some(subject) {
                score += PAWN_SHIELD_BONUS;
            }
        }
    }

    score.clamp(0.0, 100.0)
}

/// Piece activity score in [0,100]: mean attacked-square count per
/// subject piece, normalized. A side with no pieces scores 0.
pub fn piece_activity(board: &Board, subject: Color) -> f64 {
    let mut total_attacks = 0u32;
    let mut piece_count = 0u32;

    for sq in *board.color_combined(subject) {
        piece_count += 1;
        total_attacks += attacks(board, sq).popcnt();
    }

    if piece_count == 0 {
        return 0.0;
    }

    let avg = total_attacks as f64 / piece_count as f64;
    (avg / ACTIVITY_NORMALIZER * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_material_balance_exactly_zero_at_start() {
        // Equal material must cancel exactly, despite the fractional
        // bishop value
        let board = Board::default();
        assert_eq!(material_balance(&board, Color::White), 0.0);
        assert_eq!(material_balance(&board, Color::Black), 0.0);
    }

    #[test]
    fn test_material_balance_up_a_rook() {
        // White has an extra rook
        let board = Board::from_str("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(material_balance(&board, Color::White), 5.0);
        assert_eq!(material_balance(&board, Color::Black), -5.0);
    }

    #[test]
    fn test_material_balance_uses_fractional_bishop() {
        // Bishop vs knight
        let board = Board::from_str("1n2k3/8/8/8/8/8/8/1B2K3 w - - 0 1").unwrap();
        let balance = material_balance(&board, Color::White);
        assert!((balance - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_king_safety_check_with_two_attackers_no_shield() {
        // Black king e8 in check from the e1 rook and the d6 knight:
        // 100 - 30 - 2*10 = 50
        let board = Board::from_str("4k3/8/3N4/8/8/8/8/4R1K1 b - - 0 1").unwrap();
        assert_eq!(king_safety(&board, Color::Black), 50.0);
    }

    #[test]
    fn test_king_safety_shield_offsets_check_penalty() {
        // White king g3 checked by the g8 rook, with pawns f2/g2/h2 on
        // the shield rank: 100 - 30 - 10 + 3*5 = 75
        let board = Board::from_str("k5r1/8/8/8/8/6K1/5PPP/8 w - - 0 1").unwrap();
        assert_eq!(king_safety(&board, Color::White), 75.0);
    }

    #[test]
    fn test_king_safety_shield_orientation_is_toward_own_edge() {
        // The shield rank sits between the king and the edge it
        // defends; for a white king on the back rank it is off-board,
        // so these pawns do not count.
        let board = Board::from_str("4k3/8/8/8/8/5PPP/8/6K1 w - - 0 1").unwrap();
        assert_eq!(king_safety(&board, Color::White), 100.0);
    }

    #[test]
    fn test_king_safety_double_check_with_partial_shield() {
        // White king e3 in double check from the e8 rook and d5 knight,
        // one shield pawn on e2: 100 - 30 - 20 + 5 = 55
        let board = Board::from_str("4r2k/8/8/3n4/8/4K3/4P3/8 w - - 0 1").unwrap();
        assert_eq!(king_safety(&board, Color::White), 55.0);
    }

    #[test]
    fn test_piece_activity_lone_king() {
        // Lone white king in the corner attacks 3 squares: 3/8*100
        let board = Board::from_str("4k3/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let activity = piece_activity(&board, Color::White);
        assert!((activity - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_piece_activity_range() {
        let board = Board::default();
        let activity = piece_activity(&board, Color::White);
        assert!((0.0..=100.0).contains(&activity));
    }
}
