//! Structural tactical-pattern detection: fork, pin, skewer,
//! discovered attack. Detected combinatorially over the snapshot, not
//! via search. The skewer check deliberately reuses pin detection
//! restricted to valuable, currently-attacked pieces; that
//! approximation over-reports and is kept as-is.

use chess::{BitBoard, Board, Color, MoveGen, Piece, EMPTY};
use serde::{Deserialize, Serialize};

use crate::board_utils::{
    attackers, attackers_with_occupancy, attacks, king_square, piece_worth, VALUABLE_THRESHOLD,
};

/// Fixed tactical-pattern vocabulary. The wire spellings are contract
/// values consumed by downstream question generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticalPattern {
    Fork,
    Pin,
    Skewer,
    DiscoveredAttack,
}

impl TacticalPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            TacticalPattern::Fork => "fork",
            TacticalPattern::Pin => "pin",
            TacticalPattern::Skewer => "skewer",
            TacticalPattern::DiscoveredAttack => "discovered_attack",
        }
    }
}

/// Detect all tactical patterns for the subject side. Each tag appears
/// at most once.
pub fn detect_patterns(board: &Board, subject: Color) -> Vec<TacticalPattern> {
    let mut patterns = Vec::new();

    if has_fork(board, subject) {
        patterns.push(TacticalPattern::Fork);
    }
    if has_pin(board, subject) {
        patterns.push(TacticalPattern::Pin);
    }
    if has_skewer(board, subject) {
        patterns.push(TacticalPattern::Skewer);
    }
    if has_discovered_attack(board, subject) {
        patterns.push(TacticalPattern::DiscoveredAttack);
    }

    patterns
}

/// A subject piece simultaneously attacks two or more opponent pieces
/// each worth at least 3 points.
fn has_fork(board: &Board, subject: Color) -> bool {
    let opponent_pieces = *board.color_combined(!subject);

    for sq in *board.color_combined(subject) {
        let targets = attacks(board, sq) & opponent_pieces;
        let mut valuable = 0;
        for target_sq in targets {
            if let Some(piece) = board.piece_on(target_sq) {
                if piece_worth(piece) >= VALUABLE_THRESHOLD {
                    valuable += 1;
                }
            }
        }
        if valuable >= 2 {
            return true;
        }
    }
    false
}

/// Would removing the piece on `sq` expose its own king to a subject
/// attack that does not exist on the current board?
fn is_pinned(board: &Board, sq: chess::Square, subject: Color) -> bool {
    let owner = !subject;
    let king_sq = king_square(board, owner);
    if sq == king_sq {
        return false;
    }

    let cleared = *board.combined() ^ BitBoard::from_square(sq);
    let exposed = attackers_with_occupancy(board, subject, king_sq, cleared)
        & !attackers(board, subject, king_sq);
    exposed != EMPTY
}

/// Some opponent piece is pinned against its king.
fn has_pin(board: &Board, subject: Color) -> bool {
    for sq in *board.color_combined(!subject) {
        if board.piece_on(sq) == Some(Piece::King) {
            continue;
        }
        if is_pinned(board, sq, subject) {
            return true;
        }
    }
    false
}

/// Pin detection narrowed to valuable opponent pieces that are already
/// attacked by the subject side.
fn has_skewer(board: &Board, subject: Color) -> bool {
    for sq in *board.color_combined(!subject) {
        let piece = match board.piece_on(sq) {
            Some(p) => p,
            None => continue,
        };
        if piece_worth(piece) < VALUABLE_THRESHOLD {
            continue;
        }
        if attackers(board, subject, sq) == EMPTY {
            continue;
        }
        if is_pinned(board, sq, subject) {
            return true;
        }
    }
    false
}

/// Valuable opponent squares currently attacked by the subject side.
fn attacked_valuable_squares(board: &Board, subject: Color) -> BitBoard {
    let mut result = EMPTY;
    for sq in *board.color_combined(!subject) {
        let piece = match board.piece_on(sq) {
            Some(p) => p,
            None => continue,
        };
        if piece_worth(piece) >= VALUABLE_THRESHOLD && attackers(board, subject, sq) != EMPTY {
            result |= BitBoard::from_square(sq);
        }
    }
    result
}

/// Some legal subject move leaves an already-placed subject piece
/// (not the moved one) attacking a valuable opponent piece that was
/// not attacked before. Each candidate move is tried on a copy of the
/// board; the snapshot itself is never mutated.
fn has_discovered_attack(board: &Board, subject: Color) -> bool {
    // Legal moves only exist for the side to move
    if board.side_to_move() != subject {
        return false;
    }

    let already_attacked = attacked_valuable_squares(board, subject);

    for mv in MoveGen::new_legal(board) {
        let after = board.make_move_new(mv);
        let moved_to = BitBoard::from_square(mv.get_dest());

        for target_sq in *after.color_combined(!subject) {
            let piece = match after.piece_on(target_sq) {
                Some(p) => p,
                None => continue,
            };
            if piece_worth(piece) < VALUABLE_THRESHOLD {
                continue;
            }
            if (already_attacked & BitBoard::from_square(target_sq)) != EMPTY {
                continue;
            }
            if (attackers(&after, subject, target_sq) & !moved_to) != EMPTY {
                return true;
            }
        }
    }
    false
}
