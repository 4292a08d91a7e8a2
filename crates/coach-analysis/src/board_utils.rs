//! Board utility functions for feature extraction

use chess::{BitBoard, Board, ChessMove, Color, File, Piece, Rank, Square, EMPTY};

/// Material worth in pawn units. King excluded from material counts.
pub fn piece_worth(piece: Piece) -> f64 {
    match piece {
        Piece::Pawn => 1.0,
        Piece::Knight => 3.0,
        Piece::Bishop => 3.2,
        Piece::Rook => 5.0,
        Piece::Queen => 9.0,
        Piece::King => 0.0,
    }
}

/// Minimum worth for a piece to count as a tactical target.
pub const VALUABLE_THRESHOLD: f64 = 3.0;

/// Squares attacked by the piece on `square`.
/// Equivalent of python-chess board.attacks(square).
pub fn attacks(board: &Board, square: Square) -> BitBoard {
    let piece = match board.piece_on(square) {
        Some(p) => p,
        None => return EMPTY,
    };

    match piece {
        Piece::Pawn => match board.color_on(square) {
            Some(color) => pawn_attacks(square, color),
            None => EMPTY,
        },
        Piece::Knight => chess::get_knight_moves(square),
        Piece::King => chess::get_king_moves(square),
        Piece::Bishop => chess::get_bishop_moves(square, *board.combined()),
        Piece::Rook => chess::get_rook_moves(square, *board.combined()),
        Piece::Queen => {
            chess::get_bishop_moves(square, *board.combined())
                | chess::get_rook_moves(square, *board.combined())
        }
    }
}

/// Pawn attack squares (diagonal captures only, not pushes).
pub fn pawn_attacks(square: Square, color: Color) -> BitBoard {
    let file = square.get_file().to_index();
    let rank = square.get_rank().to_index();

    let mut result = EMPTY;
    let forward: i32 = match color {
        Color::White => 1,
        Color::Black => -1,
    };

    let target_rank = rank as i32 + forward;
    if (0..8).contains(&target_rank) {
        for df in [-1i32, 1] {
            let target_file = file as i32 + df;
            if (0..8).contains(&target_file) {
                result |= BitBoard::from_square(Square::make_square(
                    Rank::from_index(target_rank as usize),
                    File::from_index(target_file as usize),
                ));
            }
        }
    }

    result
}

/// All pieces of `color` that attack `square`, given an explicit
/// occupancy mask. Passing a mask with a square cleared answers
/// "who would attack this square if that piece were removed".
pub fn attackers_with_occupancy(
    board: &Board,
    color: Color,
    square: Square,
    occupied: BitBoard,
) -> BitBoard {
    let color_pieces = *board.color_combined(color) & occupied;

    let mut result = EMPTY;

    // Pawns: reverse lookup. Pawn attacks FROM the target square
    // with the OPPOSITE color, then intersect with actual pawns
    result |= pawn_attacks(square, !color) & *board.pieces(Piece::Pawn) & color_pieces;

    result |= chess::get_knight_moves(square) & *board.pieces(Piece::Knight) & color_pieces;
    result |= chess::get_king_moves(square) & *board.pieces(Piece::King) & color_pieces;

    let diagonal = chess::get_bishop_moves(square, occupied);
    result |= diagonal & (*board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen)) & color_pieces;

    let straight = chess::get_rook_moves(square, occupied);
    result |= straight & (*board.pieces(Piece::Rook) | *board.pieces(Piece::Queen)) & color_pieces;

    result
}

/// All pieces of `color` that attack `square` on the current board.
/// Equivalent of python-chess board.attackers(color, square).
pub fn attackers(board: &Board, color: Color, square: Square) -> BitBoard {
    attackers_with_occupancy(board, color, square, *board.combined())
}

/// Find the king square for a color.
pub fn king_square(board: &Board, color: Color) -> Square {
    let king_bb = *board.pieces(Piece::King) & *board.color_combined(color);
    debug_assert_eq!(king_bb.popcnt(), 1);
    king_bb.to_square()
}

/// Parse a UCI from-to pair like "e2e4" or "e7e8q" into a ChessMove.
/// Returns None for anything that is not square-square[-promotion].
pub fn parse_uci_move(uci: &str) -> Option<ChessMove> {
    let bytes = uci.as_bytes();
    if bytes.len() < 4 || bytes.len() > 5 {
        return None;
    }
    if !(b'a'..=b'h').contains(&bytes[0])
        || !(b'1'..=b'8').contains(&bytes[1])
        || !(b'a'..=b'h').contains(&bytes[2])
        || !(b'1'..=b'8').contains(&bytes[3])
    {
        return None;
    }

    let from = Square::make_square(
        Rank::from_index((bytes[1] - b'1') as usize),
        File::from_index((bytes[0] - b'a') as usize),
    );
    let to = Square::make_square(
        Rank::from_index((bytes[3] - b'1') as usize),
        File::from_index((bytes[2] - b'a') as usize),
    );

    let promotion = if bytes.len() == 5 {
        match bytes[4] {
            b'q' | b'Q' => Some(Piece::Queen),
            b'r' | b'R' => Some(Piece::Rook),
            b'b' | b'B' => Some(Piece::Bishop),
            b'n' | b'N' => Some(Piece::Knight),
            _ => return None,
        }
    } else {
        None
    };

    Some(ChessMove::new(from, to, promotion))
}
