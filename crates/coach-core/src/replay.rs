//! Board replayer: movetext in, one position snapshot per half-move out.

use shakmaty::{fen::Fen, san::San, CastlingMode, Chess, Color, EnPassantMode, Position as _};
use tracing::warn;

use crate::error::ParseError;
use crate::movetext;
use crate::types::{PlayerColor, Position};

/// A parsed game ready for replay. Holds the SAN move list and the
/// coached player's side; `positions()` can be called any number of
/// times to walk the game again from the start.
#[derive(Debug, Clone)]
pub struct GameReplay {
    moves: Vec<String>,
    subject: PlayerColor,
}

impl GameReplay {
    /// Parse movetext (or a full PGN) into a replayable game.
    /// Fails only when no moves at all can be extracted; a game that is
    /// merely short is a valid replay with few positions.
    pub fn parse(movetext: &str, subject: PlayerColor) -> Result<Self, ParseError> {
        let moves = movetext::parse_moves(movetext)?;
        Ok(Self { moves, subject })
    }

    /// Number of half-moves extracted from the movetext.
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Lazy walk over the game, yielding the snapshot after each
    /// half-move in game order. Each snapshot carries the move the side
    /// to move went on to play from it, so the engine's best move and
    /// the played move always refer to the same side. A SAN token that
    /// is illegal on the current board ends the sequence early.
    pub fn positions(&self) -> Positions<'_> {
        Positions {
            moves: &self.moves,
            subject: self.subject,
            pos: Chess::default(),
            ply: 0,
            halted: false,
        }
    }
}

/// Iterator over replayed positions. See [`GameReplay::positions`].
pub struct Positions<'a> {
    moves: &'a [String],
    subject: PlayerColor,
    pos: Chess,
    ply: usize,
    halted: bool,
}

impl Iterator for Positions<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.halted {
            return None;
        }
        let san_str = self.moves.get(self.ply)?;

        let san: San = match san_str.parse() {
            Ok(s) => s,
            Err(_) => {
                warn!(san = %san_str, ply = self.ply + 1, "Unreadable SAN token, truncating replay");
                self.halted = true;
                return None;
            }
        };
        let mv = match san.to_move(&self.pos) {
            Ok(m) => m,
            Err(_) => {
                warn!(san = %san_str, ply = self.ply + 1, "Illegal move, truncating replay");
                self.halted = true;
                return None;
            }
        };

        self.pos.play_unchecked(mv);
        self.ply += 1;

        // The move made from this snapshot is the next one in the
        // game; the final snapshot has none.
        let played_move = self.moves.get(self.ply).and_then(|next_san| {
            let san: San = next_san.parse().ok()?;
            let mv = san.to_move(&self.pos).ok()?;
            Some(mv.to_uci(CastlingMode::Standard).to_string())
        });

        let fen = Fen::from_position(&self.pos, EnPassantMode::Legal).to_string();
        let half_move_number = self.ply as u32;
        let player_side = match self.subject {
            PlayerColor::White => Color::White,
            PlayerColor::Black => Color::Black,
        };

        Some(Position {
            fen,
            move_number: (half_move_number + 1) / 2,
            half_move_number,
            is_player_turn: self.pos.turn() == player_side,
            played_move,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_basic() {
        let replay = GameReplay::parse("1. e4 e5 2. Nf3", PlayerColor::White).unwrap();
        assert_eq!(replay.move_count(), 3);
        let positions: Vec<Position> = replay.positions().collect();
        assert_eq!(positions.len(), 3);

        assert_eq!(positions[0].half_move_number, 1);
        assert_eq!(positions[0].move_number, 1);
        // The snapshot after 1. e4 pairs with the move Black played
        // from it
        assert_eq!(positions[0].played_move.as_deref(), Some("e7e5"));
        assert!(positions[0].fen.starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
        // After White's move it is Black to move
        assert!(!positions[0].is_player_turn);

        assert_eq!(positions[1].move_number, 1);
        assert!(positions[1].is_player_turn);
        assert_eq!(positions[1].played_move.as_deref(), Some("g1f3"));

        assert_eq!(positions[2].move_number, 2);
        // Nothing was played from the final snapshot
        assert!(positions[2].played_move.is_none());
    }

    #[test]
    fn test_replay_is_restartable() {
        let replay = GameReplay::parse("1. d4 d5 2. c4", PlayerColor::Black).unwrap();
        let first: Vec<String> = replay.positions().map(|p| p.fen).collect();
        let second: Vec<String> = replay.positions().map(|p| p.fen).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_replay_truncates_at_illegal_move() {
        // Second "e4" is not a legal move; the replay stops after the prefix.
        let replay = GameReplay::parse("1. e4 e4", PlayerColor::White).unwrap();
        let positions: Vec<Position> = replay.positions().collect();
        assert_eq!(positions.len(), 1);
        // The illegal continuation never becomes a played move
        assert!(positions[0].played_move.is_none());
    }

    #[test]
    fn test_parse_failure_is_distinct_from_short_game() {
        assert!(GameReplay::parse("no chess here", PlayerColor::White).is_err());
        // One real move is a valid, short game
        let replay = GameReplay::parse("1. e4", PlayerColor::White).unwrap();
        assert_eq!(replay.positions().count(), 1);
    }

    #[test]
    fn test_castling_uci_encoding() {
        let replay = GameReplay::parse(
            "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O",
            PlayerColor::White,
        )
        .unwrap();
        let positions: Vec<Position> = replay.positions().collect();
        assert_eq!(positions.len(), 7);
        // Castling was played from the snapshot after 3...Bc5
        assert_eq!(positions[5].played_move.as_deref(), Some("e1g1"));
        assert!(positions[6].played_move.is_none());
    }
}
