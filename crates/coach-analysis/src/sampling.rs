//! Sampling policy: which replayed positions get an (expensive)
//! external engine evaluation.

use coach_core::Position;

/// Positions before this full move belong to the opening and are
/// skipped.
pub const ELIGIBLE_FROM_MOVE: u32 = 10;

/// Upper bound on engine evaluation calls per game.
pub const MAX_SAMPLED_POSITIONS: usize = 10;

/// Pick the positions to analyze.
///
/// Eligible positions are at or after full move 10 with the coached
/// player to move. When that filter matches nothing, the first
/// post-opening position is used regardless of turn. Large eligible
/// sets are sampled evenly at a stride of n/10, capped at 10.
pub fn sample_positions(positions: &[Position]) -> Vec<Position> {
    let eligible: Vec<&Position> = positions
        .iter()
        .filter(|p| p.move_number >= ELIGIBLE_FROM_MOVE && p.is_player_turn)
        .collect();

    let eligible: Vec<&Position> = if eligible.is_empty() {
        positions
            .iter()
            .filter(|p| p.move_number >= ELIGIBLE_FROM_MOVE)
            .take(1)
            .collect()
    } else {
        eligible
    };

    if eligible.len() > MAX_SAMPLED_POSITIONS {
        let stride = eligible.len() / MAX_SAMPLED_POSITIONS;
        eligible
            .iter()
            .step_by(stride)
            .take(MAX_SAMPLED_POSITIONS)
            .map(|p| (*p).clone())
            .collect()
    } else {
        eligible.into_iter().cloned().collect()
    }
}
