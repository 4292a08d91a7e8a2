//! Key-position selection: rank by criticality, then pick a
//! diversified subset spread across the game.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::analyzer::{PositionAnalysis, ReasonCode};

pub const DEFAULT_MIN_POSITIONS: usize = 3;
pub const DEFAULT_MAX_POSITIONS: usize = 5;

/// Candidates closer than this many full moves to an already-selected
/// position are skipped while the floor is satisfied.
const MIN_MOVE_SPACING: i64 = 3;

/// One selected coaching position. `order` is the 0-based
/// presentation order downstream consumers persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedPosition {
    pub order: u32,
    pub reason_code: ReasonCode,
    pub analysis: PositionAnalysis,
}

/// Indices into `analyses`, sorted by descending criticality. The sort
/// is stable: ties keep their original (game) order.
fn rank_by_criticality(analyses: &[PositionAnalysis]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..analyses.len()).collect();
    ranked.sort_by(|&a, &b| {
        analyses[b]
            .criticality_score
            .partial_cmp(&analyses[a].criticality_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Select between `min_count` and `max_count` positions for coaching.
///
/// Two passes over the ranked list: a greedy pass that enforces the
/// move-spacing rule (ignored while the selection is still under the
/// floor), then a top-up pass without the spacing rule if the floor was
/// not reached. Fewer than `min_count` inputs simply yield everything;
/// empty input yields an empty selection.
pub fn select_key_positions(
    analyses: &[PositionAnalysis],
    min_count: usize,
    max_count: usize,
) -> Vec<SelectedPosition> {
    if analyses.is_empty() {
        return Vec::new();
    }

    let ranked = rank_by_criticality(analyses);
    let mut selected: Vec<usize> = Vec::new();

    for &idx in &ranked {
        if selected.len() >= max_count {
            break;
        }
        let move_number = analyses[idx].move_number as i64;
        let too_close = selected
            .iter()
            .any(|&s| (analyses[s].move_number as i64 - move_number).abs() < MIN_MOVE_SPACING);
        if !too_close || selected.len() < min_count {
            selected.push(idx);
        }
    }

    // Top up from the ranking, exclusion by index identity
    if selected.len() < min_count {
        for &idx in &ranked {
            if selected.len() >= min_count {
                break;
            }
            if !selected.contains(&idx) {
                selected.push(idx);
            }
        }
    }

    selected.truncate(max_count);

    selected
        .into_iter()
        .enumerate()
        .map(|(order, idx)| SelectedPosition {
            order: order as u32,
            reason_code: analyses[idx].reason_code,
            analysis: analyses[idx].clone(),
        })
        .collect()
}
