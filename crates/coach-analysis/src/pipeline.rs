//! Pipeline orchestrator: replay, sample, evaluate, analyze, select.

use tracing::{info, warn};

use coach_core::{EngineEvaluation, GameReplay, PlayerColor, Position};
use coach_engine::EvaluatePosition;

use crate::analyzer::{analyze_position, PositionAnalysis};
use crate::error::AnalysisError;
use crate::sampling::sample_positions;
use crate::selector::{
    select_key_positions, SelectedPosition, DEFAULT_MAX_POSITIONS, DEFAULT_MIN_POSITIONS,
};

/// Selection bounds for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct SelectionBounds {
    pub min_positions: usize,
    pub max_positions: usize,
}

impl Default for SelectionBounds {
    fn default() -> Self {
        Self {
            min_positions: DEFAULT_MIN_POSITIONS,
            max_positions: DEFAULT_MAX_POSITIONS,
        }
    }
}

/// Run the full selection pipeline over one finished game.
///
/// Parse failure is an error; a valid game with no post-opening
/// positions is an empty selection. Engine failures never abort the
/// run: each failed call falls back to the neutral evaluation.
pub async fn run_pipeline<E: EvaluatePosition>(
    engine: &E,
    movetext: &str,
    subject: PlayerColor,
    bounds: SelectionBounds,
) -> Result<Vec<SelectedPosition>, AnalysisError> {
    let replay = GameReplay::parse(movetext, subject)?;
    let positions: Vec<Position> = replay.positions().collect();
    // replayed < parsed when the movetext went illegal mid-game
    info!(
        parsed_moves = replay.move_count(),
        replayed = positions.len(),
        subject = subject.as_str(),
        "Replayed game"
    );

    let sampled = sample_positions(&positions);
    if sampled.is_empty() {
        info!("No post-opening positions to analyze");
        return Ok(Vec::new());
    }
    info!(sampled = sampled.len(), "Sampled positions for evaluation");

    // The swing term depends on the previous sampled evaluation, so
    // this loop must run in game order with the score threaded through.
    let mut analyses: Vec<PositionAnalysis> = Vec::with_capacity(sampled.len());
    let mut previous_eval: Option<f64> = None;

    for position in &sampled {
        let evaluation = match engine.evaluate(&position.fen).await {
            Ok(eval) => eval,
            Err(e) => {
                warn!(
                    move_number = position.move_number,
                    error = %e,
                    "Engine evaluation failed, continuing with neutral fallback"
                );
                EngineEvaluation::neutral()
            }
        };

        let analysis = analyze_position(position, &evaluation, previous_eval);
        previous_eval = Some(analysis.eval_score);
        analyses.push(analysis);
    }

    let selection = select_key_positions(&analyses, bounds.min_positions, bounds.max_positions);
    info!(selected = selection.len(), "Key positions selected");
    Ok(selection)
}
