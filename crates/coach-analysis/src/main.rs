//! Post-game key-position analyzer
//!
//! Reads a PGN (or bare movetext) file, runs the critical-position
//! selection pipeline and prints the selection as JSON.

use std::path::PathBuf;

use tracing::info;

use coach_analysis::config::PipelineConfig;
use coach_analysis::pipeline::run_pipeline;
use coach_core::movetext::extract_header;
use coach_core::PlayerColor;
use coach_engine::{EngineClient, NeutralEngine};

struct CliArgs {
    pgn_path: PathBuf,
    color: PlayerColor,
    offline: bool,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut pgn_path = None;
    let mut color = PlayerColor::White;
    let mut offline = false;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--color" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| "--color needs a value".to_string())?;
                color = match value.to_lowercase().as_str() {
                    "white" => PlayerColor::White,
                    "black" => PlayerColor::Black,
                    other => return Err(format!("Unknown color: {other}")),
                };
                i += 2;
            }
            "--offline" => {
                offline = true;
                i += 1;
            }
            other if pgn_path.is_none() => {
                pgn_path = Some(PathBuf::from(other));
                i += 1;
            }
            other => return Err(format!("Unexpected argument: {other}")),
        }
    }

    let pgn_path = pgn_path.ok_or_else(|| {
        "Usage: analyze-game <pgn-file> [--color white|black] [--offline]".to_string()
    })?;

    Ok(CliArgs {
        pgn_path,
        color,
        offline,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let args = parse_args().map_err(|e| anyhow::anyhow!(e))?;
    let config = PipelineConfig::load()?;

    let movetext = std::fs::read_to_string(&args.pgn_path)?;
    info!(path = %args.pgn_path.display(), color = args.color.as_str(), "Analyzing game");

    // PGN input carries the player names; bare movetext does not
    let white = extract_header(&movetext, "White");
    let black = extract_header(&movetext, "Black");
    if white.is_some() || black.is_some() {
        info!(
            white = white.as_deref().unwrap_or("?"),
            black = black.as_deref().unwrap_or("?"),
            "Game headers"
        );
    }

    let selection = if args.offline || config.offline {
        info!("Offline mode: using neutral evaluations");
        run_pipeline(&NeutralEngine, &movetext, args.color, config.bounds()).await?
    } else {
        let engine = EngineClient::new(config.engine_timeout_secs, Some(config.engine_depth))?;
        run_pipeline(&engine, &movetext, args.color, config.bounds()).await?
    };

    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(())
}
