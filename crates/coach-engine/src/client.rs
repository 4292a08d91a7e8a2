//! HTTP client for public Stockfish evaluation APIs.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use coach_core::EngineEvaluation;

use crate::error::EngineError;
use crate::EvaluatePosition;

const STOCKFISH_ONLINE_URL: &str = "https://stockfish.online/api/s/v2.php";
const CHESS_API_URL: &str = "https://chess-api.com/v1";

/// Depth supported by stockfish.online.
const DEFAULT_DEPTH: u32 = 15;

pub struct EngineClient {
    client: Client,
    depth: u32,
}

impl EngineClient {
    pub fn new(timeout_secs: u64, depth: Option<u32>) -> Result<Self, EngineError> {
        let client = Client::builder()
            .user_agent("ChessCoach/1.0")
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            depth: depth.unwrap_or(DEFAULT_DEPTH),
        })
    }

    /// Primary endpoint: stockfish.online, GET with query parameters.
    /// Response shape: `{"evaluation": f64, "bestmove": "bestmove e2e4 ..."}`.
    async fn query_stockfish_online(&self, fen: &str) -> Result<EngineEvaluation, EngineError> {
        let resp = self
            .client
            .get(STOCKFISH_ONLINE_URL)
            .query(&[("fen", fen), ("depth", &self.depth.to_string())])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(EngineError::Status(resp.status().as_u16()));
        }

        let data: Value = resp.json().await?;
        debug!(?data, "stockfish.online response");

        // "bestmove" carries the raw engine line, e.g. "bestmove e2e4 ponder e7e5"
        let best_move = data
            .get("bestmove")
            .and_then(|v| v.as_str())
            .map(|raw| {
                let mut parts = raw.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some("bestmove"), Some(mv)) => mv.to_string(),
                    (Some(mv), _) => mv.to_string(),
                    _ => String::new(),
                }
            })
            .unwrap_or_default();

        let score = match data.get("evaluation") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        };

        if best_move.is_empty() && score == 0.0 {
            return Err(EngineError::BadResponse(
                "no bestmove or evaluation in payload".into(),
            ));
        }

        Ok(EngineEvaluation {
            score,
            best_move,
            // stockfish.online does not report threats
            threats: Vec::new(),
            depth: self.depth,
        })
    }

    /// Secondary endpoint: chess-api.com, POST JSON body.
    async fn query_chess_api(&self, fen: &str) -> Result<EngineEvaluation, EngineError> {
        let payload = serde_json::json!({
            "fen": fen,
            "depth": self.depth,
            "max_time": 5,
        });

        let resp = self.client.post(CHESS_API_URL).json(&payload).send().await?;
        if !resp.status().is_success() {
            return Err(EngineError::Status(resp.status().as_u16()));
        }

        let data: Value = resp.json().await?;
        debug!(?data, "chess-api.com response");

        let score = data
            .get("eval")
            .or_else(|| data.get("evaluation"))
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let best_move = data
            .get("move")
            .or_else(|| data.get("best_move"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let threats = data
            .get("threats")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|t| t.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        let depth = data
            .get("depth")
            .and_then(|v| v.as_u64())
            .map(|d| d as u32)
            .unwrap_or(self.depth);

        if best_move.is_empty() {
            return Err(EngineError::BadResponse("no move in payload".into()));
        }

        Ok(EngineEvaluation {
            score,
            best_move,
            threats,
            depth,
        })
    }
}

impl EvaluatePosition for EngineClient {
    async fn evaluate(&self, fen: &str) -> Result<EngineEvaluation, EngineError> {
        match self.query_stockfish_online(fen).await {
            Ok(eval) => return Ok(eval),
            Err(e) => warn!(error = %e, "stockfish.online failed, trying chess-api.com"),
        }
        match self.query_chess_api(fen).await {
            Ok(eval) => Ok(eval),
            Err(e) => {
                warn!(error = %e, "chess-api.com failed");
                Err(EngineError::AllEndpointsFailed)
            }
        }
    }
}
