//! Engine client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Engine API returned HTTP {0}")]
    Status(u16),

    #[error("Unusable engine response: {0}")]
    BadResponse(String),

    #[error("All engine endpoints failed")]
    AllEndpointsFailed,
}
