//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No moves found in movetext")]
    NoMoves,
}
