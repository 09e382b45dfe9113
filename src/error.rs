//! Error type shared by the game controller and the route handlers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Missing {0} parameter")]
    MissingParam(&'static str),
    #[error("Invalid {name} parameter: {value}")]
    InvalidParam { name: &'static str, value: String },
    #[error("A round is already running")]
    RoundInProgress,
    #[error("Configuration can only change between rounds")]
    ConfigLocked,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Malformed configuration JSON: {source}")]
    ConfigJson {
        #[from]
        source: serde_json::Error,
    },
}
