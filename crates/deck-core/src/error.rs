use thiserror::Error;

/// Errors that can occur while setting up a deck
///
/// Navigation itself never fails; out-of-range requests are dropped silently.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
