//! Crate error type

use std::fmt;

/// Errors that can stop the game from starting or reconfiguring
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// No usable graphics adapter/context (fatal, no fallback)
    GraphicsUnavailable(String),

    /// Surface creation or device request failed
    Surface(String),

    /// A required DOM element or browser API is missing
    Dom(String),

    /// Tuning values failed to parse or validate
    InvalidTuning(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameError::GraphicsUnavailable(reason) => {
                write!(f, "Graphics not available: {}", reason)
            }
            GameError::Surface(reason) => write!(f, "Surface error: {}", reason),
            GameError::Dom(reason) => write!(f, "DOM error: {}", reason),
            GameError::InvalidTuning(reason) => write!(f, "Invalid tuning: {}", reason),
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(error: serde_json::Error) -> Self {
        GameError::InvalidTuning(error.to_string())
    }
}
