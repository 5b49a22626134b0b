//! Error types for the launcher and the playable games.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GamesError
{
    #[error("Unknown game '{0}'. Run with --help.")]
    UnknownGame(String),

    #[error("'{0}' is listed but cannot be played from the terminal yet")]
    NotPlayable(String),

    #[error("Invalid selection '{0}'")]
    InvalidSelection(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError
{
    #[error("Expected value after {0}")]
    MissingValue(&'static str),

    #[error("{name} must be a whole number, got '{value}'")]
    NotANumber { name: &'static str, value: String },

    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Failed to open log file {path}: {reason}")]
    LogFile { path: String, reason: String },
}
