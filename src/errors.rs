use std::result::Result as StdResult;

use rustyline::error::ReadlineError;
use spendbook_config::ConfigError;
use spendbook_core::CoreError;
use thiserror::Error;

/// Unified error type for the tracker facade.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TrackerError {
    /// True when the caller supplied bad input and nothing changed.
    pub fn is_validation(&self) -> bool {
        match self {
            TrackerError::Core(err) => err.is_validation(),
            TrackerError::Config(ConfigError::UnknownKey(_))
            | TrackerError::Config(ConfigError::InvalidValue { .. }) => true,
            TrackerError::Config(_) => false,
        }
    }
}

pub type Result<T> = StdResult<T, TrackerError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Core(TrackerError::from(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Core(TrackerError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}
