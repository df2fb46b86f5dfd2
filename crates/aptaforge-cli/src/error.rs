use aptaforge::design::{DesignError, TargetParseError};
use aptaforge::driver::DriverError;
use aptaforge::scores::ScoreError;
use aptaforge::seq::ValidationError;
use aptaforge::weights::WeightsError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Design(#[from] DesignError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Weights(#[from] WeightsError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("Invalid target: {0}")]
    Target(#[from] TargetParseError),

    #[error("Sequence rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Weight store error: {0}")]
    Store(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Installation checks failed.")]
    ChecksFailed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
