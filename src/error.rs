//! Library error types.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reference dataset could not be opened or parsed. Fatal at startup.
    #[error("reading dataset {path:?}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Reference dataset lacks a column the configuration points at.
    #[error("dataset {path:?} has no column `{column}`")]
    MissingColumn { path: PathBuf, column: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}

/// Everything that can go wrong talking to the prediction service.
/// None of these are retried.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service answered {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for PredictionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PredictionError::Timeout
        } else if let Some(status) = err.status() {
            PredictionError::Status(status.as_u16())
        } else if err.is_decode() {
            PredictionError::Malformed(err.to_string())
        } else {
            PredictionError::Transport(err.to_string())
        }
    }
}
