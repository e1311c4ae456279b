//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AggregateStatsError, GameResultError, GameSessionError};
use storage::repository::StorageError;

/// Errors emitted while loading quiz data.
///
/// Every variant is retryable; the view surfaces the message together with a
/// retry affordance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataLoadError {
    #[error("the movie service returned an error: {0}")]
    Api(String),

    #[error("the movie service responded with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    #[error("no movies available to ask about")]
    EmptyCatalog,
}

/// Errors emitted by `StatisticService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Result(#[from] GameResultError),

    #[error(transparent)]
    Stats(#[from] AggregateStatsError),

    #[error("persisted value for {key} is out of range: {value}")]
    OutOfRange { key: &'static str, value: i64 },
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoopError {
    #[error(transparent)]
    Session(#[from] GameSessionError),

    #[error(transparent)]
    Result(#[from] GameResultError),

    #[error(transparent)]
    Statistics(#[from] StatisticServiceError),
}
