use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::GameResult;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AggregateStatsError {
    #[error("questions per game must be positive")]
    ZeroQuestionsPerGame,

    #[error(
        "total correct ({total_correct}) exceeds {games_count} games of {questions_per_game} questions"
    )]
    CountMismatch {
        total_correct: u32,
        games_count: u32,
        questions_per_game: u32,
    },
}

/// Aggregate quiz statistics across every completed round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    games_count: u32,
    total_correct: u32,
    best_game: Option<GameResult>,
    questions_per_game: u32,
}

impl AggregateStats {
    /// Rehydrates aggregate statistics from persisted storage.
    ///
    /// `best_game` is `None` until a first round has been recorded.
    ///
    /// # Errors
    ///
    /// Returns `AggregateStatsError::CountMismatch` if `total_correct` could
    /// not have been earned over `games_count` rounds.
    pub fn from_persisted(
        games_count: u32,
        total_correct: u32,
        best_game: Option<GameResult>,
        questions_per_game: u32,
    ) -> Result<Self, AggregateStatsError> {
        if questions_per_game == 0 {
            return Err(AggregateStatsError::ZeroQuestionsPerGame);
        }
        let capacity = u64::from(games_count) * u64::from(questions_per_game);
        if u64::from(total_correct) > capacity {
            return Err(AggregateStatsError::CountMismatch {
                total_correct,
                games_count,
                questions_per_game,
            });
        }

        Ok(Self {
            games_count,
            total_correct,
            best_game,
            questions_per_game,
        })
    }

    #[must_use]
    pub fn games_count(&self) -> u32 {
        self.games_count
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    #[must_use]
    pub fn best_game(&self) -> Option<&GameResult> {
        self.best_game.as_ref()
    }

    #[must_use]
    pub fn questions_per_game(&self) -> u32 {
        self.questions_per_game
    }

    /// Aggregate accuracy over every recorded game, in percent.
    ///
    /// Defined as 0 while no games have been recorded.
    #[must_use]
    pub fn total_accuracy(&self) -> f64 {
        if self.games_count == 0 {
            return 0.0;
        }
        f64::from(self.total_correct)
            / (f64::from(self.games_count) * f64::from(self.questions_per_game))
            * 100.0
    }
}
