use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("a game result needs at least one question")]
    ZeroTotal,

    #[error("correct count ({correct}) exceeds total ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Outcome of one completed quiz round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    correct: u32,
    total: u32,
    finished_at: DateTime<Utc>,
}

impl GameResult {
    /// Builds a result for a round of `total` questions.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::ZeroTotal` when `total` is 0 and
    /// `GameResultError::CorrectExceedsTotal` when the counts do not fit.
    pub fn new(
        correct: u32,
        total: u32,
        finished_at: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        if total == 0 {
            return Err(GameResultError::ZeroTotal);
        }
        if correct > total {
            return Err(GameResultError::CorrectExceedsTotal { correct, total });
        }

        Ok(Self {
            correct,
            total,
            finished_at,
        })
    }

    /// Rehydrates a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Same validation as [`GameResult::new`].
    pub fn from_persisted(
        correct: u32,
        total: u32,
        finished_at: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        Self::new(correct, total, finished_at)
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Strictly-more-correct comparison.
    ///
    /// An equal score is not better, so the earliest result to reach a score
    /// keeps the record.
    #[must_use]
    pub fn is_better_than(&self, other: &GameResult) -> bool {
        self.correct > other.correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn rejects_zero_total() {
        let err = GameResult::new(0, 0, fixed_now()).unwrap_err();
        assert_eq!(err, GameResultError::ZeroTotal);
    }

    #[test]
    fn rejects_correct_above_total() {
        let err = GameResult::new(11, 10, fixed_now()).unwrap_err();
        assert!(matches!(
            err,
            GameResultError::CorrectExceedsTotal {
                correct: 11,
                total: 10
            }
        ));
    }

    #[test]
    fn better_than_is_strict() {
        let now = fixed_now();
        let seven = GameResult::new(7, 10, now).unwrap();
        let nine = GameResult::new(9, 10, now).unwrap();
        let later_nine = GameResult::new(9, 10, now + chrono::Duration::hours(1)).unwrap();

        assert!(nine.is_better_than(&seven));
        assert!(!seven.is_better_than(&nine));
        assert!(!later_nine.is_better_than(&nine));
        assert!(!nine.is_better_than(&nine.clone()));
    }
}
