use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{AggregateStats, GameResult};
use storage::repository::DefaultsStore;

use crate::error::StatisticServiceError;
use crate::quiz_loop::DEFAULT_QUESTIONS_AMOUNT;

/// Persisted keys, one primitive value each.
mod keys {
    pub const CORRECT: &str = "correct";
    pub const GAMES_COUNT: &str = "gamesCount";
    pub const BEST_GAME_CORRECT: &str = "bestGameCorrect";
    pub const BEST_GAME_TOTAL: &str = "bestGameTotal";
    pub const BEST_GAME_DATE: &str = "bestGameDate";
}

/// Durable aggregate tracking across quiz rounds.
///
/// State lives in an injected key-value store; absent keys read as zero
/// defaults. The service performs no internal locking, so concurrent
/// read-modify-write callers must serialize externally.
#[derive(Clone)]
pub struct StatisticService {
    defaults: Arc<dyn DefaultsStore>,
    clock: Clock,
    questions_per_game: u32,
}

impl StatisticService {
    #[must_use]
    pub fn new(clock: Clock, defaults: Arc<dyn DefaultsStore>) -> Self {
        Self {
            defaults,
            clock,
            questions_per_game: DEFAULT_QUESTIONS_AMOUNT,
        }
    }

    #[must_use]
    pub fn with_questions_per_game(mut self, questions_per_game: u32) -> Self {
        self.questions_per_game = questions_per_game;
        self
    }

    async fn read_count(&self, key: &'static str) -> Result<u32, StatisticServiceError> {
        let value = self.defaults.get_int(key).await?.unwrap_or(0);
        u32::try_from(value).map_err(|_| StatisticServiceError::OutOfRange { key, value })
    }

    /// Number of completed games on record.
    ///
    /// # Errors
    ///
    /// Returns `StatisticServiceError` on storage failures.
    pub async fn games_count(&self) -> Result<u32, StatisticServiceError> {
        self.read_count(keys::GAMES_COUNT).await
    }

    /// Best game on record, or `None` before the first stored round.
    ///
    /// A zero `bestGameTotal` marks the record as unseeded; a seeded record
    /// with a missing date falls back to the current time.
    ///
    /// # Errors
    ///
    /// Returns `StatisticServiceError` on storage failures or an impossible
    /// persisted record.
    pub async fn best_game(&self) -> Result<Option<GameResult>, StatisticServiceError> {
        let total = self.read_count(keys::BEST_GAME_TOTAL).await?;
        if total == 0 {
            return Ok(None);
        }

        let correct = self.read_count(keys::BEST_GAME_CORRECT).await?;
        let date = self
            .defaults
            .get_instant(keys::BEST_GAME_DATE)
            .await?
            .unwrap_or_else(|| self.clock.now());

        Ok(Some(GameResult::from_persisted(correct, total, date)?))
    }

    /// Aggregate accuracy in percent over every stored game.
    ///
    /// # Errors
    ///
    /// Returns `StatisticServiceError` on storage failures.
    pub async fn total_accuracy(&self) -> Result<f64, StatisticServiceError> {
        Ok(self.aggregate().await?.total_accuracy())
    }

    /// Snapshot of the whole persisted aggregate.
    ///
    /// # Errors
    ///
    /// Returns `StatisticServiceError` on storage failures.
    pub async fn aggregate(&self) -> Result<AggregateStats, StatisticServiceError> {
        let games_count = self.games_count().await?;
        let total_correct = self.read_count(keys::CORRECT).await?;
        let best_game = self.best_game().await?;

        Ok(AggregateStats::from_persisted(
            games_count,
            total_correct,
            best_game,
            self.questions_per_game,
        )?)
    }

    /// Records a finished round and returns the updated aggregate.
    ///
    /// Always bumps the game and correct counters. The best game is replaced
    /// only by a strictly better result, so the first result to reach a score
    /// keeps the record; the first round ever stored always seeds it. Every
    /// write has completed by the time this returns.
    ///
    /// # Errors
    ///
    /// Returns `StatisticServiceError` on storage failures.
    pub async fn store_if_needed(
        &self,
        result: &GameResult,
    ) -> Result<AggregateStats, StatisticServiceError> {
        let games_count = self.games_count().await?.saturating_add(1);
        let total_correct = self
            .read_count(keys::CORRECT)
            .await?
            .saturating_add(result.correct());
        self.defaults
            .set_int(keys::GAMES_COUNT, i64::from(games_count))
            .await?;
        self.defaults
            .set_int(keys::CORRECT, i64::from(total_correct))
            .await?;

        let best = match self.best_game().await? {
            Some(current) if !result.is_better_than(&current) => current,
            _ => {
                self.defaults
                    .set_int(keys::BEST_GAME_CORRECT, i64::from(result.correct()))
                    .await?;
                self.defaults
                    .set_int(keys::BEST_GAME_TOTAL, i64::from(result.total()))
                    .await?;
                self.defaults
                    .set_instant(keys::BEST_GAME_DATE, result.finished_at())
                    .await?;
                result.clone()
            }
        };

        Ok(AggregateStats::from_persisted(
            games_count,
            total_correct,
            Some(best),
            self.questions_per_game,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryDefaults;

    fn service() -> StatisticService {
        StatisticService::new(fixed_clock(), Arc::new(InMemoryDefaults::new()))
    }

    fn result(correct: u32, at: chrono::DateTime<chrono::Utc>) -> GameResult {
        GameResult::new(correct, 10, at).unwrap()
    }

    #[tokio::test]
    async fn fresh_store_reads_zero_defaults() {
        let stats = service();

        assert_eq!(stats.games_count().await.unwrap(), 0);
        assert_eq!(stats.total_accuracy().await.unwrap(), 0.0);
        assert!(stats.best_game().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn storing_rounds_accumulates_counts_and_accuracy() {
        let stats = service();

        let after_first = stats.store_if_needed(&result(6, fixed_now())).await.unwrap();
        assert_eq!(after_first.games_count(), 1);
        assert!((after_first.total_accuracy() - 60.0).abs() < 1e-9);

        let after_second = stats
            .store_if_needed(&result(10, fixed_now() + Duration::minutes(5)))
            .await
            .unwrap();
        assert_eq!(after_second.games_count(), 2);
        assert_eq!(after_second.total_correct(), 16);
        assert!((after_second.total_accuracy() - 80.0).abs() < 1e-9);
        assert_eq!(after_second.best_game().unwrap().correct(), 10);
    }

    #[tokio::test]
    async fn first_round_seeds_the_best_game() {
        let stats = service();

        stats.store_if_needed(&result(0, fixed_now())).await.unwrap();

        let best = stats.best_game().await.unwrap().expect("seeded");
        assert_eq!(best.correct(), 0);
        assert_eq!(best.total(), 10);
    }

    #[tokio::test]
    async fn best_game_keeps_the_first_of_equal_scores() {
        let stats = service();
        let mut clock = fixed_clock();

        let mut dates = Vec::new();
        for correct in [7, 9, 3, 9] {
            let at = clock.now();
            dates.push(at);
            stats.store_if_needed(&result(correct, at)).await.unwrap();
            clock.advance(Duration::hours(1));
        }

        let best = stats.best_game().await.unwrap().expect("seeded");
        assert_eq!(best.correct(), 9);
        // The second 9 arrived two hours later and must not have replaced it.
        assert_eq!(best.finished_at(), dates[1]);
    }

    #[tokio::test]
    async fn accuracy_reads_are_idempotent() {
        let stats = service();
        stats.store_if_needed(&result(6, fixed_now())).await.unwrap();

        let first = stats.total_accuracy().await.unwrap();
        let second = stats.total_accuracy().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(stats.games_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn negative_persisted_counts_are_rejected() {
        let defaults = Arc::new(InMemoryDefaults::new());
        defaults.set_int("gamesCount", -3).await.unwrap();
        let stats = StatisticService::new(fixed_clock(), defaults);

        let err = stats.games_count().await.unwrap_err();
        assert!(matches!(
            err,
            StatisticServiceError::OutOfRange {
                key: "gamesCount",
                value: -3
            }
        ));
    }
}
