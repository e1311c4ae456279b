use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rand::Rng;

use quiz_core::model::QuizQuestion;

use crate::error::DataLoadError;
use crate::movies::{Movie, MovieCatalog};

/// Events a question source delivers to the quiz loop.
///
/// One type instead of a multi-method delegate keeps the ordering of load,
/// ready, and failure easy to reason about.
#[derive(Debug)]
pub enum QuestionEvent {
    DataLoaded,
    QuestionReady(QuizQuestion),
    LoadFailed(DataLoadError),
}

/// Supplies questions one at a time.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetches whatever backing data the source needs.
    ///
    /// # Errors
    ///
    /// Returns `DataLoadError` when the data cannot be loaded.
    async fn load_data(&self) -> Result<(), DataLoadError>;

    /// Produces the next question.
    ///
    /// # Errors
    ///
    /// Returns `DataLoadError::EmptyCatalog` when there is nothing to ask
    /// about, or other load errors from lazy sources.
    async fn next_question(&self) -> Result<QuizQuestion, DataLoadError>;
}

// Rating thresholds the questions are built around.
const THRESHOLD_MIN: u8 = 5;
const THRESHOLD_MAX: u8 = 9;

/// Generates rating questions from a movie catalog.
///
/// `load_data` caches the catalog; each question then picks a uniformly
/// random movie and threshold.
pub struct QuestionFactory {
    catalog: Arc<dyn MovieCatalog>,
    movies: Mutex<Vec<Movie>>,
}

impl QuestionFactory {
    #[must_use]
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self {
            catalog,
            movies: Mutex::new(Vec::new()),
        }
    }

    fn movies(&self) -> MutexGuard<'_, Vec<Movie>> {
        // A poisoned lock only means a panic elsewhere; the list is still valid.
        self.movies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl QuestionSource for QuestionFactory {
    async fn load_data(&self) -> Result<(), DataLoadError> {
        let movies = self.catalog.fetch().await?;
        *self.movies() = movies;
        Ok(())
    }

    async fn next_question(&self) -> Result<QuizQuestion, DataLoadError> {
        let movies = self.movies();
        if movies.is_empty() {
            return Err(DataLoadError::EmptyCatalog);
        }

        let mut rng = rand::rng();
        let movie = &movies[rng.random_range(0..movies.len())];
        let threshold = rng.random_range(THRESHOLD_MIN..=THRESHOLD_MAX);

        Ok(QuizQuestion::new(
            format!("Рейтинг этого фильма больше чем {threshold}?"),
            movie.rating > f64::from(threshold),
            movie.poster.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movies::StaticCatalog;
    use quiz_core::model::PosterRef;

    fn factory_over(movies: Vec<Movie>) -> QuestionFactory {
        QuestionFactory::new(Arc::new(StaticCatalog::new(movies)))
    }

    fn movie(title: &str, rating: f64) -> Movie {
        Movie {
            title: title.to_owned(),
            rating,
            poster: PosterRef::from_url("https://example.com/poster.jpg").unwrap(),
        }
    }

    #[tokio::test]
    async fn question_before_load_is_an_empty_catalog_error() {
        let factory = factory_over(vec![movie("Heat", 8.3)]);
        let err = factory.next_question().await.unwrap_err();
        assert!(matches!(err, DataLoadError::EmptyCatalog));
    }

    #[tokio::test]
    async fn top_rated_movie_always_beats_the_threshold() {
        let factory = factory_over(vec![movie("The Shawshank Redemption", 9.9)]);
        factory.load_data().await.unwrap();

        for _ in 0..20 {
            let q = factory.next_question().await.unwrap();
            assert!(q.correct_answer);
            assert!(q.text.starts_with("Рейтинг этого фильма больше чем "));
            assert!(q.text.ends_with('?'));
        }
    }

    #[tokio::test]
    async fn bottom_rated_movie_never_beats_the_threshold() {
        let factory = factory_over(vec![movie("Disaster Movie", 1.9)]);
        factory.load_data().await.unwrap();

        for _ in 0..20 {
            let q = factory.next_question().await.unwrap();
            assert!(!q.correct_answer);
        }
    }
}
