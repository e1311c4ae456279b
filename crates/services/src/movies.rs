use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use quiz_core::model::PosterRef;

use crate::error::DataLoadError;

/// One movie the quiz can ask about.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub rating: f64,
    pub poster: PosterRef,
}

/// Source of the movie list questions are generated from.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetches the full movie list.
    ///
    /// # Errors
    ///
    /// Returns `DataLoadError` when the list cannot be obtained; every
    /// failure is retryable.
    async fn fetch(&self) -> Result<Vec<Movie>, DataLoadError>;
}

//
// ─── WIRE FORMAT ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct MostPopularMovies {
    #[serde(rename = "errorMessage", default)]
    error_message: String,
    #[serde(default)]
    items: Vec<MostPopularMovie>,
}

#[derive(Debug, Deserialize)]
struct MostPopularMovie {
    title: String,
    #[serde(rename = "imDbRating")]
    rating: String,
    #[serde(rename = "image")]
    image_url: String,
}

impl MostPopularMovies {
    fn into_movies(self) -> Result<Vec<Movie>, DataLoadError> {
        if !self.error_message.is_empty() {
            return Err(DataLoadError::Api(self.error_message));
        }

        // Entries without a usable rating or poster cannot back a question.
        let movies = self
            .items
            .into_iter()
            .filter_map(|item| {
                let rating = item.rating.trim().parse::<f64>().ok()?;
                let poster = PosterRef::from_url(&item.image_url).ok()?;
                Some(Movie {
                    title: item.title,
                    rating,
                    poster,
                })
            })
            .collect();

        Ok(movies)
    }
}

/// Loads the most-popular-movies document over HTTP.
#[derive(Clone)]
pub struct MoviesLoader {
    client: Client,
    url: String,
}

impl MoviesLoader {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl MovieCatalog for MoviesLoader {
    async fn fetch(&self) -> Result<Vec<Movie>, DataLoadError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(DataLoadError::HttpStatus(response.status()));
        }

        let body: MostPopularMovies = response.json().await?;
        body.into_movies()
    }
}

/// Reads the same wire document from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MovieCatalog for FileCatalog {
    async fn fetch(&self) -> Result<Vec<Movie>, DataLoadError> {
        let raw = std::fs::read_to_string(&self.path)?;
        let body: MostPopularMovies = serde_json::from_str(&raw)?;
        body.into_movies()
    }
}

/// Serves a fixed movie list, for bundled catalogs and tests.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    movies: Vec<Movie>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }
}

#[async_trait]
impl MovieCatalog for StaticCatalog {
    async fn fetch(&self) -> Result<Vec<Movie>, DataLoadError> {
        Ok(self.movies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE_DOC: &str = r#"
        {
            "errorMessage": "",
            "items": [
                {
                    "title": "The Godfather",
                    "imDbRating": "9.2",
                    "image": "https://example.com/godfather.jpg"
                },
                {
                    "title": "No Rating Yet",
                    "imDbRating": "",
                    "image": "https://example.com/none.jpg"
                },
                {
                    "title": "Broken Poster",
                    "imDbRating": "7.1",
                    "image": "not a url"
                }
            ]
        }
    "#;

    #[test]
    fn wire_document_parses_and_skips_unusable_entries() {
        let body: MostPopularMovies = serde_json::from_str(WIRE_DOC).unwrap();
        let movies = body.into_movies().unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "The Godfather");
        assert!((movies[0].rating - 9.2).abs() < f64::EPSILON);
    }

    #[test]
    fn api_error_message_fails_the_load() {
        let body: MostPopularMovies =
            serde_json::from_str(r#"{"errorMessage": "Maximum usage", "items": []}"#).unwrap();
        let err = body.into_movies().unwrap_err();
        assert!(matches!(err, DataLoadError::Api(msg) if msg == "Maximum usage"));
    }

    #[tokio::test]
    async fn static_catalog_serves_its_list() {
        let poster = PosterRef::from_url("https://example.com/p.jpg").unwrap();
        let catalog = StaticCatalog::new(vec![Movie {
            title: "Heat".to_owned(),
            rating: 8.3,
            poster,
        }]);

        let movies = catalog.fetch().await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Heat");
    }
}
