use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PosterRefError {
    #[error("poster reference cannot be empty")]
    Empty,

    #[error("poster URL is not valid")]
    InvalidUrl,
}

/// Opaque handle to a question's poster image.
///
/// The quiz never downloads or decodes the image; the handle travels
/// untouched from the question source to the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterRef {
    FilePath(PathBuf),
    Url(Url),
}

impl PosterRef {
    /// Builds a poster handle from a local file path.
    ///
    /// # Errors
    ///
    /// Returns `PosterRefError::Empty` for an empty path.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, PosterRefError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(PosterRefError::Empty);
        }
        Ok(PosterRef::FilePath(p))
    }

    /// Builds a poster handle from a URL string.
    ///
    /// # Errors
    ///
    /// Returns `PosterRefError::Empty` for a blank string and
    /// `PosterRefError::InvalidUrl` when the string does not parse.
    pub fn from_url(url: impl AsRef<str>) -> Result<Self, PosterRefError> {
        let s = url.as_ref().trim();
        if s.is_empty() {
            return Err(PosterRefError::Empty);
        }
        let u = Url::parse(s).map_err(|_| PosterRefError::InvalidUrl)?;
        Ok(PosterRef::Url(u))
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            PosterRef::FilePath(p) => Some(p.as_path()),
            PosterRef::Url(_) => None,
        }
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            PosterRef::FilePath(_) => None,
            PosterRef::Url(u) => Some(u),
        }
    }
}

impl fmt::Display for PosterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PosterRef::FilePath(p) => write!(f, "{}", p.display()),
            PosterRef::Url(u) => write!(f, "{u}"),
        }
    }
}

/// A single yes/no question about a movie.
///
/// Immutable once created; the source supplies a fresh value per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub text: String,
    pub correct_answer: bool,
    pub poster: PosterRef,
}

impl QuizQuestion {
    #[must_use]
    pub fn new(text: impl Into<String>, correct_answer: bool, poster: PosterRef) -> Self {
        Self {
            text: text.into(),
            correct_answer,
            poster,
        }
    }
}
