#![forbid(unsafe_code)]

pub mod error;
pub mod movies;
pub mod question_factory;
pub mod quiz_loop;
pub mod quiz_view;
pub mod statistic_service;

pub use quiz_core::Clock;

pub use error::{DataLoadError, QuizLoopError, StatisticServiceError};
pub use movies::{FileCatalog, Movie, MovieCatalog, MoviesLoader, StaticCatalog};
pub use question_factory::{QuestionEvent, QuestionFactory, QuestionSource};
pub use quiz_loop::{AnswerOutcome, DEFAULT_QUESTIONS_AMOUNT, QuizLoopService};
pub use quiz_view::{AlertModel, QuizStepView, QuizView};
pub use statistic_service::StatisticService;
