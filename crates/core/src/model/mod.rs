mod game_result;
mod question;
mod session;
mod stats;

pub use game_result::{GameResult, GameResultError};
pub use question::{PosterRef, PosterRefError, QuizQuestion};
pub use session::{AnswerToken, GameSession, GameSessionError, RoundPhase, RoundProgress};
pub use stats::{AggregateStats, AggregateStatsError};
