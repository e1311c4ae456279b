use chrono::{DateTime, Utc};

use quiz_core::model::{AggregateStats, GameResult, PosterRef};

/// One rendered quiz step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStepView {
    pub poster: PosterRef,
    pub question: String,
    /// One-based position in the round, e.g. `"1/10"`.
    pub question_number: String,
}

/// Plain-data alert: title, body, and the single action's label.
///
/// The surface owner decides what the action does (usually a restart).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertModel {
    pub title: String,
    pub message: String,
    pub button_text: String,
}

pub const ROUND_FINISHED_TITLE: &str = "Этот раунд окончен!";
pub const PLAY_AGAIN_BUTTON: &str = "Сыграть еще раз";
pub const LOAD_ERROR_TITLE: &str = "Ошибка";
pub const TRY_AGAIN_BUTTON: &str = "Попробовать еще раз";

/// Display surface the quiz loop drives.
///
/// The loop holds a shared non-owning handle; implementations must tolerate
/// calls arriving from the loop's deferred tasks.
pub trait QuizView: Send + Sync {
    fn show_step(&self, step: QuizStepView);
    fn show_alert(&self, model: AlertModel);
    fn highlight_answer(&self, is_correct: bool);
    fn show_loading(&self);
    fn hide_loading(&self);
    fn show_error(&self, message: String);
}

fn format_instant(at: DateTime<Utc>) -> String {
    at.format("%d.%m.%y %H:%M").to_string()
}

/// Builds the round-summary text shown when a round completes.
///
/// The wording is a contract; tests reproduce it verbatim.
#[must_use]
pub fn round_summary_message(result: &GameResult, stats: &AggregateStats) -> String {
    let best = stats.best_game().cloned().unwrap_or_else(|| result.clone());
    format!(
        "Ваш результат: {}/{}\n\
         Количество сыгранных квизов: {}\n\
         Рекорд: {}/{} ({})\n\
         Средняя точность: {:.2}%",
        result.correct(),
        result.total(),
        stats.games_count(),
        best.correct(),
        best.total(),
        format_instant(best.finished_at()),
        stats.total_accuracy(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn summary_text_matches_the_contract_verbatim() {
        let result = GameResult::new(6, 10, fixed_now()).unwrap();
        let stats =
            AggregateStats::from_persisted(1, 6, Some(result.clone()), 10).unwrap();

        assert_eq!(
            round_summary_message(&result, &stats),
            "Ваш результат: 6/10\n\
             Количество сыгранных квизов: 1\n\
             Рекорд: 6/10 (03.07.24 09:46)\n\
             Средняя точность: 60.00%"
        );
    }

    #[test]
    fn summary_shows_the_standing_record_not_the_new_result() {
        let best = GameResult::new(9, 10, fixed_now()).unwrap();
        let result =
            GameResult::new(3, 10, fixed_now() + chrono::Duration::days(1)).unwrap();
        let stats = AggregateStats::from_persisted(2, 12, Some(best), 10).unwrap();

        let message = round_summary_message(&result, &stats);
        assert!(message.contains("Ваш результат: 3/10"));
        assert!(message.contains("Рекорд: 9/10 (03.07.24 09:46)"));
        assert!(message.contains("Средняя точность: 60.00%"));
    }
}
