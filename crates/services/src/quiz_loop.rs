use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use quiz_core::Clock;
use quiz_core::model::{
    AnswerToken, GameResult, GameSession, QuizQuestion, RoundPhase, RoundProgress,
};

use crate::error::QuizLoopError;
use crate::question_factory::{QuestionEvent, QuestionSource};
use crate::quiz_view::{self, AlertModel, QuizStepView, QuizView, round_summary_message};
use crate::statistic_service::StatisticService;

/// Round length of the quiz.
pub const DEFAULT_QUESTIONS_AMOUNT: u32 = 10;

/// How long answer feedback stays on screen before the round advances.
pub const DEFAULT_ANSWER_DELAY: Duration = Duration::from_secs(1);

/// What became of a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// No question on screen, or the previous answer is still being shown.
    Ignored,
    Accepted {
        is_correct: bool,
        is_last_question: bool,
    },
}

struct LoopState {
    session: GameSession,
    current_question: Option<QuizQuestion>,
}

/// Drives quiz rounds against three collaborators: a question source, a
/// display surface, and the statistics store.
///
/// All round state sits behind one mutex that is never held across an await;
/// the only deferred work is the answer-feedback delay, scheduled on the
/// runtime rather than slept inline.
#[derive(Clone)]
pub struct QuizLoopService {
    state: Arc<Mutex<LoopState>>,
    view: Arc<dyn QuizView>,
    source: Arc<dyn QuestionSource>,
    statistics: StatisticService,
    clock: Clock,
    answer_delay: Duration,
}

impl QuizLoopService {
    /// Creates a loop for rounds of [`DEFAULT_QUESTIONS_AMOUNT`] questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError` if the session cannot be created.
    pub fn new(
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        view: Arc<dyn QuizView>,
        statistics: StatisticService,
    ) -> Result<Self, QuizLoopError> {
        Self::with_questions_amount(clock, source, view, statistics, DEFAULT_QUESTIONS_AMOUNT)
    }

    /// Creates a loop with a custom round length.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError` when `questions_amount` is 0.
    pub fn with_questions_amount(
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        view: Arc<dyn QuizView>,
        statistics: StatisticService,
        questions_amount: u32,
    ) -> Result<Self, QuizLoopError> {
        let session = GameSession::new(questions_amount)?;
        Ok(Self {
            state: Arc::new(Mutex::new(LoopState {
                session,
                current_question: None,
            })),
            view,
            source,
            statistics,
            clock,
            answer_delay: DEFAULT_ANSWER_DELAY,
        })
    }

    #[must_use]
    pub fn with_answer_delay(mut self, delay: Duration) -> Self {
        self.answer_delay = delay;
        self
    }

    fn state(&self) -> MutexGuard<'_, LoopState> {
        // A poisoned lock only means another task panicked mid-update; the
        // round state itself stays consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<QuizQuestion> {
        self.state().current_question.clone()
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.state().session.phase()
    }

    #[must_use]
    pub fn questions_amount(&self) -> u32 {
        self.state().session.questions_amount()
    }

    /// Kicks off (or retries) data loading and the first question.
    pub async fn start(&self) {
        self.view.show_loading();
        match self.source.load_data().await {
            Ok(()) => self.handle_event(QuestionEvent::DataLoaded).await,
            Err(err) => self.handle_event(QuestionEvent::LoadFailed(err)).await,
        }
    }

    /// Single entry point for question-source events.
    pub async fn handle_event(&self, event: QuestionEvent) {
        match event {
            QuestionEvent::DataLoaded => {
                self.view.hide_loading();
                self.request_next_question().await;
            }
            QuestionEvent::QuestionReady(question) => {
                let step = {
                    let mut state = self.state();
                    let step = convert(&question, &state.session);
                    state.current_question = Some(question);
                    step
                };
                self.view.show_step(step);
            }
            QuestionEvent::LoadFailed(err) => {
                self.view.show_error(err.to_string());
            }
        }
    }

    async fn request_next_question(&self) {
        match self.source.next_question().await {
            Ok(question) => {
                Box::pin(self.handle_event(QuestionEvent::QuestionReady(question))).await;
            }
            Err(err) => Box::pin(self.handle_event(QuestionEvent::LoadFailed(err))).await,
        }
    }

    /// Records an answer for the question on screen.
    ///
    /// A call with no question on screen, or while the previous answer's
    /// feedback is still in flight, is silently ignored; this is what keeps
    /// rapid repeated input from scoring twice. On acceptance the view shows
    /// the correctness highlight and the round advances after the answer
    /// delay.
    pub async fn submit_answer(&self, is_yes: bool) -> AnswerOutcome {
        let (is_correct, is_last_question, token) = {
            let mut state = self.state();
            let Some(question) = state.current_question.as_ref() else {
                return AnswerOutcome::Ignored;
            };
            let is_correct = question.correct_answer == is_yes;
            let Some(token) = state.session.submit_answer(is_correct) else {
                return AnswerOutcome::Ignored;
            };
            let is_last_question =
                state.session.display_number() == state.session.questions_amount();
            (is_correct, is_last_question, token)
        };

        self.view.highlight_answer(is_correct);

        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(this.answer_delay).await;
            this.advance(token).await;
        });

        AnswerOutcome::Accepted {
            is_correct,
            is_last_question,
        }
    }

    async fn advance(&self, token: AnswerToken) {
        let progress = {
            let mut state = self.state();
            let Some(progress) = state.session.advance(token) else {
                log::debug!("dropping stale round advance");
                return;
            };
            if matches!(progress, RoundProgress::NextQuestion { .. }) {
                // Keep answers locked out until the next question arrives.
                state.current_question = None;
            }
            progress
        };

        match progress {
            RoundProgress::NextQuestion { .. } => self.request_next_question().await,
            RoundProgress::RoundComplete { correct, total } => {
                if let Err(err) = self.finish_round(correct, total).await {
                    log::error!("failed to record round result: {err}");
                    self.view.show_error(err.to_string());
                }
            }
        }
    }

    async fn finish_round(&self, correct: u32, total: u32) -> Result<(), QuizLoopError> {
        let result = GameResult::new(correct, total, self.clock.now())?;
        let stats = self.statistics.store_if_needed(&result).await?;

        self.view.show_alert(AlertModel {
            title: quiz_view::ROUND_FINISHED_TITLE.to_owned(),
            message: round_summary_message(&result, &stats),
            button_text: quiz_view::PLAY_AGAIN_BUTTON.to_owned(),
        });
        Ok(())
    }

    /// Abandons the current round and starts over.
    ///
    /// The session restart invalidates any in-flight answer advance before
    /// the question sequence is re-requested.
    pub async fn restart(&self) {
        {
            let mut state = self.state();
            state.session.restart();
            state.current_question = None;
        }
        self.start().await;
    }
}

fn convert(question: &QuizQuestion, session: &GameSession) -> QuizStepView {
    QuizStepView {
        poster: question.poster.clone(),
        question: question.text.clone(),
        question_number: format!(
            "{}/{}",
            session.display_number(),
            session.questions_amount()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::PosterRef;

    #[test]
    fn convert_renders_the_first_step_as_one_of_ten() {
        let session = GameSession::new(10).unwrap();
        let question = QuizQuestion::new(
            "Question Text",
            true,
            PosterRef::from_file("poster.jpg").unwrap(),
        );

        let step = convert(&question, &session);

        assert_eq!(step.question, "Question Text");
        assert_eq!(step.question_number, "1/10");
    }
}
