use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameSessionError {
    #[error("a round needs at least one question")]
    ZeroQuestions,
}

/// Where the round currently stands.
///
/// `Evaluating` doubles as the answer lock: while the feedback delay for the
/// current question is in flight, no further answers are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingAnswer,
    Evaluating,
    RoundComplete,
}

/// Opaque receipt for an accepted answer.
///
/// The deferred advance must present it back; a `restart` in between leaves
/// the token stale and the advance becomes a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerToken {
    epoch: u64,
    index: u32,
}

/// What the round does once an answer's feedback delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundProgress {
    NextQuestion { index: u32 },
    RoundComplete { correct: u32, total: u32 },
}

/// State machine for one round of a fixed number of questions.
///
/// Holds positions and counts only; the current question itself lives with
/// the caller. Invariant: `correct_count <= current_index + 1 <=
/// questions_amount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    questions_amount: u32,
    current_index: u32,
    correct_count: u32,
    phase: RoundPhase,
    epoch: u64,
}

impl GameSession {
    /// Creates a session for a round of `questions_amount` questions.
    ///
    /// # Errors
    ///
    /// Returns `GameSessionError::ZeroQuestions` when the amount is 0.
    pub fn new(questions_amount: u32) -> Result<Self, GameSessionError> {
        if questions_amount == 0 {
            return Err(GameSessionError::ZeroQuestions);
        }

        Ok(Self {
            questions_amount,
            current_index: 0,
            correct_count: 0,
            phase: RoundPhase::AwaitingAnswer,
            epoch: 0,
        })
    }

    #[must_use]
    pub fn questions_amount(&self) -> u32 {
        self.questions_amount
    }

    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    /// One-based position of the current question, for display.
    #[must_use]
    pub fn display_number(&self) -> u32 {
        self.current_index + 1
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// True while an answer's feedback delay is in flight.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self.phase, RoundPhase::Evaluating)
    }

    /// Records an answer for the current question.
    ///
    /// Returns `None` (a silent no-op) unless the session is awaiting an
    /// answer; this is what keeps rapid repeated input from scoring twice.
    pub fn submit_answer(&mut self, is_correct: bool) -> Option<AnswerToken> {
        if !matches!(self.phase, RoundPhase::AwaitingAnswer) {
            return None;
        }

        if is_correct {
            self.correct_count += 1;
        }
        self.phase = RoundPhase::Evaluating;

        Some(AnswerToken {
            epoch: self.epoch,
            index: self.current_index,
        })
    }

    /// Applies the transition scheduled when `token` was issued.
    ///
    /// Returns `None` when the token is stale (the session was restarted in
    /// the meantime) or the session is not evaluating an answer.
    pub fn advance(&mut self, token: AnswerToken) -> Option<RoundProgress> {
        if token.epoch != self.epoch || !matches!(self.phase, RoundPhase::Evaluating) {
            return None;
        }

        if self.current_index == self.questions_amount - 1 {
            self.phase = RoundPhase::RoundComplete;
            return Some(RoundProgress::RoundComplete {
                correct: self.correct_count,
                total: self.questions_amount,
            });
        }

        self.current_index += 1;
        self.phase = RoundPhase::AwaitingAnswer;
        Some(RoundProgress::NextQuestion {
            index: self.current_index,
        })
    }

    /// Resets the round and invalidates every outstanding answer token.
    ///
    /// Legal from any phase; a mid-round restart simply abandons the round.
    pub fn restart(&mut self) {
        self.current_index = 0;
        self.correct_count = 0;
        self.phase = RoundPhase::AwaitingAnswer;
        self.epoch = self.epoch.wrapping_add(1);
    }
}
