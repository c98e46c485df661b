use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{AnsweredQuestion, Question, QuizResult};
use quiz_core::text::decode_entities;

use super::events::{Observers, QuizEvent, SubscriptionId};
use super::progress::QuizProgress;
use crate::error::SessionError;

//
// ─── ADVANCE OUTCOME ───────────────────────────────────────────────────────────
//

/// What happened on a call to [`QuizSession::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the question at `index`.
    Next { index: usize },
    /// Passed the last question. Returned exactly once per session.
    Completed(QuizResult),
    /// The session had already completed; nothing changed.
    AlreadyCompleted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-pass walk through a fixed list of questions.
///
/// The session starts on question 0. Each question takes one committed answer
/// (which may be replaced while the question is still active) before
/// [`advance`](Self::advance) moves on. There is no way back to an earlier
/// question. Passing the last question completes the session and scores it.
///
/// Not internally synchronized: one owner drives it, and anything sharing it
/// across tasks has to serialize access.
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: Vec<AnsweredQuestion>,
    result: Option<QuizResult>,
    observers: Observers,
}

impl QuizSession {
    /// Create a session over `questions`. An empty list is allowed and
    /// completes with an all-zero result on the first `advance`.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current: 0,
            answers: Vec::new(),
            result: None,
            observers: Observers::default(),
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// The score, once the session has completed.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// The active question with decoded text, or `None` once completed.
    #[must_use]
    pub fn current_question(&self) -> Option<Question> {
        self.active_question().map(Question::decoded)
    }

    /// The answer recorded for the active question, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnsweredQuestion> {
        self.active_question()?;
        self.answers.get(self.current)
    }

    /// Decoded answer choices for the active question in a fresh random order.
    ///
    /// Every call reshuffles. Empty when there is no active question.
    #[must_use]
    pub fn answer_options(&self) -> Vec<String> {
        self.answer_options_with(&mut rand::rng())
    }

    /// Same as [`answer_options`](Self::answer_options) with a caller-supplied RNG.
    #[must_use]
    pub fn answer_options_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let Some(question) = self.active_question() else {
            return Vec::new();
        };
        let mut options = question.choices();
        options.shuffle(rng);
        options
    }

    /// Record `choice` as the answer to the active question.
    ///
    /// Selecting again before advancing replaces the earlier answer. Returns
    /// whether advancing is now allowed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoCurrentQuestion` if the session is empty or
    /// already completed. The session is left unchanged.
    pub fn select_answer(&mut self, choice: &str) -> Result<bool, SessionError> {
        let question = self
            .active_question()
            .ok_or(SessionError::NoCurrentQuestion)?;

        let answer = AnsweredQuestion::new(
            question.prompt_text(),
            decode_entities(choice),
            question.correct_answer_text(),
        );
        tracing::debug!(
            "Question {} answered ({})",
            self.current,
            if answer.is_correct { "correct" } else { "incorrect" }
        );

        if let Some(existing) = self.answers.get_mut(self.current) {
            *existing = answer;
        } else {
            self.answers.push(answer);
        }

        let can_advance = self.can_advance();
        self.observers.notify(&QuizEvent::AnswerSelected {
            index: self.current,
            can_advance,
        });
        Ok(can_advance)
    }

    /// True when the active question has a recorded answer.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.active_question().is_some() && self.current < self.answers.len()
    }

    /// Move past the active question, completing the session after the last.
    ///
    /// A session with no questions completes on the first call. Once
    /// completed, further calls return `Advance::AlreadyCompleted`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AnswerRequired` if the active question has not
    /// been answered. The session is left unchanged.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.is_complete() {
            return Ok(Advance::AlreadyCompleted);
        }
        if self.questions.is_empty() {
            return Ok(self.complete());
        }
        if !self.can_advance() {
            return Err(SessionError::AnswerRequired);
        }

        if self.current + 1 >= self.questions.len() {
            return Ok(self.complete());
        }

        self.current += 1;
        tracing::debug!("Advanced to question {}", self.current);
        self.observers.notify(&QuizEvent::QuestionChanged {
            index: self.current,
        });
        Ok(Advance::Next {
            index: self.current,
        })
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            index: self.current,
            total: self.questions.len(),
            answered: self.answers.len(),
            can_advance: self.can_advance(),
            is_complete: self.is_complete(),
        }
    }

    /// Register a listener for state changes.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&QuizEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(Box::new(listener))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn active_question(&self) -> Option<&Question> {
        if self.is_complete() {
            return None;
        }
        self.questions.get(self.current)
    }

    fn complete(&mut self) -> Advance {
        let result = QuizResult::from_answers(self.answers.clone());
        tracing::info!(
            "Quiz completed: {} ({})",
            result.score_text(),
            result.percentage_text()
        );
        self.result = Some(result.clone());
        self.observers.notify(&QuizEvent::Completed(result.clone()));
        Advance::Completed(result)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("completed", &self.is_complete())
            .field("observers", &self.observers)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
