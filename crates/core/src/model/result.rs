use serde::{Deserialize, Serialize};

/// The committed choice for one question. Text fields are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub prompt: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl AnsweredQuestion {
    /// Builds an answer record, scoring it by exact string equality.
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        selected_answer: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        let selected_answer = selected_answer.into();
        let correct_answer = correct_answer.into();
        let is_correct = selected_answer == correct_answer;
        Self {
            prompt: prompt.into(),
            selected_answer,
            correct_answer,
            is_correct,
        }
    }
}

/// Final score of a completed quiz session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    total_questions: u32,
    correct_count: u32,
    percentage: f64,
    answers: Vec<AnsweredQuestion>,
}

impl QuizResult {
    /// Scores a list of answers.
    ///
    /// `total_questions` is the number of answers recorded, and `percentage`
    /// is `0.0` when nothing was answered.
    #[must_use]
    pub fn from_answers(answers: Vec<AnsweredQuestion>) -> Self {
        let total_questions = u32::try_from(answers.len()).unwrap_or(u32::MAX);
        let correct = answers.iter().filter(|a| a.is_correct).count();
        let correct_count = u32::try_from(correct).unwrap_or(u32::MAX);
        let percentage = if total_questions == 0 {
            0.0
        } else {
            f64::from(correct_count) / f64::from(total_questions) * 100.0
        };

        Self {
            total_questions,
            correct_count,
            percentage,
            answers,
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Share of correct answers in `[0, 100]`.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[must_use]
    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    /// Compact score, e.g. `3/5`.
    #[must_use]
    pub fn score_text(&self) -> String {
        format!("{}/{}", self.correct_count, self.total_questions)
    }

    /// Percentage with one decimal, e.g. `60.0%`.
    #[must_use]
    pub fn percentage_text(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}
