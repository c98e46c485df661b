use crate::text::decode_entities;

/// A single multiple-choice question as delivered by the question source.
///
/// Text fields hold the raw feed form, which may contain HTML character
/// references. Use [`Question::decoded`] (or the `*_text` accessors) for
/// anything that is shown or compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    category: String,
    difficulty: String,
    kind: String,
    prompt: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl Question {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        difficulty: impl Into<String>,
        kind: impl Into<String>,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: Vec<String>,
    ) -> Self {
        Self {
            category: category.into(),
            difficulty: difficulty.into(),
            kind: kind.into(),
            prompt: prompt.into(),
            correct_answer: correct_answer.into(),
            incorrect_answers,
        }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    /// Question type as reported by the source (`multiple`, `boolean`).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn raw_prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn raw_correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn raw_incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    #[must_use]
    pub fn prompt_text(&self) -> String {
        decode_entities(&self.prompt)
    }

    #[must_use]
    pub fn correct_answer_text(&self) -> String {
        decode_entities(&self.correct_answer)
    }

    #[must_use]
    pub fn incorrect_answer_texts(&self) -> Vec<String> {
        self.incorrect_answers
            .iter()
            .map(|a| decode_entities(a))
            .collect()
    }

    /// Returns a copy with every text field decoded. `self` is left as is.
    #[must_use]
    pub fn decoded(&self) -> Self {
        Self {
            category: decode_entities(&self.category),
            difficulty: self.difficulty.clone(),
            kind: self.kind.clone(),
            prompt: self.prompt_text(),
            correct_answer: self.correct_answer_text(),
            incorrect_answers: self.incorrect_answer_texts(),
        }
    }

    /// All answer choices (incorrect ones first, then the correct one), decoded.
    #[must_use]
    pub fn choices(&self) -> Vec<String> {
        let mut choices = self.incorrect_answer_texts();
        choices.push(self.correct_answer_text());
        choices
    }
}
