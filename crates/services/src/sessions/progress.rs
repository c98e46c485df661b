/// Snapshot of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// Zero-based index of the active question.
    pub index: usize,
    pub total: usize,
    pub answered: usize,
    pub can_advance: bool,
    pub is_complete: bool,
}

impl QuizProgress {
    /// One-based position for "question n of m" style labels.
    #[must_use]
    pub fn position(&self) -> usize {
        (self.index + 1).min(self.total)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}
