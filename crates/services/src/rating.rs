//! Canned encouragement shown on the results screen.

use quiz_core::model::QuizResult;

use crate::error::RatingError;

/// Title and subtitle for one score band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub title: String,
    pub subtitle: String,
}

impl Rating {
    #[must_use]
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// Lookup table indexed by the number of correct answers.
///
/// A table for an `n`-question quiz holds `n + 1` bands, from "nothing right"
/// to "everything right".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingTable {
    bands: Vec<Rating>,
}

impl RatingTable {
    #[must_use]
    pub fn new(bands: Vec<Rating>) -> Self {
        Self { bands }
    }

    /// Number of questions this table is built for.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.bands.len().saturating_sub(1)
    }

    /// Band for `correct` out of `total`.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::TableSize` if the table was not built for `total`
    /// questions, or `RatingError::OutOfRange` if `correct > total`. Both mean
    /// the caller passed counts that did not come from a real result.
    pub fn rating_for(&self, correct: u32, total: u32) -> Result<&Rating, RatingError> {
        let expected = usize::try_from(total)
            .ok()
            .and_then(|t| t.checked_add(1));
        if expected != Some(self.bands.len()) {
            return Err(RatingError::TableSize {
                len: self.bands.len(),
                total,
            });
        }
        if correct > total {
            return Err(RatingError::OutOfRange { correct, total });
        }
        usize::try_from(correct)
            .ok()
            .and_then(|i| self.bands.get(i))
            .ok_or(RatingError::OutOfRange { correct, total })
    }
}

impl RatingTable {
    /// Table for a `total`-question quiz built from the six canned bands.
    ///
    /// `correct` maps onto band `correct * 5 / total` (rounded down), so the
    /// top band is reserved for a perfect score and zero correct always lands
    /// on the bottom band.
    #[must_use]
    pub fn for_total(total: u32) -> Self {
        let canned = canned_bands(total);
        let top = (canned.len() - 1) as u64;
        let bands = (0..=u64::from(total))
            .map(|correct| {
                let band = correct
                    .checked_mul(top)
                    .and_then(|scaled| scaled.checked_div(u64::from(total)))
                    .unwrap_or(0);
                canned[usize::try_from(band).unwrap_or(0)].clone()
            })
            .collect();
        Self::new(bands)
    }
}

impl Default for RatingTable {
    /// Bands for the standard five-question daily quiz.
    fn default() -> Self {
        Self::for_total(crate::question_source::DEFAULT_AMOUNT)
    }
}

fn canned_bands(total: u32) -> [Rating; 6] {
    [
        Rating::new(
            "Not your day?",
            "You started from zero, but every journey begins with a first step. Review the mistakes and try again.",
        ),
        Rating::new(
            "There's a spark!",
            "A first correct answer is your starting point. Strengthen the basics: review the mistakes and keep going.",
        ),
        Rating::new(
            "Halfway to knowing it",
            "You're already doing better. See which topics slipped? Go through them and you'll feel more confident.",
        ),
        Rating::new(
            "A solid base",
            "You're at a basic level. There are gaps, but the potential is obvious. Reviewing the answers will help.",
        ),
        Rating::new(
            "Almost perfect!",
            "Very close to perfect. Just one more step!",
        ),
        Rating::new(
            format!("Full house: {total} out of {total}!"),
            "A flawless result. You know this topic inside out. Ready for the next level?",
        ),
    ]
}

/// Presentation-agnostic data for the results screen.
#[derive(Debug, Clone)]
pub struct ResultsPresenter {
    result: QuizResult,
    ratings: RatingTable,
}

impl ResultsPresenter {
    #[must_use]
    pub fn new(result: QuizResult) -> Self {
        let ratings = RatingTable::for_total(result.total_questions());
        Self::with_ratings(result, ratings)
    }

    #[must_use]
    pub fn with_ratings(result: QuizResult, ratings: RatingTable) -> Self {
        Self { result, ratings }
    }

    #[must_use]
    pub fn result(&self) -> &QuizResult {
        &self.result
    }

    /// Score phrased for display, e.g. `3 of 5`.
    #[must_use]
    pub fn score_text(&self) -> String {
        format!(
            "{} of {}",
            self.result.correct_count(),
            self.result.total_questions()
        )
    }

    /// # Errors
    ///
    /// Returns `RatingError` if the table does not fit this result.
    pub fn rating(&self) -> Result<&Rating, RatingError> {
        self.ratings
            .rating_for(self.result.correct_count(), self.result.total_questions())
    }

    /// Star `index` (zero-based) is filled for each correct answer.
    #[must_use]
    pub fn is_star_filled(&self, index: usize) -> bool {
        usize::try_from(self.result.correct_count()).is_ok_and(|correct| index < correct)
    }
}
