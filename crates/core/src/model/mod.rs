mod history;
mod ids;
mod question;
mod result;

pub use history::{HistoryEntry, HistoryEntryError};
pub use ids::{HistoryEntryId, ParseIdError};
pub use question::Question;
pub use result::{AnsweredQuestion, QuizResult};
