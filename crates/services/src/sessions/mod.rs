mod events;
mod history;
mod progress;
mod quiz;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use events::{QuizEvent, SubscriptionId};
pub use history::{HistoryListItem, HistoryService};
pub use progress::QuizProgress;
pub use quiz::{Advance, QuizSession};
pub use workflow::QuizFlowService;
