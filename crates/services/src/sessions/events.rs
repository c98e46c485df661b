use std::fmt;

use quiz_core::model::QuizResult;

/// State changes a `QuizSession` reports to its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    /// An answer was recorded for the question at `index`.
    AnswerSelected { index: usize, can_advance: bool },
    /// The session moved on to the question at `index`.
    QuestionChanged { index: usize },
    /// The last question was passed. Emitted once per session.
    Completed(QuizResult),
}

/// Handle returned by `QuizSession::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&QuizEvent) + Send>;

/// Explicit subscription list. Listeners run synchronously, in subscription
/// order, on whatever thread mutates the session.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self, event: &QuizEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
