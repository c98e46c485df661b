use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quiz_core::model::Question;
use quiz_core::time::{fixed_clock, fixed_now};
use services::{
    Advance, FetchError, HistoryService, QuestionSource, QuizFlowService, ResultsPresenter,
};
use storage::HistoryStore;

struct StaticSource {
    questions: Vec<Question>,
    calls: AtomicUsize,
}

impl StaticSource {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.questions.clone())
    }
}

struct FailingSource;

#[async_trait]
impl QuestionSource for FailingSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        Err(FetchError::SourceFailure { code: 5 })
    }
}

fn trivia(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                "History",
                "hard",
                "multiple",
                format!("Q&#039;{i}"),
                format!("yes &amp; {i}"),
                vec![format!("no {i}"), format!("nope {i}"), format!("nah {i}")],
            )
        })
        .collect()
}

fn build_flow(source: Arc<dyn QuestionSource>) -> (QuizFlowService, Arc<HistoryStore>) {
    let store = Arc::new(HistoryStore::in_memory());
    let history = HistoryService::new(fixed_clock(), Arc::clone(&store));
    (QuizFlowService::new(source, history), store)
}

#[tokio::test]
async fn one_correct_out_of_five_scores_twenty_percent() {
    let source = Arc::new(StaticSource::new(trivia(5)));
    let (flow, store) = build_flow(source.clone());

    let mut session = flow.start_quiz().await.unwrap();
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    let mut completed = None;
    for i in 0..5 {
        let question = session.current_question().unwrap();
        let choice = if i == 0 {
            question.correct_answer_text()
        } else {
            question.incorrect_answer_texts()[0].clone()
        };
        assert!(session.answer_options().contains(&choice));
        session.select_answer(&choice).unwrap();
        if let Advance::Completed(result) = session.advance().unwrap() {
            completed = Some(result);
        }
    }

    let result = completed.expect("session completed");
    assert_eq!(result.total_questions(), 5);
    assert_eq!(result.correct_count(), 1);
    assert!((result.percentage() - 20.0).abs() < 1e-9);
    assert_eq!(result.answers()[0].correct_answer, "yes & 0");
    assert_eq!(result.answers()[0].prompt, "Q'0");

    let presenter = ResultsPresenter::new(result.clone());
    assert_eq!(presenter.score_text(), "1 of 5");
    assert_eq!(presenter.rating().unwrap().title, "There's a spark!");

    let entry = flow.finish(&result).await;
    assert_eq!(entry.completed_at(), fixed_now());
    assert_eq!(store.list().await, vec![entry]);
}

#[tokio::test]
async fn every_length_completes_with_all_answers_counted() {
    for n in 0..8 {
        let (flow, _) = build_flow(Arc::new(StaticSource::new(trivia(n))));
        let mut session = flow.start_quiz().await.unwrap();

        let mut result = None;
        for _ in 0..n {
            let choice = session.answer_options()[0].clone();
            session.select_answer(&choice).unwrap();
            if let Advance::Completed(r) = session.advance().unwrap() {
                result = Some(r);
            }
        }
        if n == 0 {
            let Advance::Completed(r) = session.advance().unwrap() else {
                panic!("empty session should complete");
            };
            result = Some(r);
        }

        let result = result.expect("completed");
        assert!(session.is_complete());
        assert_eq!(result.total_questions() as usize, n);
        let expected = result
            .answers()
            .iter()
            .filter(|a| a.selected_answer == a.correct_answer)
            .count();
        assert_eq!(result.correct_count() as usize, expected);
        assert_eq!(session.advance().unwrap(), Advance::AlreadyCompleted);
    }
}

#[tokio::test]
async fn failed_fetch_creates_no_session_and_no_history() {
    let (flow, store) = build_flow(Arc::new(FailingSource));

    let err = flow.start_quiz().await.unwrap_err();
    assert!(matches!(err, FetchError::SourceFailure { code: 5 }));
    assert!(store.is_empty().await);
}
