//! Line-based quiz screens on stdin/stdout.

use std::io::{self, BufRead, Write};

use quiz_core::model::QuizResult;
use services::{Advance, HistoryListItem, QuizSession, ResultsPresenter};

/// Walk the player through `session` until it completes.
///
/// Returns `None` if stdin closes before the last question.
pub fn play(session: &mut QuizSession, input: &mut impl BufRead) -> io::Result<Option<QuizResult>> {
    let mut out = io::stdout().lock();

    loop {
        let Some(question) = session.current_question() else {
            // Nothing to show: only an empty session gets here.
            return match session.advance() {
                Ok(Advance::Completed(result)) => Ok(Some(result)),
                _ => Ok(session.result().cloned()),
            };
        };

        let progress = session.progress();
        writeln!(out)?;
        writeln!(
            out,
            "Question {} of {}  [{} / {}]",
            progress.position(),
            progress.total,
            question.category(),
            question.difficulty()
        )?;
        writeln!(out, "{}", question.raw_prompt())?;

        let options = session.answer_options();
        for (i, option) in options.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, option)?;
        }

        let choice = loop {
            write!(out, "Your answer (1-{}): ", options.len())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => break &options[n - 1],
                _ => writeln!(out, "Please enter a number between 1 and {}.", options.len())?,
            }
        };

        if session.select_answer(choice).is_err() {
            return Ok(session.result().cloned());
        }
        match session.advance() {
            Ok(Advance::Completed(result)) => return Ok(Some(result)),
            Ok(Advance::AlreadyCompleted) => return Ok(session.result().cloned()),
            Ok(Advance::Next { .. }) | Err(_) => {}
        }
    }
}

pub fn print_results(result: &QuizResult) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let presenter = ResultsPresenter::new(result.clone());
    let result = presenter.result();

    writeln!(out)?;
    let stars: String = (0..result.total_questions() as usize)
        .map(|i| if presenter.is_star_filled(i) { '*' } else { '.' })
        .collect();
    writeln!(out, "Results  {stars}")?;
    writeln!(
        out,
        "{} correct ({})",
        presenter.score_text(),
        result.percentage_text()
    )?;
    match presenter.rating() {
        Ok(rating) => {
            writeln!(out, "{}", rating.title)?;
            writeln!(out, "{}", rating.subtitle)?;
        }
        Err(e) => tracing::warn!("No rating band for this result: {}", e),
    }

    writeln!(out)?;
    for (i, answer) in result.answers().iter().enumerate() {
        let mark = if answer.is_correct { "+" } else { "-" };
        writeln!(out, "{mark} {}. {}", i + 1, answer.prompt)?;
        writeln!(out, "     your answer: {}", answer.selected_answer)?;
        if !answer.is_correct {
            writeln!(out, "     correct:     {}", answer.correct_answer)?;
        }
    }
    Ok(())
}

pub fn print_history(items: &[HistoryListItem]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if items.is_empty() {
        writeln!(out, "You have not completed any quizzes yet.")?;
        return Ok(());
    }
    for item in items {
        writeln!(
            out,
            "{:<8} {}  {}/{}  {}",
            item.title,
            item.completed_at.format("%Y-%m-%d %H:%M"),
            item.correct,
            item.total,
            item.id
        )?;
    }
    Ok(())
}
