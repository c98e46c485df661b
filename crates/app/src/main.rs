use std::fmt;
use std::sync::Arc;

use quiz_core::model::HistoryEntryId;
use services::{
    Clock, HistoryService, OpenTriviaSource, QuestionSourceConfig, QuizFlowService,
};
use storage::HistoryStore;
use storage::sqlite::SqliteBlobStore;
use tracing_subscriber::EnvFilter;

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidAmount { raw: String },
    InvalidDbUrl { raw: String },
    InvalidId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAmount { raw } => write!(f, "invalid --amount value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidId { raw } => write!(f, "invalid quiz id: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  daily-quiz play    [--db <sqlite_url>] [--amount <n>]");
    eprintln!("  daily-quiz history [--db <sqlite_url>]");
    eprintln!("  daily-quiz delete  <id> [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:daily-quiz.sqlite3");
    eprintln!("  --amount 5");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DAILY_QUIZ_DB_URL, DAILY_QUIZ_API_URL, DAILY_QUIZ_AMOUNT, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Play,
    History,
    Delete(HistoryEntryId),
}

struct Args {
    db_url: String,
    source: QuestionSourceConfig,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("DAILY_QUIZ_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("daily-quiz.sqlite3".into()), normalize_sqlite_url);
        let mut source = QuestionSourceConfig::from_env();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--amount" => {
                    let value = require_value(args, "--amount")?;
                    let parsed: u32 = value
                        .parse()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ArgsError::InvalidAmount { raw: value.clone() })?;
                    source = source.with_amount(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, source })
    }
}

fn parse_command(argv: &mut Vec<String>) -> Result<Command, ArgsError> {
    let Some(first) = argv.first().cloned() else {
        return Ok(Command::Play);
    };
    if first.starts_with("--") {
        return Ok(Command::Play);
    }
    argv.remove(0);

    match first.as_str() {
        "play" => Ok(Command::Play),
        "history" => Ok(Command::History),
        "delete" => {
            if argv.is_empty() {
                return Err(ArgsError::MissingValue { flag: "delete" });
            }
            let raw = argv.remove(0);
            raw.parse()
                .map(Command::Delete)
                .map_err(|_| ArgsError::InvalidId { raw })
        }
        _ => Err(ArgsError::UnknownArg(first)),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();
    if matches!(argv.first().map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }

    let (cmd, parsed) = parse_command(&mut argv)
        .and_then(|cmd| Ok((cmd, Args::parse(&mut argv.into_iter())?)))
        .inspect_err(|e| {
            eprintln!("{e}");
            print_usage();
        })?;

    // Open + migrate SQLite here so core/services stay free of startup glue.
    prepare_sqlite_file(&parsed.db_url)?;
    let blobs = Arc::new(SqliteBlobStore::open(&parsed.db_url).await?);
    let store = Arc::new(HistoryStore::new(blobs));
    let history = HistoryService::new(Clock::system(), store);
    history.store().load().await;

    match cmd {
        Command::Play => {
            let source = Arc::new(OpenTriviaSource::new(parsed.source));
            let flow = QuizFlowService::new(source, history);

            let mut session = match flow.start_quiz().await {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    return Err(e.into());
                }
            };

            let mut input = std::io::stdin().lock();
            let Some(result) = terminal::play(&mut session, &mut input)? else {
                eprintln!("Quiz abandoned; nothing was saved.");
                return Ok(());
            };
            flow.finish(&result).await;
            terminal::print_results(&result)?;
        }
        Command::History => {
            terminal::print_history(&history.list().await)?;
        }
        Command::Delete(id) => {
            if history.delete(id).await? {
                println!("Deleted quiz {id}.");
            } else {
                println!("No quiz with id {id}.");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn no_arguments_means_play() {
        let mut args = argv(&[]);
        assert_eq!(parse_command(&mut args).unwrap(), Command::Play);
    }

    #[test]
    fn flags_without_subcommand_mean_play() {
        let mut args = argv(&["--amount", "3"]);
        assert_eq!(parse_command(&mut args).unwrap(), Command::Play);
        assert_eq!(args.len(), 2);
        let parsed = Args::parse(&mut args.into_iter()).unwrap();
        assert_eq!(parsed.source.amount, 3);
    }

    #[test]
    fn delete_takes_an_id() {
        let id = HistoryEntryId::generate();
        let mut args = argv(&["delete", &id.to_string(), "--db", "sqlite::memory:"]);
        assert_eq!(parse_command(&mut args).unwrap(), Command::Delete(id));
        let parsed = Args::parse(&mut args.into_iter()).unwrap();
        assert_eq!(parsed.db_url, "sqlite::memory:");
    }

    #[test]
    fn bad_inputs_are_reported() {
        assert!(matches!(
            parse_command(&mut argv(&["delete", "abc"])),
            Err(ArgsError::InvalidId { .. })
        ));
        assert!(matches!(
            parse_command(&mut argv(&["replay"])),
            Err(ArgsError::UnknownArg(_))
        ));
        assert!(matches!(
            Args::parse(&mut argv(&["--amount", "0"]).into_iter()),
            Err(ArgsError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn relative_db_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:quiz.db".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("quiz.db"));
    }
}
