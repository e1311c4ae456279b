mod catalog;
mod console;

use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::RoundPhase;
use services::movies::{FileCatalog, MovieCatalog, MoviesLoader, StaticCatalog};
use services::question_factory::QuestionFactory;
use services::quiz_loop::QuizLoopService;
use services::statistic_service::StatisticService;
use storage::repository::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

#[derive(Debug, Clone)]
enum CatalogChoice {
    Builtin,
    File(String),
    Remote(String),
}

struct Args {
    db_url: String,
    catalog: CatalogChoice,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--movies <path.json>] [--movies-url <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  built-in movie catalog unless --movies or --movies-url is given");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_MOVIES_PATH, QUIZ_MOVIES_URL");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut chosen_catalog = std::env::var("QUIZ_MOVIES_PATH")
            .ok()
            .map(CatalogChoice::File)
            .or_else(|| std::env::var("QUIZ_MOVIES_URL").ok().map(CatalogChoice::Remote))
            .unwrap_or(CatalogChoice::Builtin);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--movies" => {
                    chosen_catalog = CatalogChoice::File(require_value(args, "--movies")?);
                }
                "--movies-url" => {
                    chosen_catalog = CatalogChoice::Remote(require_value(args, "--movies-url")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            catalog: chosen_catalog,
        })
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    log::info!("statistics database: {}", parsed.db_url);

    let clock = Clock::default_clock();
    let movie_catalog: Arc<dyn MovieCatalog> = match parsed.catalog {
        CatalogChoice::Builtin => Arc::new(StaticCatalog::new(catalog::demo_movies())),
        CatalogChoice::File(path) => Arc::new(FileCatalog::new(path)),
        CatalogChoice::Remote(url) => Arc::new(MoviesLoader::new(url)),
    };
    let source = Arc::new(QuestionFactory::new(movie_catalog));
    let statistics = StatisticService::new(clock, Arc::clone(&storage.defaults));
    let quiz = QuizLoopService::new(clock, source, Arc::new(console::ConsoleView), statistics)?;

    println!("Отвечайте д/н (или y/n). Пустая строка после итогов начинает новый раунд, q выходит.");
    quiz.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim().to_lowercase().as_str() {
            "д" | "да" | "y" | "yes" => {
                quiz.submit_answer(true).await;
            }
            "н" | "нет" | "n" | "no" => {
                quiz.submit_answer(false).await;
            }
            "q" | "выход" => break,
            "" => {
                // Enter restarts after the round summary and retries after a
                // failed load.
                if quiz.phase() == RoundPhase::RoundComplete || quiz.current_question().is_none() {
                    quiz.restart().await;
                }
            }
            other => println!("Не понял ответ: {other}"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
