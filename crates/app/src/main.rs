use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{Clock, GameLoopService, TracingNotifier};
use shapes_core::AttributeCatalog;
use shapes_core::model::{GameSettings, SessionSummary, SettingsError};
use tracing_subscriber::EnvFilter;

mod play;
mod render;

const ENV_QUESTIONS: &str = "SHAPES_QUESTIONS";
const ENV_TIMER: &str = "SHAPES_TIMER_SECS";
const ENV_SEED: &str = "SHAPES_SEED";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { source: &'static str, raw: String },
    Settings(SettingsError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { source, raw } => {
                write!(f, "invalid {source} value: {raw}")
            }
            ArgsError::Settings(err) => write!(f, "invalid settings: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<SettingsError> for ArgsError {
    fn from(err: SettingsError) -> Self {
        ArgsError::Settings(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(source: &'static str, raw: &str) -> Result<T, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidNumber {
        source,
        raw: raw.to_string(),
    })
}

fn env_number<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ArgsError> {
    std::env::var(name)
        .ok()
        .map(|raw| parse_number(name, &raw))
        .transpose()
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play [--questions <n>] [--timer <secs>] [--seed <n>] [--json]");
    eprintln!("  cargo run -p app -- demo [--questions <n>] [--timer <secs>] [--seed <n>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions 20");
    eprintln!("  --timer 15");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {ENV_QUESTIONS}, {ENV_TIMER}, {ENV_SEED}, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Demo,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    settings: GameSettings,
    seed: Option<u64>,
    json: bool,
}

impl Args {
    /// Flags win over environment variables, which win over defaults.
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut questions: Option<u32> = env_number(ENV_QUESTIONS)?;
        let mut timer: Option<u32> = env_number(ENV_TIMER)?;
        let mut seed: Option<u64> = env_number(ENV_SEED)?;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    questions = Some(parse_number("--questions", &value)?);
                }
                "--timer" => {
                    let value = require_value(args, "--timer")?;
                    timer = Some(parse_number("--timer", &value)?);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    seed = Some(parse_number("--seed", &value)?);
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let mut settings = GameSettings::default();
        if let Some(questions) = questions {
            settings = settings.with_total_questions(questions)?;
        }
        if let Some(timer) = timer {
            settings = settings.with_timer_secs(timer)?;
        }

        Ok(Self {
            settings,
            seed,
            json,
        })
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn print_summary(summary: &SessionSummary, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", render::summary(summary));
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Without a subcommand the game starts right away.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    tracing::debug!(?parsed, ?cmd, "starting");

    let catalog = Arc::new(AttributeCatalog::reference());
    let loop_svc = GameLoopService::new(
        Clock::default(),
        parsed.settings.clone(),
        Arc::clone(&catalog),
    )
    .with_seed(parsed.seed)
    .with_notifier(Arc::new(TracingNotifier));

    let summary = match cmd {
        Command::Play => play::interactive(&loop_svc, &catalog).await?,
        Command::Demo => {
            let mut rng = match parsed.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
                None => StdRng::from_os_rng(),
            };
            play::demo(&loop_svc, &catalog, &mut rng)?
        }
    };

    match summary {
        Some(summary) => print_summary(&summary, parsed.json),
        None => {
            println!("Bye!");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
