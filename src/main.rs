// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use doctran::app_config::{self, Config, Engine};
use doctran::app_controller::Controller;
use doctran::providers::http::HttpBackend;

/// CLI Wrapper for Engine to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEngine {
    Huggingface,
    Bedrock,
    Claude,
}

impl From<CliEngine> for Engine {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::Huggingface => Engine::Huggingface,
            CliEngine::Bedrock => Engine::Bedrock,
            CliEngine::Claude => Engine::Claude,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that talks to the backend
#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Backend base URL (e.g. http://localhost:8000/api/v1)
    #[arg(short = 'u', long, env = "DOCTRAN_ENDPOINT")]
    endpoint: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// XML/JSON files or directories to translate
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,

    /// Target language code (e.g., 'fi', 'sv', 'de')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliEngine>,

    /// Directory for translated files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Number of files translated at the same time
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct LanguagesArgs {
    /// Engine whose catalog to list (defaults to the configured engine)
    #[arg(short, long, value_enum)]
    engine: Option<CliEngine>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate XML and JSON documents
    Translate(TranslateArgs),

    /// List the target languages an engine supports
    Languages(LanguagesArgs),

    /// Generate shell completions for doctran
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// doctran - batch XML/JSON document translation
#[derive(Parser, Debug)]
#[command(name = "doctran")]
#[command(version)]
#[command(about = "Batch XML and JSON document translation")]
#[command(long_about = "doctran sends XML and JSON documents to a translation service and writes the translated copies next to them.

EXAMPLES:
    doctran translate -t fi docs/                  # Translate every XML/JSON file below docs/
    doctran translate -t sv -e claude a.xml b.json # Use a specific engine
    doctran translate -t de -o out/ -j 4 docs/     # Four files at a time into out/
    doctran languages -e bedrock                   # Show supported target languages
    doctran completions bash > doctran.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't
    exist, a default one is created automatically.

ENGINES:
    huggingface - Helsinki-NLP models (default)
    bedrock     - Claude through AWS Bedrock
    claude      - Claude through the direct API")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }

    // @returns: Marker for log level
    fn marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "✗",
            Level::Warn => "!",
            Level::Info => " ",
            Level::Debug => "·",
            Level::Trace => "~",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::color_for_level(level),
                now,
                Self::marker_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is lowered or raised once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctran", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
        Commands::Languages(args) => run_languages(args).await,
    }
}

/// Load the config file and apply the overrides shared by all commands
fn load_config(common: &CommonArgs) -> Result<Config> {
    if let Some(level) = &common.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = Config::resolve_path(&common.config_path);
    let mut config = Config::load_or_create(&config_path)?;

    if let Some(endpoint) = &common.endpoint {
        config.backend.endpoint = endpoint.clone();
    }

    match &common.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;

    if let Some(target_language) = &args.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(engine) = args.engine {
        config.engine = engine.into();
    }
    if let Some(jobs) = args.jobs {
        config.max_concurrent_files = jobs;
    }

    if config.target_language.trim().is_empty() {
        return Err(anyhow!("No target language given: pass -t <code> or set target_language in the config"));
    }

    let controller = Controller::with_config(config)?;
    let start_time = std::time::Instant::now();

    match controller.run(args.paths, args.output_dir, args.force_overwrite).await? {
        Some(result) => {
            if result.cancelled {
                warn!("Stopped early after {} of {} files", result.processed_count(), result.total_files);
            }
            info!("Done in {}", format_duration(start_time.elapsed()));
        }
        None => info!("Nothing to do"),
    }

    Ok(())
}

async fn run_languages(args: LanguagesArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    let engine = args.engine.map(Engine::from).unwrap_or(config.engine);

    let backend = HttpBackend::from_config(&config.backend);
    let controller = Controller::with_config(config)?;
    let languages = controller.list_languages(&backend, engine).await?;

    println!("{} target languages ({}):", engine.display_name(), languages.len());
    println!("{}", Controller::format_languages(&languages));
    Ok(())
}

/// Format a duration as a compact human readable string
fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
