// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::app_controller::OutputFormat;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod keyword_matcher;
mod segment_scanner;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Json,
    Text,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Text => OutputFormat::Text,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract code-like segments from a log file or directory (default command)
    #[command(alias = "scan")]
    Scan(ScanArgs),

    /// Generate shell completions for codesift
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Input log file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing report files (directory mode)
    #[arg(short, long)]
    force_overwrite: bool,

    /// Window size in lines for the trigger decision
    #[arg(short, long)]
    window: Option<usize>,

    /// Minimum keyword hits per window to open a segment
    #[arg(short, long)]
    threshold: Option<usize>,

    /// Maximum lines per segment
    #[arg(long)]
    maxlen: Option<usize>,

    /// Max consecutive keyword-free lines inside a segment
    #[arg(long)]
    max_blank: Option<usize>,

    /// Min keyword-carrying lines required to keep a segment
    #[arg(long)]
    min_keyword_lines: Option<usize>,

    /// Return only the top N segments ranked by keyword count (0 = all)
    #[arg(long)]
    top: Option<usize>,

    /// Keyword languages to match (e.g. 'c', 'cpp', 'java')
    #[arg(short = 'L', long = "language")]
    languages: Vec<String>,

    /// Extra keywords added to the vocabulary
    #[arg(short = 'k', long = "keyword")]
    extra_keywords: Vec<String>,

    /// Write the report to this file instead of stdout (single-file mode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format for single-file mode
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// codesift - keyword-density triage for mixed logs
///
/// A streaming scanner that flags contiguous line ranges which look like
/// source code, ranks them by keyword density and reports the top candidates.
#[derive(Parser, Debug)]
#[command(name = "codesift")]
#[command(author = "codesift contributors")]
#[command(version = "0.1.0")]
#[command(about = "Extract code-like segments from mixed log files")]
#[command(long_about = "codesift scans large unstructured logs for regions dense in programming-language
keywords and reports them as ranked line-range segments.

EXAMPLES:
    codesift build.log                          # Scan using default config
    codesift --top 5 build.log                  # Keep only the 5 densest segments
    codesift -w 8 -t 4 build.log                # Wider window, higher trigger threshold
    codesift -L c -L cpp build.log              # Restrict the vocabulary to C and C++
    codesift -k fn -k impl build.log            # Add custom keywords
    codesift --format text build.log            # Plain-text report instead of JSON
    codesift -o report.json build.log           # Write the report to a file
    codesift /var/log/ci/                       # Scan a directory; reports land next to inputs
    codesift completions bash > codesift.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

DETECTION:
    A sliding window of --window lines opens a segment once it holds at least
    --threshold keyword hits. Segments grow until --maxlen lines or --max-blank
    consecutive keyword-free lines, must keep --min-keyword-lines hit-carrying
    lines to survive, and are ranked by total keyword hits.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input log file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing report files (directory mode)
    #[arg(short, long)]
    force_overwrite: bool,

    /// Window size in lines for the trigger decision
    #[arg(short, long)]
    window: Option<usize>,

    /// Minimum keyword hits per window to open a segment
    #[arg(short, long)]
    threshold: Option<usize>,

    /// Maximum lines per segment
    #[arg(long)]
    maxlen: Option<usize>,

    /// Max consecutive keyword-free lines inside a segment
    #[arg(long)]
    max_blank: Option<usize>,

    /// Min keyword-carrying lines required to keep a segment
    #[arg(long)]
    min_keyword_lines: Option<usize>,

    /// Return only the top N segments ranked by keyword count (0 = all)
    #[arg(long)]
    top: Option<usize>,

    /// Keyword languages to match (e.g. 'c', 'cpp', 'java')
    #[arg(short = 'L', long = "language")]
    languages: Vec<String>,

    /// Extra keywords added to the vocabulary
    #[arg(short = 'k', long = "keyword")]
    extra_keywords: Vec<String>,

    /// Write the report to this file instead of stdout (single-file mode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format for single-file mode
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: Tag for log level
    fn get_tag_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "ERR",
            Level::Warn => "WRN",
            Level::Info => "   ",
            Level::Debug => "DBG",
            Level::Trace => "TRC",
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

            let mut stderr = std::io::stderr();
            let tag = Self::get_tag_for_level(record.level());
            let _ = match record.level() {
                Level::Error => {
                    writeln!(stderr, "\x1B[1;31m{} {} {}\x1B[0m", now, tag, record.args())
                },
                Level::Warn => {
                    writeln!(stderr, "\x1B[1;33m{} {} {}\x1B[0m", now, tag, record.args())
                },
                Level::Info => {
                    writeln!(stderr, "\x1B[1;32m{} {} {}\x1B[0m", now, tag, record.args())
                },
                Level::Debug => {
                    writeln!(stderr, "\x1B[1;36m{} {} {}\x1B[0m", now, tag, record.args())
                },
                Level::Trace => {
                    writeln!(stderr, "\x1B[1;35m{} {} {}\x1B[0m", now, tag, record.args())
                },
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "codesift", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Scan(args)) => {
            // Use the explicit scan subcommand args
            run_scan(args).await
        }
        None => {
            // Default behavior - use top-level args for subcommand-less invocation
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let scan_args = ScanArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                window: cli.window,
                threshold: cli.threshold,
                maxlen: cli.maxlen,
                max_blank: cli.max_blank,
                min_keyword_lines: cli.min_keyword_lines,
                top: cli.top,
                languages: cli.languages,
                extra_keywords: cli.extra_keywords,
                output: cli.output,
                format: cli.format,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_scan(scan_args).await
        }
    }
}

async fn run_scan(options: ScanArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter_for(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        apply_cli_overrides(&mut config, &options);
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &options);

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(level_filter_for(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config.clone())?;

    let format: OutputFormat = options
        .format
        .map(Into::into)
        .unwrap_or(OutputFormat::Json);

    // Run the controller over the input file or directory
    if options.input_path.is_file() {
        // Process a single file
        controller.run(options.input_path.clone(), options.output.clone(), format).await?;
    } else if options.input_path.is_dir() {
        // Process a directory
        controller.run_folder(options.input_path.clone(), options.force_overwrite).await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

// Apply command line overrides on top of the loaded configuration
fn apply_cli_overrides(config: &mut Config, options: &ScanArgs) {
    if let Some(window) = options.window {
        config.scan.window_size = window;
    }
    if let Some(threshold) = options.threshold {
        config.scan.keyword_threshold = threshold;
    }
    if let Some(maxlen) = options.maxlen {
        config.scan.max_segment_length = maxlen;
    }
    if let Some(max_blank) = options.max_blank {
        config.scan.max_blank_lines = max_blank;
    }
    if let Some(min_keyword_lines) = options.min_keyword_lines {
        config.scan.min_keyword_lines = min_keyword_lines;
    }
    if let Some(top) = options.top {
        config.scan.top_n = top;
    }
    if !options.languages.is_empty() {
        config.languages = options.languages.clone();
    }
    if !options.extra_keywords.is_empty() {
        config.extra_keywords = options.extra_keywords.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

// Map the config log level onto the log facade's filter
fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
