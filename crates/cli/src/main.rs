// gradesync CLI - reconcile grade records between two CSV exports

mod exit_codes;
mod logging;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use gradesync_recon::{ReconConfig, ReconError, ReconInput, ReconReport};
use tracing::info;

use exit_codes::{recon_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS};
use logging::{init_logging, LogConfig};

#[derive(Parser)]
#[command(name = "gradesync")]
#[command(about = "Reconcile grade records between two CSV exports")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Each candidate row of SOURCE_B is appended to exactly one output file
(matching, non-matching, only-in-B, missing project key, missing customer key,
missing status), or dropped when its status is unrecognized. Output files are
appended to, never truncated.

Examples:
  gradesync responsys.csv chartio.csv
  gradesync responsys.csv chartio.csv --output-dir out/
  gradesync responsys.csv chartio.csv --config gradesync.toml --json")]
struct Cli {
    /// Indexed export: project_id, customer_id, project_status, ...
    source_a: PathBuf,

    /// Streamed export: project_status, project_id, customer_id
    source_b: PathBuf,

    /// Directory for the six output files [default: config output.dir, else .]
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// TOML config with output file names and column mappings
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print the run summary as JSON to stdout
    #[arg(long)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Less log output (-q warn, -qq error)
    #[arg(long, short = 'q', action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  gradesync-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  gradesync-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::MissingColumn { .. } => {
                Some("check the [source_a.columns] / [source_b.columns] header names".to_string())
            }
            ReconError::ShortHeader { .. } => {
                Some("expected a header row with at least project id, customer id and status".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(
        &LogConfig::from_verbosity(cli.verbose, cli.quiet).with_ansi(std::io::stderr().is_terminal()),
    );

    match cmd_reconcile(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    ReconConfig::from_toml(&text).map_err(|e| {
        CliError::config(format!("{}: {e}", path.display()))
            .with_hint("keys: [output], [source_a.columns], [source_b.columns]")
    })
}

fn cmd_reconcile(cli: Cli) -> Result<(), CliError> {
    info!("reconciliation started");
    let config = load_config(cli.config.as_ref())?;

    let output_dir = cli
        .output_dir
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let input = ReconInput {
        source_a: cli.source_a,
        source_b: cli.source_b,
        output_dir,
    };

    let report = gradesync_recon::run(&config, &input)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            CliError { code: EXIT_ERROR, message: format!("JSON serialization error: {e}"), hint: None }
        })?;
        println!("{json}");
    }

    print_summary(&report);
    Ok(())
}

/// Human summary to stderr.
fn print_summary(report: &ReconReport) {
    let s = &report.summary;
    eprintln!(
        "{} candidates against {} indexed records: {} matching, {} non-matching, {} only in source B, \
         {} missing project key, {} missing customer key, {} missing status, {} unclassified",
        s.candidates,
        s.index_size,
        s.matching,
        s.non_matching,
        s.diff_only_in_b,
        s.missing_project_key,
        s.missing_customer_key,
        s.missing_status,
        s.unclassified,
    );
    if s.duplicate_keys > 0 {
        eprintln!("note: {} duplicate key(s) in {}; last row kept", s.duplicate_keys, report.meta.source_a);
    }
}
