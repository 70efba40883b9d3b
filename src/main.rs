//! `bingo` - card set generator CLI.
//!
//! # Commands
//!
//! - `bingo run` - resolve settings, generate, verify and emit artifacts
//! - `bingo verify --cards <file> -R <pool>` - recheck an emitted cards document

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bingo_cards::output::{
    read_cards_document, write_json, write_summary_csv, OutputError, WriteOptions,
};
use bingo_cards::settings::{parse_list, resolve, Overrides, SettingsError};
use bingo_cards::{
    assess, generate, verify, CardsDocument, ConfigError, GenerationError, ReportDocument,
    RunMeta, Uniformity, UniqueScope,
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// Bingo/tombola card set generator
#[derive(Parser)]
#[command(name = "bingo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a card set and its report
    Run(RunArgs),

    /// Recompute the verification report of an emitted cards document
    Verify(VerifyArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Config file (YAML, JSON or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pool size R
    #[arg(short = 'R', long = "pool")]
    r: Option<u32>,

    /// Number of cards T
    #[arg(short = 'T', long = "cards")]
    t: Option<usize>,

    /// Rows per card
    #[arg(short, long = "rows")]
    m: Option<usize>,

    /// Columns per card
    #[arg(short, long = "cols")]
    n: Option<usize>,

    /// strict or near
    #[arg(short, long)]
    uniformity: Option<String>,

    /// Comma-separated subset of row_sets,col_sets ("" for none)
    #[arg(long)]
    unique_scope: Option<String>,

    /// Base seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// RNG engine: chacha8, chacha12 or chacha20
    #[arg(long)]
    engine: Option<String>,

    /// auto, heuristic or cyclic
    #[arg(long)]
    strategy: Option<String>,

    /// Prefer spreading numbers over card positions
    #[arg(long)]
    position_balance: bool,

    /// Minimum difference between any two numbers on a card
    #[arg(long)]
    min_distance: Option<u32>,

    /// Full-run attempts before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Wall-clock budget in seconds, checked between attempts
    #[arg(long)]
    timeout: Option<u64>,

    /// Run attempts in parallel batches
    #[arg(long)]
    parallel: bool,

    /// Parallel batch size (0 = thread count)
    #[arg(long)]
    parallelism: Option<usize>,

    /// Cards document output path (stdout when omitted)
    #[arg(long)]
    out_cards: Option<PathBuf>,

    /// Report output path
    #[arg(long)]
    out_report: Option<PathBuf>,

    /// Summary CSV output path
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// trace, debug, info, warn or error (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,

    /// Create missing output directories
    #[arg(long)]
    mkdirs: bool,

    /// Overwrite existing outputs
    #[arg(long)]
    force: bool,

    /// Print resolved settings and parameter hash, then exit
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct VerifyArgs {
    /// Cards document to check
    #[arg(long)]
    cards: PathBuf,

    /// Pool size R
    #[arg(short = 'R', long = "pool")]
    r: u32,

    /// Scopes that were enforced (comma-separated)
    #[arg(long, default_value = "row_sets")]
    unique_scope: String,

    /// Uniformity label for the report
    #[arg(short, long, default_value = "near")]
    uniformity: String,

    /// Write the report here instead of stdout
    #[arg(long)]
    out_report: Option<PathBuf>,

    /// Overwrite an existing report
    #[arg(long)]
    force: bool,

    /// Exit non-zero on any collision, duplicate or hash mismatch
    #[arg(long)]
    strict: bool,
}

impl RunArgs {
    /// Only flags that were actually given become overrides.
    fn overrides(&self) -> Overrides {
        let mut out = Overrides::new();
        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                out.insert(key.to_string(), value);
            }
        };
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| Value::from(p.to_string_lossy().into_owned()))
        };

        set("R", self.r.map(Value::from));
        set("T", self.t.map(Value::from));
        set("m", self.m.map(Value::from));
        set("n", self.n.map(Value::from));
        set("uniformity", self.uniformity.clone().map(Value::from));
        set(
            "unique_scope",
            self.unique_scope.as_deref().map(|s| Value::from(parse_list(s))),
        );
        set("seed.value", self.seed.map(Value::from));
        set("seed.engine", self.engine.clone().map(Value::from));
        set("strategy", self.strategy.clone().map(Value::from));
        set("position_balance", self.position_balance.then_some(Value::Bool(true)));
        set("min_distance", self.min_distance.map(Value::from));
        set("max_attempts", self.max_attempts.map(Value::from));
        set("build_timeout_sec", self.timeout.map(Value::from));
        set("parallel", self.parallel.then_some(Value::Bool(true)));
        set("parallelism", self.parallelism.map(Value::from));
        set("out_cards", path(&self.out_cards));
        set("out_report", path(&self.out_report));
        set("summary_csv", path(&self.summary_csv));
        set("log_file", path(&self.log_file));
        set("log_level", self.log_level.clone().map(Value::from));
        set("mkdirs", self.mkdirs.then_some(Value::Bool(true)));
        set("force", self.force.then_some(Value::Bool(true)));
        out
    }
}

fn init_logging(level: &str, log_file: Option<&Path>) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn run(args: &RunArgs) -> Result<ExitCode, CliError> {
    let cwd = std::env::current_dir().map_err(CliError::WorkingDir)?;
    let resolved = resolve(args.config.as_deref(), &args.overrides(), std::env::vars(), &cwd)?;
    let settings = &resolved.settings;
    init_logging(&settings.log_level, settings.log_file.as_deref())?;

    if args.dry_run {
        let summary = serde_json::json!({
            "params_hash": resolved.params_hash,
            "config_path": resolved.config_path,
            "settings": settings,
        });
        println!("{}", serde_json::to_string_pretty(&summary).map_err(OutputError::from)?);
        return Ok(ExitCode::SUCCESS);
    }

    let config = settings.generation_config();
    config.validate()?;
    let feasibility = assess(&config);
    for reason in &feasibility.reasons {
        warn!(%reason, "feasibility check failed");
    }

    let outcome = generate(&config)?;
    info!(
        cards = outcome.cards.len(),
        attempts = outcome.attempts,
        strategy = outcome.strategy.name(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "generation finished"
    );

    let verification = verify(&outcome.cards, config.r, config.unique_scope, config.uniformity);
    let run_meta = RunMeta::new(&config, &outcome, &resolved.params_hash);
    let options = settings.write_options();

    let cards_doc = CardsDocument::new(run_meta.clone(), &outcome.cards);
    match &settings.out_cards {
        Some(path) => {
            write_json(path, &cards_doc, options)?;
            info!(path = %path.display(), "wrote cards");
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&cards_doc).map_err(OutputError::from)?
        ),
    }

    if let Some(path) = &settings.summary_csv {
        write_summary_csv(
            path,
            &verification.frequencies,
            Some(&verification.position_frequencies),
            options,
        )?;
        info!(path = %path.display(), "wrote summary");
    }

    let clean = verification.is_clean();
    if let Some(path) = &settings.out_report {
        let report = ReportDocument {
            run_meta,
            feasibility,
            verification,
        };
        write_json(path, &report, options)?;
        info!(path = %path.display(), "wrote report");
    }

    if clean {
        Ok(ExitCode::SUCCESS)
    } else {
        error!("verification found collisions or duplicates");
        Ok(ExitCode::FAILURE)
    }
}

fn verify_cards(args: &VerifyArgs) -> Result<ExitCode, CliError> {
    init_logging("info", None)?;

    let uniformity: Uniformity = args.uniformity.parse()?;
    let scope = UniqueScope::parse(parse_list(&args.unique_scope))?;
    let document = read_cards_document(&args.cards)?;

    let mismatches = document.hash_mismatches();
    for id in &mismatches {
        warn!(card = %id, "stored matrix hash does not match");
    }
    let aggregate_ok = document.aggregate_hash_matches();
    if !aggregate_ok {
        warn!("stored cards_hash does not match");
    }

    let report = verify(&document.cards(), args.r, scope, uniformity);
    let clean = report.is_clean() && mismatches.is_empty() && aggregate_ok;

    match &args.out_report {
        Some(path) => {
            let options = WriteOptions {
                mkdirs: false,
                overwrite: args.force,
            };
            write_json(path, &report, options)?;
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(OutputError::from)?
        ),
    }

    if args.strict && !clean {
        error!("verification failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Run(args) => run(args),
        Commands::Verify(args) => verify_cards(args),
    };
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
