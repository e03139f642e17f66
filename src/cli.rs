//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_tick_adapter::CsvTickAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    build_registry, build_window_config, feed_symbols, override_symbols, validate_feed_config,
    validate_window_config, FEED_SECTION, WINDOW_SECTION,
};
use crate::domain::error::TickError;
use crate::domain::query::{Query, QueryOutput};
use crate::domain::query_eval::evaluate;
use crate::domain::query_parser;
use crate::domain::registry::TickRegistry;
use crate::domain::replay::replay;
use crate::domain::window::WindowConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::tick_port::TickPort;

#[derive(Parser, Debug)]
#[command(name = "tickdigits", about = "Last-digit analytics over recorded tick streams")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a tick file and evaluate queries against one symbol
    Analyze {
        #[arg(short, long)]
        ticks: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long = "query", required = true)]
        queries: Vec<String>,
    },
    /// List the symbols present in a tick file
    Symbols {
        #[arg(short, long)]
        ticks: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Parse queries and print their canonical form
    Check {
        #[arg(short, long = "query", required = true)]
        queries: Vec<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            ticks,
            config,
            symbol,
            queries,
        } => run_analyze(ticks.as_deref(), config.as_deref(), &symbol, &queries),
        Command::Symbols { ticks, config } => run_symbols(ticks.as_deref(), config.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Check { queries } => run_check(&queries),
    }
}

/// Install the stderr `tracing` subscriber. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(cfg!(debug_assertions))
        .init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TickError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_optional_config(path: Option<&Path>) -> Result<Option<FileConfigAdapter>, ExitCode> {
    path.map(load_config).transpose()
}

fn fail(err: TickError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// `--ticks` wins over `[feed] ticks_path`.
pub fn resolve_ticks_path(
    ticks_override: Option<&Path>,
    config: Option<&dyn ConfigPort>,
) -> Result<PathBuf, TickError> {
    if let Some(path) = ticks_override {
        return Ok(path.to_path_buf());
    }
    config
        .and_then(|c| c.get_string(FEED_SECTION, "ticks_path"))
        .map(PathBuf::from)
        .ok_or_else(|| TickError::ConfigMissing {
            section: FEED_SECTION.to_string(),
            key: "ticks_path".to_string(),
        })
}

/// Symbols to replay for an analysis of `symbol`: the `[feed] symbols`
/// subset if configured, otherwise just `symbol`. A symbol outside the
/// configured subset is unknown.
pub fn resolve_symbols(
    symbol: &str,
    config: Option<&dyn ConfigPort>,
) -> Result<Vec<String>, TickError> {
    let configured = match config {
        Some(c) => feed_symbols(c)?,
        None => None,
    };
    match configured {
        Some(symbols) if symbols.iter().any(|s| s == symbol) => Ok(symbols),
        Some(_) => Err(TickError::UnknownSymbol {
            symbol: symbol.to_string(),
        }),
        None => Ok(vec![symbol.to_string()]),
    }
}

/// Parse every query, reporting the first syntax error with a caret.
pub fn parse_queries(raw: &[String]) -> Result<Vec<Query>, TickError> {
    raw.iter()
        .map(|text| {
            query_parser::parse(text).inspect_err(|e| {
                if let TickError::QueryParse(pe) = e {
                    eprintln!("{}", pe.display_with_context(text));
                }
            })
        })
        .collect()
}

/// Replay ticks from `port` into a registry built from `config` and
/// evaluate `queries` against `symbol`.
pub fn run_analysis(
    port: &dyn TickPort,
    config: Option<&dyn ConfigPort>,
    symbol: &str,
    queries: &[Query],
) -> Result<Vec<(Query, QueryOutput)>, TickError> {
    let mut registry = match config {
        Some(c) => build_registry(c)?,
        None => TickRegistry::new(WindowConfig::default()),
    };
    let symbols = resolve_symbols(symbol, config)?;

    for summary in replay(port, &mut registry, &symbols)? {
        eprintln!(
            "  {}: {} ticks accepted, {} rejected",
            summary.symbol, summary.accepted, summary.rejected
        );
    }

    let window = registry.get(symbol)?;
    info!(
        symbol,
        len = window.len(),
        capacity = window.capacity(),
        "evaluating {} queries",
        queries.len()
    );
    queries
        .iter()
        .map(|q| evaluate(q, window).map(|output| (*q, output)))
        .collect()
}

fn run_analyze(
    ticks: Option<&Path>,
    config_path: Option<&Path>,
    symbol: &str,
    raw_queries: &[String],
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let config_port = config.as_ref().map(|c| c as &dyn ConfigPort);

    let queries = match parse_queries(raw_queries) {
        Ok(q) => q,
        Err(e) => return fail(e),
    };

    let ticks_path = match resolve_ticks_path(ticks, config_port) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    eprintln!("Replaying ticks from {}", ticks_path.display());
    let port = CsvTickAdapter::new(ticks_path);

    match run_analysis(&port, config_port, symbol, &queries) {
        Ok(results) => {
            for (query, output) in results {
                println!("{} = {}", query, output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_symbols(ticks: Option<&Path>, config_path: Option<&Path>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let config_port = config.as_ref().map(|c| c as &dyn ConfigPort);

    let ticks_path = match resolve_ticks_path(ticks, config_port) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    let port = CsvTickAdapter::new(ticks_path);

    let counts = match port.tick_counts() {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    if counts.is_empty() {
        eprintln!("No symbols found.");
        return ExitCode::SUCCESS;
    }
    for (symbol, count) in &counts {
        println!("{:<12} {:>8} ticks", symbol, count);
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_window_config(&config) {
        return fail(e);
    }
    if let Err(e) = validate_feed_config(&config) {
        return fail(e);
    }

    let defaults = match build_window_config(&config, WINDOW_SECTION, WindowConfig::default()) {
        Ok(w) => w,
        Err(e) => return fail(e),
    };
    let registry = match build_registry(&config) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    eprintln!(
        "Window: capacity {}, digits {}",
        defaults.capacity(),
        defaults.digit_format()
    );
    for symbol in override_symbols(&config) {
        let window = registry.config_for(&symbol);
        eprintln!(
            "  {}: capacity {}, digits {}",
            symbol,
            window.capacity(),
            window.digit_format()
        );
    }
    if let Some(path) = config.get_string(FEED_SECTION, "ticks_path") {
        eprintln!("Ticks: {}", path);
    }
    if let Ok(Some(symbols)) = feed_symbols(&config) {
        eprintln!("Symbols: {}", symbols.join(", "));
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_check(raw_queries: &[String]) -> ExitCode {
    for text in raw_queries {
        match query_parser::parse(text) {
            Ok(query) => println!("{}", query),
            Err(TickError::QueryParse(e)) => {
                eprintln!("error: {}", e.display_with_context(text));
                return (&TickError::QueryParse(e)).into();
            }
            Err(e) => return fail(e),
        }
    }
    ExitCode::SUCCESS
}
