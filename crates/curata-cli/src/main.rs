//! curata - Curation pipeline for scientific preprints
//!
//! Collects candidate papers from the arXiv feed, enriches them with
//! Semantic Scholar bibliometric signals, ranks them, and downloads and
//! persists the winners.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use clap::{Parser, Subcommand};
use curata_core::{HttpClient, SharedProgress, shutdown_flag};
use curata_store::Store;

mod config;

use config::Config;

/// Identifying header sent with every request
const USER_AGENT: &str = concat!("curata/", env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(name = "curata")]
#[command(about = "Curation pipeline for scientific preprints")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./curata.toml or ~/.config/curata/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the curation pipeline once
    Run(RunArgs),
    /// Show persisted article counts by processing status
    Status,
    /// Show current configuration
    Config,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Trailing collection window in days
    #[arg(long)]
    days: Option<u32>,

    /// Number of winners to select
    #[arg(long)]
    top: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress: SharedProgress = Arc::new(curata_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug  — progress bars show activity
    //   non-TTY: info unless --debug          — logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    curata_core::init_logging(quiet, cli.debug, multi);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Command::Run(args) => {
            setup_signal_handler();
            cmd_run(&args, &config, &progress)
        }
        Command::Status => cmd_status(&config),
        Command::Config => cmd_config(&config),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(ref path) = cli.config {
        Config::from_file(path)
    } else {
        Config::load()
    }
}

fn cmd_run(args: &RunArgs, config: &Config, progress: &SharedProgress) -> ExitCode {
    if config.s2.api_key.is_none() {
        log::warn!("no S2 API key configured — enrichment runs against shared rate limits");
    }

    let mut pipeline_config = config.to_pipeline_config();
    if let Some(days) = args.days {
        pipeline_config.window_days = days;
    }
    if let Some(top) = args.top {
        pipeline_config.top_n = top;
    }

    let client = HttpClient::new(
        USER_AGENT,
        config.s2.api_key.clone(),
        config.http.max_retries,
    );

    let mut store = match Store::open(&config.storage.db_path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Fatal error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match curata_pipeline::run(&pipeline_config, &client, &mut store, progress) {
        Ok(code) => code,
        Err(e) => {
            log::error!("Fatal error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn cmd_status(config: &Config) -> ExitCode {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let store = match Store::open(&config.storage.db_path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Fatal error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let counts = match store.status_counts() {
        Ok(counts) => counts,
        Err(e) => {
            log::error!("Fatal error: {e:#}");
            return ExitCode::from(2);
        }
    };
    let total = match store.count() {
        Ok(total) => total,
        Err(e) => {
            log::error!("Fatal error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Processing status").fg(Color::Cyan),
            Cell::new("Articles").fg(Color::Cyan),
        ]);
    for (status, count) in counts {
        table.add_row(vec![status, curata_core::fmt_num(count)]);
    }
    table.add_row(vec!["total".to_string(), curata_core::fmt_num(total)]);

    eprintln!("\n{table}");
    ExitCode::SUCCESS
}

fn cmd_config(config: &Config) -> ExitCode {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Store path", &config.storage.db_path.display().to_string()]);
    table.add_row(vec!["PDF cache dir", &config.storage.pdf_dir.display().to_string()]);
    table.add_row(vec!["Feed endpoint", &config.feed.base_url]);
    table.add_row(vec!["Category filter", &config.feed.search_query]);
    table.add_row(vec!["Page size", &config.feed.page_size.to_string()]);
    table.add_row(vec!["S2 API URL", &config.s2.api_url]);
    table.add_row(vec![
        "S2 API key",
        if config.s2.api_key.is_some() {
            "configured"
        } else {
            "not set"
        },
    ]);
    table.add_row(vec!["Window days", &config.pipeline.window_days.to_string()]);
    table.add_row(vec!["Top N", &config.pipeline.top_n.to_string()]);
    table.add_row(vec!["Min text length", &config.pipeline.min_text_len.to_string()]);
    table.add_row(vec!["Max retries", &config.http.max_retries.to_string()]);

    eprintln!("\n{table}");
    ExitCode::SUCCESS
}

fn setup_signal_handler() {
    // First signal: set graceful shutdown flag
    // Second signal: force exit
    // SAFETY: AtomicBool::swap and process::exit are async-signal-safe
    unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGTERM, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("Failed to register SIGTERM handler");
        signal_hook::low_level::register(signal_hook::consts::SIGINT, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("Failed to register SIGINT handler");
    }
}
