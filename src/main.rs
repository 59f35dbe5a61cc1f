mod aggregate;
mod board;
mod cli;
mod config;
mod error;
mod pipeline;
mod rank;
mod report;
mod score;
mod store;
mod types;

use crate::board::Board;
use crate::error::ScoreboardError;
use crate::pipeline::Pipeline;
use crate::store::{FileStore, RatingStore};
use crate::types::config::ScoreboardConfig;
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const RUNTIME_FAILURE: i32 = 3;
}

const WATCH_TICK: Duration = Duration::from_millis(250);

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_store(path: &Path) -> Result<(FileStore, ScoreboardConfig), ScoreboardError> {
    if !path.exists() {
        return Err(ScoreboardError::StoreNotFound(path.display().to_string()));
    }
    let cfg = config::load_config(path)?.unwrap_or_default();
    let store = FileStore::open(path, &cfg)?;
    Ok((store, cfg))
}

fn output_format(format: &cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn run() -> Result<i32, ScoreboardError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Render(cmd) => {
            let (store, cfg) = open_store(&cmd.store)?;
            let names = store.load_project_names().unwrap_or_else(|err| {
                warn!(error = %err, "project names unavailable; using placeholders");
                Default::default()
            });
            let ratings = store.read_ratings()?;

            let mut board = Board::new();
            board.refresh(&ratings, &names);
            if cmd.sort_by_score {
                board.sort_teams_descending();
            }

            let view = report::BoardView::new(cfg.title(), cfg.visible_criteria(), board.rows());
            println!("{}", report::render(&view, output_format(&cmd.format))?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Watch(cmd) => {
            let (store, cfg) = open_store(&cmd.store)?;
            let format = output_format(&cmd.format);
            let mut pipeline = Pipeline::new(store);
            let boards = pipeline.listen();
            pipeline.start()?;

            let mut updates = 0u32;
            let outcome = loop {
                if cmd.max_updates.is_some_and(|max| updates >= max) {
                    break Ok(());
                }
                if let Err(err) = pipeline.process_next(WATCH_TICK) {
                    break Err(err);
                }
                for rows in boards.try_iter() {
                    let view = report::BoardView::new(cfg.title(), cfg.visible_criteria(), rows);
                    println!("{}", report::render(&view, format)?);
                    updates += 1;
                }
            };

            info!(updates, state = ?pipeline.state(), "watch finished");
            pipeline.stop();
            outcome.map(|()| exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
