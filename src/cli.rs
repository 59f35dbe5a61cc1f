use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scoreboard",
    version,
    about = "Live project scoreboard built from per-criterion ratings"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the board once from the current ratings
    Render(RenderCommand),
    /// Re-render the board every time the ratings change
    Watch(WatchCommand),
}

#[derive(Args)]
pub struct RenderCommand {
    /// Store directory holding the projects and ratings collections
    pub store: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Order teams by average score instead of recency
    #[arg(long)]
    pub sort_by_score: bool,
}

#[derive(Args)]
pub struct WatchCommand {
    /// Store directory holding the projects and ratings collections
    pub store: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Stop after this many board updates
    #[arg(long)]
    pub max_updates: Option<u32>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
