use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use algostep_cli::commands::challenge::{handle_challenge, ChallengeArgs};
use algostep_cli::commands::path::{handle_path, PathArgs};
use algostep_cli::commands::tree::{handle_tree, TreeArgs};
use algostep_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Step-by-step algorithm visualizations")]
struct Cli {
    /// Output format for reports.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a grid pathfinding algorithm (bfs, dfs, dijkstra, a-star).
    Path(PathArgs),
    /// Run a BST, traversal or heap algorithm over a list of values.
    Tree(TreeArgs),
    /// Attempt a challenge file and report constraints and stars.
    Challenge(ChallengeArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Path(args) => handle_path(args, cli.format),
        Command::Tree(args) => handle_tree(args, cli.format),
        Command::Challenge(args) => handle_challenge(args, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
