//! CLI frontend for Wikiwander, a Wikipedia navigation game.

mod commands;
mod render;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "wk",
    about = "Wikiwander: get from one article to another by following links",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game on a link graph
    Play {
        /// JSON link graph to play on
        #[arg(short, long)]
        graph: PathBuf,

        /// Start article (default: random)
        #[arg(long)]
        start: Option<String>,

        /// End article (default: random)
        #[arg(long)]
        end: Option<String>,

        /// RNG seed for picking random articles
        #[arg(short, long)]
        seed: Option<u64>,

        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Trained classifier (JSON) to use instead of the built-in one
        #[arg(long)]
        classifier: Option<PathBuf>,

        /// Word vectors for the `similar` command
        #[arg(long)]
        vectors: Option<PathBuf>,
    },

    /// Train an intent classifier from `label,sample` lines
    Train {
        /// CSV file of labelled samples
        #[arg(short, long)]
        data: PathBuf,

        /// Where to write the trained model
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Show how a command would be understood
    Classify {
        /// The command text
        text: String,

        /// Trained classifier (JSON) to use instead of the built-in one
        #[arg(long)]
        classifier: Option<PathBuf>,
    },

    /// List the articles in a link graph
    Titles {
        /// JSON link graph
        #[arg(short, long)]
        graph: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let result = match cli.command {
        Commands::Play {
            graph,
            start,
            end,
            seed,
            config,
            classifier,
            vectors,
        } => commands::play::run(commands::play::PlayOptions {
            graph,
            start,
            end,
            seed,
            config,
            classifier,
            vectors,
        }),
        Commands::Train { data, out } => commands::train::run(&data, &out),
        Commands::Classify { text, classifier } => {
            commands::classify::run(&text, classifier.as_deref())
        }
        Commands::Titles { graph } => commands::titles::run(&graph),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
