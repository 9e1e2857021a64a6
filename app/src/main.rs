#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod command;

use command::{
    CommandStrategy, DebateInput, DebateStrategy, InfoStrategy, InitStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Dialogues between historical personas", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a dialogue between two personas about a question
    Debate {
        /// First persona: JSON file path or persona API id. Opens the dialogue.
        #[arg(short = 'a', long)]
        persona_a: String,

        /// Second persona: JSON file path or persona API id. Closes the dialogue.
        #[arg(short = 'b', long)]
        persona_b: String,

        /// The user's question or concern
        #[arg(short, long)]
        question: String,

        /// Rounds; each persona speaks once per round
        #[arg(short, long)]
        turns: Option<usize>,

        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// Write the transcript and summary as markdown
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Debate {
            persona_a,
            persona_b,
            question,
            turns,
            model,
            output,
        } => {
            DebateStrategy
                .execute(DebateInput {
                    persona_a,
                    persona_b,
                    question,
                    turns,
                    model,
                    output,
                })
                .await
        }
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
