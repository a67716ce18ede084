//! FieldScout CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize configuration
//! - `run`     — Run a research task through the director loop
//! - `scout`   — Fan worker search agents out over explicit queries
//! - `search`  — Query the configured search backend directly

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "fieldscout",
    about = "FieldScout — Deep-Research Agent Orchestration",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Run a research task through the director loop
    Run {
        /// The research task
        task: String,

        /// Optional image context (URL or data URI)
        #[arg(long)]
        image: Option<String>,

        /// Override how many director loops to run
        #[arg(short, long)]
        loops: Option<u32>,

        /// Override the output mode (final, all, last, dict)
        #[arg(short, long)]
        output: Option<String>,

        /// Export the conversation log after the run
        #[arg(long)]
        export: bool,

        /// Condense the result with the report generator
        #[arg(long)]
        summarize: bool,
    },

    /// Fan worker search agents out over explicit queries
    Scout {
        /// The search queries, one worker each
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Query the configured search backend directly
    Search {
        /// The search query
        query: String,

        /// Override the number of results
        #[arg(short, long)]
        results: Option<usize>,

        /// Override the per-result character cap
        #[arg(short, long)]
        characters: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Run {
            task,
            image,
            loops,
            output,
            export,
            summarize,
        } => commands::run::run(task, image, loops, output, export, summarize).await?,
        Commands::Scout { queries } => commands::scout::run(queries).await?,
        Commands::Search {
            query,
            results,
            characters,
        } => commands::search::run(query, results, characters).await?,
    }

    Ok(())
}
