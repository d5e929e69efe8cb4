use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use autofix::commands::{run_fix, run_repair, run_scan};
use autofix::core::Workspace;
use autofix::models::ConfigOverrides;
use autofix::AutofixError;

/// autofix - turn CI failure output into source fixes
#[derive(Parser)]
#[command(name = "autofix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    dir: Option<PathBuf>,

    /// Diagnostic file to read, relative to the workspace
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply rule-based fixes for recognized errors
    Fix,

    /// Repair implicated files through the LLM oracle
    Repair {
        /// Override the model to use
        #[arg(long)]
        model: Option<String>,

        /// Override the API URL
        #[arg(long)]
        url: Option<String>,

        /// Override the timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Override the completion token budget
        #[arg(long)]
        max_tokens: Option<u32>,
    },

    /// Show extracted errors without changing files
    Scan {
        /// Group errors per file instead of per record
        #[arg(short, long)]
        grouped: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

async fn run(cli: Cli) -> Result<(), AutofixError> {
    let workspace = match cli.dir {
        Some(dir) => Workspace::new(dir),
        None => Workspace::current()?,
    };
    let mut overrides = ConfigOverrides {
        input: cli.input,
        ..Default::default()
    };

    match cli.command {
        Commands::Fix => {
            run_fix(&workspace, overrides)?;
        }

        Commands::Repair {
            model,
            url,
            timeout,
            max_tokens,
        } => {
            overrides.model = model;
            overrides.url = url;
            overrides.timeout = timeout;
            overrides.max_tokens = max_tokens;
            run_repair(&workspace, overrides).await?;
        }

        Commands::Scan { grouped, json } => {
            run_scan(&workspace, overrides, grouped, json)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
