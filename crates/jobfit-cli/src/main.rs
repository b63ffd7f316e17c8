//! jobfit CLI: serve, inspect and take adaptive assessments.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "jobfit",
    version,
    about = "Adaptive skill assessment and job-fit scoring"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP assessment service
    Serve {
        /// Dataset CSV (overrides config)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List roles in the item bank
    Roles {
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Check a dataset for errors and coverage gaps
    Validate {
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Take an assessment in the terminal
    Take {
        /// Role to assess; prompts when omitted
        #[arg(long)]
        role: Option<String>,

        /// Trust score in [0, 100]
        #[arg(long)]
        trust_score: Option<f64>,

        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Run assessments with a simulated candidate
    Simulate {
        /// Role to assess
        #[arg(long)]
        role: String,

        /// Candidate skill level (1-5)
        #[arg(long, default_value = "3")]
        skill: u8,

        /// Number of runs
        #[arg(long, default_value = "1")]
        runs: u32,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Create a starter config and sample dataset
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jobfit=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Serve {
            dataset,
            host,
            port,
        } => commands::serve::execute(config, dataset, host, port).await,
        Commands::Roles { dataset } => commands::roles::execute(config, dataset),
        Commands::Validate { dataset } => commands::validate::execute(config, dataset),
        Commands::Take {
            role,
            trust_score,
            dataset,
        } => commands::take::execute(config, dataset, role, trust_score),
        Commands::Simulate {
            role,
            skill,
            runs,
            seed,
            format,
            dataset,
        } => commands::simulate::execute(config, dataset, role, skill, runs, seed, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
