mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eventlog_core::config::ClientConfig;
use tracing_subscriber::EnvFilter;

use crate::commands::edit::EditArgs;
use crate::commands::new::NewArgs;

#[derive(Parser)]
#[command(name = "eventlog")]
#[command(about = "Record events, their outcome, a diary and photos")]
struct Cli {
    /// Use this API base URL instead of the configured one
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Send notifications to the log instead of the terminal
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an event
    New(NewArgs),
    /// Edit an event, optionally attaching a photo
    Edit(EditArgs),
    /// Show an event with its photos
    Show {
        id: String,

        /// Print the raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EVENTLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    match cli.command {
        Commands::New(args) => {
            let backend = commands::backend(&config)?;
            commands::new::run(backend, commands::notifier(cli.quiet), args).await
        }
        Commands::Edit(args) => {
            let backend = commands::backend(&config)?;
            let rules = config.photos.clone();
            commands::edit::run(backend, commands::notifier(cli.quiet), rules, args).await
        }
        Commands::Show { id, json } => {
            let backend = commands::backend(&config)?;
            commands::show::run(&backend, &id, json).await
        }
        Commands::Config => commands::config::run(&config),
    }
}
