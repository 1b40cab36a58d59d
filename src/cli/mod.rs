use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod chat;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Start a chat session
    Chat {
        /// Override the API hostname
        #[arg(long)]
        host: Option<String>,

        /// Override the model identifier
        #[arg(long)]
        model: Option<String>,

        /// Cap the length of each reply in tokens
        #[arg(long)]
        max_tokens: Option<u32>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Cli::parse();

    match args.command {
        Some(Command::Chat {
            host,
            model,
            max_tokens,
        }) => {
            let mut config = AppConfig::default();
            if let Some(host) = host {
                config.api_hostname = host;
            }
            if let Some(model) = model {
                config.model = model;
            }
            if let Some(max_tokens) = max_tokens {
                config.max_tokens = max_tokens;
            }
            chat::run(config).await?;
        }
        None => {}
    }

    Ok(())
}
