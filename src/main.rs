//! TutorChat - education-focused web chat
//!
#![doc = "TutorChat - education-focused web chat"]
#![doc = "Main entry point for the TutorChat server and one-shot CLI."]

use anyhow::Result;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tutorchat::chat::formatter::to_plain;
use tutorchat::chat::{ChatService, ChatSettings};
use tutorchat::cli::{Cli, Commands};
use tutorchat::config::Config;
use tutorchat::providers::create_gateway;
use tutorchat::server;
use tutorchat::session::{InMemorySessionStore, SessionId};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let gateway = create_gateway(&config.provider)?;
    let store = Arc::new(InMemorySessionStore::with_ttl_seconds(
        config.session.ttl_seconds,
    ));
    let chat = Arc::new(ChatService::new(
        gateway,
        store,
        ChatSettings::from_config(&config),
    ));

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!(
                "Starting tutor chat server with model {}",
                config.provider.model
            );
            server::serve(&config, chat).await
        }
        Commands::Ask { prompt } => {
            tracing::debug!("Asking a single question");
            let session = SessionId::generate();
            chat.submit(&session, &prompt).await?;

            let conversation = chat.history(&session).await?;
            if let Some(turn) = conversation.last() {
                println!("{}", to_plain(turn.text()));
            }
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose {
        "tutorchat=debug"
    } else {
        "tutorchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
