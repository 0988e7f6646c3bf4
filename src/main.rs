//! memchat - terminal chat client
//!
//! Main entry point for the memchat application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memchat::cli::{Cli, Commands};
use memchat::commands;
use memchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/memchat.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match &cli.command {
        Commands::Chat { .. } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(username) = &config.chat.username {
                tracing::debug!("Logging in as {} on start", username);
            }
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::History { json, .. } => {
            tracing::info!("Starting history command");
            commands::history::show_history(&config, *json).await?;
            Ok(())
        }
        Commands::Send { message, .. } => {
            tracing::info!("Starting send command");
            commands::send::send_message(&config, message).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with transcript lines.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "memchat=debug"
    } else {
        "memchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
