// ABOUTME: Main entry point for the welcomer Discord bot
// ABOUTME: Loads configuration, wires the gateway client, and gates the welcomer module

use anyhow::{Context as _, Result};
use clap::Parser;
use secrecy::ExposeSecret;
use serenity::all::{Client, GatewayIntents};
use std::path::PathBuf;
use welcomer_bot::config::Config;
use welcomer_bot::welcomer::Welcomer;

#[derive(Parser)]
#[command(name = "welcomer")]
#[command(about = "Greets new members with an animated welcome card", long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to the standard locations)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    let token = match config.resolve_token() {
        Ok(token) => token,
        Err(_) => {
            eprintln!("Error: no bot token found");
            eprintln!();
            eprintln!("Set bot_token in the configuration file, or:");
            eprintln!("export DISCORD_TOKEN=xxxxx");
            std::process::exit(1);
        }
    };

    // Member-join notifications require the privileged members intent.
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

    let builder = Client::builder(token.expose_secret(), intents);
    let builder = if config.welcomer_module {
        let welcomer =
            Welcomer::new(config.clone()).context("failed to set up the welcomer module")?;
        log::info!("welcomer module has been set up and is active");
        builder.event_handler(welcomer)
    } else {
        log::info!("welcomer module is disabled in the configuration");
        builder
    };

    let mut client = builder.await.context("failed to build the Discord client")?;
    client.start().await.context("Discord client terminated")?;

    Ok(())
}
