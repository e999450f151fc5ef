//! cirelayd - CI result relay daemon
//!
//! Listens for CI completion webhooks on `POST /github` and posts a status
//! line plus a log summary to the repository's `pr-report` Discord channel.
//!
//! Configuration comes from flags, environment variables, or a `.env` file
//! in the working directory (loaded first, never overriding the real env).

mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use cirelay_core::{init_tracing, ChatDirectory, Relay};
use cirelay_discord::{parse_guild_id, DiscordClient, DiscordConfig, DEFAULT_API_BASE};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "cirelayd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Relay CI results into Discord channels", long_about = None)]
struct Cli {
    /// Discord bot token
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    token: String,

    /// Guild (server) id holding the per-repository categories
    #[arg(long, env = "DISCORD_GUILD_ID", value_parser = parse_guild_id)]
    guild_id: u64,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Discord API base URL
    #[arg(long, env = "DISCORD_API_BASE", default_value = DEFAULT_API_BASE)]
    discord_api_base: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let config =
        DiscordConfig::new(&cli.token, cli.guild_id).with_api_base(&cli.discord_api_base);
    let client = DiscordClient::new(config).context("failed to create Discord client")?;

    match client.current_user().await {
        Ok(user) => info!(bot = %user.username, bot_id = %user.id, "Bot logged in"),
        Err(err) => warn!(error = %err, "Could not verify bot identity, continuing"),
    }

    let directory: Arc<dyn ChatDirectory> = Arc::new(client);
    let relay = Relay::new(directory);

    let listener = TcpListener::bind((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", cli.host, cli.port))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound address")?;
    info!(
        addr = %local_addr,
        endpoint = server::GITHUB_WEBHOOK_ENDPOINT,
        guild_id = cli.guild_id,
        "cirelayd listening"
    );

    server::serve(listener, relay).await
}
