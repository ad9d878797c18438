//! Looks a player up and prints what the service knows about them.
//!
//! ```text
//! SMITE_DEV_ID=1004 SMITE_AUTH_KEY=... cargo run -p player-lookup -- SomePlayer
//! ```
//!
//! The session is kept in `SMITE_SESSION_DIR`, so runs within fifteen
//! minutes of each other reuse it instead of spending a new one.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use smite_api::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Smite player lookup
#[derive(Parser, Debug)]
#[command(name = "player-lookup")]
#[command(about = "Look up a Smite player through the signed API")]
struct Args {
    /// In-game name to look up
    player: String,

    /// Developer id issued by Hi-Rez
    #[arg(long, env = "SMITE_DEV_ID")]
    dev_id: Option<String>,

    /// Auth key issued with the developer id
    #[arg(long, env = "SMITE_AUTH_KEY", hide_env_values = true)]
    auth_key: Option<String>,

    /// Where the session records are kept between runs
    #[arg(long, env = "SMITE_SESSION_DIR", default_value = ".smite-session")]
    session_dir: PathBuf,

    /// 0 = PC, 1 = Xbox, 2 = PS4
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    platform: u8,

    /// Also print match history
    #[arg(long)]
    history: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let credentials = load_credentials(args.dev_id.as_deref(), args.auth_key.as_deref())?;
    let platform = Platform::try_from(args.platform)?;

    let client = SmiteClient::builder()
        .platform(platform)
        .session_dir(&args.session_dir)
        .build(credentials)?;

    let pong = client.ping().await.context("service unreachable")?;
    tracing::info!(%platform, response = %pong, "ping");

    let player = client
        .player(&args.player, None)
        .await
        .with_context(|| format!("looking up {}", args.player))?;
    println!("{}", serde_json::to_string_pretty(&player)?);

    if args.history {
        if let Some(id) = player_id(&player) {
            let history = client.match_history(id).await?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        } else {
            tracing::warn!(player = %args.player, "no player id in response, skipping history");
        }
    }

    let used = client.data_used().await?;
    tracing::info!(data_used = %used, "done");
    Ok(())
}

/// `getplayer` answers with a one-element list; the id is under `Id`.
fn player_id(player: &serde_json::Value) -> Option<u64> {
    player.get(0)?.get("Id")?.as_u64().filter(|id| *id > 0)
}
