//! Stickergate entry point.
//!
//! Binary name: `sgate`
//!
//! Loads configuration, opens the store, authenticates against the Bot
//! API, then long-polls updates and hands each message to its chat's
//! engine. Bootstrap failures are fatal; after startup, adapter failures
//! are logged and retried instead of exiting.

use anyhow::Context;
use clap::Parser;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use stickergate_core::bot_api::BotApi;
use stickergate_core::group::GroupRegistry;
use stickergate_core::storage::KvStore;
use stickergate_infra::sqlite::{DatabasePool, SqliteKvStore};
use stickergate_infra::telegram::TelegramClient;

/// Update batch size per long-poll request.
const POLL_LIMIT: i64 = 100;

/// Pause before retrying a failed long poll.
const POLL_RETRY_PAUSE: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "sgate", about = "Sticker verification gate for group chats", version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = stickergate_infra::config::load_config(&cli.config)
        .await
        .context("load configuration")?;

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,stickergate=debug",
        _ => "trace",
    };
    stickergate_observe::tracing_setup::init_tracing(filter, config.otel)
        .map_err(|e| anyhow::anyhow!(e))
        .context("initialize tracing")?;

    let pool = DatabasePool::new(&config.database_url)
        .await
        .context("open database")?;
    let store = Arc::new(SqliteKvStore::new(pool));
    // Reachability probe; the key does not need to exist.
    store
        .exists("boot:probe")
        .await
        .context("probe key-value store")?;

    let client = TelegramClient::connect(
        config.token.clone(),
        config.api_base.clone(),
        config.poll_timeout_secs,
    )
    .await
    .context("authenticate against the Bot API")?;
    tracing::info!(bot = %client.me().username, "authenticated");

    let api = Arc::new(client);
    let registry = GroupRegistry::new(store, Arc::clone(&api));

    run_update_loop(registry, api, config.poll_timeout_secs).await;

    stickergate_observe::tracing_setup::shutdown_tracing();
    Ok(())
}

/// Long-poll updates until a shutdown signal, spawning one task per
/// message so a slow chat never stalls the others.
async fn run_update_loop(
    registry: GroupRegistry<SqliteKvStore, TelegramClient>,
    api: Arc<TelegramClient>,
    poll_timeout_secs: u64,
) {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut offset = 0i64;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received");
                break;
            }
            batch = api.get_updates(offset, POLL_LIMIT, poll_timeout_secs) => match batch {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let Some(message) = update.message else { continue };
                        let group = registry.get(message.chat.id);
                        tokio::spawn(async move {
                            group.handle_message(&message).await;
                        });
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "get_updates failed, backing off");
                    tokio::time::sleep(POLL_RETRY_PAUSE).await;
                }
            }
        }
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
