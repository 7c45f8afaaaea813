// ABOUTME: Entry point for docchat — a terminal client for chatting with uploaded documents.
// ABOUTME: Parses CLI args, loads config, sets up logging, and runs the TUI or a one-shot command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use docchat::app::App;
use docchat::chat::{ChatContext, share_link};
use docchat::config::Config;
use docchat::remote::create_service;
use docchat::session::{FileStore, KeyValueStore, MemoryStore, Role, SessionId};

/// Environment variable holding the tracing filter directives.
const LOG_FILTER_ENV: &str = "DOCCHAT_LOG";

#[derive(Parser)]
#[command(name = "docchat", version, about = "Chat with your documents from the terminal")]
struct Cli {
    /// Answering service base URL (overrides config and DOCCHAT_SERVER_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Directory for local chat snapshots and the log file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show My Chats (default)
    Home,
    /// Open a chat by id
    Open { id: String },
    /// Print My Chats, one id per line
    List,
    /// Create an empty chat and print its share link
    New,
    /// Upload a PDF, creating a chat grounded on it
    Upload { path: PathBuf },
    /// Print the share link for a chat
    Link { id: String },
    /// Print a chat's conversation after syncing it with the server
    History { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = Config::load().context("failed to load config")?;
    config.apply_env();
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    let data_dir = config.data_dir();
    let store = open_store(&data_dir);
    let _log_guard = match init_logging(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {:#}", e);
            None
        }
    };
    tracing::info!(server = %config.server.base_url, data_dir = %data_dir.display(), "starting");

    let service = create_service(&config.server)?;
    let ctx = ChatContext::new(store, service);
    let share_base = config.server.share_base_url.clone();

    match cli.command.unwrap_or(Command::Home) {
        Command::Home => App::new(ctx, config.server.base_url, None).run().await,
        Command::Open { id } => {
            let id = parse_id(&id)?;
            App::new(ctx, config.server.base_url, Some(id)).run().await
        }
        Command::List => {
            for id in ctx.visited() {
                println!("{}", id);
            }
            Ok(())
        }
        Command::New => {
            let id = ctx.new_chat().await?;
            println!("{}", id);
            println!("{}", share_link(&share_base, &id));
            Ok(())
        }
        Command::Upload { path } => {
            let id = ctx
                .upload_document(&path)
                .await
                .with_context(|| format!("failed to upload {}", path.display()))?;
            println!("{}", id);
            println!("{}", share_link(&share_base, &id));
            Ok(())
        }
        Command::Link { id } => {
            println!("{}", share_link(&share_base, &parse_id(&id)?));
            Ok(())
        }
        Command::History { id } => {
            let id = parse_id(&id)?;
            let log = ctx
                .logs
                .reconcile_with_remote(&id, ctx.service.as_ref())
                .await;
            if log.is_empty() {
                println!("(no messages)");
            }
            for message in &log {
                let prefix = match message.role {
                    Role::User => "you",
                    Role::Assistant => "assistant",
                };
                println!("{}: {}", prefix, message.content);
                for source in message.citations() {
                    println!("    • {}", source);
                }
            }
            Ok(())
        }
    }
}

fn parse_id(raw: &str) -> anyhow::Result<SessionId> {
    SessionId::parse(raw).with_context(|| format!("invalid chat id {:?}", raw))
}

/// Snapshots on disk when the data directory is usable, otherwise kept in memory
/// for this run only.
fn open_store(data_dir: &Path) -> Arc<dyn KeyValueStore> {
    match FileStore::open(data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!(
                "Warning: cannot use {} ({}); chats will not be saved this session",
                data_dir.display(),
                e
            );
            Arc::new(MemoryStore::new())
        }
    }
}

/// Route tracing output to the log file so it never draws over the TUI.
fn init_logging(config: &Config) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let path = config.log_path();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(guard)
}
