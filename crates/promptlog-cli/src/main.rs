//! promptlog: LLM proxy with an append-only audit log.

mod cli;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use promptlog_config::{Config, ServerConfig};
use promptlog_db::{Database, PgAuditStore};
use promptlog_llm::{CompletionService, OpenAiChatClient};
use promptlog_web::{build_router, AppState};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Usage errors exit here, before any config or connection work.
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("promptlog=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().context("failed to load configuration")?;
    info!("Configuration loaded. {}", config.summary());
    let Config { server, database, provider } = config;

    let db = Database::connect(&database)
        .await
        .context("failed to connect to PostgreSQL")?;
    db.initialize().await.context("failed to prepare the logs table")?;
    info!("✅ PostgreSQL connected, logs table ready.");

    let store = Arc::new(PgAuditStore::new(db.pool().clone()));
    let client = OpenAiChatClient::new(provider)?;
    info!("✅ Provider client ready: {} at {}", client.model_id(), client.endpoint());
    let service = CompletionService::new(client, store);

    match cli.command {
        Command::Call { keyword } => call(service, &keyword).await,
        Command::Serve => serve(service, &server).await,
    }
}

async fn call(service: CompletionService, keyword: &str) -> anyhow::Result<()> {
    let completion = service.call_and_log(keyword, None, None).await?;
    println!("{}", String::from_utf8_lossy(&completion.body));
    Ok(())
}

async fn serve(service: CompletionService, server: &ServerConfig) -> anyhow::Result<()> {
    let router = build_router(AppState::new(service));

    let bind_addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("🚀 Server listening on http://{}", bind_addr);
    info!("   Completion: http://{}/api/openai?keyword=<text>", bind_addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}
