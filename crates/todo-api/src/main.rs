//! todo-api バイナリのエントリポイント
//! 設定を環境変数から読み込み、HTTP サーバを起動します。

use std::sync::Arc;

use anyhow::Context;
use infrastructure::{InMemoryRepository, JsonFileRepository, TodoRepository};
use shared::{init_tracing, Config, StorageBackend};
use todo_api::{app_with_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(config.log_format).context("failed to initialize tracing")?;

    let repo: Arc<dyn TodoRepository> = match config.storage {
        StorageBackend::File => {
            let repo = JsonFileRepository::open(&config.data_file).with_context(|| {
                format!("failed to open backing file {}", config.data_file.display())
            })?;
            Arc::new(repo)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; todos are lost on shutdown");
            Arc::new(InMemoryRepository::default())
        }
    };

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, storage = ?config.storage, data_file = %config.data_file.display(), "server starting");

    axum::serve(listener, app_with_state(AppState::new(repo)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
