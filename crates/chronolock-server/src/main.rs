use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use chronolock_api::storage::UploadStore;
use chronolock_api::token::TokenIssuer;
use chronolock_api::{AppStateInner, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chronolock=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("CHRONOLOCK_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CHRONOLOCK_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let db_path = std::env::var("CHRONOLOCK_DB_PATH").unwrap_or_else(|_| "chronolock.db".into());
    let uploads_dir: PathBuf = std::env::var("CHRONOLOCK_UPLOADS_DIR")
        .unwrap_or_else(|_| "./uploads".into())
        .into();
    let token_secret =
        std::env::var("CHRONOLOCK_TOKEN_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());

    // Init database and upload storage
    let db = chronolock_db::Database::open(&PathBuf::from(&db_path))?;
    let uploads = UploadStore::new(uploads_dir).await?;

    let state = Arc::new(AppStateInner {
        db,
        uploads,
        tokens: TokenIssuer::new(token_secret),
    });

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("ChronoLock API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
