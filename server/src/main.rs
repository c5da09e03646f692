use std::sync::Arc;

use server::config::{self, ServerConfig};
use server::store::{self, LogStore, MemoryLogStore, PgLogStore, StoreError};
use server::{db, routes, state};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("log store: {0}")]
    Store(#[from] StoreError),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    let store = open_store(&config).await?;
    let state = state::AppState::new(store, &config);
    let app = routes::app(state);

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(%port, page_size = config.page_size, auth = config.token.is_some(), "log review server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, seeded from `LOGS_SEED_PATH` if both
/// are present; otherwise an in-memory store over the seed file.
async fn open_store(config: &ServerConfig) -> Result<Arc<dyn LogStore>, StartupError> {
    let seed = match &config.seed_path {
        Some(path) => {
            let logs = store::load_jsonl(path).await?;
            tracing::info!(path = %path.display(), count = logs.len(), "loaded seed records");
            logs
        }
        None => Vec::new(),
    };

    if let Some(database_url) = &config.database_url {
        let pool = db::init_pool(database_url, config.db_max_connections).await?;
        let store = PgLogStore::new(pool);
        if !seed.is_empty() {
            store.insert(&seed).await?;
        }
        tracing::info!("using postgres log store");
        return Ok(Arc::new(store));
    }

    tracing::info!(count = seed.len(), "using in-memory log store");
    Ok(Arc::new(MemoryLogStore::new(seed)))
}
