mod config;
mod error;
mod routes;

use std::sync::Arc;
use tracing::info;

use translingo::{HistoryStore, ResolverConfig, TranslationResolver};

use crate::config::ServerConfig;
use crate::routes::{AppState, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    translingo::init_tracing("info,tower_http=debug");

    let resolver_config = ResolverConfig::from_env()
        .map_err(|e| format!("Failed to read resolver configuration: {}", e))?;
    let server_config = ServerConfig::from_env()
        .map_err(|e| format!("Failed to read server configuration: {}", e))?;

    let resolver = TranslationResolver::from_config(&resolver_config)
        .map_err(|e| format!("Failed to initialize translators: {}", e))?;
    info!("🔗 Provider chain: {}", resolver.provider_names().join(" → "));

    let state = AppState {
        resolver: Arc::new(resolver),
        history: HistoryStore::new(resolver_config.history_capacity),
    };

    let addr = server_config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Server running at http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
