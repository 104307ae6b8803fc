use std::sync::Arc;

use db::{DBService, DbErr};
use server::{AppState, config::ServerConfig, http};
use services::services::notify::{NoopNotifier, Notifier, WebhookNotifier};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

#[tokio::main]
async fn main() -> Result<(), RosterError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},services={level},db={level},utils={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).expect("Failed to create tracing filter");
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let config = ServerConfig::from_env();
    let db = DBService::new(&config.database_url).await?;

    let notifier: Arc<dyn Notifier> = match config.notify_url.clone() {
        Some(endpoint) => Arc::new(WebhookNotifier::new(endpoint, config.notify_token.clone())),
        None => {
            tracing::warn!("No survey dispatch endpoint configured; invites will only be logged");
            Arc::new(NoopNotifier)
        }
    };

    let bind_addr = (config.host.clone(), config.port);
    let state = AppState::new(db, notifier, config);
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
