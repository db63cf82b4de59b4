//! dnd-server - Main entry point.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use claude::Claude;
use dnd_engine::{
    CharacterStore, ClaudeStoryteller, FileCharacterStore, GameService, MemoryCharacterStore,
    MemorySessionStore, ResilientStoryteller,
};
use dnd_server::{app, AppState, ServerConfig};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnd_server=debug,dnd_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let mut client = Claude::new(config.api_key.clone())?;
    if let Some(model) = &config.model {
        client = client.with_model(model.clone());
    }
    let retry = config.retry_config();
    tracing::info!(
        model = client.model(),
        timeout_secs = retry.timeout.as_secs(),
        max_retries = retry.max_retries,
        "storyteller configured"
    );
    let storyteller = ResilientStoryteller::new(Arc::new(ClaudeStoryteller::new(client)), retry);

    let characters: Arc<dyn CharacterStore> = match config.characters_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "persisting characters to disk");
            Arc::new(FileCharacterStore::open(path).await?)
        }
        None => {
            tracing::info!("keeping characters in memory");
            Arc::new(MemoryCharacterStore::new())
        }
    };

    let game = GameService::new(
        characters,
        Arc::new(MemorySessionStore::new()),
        Arc::new(storyteller),
    );

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let router = app(AppState::new(game))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
