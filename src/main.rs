use std::sync::Arc;

use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scoutdesk::config::AppConfig;
use scoutdesk::shared::state::AppState;
use scoutdesk::store::MemoryStore;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    // Dev store; deployments swap in a relational CrmStore behind the
    // same trait.
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(store));

    let app = scoutdesk::api_routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "scoutdesk listening");
    axum::serve(listener, app).await
}
