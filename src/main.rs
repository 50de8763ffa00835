use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use digest_backend::config::AppConfig;
use digest_backend::routes::{classify, digest, documents, export, health};
use digest_backend::services::inference::InferenceClient;
use digest_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!(
        "Configuration loaded (env: {})",
        std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into())
    );

    let inference =
        InferenceClient::new(&config.inference).context("Failed to build inference client")?;

    let state = AppState::new(config.clone(), inference);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/documents", post(documents::upload).get(documents::list))
        .route(
            "/api/documents/{id}",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route("/api/digests", post(digest::start_digest).get(digest::list_digests))
        .route("/api/digests/{id}", get(digest::get_digest))
        .route("/api/digests/{id}/events", get(digest::digest_events))
        .route("/api/digests/{id}/export", get(export::export_digest))
        .route("/api/classify", post(classify::classify))
        .route("/api/labels", get(classify::list_labels))
        .route("/api/export", post(export::export_summary));

    #[cfg(feature = "openapi")]
    let app = {
        use utoipa::OpenApi;
        use utoipa_redoc::{Redoc, Servable};
        app.merge(Redoc::with_url(
            "/redoc",
            digest_backend::openapi::ApiDoc::openapi(),
        ))
    };

    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
