use std::net::SocketAddr;
use std::sync::Arc;

mod handlers;
mod models;
mod state;
mod template;
mod upload;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skimmer_web=info,skimmer_core=info".into()),
        )
        .init();

    let mut defaults = skimmer_core::Config::default();
    defaults.api_key = std::env::var("GROQ_API_KEY").ok();
    if defaults.api_key.is_none() {
        tracing::warn!(
            "GROQ_API_KEY is not set; requests must supply an API key in the upload form"
        );
    }

    let state = Arc::new(AppState { defaults });

    // 50 MB upload limit
    let body_limit = axum::extract::DefaultBodyLimit::max(50 * 1024 * 1024);

    let app = axum::Router::new()
        .route("/", axum::routing::get(handlers::index::index))
        .route(
            "/summarize/stream",
            axum::routing::post(handlers::stream::stream),
        )
        .layer(body_limit)
        .with_state(state);

    let port: u16 = std::env::var("SKIMMER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
