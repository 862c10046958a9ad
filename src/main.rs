use std::sync::Arc;

use cinelog::{AppState, config::Config, db, omdb::OmdbClient, routes, store::MovieStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinelog=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    // No request timeout: a poster lookup runs as long as the transport lets it.
    let http = reqwest::Client::builder().user_agent("cinelog/0.1").build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = MovieStore::new(db);
    let omdb = OmdbClient::new(http, config.omdb_api_key.clone(), config.omdb_base_url.clone());

    let state = Arc::new(AppState { store, posters: Arc::new(omdb) });

    let app = routes::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
