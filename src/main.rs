use forthright_api::app::{app, AppState};
use forthright_api::config::AppConfig;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up PG*, AUTH0_*, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Forthright API in {:?} mode", config.environment);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Forthright API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}
