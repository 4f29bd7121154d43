use store_server::core::{AppState, Config};
use store_server::{api, utils};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    utils::logger::init_logger(config.log_dir.as_deref());

    tracing::info!("Starting store-server (env: {})", config.environment);

    // Initialize application state (pool + migrations + JWT service)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("store-server HTTP listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
