use pickup_server::{AppState, Config, Server, services, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    tracing::info!("Pickup server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize application state (db pool, sessions, rate limiter)
    let state = AppState::initialize(&config).await?;

    // 4. Background maintenance (session sweep, rate-limit cleanup)
    services::start_background_tasks(state.clone());

    // 5. Serve
    Server::with_state(state).run().await
}
