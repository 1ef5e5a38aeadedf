use std::net::SocketAddr;

use crate::core::AppState;

/// HTTP server wrapper — binds, serves, and shuts down gracefully
pub struct Server {
    state: AppState,
}

impl Server {
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = crate::api::build_app(&self.state).with_state(self.state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, environment = %self.state.config.environment, "Pickup server listening");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
