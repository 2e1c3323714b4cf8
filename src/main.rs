//! Topic Quiz · Backend
//!
//! - Axum HTTP API (generate questions, extract topics, catalog)
//! - Optional OpenAI integration (via environment variables)
//!
//! Important env variables:
//!   PORT                : u16 (default 8000)
//!   OPENAI_API_KEY      : enables OpenAI integration if present
//!   OPENAI_BASE_URL     : default "https://api.openai.com/v1"
//!   OPENAI_FAST_MODEL   : default "gpt-4o-mini" (topic extraction)
//!   OPENAI_STRONG_MODEL : default "gpt-4o" (question generation)
//!   AGENT_CONFIG_PATH   : path to TOML config (prompts + generation settings)
//!   ALLOWED_ORIGINS     : comma-separated CORS origins
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use topicquiz_backend::routes::build_router;
use topicquiz_backend::state::AppState;
use topicquiz_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::new()?);
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "topicquiz_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "topicquiz_backend", error = %e, "Failed to listen for shutdown signal");
  }
  info!(target: "topicquiz_backend", "Shutdown signal received");
}
