//! HTTP handlers for the server.

pub mod epos;
pub mod preview;

/// Handle GET /health
pub async fn health() -> &'static str {
    "ok"
}
