//! # HTTP Server for ePOS-Print Clients
//!
//! Accepts ePOS-Print requests from POS front-ends, forwards them to USB or
//! network printers, and streams a preview of every job to live viewers.
//!
//! ## Usage
//!
//! ```bash
//! eposbridge serve --listen 0.0.0.0:8089
//! ```
//!
//! Then point the POS at `http://<host>:8089/ip/<printer-ip>` (or
//! `/vid/<vid>/pid/<pid>` for USB) instead of the printer itself.
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/vid/:vid/pid/:pid/cgi-bin/epos/service.cgi` | Print to USB |
//! | POST | `/ip/:ip/cgi-bin/epos/service.cgi` | Print to network |
//! | POST | `/vid/:vid/pid/:pid/success/cgi-bin/epos/service.cgi` | Preview only |
//! | POST | `/ip/:ip/success/cgi-bin/epos/service.cgi` | Preview only |
//! | GET | `/preview/ws/:printer` | Live viewer (WebSocket) |
//! | GET | `/preview/:printer/history` | Recent previews (JSON) |
//! | GET | `/preview/printers` | Printers with previews (JSON) |
//! | GET | `/health` | Liveness |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::BridgeError;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // ePOS-Print service
        .route(
            "/vid/:vid/pid/:pid/cgi-bin/epos/service.cgi",
            post(handlers::epos::print_usb),
        )
        .route(
            "/ip/:ip/cgi-bin/epos/service.cgi",
            post(handlers::epos::print_network),
        )
        .route(
            "/vid/:vid/pid/:pid/success/cgi-bin/epos/service.cgi",
            post(handlers::epos::preview_usb),
        )
        .route(
            "/ip/:ip/success/cgi-bin/epos/service.cgi",
            post(handlers::epos::preview_network),
        )
        // Preview
        .route("/preview/ws/:printer", get(handlers::preview::live))
        .route(
            "/preview/:printer/history",
            get(handlers::preview::history),
        )
        .route("/preview/printers", get(handlers::preview::printers))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use eposbridge::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), eposbridge::error::BridgeError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:8089".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), BridgeError> {
    let app = router(Arc::new(AppState::new(&config)));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            BridgeError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    info!(
        listen = %config.listen_addr,
        history_limit = config.history_limit,
        network_timeout = ?config.transport.network_timeout,
        usb_timeout = ?config.transport.usb_timeout,
        "eposbridge HTTP server started"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| BridgeError::Server(e.to_string()))?;

    Ok(())
}
