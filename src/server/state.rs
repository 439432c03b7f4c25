//! Server state and configuration.

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::hub::{DEFAULT_HISTORY_LIMIT, DEFAULT_SUBSCRIBER_BUFFER, PreviewHub};
use crate::transport::{PrinterTransport, Transport, TransportConfig};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8089")
    pub listen_addr: String,
    /// Snapshots kept per printer
    pub history_limit: usize,
    /// Per-viewer channel capacity
    pub subscriber_buffer: usize,
    pub transport: TransportConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8089".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            transport: TransportConfig::default(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// State backed by the real USB/network transport.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_transport(config, Arc::new(PrinterTransport::new(config.transport)))
    }

    pub fn with_transport(config: &ServerConfig, transport: Arc<dyn Transport>) -> Self {
        let hub = PreviewHub::new(config.history_limit, config.subscriber_buffer);
        Self {
            dispatcher: Dispatcher::new(hub, transport),
        }
    }

    pub fn hub(&self) -> &PreviewHub {
        self.dispatcher.hub()
    }
}
