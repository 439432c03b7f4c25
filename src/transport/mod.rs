//! # Printer Transport Layer
//!
//! Delivers encoded ESC/POS bytes to a physical printer.
//!
//! ## Available Transports
//!
//! - [`network`]: raw TCP on port 9100
//! - [`usb`]: USB bulk OUT transfer (requires the `usb` feature)
//!
//! [`PrinterTransport`] bundles both behind the [`Transport`] trait, which is
//! the seam the dispatcher talks to and tests replace with a mock.

pub mod network;
pub mod usb;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use network::NetworkTransport;
pub use usb::UsbTransport;

/// Default timeout for connecting and writing to a network printer.
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for a USB bulk write.
pub const DEFAULT_USB_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivery failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No device matched the requested identity
    #[error("Printer not found: {0}")]
    NotFound(String),

    /// USB stack error
    #[error("USB error: {0}")]
    Usb(String),

    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// I/O error while writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can hand bytes to a printer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send to a USB printer identified by hex vendor/product ids.
    async fn send_usb(
        &self,
        data: &[u8],
        vendor_id: &str,
        product_id: &str,
    ) -> Result<(), TransportError>;

    /// Send to a network printer on the raw print port.
    async fn send_network(&self, data: &[u8], host: &str) -> Result<(), TransportError>;
}

/// Timeouts applied by [`PrinterTransport`].
#[derive(Debug, Clone, Copy)]
pub struct TransportConfig {
    pub network_timeout: Duration,
    pub usb_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
            usb_timeout: DEFAULT_USB_TIMEOUT,
        }
    }
}

/// Real transport used by the server.
#[derive(Debug, Clone, Default)]
pub struct PrinterTransport {
    config: TransportConfig,
}

impl PrinterTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Transport for PrinterTransport {
    async fn send_usb(
        &self,
        data: &[u8],
        vendor_id: &str,
        product_id: &str,
    ) -> Result<(), TransportError> {
        UsbTransport::from_hex(vendor_id, product_id)?
            .with_timeout(self.config.usb_timeout)
            .send(data.to_vec())
            .await
    }

    async fn send_network(&self, data: &[u8], host: &str) -> Result<(), TransportError> {
        NetworkTransport::new(host)
            .with_timeout(self.config.network_timeout)
            .send(data)
            .await
    }
}
