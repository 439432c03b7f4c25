//! # Error Types
//!
//! Top-level error for the binary: startup, configuration, and the offline
//! render command. Per-layer errors live next to their layer
//! ([`DecodeError`](crate::epos::DecodeError),
//! [`TransportError`](crate::transport::TransportError),
//! [`PreviewError`](crate::preview::PreviewError),
//! [`DispatchError`](crate::dispatch::DispatchError)).

use thiserror::Error;

/// Main error type for eposbridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Invalid command-line or server configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP server failed to bind or stopped with an error
    #[error("Server error: {0}")]
    Server(String),

    /// ePOS-Print document could not be decoded
    #[error(transparent)]
    Decode(#[from] crate::epos::DecodeError),

    /// Preview could not be encoded
    #[error(transparent)]
    Preview(#[from] crate::preview::PreviewError),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
