//! # eposbridge - ePOS-Print Bridge for ESC/POS Printers
//!
//! eposbridge sits between POS software that speaks Epson's ePOS-Print XML and
//! plain ESC/POS receipt printers on USB or the network. It provides:
//!
//! - **Decoding**: ePOS-Print XML to a typed print program
//! - **Encoding**: print program to ESC/POS bytes
//! - **Preview**: ESC/POS bytes back to a receipt image
//! - **Fan-out**: every job's preview pushed to live viewers per printer
//! - **Transport**: USB bulk and raw TCP delivery
//!
//! ## Quick Start
//!
//! ```
//! use eposbridge::{epos, preview};
//!
//! let xml = r#"<epos-print>
//!     <text align="center">Table 4</text>
//!     <feed line="2"/>
//! </epos-print>"#;
//!
//! let program = epos::decode(xml)?;
//! let bytes = program.to_bytes();
//! assert_eq!(&bytes[..2], b"\x1b@");
//!
//! let rendered = preview::render_preview(&bytes)?;
//! assert_eq!(rendered.width, 600);
//!
//! # Ok::<(), eposbridge::error::BridgeError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`epos`] | ePOS-Print request decoding and responses |
//! | [`ir`] | Print program and ESC/POS code generation |
//! | [`protocol`] | ESC/POS command builders |
//! | [`preview`] | ESC/POS interpreter and PNG rendering |
//! | [`hub`] | Per-printer preview history and live fan-out |
//! | [`dispatch`] | Decode, encode, preview, deliver |
//! | [`transport`] | USB and network delivery |
//! | [`printer`] | Printer identities |
//! | [`server`] | HTTP and WebSocket front end |
//! | [`error`] | Error types |

pub mod dispatch;
pub mod epos;
pub mod error;
pub mod hub;
pub mod ir;
pub mod preview;
pub mod printer;
pub mod protocol;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use dispatch::{Dispatcher, PrintJob};
pub use error::BridgeError;
pub use hub::PreviewHub;
pub use printer::PrinterId;
