//! # ePOS-Print Protocol
//!
//! Epson's XML print protocol as spoken by POS front-ends: requests arrive as
//! `<epos-print>` documents (usually inside a SOAP envelope) and are answered
//! with a one-line `<response>` document.
//!
//! ## Supported Elements
//!
//! | Element | Attributes | IR |
//! |---------|------------|----|
//! | `feed`  | `line` (default 1) | `Op::Feed` |
//! | `text`  | `align` = left / center / right | `Op::Text` |
//! | `image` | `height` (required), base64 body | `Op::Image` |
//!
//! Any other element is ignored.

pub mod decode;
pub mod response;

pub use decode::decode;
pub use response::ResponseCode;

use thiserror::Error;

/// Errors produced while decoding an ePOS-Print request.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// XML unparseable, body missing, or a bad attribute/payload.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Image payload length is not a whole number of rows.
    #[error("Image RAW length mismatch: {len} bytes do not divide into height={height}")]
    ImageDimensionMismatch { len: usize, height: usize },
}
