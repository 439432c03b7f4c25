//! # Intermediate Representation (IR)
//!
//! The command model sitting between the ePOS-Print XML decoder and the raw
//! ESC/POS bytes.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────┐
//! │  ePOS XML   │ ──► │     IR      │ ──► │ Codegen  │
//! │  (decoder)  │     │  (Vec<Op>)  │     │ (bytes)  │
//! └─────────────┘     └─────────────┘     └──────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use eposbridge::ir::{Op, Program};
//! use eposbridge::protocol::text::Alignment;
//!
//! let mut program = Program::new();
//! program.push(Op::text("HELLO", Alignment::Center));
//! program.push(Op::Feed { lines: 2 });
//!
//! let bytes = program.to_bytes();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! assert_eq!(&bytes[bytes.len() - 3..], &[0x1D, 0x56, 0x00]);
//! ```

mod codegen;
mod ops;

pub use ops::*;
