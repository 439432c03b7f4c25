//! # ESC/POS Protocol Implementation
//!
//! Byte-level builders for the subset of ESC/POS this bridge speaks. The
//! encoder (`ir::codegen`) emits these sequences and the preview interpreter
//! (`preview`) parses exactly the same sequences back.
//!
//! ## Module Structure
//!
//! - [`commands`]: Init, line feed, cut, byte order helpers
//! - [`text`]: Justification and text lines
//! - [`graphics`]: Raster bit image (`GS v 0`)
//!
//! ## Instruction Table
//!
//! | Instruction | Bytes |
//! |---|---|
//! | Init | `1B 40` |
//! | SetAlignment(n) | `1B 61 n` |
//! | RasterImage | `1D 76 30 00 wL wH hL hH data...` |
//! | Cut | `1D 56 00` |
//! | Feed(n) | `n × 0A` |
//! | Text | UTF-8 bytes, `0A` |
//!
//! ## Usage Example
//!
//! ```
//! use eposbridge::protocol::{commands, graphics, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(text::Alignment::Center));
//! data.extend(text::line("RECEIPT"));
//! data.extend(graphics::raster(1, 1, &[0xFF]));
//! data.extend(commands::cut());
//! ```

pub mod commands;
pub mod graphics;
pub mod text;
