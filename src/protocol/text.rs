//! # ESC/POS Text Commands
//!
//! Justification and plain text lines.
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```

use super::commands::{ESC, LF, SELECT_JUSTIFICATION};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

impl Alignment {
    /// Map the `n` parameter of `ESC a n`. Unknown values fall back to left.
    pub fn from_wire(n: u8) -> Self {
        match n {
            1 => Alignment::Center,
            2 => Alignment::Right,
            _ => Alignment::Left,
        }
    }

    /// Map an ePOS `align` attribute value. Unknown values fall back to left.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "center" => Alignment::Center,
            "right" => Alignment::Right,
            _ => Alignment::Left,
        }
    }
}

/// # Select Justification (ESC a n)
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
/// | Decimal | 27 97 n  |
///
/// ## Parameters
///
/// - `n = 0`: Left alignment (default)
/// - `n = 1`: Center alignment
/// - `n = 2`: Right alignment
///
/// ## Example
///
/// ```
/// use eposbridge::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, SELECT_JUSTIFICATION, alignment as u8]
}

/// Raw UTF-8 bytes of `content` followed by a single `LF`.
pub fn line(content: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 1);
    out.extend_from_slice(content.as_bytes());
    out.push(LF);
    out
}
