//! # ESC/POS Control Commands
//!
//! Printer control instructions: initialization, line feed, and paper cut.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC a n`, `GS V m`, `GS v 0 m xL xH yL yH d...`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte (0x1B)
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix (0x1D)
///
/// Used for graphics (`GS v 0`) and the cutter (`GS V`).
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// Second byte of `ESC @`.
pub const INIT: u8 = b'@';

/// Second byte of `ESC a n`.
pub const SELECT_JUSTIFICATION: u8 = b'a';

/// Second byte of `GS v 0`.
pub const RASTER_BIT_IMAGE: u8 = b'v';

/// Second byte of `GS V m`.
pub const CUT_PAPER: u8 = b'V';

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets the printer to its power-on mode.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## Example
///
/// ```
/// use eposbridge::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, INIT]
}

// ============================================================================
// PAPER CONTROL
// ============================================================================

/// # Full Cut (GS V 0)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V NUL |
/// | Hex     | 1D 56 00 |
/// | Decimal | 29 86 0  |
///
/// Every encoded document ends with this instruction.
#[inline]
pub fn cut() -> Vec<u8> {
    vec![GS, CUT_PAPER, 0]
}

/// Feed `lines` blank lines as literal `LF` bytes.
///
/// ```
/// use eposbridge::protocol::commands;
///
/// assert_eq!(commands::feed_lines(3), vec![0x0A, 0x0A, 0x0A]);
/// assert!(commands::feed_lines(0).is_empty());
/// ```
#[inline]
pub fn feed_lines(lines: u32) -> Vec<u8> {
    vec![LF; lines as usize]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use eposbridge::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(576), [0x40, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

/// Decode little-endian `[low, high]` back into a u16.
#[inline]
pub const fn u16_from_le(low: u8, high: u8) -> u16 {
    low as u16 | ((high as u16) << 8)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_cut() {
        assert_eq!(cut(), vec![0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_feed_lines() {
        assert_eq!(feed_lines(1), vec![0x0A]);
        assert_eq!(feed_lines(2), vec![0x0A, 0x0A]);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
    }

    #[test]
    fn test_u16_from_le_inverts_u16_le() {
        for value in [0u16, 1, 255, 256, 576, 0x1234, u16::MAX] {
            let [lo, hi] = u16_le(value);
            assert_eq!(u16_from_le(lo, hi), value);
        }
    }
}
