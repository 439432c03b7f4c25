//! # ESC/POS Raster Graphics (GS v 0)
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```
//!
//! Rows are stored top to bottom, each `width_bytes` long.

use super::commands::{GS, RASTER_BIT_IMAGE, u16_le};

/// Length of the `GS v 0 m xL xH yL yH` header.
pub const RASTER_HEADER_LEN: usize = 8;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Mode, always 0 (normal density)
/// - `xL + xH × 256`: Width in bytes
/// - `yL + yH × 256`: Height in dots
/// - `k = width_bytes × height`
///
/// ## Example
///
/// ```
/// use eposbridge::protocol::graphics;
///
/// let cmd = graphics::raster(1, 2, &[0xFF, 0x00]);
/// assert_eq!(cmd, vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 2, 0, 0xFF, 0x00]);
/// ```
pub fn raster(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    debug_assert!(
        data.len() == width_bytes as usize * height as usize,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        width_bytes as usize * height as usize,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(RASTER_HEADER_LEN + data.len());
    cmd.push(GS);
    cmd.push(RASTER_BIT_IMAGE);
    cmd.push(b'0');
    cmd.push(0); // m = 0 (normal)
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(data);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_header() {
        let data = vec![0xAA; 72 * 3];
        let cmd = raster(72, 3, &data);
        assert_eq!(&cmd[..RASTER_HEADER_LEN], &[0x1D, 0x76, 0x30, 0x00, 72, 0, 3, 0]);
        assert_eq!(cmd.len(), RASTER_HEADER_LEN + data.len());
    }

    #[test]
    fn test_raster_wide_header_uses_high_bytes() {
        let data = vec![0u8; 300];
        let cmd = raster(300, 1, &data);
        // 300 = 0x012C
        assert_eq!(&cmd[4..8], &[0x2C, 0x01, 0x01, 0x00]);
    }
}
