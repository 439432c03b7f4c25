//! Glyph generation for preview rendering.
//!
//! Uses the Spleen 12×24 bitmap font, the same cell size as ESC/POS Font A.

use spleen_font::{FONT_12X24, PSF2Font};

/// Glyph cell width in dots.
pub const GLYPH_WIDTH: usize = 12;

/// Glyph cell height in dots.
pub const GLYPH_HEIGHT: usize = 24;

/// Generate a glyph bitmap for a printable ASCII byte.
///
/// Returns `GLYPH_WIDTH * GLYPH_HEIGHT` cells, each 0 (white) or 1 (black).
/// Bytes the font has no glyph for render as a box outline.
pub fn generate_glyph(byte: u8) -> Vec<u8> {
    let mut glyph = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];

    let rendered = PSF2Font::new(FONT_12X24).ok().and_then(|mut spleen| {
        let glyph_rows = spleen.glyph_for_utf8(&[byte])?;
        for (row_y, row) in glyph_rows.enumerate() {
            for (col_x, on) in row.enumerate() {
                if row_y < GLYPH_HEIGHT && col_x < GLYPH_WIDTH {
                    glyph[row_y * GLYPH_WIDTH + col_x] = if on { 1 } else { 0 };
                }
            }
        }
        Some(())
    });

    if rendered.is_none() {
        draw_box(&mut glyph, GLYPH_WIDTH, GLYPH_HEIGHT);
    }

    glyph
}

/// Draw a box outline in the glyph buffer.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_dimensions() {
        assert_eq!(generate_glyph(b'A').len(), GLYPH_WIDTH * GLYPH_HEIGHT);
    }

    #[test]
    fn test_letter_has_ink() {
        assert!(generate_glyph(b'H').iter().any(|&p| p == 1));
    }

    #[test]
    fn test_space_is_blank() {
        assert!(generate_glyph(b' ').iter().all(|&p| p == 0));
    }
}
