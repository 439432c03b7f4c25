//! Text rendering for preview.

use super::font::{GLYPH_HEIGHT, GLYPH_WIDTH, generate_glyph};
use super::{LINE_HEIGHT, MARGIN, PreviewRenderer};
use crate::protocol::text::Alignment;

impl PreviewRenderer {
    /// Position the cursor for a new line of `run` glyphs.
    ///
    /// Runs wider than the printable area start at the left margin.
    pub(super) fn start_line(&mut self, run: usize) {
        let text_width = run * GLYPH_WIDTH;
        let printable = self.width - 2 * MARGIN;

        self.state.x = if text_width >= printable {
            MARGIN
        } else {
            match self.state.alignment {
                Alignment::Left => MARGIN,
                Alignment::Center => (self.width - text_width) / 2,
                Alignment::Right => self.width - MARGIN - text_width,
            }
        };
        self.state.line_started = true;
    }

    /// Render a single glyph at the cursor and advance by its width.
    ///
    /// Wraps to the next line when the glyph would cross the right margin.
    pub(super) fn render_char(&mut self, byte: u8) {
        if self.state.x + GLYPH_WIDTH > self.width - MARGIN {
            self.state.x = MARGIN;
            self.advance_y(LINE_HEIGHT);
        }

        let glyph = self.get_glyph(byte);
        let base_x = self.state.x;
        let base_y = self.state.y;

        for gy in 0..GLYPH_HEIGHT {
            for gx in 0..GLYPH_WIDTH {
                if glyph[gy * GLYPH_WIDTH + gx] != 0 {
                    self.set_black(base_x + gx, base_y + gy);
                }
            }
        }

        self.state.x += GLYPH_WIDTH;
    }

    /// Get or generate the glyph for a byte.
    fn get_glyph(&mut self, byte: u8) -> Vec<u8> {
        if let Some(glyph) = self.glyph_cache.get(&byte) {
            return glyph.clone();
        }

        let glyph = generate_glyph(byte);
        self.glyph_cache.insert(byte, glyph.clone());
        glyph
    }
}

#[cfg(test)]
mod tests {
    use super::super::{CANVAS_WIDTH, render_image};
    use super::*;
    use crate::protocol::text;

    /// Leftmost and rightmost inked columns in the first text row band.
    fn ink_span(data: &[u8]) -> (u32, u32) {
        let img = render_image(data);
        let rows = MARGIN as u32..(MARGIN + GLYPH_HEIGHT) as u32;
        let cols: Vec<u32> = (0..img.width())
            .filter(|&x| rows.clone().any(|y| img.get_pixel(x, y)[0] == 0))
            .collect();
        (cols[0], cols[cols.len() - 1])
    }

    fn aligned(alignment: Alignment, content: &str) -> Vec<u8> {
        let mut data = text::align(alignment);
        data.extend(text::line(content));
        data
    }

    #[test]
    fn test_left_text_starts_at_margin() {
        let (left, _) = ink_span(&aligned(Alignment::Left, "HHHH"));
        assert!(left >= MARGIN as u32 && left < (MARGIN + GLYPH_WIDTH) as u32);
    }

    #[test]
    fn test_center_text_is_centered() {
        let (left, right) = ink_span(&aligned(Alignment::Center, "HHHH"));
        let mid = (left + right) / 2;
        let canvas_mid = CANVAS_WIDTH as u32 / 2;
        assert!(mid.abs_diff(canvas_mid) <= GLYPH_WIDTH as u32);
    }

    #[test]
    fn test_right_text_ends_at_margin() {
        let (_, right) = ink_span(&aligned(Alignment::Right, "HHHH"));
        let limit = (CANVAS_WIDTH - MARGIN) as u32;
        assert!(right < limit && right >= limit - GLYPH_WIDTH as u32);
    }

    #[test]
    fn test_alignment_change_mid_line_applies_to_next_line() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(b"AB");
        renderer.interpret(&text::align(Alignment::Right));
        renderer.interpret(b"C");
        assert_eq!(renderer.state().x, MARGIN + 3 * GLYPH_WIDTH);
    }

    #[test]
    fn test_long_line_wraps() {
        let per_line = (CANVAS_WIDTH - 2 * MARGIN) / GLYPH_WIDTH;
        let content = "x".repeat(per_line + 1);
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(content.as_bytes());
        assert_eq!(renderer.state().y, MARGIN + LINE_HEIGHT);
        assert_eq!(renderer.state().x, MARGIN + GLYPH_WIDTH);
    }

    #[test]
    fn test_glyph_cache_is_reused() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(b"AAAA");
        assert_eq!(renderer.glyph_cache.len(), 1);
    }
}
