//! # ESC/POS to PNG Preview Renderer
//!
//! Replays an ESC/POS byte stream against a virtual canvas and produces the
//! image a receipt printer would have printed.
//!
//! ## Architecture
//!
//! ```text
//! ESC/POS bytes → PreviewRenderer → PNG bytes
//!                     ↓
//!               Walk the stream one instruction at a time:
//!               - ESC @        reset cursor and alignment
//!               - ESC a n      set alignment
//!               - GS v 0 ...   blit raster image
//!               - GS V m       cut gap
//!               - 0x20..=0x7E  draw glyph
//!               - LF           next line
//!               - anything else is skipped one byte at a time
//! ```
//!
//! The renderer never fails on bad input: unknown bytes are stepped over and
//! a raster image declaring more data than the stream holds is drawn with
//! whatever bytes are present.
//!
//! ## Example
//!
//! ```
//! use eposbridge::ir::{Op, Program};
//! use eposbridge::preview::render_preview;
//! use eposbridge::protocol::text::Alignment;
//!
//! let mut program = Program::new();
//! program.push(Op::text("HELLO", Alignment::Center));
//!
//! let preview = render_preview(&program.to_bytes()).unwrap();
//! assert_eq!(preview.width, 600);
//! ```

mod font;
mod text;

pub use font::{GLYPH_HEIGHT, GLYPH_WIDTH, generate_glyph};

use crate::protocol::commands::{
    CUT_PAPER, ESC, GS, INIT, LF, RASTER_BIT_IMAGE, SELECT_JUSTIFICATION, u16_from_le,
};
use crate::protocol::graphics::RASTER_HEADER_LEN;
use crate::protocol::text::Alignment;
use image::{GrayImage, Luma};
use std::collections::HashMap;
use thiserror::Error;

/// Canvas width in dots.
pub const CANVAS_WIDTH: usize = 600;

/// Left/right margin and cursor origin in dots.
pub const MARGIN: usize = 20;

/// Vertical advance per line feed.
pub const LINE_HEIGHT: usize = 25;

/// Vertical gap after a raster image.
pub const IMAGE_GAP: usize = 20;

/// Vertical gap left by a cut.
pub const CUT_GAP: usize = 50;

/// Blank rows kept below the last cursor position.
pub const BOTTOM_MARGIN: usize = 50;

/// Hard limit on canvas height; anything below is not drawn.
pub const MAX_CANVAS_HEIGHT: usize = 20_000;

/// Errors that can occur during preview rendering.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Image encoding error: {0}")]
    ImageEncode(String),
}

/// Cursor and alignment tracked while walking a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub x: usize,
    pub y: usize,
    pub alignment: Alignment,
    /// Whether a glyph has been drawn on the current line.
    pub line_started: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            x: MARGIN,
            y: MARGIN,
            alignment: Alignment::Left,
            line_started: false,
        }
    }
}

impl RenderState {
    /// Back to origin, left aligned. Used for `ESC @`, even mid-stream.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn carriage_return(&mut self) {
        self.x = MARGIN;
        self.line_started = false;
    }
}

/// Rendered preview, PNG encoded.
#[derive(Debug, Clone)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Preview renderer for ESC/POS byte streams.
pub struct PreviewRenderer {
    width: usize,
    buffer: Vec<u8>,
    height: usize,
    /// One past the lowest row touched by the cursor or by ink.
    extent: usize,
    state: RenderState,
    glyph_cache: HashMap<u8, Vec<u8>>,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    pub fn new() -> Self {
        // Start with a reasonable initial height
        let initial_height = 200;
        Self {
            width: CANVAS_WIDTH,
            buffer: vec![0u8; CANVAS_WIDTH * initial_height],
            height: initial_height,
            extent: MARGIN,
            state: RenderState::default(),
            glyph_cache: HashMap::new(),
        }
    }

    /// Current cursor state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Ensure buffer has room for the given y position.
    fn ensure_height(&mut self, y: usize) {
        let needed_height = (y + 1).min(MAX_CANVAS_HEIGHT);
        if needed_height > self.height {
            let new_height = needed_height.max(self.height + 200).min(MAX_CANVAS_HEIGHT);
            self.buffer.resize(self.width * new_height, 0);
            self.height = new_height;
        }
    }

    /// Set a pixel black. Out-of-canvas coordinates are ignored.
    fn set_black(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= MAX_CANVAS_HEIGHT {
            return;
        }
        self.ensure_height(y);
        self.buffer[y * self.width + x] = 1;
        self.extent = self.extent.max(y + 1);
    }

    fn advance_y(&mut self, dots: usize) {
        self.state.y += dots;
        self.extent = self.extent.max(self.state.y);
    }

    /// Walk the whole stream.
    pub fn interpret(&mut self, data: &[u8]) {
        let mut pos = 0;
        while pos < data.len() {
            pos += self.step(&data[pos..]);
        }
    }

    /// Process the instruction at the head of `rest` and return how many
    /// bytes it consumed (always at least one).
    fn step(&mut self, rest: &[u8]) -> usize {
        match rest {
            [ESC, INIT, ..] => {
                self.state.reset();
                2
            }

            [ESC, SELECT_JUSTIFICATION, n, ..] => {
                self.state.alignment = Alignment::from_wire(*n);
                3
            }

            [GS, RASTER_BIT_IMAGE, b'0', _mode, xl, xh, yl, yh, ..] => {
                let width_bytes = u16_from_le(*xl, *xh) as usize;
                let height = u16_from_le(*yl, *yh) as usize;
                let body = &rest[RASTER_HEADER_LEN..];
                let available = (width_bytes * height).min(body.len());
                self.render_raster(width_bytes, height, &body[..available]);
                RASTER_HEADER_LEN + available
            }

            [GS, CUT_PAPER, _mode, ..] => {
                // Text after a cut starts a fresh line at the current alignment
                self.advance_y(CUT_GAP);
                self.state.carriage_return();
                3
            }

            [LF, ..] => {
                self.newline();
                1
            }

            [byte, ..] if is_printable(*byte) => {
                if !self.state.line_started {
                    let run = rest.iter().take_while(|b| is_printable(**b)).count();
                    self.start_line(run);
                }
                self.render_char(*byte);
                1
            }

            _ => 1,
        }
    }

    /// Render raster graphics data at the current alignment.
    ///
    /// `data` may be shorter than `width_bytes * height`; missing rows stay
    /// white. An empty chunk draws nothing and does not move the cursor.
    fn render_raster(&mut self, width_bytes: usize, height: usize, data: &[u8]) {
        if data.is_empty() {
            return;
        }

        let width_dots = width_bytes * 8;
        let start_x = match self.state.alignment {
            Alignment::Left => MARGIN,
            Alignment::Center => self.width.saturating_sub(width_dots) / 2,
            Alignment::Right => self.width.saturating_sub(width_dots + MARGIN),
        };
        let top = self.state.y;

        self.ensure_height(top + height);

        for (byte_idx, &byte) in data.iter().enumerate() {
            if byte == 0 {
                continue;
            }
            let row = byte_idx / width_bytes;
            let col_base = (byte_idx % width_bytes) * 8;
            for bit in 0..8 {
                // MSB is the leftmost dot, 1 = ink
                if (byte >> (7 - bit)) & 1 == 1 {
                    self.set_black(start_x + col_base + bit, top + row);
                }
            }
        }

        self.advance_y(height + IMAGE_GAP);
        self.state.carriage_return();
    }

    /// Move to next line.
    fn newline(&mut self) {
        self.state.carriage_return();
        self.advance_y(LINE_HEIGHT);
    }

    /// Rows that hold content, including the bottom margin.
    fn cropped_height(&self) -> usize {
        (self.extent + BOTTOM_MARGIN).min(MAX_CANVAS_HEIGHT)
    }

    /// Snapshot the canvas as a grayscale image (0 = ink, 255 = paper).
    pub fn to_image(&self) -> GrayImage {
        let height = self.cropped_height();
        GrayImage::from_fn(self.width as u32, height as u32, |x, y| {
            let idx = y as usize * self.width + x as usize;
            let is_black = self.buffer.get(idx).copied().unwrap_or(0) != 0;
            Luma([if is_black { 0u8 } else { 255u8 }])
        })
    }

    /// Convert the canvas to PNG bytes.
    pub fn to_png(&self) -> Result<Preview, PreviewError> {
        use image::ImageEncoder;

        let img = self.to_image();
        let (width, height) = img.dimensions();

        let mut png = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png);
        encoder
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::L8)
            .map_err(|e: image::ImageError| PreviewError::ImageEncode(e.to_string()))?;

        Ok(Preview { width, height, png })
    }
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Interpret an ESC/POS stream and return the canvas image.
pub fn render_image(data: &[u8]) -> GrayImage {
    let mut renderer = PreviewRenderer::new();
    renderer.interpret(data);
    renderer.to_image()
}

/// Interpret an ESC/POS stream and return a PNG preview.
pub fn render_preview(data: &[u8]) -> Result<Preview, PreviewError> {
    let mut renderer = PreviewRenderer::new();
    renderer.interpret(data);
    renderer.to_png()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{commands, graphics, text};

    fn is_ink(img: &GrayImage, x: u32, y: u32) -> bool {
        img.get_pixel(x, y)[0] == 0
    }

    fn row_has_ink(img: &GrayImage, y: u32) -> bool {
        (0..img.width()).any(|x| is_ink(img, x, y))
    }

    #[test]
    fn test_initial_state_is_origin() {
        let renderer = PreviewRenderer::new();
        assert_eq!(renderer.state(), &RenderState::default());
        assert_eq!((renderer.state().x, renderer.state().y), (20, 20));
    }

    #[test]
    fn test_empty_stream_renders() {
        let preview = render_preview(&[]).unwrap();
        assert_eq!(preview.width, CANVAS_WIDTH as u32);
        assert_eq!(preview.height, (MARGIN + BOTTOM_MARGIN) as u32);
        assert!(preview.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_init_resets_mid_stream() {
        let mut renderer = PreviewRenderer::new();
        let mut data = text::align(Alignment::Right);
        data.extend(text::line("abc"));
        data.extend(commands::init());
        renderer.interpret(&data);
        assert_eq!(renderer.state(), &RenderState::default());
        // The text drawn before the reset still counts toward the crop
        assert!(renderer.cropped_height() >= MARGIN + LINE_HEIGHT + BOTTOM_MARGIN);
    }

    #[test]
    fn test_alignment_mapping() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(&[0x1B, 0x61, 0x01]);
        assert_eq!(renderer.state().alignment, Alignment::Center);
        renderer.interpret(&[0x1B, 0x61, 0x02]);
        assert_eq!(renderer.state().alignment, Alignment::Right);
        renderer.interpret(&[0x1B, 0x61, 0x09]);
        assert_eq!(renderer.state().alignment, Alignment::Left);
    }

    #[test]
    fn test_raster_bits_are_exact() {
        // Row 0 all ones (ink), row 1 all zeros (paper)
        let img = render_image(&graphics::raster(1, 2, &[0xFF, 0x00]));
        let top = MARGIN as u32;
        for x in 0..8 {
            assert!(is_ink(&img, MARGIN as u32 + x, top));
            assert!(!is_ink(&img, MARGIN as u32 + x, top + 1));
        }
        assert!(!is_ink(&img, MARGIN as u32 + 8, top));
        assert!(!is_ink(&img, MARGIN as u32 - 1, top));
    }

    #[test]
    fn test_raster_msb_is_leftmost() {
        let img = render_image(&graphics::raster(1, 1, &[0b1000_0001]));
        let (x0, y) = (MARGIN as u32, MARGIN as u32);
        assert!(is_ink(&img, x0, y));
        assert!(!is_ink(&img, x0 + 1, y));
        assert!(is_ink(&img, x0 + 7, y));
    }

    #[test]
    fn test_raster_advances_cursor() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(&graphics::raster(2, 10, &[0xAA; 20]));
        assert_eq!(renderer.state().y, MARGIN + 10 + IMAGE_GAP);
    }

    #[test]
    fn test_raster_alignment_positions() {
        let mut center = text::align(Alignment::Center);
        center.extend(graphics::raster(1, 1, &[0x80]));
        let img = render_image(&center);
        assert!(is_ink(&img, ((CANVAS_WIDTH - 8) / 2) as u32, MARGIN as u32));

        let mut right = text::align(Alignment::Right);
        right.extend(graphics::raster(1, 1, &[0x01]));
        let img = render_image(&right);
        assert!(is_ink(&img, (CANVAS_WIDTH - MARGIN - 1) as u32, MARGIN as u32));
    }

    #[test]
    fn test_truncated_raster_is_drawn_partially() {
        // Declares 1x4 but only two rows are present
        let data = [0x1D, 0x76, 0x30, 0x00, 0x01, 0x00, 0x04, 0x00, 0xFF, 0xFF];
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(&data);
        let img = renderer.to_image();
        assert!(is_ink(&img, MARGIN as u32, MARGIN as u32 + 1));
        assert!(!is_ink(&img, MARGIN as u32, MARGIN as u32 + 2));
        assert_eq!(renderer.state().y, MARGIN + 4 + IMAGE_GAP);
    }

    #[test]
    fn test_raster_without_data_is_ignored() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(&[0x1D, 0x76, 0x30, 0x00, 0x01, 0x00, 0x04, 0x00]);
        assert_eq!(renderer.state().y, MARGIN);
    }

    #[test]
    fn test_truncated_header_is_skipped() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(&[0x1D, 0x76, 0x30, 0x00, 0x01]);
        // Only the printable tail ("v0") is drawn, no raster row advance
        assert_eq!(renderer.state().y, MARGIN);
        assert_eq!(renderer.state().x, MARGIN + 2 * GLYPH_WIDTH);
    }

    #[test]
    fn test_cut_advances_without_ink() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(&commands::cut());
        assert_eq!(renderer.state().y, MARGIN + CUT_GAP);
        let img = renderer.to_image();
        assert!((0..img.height()).all(|y| !row_has_ink(&img, y)));
    }

    #[test]
    fn test_cut_mid_line_starts_new_line() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(b"AB");
        renderer.interpret(&commands::cut());
        assert_eq!(renderer.state().x, MARGIN);
        assert!(!renderer.state().line_started);

        renderer.interpret(&text::align(Alignment::Right));
        renderer.interpret(b"C");
        assert_eq!(renderer.state().y, MARGIN + CUT_GAP);
        assert_eq!(renderer.state().x, CANVAS_WIDTH - MARGIN);
    }

    #[test]
    fn test_newline_moves_down_and_left() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(b"AB\n");
        assert_eq!(renderer.state().x, MARGIN);
        assert_eq!(renderer.state().y, MARGIN + LINE_HEIGHT);
    }

    #[test]
    fn test_text_advances_by_glyph_width() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(b"ABC");
        assert_eq!(renderer.state().x, MARGIN + 3 * GLYPH_WIDTH);
    }

    #[test]
    fn test_unknown_bytes_are_skipped() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(&[0x00, 0x07, 0xFF, 0x1B, 0x1B]);
        assert_eq!(renderer.state(), &RenderState::default());
    }

    #[test]
    fn test_crop_follows_cursor() {
        let mut renderer = PreviewRenderer::new();
        renderer.interpret(b"\n\n\n");
        let img = renderer.to_image();
        assert_eq!(img.height() as usize, MARGIN + 3 * LINE_HEIGHT + BOTTOM_MARGIN);
    }

    #[test]
    fn test_canvas_height_is_capped() {
        let data = vec![LF; MAX_CANVAS_HEIGHT];
        let img = render_image(&data);
        assert_eq!(img.height() as usize, MAX_CANVAS_HEIGHT);
    }
}
