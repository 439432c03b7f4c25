//! # Code Generation
//!
//! Converts IR programs to ESC/POS protocol bytes.

use super::ops::{Op, Program};
use crate::protocol::{commands, graphics, text};

impl Program {
    /// Compile the program to a self-terminating ESC/POS document.
    ///
    /// The output always starts with `ESC @` and ends with `GS V 0`,
    /// regardless of the ops in the program.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = commands::init();

        for op in &self.ops {
            emit(op, &mut out);
        }

        out.extend(commands::cut());
        out
    }
}

fn emit(op: &Op, out: &mut Vec<u8>) {
    match op {
        Op::Init => out.extend(commands::init()),
        Op::Feed { lines } => out.extend(commands::feed_lines(*lines)),
        Op::Text { content, align } => {
            out.extend(text::align(*align));
            out.extend(text::line(content));
        }
        Op::Image {
            pixels,
            width_bytes,
            height,
        } => out.extend(graphics::raster(*width_bytes, *height, pixels)),
        Op::Cut => out.extend(commands::cut()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::text::Alignment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_program_is_init_and_cut() {
        let program = Program::new();
        assert_eq!(program.to_bytes(), vec![0x1B, 0x40, 0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_text_center() {
        let mut program = Program::new();
        program.push(Op::text("HI", Alignment::Center));

        assert_eq!(
            program.to_bytes(),
            vec![0x1B, 0x40, 0x1B, 0x61, 0x01, b'H', b'I', 0x0A, 0x1D, 0x56, 0x00]
        );
    }

    #[test]
    fn test_feed() {
        let mut program = Program::new();
        program.push(Op::Feed { lines: 3 });

        let bytes = program.to_bytes();
        assert_eq!(&bytes[2..5], &[0x0A, 0x0A, 0x0A]);
        assert_eq!(bytes.len(), 2 + 3 + 3);
    }

    #[test]
    fn test_image() {
        let mut program = Program::new();
        program.push(Op::Image {
            pixels: vec![0xFF, 0x00],
            width_bytes: 1,
            height: 2,
        });

        assert_eq!(
            program.to_bytes(),
            vec![
                0x1B, 0x40, // init
                0x1D, 0x76, 0x30, 0x00, 0x01, 0x00, 0x02, 0x00, 0xFF, 0x00, // raster
                0x1D, 0x56, 0x00, // cut
            ]
        );
    }

    #[test]
    fn test_explicit_cut_is_kept_before_final_cut() {
        let program: Program = vec![Op::Cut].into_iter().collect();
        assert_eq!(
            program.to_bytes(),
            vec![0x1B, 0x40, 0x1D, 0x56, 0x00, 0x1D, 0x56, 0x00]
        );
    }
}
