//! # IR Opcodes
//!
//! The command model of one print request: an ordered list of print
//! operations decoded from ePOS-Print XML and compiled to ESC/POS bytes.
//!
//! ```text
//! ePOS XML → Program (Vec<Op>) → Codegen → ESC/POS bytes
//! ```
//!
//! Order is print order. The leading `Init` and trailing `Cut` of every
//! document are added by codegen and are not stored here by the decoder.

use crate::protocol::text::Alignment;

/// IR opcodes - one atomic print operation each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Initialize printer (ESC @).
    Init,

    /// Feed `lines` blank lines.
    Feed { lines: u32 },

    /// One line of text with its justification.
    Text { content: String, align: Alignment },

    /// Bit-packed monochrome image, `width_bytes × height` bytes, MSB first.
    Image {
        pixels: Vec<u8>,
        width_bytes: u16,
        height: u16,
    },

    /// Full paper cut.
    Cut,
}

impl Op {
    /// Shorthand for a text op.
    pub fn text(content: impl Into<String>, align: Alignment) -> Self {
        Op::Text {
            content: content.into(),
            align,
        }
    }
}

/// A sequence of IR ops forming a complete print document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an op to the program.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Get the number of ops in the program.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over ops.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_new() {
        let program = Program::new();
        assert!(program.is_empty());
    }

    #[test]
    fn test_program_push_keeps_order() {
        let mut program = Program::new();
        program.push(Op::text("a", Alignment::Left));
        program.push(Op::Feed { lines: 2 });
        program.push(Op::text("b", Alignment::Right));
        assert_eq!(program.len(), 3);
        assert_eq!(program.ops[1], Op::Feed { lines: 2 });
    }

    #[test]
    fn test_program_from_iter() {
        let program: Program = vec![Op::Init, Op::Cut].into_iter().collect();
        assert_eq!(program.ops, vec![Op::Init, Op::Cut]);
    }
}
