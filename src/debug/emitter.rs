//! The metadata emitter seam.
//!
//! The descriptor layer never builds metadata itself. Everything it emits goes
//! through [`MetadataEmitter`], which mirrors the handful of LLVM C entry points
//! the debug-info layout needs: integer constants, the all-ones and null
//! constants, metadata strings, and metadata nodes.

use std::fmt;

/// Bit width of an integer constant operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I1,
    I32,
    I64,
}

impl IntWidth {
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::I1 => 1,
            IntWidth::I32 => 32,
            IntWidth::I64 => 64,
        }
    }

    /// Mask selecting the bits a constant of this width keeps.
    pub fn mask(self) -> u64 {
        match self {
            IntWidth::I64 => u64::MAX,
            width => (1u64 << width.bits()) - 1,
        }
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.bits())
    }
}

/// Builder of metadata operands and nodes.
///
/// `Value` is an opaque operand handle. Handles returned by [`md_node`] may be
/// used as operands of later nodes. [`null`] is the operand LLVM stores for an
/// absent reference and must compare unequal to every node, including the
/// empty one.
///
/// [`md_node`]: MetadataEmitter::md_node
/// [`null`]: MetadataEmitter::null
pub trait MetadataEmitter {
    type Value: Copy + PartialEq + fmt::Debug;

    /// The null operand.
    fn null(&self) -> Self::Value;

    /// Integer constant, truncated to `width`.
    fn const_int(&mut self, width: IntWidth, value: u64) -> Self::Value;

    /// Constant with every bit of `width` set.
    fn const_all_ones(&mut self, width: IntWidth) -> Self::Value;

    /// Zero constant of `width`.
    fn const_null(&mut self, width: IntWidth) -> Self::Value;

    /// Metadata string operand. Empty strings are valid.
    fn md_string(&mut self, value: &str) -> Self::Value;

    /// Metadata node over `operands`, which may be empty or contain nulls.
    fn md_node(&mut self, operands: &[Self::Value]) -> Self::Value;
}
