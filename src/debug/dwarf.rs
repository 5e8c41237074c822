// This module defines the DWARF vocabulary used by the descriptor layer: the LLVM debug
// metadata version that prefixes every tag operand, DwarfTag codes for the descriptor
// kinds the binding emits, DwarfLang source-language codes for compile units, and the
// DW_ATE_* base type encodings. Each is a transparent newtype over u32 with associated
// constants, so values outside the named set (vendor extensions, the lo_user..hi_user
// ranges) remain representable. Default is the zero code, which is what a descriptor
// field left unset encodes to.

//! DWARF tags, languages and base type encodings.

use std::fmt;

/// Version stamp LLVM's metadata-based debug info expects in every tag operand.
pub const LLVM_DEBUG_VERSION: u64 = 11 << 16;

/// DWARF tag identifying the kind of a debug-info entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct DwarfTag(pub u32);

impl DwarfTag {
    pub const ARRAY_TYPE: Self = Self(0x01);
    pub const ENUMERATION_TYPE: Self = Self(0x04);
    pub const MEMBER: Self = Self(0x0d);
    pub const POINTER_TYPE: Self = Self(0x0f);
    pub const COMPILE_UNIT: Self = Self(0x11);
    pub const STRUCTURE_TYPE: Self = Self(0x13);
    pub const SUBROUTINE_TYPE: Self = Self(0x15);
    pub const TYPEDEF: Self = Self(0x16);
    pub const UNION_TYPE: Self = Self(0x17);
    pub const BASE_TYPE: Self = Self(0x24);
    pub const CONST_TYPE: Self = Self(0x26);
    pub const FILE_TYPE: Self = Self(0x29);
    pub const SUBPROGRAM: Self = Self(0x2e);
    pub const VARIABLE: Self = Self(0x34);

    /// The first operand of a descriptor node: the tag stamped with the debug version.
    pub fn versioned(self) -> u64 {
        LLVM_DEBUG_VERSION + u64::from(self.0)
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::ARRAY_TYPE => "DW_TAG_array_type",
            Self::ENUMERATION_TYPE => "DW_TAG_enumeration_type",
            Self::MEMBER => "DW_TAG_member",
            Self::POINTER_TYPE => "DW_TAG_pointer_type",
            Self::COMPILE_UNIT => "DW_TAG_compile_unit",
            Self::STRUCTURE_TYPE => "DW_TAG_structure_type",
            Self::SUBROUTINE_TYPE => "DW_TAG_subroutine_type",
            Self::TYPEDEF => "DW_TAG_typedef",
            Self::UNION_TYPE => "DW_TAG_union_type",
            Self::BASE_TYPE => "DW_TAG_base_type",
            Self::CONST_TYPE => "DW_TAG_const_type",
            Self::FILE_TYPE => "DW_TAG_file_type",
            Self::SUBPROGRAM => "DW_TAG_subprogram",
            Self::VARIABLE => "DW_TAG_variable",
            _ => return None,
        })
    }
}

impl fmt::Display for DwarfTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "DW_TAG_{:#x}", self.0),
        }
    }
}

/// DWARF source language code recorded on a compile unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DwarfLang(pub u32);

impl DwarfLang {
    pub const C89: Self = Self(0x0001);
    pub const C: Self = Self(0x0002);
    pub const C_PLUS_PLUS: Self = Self(0x0004);
    // http://dwarfstd.org/ShowIssue.php?issue=101014.1&type=open
    pub const GO: Self = Self(0x0016);
    pub const RUST: Self = Self(0x001c);
}

/// DW_ATE_* encoding of a base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DwarfTypeEncoding(pub u32);

impl DwarfTypeEncoding {
    pub const ADDRESS: Self = Self(0x01);
    pub const BOOLEAN: Self = Self(0x02);
    pub const COMPLEX_FLOAT: Self = Self(0x03);
    pub const FLOAT: Self = Self(0x04);
    pub const SIGNED: Self = Self(0x05);
    pub const SIGNED_CHAR: Self = Self(0x06);
    pub const UNSIGNED: Self = Self(0x07);
    pub const UNSIGNED_CHAR: Self = Self(0x08);
    pub const IMAGINARY_FLOAT: Self = Self(0x09);
    pub const PACKED_DECIMAL: Self = Self(0x0a);
    pub const NUMERIC_STRING: Self = Self(0x0b);
    pub const EDITED: Self = Self(0x0c);
    pub const SIGNED_FIXED: Self = Self(0x0d);
    pub const UNSIGNED_FIXED: Self = Self(0x0e);
    pub const DECIMAL_FLOAT: Self = Self(0x0f);
    pub const UTF: Self = Self(0x10);
    pub const LO_USER: Self = Self(0x80);
    pub const HI_USER: Self = Self(0xff);

    /// Whether the code falls in the vendor-defined range.
    pub fn is_user_defined(self) -> bool {
        (Self::LO_USER.0..=Self::HI_USER.0).contains(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_tag_adds_debug_version() {
        assert_eq!(DwarfTag::BASE_TYPE.versioned(), 0xb0024);
        assert_eq!(DwarfTag::COMPILE_UNIT.versioned(), 720_913);
    }

    #[test]
    fn tag_display() {
        assert_eq!(DwarfTag::SUBPROGRAM.to_string(), "DW_TAG_subprogram");
        assert_eq!(DwarfTag(0x4109).to_string(), "DW_TAG_0x4109");
    }

    #[test]
    fn user_encodings() {
        assert!(DwarfTypeEncoding(0x90).is_user_defined());
        assert!(!DwarfTypeEncoding::SIGNED.is_user_defined());
    }
}
