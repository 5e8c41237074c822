// This module provides MetadataTable, an in-memory MetadataEmitter that needs no LLVM.
// Operands are small Copy values (MdValue): the null operand, integer constants tagged
// with their width, indices into a uniqued string table, indices into the node table,
// and named stand-ins for IR globals. Strings are uniqued the way LLVM uniques MDString;
// nodes deliberately are not, so every md_node call yields a fresh index and the node
// count equals the number of nodes the descriptor layer actually built. The table keeps
// named metadata (llvm.dbg.cu and friends) and renders the whole thing in LLVM's textual
// metadata syntax through Display, which is how debug info is inspected without a
// native toolchain.

//! In-memory metadata emitter with textual rendering.

use std::fmt::{self, Write};

use hashbrown::HashMap;

use super::emitter::{IntWidth, MetadataEmitter};

/// Operand produced by a [`MetadataTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MdValue {
    #[default]
    Null,
    Int { width: IntWidth, value: u64 },
    String(u32),
    Node(u32),
    Global(u32),
}

impl MdValue {
    pub fn i32(value: u64) -> Self {
        MdValue::Int {
            width: IntWidth::I32,
            value: value & IntWidth::I32.mask(),
        }
    }

    pub fn bool(value: bool) -> Self {
        MdValue::Int {
            width: IntWidth::I1,
            value: u64::from(value),
        }
    }
}

/// Metadata held in memory instead of an LLVM context.
#[derive(Debug, Default, Clone)]
pub struct MetadataTable {
    strings: Vec<String>,
    string_ids: HashMap<String, u32>,
    nodes: Vec<Vec<MdValue>>,
    globals: Vec<String>,
    named: Vec<(String, Vec<MdValue>)>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stand-in for an IR global called `name`, for embedding in descriptors.
    pub fn global(&mut self, name: &str) -> MdValue {
        let idx = self.globals.len() as u32;
        self.globals.push(name.to_string());
        MdValue::Global(idx)
    }

    /// Append `value` to the named metadata list `name`.
    pub fn add_named_metadata(&mut self, name: &str, value: MdValue) {
        match self.named.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value),
            None => self.named.push((name.to_string(), vec![value])),
        }
    }

    pub fn named_metadata(&self, name: &str) -> Option<&[MdValue]> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Operands of a node, or `None` if `value` is not a node.
    pub fn operands(&self, value: MdValue) -> Option<&[MdValue]> {
        match value {
            MdValue::Node(idx) => self.nodes.get(idx as usize).map(Vec::as_slice),
            _ => None,
        }
    }

    /// Contents of a string operand.
    pub fn string(&self, value: MdValue) -> Option<&str> {
        match value {
            MdValue::String(idx) => self.strings.get(idx as usize).map(String::as_str),
            _ => None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    fn write_value(&self, out: &mut impl Write, value: MdValue) -> fmt::Result {
        match value {
            MdValue::Null => out.write_str("null"),
            MdValue::Int { width: IntWidth::I1, value } => {
                write!(out, "i1 {}", if value != 0 { "true" } else { "false" })
            }
            MdValue::Int { width, value } => write!(out, "{} {}", width, value),
            MdValue::String(idx) => {
                out.write_str("!\"")?;
                for byte in self.strings[idx as usize].bytes() {
                    if byte == b'"' || byte == b'\\' || !(0x20..0x7f).contains(&byte) {
                        write!(out, "\\{:02X}", byte)?;
                    } else {
                        out.write_char(byte as char)?;
                    }
                }
                out.write_char('"')
            }
            MdValue::Node(idx) => write!(out, "!{}", idx),
            MdValue::Global(idx) => write!(out, "ptr @{}", self.globals[idx as usize]),
        }
    }

    fn write_list(&self, out: &mut impl Write, values: &[MdValue]) -> fmt::Result {
        out.write_str("!{")?;
        for (i, &value) in values.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            self.write_value(out, value)?;
        }
        out.write_char('}')
    }
}

impl MetadataEmitter for MetadataTable {
    type Value = MdValue;

    fn null(&self) -> MdValue {
        MdValue::Null
    }

    fn const_int(&mut self, width: IntWidth, value: u64) -> MdValue {
        MdValue::Int {
            width,
            value: value & width.mask(),
        }
    }

    fn const_all_ones(&mut self, width: IntWidth) -> MdValue {
        MdValue::Int {
            width,
            value: width.mask(),
        }
    }

    fn const_null(&mut self, width: IntWidth) -> MdValue {
        MdValue::Int { width, value: 0 }
    }

    fn md_string(&mut self, value: &str) -> MdValue {
        if let Some(&idx) = self.string_ids.get(value) {
            return MdValue::String(idx);
        }
        let idx = self.strings.len() as u32;
        self.strings.push(value.to_string());
        self.string_ids.insert(value.to_string(), idx);
        MdValue::String(idx)
    }

    fn md_node(&mut self, operands: &[MdValue]) -> MdValue {
        let idx = self.nodes.len() as u32;
        self.nodes.push(operands.to_vec());
        MdValue::Node(idx)
    }
}

impl fmt::Display for MetadataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in &self.named {
            write!(f, "!{} = ", name)?;
            self.write_list(f, values)?;
            f.write_char('\n')?;
        }
        for (idx, operands) in self.nodes.iter().enumerate() {
            write!(f, "!{} = ", idx)?;
            self.write_list(f, operands)?;
            f.write_char('\n')?;
        }
        Ok(())
    }
}
