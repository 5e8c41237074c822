// This module defines the debug-info descriptor hierarchy as a closed sum type. Each
// Descriptor variant describes one DWARF entity (base, composite and derived types,
// compile units, subprograms, global variables, files) with the denormalized field set
// LLVM's metadata layout for that tag expects. Descriptors never hold each other
// directly: nested entities are DescriptorRef values (an optional arena id), which keeps
// identity explicit and makes "absent" a first-class state instead of a null pointer.
// Composite and derived types carry a private tag set by their factory functions, so a
// struct type and a subroutine type share one layout. Subprograms and global variables
// embed an optional IR value of type V, the emitter's operand type. The module also
// exposes the reference walk DescriptorGraph uses to validate additions.

//! Debug-info descriptors.

use super::dwarf::{DwarfLang, DwarfTag, DwarfTypeEncoding};
use super::graph::{DescriptorId, DescriptorRef};

/// Base type such as `int` or `float64`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicTypeDescriptor {
    pub context: DescriptorRef,
    pub name: String,
    pub file: DescriptorRef,
    pub line: u32,
    /// Size in bits.
    pub size: u64,
    /// Alignment in bits.
    pub alignment: u64,
    /// Offset in bits.
    pub offset: u64,
    pub flags: u32,
    pub encoding: DwarfTypeEncoding,
}

impl BasicTypeDescriptor {
    /// Base type of `size` bits, aligned to its size.
    pub fn new(name: impl Into<String>, size: u64, encoding: DwarfTypeEncoding) -> Self {
        Self {
            name: name.into(),
            size,
            alignment: size,
            encoding,
            ..Self::default()
        }
    }
}

/// Aggregate type: structures, unions, arrays, enumerations and subroutine types.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeTypeDescriptor {
    pub(crate) tag: DwarfTag,
    pub context: DescriptorRef,
    pub name: String,
    pub file: DescriptorRef,
    pub line: u32,
    pub size: u64,
    pub alignment: u64,
    pub offset: u64,
    pub flags: u32,
    pub members: Vec<DescriptorRef>,
}

impl CompositeTypeDescriptor {
    /// Composite of an arbitrary tag with every other field zeroed.
    pub fn with_tag(tag: DwarfTag, members: Vec<DescriptorRef>) -> Self {
        Self {
            tag,
            context: None,
            name: String::new(),
            file: None,
            line: 0,
            size: 0,
            alignment: 0,
            offset: 0,
            flags: 0,
            members,
        }
    }

    pub fn structure(members: Vec<DescriptorRef>) -> Self {
        Self::with_tag(DwarfTag::STRUCTURE_TYPE, members)
    }

    /// Subroutine type; the result comes first in the member list, `None` for void.
    pub fn subroutine(result: DescriptorRef, params: &[DescriptorRef]) -> Self {
        let mut members = Vec::with_capacity(params.len() + 1);
        members.push(result);
        members.extend_from_slice(params);
        Self::with_tag(DwarfTag::SUBROUTINE_TYPE, members)
    }

    pub fn tag(&self) -> DwarfTag {
        self.tag
    }
}

/// Type derived from another: pointers, typedefs, members, qualifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTypeDescriptor {
    tag: DwarfTag,
    pub context: DescriptorRef,
    pub name: String,
    pub file: DescriptorRef,
    pub line: u32,
    pub size: u64,
    pub alignment: u64,
    pub offset: u64,
    pub flags: u32,
    pub base: DescriptorRef,
}

impl DerivedTypeDescriptor {
    pub fn with_tag(tag: DwarfTag, base: DescriptorRef) -> Self {
        Self {
            tag,
            context: None,
            name: String::new(),
            file: None,
            line: 0,
            size: 0,
            alignment: 0,
            offset: 0,
            flags: 0,
            base,
        }
    }

    pub fn pointer(base: DescriptorRef) -> Self {
        Self::with_tag(DwarfTag::POINTER_TYPE, base)
    }

    pub fn typedef(name: impl Into<String>, base: DescriptorRef) -> Self {
        Self {
            name: name.into(),
            ..Self::with_tag(DwarfTag::TYPEDEF, base)
        }
    }

    /// Structure member at `offset` bits from the start of its parent.
    pub fn member(name: impl Into<String>, base: DescriptorRef, offset: u64) -> Self {
        Self {
            name: name.into(),
            offset,
            ..Self::with_tag(DwarfTag::MEMBER, base)
        }
    }

    pub fn tag(&self) -> DwarfTag {
        self.tag
    }
}

/// Translation unit; the root of a module's debug info.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileUnitDescriptor {
    pub language: DwarfLang,
    /// Path to the file being compiled.
    pub path: String,
    pub producer: String,
    pub main_compile_unit: bool,
    pub optimized: bool,
    pub compiler_flags: String,
    pub runtime: i32,
    pub enum_types: Vec<DescriptorRef>,
    pub retained_types: Vec<DescriptorRef>,
    pub subprograms: Vec<DescriptorRef>,
    pub global_variables: Vec<DescriptorRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubprogramDescriptor<V> {
    pub context: DescriptorRef,
    pub name: String,
    pub display_name: String,
    pub file: DescriptorRef,
    pub ty: DescriptorRef,
    pub line: u32,
    pub function: Option<V>,
}

impl<V> Default for SubprogramDescriptor<V> {
    fn default() -> Self {
        Self {
            context: None,
            name: String::new(),
            display_name: String::new(),
            file: None,
            ty: None,
            line: 0,
            function: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVariableDescriptor<V> {
    pub context: DescriptorRef,
    pub name: String,
    pub display_name: String,
    pub file: DescriptorRef,
    pub line: u32,
    pub ty: DescriptorRef,
    /// Not visible outside its compile unit.
    pub local: bool,
    /// Declared here but defined elsewhere.
    pub external: bool,
    pub value: Option<V>,
}

impl<V> Default for GlobalVariableDescriptor<V> {
    fn default() -> Self {
        Self {
            context: None,
            name: String::new(),
            display_name: String::new(),
            file: None,
            line: 0,
            ty: None,
            local: false,
            external: false,
            value: None,
        }
    }
}

/// Source file, identified by its path alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: String,
}

impl FileDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// One DWARF entity awaiting realization.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor<V> {
    BasicType(BasicTypeDescriptor),
    CompositeType(CompositeTypeDescriptor),
    DerivedType(DerivedTypeDescriptor),
    CompileUnit(CompileUnitDescriptor),
    Subprogram(SubprogramDescriptor<V>),
    GlobalVariable(GlobalVariableDescriptor<V>),
    File(FileDescriptor),
}

impl<V> Descriptor<V> {
    pub fn tag(&self) -> DwarfTag {
        match self {
            Descriptor::BasicType(_) => DwarfTag::BASE_TYPE,
            Descriptor::CompositeType(d) => d.tag(),
            Descriptor::DerivedType(d) => d.tag(),
            Descriptor::CompileUnit(_) => DwarfTag::COMPILE_UNIT,
            Descriptor::Subprogram(_) => DwarfTag::SUBPROGRAM,
            Descriptor::GlobalVariable(_) => DwarfTag::VARIABLE,
            Descriptor::File(_) => DwarfTag::FILE_TYPE,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Descriptor::File(_))
    }

    /// The `file` field, for variants that have one.
    pub fn file(&self) -> DescriptorRef {
        match self {
            Descriptor::BasicType(d) => d.file,
            Descriptor::CompositeType(d) => d.file,
            Descriptor::DerivedType(d) => d.file,
            Descriptor::Subprogram(d) => d.file,
            Descriptor::GlobalVariable(d) => d.file,
            Descriptor::CompileUnit(_) | Descriptor::File(_) => None,
        }
    }

    /// Every present reference, in operand order.
    pub fn references(&self) -> Vec<DescriptorId> {
        let refs: Vec<DescriptorRef> = match self {
            Descriptor::BasicType(d) => vec![d.context, d.file],
            Descriptor::CompositeType(d) => {
                let mut refs = vec![d.context, d.file];
                refs.extend_from_slice(&d.members);
                refs
            }
            Descriptor::DerivedType(d) => vec![d.context, d.file, d.base],
            Descriptor::CompileUnit(d) => d
                .enum_types
                .iter()
                .chain(&d.retained_types)
                .chain(&d.subprograms)
                .chain(&d.global_variables)
                .copied()
                .collect(),
            Descriptor::Subprogram(d) => vec![d.context, d.file, d.ty],
            Descriptor::GlobalVariable(d) => vec![d.context, d.file, d.ty],
            Descriptor::File(_) => Vec::new(),
        };
        refs.into_iter().flatten().collect()
    }
}

impl<V> From<BasicTypeDescriptor> for Descriptor<V> {
    fn from(d: BasicTypeDescriptor) -> Self {
        Descriptor::BasicType(d)
    }
}

impl<V> From<CompositeTypeDescriptor> for Descriptor<V> {
    fn from(d: CompositeTypeDescriptor) -> Self {
        Descriptor::CompositeType(d)
    }
}

impl<V> From<DerivedTypeDescriptor> for Descriptor<V> {
    fn from(d: DerivedTypeDescriptor) -> Self {
        Descriptor::DerivedType(d)
    }
}

impl<V> From<CompileUnitDescriptor> for Descriptor<V> {
    fn from(d: CompileUnitDescriptor) -> Self {
        Descriptor::CompileUnit(d)
    }
}

impl<V> From<SubprogramDescriptor<V>> for Descriptor<V> {
    fn from(d: SubprogramDescriptor<V>) -> Self {
        Descriptor::Subprogram(d)
    }
}

impl<V> From<GlobalVariableDescriptor<V>> for Descriptor<V> {
    fn from(d: GlobalVariableDescriptor<V>) -> Self {
        Descriptor::GlobalVariable(d)
    }
}

impl<V> From<FileDescriptor> for Descriptor<V> {
    fn from(d: FileDescriptor) -> Self {
        Descriptor::File(d)
    }
}
