// This module wraps LLVM target registration and target-machine configuration. Backends
// are registered either for the host only (initialize_native_target, which reports LLVM's
// failure message) or all at once. Registered targets are enumerated as TargetInfo
// name/description pairs. create_target_machine resolves a triple to a target and
// configures a machine with the inkwell optimization, relocation and code-model enums.
// TargetLayout owns a TargetData and answers the layout queries a front end needs when
// sizing debug descriptors: pointer size, byte order, type sizes and alignments, and
// struct member placement.

//! Target registration, target machines and data layout queries.

use inkwell::context::Context;
use inkwell::targets::{
    ByteOrdering, CodeModel, InitializationConfig, RelocMode, Target, TargetData, TargetMachine,
    TargetTriple,
};
use inkwell::types::{AnyType, IntType, StructType};
use inkwell::values::GlobalValue;
use inkwell::OptimizationLevel;

use crate::core::error::{BindingError, BindingResult};

/// Register the host's code generator.
pub fn initialize_native_target() -> BindingResult<()> {
    Target::initialize_native(&InitializationConfig::default())
        .map_err(|message| BindingError::NativeTarget { message })
}

/// Register every code generator LLVM was built with.
pub fn initialize_all_targets() {
    Target::initialize_all(&InitializationConfig::default());
}

/// A registered target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    pub name: String,
    pub description: String,
}

/// Every registered target, in registration order.
pub fn targets() -> Vec<TargetInfo> {
    let mut infos = Vec::new();
    let mut next = Target::get_first();
    while let Some(target) = next {
        infos.push(TargetInfo {
            name: target.get_name().to_string_lossy().into_owned(),
            description: target.get_description().to_string_lossy().into_owned(),
        });
        next = target.get_next();
    }
    infos
}

/// The triple LLVM was configured to generate code for by default.
pub fn default_triple() -> String {
    TargetMachine::get_default_triple()
        .as_str()
        .to_string_lossy()
        .into_owned()
}

/// Configure a machine for `triple`. The target must already be registered.
pub fn create_target_machine(
    triple: &str,
    cpu: &str,
    features: &str,
    level: OptimizationLevel,
    reloc: RelocMode,
    code_model: CodeModel,
) -> BindingResult<TargetMachine> {
    let target_triple = TargetTriple::create(triple);
    let target = Target::from_triple(&target_triple).map_err(|message| BindingError::TargetLookup {
        triple: triple.to_string(),
        message: message.to_string_lossy().into_owned(),
    })?;
    log::debug!("creating {} machine for {} ({:?})", target.get_name().to_string_lossy(), triple, cpu);
    target
        .create_target_machine(&target_triple, cpu, features, level, reloc, code_model)
        .ok_or_else(|| BindingError::TargetMachine {
            triple: triple.to_string(),
            cpu: cpu.to_string(),
            features: features.to_string(),
        })
}

/// Data layout of a target.
pub struct TargetLayout {
    data: TargetData,
}

impl TargetLayout {
    pub fn from_machine(machine: &TargetMachine) -> Self {
        Self {
            data: machine.get_target_data(),
        }
    }

    /// Parse a data layout string such as `e-m:e-i64:64-n8:16:32:64-S128`.
    pub fn from_string(representation: &str) -> Self {
        Self {
            data: TargetData::create(representation),
        }
    }

    pub fn target_data(&self) -> &TargetData {
        &self.data
    }

    /// The layout rendered back as a string.
    pub fn layout_string(&self) -> String {
        self.data
            .get_data_layout()
            .as_str()
            .to_string_lossy()
            .into_owned()
    }

    pub fn byte_order(&self) -> ByteOrdering {
        self.data.get_byte_ordering()
    }

    pub fn is_little_endian(&self) -> bool {
        matches!(self.byte_order(), ByteOrdering::LittleEndian)
    }

    /// Pointer size in bytes, default address space.
    pub fn pointer_size(&self) -> u32 {
        self.data.get_pointer_byte_size(None)
    }

    /// Integer type as wide as a pointer.
    pub fn int_ptr_type<'ctx>(&self, context: &'ctx Context) -> IntType<'ctx> {
        context.ptr_sized_int_type(&self.data, None)
    }

    pub fn size_in_bits<'ctx>(&self, ty: &dyn AnyType<'ctx>) -> u64 {
        self.data.get_bit_size(ty)
    }

    /// Bytes written by a store of `ty`.
    pub fn store_size<'ctx>(&self, ty: &dyn AnyType<'ctx>) -> u64 {
        self.data.get_store_size(ty)
    }

    /// Bytes between consecutive elements of `ty` in an array.
    pub fn abi_size<'ctx>(&self, ty: &dyn AnyType<'ctx>) -> u64 {
        self.data.get_abi_size(ty)
    }

    pub fn abi_alignment<'ctx>(&self, ty: &dyn AnyType<'ctx>) -> u32 {
        self.data.get_abi_alignment(ty)
    }

    pub fn call_frame_alignment<'ctx>(&self, ty: &dyn AnyType<'ctx>) -> u32 {
        self.data.get_call_frame_alignment(ty)
    }

    pub fn preferred_alignment<'ctx>(&self, ty: &dyn AnyType<'ctx>) -> u32 {
        self.data.get_preferred_alignment(ty)
    }

    pub fn preferred_global_alignment(&self, global: &GlobalValue<'_>) -> u32 {
        self.data.get_preferred_alignment_of_global(global)
    }

    /// Index of the member of `ty` containing byte `offset`.
    pub fn element_containing_offset(&self, ty: &StructType<'_>, offset: u64) -> u32 {
        self.data.element_at_offset(ty, offset)
    }

    /// Byte offset of member `element`, `None` if out of range.
    pub fn element_offset(&self, ty: &StructType<'_>, element: u32) -> Option<u64> {
        self.data.offset_of_element(ty, element)
    }
}
