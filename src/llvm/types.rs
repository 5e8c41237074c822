//! Human-readable type descriptions.
//!
//! `describe_type` names a type by its kind and spells out the element
//! types of arrays, vectors and structs: `Array(Integer[4])`,
//! `Struct(Integer, Float)`. Pointers are opaque and print as `Pointer`.

use std::fmt::{self, Write};

use inkwell::types::AsTypeRef;
use llvm_sys::core::{
    LLVMCountStructElementTypes, LLVMGetArrayLength, LLVMGetElementType, LLVMGetTypeKind,
    LLVMGetVectorSize, LLVMStructGetTypeAtIndex,
};
use llvm_sys::prelude::LLVMTypeRef;
use llvm_sys::LLVMTypeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Half,
    Float,
    Double,
    X86Fp80,
    Fp128,
    PpcFp128,
    Label,
    Integer,
    Function,
    Struct,
    Array,
    Pointer,
    Vector,
    Metadata,
    Token,
    Unknown,
}

impl TypeKind {
    pub fn of(ty: &impl AsTypeRef) -> Self {
        Self::of_raw(ty.as_type_ref())
    }

    fn of_raw(ty: LLVMTypeRef) -> Self {
        // SAFETY: `ty` comes from a live inkwell type.
        match unsafe { LLVMGetTypeKind(ty) } {
            LLVMTypeKind::LLVMVoidTypeKind => TypeKind::Void,
            LLVMTypeKind::LLVMHalfTypeKind => TypeKind::Half,
            LLVMTypeKind::LLVMFloatTypeKind => TypeKind::Float,
            LLVMTypeKind::LLVMDoubleTypeKind => TypeKind::Double,
            LLVMTypeKind::LLVMX86_FP80TypeKind => TypeKind::X86Fp80,
            LLVMTypeKind::LLVMFP128TypeKind => TypeKind::Fp128,
            LLVMTypeKind::LLVMPPC_FP128TypeKind => TypeKind::PpcFp128,
            LLVMTypeKind::LLVMLabelTypeKind => TypeKind::Label,
            LLVMTypeKind::LLVMIntegerTypeKind => TypeKind::Integer,
            LLVMTypeKind::LLVMFunctionTypeKind => TypeKind::Function,
            LLVMTypeKind::LLVMStructTypeKind => TypeKind::Struct,
            LLVMTypeKind::LLVMArrayTypeKind => TypeKind::Array,
            LLVMTypeKind::LLVMPointerTypeKind => TypeKind::Pointer,
            LLVMTypeKind::LLVMVectorTypeKind => TypeKind::Vector,
            LLVMTypeKind::LLVMMetadataTypeKind => TypeKind::Metadata,
            LLVMTypeKind::LLVMTokenTypeKind => TypeKind::Token,
            _ => TypeKind::Unknown,
        }
    }

    /// Kind name without the `TypeKind` suffix.
    pub fn short_name(self) -> &'static str {
        match self {
            TypeKind::Void => "Void",
            TypeKind::Half => "Half",
            TypeKind::Float => "Float",
            TypeKind::Double => "Double",
            TypeKind::X86Fp80 => "X86_FP80",
            TypeKind::Fp128 => "FP128",
            TypeKind::PpcFp128 => "PPC_FP128",
            TypeKind::Label => "Label",
            TypeKind::Integer => "Integer",
            TypeKind::Function => "Function",
            TypeKind::Struct => "Struct",
            TypeKind::Array => "Array",
            TypeKind::Pointer => "Pointer",
            TypeKind::Vector => "Vector",
            TypeKind::Metadata => "Metadata",
            TypeKind::Token => "Token",
            TypeKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}TypeKind", self.short_name())
    }
}

/// Describe `ty`, recursing into element types.
pub fn describe_type(ty: &impl AsTypeRef) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = describe(&mut out, ty.as_type_ref());
    out
}

fn describe(out: &mut String, ty: LLVMTypeRef) -> fmt::Result {
    let kind = TypeKind::of_raw(ty);
    out.push_str(kind.short_name());
    // SAFETY: element queries are only made on types of the matching kind.
    unsafe {
        match kind {
            TypeKind::Array => {
                out.push('(');
                describe(out, LLVMGetElementType(ty))?;
                write!(out, "[{}])", LLVMGetArrayLength(ty))?;
            }
            TypeKind::Vector => {
                out.push('(');
                describe(out, LLVMGetElementType(ty))?;
                write!(out, "[{}])", LLVMGetVectorSize(ty))?;
            }
            TypeKind::Struct => {
                out.push('(');
                for idx in 0..LLVMCountStructElementTypes(ty) {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    describe(out, LLVMStructGetTypeAtIndex(ty, idx))?;
                }
                out.push(')');
            }
            _ => {}
        }
    }
    Ok(())
}
