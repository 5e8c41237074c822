// This module implements MetadataEmitter on top of a real LLVM context. Integer
// constants go through inkwell's IntType API; metadata strings and nodes go through
// llvm-sys directly, because LLVMMDNodeInContext is the only entry point that accepts
// null operands (an absent descriptor reference) and LLVMMDStringInContext takes an
// explicit length, so strings with interior NULs survive. Operands are LlvmValue, a Copy
// wrapper over LLVMValueRef tied to the context lifetime; any inkwell value converts into
// one for embedding a function or global into a descriptor. The emitter also reads
// nodes back (operands, string contents) and appends nodes to named module metadata,
// which is how a realized compile unit is registered under llvm.dbg.cu.

//! Metadata emission into an LLVM context.

use std::ffi::{c_char, CString};
use std::marker::PhantomData;
use std::ptr;

use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::IntType;
use inkwell::values::AsValueRef;
use llvm_sys::core::{
    LLVMAddNamedMetadataOperand, LLVMGetMDNodeNumOperands, LLVMGetMDNodeOperands,
    LLVMGetMDString, LLVMGetNamedMetadataNumOperands, LLVMGetNamedMetadataOperands,
    LLVMIsAMDNode, LLVMMDNodeInContext, LLVMMDStringInContext,
};
use llvm_sys::prelude::LLVMValueRef;

use crate::core::error::{BindingError, BindingResult};
use crate::debug::{IntWidth, MetadataEmitter};

/// Named metadata list holding a module's compile units.
pub const COMPILE_UNITS: &str = "llvm.dbg.cu";

/// Operand handle owned by an LLVM context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LlvmValue<'ctx> {
    raw: LLVMValueRef,
    _context: PhantomData<&'ctx Context>,
}

impl<'ctx> LlvmValue<'ctx> {
    /// Wrap any inkwell value, e.g. a function to embed in a subprogram.
    pub fn from_value(value: &impl AsValueRef) -> Self {
        Self::from_raw(value.as_value_ref())
    }

    fn from_raw(raw: LLVMValueRef) -> Self {
        Self {
            raw,
            _context: PhantomData,
        }
    }

    pub fn as_raw(self) -> LLVMValueRef {
        self.raw
    }

    pub fn is_null(self) -> bool {
        self.raw.is_null()
    }
}

/// [`MetadataEmitter`] writing into an inkwell [`Context`].
pub struct LlvmEmitter<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> LlvmEmitter<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &'ctx Context {
        self.context
    }

    fn int_type(&self, width: IntWidth) -> IntType<'ctx> {
        self.context.custom_width_int_type(width.bits())
    }

    /// Operands of a metadata node. Null operands come back as null values.
    pub fn node_operands(&self, node: LlvmValue<'ctx>) -> Vec<LlvmValue<'ctx>> {
        if node.is_null() {
            return Vec::new();
        }
        // SAFETY: `node` is non-null and checked to wrap an MDNode before its
        // operands are read into a buffer sized by LLVM.
        unsafe {
            if LLVMIsAMDNode(node.raw).is_null() {
                return Vec::new();
            }
            let count = LLVMGetMDNodeNumOperands(node.raw) as usize;
            let mut raw = vec![ptr::null_mut(); count];
            LLVMGetMDNodeOperands(node.raw, raw.as_mut_ptr());
            raw.into_iter().map(LlvmValue::from_raw).collect()
        }
    }

    /// Contents of a metadata string operand.
    pub fn string_value(&self, value: LlvmValue<'ctx>) -> Option<String> {
        if value.is_null() {
            return None;
        }
        let mut len = 0;
        // SAFETY: LLVMGetMDString returns null for anything but an MDString and
        // otherwise a pointer to `len` bytes owned by the context.
        unsafe {
            let data = LLVMGetMDString(value.raw, &mut len);
            if data.is_null() {
                return None;
            }
            let bytes = std::slice::from_raw_parts(data as *const u8, len as usize);
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    /// Append `value` to the named metadata list `name` of `module`.
    pub fn add_named_metadata(
        &self,
        module: &Module<'ctx>,
        name: &str,
        value: LlvmValue<'ctx>,
    ) -> BindingResult<()> {
        if value.is_null() {
            log::warn!("not adding a null operand to !{}", name);
            return Ok(());
        }
        let cname = c_name(name)?;
        // SAFETY: the module and value belong to the same live context.
        unsafe { LLVMAddNamedMetadataOperand(module.as_mut_ptr(), cname.as_ptr(), value.raw) };
        log::debug!("appended {:?} to !{}", value.raw, name);
        Ok(())
    }

    /// Register a realized compile unit with `module`.
    pub fn attach_compile_unit(&self, module: &Module<'ctx>, unit: LlvmValue<'ctx>) -> BindingResult<()> {
        self.add_named_metadata(module, COMPILE_UNITS, unit)
    }

    /// Operands of the named metadata list `name`, empty if it does not exist.
    pub fn named_metadata(&self, module: &Module<'ctx>, name: &str) -> BindingResult<Vec<LlvmValue<'ctx>>> {
        let cname = c_name(name)?;
        // SAFETY: the destination buffer is sized by LLVM's own operand count.
        let raw = unsafe {
            let count = LLVMGetNamedMetadataNumOperands(module.as_mut_ptr(), cname.as_ptr()) as usize;
            let mut raw = vec![ptr::null_mut(); count];
            if count > 0 {
                LLVMGetNamedMetadataOperands(module.as_mut_ptr(), cname.as_ptr(), raw.as_mut_ptr());
            }
            raw
        };
        Ok(raw.into_iter().map(LlvmValue::from_raw).collect())
    }
}

fn c_name(name: &str) -> BindingResult<CString> {
    CString::new(name).map_err(|_| BindingError::InvalidName {
        name: name.to_string(),
    })
}

impl<'ctx> MetadataEmitter for LlvmEmitter<'ctx> {
    type Value = LlvmValue<'ctx>;

    fn null(&self) -> Self::Value {
        LlvmValue::from_raw(ptr::null_mut())
    }

    fn const_int(&mut self, width: IntWidth, value: u64) -> Self::Value {
        LlvmValue::from_value(&self.int_type(width).const_int(value, false))
    }

    fn const_all_ones(&mut self, width: IntWidth) -> Self::Value {
        LlvmValue::from_value(&self.int_type(width).const_all_ones())
    }

    fn const_null(&mut self, width: IntWidth) -> Self::Value {
        LlvmValue::from_value(&self.int_type(width).const_zero())
    }

    fn md_string(&mut self, value: &str) -> Self::Value {
        // SAFETY: LLVM copies `len` bytes from the pointer; no terminator is read.
        let raw = unsafe {
            LLVMMDStringInContext(
                self.context.raw(),
                value.as_ptr() as *const c_char,
                value.len() as u32,
            )
        };
        LlvmValue::from_raw(raw)
    }

    fn md_node(&mut self, operands: &[Self::Value]) -> Self::Value {
        let mut raw: Vec<LLVMValueRef> = operands.iter().map(|v| v.raw).collect();
        // SAFETY: every non-null operand was produced in this context; LLVM
        // stores null entries as null node operands.
        let node = unsafe { LLVMMDNodeInContext(self.context.raw(), raw.as_mut_ptr(), raw.len() as u32) };
        LlvmValue::from_raw(node)
    }
}
