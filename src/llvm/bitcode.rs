//! Bitcode reading and writing.
//!
//! Thin wrappers over LLVM's bit reader and writer. Parse failures carry
//! LLVM's diagnostic unchanged.

use std::io::Write;
use std::path::Path;

use inkwell::context::Context;
use inkwell::memory_buffer::MemoryBuffer;
use inkwell::module::Module;

use crate::core::error::{BindingError, BindingResult};

/// Parse the bitcode file at `path` into a module owned by `context`.
pub fn parse_bitcode_file<'ctx>(context: &'ctx Context, path: impl AsRef<Path>) -> BindingResult<Module<'ctx>> {
    let path = path.as_ref();
    log::debug!("parsing bitcode file {}", path.display());
    Module::parse_bitcode_from_path(path, context).map_err(|message| BindingError::Bitcode {
        source_name: path.display().to_string(),
        message: message.to_string_lossy().into_owned(),
    })
}

/// Parse an in-memory bitcode image. `name` identifies the buffer in errors.
pub fn parse_bitcode<'ctx>(context: &'ctx Context, bytes: &[u8], name: &str) -> BindingResult<Module<'ctx>> {
    log::debug!("parsing {} bytes of bitcode from {}", bytes.len(), name);
    let buffer = MemoryBuffer::create_from_memory_range_copy(bytes, name);
    Module::parse_bitcode_from_buffer(&buffer, context).map_err(|message| BindingError::Bitcode {
        source_name: name.to_string(),
        message: message.to_string_lossy().into_owned(),
    })
}

/// Write `module` as bitcode to the file at `path`.
pub fn write_bitcode_to_file(module: &Module<'_>, path: impl AsRef<Path>) -> BindingResult<()> {
    let path = path.as_ref();
    log::debug!("writing bitcode file {}", path.display());
    if module.write_bitcode_to_path(path) {
        Ok(())
    } else {
        Err(BindingError::BitcodeWrite {
            path: path.to_path_buf(),
        })
    }
}

/// Serialize `module` to a bitcode image.
pub fn write_bitcode_to_memory(module: &Module<'_>) -> Vec<u8> {
    module.write_bitcode_to_memory().as_slice().to_vec()
}

/// Write `module` as bitcode to `writer`.
pub fn write_bitcode(module: &Module<'_>, writer: &mut impl Write) -> BindingResult<()> {
    let buffer = module.write_bitcode_to_memory();
    writer.write_all(buffer.as_slice())?;
    writer.flush()?;
    Ok(())
}
