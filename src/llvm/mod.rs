//! LLVM binding layer.
//!
//! Pass-through wrappers over LLVM's C API, built on inkwell with llvm-sys for
//! the entry points inkwell does not expose. Only compiled with the `llvm`
//! feature.
//!
//! # Example
//! ```ignore
//! use bumpalo::Bump;
//! use inkwell::context::Context;
//! use llvmc::debug::{DebugInfo, DescriptorGraph, CompileUnitDescriptor, DwarfLang};
//! use llvmc::llvm::LlvmEmitter;
//!
//! let context = Context::create();
//! let module = context.create_module("main");
//! let arena = Bump::new();
//! let mut graph = DescriptorGraph::new();
//! let cu = graph.add_ref(CompileUnitDescriptor {
//!     language: DwarfLang::GO,
//!     path: "/src/main.go".into(),
//!     ..Default::default()
//! })?;
//!
//! let mut info = DebugInfo::new_in(&arena, LlvmEmitter::new(&context));
//! let node = info.md_node(&graph, cu);
//! info.emitter().attach_compile_unit(&module, node)?;
//! ```

pub mod bitcode;
pub mod emitter;
pub mod linker;
pub mod target;
pub mod types;

pub use bitcode::{parse_bitcode, parse_bitcode_file, write_bitcode, write_bitcode_to_file, write_bitcode_to_memory};
pub use emitter::{LlvmEmitter, LlvmValue, COMPILE_UNITS};
pub use linker::{link_modules, LinkerMode};
pub use target::{
    create_target_machine, default_triple, initialize_all_targets, initialize_native_target, targets,
    TargetInfo, TargetLayout,
};
pub use types::{describe_type, TypeKind};

pub use inkwell::targets::{ByteOrdering, CodeModel, RelocMode};
pub use inkwell::OptimizationLevel;
