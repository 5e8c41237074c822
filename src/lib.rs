//! llvmc - LLVM C API bindings with a DWARF descriptor layer.
//!
//! The crate has two halves. The [`debug`] layer describes debug-info
//! entities (types, compile units, subprograms, globals, files) as
//! descriptors and realizes them into metadata nodes through an
//! identity-keyed cache, emitting every shared descriptor once. It is
//! independent of LLVM and can render into an in-memory [`debug::MetadataTable`].
//! With the `llvm` feature, the [`llvm`] layer adds an emitter writing into an
//! LLVM context plus pass-throughs for bitcode I/O, module linking, target
//! configuration and type descriptions.
//!
//! # Architecture
//!
//! - [`debug`] - Descriptors, descriptor graph, memo cache, emitters
//! - [`core`] - Errors and test support
//! - `llvm` - LLVM-backed emitter and C API pass-throughs (feature `llvm`)

pub mod core;
pub mod debug;
#[cfg(feature = "llvm")]
pub mod llvm;

pub use crate::core::{BindingError, BindingResult, GraphError, GraphResult};
pub use debug::{DebugInfo, DescriptorGraph, DescriptorId, DescriptorRef, MetadataEmitter};
