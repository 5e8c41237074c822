// This module groups the DWARF debug-info descriptor layer. Descriptors are assembled
// into a DescriptorGraph, an id-addressed arena in which references can only point
// backwards, so every graph is acyclic. A DebugInfo cache realizes descriptors into
// metadata nodes through a MetadataEmitter, emitting each descriptor identity at most
// once per session. The emitter seam keeps the layer independent of LLVM: the
// in-memory MetadataTable is always available, and the `llvm` feature adds an emitter
// that writes straight into an LLVM context.

//! DWARF debug-info descriptors and their realization as metadata.
//!
//! # Example
//! ```
//! use bumpalo::Bump;
//! use llvmc::debug::{
//!     BasicTypeDescriptor, DebugInfo, DescriptorGraph, DwarfTypeEncoding, MetadataTable,
//! };
//!
//! let arena = Bump::new();
//! let mut graph = DescriptorGraph::new();
//! let int = graph.add_ref(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::SIGNED))?;
//!
//! let mut info = DebugInfo::new_in(&arena, MetadataTable::new());
//! let node = info.md_node(&graph, int);
//! assert_eq!(info.md_node(&graph, int), node);
//! # Ok::<(), llvmc::GraphError>(())
//! ```

pub mod cache;
pub mod descriptor;
pub mod dwarf;
pub mod emitter;
pub mod encode;
pub mod graph;
pub mod table;

pub use cache::{CacheStats, DebugInfo};
pub use descriptor::{
    BasicTypeDescriptor, CompileUnitDescriptor, CompositeTypeDescriptor, DerivedTypeDescriptor,
    Descriptor, FileDescriptor, GlobalVariableDescriptor, SubprogramDescriptor,
};
pub use dwarf::{DwarfLang, DwarfTag, DwarfTypeEncoding, LLVM_DEBUG_VERSION};
pub use emitter::{IntWidth, MetadataEmitter};
pub use graph::{DescriptorGraph, DescriptorId, DescriptorRef};
pub use table::{MdValue, MetadataTable};
