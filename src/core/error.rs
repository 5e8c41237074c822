// This module defines the error types for llvmc using the thiserror crate. GraphError is
// raised while assembling a descriptor graph: a reference to an id the graph has not
// handed out (which also rules out cycles), a reference into a different graph, a graph
// that has run out of u32 indices, or a `file` field pointing at something other than a
// file descriptor. BindingError covers the LLVM pass-through surfaces and carries
// LLVM's own diagnostic text unchanged: bitcode parse failures, bitcode write failures,
// I/O errors from writers, link conflicts, native target initialization, target triple
// lookup, target machine creation, and names that cannot cross into C because of an
// interior NUL. Realizing descriptors has no error channel of its own.

//! Error types for llvmc.

use std::path::PathBuf;

use thiserror::Error;

use crate::debug::dwarf::DwarfTag;
use crate::debug::graph::DescriptorId;

/// Errors raised while adding descriptors to a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("descriptor {referenced} is not in the graph (graph holds {len} descriptors)")]
    DanglingReference { referenced: DescriptorId, len: usize },

    #[error("descriptor {referenced} belongs to another graph")]
    ForeignReference { referenced: DescriptorId },

    #[error("graph is full ({len} descriptors)")]
    Full { len: usize },

    #[error("file of {tag} must reference a file descriptor, but {referenced} is a {found}")]
    NotAFile {
        tag: DwarfTag,
        referenced: DescriptorId,
        found: DwarfTag,
    },
}

/// Result type alias for graph construction.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors surfaced by the LLVM binding layer.
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("failed to parse bitcode from {source_name}: {message}")]
    Bitcode { source_name: String, message: String },

    #[error("failed to write bitcode to {}", path.display())]
    BitcodeWrite { path: PathBuf },

    #[error("failed to write bitcode: {0}")]
    Io(#[from] std::io::Error),

    #[error("module linking failed: {message}")]
    Link { message: String },

    #[error("failed to initialize native target: {message}")]
    NativeTarget { message: String },

    #[error("no target for triple {triple}: {message}")]
    TargetLookup { triple: String, message: String },

    #[error("target {triple} cannot create a machine for cpu {cpu:?} with features {features:?}")]
    TargetMachine {
        triple: String,
        cpu: String,
        features: String,
    },

    #[error("name contains an interior NUL byte: {name:?}")]
    InvalidName { name: String },
}

/// Result type alias for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;
