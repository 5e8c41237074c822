// This module holds the infrastructure shared by the debug-info layer and the LLVM
// binding: the thiserror-based error enums with their Result aliases, and the
// arena-owning test context used by unit tests.

//! Shared infrastructure: errors and test support.

pub mod error;
pub mod test_utils;

pub use error::{BindingError, BindingResult, GraphError, GraphResult};
