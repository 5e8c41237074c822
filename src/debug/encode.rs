//! Operand encoding helpers shared by every descriptor layout.

use super::emitter::{IntWidth, MetadataEmitter};

/// Encode a flag as an i1: true is all-ones, false is null.
pub fn const_bool<E: MetadataEmitter>(emitter: &mut E, value: bool) -> E::Value {
    if value {
        emitter.const_all_ones(IntWidth::I1)
    } else {
        emitter.const_null(IntWidth::I1)
    }
}

/// i32 constant, the width every numeric descriptor field is emitted at.
pub fn const_i32<E: MetadataEmitter>(emitter: &mut E, value: u64) -> E::Value {
    emitter.const_int(IntWidth::I32, value)
}

/// Node with no operands.
pub fn empty_node<E: MetadataEmitter>(emitter: &mut E) -> E::Value {
    emitter.md_node(&[])
}

/// Split `path` after its last `/` into `(directory, file_name)`.
///
/// The directory keeps its trailing separator and is empty when `path` has no
/// separator. No normalization is done.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_trailing_separator() {
        assert_eq!(split_path("/a/b/c.go"), ("/a/b/", "c.go"));
        assert_eq!(split_path("c.go"), ("", "c.go"));
        assert_eq!(split_path("/c.go"), ("/", "c.go"));
        assert_eq!(split_path("dir/"), ("dir/", ""));
        assert_eq!(split_path(""), ("", ""));
    }

    #[test]
    fn split_does_not_normalize() {
        assert_eq!(split_path("a//b/../c.rs"), ("a//b/../", "c.rs"));
    }
}
