//! Test utilities for arena-based testing.
//!
//! Each test gets its own arena, mirroring how an emitter owns one arena per
//! compile unit.
