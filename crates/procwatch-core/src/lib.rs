//! procwatch-core: Core types and errors
//!
//! This crate provides the foundational types used across all procwatch
//! crates:
//! - The canonical error type [`ProcwatchError`] and result alias
//! - Platform detection utilities
//!
//! ## Error Handling
//!
//! procwatch uses a single canonical error type across the workspace. Every
//! variant is locally recoverable: the interactive session reports the error
//! and keeps running. See the [`error`] module for the taxonomy.

use std::env::consts::OS;

pub mod error;

// Re-export canonical error type at crate root
pub use error::{ProcwatchError, ProcwatchResult};

// ============================================================================
// Platform Detection
// ============================================================================

/// Get the current platform identifier.
///
/// Returns one of: "linux", "macos", "windows", "freebsd", etc.
///
/// This is a pure function with no side effects.
#[inline]
pub fn get_platform() -> &'static str {
    OS
}
