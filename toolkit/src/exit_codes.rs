//! Stable exit codes for toolkit CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config/input or other errors.
pub const INVALID: i32 = 1;
/// `toolkit fix-imports` finished but one or more files could not be processed.
pub const PARTIAL: i32 = 2;
