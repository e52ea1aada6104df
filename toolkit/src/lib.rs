//! Small batch utilities: fare ranking and import-suffix rewriting.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (tolerant coercion, stable top-K
//!   ranking, ordered regex substitution). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config files, CSV loading,
//!   directory traversal and write-back).
//!
//! Command modules ([`top_fares`], [`fix_imports`]) coordinate core logic with
//! I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod fix_imports;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod top_fares;
