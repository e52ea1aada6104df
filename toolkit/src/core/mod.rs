//! Deterministic, pure logic shared by the toolkit commands.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod coerce;
pub mod rank;
pub mod record;
pub mod rewrite;
