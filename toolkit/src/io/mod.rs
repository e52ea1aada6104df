//! I/O helpers for toolkit commands.

pub mod config;
pub mod file_tree;
pub mod table;
