//! Utility modules for packaging operations.

pub mod fs;
pub mod process;
