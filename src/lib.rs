//! Folio Application Library
//!
//! This library provides the catalog modules and utilities for folio.

pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;

#[cfg(test)]
pub(crate) mod testing;
