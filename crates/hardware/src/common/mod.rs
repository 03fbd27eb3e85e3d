//! Common types shared by every component of the cache simulator.
//!
//! This module provides the following:
//! 1. **Address Decoding:** Block-offset and set-index arithmetic for power-of-two geometries.
//! 2. **Access Classification:** Instruction vs. data accesses and cache level identifiers.
//! 3. **Error Handling:** Configuration and replacement-consistency error types.

/// Address decomposition into block tag and set index.
pub mod addr;

/// Access kind and cache level enums.
pub mod data;

/// Configuration and consistency error types.
pub mod error;

pub use addr::{block_offset_bits, block_tag, set_index, set_index_bits};
pub use data::{AccessKind, CacheLevel};
pub use error::{ConfigError, ConsistencyError};
