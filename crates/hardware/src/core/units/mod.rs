//! Hardware units.
//!
//! Each level of the hierarchy is an instance of the set-associative cache unit.

/// Set-associative cache with stack-LRU replacement.
pub mod cache;
