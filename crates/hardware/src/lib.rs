//! Two-level cache hierarchy simulator library.
//!
//! This crate models split L1 instruction/data caches backed by a shared,
//! optionally inclusive L2 for trace-driven performance studies:
//! 1. **Common:** Address decoding, access classification and error types.
//! 2. **Config:** Hierarchy geometry, timing and validation.
//! 3. **Core:** Set-associative caches with stack-LRU replacement and the hierarchy controller.
//! 4. **Stats:** Per-level reference, miss and penalty counters.
//! 5. **Simulation:** Trace parsing and replay.
//!
//! ```
//! use cachesim_core::{AccessKind, CacheConfig, Config, Hierarchy};
//!
//! let config = Config {
//!     l1_i: CacheConfig::new(64, 2, 1),
//!     l2: CacheConfig::new(512, 8, 10),
//!     inclusive: true,
//!     ..Config::default()
//! };
//! let mut hierarchy = Hierarchy::new(&config)?;
//! assert_eq!(hierarchy.access(AccessKind::Instruction, 0x1000)?, 111);
//! assert_eq!(hierarchy.access(AccessKind::Instruction, 0x1004)?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Common types (address decoding, access kinds, errors).
pub mod common;
/// Hierarchy configuration.
pub mod config;
/// Cache units and the hierarchy controller.
pub mod core;
/// Trace reading and replay.
pub mod sim;
/// Statistics counters and reporting.
pub mod stats;

pub use crate::common::{AccessKind, CacheLevel, ConfigError, ConsistencyError};
pub use crate::config::{CacheConfig, Config};
pub use crate::core::Hierarchy;
pub use crate::stats::{HierarchyStats, LevelStats};
