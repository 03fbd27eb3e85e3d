//! Simulation engine.
//!
//! The [`Hierarchy`] controller routes instruction and data accesses through the
//! cache [`units`] and enforces inclusion between the L2 and the L1 caches.

/// Hierarchy controller (L1 routing, L2 fall-through, back-invalidation).
pub mod hierarchy;

/// Hardware units making up the hierarchy.
pub mod units;

pub use hierarchy::Hierarchy;
