//! Trace-driven simulation.
//!
//! Reads `(kind, address)` records from a text trace and replays them through
//! a [`Hierarchy`](crate::core::Hierarchy), accumulating per-kind latency totals.

/// Trace-replay driver and run report.
pub mod simulator;

/// Text trace parsing.
pub mod trace;

pub use simulator::{RunTotals, SimError, SimReport, Simulator};
pub use trace::{TraceError, TraceReader, TraceRecord, parse_line};
