/// Trace line parsing and the buffered trace reader.
pub mod trace_parsing;

/// Replay driver totals, error propagation and reports.
pub mod simulator;
