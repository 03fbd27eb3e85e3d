//! Simulator Replay Tests.
//!
//! Drives the replay loop end to end from text traces and checks the
//! per-kind totals, the early stop on bad input and the report shape.

use std::io::Cursor;

use cachesim_core::sim::{RunTotals, SimError, Simulator, TraceError, TraceReader, TraceRecord};
use cachesim_core::{CacheLevel, Config, ConsistencyError, HierarchyStats};
use pretty_assertions::assert_eq;

use crate::common::HierarchyBuilder;

/// I$ 1 set × 2 ways (hit 1), D$ 1 set × 2 ways (hit 2), L2 4 sets × 4 ways (hit 10).
fn config() -> Config {
    HierarchyBuilder::new()
        .icache(1, 2, 1)
        .dcache(1, 2, 2)
        .l2(4, 4, 10)
        .config()
}

fn replay(trace: &str) -> Result<Simulator, SimError> {
    crate::common::init_tracing();
    let mut sim = Simulator::new(&config()).unwrap();
    sim.run(TraceReader::new(Cursor::new(trace)))?;
    Ok(sim)
}

#[test]
fn totals_split_by_kind() {
    let sim = replay("i 0x0\ni 0x4\nd 0x1000\nd 0x1008\ni 0x0\n").unwrap();
    assert_eq!(
        sim.totals(),
        RunTotals {
            instructions: 3,
            instruction_cycles: 111 + 1 + 1,
            data_accesses: 2,
            data_cycles: 112 + 2,
        }
    );
    assert_eq!(sim.totals().accesses(), 5);
}

#[test]
fn average_latencies() {
    let sim = replay("i 0x0\ni 0x0\nd 0x40\nd 0x40\n").unwrap();
    let totals = sim.totals();
    assert!((totals.avg_instruction_latency() - 56.0).abs() < f64::EPSILON);
    assert!((totals.avg_data_latency() - 57.0).abs() < f64::EPSILON);
}

#[test]
fn averages_are_zero_without_accesses() {
    let totals = RunTotals::default();
    assert!(totals.avg_instruction_latency().abs() < f64::EPSILON);
    assert!(totals.avg_data_latency().abs() < f64::EPSILON);
}

/// Each call to `step` returns the same latency the hierarchy would.
#[test]
fn step_matches_hierarchy_latency() {
    let mut sim = Simulator::new(&config()).unwrap();
    assert_eq!(sim.step(TraceRecord::data(0x80)).unwrap(), 112);
    assert_eq!(sim.step(TraceRecord::instruction(0x80)).unwrap(), 11);
    assert_eq!(sim.hierarchy.stats().l2.refs, 2);
}

#[test]
fn empty_trace_runs_cleanly() {
    let sim = replay("# nothing here\n\n").unwrap();
    assert_eq!(sim.totals(), RunTotals::default());
    assert_eq!(sim.report().stats, HierarchyStats::default());
}

/// Replay stops at the first bad line; earlier records still count.
#[test]
fn stops_at_malformed_line() {
    let mut sim = Simulator::new(&config()).unwrap();
    let err = sim
        .run(TraceReader::new(Cursor::new("i 0x0\nd 0x40\nnonsense\ni 0x80\n")))
        .unwrap_err();

    assert!(matches!(
        err,
        SimError::Trace(TraceError::Malformed { line: 3, .. })
    ));
    assert_eq!(sim.totals().accesses(), 2);
    assert_eq!(sim.hierarchy.stats().l1_i.refs, 1);
}

#[test]
fn trace_errors_display_transparently() {
    let err = replay("i 0xnope\n").unwrap_err();
    assert_eq!(err.to_string(), "line 1: invalid address `0xnope`");
}

#[test]
fn consistency_error_reports_progress() {
    let err = SimError::Consistency {
        accesses: 42,
        source: ConsistencyError::VictimCount {
            level: CacheLevel::L2,
            set: 3,
            candidates: 0,
        },
    };
    assert_eq!(
        err.to_string(),
        "aborting run after 42 accesses: L2 set 3: expected exactly one LRU victim, found 0"
    );
}

/// Records can come from any iterator, not only a reader.
#[test]
fn runs_from_in_memory_records() {
    let mut sim = Simulator::new(&config()).unwrap();
    let records = [0x0, 0x40, 0x80, 0x0].map(|addr| Ok(TraceRecord::instruction(addr)));
    sim.run(records).unwrap();

    // The two-way I$ evicted 0x0 on the third fill; the L2 still held it.
    assert_eq!(sim.totals().instruction_cycles, 111 * 3 + 11);
}

#[test]
fn report_serializes_totals_and_stats() {
    let sim = replay("i 0x0\nd 0x40\n").unwrap();
    let json = serde_json::to_value(sim.report()).unwrap();

    assert_eq!(json["totals"]["instructions"], 1);
    assert_eq!(json["totals"]["data_cycles"], 112);
    assert_eq!(json["stats"]["l1_i"]["misses"], 1);
    assert_eq!(json["stats"]["l2"]["refs"], 2);
    assert_eq!(json["stats"]["l2"]["penalties"], 200);
}
