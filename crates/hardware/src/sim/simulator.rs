//! Simulator: replays a trace through a [`Hierarchy`] and keeps run totals.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use super::trace::{TraceError, TraceRecord};
use crate::common::{AccessKind, ConfigError, ConsistencyError};
use crate::config::Config;
use crate::core::Hierarchy;
use crate::stats::HierarchyStats;

/// Failure that stops a trace replay.
#[derive(Debug, Error)]
pub enum SimError {
    /// The trace could not be read or parsed.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Replacement state was corrupted; statistics can no longer be trusted.
    #[error("aborting run after {accesses} accesses: {source}")]
    Consistency {
        /// Accesses completed before the failure.
        accesses: u64,
        /// Underlying error.
        source: ConsistencyError,
    },
}

/// Access counts and cycles accumulated over a run, split by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    /// Instruction accesses replayed.
    pub instructions: u64,
    /// Cycles spent on instruction accesses.
    pub instruction_cycles: u64,
    /// Data accesses replayed.
    pub data_accesses: u64,
    /// Cycles spent on data accesses.
    pub data_cycles: u64,
}

impl RunTotals {
    /// Total number of accesses.
    pub const fn accesses(&self) -> u64 {
        self.instructions.saturating_add(self.data_accesses)
    }

    /// Mean instruction access time in cycles, 0 without instruction accesses.
    pub fn avg_instruction_latency(&self) -> f64 {
        mean(self.instruction_cycles, self.instructions)
    }

    /// Mean data access time in cycles, 0 without data accesses.
    pub fn avg_data_latency(&self) -> f64 {
        mean(self.data_cycles, self.data_accesses)
    }

    const fn record(&mut self, kind: AccessKind, cycles: u64) {
        match kind {
            AccessKind::Instruction => {
                self.instructions = self.instructions.saturating_add(1);
                self.instruction_cycles = self.instruction_cycles.saturating_add(cycles);
            }
            AccessKind::Data => {
                self.data_accesses = self.data_accesses.saturating_add(1);
                self.data_cycles = self.data_cycles.saturating_add(cycles);
            }
        }
    }
}

fn mean(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Final or intermediate result of a replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SimReport {
    /// Per-kind access totals.
    pub totals: RunTotals,
    /// Per-level cache counters.
    pub stats: HierarchyStats,
}

impl SimReport {
    /// Prints the totals and the cache table to stdout.
    pub fn print(&self) {
        println!("Instruction accesses     {}", self.totals.instructions);
        println!(
            "  avg access time        {:.2} cycles",
            self.totals.avg_instruction_latency()
        );
        println!("Data accesses            {}", self.totals.data_accesses);
        println!(
            "  avg access time        {:.2} cycles",
            self.totals.avg_data_latency()
        );
        self.stats.print();
    }
}

/// Trace-driven driver around a single [`Hierarchy`].
#[derive(Debug)]
pub struct Simulator {
    /// The simulated hierarchy.
    pub hierarchy: Hierarchy,
    totals: RunTotals,
}

impl Simulator {
    /// Builds the hierarchy described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`Hierarchy::new`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            hierarchy: Hierarchy::new(config)?,
            totals: RunTotals::default(),
        })
    }

    /// Replays one record and returns its latency.
    ///
    /// # Errors
    ///
    /// Propagates the [`ConsistencyError`] of the hierarchy.
    pub fn step(&mut self, record: TraceRecord) -> Result<u64, ConsistencyError> {
        let cycles = self.hierarchy.access(record.kind, record.addr)?;
        self.totals.record(record.kind, cycles);
        Ok(cycles)
    }

    /// Replays `records` in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] for a record that failed to parse and
    /// [`SimError::Consistency`] if the hierarchy reports corrupted state.
    pub fn run<I>(&mut self, records: I) -> Result<(), SimError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        for record in records {
            if let Err(source) = self.step(record?) {
                let accesses = self.totals.accesses();
                error!(accesses, %source, "replacement state corrupted");
                return Err(SimError::Consistency { accesses, source });
            }
        }
        info!(accesses = self.totals.accesses(), "trace replay finished");
        Ok(())
    }

    /// Totals accumulated so far.
    pub const fn totals(&self) -> RunTotals {
        self.totals
    }

    /// Totals plus a snapshot of the cache counters.
    pub const fn report(&self) -> SimReport {
        SimReport {
            totals: self.totals,
            stats: self.hierarchy.stats(),
        }
    }
}
