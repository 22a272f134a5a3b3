//! procwatch-monitor: Bounded fixed-cadence sampling loops.
//!
//! Two loop variants, both sampling at a fixed 1 Hz cadence for a fixed
//! number of ticks:
//!
//! - [`monitor_system`]: each tick snapshots every process, ranks by CPU,
//!   and renders the top entries. Sleeps between ticks, but not after the
//!   final one.
//! - [`monitor_process`]: each tick measures one PID's live stats; the
//!   measurement itself blocks for the sampling interval, so it doubles as
//!   the tick delay. Ends early, as a normal outcome, when the PID stops
//!   resolving.
//!
//! The loops are not adaptive and expose no external cancellation; the tick
//! bound is the only terminal condition besides the target disappearing.
//! Sampling goes through the [`Sampler`] seam so tests can script it.

use std::time::Duration;

use procwatch_proc::{top, ProcessSample, ProcessStats, ProcessTable, SortKey};
use tracing::debug;

// ============================================================================
// Sampler Seam
// ============================================================================

/// Source of process samples for the monitor loops.
///
/// The live implementation is [`ProcessTable`]; tests use scripted samplers.
pub trait Sampler {
    /// Enumerate all visible processes.
    fn system_sample(&mut self) -> Vec<ProcessSample>;

    /// Measure one process over `interval`, blocking for that long.
    ///
    /// `None` means the PID is no longer resolvable.
    fn process_sample(&mut self, pid: u32, interval: Duration) -> Option<ProcessStats>;
}

impl Sampler for ProcessTable {
    fn system_sample(&mut self) -> Vec<ProcessSample> {
        self.snapshot().samples
    }

    fn process_sample(&mut self, pid: u32, interval: Duration) -> Option<ProcessStats> {
        self.stats(pid, interval)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Tick bounds and cadence for a monitor run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Number of samples to take before stopping.
    pub ticks: u32,

    /// Cadence between samples. For the single-process variant this is the
    /// blocking measurement window rather than a separate sleep.
    pub interval: Duration,

    /// How many ranked entries to render per system-wide tick.
    pub top: usize,
}

impl MonitorConfig {
    /// System-wide monitoring: 5 ticks at 1 Hz, top 5 by CPU.
    pub fn system() -> Self {
        Self {
            ticks: 5,
            interval: Duration::from_secs(1),
            top: 5,
        }
    }

    /// Single-process monitoring: 10 ticks at 1 Hz.
    pub fn process() -> Self {
        Self {
            ticks: 10,
            interval: Duration::from_secs(1),
            top: 1,
        }
    }
}

/// How a single-process monitor run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMonitorEnd {
    /// All configured ticks were rendered.
    Completed,

    /// The target stopped resolving mid-run; fewer than the configured
    /// number of ticks were rendered. A normal outcome, not an error.
    ProcessEnded,
}

// ============================================================================
// Loops
// ============================================================================

/// Sample all processes for `config.ticks` ticks, rendering the top entries
/// ranked by CPU on every tick.
///
/// `render` receives the 1-based tick number and the ranked, truncated
/// samples. Exactly `config.ticks` frames are rendered.
pub fn monitor_system<S, F>(sampler: &mut S, config: &MonitorConfig, mut render: F)
where
    S: Sampler,
    F: FnMut(u32, &[ProcessSample]),
{
    for tick in 1..=config.ticks {
        let ranked = top(sampler.system_sample(), SortKey::Cpu, config.top);
        debug!(tick, shown = ranked.len(), "system monitor tick");
        render(tick, &ranked);
        // No sleep after the final tick.
        if tick < config.ticks && !config.interval.is_zero() {
            std::thread::sleep(config.interval);
        }
    }
}

/// Sample one PID for up to `config.ticks` ticks.
///
/// The interval-blocking measurement is the tick delay; no extra sleep is
/// inserted. Stops immediately on the tick where the lookup fails.
pub fn monitor_process<S, F>(
    sampler: &mut S,
    pid: u32,
    config: &MonitorConfig,
    mut render: F,
) -> ProcessMonitorEnd
where
    S: Sampler,
    F: FnMut(u32, &ProcessStats),
{
    for tick in 1..=config.ticks {
        match sampler.process_sample(pid, config.interval) {
            Some(stats) => {
                debug!(tick, pid, cpu = stats.cpu_percent, "process monitor tick");
                render(tick, &stats);
            }
            None => {
                debug!(tick, pid, "target no longer resolvable");
                return ProcessMonitorEnd::ProcessEnded;
            }
        }
    }
    ProcessMonitorEnd::Completed
}

// ============================================================================
// Tests
// ============================================================================
