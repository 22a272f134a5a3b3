//! procwatch-proc: Process snapshots and system resource accounting
//!
//! This crate wraps the `sysinfo` accounting facility behind a small surface:
//!
//! - **Process enumeration**: one [`ProcessSample`] per visible process
//! - **Single-process stats**: live CPU/memory/thread detail for one PID,
//!   measured over a blocking interval
//! - **Ranking**: stable descending ordering by CPU or memory (see [`rank`])
//! - **System overview**: per-core CPU, memory totals, mounted-disk usage
//!
//! Enumeration is best-effort under process churn: a process that exits or
//! denies access mid-enumeration is omitted from the snapshot, never surfaced
//! as an error.
//!
//! ## Example
//!
//! ```rust,no_run
//! use procwatch_proc::{ProcessTable, SortKey};
//!
//! let mut table = ProcessTable::new();
//! let snap = table.snapshot();
//! let top = procwatch_proc::top(snap.samples, SortKey::Memory, 25);
//! for sample in &top {
//!     println!("{}: {} ({:.2}% mem)", sample.pid, sample.name, sample.memory_percent);
//! }
//! ```

use std::time::Duration;

use serde::Serialize;
use sysinfo::{Disks, Pid, ProcessesToUpdate, System, Users};

mod rank;

pub use rank::{rank, top, SortKey};

// ============================================================================
// Core Types
// ============================================================================

/// One process as seen in a single enumeration pass.
///
/// Produced fresh on every snapshot; no identity is preserved across samples
/// beyond the pid and no smoothing is applied. Metrics default to 0.0 when
/// the accounting facility cannot report them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSample {
    /// Process ID.
    pub pid: u32,

    /// Process name (executable name).
    pub name: String,

    /// CPU usage in percent. May exceed 100 when a process uses multiple
    /// cores; 0.0 until CPU counters have been primed by a prior refresh.
    pub cpu_percent: f32,

    /// Resident memory as a percentage of total system memory.
    pub memory_percent: f32,
}

/// Snapshot of all visible processes at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Timestamp of snapshot (ISO 8601).
    pub timestamp: String,

    /// One entry per visible process, in enumeration order.
    pub samples: Vec<ProcessSample>,
}

/// Live detail for a single process.
///
/// All fields are populated on a best-effort basis; fields the platform
/// cannot report are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessStats {
    /// Process ID.
    pub pid: u32,

    /// Process name.
    pub name: String,

    /// CPU usage in percent over the measured interval.
    pub cpu_percent: f32,

    /// Resident memory as a percentage of total system memory.
    pub memory_percent: f32,

    /// Resident memory in bytes.
    pub memory_bytes: u64,

    /// Number of tasks/threads, when the platform exposes them.
    pub thread_count: Option<usize>,

    /// Scheduler state (e.g. "Runnable", "Sleeping", "Zombie").
    pub status: String,

    /// Owner username (None if unavailable due to permissions).
    pub user: Option<String>,
}

/// Load of a single logical CPU core.
#[derive(Debug, Clone, Serialize)]
pub struct CoreLoad {
    /// Core identifier as reported by the OS (e.g. "cpu0").
    pub name: String,

    /// Usage of this core in percent.
    pub usage_percent: f32,
}

/// System memory totals, in bytes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
    pub total_swap: u64,
    pub used_swap: u64,
}

/// Usage of one mounted disk, in bytes.
#[derive(Debug, Clone, Serialize)]
pub struct DiskUsage {
    /// Device name.
    pub name: String,

    /// Mount point path.
    pub mount_point: String,

    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Aggregate system resource usage at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct SystemOverview {
    /// Average usage across all cores, in percent.
    pub global_cpu_percent: f32,

    /// Per-core usage.
    pub cores: Vec<CoreLoad>,

    /// Memory and swap totals.
    pub memory: MemoryUsage,

    /// One entry per mounted disk.
    pub disks: Vec<DiskUsage>,
}

// ============================================================================
// Process Table
// ============================================================================

/// Owns the accounting state needed to take repeated snapshots.
///
/// CPU percentages are computed between consecutive refreshes, so the first
/// snapshot after construction reports 0.0 CPU for every process; values are
/// meaningful from the second refresh onward.
pub struct ProcessTable {
    sys: System,
    users: Users,
}

impl ProcessTable {
    /// Create a table and prime the CPU counters with an initial refresh.
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_processes(ProcessesToUpdate::All, true);
        ProcessTable {
            sys,
            users: Users::new_with_refreshed_list(),
        }
    }

    /// Enumerate all visible processes.
    ///
    /// Best-effort: processes that exit or deny access during enumeration are
    /// simply absent from the result. No ordering is guaranteed; impose one
    /// with [`rank`] or [`top`].
    pub fn snapshot(&mut self) -> Snapshot {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let total_memory = self.sys.total_memory();

        let samples = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| ProcessSample {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                cpu_percent: process.cpu_usage().max(0.0),
                memory_percent: memory_percent(process.memory(), total_memory),
            })
            .collect();

        Snapshot {
            timestamp: current_timestamp(),
            samples,
        }
    }

    /// Measure live stats for one process over a blocking interval.
    ///
    /// The call sleeps for `interval` between two refreshes so the CPU value
    /// reflects usage over that window; the measurement itself is the caller's
    /// tick delay. Returns `None` when the pid is no longer resolvable, which
    /// callers treat as the process having ended.
    pub fn stats(&mut self, pid: u32, interval: Duration) -> Option<ProcessStats> {
        let target = Pid::from_u32(pid);

        self.sys
            .refresh_processes(ProcessesToUpdate::Some(&[target]), true);
        self.sys.process(target)?;

        if !interval.is_zero() {
            std::thread::sleep(interval);
        }

        self.sys
            .refresh_processes(ProcessesToUpdate::Some(&[target]), true);
        let process = self.sys.process(target)?;

        let total_memory = self.sys.total_memory();
        Some(ProcessStats {
            pid,
            name: process.name().to_string_lossy().into_owned(),
            cpu_percent: process.cpu_usage().max(0.0),
            memory_percent: memory_percent(process.memory(), total_memory),
            memory_bytes: process.memory(),
            thread_count: process.tasks().map(|tasks| tasks.len()),
            status: process.status().to_string(),
            user: process
                .user_id()
                .and_then(|uid| self.users.get_user_by_id(uid))
                .map(|user| user.name().to_string()),
        })
    }

    /// Aggregate CPU, memory, and disk usage.
    ///
    /// Blocks for the minimum CPU sampling interval so per-core values are
    /// measured rather than zero.
    pub fn overview(&mut self) -> SystemOverview {
        self.sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let cores = self
            .sys
            .cpus()
            .iter()
            .map(|cpu| CoreLoad {
                name: cpu.name().to_string(),
                usage_percent: cpu.cpu_usage(),
            })
            .collect();

        let disks = Disks::new_with_refreshed_list()
            .list()
            .iter()
            .map(|disk| DiskUsage {
                name: disk.name().to_string_lossy().into_owned(),
                mount_point: disk.mount_point().to_string_lossy().into_owned(),
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
            })
            .collect();

        SystemOverview {
            global_cpu_percent: self.sys.global_cpu_usage(),
            cores,
            memory: MemoryUsage {
                total: self.sys.total_memory(),
                used: self.sys.used_memory(),
                total_swap: self.sys.total_swap(),
                used_swap: self.sys.used_swap(),
            },
            disks,
        }
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn memory_percent(resident: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (resident as f64 / total as f64 * 100.0) as f32
}

/// Get current timestamp in ISO 8601 format.
fn current_timestamp() -> String {
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

// ============================================================================
// Tests
// ============================================================================
