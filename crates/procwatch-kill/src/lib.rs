//! procwatch-kill: Identifier resolution and escalating termination.
//!
//! This crate provides:
//! - Resolution of a user-supplied identifier (numeric PID or name
//!   substring) to one or more candidate processes ([`resolve`], [`select`])
//! - An escalating termination sequence ([`terminate`]): cooperative stop,
//!   bounded wait, then forced kill
//!
//! Every outcome is distinctly reportable: success via graceful stop,
//! success via forced kill, or failure. Nothing in this crate panics on a
//! missing or unkillable process.
//!
//! # Safety
//!
//! PIDs are validated before any signal is dispatched:
//!
//! - **PID 0 rejected**: signaling it would target the caller's own process
//!   group on POSIX systems
//! - **PID > i32::MAX rejected**: such values wrap to negative `pid_t`, and
//!   `kill(-1, sig)` signals every process the caller can reach

use std::time::{Duration, Instant};

use procwatch_core::{ProcwatchError, ProcwatchResult};
use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, Signal, System};
use tracing::debug;

/// Maximum valid PID value.
///
/// PIDs above this overflow to negative when cast to `pid_t` (i32), which
/// has special POSIX semantics (`kill(-1, sig)` signals everything the
/// caller can reach). Rejected at the API boundary.
pub const MAX_SAFE_PID: u32 = i32::MAX as u32;

fn validate_pid(pid: u32) -> ProcwatchResult<()> {
    if pid == 0 {
        return Err(ProcwatchError::invalid_input("pid must be > 0"));
    }
    if pid > MAX_SAFE_PID {
        return Err(ProcwatchError::invalid_input(format!(
            "pid {} exceeds maximum safe value {}",
            pid, MAX_SAFE_PID
        )));
    }
    Ok(())
}

// ============================================================================
// Identifier Resolution
// ============================================================================

/// A process selected for termination.
///
/// Resolved once per termination request, not retained afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationTarget {
    /// Process ID.
    pub pid: u32,

    /// Process name at resolution time.
    pub name: String,
}

/// Result of resolving a user-supplied identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier was a non-negative integer; treat it as a PID
    /// directly, without any name lookup.
    Pid(u32),

    /// Name-substring candidates, in enumeration order. Never empty: zero
    /// matches resolve to [`ProcwatchError::NameNotFound`] instead.
    Candidates(Vec<TerminationTarget>),
}

/// Resolve an identifier against a process list.
///
/// A string of digits is treated as a PID even if a process carries that
/// literal name. Anything else is matched case-insensitively as a substring
/// of process names; matches keep their enumeration order.
///
/// # Errors
///
/// - [`ProcwatchError::InvalidInput`] for an empty identifier or a digit
///   string too large for a PID
/// - [`ProcwatchError::NameNotFound`] when the substring matches nothing
pub fn resolve(identifier: &str, processes: &[TerminationTarget]) -> ProcwatchResult<Resolution> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ProcwatchError::invalid_input("identifier cannot be empty"));
    }

    if identifier.bytes().all(|b| b.is_ascii_digit()) {
        let pid: u32 = identifier.parse().map_err(|_| {
            ProcwatchError::invalid_input(format!("'{}' is out of range for a PID", identifier))
        })?;
        return Ok(Resolution::Pid(pid));
    }

    let needle = identifier.to_lowercase();
    let candidates: Vec<TerminationTarget> = processes
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if candidates.is_empty() {
        return Err(ProcwatchError::name_not_found(identifier));
    }

    Ok(Resolution::Candidates(candidates))
}

/// Pick one candidate by its 1-based display index.
///
/// # Errors
///
/// Returns [`ProcwatchError::AmbiguousSelection`] for non-numeric or
/// out-of-range input; callers report it and continue.
pub fn select<'a>(
    choice: &str,
    candidates: &'a [TerminationTarget],
) -> ProcwatchResult<&'a TerminationTarget> {
    let trimmed = choice.trim();
    let index: usize = trimmed
        .parse()
        .map_err(|_| ProcwatchError::ambiguous_selection(trimmed, candidates.len()))?;
    if index == 0 || index > candidates.len() {
        return Err(ProcwatchError::ambiguous_selection(
            trimmed,
            candidates.len(),
        ));
    }
    Ok(&candidates[index - 1])
}

// ============================================================================
// Termination
// ============================================================================

/// How a termination request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationOutcome {
    /// The process exited within the grace period after the cooperative
    /// stop request.
    Graceful,

    /// The process ignored (or could not receive) the cooperative request
    /// and was forcefully killed.
    Forced,
}

/// Configuration for the termination sequence.
#[derive(Debug, Clone)]
pub struct TerminateConfig {
    /// How long to wait for exit after the cooperative stop request, and
    /// again after a forced kill.
    ///
    /// Default: 2 seconds
    pub grace: Duration,

    /// Interval between liveness checks while waiting.
    ///
    /// Default: 100 milliseconds
    pub poll: Duration,
}

impl Default for TerminateConfig {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(2),
            poll: Duration::from_millis(100),
        }
    }
}

/// Terminate a process with escalation.
///
/// Sequence:
/// 1. Cooperative stop (SIGTERM-equivalent)
/// 2. Wait up to `config.grace` for exit
/// 3. Still alive, or cooperative delivery unavailable: forced kill
/// 4. Forced kill also ineffective: [`ProcwatchError::TerminationFailed`]
///
/// # Errors
///
/// - [`ProcwatchError::NotFound`] if the pid resolves to no process
/// - [`ProcwatchError::ProcessEnded`] if the pid is already a zombie
/// - [`ProcwatchError::TerminationFailed`] when both stages fail
pub fn terminate(pid: u32, config: &TerminateConfig) -> ProcwatchResult<TerminationOutcome> {
    validate_pid(pid)?;
    let target = Pid::from_u32(pid);

    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);

    let cooperative_sent = {
        let process = sys
            .process(target)
            .ok_or_else(|| ProcwatchError::not_found(pid))?;
        if is_defunct(process.status()) {
            return Err(ProcwatchError::process_ended(pid));
        }
        debug!(
            pid,
            name = %process.name().to_string_lossy(),
            "requesting cooperative termination"
        );
        // kill_with returns None when the platform cannot deliver this
        // signal; escalate straight to the forced kill in that case.
        process.kill_with(Signal::Term).unwrap_or(false)
    };

    if cooperative_sent && wait_for_exit(&mut sys, target, config) {
        debug!(pid, "process exited within grace period");
        return Ok(TerminationOutcome::Graceful);
    }

    if has_exited(&mut sys, target) {
        // Raced away between checks; the cooperative request landed.
        return Ok(TerminationOutcome::Graceful);
    }

    debug!(pid, "escalating to forced kill");
    let forced_sent = match sys.process(target) {
        None => return Ok(TerminationOutcome::Graceful),
        Some(process) => process.kill(),
    };

    if !forced_sent {
        if has_exited(&mut sys, target) {
            return Ok(TerminationOutcome::Graceful);
        }
        return Err(ProcwatchError::termination_failed(
            pid,
            "forced kill request rejected",
        ));
    }

    if wait_for_exit(&mut sys, target, config) {
        Ok(TerminationOutcome::Forced)
    } else {
        Err(ProcwatchError::termination_failed(
            pid,
            "process still running after forced kill",
        ))
    }
}

/// Zombies and dead-but-unreaped processes count as exited: the target is no
/// longer running, its parent just hasn't collected the status yet.
fn is_defunct(status: ProcessStatus) -> bool {
    matches!(status, ProcessStatus::Zombie | ProcessStatus::Dead)
}

fn has_exited(sys: &mut System, target: Pid) -> bool {
    sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
    match sys.process(target) {
        None => true,
        Some(process) => is_defunct(process.status()),
    }
}

fn wait_for_exit(sys: &mut System, target: Pid, config: &TerminateConfig) -> bool {
    let deadline = Instant::now() + config.grace;
    loop {
        if has_exited(sys, target) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(config.poll.min(deadline - now));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn target(pid: u32, name: &str) -> TerminationTarget {
        TerminationTarget {
            pid,
            name: name.to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    #[test]
    fn numeric_identifier_is_always_a_pid() {
        // Even with a process literally named "42", digits mean PID.
        let procs = vec![target(7, "42"), target(8, "other")];
        let resolution = resolve("42", &procs).unwrap();
        assert_eq!(resolution, Resolution::Pid(42));
    }

    #[test]
    fn numeric_identifier_tolerates_whitespace() {
        let resolution = resolve("  1234  ", &[]).unwrap();
        assert_eq!(resolution, Resolution::Pid(1234));
    }

    #[test]
    fn oversized_digit_string_is_invalid_input() {
        let err = resolve("99999999999999999999", &[]).unwrap_err();
        assert!(matches!(err, ProcwatchError::InvalidInput { .. }));
    }

    #[test]
    fn empty_identifier_is_invalid_input() {
        let err = resolve("   ", &[]).unwrap_err();
        assert!(matches!(err, ProcwatchError::InvalidInput { .. }));
    }

    #[test]
    fn substring_match_is_case_insensitive_and_ordered() {
        let procs = vec![
            target(100, "chrome"),
            target(200, "chromedriver"),
            target(300, "bash"),
        ];
        let resolution = resolve("Chrome", &procs).unwrap();
        match resolution {
            Resolution::Candidates(candidates) => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[0].name, "chrome");
                assert_eq!(candidates[1].name, "chromedriver");
            }
            other => panic!("expected candidates, got {other:?}"),
        }
    }

    #[test]
    fn selection_two_picks_chromedriver() {
        let procs = vec![target(100, "chrome"), target(200, "chromedriver")];
        let Resolution::Candidates(candidates) = resolve("chrome", &procs).unwrap() else {
            panic!("expected candidates");
        };
        let chosen = select("2", &candidates).unwrap();
        assert_eq!(chosen.pid, 200);
        assert_eq!(chosen.name, "chromedriver");
    }

    #[test]
    fn zero_matches_is_name_not_found() {
        let procs = vec![target(100, "bash")];
        let err = resolve("no-such-proc", &procs).unwrap_err();
        match err {
            ProcwatchError::NameNotFound { query } => assert_eq!(query, "no-such-proc"),
            other => panic!("expected NameNotFound, got {other:?}"),
        }
    }

    #[test]
    fn select_rejects_out_of_range() {
        let candidates = vec![target(1, "a"), target(2, "b")];
        assert!(matches!(
            select("0", &candidates),
            Err(ProcwatchError::AmbiguousSelection { .. })
        ));
        assert!(matches!(
            select("3", &candidates),
            Err(ProcwatchError::AmbiguousSelection { .. })
        ));
    }

    #[test]
    fn select_rejects_non_numeric() {
        let candidates = vec![target(1, "a")];
        let err = select("first", &candidates).unwrap_err();
        match err {
            ProcwatchError::AmbiguousSelection { choice, candidates } => {
                assert_eq!(choice, "first");
                assert_eq!(candidates, 1);
            }
            other => panic!("expected AmbiguousSelection, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------
    // Termination
    // ------------------------------------------------------------------

    #[test]
    fn terminate_rejects_pid_zero() {
        let err = terminate(0, &TerminateConfig::default()).unwrap_err();
        assert!(matches!(err, ProcwatchError::InvalidInput { .. }));
    }

    #[test]
    fn terminate_rejects_pid_exceeding_max_safe() {
        // u32::MAX cast to i32 would be -1; kill(-1, sig) signals everything.
        let err = terminate(u32::MAX, &TerminateConfig::default()).unwrap_err();
        assert!(matches!(err, ProcwatchError::InvalidInput { .. }));
    }

    #[test]
    fn terminate_nonexistent_pid_is_not_found() {
        let err = terminate(999_999_999, &TerminateConfig::default()).unwrap_err();
        assert!(matches!(err, ProcwatchError::NotFound { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn terminate_sleeping_child_is_graceful() {
        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep");

        let outcome = terminate(child.id(), &TerminateConfig::default())
            .expect("termination should succeed");
        assert_eq!(
            outcome,
            TerminationOutcome::Graceful,
            "sleep should exit on SIGTERM without escalation"
        );

        child.wait().expect("reap child");
    }

    #[test]
    #[cfg(unix)]
    fn terminate_sigterm_immune_child_is_forced() {
        let mut child = std::process::Command::new("sh")
            .arg("-c")
            .arg("trap '' TERM; sleep 30")
            .spawn()
            .expect("spawn sh");

        // Give the shell a moment to install the trap.
        std::thread::sleep(Duration::from_millis(300));

        let config = TerminateConfig {
            grace: Duration::from_millis(500),
            poll: Duration::from_millis(50),
        };
        let outcome = terminate(child.id(), &config).expect("termination should succeed");
        assert_eq!(
            outcome,
            TerminationOutcome::Forced,
            "TERM-immune shell should require SIGKILL"
        );

        child.wait().expect("reap child");
    }
}
