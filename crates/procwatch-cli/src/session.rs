//! The interactive menu session.
//!
//! One loop, numbered choices, line-buffered prompts. Every error from the
//! taxonomy surfaces as a one-line message and the loop continues; only the
//! explicit exit choice (or end of input) ends the session.

use std::io::{self, BufRead, Write};

use procwatch_core::{ProcwatchError, ProcwatchResult};
use procwatch_kill::{
    resolve, select, Resolution, TerminateConfig, TerminationOutcome, TerminationTarget,
};
use procwatch_monitor::{monitor_process, monitor_system, MonitorConfig, ProcessMonitorEnd};
use procwatch_proc::{top, ProcessTable, SortKey};

use crate::render;

/// How many processes the listing shows, ranked by memory.
const LIST_TOP: usize = 25;

/// Run the menu loop until the operator exits or input ends.
pub fn run<R, W>(input: &mut R, out: &mut W, table: &mut ProcessTable) -> ProcwatchResult<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        render::header(out, "PROCESS MANAGEMENT")?;
        writeln!(out, "1. List processes")?;
        writeln!(out, "2. Terminate a process")?;
        writeln!(out, "3. Monitor")?;
        writeln!(out, "4. System resources")?;
        writeln!(out, "5. Exit")?;

        let Some(choice) = prompt(input, out, "\nChoice (1-5): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => with_header(out, "PROCESS LIST", |out| list_processes(out, table))?,
            "2" => {
                render::header(out, "TERMINATE A PROCESS")?;
                terminate_flow(input, out, table)?;
            }
            "3" => {
                render::header(out, "MONITOR")?;
                monitor_flow(input, out, table)?;
            }
            "4" => with_header(out, "SYSTEM RESOURCES", |out| system_resources(out, table))?,
            "5" => {
                writeln!(out, "\nExiting...")?;
                break;
            }
            _ => writeln!(out, "\nInvalid choice")?,
        }
    }
    Ok(())
}

/// Uniform presentation wrapper: banner, then the handler.
fn with_header<W, F>(out: &mut W, title: &str, handler: F) -> ProcwatchResult<()>
where
    W: Write,
    F: FnOnce(&mut W) -> ProcwatchResult<()>,
{
    render::header(out, title)?;
    handler(out)
}

/// Print a prompt and read one trimmed line. `None` means end of input.
fn prompt<R, W>(input: &mut R, out: &mut W, text: &str) -> io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

// ============================================================================
// Menu Handlers
// ============================================================================

fn list_processes<W: Write>(out: &mut W, table: &mut ProcessTable) -> ProcwatchResult<()> {
    let snapshot = table.snapshot();
    let ranked = top(snapshot.samples, SortKey::Memory, LIST_TOP);

    render::process_table(out, &ranked)?;
    writeln!(out, "\nShown: {} processes", ranked.len())?;
    Ok(())
}

fn terminate_flow<R, W>(input: &mut R, out: &mut W, table: &mut ProcessTable) -> ProcwatchResult<()>
where
    R: BufRead,
    W: Write,
{
    let Some(identifier) = prompt(input, out, "\nPID or name: ")? else {
        return Ok(());
    };

    let snapshot = table.snapshot();
    let processes: Vec<TerminationTarget> = snapshot
        .samples
        .iter()
        .map(|sample| TerminationTarget {
            pid: sample.pid,
            name: sample.name.clone(),
        })
        .collect();

    let target = match resolve(&identifier, &processes) {
        Ok(Resolution::Pid(pid)) => match processes.iter().find(|t| t.pid == pid) {
            Some(target) => target.clone(),
            None => {
                writeln!(out, "{}", ProcwatchError::not_found(pid))?;
                return Ok(());
            }
        },
        Ok(Resolution::Candidates(candidates)) => {
            writeln!(out, "\nFound {} processes:", candidates.len())?;
            for (index, candidate) in candidates.iter().enumerate() {
                writeln!(
                    out,
                    "{}. PID: {}, name: {}",
                    index + 1,
                    candidate.pid,
                    candidate.name
                )?;
            }

            if candidates.len() == 1 {
                candidates[0].clone()
            } else {
                let text = format!("\nSelect a process (1-{}): ", candidates.len());
                let Some(choice) = prompt(input, out, &text)? else {
                    return Ok(());
                };
                match select(&choice, &candidates) {
                    Ok(target) => target.clone(),
                    Err(err) => {
                        writeln!(out, "{err}")?;
                        return Ok(());
                    }
                }
            }
        }
        Err(err) => {
            writeln!(out, "{err}")?;
            return Ok(());
        }
    };

    // Interactive safety: the most footgun targets are refused outright.
    if target.pid == std::process::id() {
        writeln!(out, "Refusing to terminate the procwatch process itself")?;
        return Ok(());
    }
    if target.pid == 1 {
        writeln!(out, "Refusing to terminate PID 1")?;
        return Ok(());
    }

    writeln!(out, "\nProcess: {} (PID: {})", target.name, target.pid)?;
    let Some(confirm) = prompt(input, out, "Terminate? (y/n): ")? else {
        return Ok(());
    };
    if !confirm.eq_ignore_ascii_case("y") {
        writeln!(out, "Cancelled")?;
        return Ok(());
    }

    match procwatch_kill::terminate(target.pid, &TerminateConfig::default()) {
        Ok(TerminationOutcome::Graceful) => {
            writeln!(out, "Process {} terminated", target.pid)?;
        }
        Ok(TerminationOutcome::Forced) => {
            writeln!(out, "Process {} forcefully terminated", target.pid)?;
        }
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(())
}

fn monitor_flow<R, W>(input: &mut R, out: &mut W, table: &mut ProcessTable) -> ProcwatchResult<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "1. Monitor all processes")?;
    writeln!(out, "2. Monitor a single process")?;

    let Some(choice) = prompt(input, out, "\nChoice (1-2): ")? else {
        return Ok(());
    };

    match choice.as_str() {
        "1" => monitor_all(out, table),
        "2" => monitor_one(input, out, table),
        _ => {
            writeln!(out, "\nInvalid choice")?;
            Ok(())
        }
    }
}

fn monitor_all<W: Write>(out: &mut W, table: &mut ProcessTable) -> ProcwatchResult<()> {
    let config = MonitorConfig::system();
    writeln!(out, "\nSampling for {} seconds...", config.ticks)?;

    let mut write_error: Option<io::Error> = None;
    monitor_system(table, &config, |tick, ranked| {
        if write_error.is_some() {
            return;
        }
        if let Err(err) = render::system_tick(out, tick, ranked) {
            write_error = Some(err);
        }
    });
    match write_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn monitor_one<R, W>(input: &mut R, out: &mut W, table: &mut ProcessTable) -> ProcwatchResult<()>
where
    R: BufRead,
    W: Write,
{
    let Some(raw) = prompt(input, out, "\nPID of process: ")? else {
        return Ok(());
    };
    let pid: u32 = match raw.parse() {
        Ok(pid) => pid,
        Err(_) => {
            writeln!(
                out,
                "{}",
                ProcwatchError::invalid_input(format!("'{raw}' is not a valid PID"))
            )?;
            return Ok(());
        }
    };

    let config = MonitorConfig::process();
    writeln!(out, "\nMonitoring PID {} for {} seconds...", pid, config.ticks)?;
    render::stats_header(out)?;

    let mut rendered = 0u32;
    let mut write_error: Option<io::Error> = None;
    let end = monitor_process(table, pid, &config, |tick, stats| {
        if write_error.is_some() {
            return;
        }
        rendered += 1;
        if let Err(err) = render::stats_row(out, tick, stats) {
            write_error = Some(err);
        }
    });
    if let Some(err) = write_error {
        return Err(err.into());
    }

    if end == ProcessMonitorEnd::ProcessEnded {
        if rendered == 0 {
            writeln!(out, "{}", ProcwatchError::not_found(pid))?;
        } else {
            writeln!(out, "{}", ProcwatchError::process_ended(pid))?;
        }
    }
    Ok(())
}

fn system_resources<W: Write>(out: &mut W, table: &mut ProcessTable) -> ProcwatchResult<()> {
    let report = table.overview();
    render::overview(out, &report)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
