//! Fixed-width table rendering for the interactive session.

use std::io::{self, Write};

use procwatch_proc::{ProcessSample, ProcessStats, SystemOverview};

const RULE_WIDTH: usize = 50;

/// Format a byte count as a human-readable string.
pub fn format_memory(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * 1024 * 1024;

    if bytes < KIB {
        format!("{bytes}B")
    } else if bytes < MIB {
        format!("{}K", bytes / KIB)
    } else if bytes < GIB {
        format!("{}M", bytes / MIB)
    } else {
        format!("{:.1}G", bytes as f64 / GIB as f64)
    }
}

/// Truncate a name for display, respecting character boundaries.
pub fn truncate_name(name: &str, max_chars: usize) -> &str {
    match name.char_indices().nth(max_chars) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Section banner: a rule, the title, a rule.
pub fn header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Fixed-width table of process samples.
pub fn process_table<W: Write>(out: &mut W, samples: &[ProcessSample]) -> io::Result<()> {
    writeln!(
        out,
        "{:<8} {:<20} {:<8} {:<10}",
        "PID", "NAME", "CPU%", "MEM%"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for sample in samples {
        writeln!(
            out,
            "{:<8} {:<20} {:<8.1} {:<10.2}",
            sample.pid,
            truncate_name(&sample.name, 20),
            sample.cpu_percent,
            sample.memory_percent
        )?;
    }
    Ok(())
}

/// One frame of the system-wide monitor.
pub fn system_tick<W: Write>(out: &mut W, tick: u32, samples: &[ProcessSample]) -> io::Result<()> {
    writeln!(out, "\nTick {tick}:")?;
    process_table(out, samples)
}

/// Column header for the single-process monitor rows.
pub fn stats_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{:<6} {:<8} {:<8} {:<10} {:<8} {}",
        "TICK", "CPU%", "MEM%", "RSS", "THREADS", "STATUS"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

/// One row of the single-process monitor.
pub fn stats_row<W: Write>(out: &mut W, tick: u32, stats: &ProcessStats) -> io::Result<()> {
    let threads = stats
        .thread_count
        .map(|count| count.to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "{:<6} {:<8.1} {:<8.2} {:<10} {:<8} {}",
        tick,
        stats.cpu_percent,
        stats.memory_percent,
        format_memory(stats.memory_bytes),
        threads,
        stats.status
    )
}

/// Aggregate CPU / memory / disk report.
pub fn overview<W: Write>(out: &mut W, report: &SystemOverview) -> io::Result<()> {
    writeln!(out, "CPU (all cores): {:.1}%", report.global_cpu_percent)?;
    for core in &report.cores {
        writeln!(out, "  {:<8} {:>5.1}%", core.name, core.usage_percent)?;
    }

    let mem = &report.memory;
    writeln!(
        out,
        "\nMemory: {} / {} used",
        format_memory(mem.used),
        format_memory(mem.total)
    )?;
    writeln!(
        out,
        "Swap:   {} / {} used",
        format_memory(mem.used_swap),
        format_memory(mem.total_swap)
    )?;

    writeln!(out, "\n{:<24} {:<10} {:<10}", "MOUNT", "TOTAL", "FREE")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for disk in &report.disks {
        writeln!(
            out,
            "{:<24} {:<10} {:<10}",
            truncate_name(&disk.mount_point, 24),
            format_memory(disk.total_bytes),
            format_memory(disk.available_bytes)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_memory_units() {
        assert_eq!(format_memory(512), "512B");
        assert_eq!(format_memory(2048), "2K");
        assert_eq!(format_memory(3 * 1024 * 1024), "3M");
        assert_eq!(format_memory(5 * 1024 * 1024 * 1024), "5.0G");
    }

    #[test]
    fn truncate_name_respects_char_boundaries() {
        assert_eq!(truncate_name("short", 20), "short");
        assert_eq!(truncate_name("a-very-long-process-name", 10), "a-very-lon");
        // Multi-byte characters must not be split mid-codepoint.
        assert_eq!(truncate_name("ééééé", 3), "ééé");
    }

    #[test]
    fn process_table_writes_header_and_rows() {
        let samples = vec![ProcessSample {
            pid: 42,
            name: "init".into(),
            cpu_percent: 1.5,
            memory_percent: 0.25,
        }];
        let mut buf = Vec::new();
        process_table(&mut buf, &samples).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("PID"));
        assert!(text.contains("init"));
        assert!(text.contains("1.5"));
    }

    #[test]
    fn stats_row_renders_missing_thread_count_as_dash() {
        let stats = ProcessStats {
            pid: 1,
            name: "init".into(),
            cpu_percent: 0.0,
            memory_percent: 0.1,
            memory_bytes: 1024,
            thread_count: None,
            status: "Sleeping".into(),
            user: None,
        };
        let mut buf = Vec::new();
        stats_row(&mut buf, 3, &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('-'));
        assert!(text.contains("Sleeping"));
    }
}
