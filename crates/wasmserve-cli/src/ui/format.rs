//! Formatting utilities for sizes, durations, and build summaries.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

/// Format file size in human-readable format.
///
/// ```
/// use wasmserve_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use wasmserve_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One row of the build summary.
#[derive(Debug, Clone)]
pub struct SummaryLine {
    /// Output file name, or input file name for failures
    pub label: String,
    /// Output size, when the file could be stat'ed
    pub size: Option<u64>,
    /// Whether this row reports a failed build
    pub failed: bool,
}

impl SummaryLine {
    /// Row for a produced artifact.
    pub fn built(label: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            label: label.into(),
            size,
            failed: false,
        }
    }

    /// Row for an input that failed to build.
    pub fn failed(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            size: None,
            failed: true,
        }
    }
}

/// Print the build summary table to stderr.
pub fn print_build_summary(lines: &[SummaryLine], elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);

    eprintln!("\n{}", "Build Summary".bold().underline());
    eprintln!("{}", "─".repeat(width));

    for line in lines {
        if line.failed {
            eprintln!("  {} {} {}", "✗".red(), line.label.red().bold(), "failed".dimmed());
        } else {
            let size = line.size.map(format_size).unwrap_or_else(|| "-".to_string());
            eprintln!("  {} {} {}", "▸".blue(), line.label.bright_white().bold(), size.dimmed());
        }
    }

    eprintln!("{}", "─".repeat(width));

    let built = lines.iter().filter(|l| !l.failed).count();
    let failed = lines.len() - built;
    let total_size: u64 = lines.iter().filter_map(|l| l.size).sum();

    eprintln!(
        "  {} {} built ({}), {} failed in {}",
        "Total:".bold(),
        built.green(),
        format_size(total_size),
        if failed > 0 { failed.red().to_string() } else { failed.to_string() },
        format_duration(elapsed).green()
    );
}
