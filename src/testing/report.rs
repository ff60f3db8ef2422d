//! Progress lines and the final summary

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use super::result::{ResultSet, TestResult, TestStatus};

/// Where human-readable progress goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Progress {
    #[default]
    Stdout,
    /// Keeps stdout free for machine-readable output
    Stderr,
    Silent,
}

impl Progress {
    pub fn emit(&self, line: &str) {
        match self {
            Self::Stdout => println!("{}", line),
            Self::Stderr => eprintln!("{}", line),
            Self::Silent => {}
        }
    }
}

/// Final counts of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
    /// Percentage, skips included in the total
    pub success_rate: f64,
}

impl Summary {
    pub fn of(results: &ResultSet) -> Self {
        Self {
            passed: results.passed(),
            failed: results.failed(),
            skipped: results.skipped(),
            total: results.total(),
            success_rate: results.success_rate(),
        }
    }

    /// Success rate rounded to one decimal place
    pub fn rate_display(&self) -> String {
        format!("{:.1}%", self.success_rate)
    }
}

/// Lines describing one outcome
pub fn format_test(result: &TestResult) -> Vec<String> {
    let mark = match result.status {
        TestStatus::Pass => "✓".green(),
        TestStatus::Fail => "✗".red(),
        TestStatus::Skip => "-".yellow(),
    };
    let status = match result.status {
        TestStatus::Pass => result.status.to_string().green(),
        TestStatus::Fail => result.status.to_string().red().bold(),
        TestStatus::Skip => result.status.to_string().yellow(),
    };

    let mut lines = vec![format!("  {} {}: {}", mark, result.name, status)];
    if let Some(data) = &result.data {
        lines.push(format!("      data: {}", compact(data).dimmed()));
    }
    if let Some(error) = &result.error {
        lines.push(format!("      error: {}", compact(error).red()));
    }
    lines
}

/// Section header printed before each numbered test
pub fn format_section(number: usize, title: &str) -> String {
    format!("\n{} {}", format!("Test {}:", number).cyan(), title)
}

/// Lines of the final report
pub fn format_summary(summary: &Summary) -> Vec<String> {
    let rule = "=".repeat(60);
    let rate = if summary.failed == 0 {
        summary.rate_display().green().bold()
    } else {
        summary.rate_display().red().bold()
    };

    vec![
        format!("\n{}", rule),
        "Summary".bold().to_string(),
        rule,
        format!("  {} {}", "Passed: ".green(), summary.passed),
        format!("  {} {}", "Failed: ".red(), summary.failed),
        format!("  {} {}", "Skipped:".yellow(), summary.skipped),
        format!("  {} {}", "Total:  ".bold(), summary.total),
        format!("  {} {}", "Success:".bold(), rate),
    ]
}

pub fn print_summary(summary: &Summary, progress: Progress) {
    for line in format_summary(summary) {
        progress.emit(&line);
    }
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
