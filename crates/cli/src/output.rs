//! Report rendering (table or JSON)

use anyhow::Result;
use colored::Colorize;
use tabled::{Table, Tabled};

use sona_core::domain::{ProbeKind, ProbeReport};

#[derive(Tabled)]
struct ReportRow {
    check: String,
    result: String,
    detail: String,
}

/// Human readable verdict for a report
fn verdict(report: &ProbeReport) -> &'static str {
    match (report.kind, report.success) {
        (ProbeKind::CheckInstalled, true) => "installed",
        (ProbeKind::CheckInstalled, false) => "not installed",
        (ProbeKind::CheckRunning, true) => "running",
        (ProbeKind::CheckRunning, false) => "not running",
        (ProbeKind::Launch, true) => "launched",
        (ProbeKind::Launch, false) => "launch failed",
    }
}

fn detail(report: &ProbeReport) -> String {
    match (&report.failure, &report.output) {
        (Some(failure), _) => failure.to_string(),
        (None, Some(output)) => format!("exit 0 in {}ms", output.duration_ms),
        (None, None) => String::new(),
    }
}

impl From<&ProbeReport> for ReportRow {
    fn from(report: &ProbeReport) -> Self {
        Self {
            check: report.kind.notification().to_string(),
            result: report.success.to_string(),
            detail: detail(report),
        }
    }
}

/// Print reports for `package`
pub fn print_reports(package: &str, reports: &[ProbeReport], json: bool) -> Result<()> {
    if json {
        for report in reports {
            println!("{}", serde_json::to_string(report)?);
        }
        return Ok(());
    }

    for report in reports {
        let line = format!("{} {}", package, verdict(report));
        if report.success {
            println!("{} {}", "✓".green().bold(), line.green().bold());
        } else {
            println!("{} {}", "✗".red().bold(), line.red().bold());
        }
    }
    println!();

    let rows: Vec<ReportRow> = reports.iter().map(ReportRow::from).collect();
    println!("{}", Table::new(rows));

    let tool_missing = reports.iter().any(ProbeReport::is_execution_failure);
    if tool_missing {
        println!();
        println!(
            "{}",
            "Note: a helper tool could not be executed; results may be inaccurate".yellow()
        );
    }

    Ok(())
}
