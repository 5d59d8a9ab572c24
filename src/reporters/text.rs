//! Text (terminal) reporter with colors and formatting

use crate::models::{AuditReport, Severity, OVERALL_KEY};
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

/// Severity colors
fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::P0 => "\x1b[31m", // Red
        Severity::P1 => "\x1b[91m", // Light red
        Severity::P2 => "\x1b[33m", // Yellow
        Severity::P3 => "\x1b[34m", // Blue
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render report as formatted terminal output
pub fn render(report: &AuditReport) -> Result<String> {
    let mut out = String::new();

    // Header
    let grade_c = grade_color(&report.grade);
    out.push_str(&format!("\n{BOLD}Auditoire Report{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Site: {}  Pages: {}\n",
        report.url, report.pages_audited
    ));
    if let Some(business) = &report.business_type {
        out.push_str(&format!("Business type: {business}\n"));
    }
    out.push_str(&format!(
        "Score: {BOLD}{}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}\n\n",
        report.overall_score, report.grade
    ));

    // Category scores (compact)
    out.push_str(&format!("{BOLD}SCORES{RESET}\n"));
    for (category, score) in report.scorecard.iter() {
        if category == OVERALL_KEY {
            continue;
        }
        out.push_str(&format!("  {:<15} {}\n", category, format_score(score)));
    }
    out.push('\n');

    // Findings summary
    let fs = &report.findings_summary;
    out.push_str(&format!("{BOLD}FINDINGS{RESET} ({} total)\n", fs.total));

    let mut summary_parts = Vec::new();
    if fs.p0 > 0 {
        summary_parts.push(format!("\x1b[31m{} P0{RESET}", fs.p0));
    }
    if fs.p1 > 0 {
        summary_parts.push(format!("\x1b[91m{} P1{RESET}", fs.p1));
    }
    if fs.p2 > 0 {
        summary_parts.push(format!("\x1b[33m{} P2{RESET}", fs.p2));
    }
    if fs.p3 > 0 {
        summary_parts.push(format!("\x1b[34m{} P3{RESET}", fs.p3));
    }
    if !summary_parts.is_empty() {
        out.push_str(&format!("  {}\n\n", summary_parts.join(" | ")));
    }

    // Top findings as table
    if !report.findings.is_empty() {
        out.push_str(&format!(
            "{DIM}  #   SEV  ID                        TITLE{RESET}\n"
        ));
        out.push_str(&format!(
            "{DIM}  ─────────────────────────────────────────────────────────────────{RESET}\n"
        ));

        for (i, finding) in report.findings.iter().take(15).enumerate() {
            let sev_c = severity_color(finding.severity);

            // Truncate on char boundaries to avoid UTF-8 panics
            let title: String = finding.title.chars().take(38).collect();
            let title = if finding.title.chars().count() > 38 {
                format!("{title}...")
            } else {
                finding.title.clone()
            };

            out.push_str(&format!(
                "  {DIM}{:>3}{RESET}  {sev_c}{}{RESET}   {:<24}  {}\n",
                i + 1,
                finding.severity,
                finding.id,
                title
            ));
        }

        let remaining = report.findings.len().saturating_sub(15);
        if remaining > 0 {
            out.push_str(&format!(
                "\n  {DIM}...and {remaining} more (use --format markdown for the full list){RESET}\n"
            ));
        }
        out.push('\n');
    }

    // Tips based on grade
    match report.grade.as_str() {
        "A" => out.push_str(&format!("{DIM}Excellent! Keep up the good work.{RESET}\n")),
        "B" => out.push_str(&format!(
            "{DIM}Good shape. Address remaining issues for an A.{RESET}\n"
        )),
        "C" | "D" | "F" => {
            out.push_str(&format!(
                "{DIM}Start with the P0 findings: each one blocks conversions today.{RESET}\n"
            ));
        }
        _ => {}
    }

    Ok(out)
}

/// Format score with color
fn format_score(score: i64) -> String {
    let color = if score >= 80 {
        "\x1b[32m"
    } else if score >= 60 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    };
    format!("{color}{score}{RESET}")
}
