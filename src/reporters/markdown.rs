//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Client-facing audit summaries
//! - Pull request comments
//! - Documentation

use crate::models::{AuditReport, Finding, Severity, OVERALL_KEY};
use crate::scoring::grade;
use anyhow::Result;

/// Maximum findings to show per severity level
const MAX_FINDINGS_PER_SEVERITY: usize = 10;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &AuditReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_summary(report));
    md.push('\n');

    md.push_str(&render_category_scores(report));
    md.push('\n');

    md.push_str(&render_findings_summary(report));
    md.push('\n');

    md.push_str(&render_detailed_findings(report));
    md.push('\n');

    md.push_str(&render_footer());

    Ok(md)
}

fn render_header(report: &AuditReport) -> String {
    let grade_emoji = match report.grade.as_str() {
        "A" => "🏆",
        "B" => "⭐",
        "C" => "⚠️",
        "D" => "❌",
        "F" => "💀",
        _ => "❓",
    };

    format!(
        r#"# {} Website Audit: {}

**Grade: {}** | **Score: {}/100**

Generated: {}
"#,
        grade_emoji,
        report.url,
        report.grade,
        report.overall_score,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn render_summary(report: &AuditReport) -> String {
    let assessment = match report.grade.as_str() {
        "A" => "Excellent - Site is in great shape",
        "B" => "Good - Minor improvements recommended",
        "C" => "Fair - Several issues should be addressed",
        "D" => "Poor - Significant work needed",
        "F" => "Critical - Major issues are costing conversions",
        _ => "",
    };

    let business = report.business_type.as_deref().unwrap_or("not determined");

    format!(
        r#"## Summary

| Metric | Value |
|--------|-------|
| **Overall Grade** | {} |
| **Overall Score** | {}/100 |
| **Pages Audited** | {} |
| **Business Type** | {} |
| **Total Findings** | {} |
| **Assessment** | {} |
"#,
        report.grade,
        report.overall_score,
        report.pages_audited,
        business,
        report.findings_summary.total,
        assessment
    )
}

fn render_category_scores(report: &AuditReport) -> String {
    let mut md = String::from(
        r#"## Category Scores

| Category | Score | Grade |
|----------|-------|-------|
"#,
    );

    for (category, score) in report.scorecard.iter() {
        if category == OVERALL_KEY {
            continue;
        }
        md.push_str(&format!("| {} | {} | {} |\n", category, score, grade(score)));
    }
    md.push_str(&format!(
        "| **OVERALL** | **{}** | **{}** |\n",
        report.overall_score, report.grade
    ));

    md
}

fn render_findings_summary(report: &AuditReport) -> String {
    let fs = &report.findings_summary;
    format!(
        r#"## Findings Summary

| Severity | Count | Meaning |
|----------|-------|---------|
| 🔴 P0 | {} | Blocking conversions or site-breaking |
| 🟠 P1 | {} | Major issue, fix this week |
| 🟡 P2 | {} | Worth fixing soon |
| 🔵 P3 | {} | Minor improvement |
"#,
        fs.p0, fs.p1, fs.p2, fs.p3
    )
}

fn render_detailed_findings(report: &AuditReport) -> String {
    let mut md = String::from("## Detailed Findings\n");

    for severity in [Severity::P0, Severity::P1, Severity::P2, Severity::P3] {
        let of_severity: Vec<&Finding> = report
            .findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect();
        if of_severity.is_empty() {
            continue;
        }

        md.push_str(&format!(
            "\n### {} ({} finding{})\n\n",
            severity,
            of_severity.len(),
            if of_severity.len() == 1 { "" } else { "s" }
        ));

        for finding in of_severity.iter().take(MAX_FINDINGS_PER_SEVERITY) {
            md.push_str(&render_finding(finding));
        }

        let remaining = of_severity.len().saturating_sub(MAX_FINDINGS_PER_SEVERITY);
        if remaining > 0 {
            md.push_str(&format!("\n_...and {remaining} more at this severity._\n"));
        }
    }

    md
}

fn render_finding(finding: &Finding) -> String {
    let mut md = format!(
        r#"#### `{}` {}

{}

- **Impact:** {}
- **Fix:** {}
- **Effort:** {}
"#,
        finding.id, finding.title, finding.summary, finding.impact, finding.recommendation,
        finding.effort
    );

    if finding.confidence < 1.0 {
        md.push_str(&format!(
            "- **Confidence:** {:.0}%\n",
            finding.confidence * 100.0
        ));
    }
    for evidence in finding.evidence.iter().take(3) {
        if evidence.url.is_empty() {
            continue;
        }
        match &evidence.note {
            Some(note) => md.push_str(&format!("- **Where:** {}: {}\n", evidence.url, note)),
            None => md.push_str(&format!("- **Where:** {}\n", evidence.url)),
        }
    }
    md.push('\n');
    md
}

fn render_footer() -> String {
    "---\n\n_Generated by [auditoire](https://github.com/auditoire/auditoire)_\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn markdown_has_all_sections() {
        let md = render(&test_report()).unwrap();
        assert!(md.contains("## Summary"));
        assert!(md.contains("## Category Scores"));
        assert!(md.contains("## Findings Summary"));
        assert!(md.contains("## Detailed Findings"));
        assert!(md.contains("`SEO-H1-001`"));
    }

    #[test]
    fn evidence_notes_use_plain_separators() {
        let mut report = test_report();
        report.findings[0].evidence[0].note = Some("Empty H1 element detected".into());
        let md = render(&report).unwrap();
        assert!(md.contains("- **Where:** https://a.test/: Empty H1 element detected"));
        assert!(!md.contains('\u{2014}'));
    }

    #[test]
    fn confidence_shown_only_for_heuristics() {
        let mut report = test_report();
        report.findings[0].confidence = 0.7;
        let md = render(&report).unwrap();
        assert!(md.contains("**Confidence:** 70%"));

        report.findings[0].confidence = 1.0;
        let md = render(&report).unwrap();
        assert!(!md.contains("**Confidence:**"));
    }
}
