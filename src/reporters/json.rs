//! JSON rendering of the audit report.
//!
//! The output is the serde view of `AuditReport` verbatim: scores keyed
//! by category under `scorecard`, findings already in canonical order.
//! Pretty-printed by default so it reads well in a terminal and diffs
//! cleanly; a compact single-line variant exists for log pipelines.

use crate::models::AuditReport;
use anyhow::Result;

pub fn render(report: &AuditReport) -> Result<String> {
    render_as(report, Layout::Pretty)
}

/// Single-line output for NDJSON sinks.
#[allow(dead_code)]
pub fn render_compact(report: &AuditReport) -> Result<String> {
    render_as(report, Layout::Compact)
}

enum Layout {
    Pretty,
    Compact,
}

fn render_as(report: &AuditReport, layout: Layout) -> Result<String> {
    let out = match layout {
        Layout::Pretty => serde_json::to_string_pretty(report)?,
        Layout::Compact => serde_json::to_string(report)?,
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn json_render_is_valid_and_flat() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["grade"], "B");
        assert_eq!(parsed["scorecard"]["OVERALL"], 87);
        assert!(!parsed["findings"].as_array().expect("findings array").is_empty());
    }

    #[test]
    fn compact_layout_carries_the_same_document() {
        let report = test_report();
        let compact = render_compact(&report).expect("render compact JSON");
        assert!(!compact.contains('\n'));

        let a: serde_json::Value =
            serde_json::from_str(&render(&report).expect("render JSON")).expect("parse JSON");
        let b: serde_json::Value = serde_json::from_str(&compact).expect("parse compact JSON");
        assert_eq!(a, b);
    }

    #[test]
    fn json_empty_findings() {
        let mut report = test_report();
        report.findings.clear();
        report.findings_summary = Default::default();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["findings"].as_array().expect("findings array").len(), 0);
    }
}
