//! Core data models for Auditoire
//!
//! These models are used throughout the codebase for representing
//! audit findings and the evidence references attached to them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generate a deterministic fingerprint for a finding.
///
/// This ensures findings have stable identities across runs, enabling:
/// - Tracking findings over time (fixed vs new vs recurring)
/// - Suppression by fingerprint in config files
/// - Reliable comparison of two audits of the same site
///
/// The fingerprint is a 16-character hex string derived from hashing:
/// - check id (which check produced it)
/// - page URL (where it was found)
/// - title (what the issue is)
pub fn finding_fingerprint(check_id: &str, url: &str, title: &str) -> String {
    // MD5 keeps the fingerprint stable across compiler versions;
    // DefaultHasher is intentionally not.
    let input = format!("{check_id}\n{url}\n{title}");
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Finding severity, ordered by urgency. P0 blocks conversion or breaks
/// the site; P3 is a minor improvement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Severity {
    P0,
    P1,
    P2,
    #[default]
    P3,
}

impl Severity {
    /// Rank for ordering: P0 is 0 (most urgent).
    pub fn rank(&self) -> u8 {
        match self {
            Severity::P0 => 0,
            Severity::P1 => 1,
            Severity::P2 => 2,
            Severity::P3 => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::P0 => write!(f, "P0"),
            Severity::P1 => write!(f, "P1"),
            Severity::P2 => write!(f, "P2"),
            Severity::P3 => write!(f, "P3"),
        }
    }
}

/// Closed set of finding categories. Rule modules each own one category;
/// the scorecard has one entry per category plus OVERALL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Ux,
    Seo,
    Performance,
    Conversion,
    Security,
    Maintenance,
    BusinessLogic,
    Accessibility,
    Content,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 9] = [
        Category::Ux,
        Category::Seo,
        Category::Performance,
        Category::Conversion,
        Category::Security,
        Category::Maintenance,
        Category::BusinessLogic,
        Category::Accessibility,
        Category::Content,
    ];

    /// Canonical uppercase name, used as the scorecard key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ux => "UX",
            Category::Seo => "SEO",
            Category::Performance => "PERFORMANCE",
            Category::Conversion => "CONVERSION",
            Category::Security => "SECURITY",
            Category::Maintenance => "MAINTENANCE",
            Category::BusinessLogic => "BUSINESS_LOGIC",
            Category::Accessibility => "ACCESSIBILITY",
            Category::Content => "CONTENT",
        }
    }

    /// Parse a canonical category name.
    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Estimated effort to fix: hours (S), days (M), or weeks (L).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Effort {
    S,
    #[default]
    M,
    L,
}

impl std::fmt::Display for Effort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effort::S => write!(f, "S"),
            Effort::M => write!(f, "M"),
            Effort::L => write!(f, "L"),
        }
    }
}

/// Pointer into the evidence model backing a finding. Created by the rule
/// module that emits the finding, never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvidenceRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metric: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EvidenceRef {
    /// Evidence pointing at a page.
    pub fn page(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Evidence carrying a named metric value, with an optional threshold
    /// the value was compared against.
    pub fn metric(
        url: impl Into<String>,
        name: impl Into<String>,
        value: impl ToString,
        threshold: Option<&str>,
    ) -> Self {
        let mut metric = BTreeMap::new();
        metric.insert(name.into(), value.to_string());
        if let Some(t) = threshold {
            metric.insert("threshold".to_string(), t.to_string());
        }
        Self {
            url: url.into(),
            metric,
            ..Default::default()
        }
    }
}

/// One discovered issue. Invariants: at least one tag, a non-empty
/// recommendation, and confidence in [0, 1]. Confidence scales the
/// finding's weight in scoring but never its presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Stable, human-readable check id, e.g. `SEO-H1-001`. Not globally
    /// unique: the same check may fire once per page, and the
    /// (id, evidence url) pair disambiguates.
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    pub summary: String,
    /// Business-facing consequence of the issue.
    pub impact: String,
    /// Actionable fix.
    pub recommendation: String,
    #[serde(default)]
    pub effort: Effort,
    #[serde(default)]
    pub evidence: Vec<EvidenceRef>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Detection confidence in [0, 1]; 1.0 for deterministic checks,
    /// lower for heuristics.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl Finding {
    /// First evidence URL, if any. Used by reporters and fingerprinting.
    pub fn primary_url(&self) -> &str {
        self.evidence.first().map(|e| e.url.as_str()).unwrap_or("")
    }

    /// Stable fingerprint for cross-run comparison.
    pub fn fingerprint(&self) -> String {
        finding_fingerprint(&self.id, self.primary_url(), &self.title)
    }
}

/// Synthetic scorecard key for the weighted overall score.
pub const OVERALL_KEY: &str = "OVERALL";

/// Category name -> integer score in [0, 100], plus [`OVERALL_KEY`].
/// Flat and serializable; downstream consumers treat it as plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scorecard(pub BTreeMap<String, i64>);

impl Scorecard {
    pub fn get(&self, category: &str) -> Option<i64> {
        self.0.get(category).copied()
    }

    pub fn overall(&self) -> i64 {
        self.get(OVERALL_KEY).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Summary of findings by severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub p0: usize,
    pub p1: usize,
    pub p2: usize,
    pub p3: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::P0 => summary.p0 += 1,
                Severity::P1 => summary.p1 += 1,
                Severity::P2 => summary.p2 += 1,
                Severity::P3 => summary.p3 += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// Complete audit output handed to reporters and downstream consumers:
/// the ordered finding list plus the scorecard, with enough context to
/// render a standalone report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Site that was audited.
    pub url: String,
    /// Business type the engine resolved, if any.
    pub business_type: Option<String>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub overall_score: i64,
    pub grade: String,
    pub scorecard: Scorecard,
    pub findings: Vec<Finding>,
    pub findings_summary: FindingsSummary,
    pub pages_audited: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::P0 < Severity::P1);
        assert!(Severity::P2 < Severity::P3);
        assert_eq!(Severity::P0.rank(), 0);
        assert_eq!(Severity::P3.rank(), 3);
    }

    #[test]
    fn category_roundtrips_through_name() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::parse("NOT_A_CATEGORY"), None);
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = finding_fingerprint("SEO-H1-001", "https://a.test/", "Missing H1");
        let b = finding_fingerprint("SEO-H1-001", "https://a.test/", "Missing H1");
        let c = finding_fingerprint("SEO-H1-001", "https://a.test/about", "Missing H1");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn summary_counts_by_severity() {
        let mk = |sev| Finding {
            id: "X-001".into(),
            category: Category::Seo,
            severity: sev,
            title: "t".into(),
            summary: "s".into(),
            impact: "i".into(),
            recommendation: "r".into(),
            effort: Effort::S,
            evidence: vec![],
            tags: vec!["x".into()],
            confidence: 1.0,
        };
        let summary =
            FindingsSummary::from_findings(&[mk(Severity::P0), mk(Severity::P0), mk(Severity::P2)]);
        assert_eq!(summary.p0, 2);
        assert_eq!(summary.p2, 1);
        assert_eq!(summary.total, 3);
    }
}
