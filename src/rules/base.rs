//! Base rule module trait and types
//!
//! This module defines the core abstractions for audit rule evaluation:
//! - `RuleModule` trait that all rule modules implement
//! - `AuditContext` carrying the resolved business context
//! - `RuleResult` for capturing per-module execution results
//! - `FindingBuilder` enforcing the finding invariants at construction

use crate::config::{BusinessContext, EngineConfig};
use crate::evidence::Evidence;
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::verify::{BusinessType, ExpectationTable};
use std::collections::HashMap;
use tracing::info;

/// Read-only context shared by all rule modules for one run.
#[derive(Debug, Clone)]
pub struct AuditContext {
    /// Resolved business type, or None when disabled/undetected.
    pub business_type: Option<BusinessType>,
    pub expectations: ExpectationTable,
}

impl AuditContext {
    /// Resolve the active business type from configuration and collected
    /// signals. Auto-detection only trusts the collector's detected type
    /// when it names a known business type.
    pub fn resolve(config: &EngineConfig, evidence: &Evidence) -> Self {
        let business_type = match config.business {
            BusinessContext::Explicit(bt) => Some(bt),
            BusinessContext::Disabled => None,
            BusinessContext::AutoDetect => evidence
                .business_signals
                .detected_type
                .as_deref()
                .and_then(BusinessType::parse)
                .inspect(|bt| info!("Using auto-detected business type: {bt}")),
        };
        Self {
            business_type,
            expectations: ExpectationTable::builtin(),
        }
    }

    pub fn with_expectations(mut self, expectations: ExpectationTable) -> Self {
        self.expectations = expectations;
        self
    }
}

/// A rule module: a pure function from evidence (plus context) to
/// findings. Each module owns one category, reads only the shared
/// evidence model, and fails closed - a missing evidence field means the
/// affected check emits nothing.
pub trait RuleModule: Send + Sync {
    /// Unique identifier, e.g. "seo".
    fn name(&self) -> &'static str;

    /// Human-readable description of what this module checks.
    fn description(&self) -> &'static str;

    /// The category this module owns.
    fn category(&self) -> Category;

    /// Run every check and return the findings.
    fn evaluate(&self, evidence: &Evidence, ctx: &AuditContext) -> Vec<Finding>;
}

/// Result from running a single rule module.
#[derive(Debug, Clone)]
pub struct RuleResult {
    pub module_name: String,
    pub findings: Vec<Finding>,
    pub duration_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

impl RuleResult {
    pub fn success(module_name: String, findings: Vec<Finding>, duration_ms: u64) -> Self {
        Self {
            module_name,
            findings,
            duration_ms,
            success: true,
            error: None,
        }
    }

    pub fn failure(module_name: String, error: String, duration_ms: u64) -> Self {
        Self {
            module_name,
            findings: Vec::new(),
            duration_ms,
            success: false,
            error: Some(error),
        }
    }
}

/// Summary statistics from running all rule modules.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub modules_run: usize,
    pub modules_succeeded: usize,
    pub modules_failed: usize,
    pub total_findings: usize,
    pub by_severity: HashMap<Severity, usize>,
    pub total_duration_ms: u64,
}

impl RunSummary {
    pub fn add_result(&mut self, result: &RuleResult) {
        self.modules_run += 1;
        self.total_duration_ms += result.duration_ms;

        if result.success {
            self.modules_succeeded += 1;
            self.total_findings += result.findings.len();
            for finding in &result.findings {
                *self.by_severity.entry(finding.severity).or_insert(0) += 1;
            }
        } else {
            self.modules_failed += 1;
        }
    }
}

/// Builder enforcing the finding invariants: at least one tag, a
/// non-empty recommendation, confidence clamped to [0, 1].
#[derive(Debug, Clone)]
pub struct FindingBuilder {
    inner: Finding,
}

/// Start a finding. Title doubles as the summary until one is set.
pub fn finding(
    id: &str,
    category: Category,
    severity: Severity,
    title: impl Into<String>,
) -> FindingBuilder {
    let title = title.into();
    FindingBuilder {
        inner: Finding {
            id: id.to_string(),
            category,
            severity,
            summary: title.clone(),
            title,
            impact: String::new(),
            recommendation: String::new(),
            effort: Effort::M,
            evidence: Vec::new(),
            tags: Vec::new(),
            confidence: 1.0,
        },
    }
}

impl FindingBuilder {
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.inner.summary = summary.into();
        self
    }

    pub fn impact(mut self, impact: impl Into<String>) -> Self {
        self.inner.impact = impact.into();
        self
    }

    pub fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.inner.recommendation = recommendation.into();
        self
    }

    pub fn effort(mut self, effort: Effort) -> Self {
        self.inner.effort = effort;
        self
    }

    pub fn evidence(mut self, evidence: EvidenceRef) -> Self {
        self.inner.evidence.push(evidence);
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.inner.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.inner.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn build(self) -> Finding {
        debug_assert!(!self.inner.tags.is_empty(), "finding {} has no tags", self.inner.id);
        debug_assert!(
            !self.inner.recommendation.is_empty(),
            "finding {} has no recommendation",
            self.inner.id
        );
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_result_success() {
        let result = RuleResult::success("seo".to_string(), vec![], 100);
        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.duration_ms, 100);
    }

    #[test]
    fn rule_result_failure() {
        let result = RuleResult::failure("seo".to_string(), "oops".to_string(), 50);
        assert!(!result.success);
        assert_eq!(result.error, Some("oops".to_string()));
    }

    #[test]
    fn run_summary_tallies_results() {
        let mut summary = RunSummary::default();
        let ok = RuleResult::success("a".to_string(), vec![], 100);
        let bad = RuleResult::failure("b".to_string(), "err".to_string(), 50);

        summary.add_result(&ok);
        summary.add_result(&bad);

        assert_eq!(summary.modules_run, 2);
        assert_eq!(summary.modules_succeeded, 1);
        assert_eq!(summary.modules_failed, 1);
        assert_eq!(summary.total_duration_ms, 150);
    }

    #[test]
    fn builder_clamps_confidence() {
        let f = finding("X-001", Category::Seo, Severity::P2, "t")
            .recommend("fix it")
            .tags(&["x"])
            .confidence(1.7)
            .build();
        assert_eq!(f.confidence, 1.0);
    }

    #[test]
    fn context_resolution_honors_explicit_and_disabled() {
        let evidence = Evidence {
            business_signals: crate::evidence::BusinessSignals {
                detected_type: Some("restaurant".into()),
                confidence: 0.9,
                indicators: vec![],
            },
            ..Default::default()
        };

        let auto = AuditContext::resolve(&EngineConfig::new(), &evidence);
        assert_eq!(auto.business_type, Some(BusinessType::Restaurant));

        let explicit = AuditContext::resolve(
            &EngineConfig::new().with_business(BusinessContext::Explicit(BusinessType::Saas)),
            &evidence,
        );
        assert_eq!(explicit.business_type, Some(BusinessType::Saas));

        let disabled = AuditContext::resolve(
            &EngineConfig::new().with_business(BusinessContext::Disabled),
            &evidence,
        );
        assert_eq!(disabled.business_type, None);
    }
}
