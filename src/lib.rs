//! Auditoire - Website audit engine
//!
//! Turns collected page, performance, and security evidence into a
//! prioritized list of actionable findings plus per-category scores.
//!
//! The engine is deterministic and side-effect free: the collector
//! gathers evidence once, and everything here is a pure function of
//! that evidence and the caller's configuration.
//!
//! ```text
//! Evidence ──▶ [rule modules, parallel] ──▶ aggregator ──▶ scorecard
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use auditoire::{audit, config::EngineConfig, evidence::Evidence};
//!
//! let evidence: Evidence = serde_json::from_str(&raw)?;
//! let report = audit(&evidence, &EngineConfig::new(), 0)?;
//! println!("{}", report.overall_score);
//! ```

pub mod cli;
pub mod config;
pub mod evidence;
pub mod models;
pub mod reporters;
pub mod rules;
pub mod scoring;
pub mod verify;

pub use models::{AuditReport, Category, Finding, FindingsSummary, Scorecard, Severity};

use anyhow::Result;
use config::EngineConfig;
use evidence::Evidence;
use rules::{AuditContext, RuleEngine};
use scoring::{grade, ScoreCalculator};

/// Run a full audit with the built-in rule modules.
///
/// `workers` is the parallel fan-out width (0 = auto-detect).
pub fn audit(evidence: &Evidence, config: &EngineConfig, workers: usize) -> Result<AuditReport> {
    let engine = RuleEngine::with_default_modules().with_workers(workers);
    audit_with_engine(&engine, evidence, config)
}

/// Run an audit with a caller-assembled engine.
///
/// The weight table is validated before any rule runs, so a malformed
/// configuration fails fast instead of after the expensive part.
pub fn audit_with_engine(
    engine: &RuleEngine,
    evidence: &Evidence,
    config: &EngineConfig,
) -> Result<AuditReport> {
    let calculator = ScoreCalculator::new(config.weights.clone(), config.severity_impact)?;

    let ctx = AuditContext::resolve(config, evidence);
    let business_type = ctx.business_type.map(|b| b.as_str().to_string());

    let (findings, _summary) = engine.run(evidence, &ctx)?;
    let scorecard = calculator.calculate(&findings);
    let overall = scorecard.overall();

    Ok(AuditReport {
        url: evidence.url.clone(),
        business_type,
        generated_at: chrono::Utc::now(),
        overall_score: overall,
        grade: grade(overall).to_string(),
        scorecard,
        findings_summary: FindingsSummary::from_findings(&findings),
        findings,
        pages_audited: evidence.pages.len(),
    })
}
