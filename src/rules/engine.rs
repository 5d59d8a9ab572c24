//! Rule execution engine with parallel support
//!
//! The RuleEngine orchestrates one audit run:
//! - Runs every registered rule module over the shared evidence model
//! - Modules are independent of each other, so they fan out on rayon
//! - Isolates module panics; a crashing module never loses the findings
//!   of the others, it surfaces as a diagnostic finding instead
//! - Aggregates into one canonically ordered findings list

use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{AuditContext, RuleModule, RuleResult, RunSummary};
use crate::rules::{
    business::BusinessLogicRules, content::ContentRules, conversion::ConversionRules,
    maintenance::MaintenanceRules, performance::PerformanceRules, seo::SeoRules,
    security::SecurityRules, ux::UxRules,
};
use crate::evidence::Evidence;
use anyhow::Result;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Orchestrates rule evaluation across all registered modules
pub struct RuleEngine {
    modules: Vec<Arc<dyn RuleModule>>,
    /// Number of worker threads for parallel execution
    workers: usize,
}

impl RuleEngine {
    /// Create an engine with no modules registered.
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            workers
        };

        Self {
            modules: Vec::new(),
            workers: actual_workers,
        }
    }

    /// Engine with the full built-in module set.
    pub fn with_default_modules() -> Self {
        let mut engine = Self::new(0);
        engine.register_all([
            Arc::new(SeoRules) as Arc<dyn RuleModule>,
            Arc::new(SecurityRules),
            Arc::new(PerformanceRules),
            Arc::new(ConversionRules),
            Arc::new(UxRules),
            Arc::new(MaintenanceRules),
            Arc::new(ContentRules),
            Arc::new(BusinessLogicRules),
        ]);
        engine
    }

    /// Override the worker count (0 = auto-detect).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Self::new(workers).workers;
        self
    }

    /// Register a rule module
    pub fn register(&mut self, module: Arc<dyn RuleModule>) {
        debug!("Registering rule module: {}", module.name());
        self.modules.push(module);
    }

    /// Register multiple modules at once
    pub fn register_all(&mut self, modules: impl IntoIterator<Item = Arc<dyn RuleModule>>) {
        for module in modules {
            self.register(module);
        }
    }

    /// Get the number of registered modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Registered modules, in registration order.
    pub fn modules(&self) -> &[Arc<dyn RuleModule>] {
        &self.modules
    }

    /// Get names of all registered modules
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Run every module and return the aggregated findings in canonical
    /// order, plus the run summary.
    ///
    /// Registration order fixes the fan-out order, and rayon's collect
    /// preserves it, so per-module emission order survives into the
    /// stable aggregation sort. Two runs over the same evidence produce
    /// byte-identical output.
    pub fn run(&self, evidence: &Evidence, ctx: &AuditContext) -> Result<(Vec<Finding>, RunSummary)> {
        let start = Instant::now();
        info!(
            "Starting audit with {} rule modules on {} workers",
            self.modules.len(),
            self.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let results: Vec<RuleResult> = pool.install(|| {
            self.modules
                .par_iter()
                .map(|module| run_single_module(module, evidence, ctx))
                .collect()
        });

        let mut all_findings: Vec<Finding> = Vec::new();
        let mut summary = RunSummary::default();

        for result in results {
            summary.add_result(&result);
            if result.success {
                all_findings.extend(result.findings);
            } else if let Some(err) = &result.error {
                // The failure still shows up in the report as a
                // maintenance diagnostic, so the scorecard reflects it.
                all_findings.push(diagnostic_finding(&result.module_name, err, evidence));
                summary.total_findings += 1;
            }
        }

        // Canonical order: severity first, then category name; stable, so
        // per-module emission order breaks remaining ties.
        all_findings.sort_by(|a, b| {
            a.severity
                .rank()
                .cmp(&b.severity.rank())
                .then_with(|| a.category.as_str().cmp(b.category.as_str()))
        });

        summary.total_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Audit complete: {} findings from {}/{} modules in {:?}",
            all_findings.len(),
            summary.modules_succeeded,
            summary.modules_run,
            start.elapsed()
        );

        Ok((all_findings, summary))
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_default_modules()
    }
}

/// Run a single module with panic isolation and timing.
fn run_single_module(
    module: &Arc<dyn RuleModule>,
    evidence: &Evidence,
    ctx: &AuditContext,
) -> RuleResult {
    let name = module.name().to_string();
    let start = Instant::now();

    debug!("Running rule module: {}", name);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        module.evaluate(evidence, ctx)
    }));

    match outcome {
        Ok(findings) => {
            let duration = start.elapsed().as_millis() as u64;
            debug!("Module {} found {} findings in {}ms", name, findings.len(), duration);
            RuleResult::success(name, findings, duration)
        }
        Err(panic_info) => {
            let duration = start.elapsed().as_millis() as u64;
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            error!("Rule module {} panicked: {}", name, panic_msg);
            RuleResult::failure(name, panic_msg, duration)
        }
    }
}

/// Synthetic finding for a module that crashed mid-run. P3 maintenance,
/// so the failure is visible in the report without sinking the score.
fn diagnostic_finding(module_name: &str, error: &str, evidence: &Evidence) -> Finding {
    Finding {
        id: "ENGINE-FAULT-001".to_string(),
        category: Category::Maintenance,
        severity: Severity::P3,
        title: format!("Audit module '{module_name}' did not complete"),
        summary: format!("The {module_name} checks crashed and produced no results for this run."),
        impact: "One category of checks is missing from this report; its score may read higher than reality.".to_string(),
        recommendation: "Re-run the audit. If the failure persists, file the error below against the audit tooling.".to_string(),
        effort: Effort::S,
        evidence: vec![EvidenceRef {
            url: evidence.url.clone(),
            note: Some(error.to_string()),
            ..Default::default()
        }],
        tags: vec!["diagnostic".to_string(), "tooling".to_string()],
        confidence: 1.0,
    }
}
