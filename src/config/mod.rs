//! Engine configuration
//!
//! All tunables the engine accepts are explicit values passed in by the
//! caller: the active business context, the category weight table for the
//! overall score, and an optional severity-impact override. Nothing is
//! read from ambient or global state.
//!
//! # Configuration Format
//!
//! ```toml
//! # auditoire.toml
//!
//! business_type = "real_estate"
//!
//! [weights]
//! PERFORMANCE = 0.25
//! SEO = 0.20
//! CONVERSION = 0.25
//! UX = 0.15
//! SECURITY = 0.10
//! MAINTENANCE = 0.05
//!
//! [severity_impact]
//! P0 = 25
//! P1 = 15
//! P2 = 8
//! P3 = 3
//! ```

use crate::models::Severity;
use crate::verify::BusinessType;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// How the engine should resolve the active business type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusinessContext {
    /// Caller supplied the type explicitly.
    Explicit(BusinessType),
    /// Use the collector's detected type if one is present.
    #[default]
    AutoDetect,
    /// Skip business-logic verification entirely.
    Disabled,
}

/// Points deducted from a category score per finding, by severity.
/// Confidence scales the deduction at scoring time.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct SeverityImpact {
    pub p0: f64,
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
}

impl Default for SeverityImpact {
    fn default() -> Self {
        Self {
            p0: 25.0,
            p1: 15.0,
            p2: 8.0,
            p3: 3.0,
        }
    }
}

impl SeverityImpact {
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::P0 => self.p0,
            Severity::P1 => self.p1,
            Severity::P2 => self.p2,
            Severity::P3 => self.p3,
        }
    }

    /// Impact tables must deduct at least as much for each more urgent
    /// severity, and never a negative amount.
    pub fn is_monotonic(&self) -> bool {
        self.p0 >= self.p1 && self.p1 >= self.p2 && self.p2 >= self.p3 && self.p3 >= 0.0
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub business: BusinessContext,
    /// Category name -> weight for the overall score. Validated by the
    /// score calculator at entry.
    pub weights: BTreeMap<String, f64>,
    pub severity_impact: SeverityImpact,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            business: BusinessContext::AutoDetect,
            weights: default_weights(),
            severity_impact: SeverityImpact::default(),
        }
    }

    pub fn with_business(mut self, business: BusinessContext) -> Self {
        self.business = business;
        self
    }

    pub fn with_weights(mut self, weights: BTreeMap<String, f64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_severity_impact(mut self, impact: SeverityImpact) -> Self {
        self.severity_impact = impact;
        self
    }
}

/// Default category weights for the overall score. Sum to 1.0.
pub fn default_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("PERFORMANCE".to_string(), 0.25),
        ("SEO".to_string(), 0.20),
        ("CONVERSION".to_string(), 0.25),
        ("UX".to_string(), 0.15),
        ("SECURITY".to_string(), 0.10),
        ("MAINTENANCE".to_string(), 0.05),
    ])
}

/// On-disk configuration file (`auditoire.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub weights: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub severity_impact: Option<SeverityImpact>,
}

/// Load `auditoire.toml` from the given path and merge it over defaults.
///
/// A missing file yields the default configuration. A file that fails to
/// parse is logged and ignored rather than aborting the audit; only the
/// score calculator treats configuration problems as hard errors.
pub fn load_config(path: &Path) -> EngineConfig {
    let mut config = EngineConfig::new();

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => {
            debug!("No config file at {}, using defaults", path.display());
            return config;
        }
    };

    let file: ConfigFile = match toml::from_str(&raw) {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to parse {}: {e}. Using defaults.", path.display());
            return config;
        }
    };

    if let Some(ref name) = file.business_type {
        match BusinessType::parse(name) {
            Some(bt) => config.business = BusinessContext::Explicit(bt),
            None => warn!("Unknown business_type '{name}' in {}", path.display()),
        }
    }
    if let Some(weights) = file.weights {
        config.weights = weights;
    }
    if let Some(impact) = file.severity_impact {
        config.severity_impact = impact;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let total: f64 = default_weights().values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn default_impact_is_monotonic() {
        assert!(SeverityImpact::default().is_monotonic());
        let bad = SeverityImpact {
            p0: 5.0,
            p1: 15.0,
            p2: 8.0,
            p3: 3.0,
        };
        assert!(!bad.is_monotonic());
    }

    #[test]
    fn loads_config_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auditoire.toml");
        std::fs::write(
            &path,
            r#"
business_type = "saas"

[weights]
SEO = 0.5
PERFORMANCE = 0.5

[severity_impact]
P0 = 30
P1 = 15
P2 = 8
P3 = 2
"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(
            config.business,
            BusinessContext::Explicit(BusinessType::Saas)
        );
        assert_eq!(config.weights.len(), 2);
        assert_eq!(config.weights["SEO"], 0.5);
        assert_eq!(config.severity_impact.p0, 30.0);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/auditoire.toml"));
        assert_eq!(config.business, BusinessContext::AutoDetect);
        assert_eq!(config.weights, default_weights());
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auditoire.toml");
        std::fs::write(&path, "weights = \"not a table\"").unwrap();
        let config = load_config(&path);
        assert_eq!(config.weights, default_weights());
    }
}
