//! Category and overall score calculator

use crate::config::SeverityImpact;
use crate::models::{Category, Finding, Scorecard, OVERALL_KEY};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Configuration problems detected at calculator construction. These are
/// the only faults that prevent producing a scorecard; everything else in
/// the engine degrades to partial output.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("weight table is empty")]
    EmptyWeights,

    #[error("unknown category '{0}' in weight table")]
    UnknownCategory(String),

    #[error("invalid weight {value} for category '{category}': weights must be finite and non-negative")]
    InvalidWeight { category: String, value: f64 },

    #[error("severity impact table is not monotonic (P0 >= P1 >= P2 >= P3 >= 0 required)")]
    NonMonotonicImpact,
}

/// Letter grade for a 0-100 score.
pub fn grade(score: i64) -> &'static str {
    match score {
        90.. => "A",
        80..=89 => "B",
        70..=79 => "C",
        60..=69 => "D",
        _ => "F",
    }
}

/// Reduces findings to a scorecard. Weight and impact tables are
/// validated once at construction; `calculate` itself cannot fail.
#[derive(Debug)]
pub struct ScoreCalculator {
    weights: BTreeMap<String, f64>,
    impact: SeverityImpact,
}

impl ScoreCalculator {
    pub fn new(
        weights: BTreeMap<String, f64>,
        impact: SeverityImpact,
    ) -> Result<Self, ScoringError> {
        if weights.is_empty() {
            return Err(ScoringError::EmptyWeights);
        }
        for (category, &weight) in &weights {
            if Category::parse(category).is_none() {
                return Err(ScoringError::UnknownCategory(category.clone()));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringError::InvalidWeight {
                    category: category.clone(),
                    value: weight,
                });
            }
        }
        if !impact.is_monotonic() {
            return Err(ScoringError::NonMonotonicImpact);
        }

        Ok(Self { weights, impact })
    }

    /// Full scorecard: one entry per category plus OVERALL.
    pub fn calculate(&self, findings: &[Finding]) -> Scorecard {
        let mut scores = self.category_scores(findings);
        let overall = self.overall_score(&scores);
        scores.insert(OVERALL_KEY.to_string(), overall);
        Scorecard(scores)
    }

    /// Score every category, including those with no findings.
    pub fn category_scores(&self, findings: &[Finding]) -> BTreeMap<String, i64> {
        let mut scores = BTreeMap::new();
        for category in Category::ALL {
            let deducted: f64 = findings
                .iter()
                .filter(|f| f.category == category)
                .map(|f| self.impact.for_severity(f.severity) * f.confidence)
                .sum();
            // Truncate after clamping so boundary scores stay exact.
            let score = (100.0 - deducted).clamp(0.0, 100.0) as i64;
            debug!("Category {category}: -{deducted:.1} -> {score}");
            scores.insert(category.as_str().to_string(), score);
        }
        scores
    }

    /// Weighted average over the weights whose category has a score,
    /// re-normalized by the weight actually used. Zero if nothing
    /// matched; never a division by zero.
    pub fn overall_score(&self, category_scores: &BTreeMap<String, i64>) -> i64 {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for (category, &weight) in &self.weights {
            if let Some(&score) = category_scores.get(category) {
                weighted_sum += score as f64 * weight;
                total_weight += weight;
            }
        }

        if total_weight == 0.0 {
            return 0;
        }
        (weighted_sum / total_weight) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_weights;
    use crate::models::Severity;

    fn calc() -> ScoreCalculator {
        ScoreCalculator::new(default_weights(), SeverityImpact::default()).unwrap()
    }

    fn mk(category: Category, severity: Severity, confidence: f64) -> Finding {
        Finding {
            id: "T-001".into(),
            category,
            severity,
            title: "t".into(),
            summary: "s".into(),
            impact: "i".into(),
            recommendation: "r".into(),
            effort: Default::default(),
            evidence: vec![],
            tags: vec!["t".into()],
            confidence,
        }
    }

    #[test]
    fn empty_findings_score_100_everywhere() {
        let scores = calc().calculate(&[]);
        for category in Category::ALL {
            assert_eq!(scores.get(category.as_str()), Some(100));
        }
        assert_eq!(scores.overall(), 100);
    }

    #[test]
    fn deductions_scale_with_severity_and_confidence() {
        let findings = vec![
            mk(Category::Seo, Severity::P1, 1.0),
            mk(Category::Seo, Severity::P2, 0.5),
        ];
        // 100 - 15 - 4 = 81
        assert_eq!(calc().calculate(&findings).get("SEO"), Some(81));
    }

    #[test]
    fn category_score_clamps_at_zero() {
        let findings: Vec<Finding> = (0..10)
            .map(|_| mk(Category::Security, Severity::P0, 1.0))
            .collect();
        assert_eq!(calc().calculate(&findings).get("SECURITY"), Some(0));
    }

    #[test]
    fn overall_is_weighted_average() {
        let weights = BTreeMap::from([
            ("PERFORMANCE".to_string(), 0.5),
            ("SEO".to_string(), 0.5),
        ]);
        let calc = ScoreCalculator::new(weights, SeverityImpact::default()).unwrap();
        let scores = BTreeMap::from([
            ("PERFORMANCE".to_string(), 60),
            ("SEO".to_string(), 80),
        ]);
        assert_eq!(calc.overall_score(&scores), 70);
    }

    #[test]
    fn overall_renormalizes_over_missing_categories() {
        let weights =
            BTreeMap::from([("SEO".to_string(), 0.6), ("UX".to_string(), 0.4)]);
        let calc = ScoreCalculator::new(weights, SeverityImpact::default()).unwrap();
        let scores = BTreeMap::from([("SEO".to_string(), 85)]);
        assert_eq!(calc.overall_score(&scores), 85);
    }

    #[test]
    fn overall_is_zero_when_no_weight_matches() {
        let weights = BTreeMap::from([("SEO".to_string(), 1.0)]);
        let calc = ScoreCalculator::new(weights, SeverityImpact::default()).unwrap();
        let scores = BTreeMap::from([("UX".to_string(), 90)]);
        assert_eq!(calc.overall_score(&scores), 0);
    }

    #[test]
    fn unknown_category_key_is_rejected() {
        let weights = BTreeMap::from([("VIBES".to_string(), 1.0)]);
        let err = ScoreCalculator::new(weights, SeverityImpact::default()).unwrap_err();
        assert!(matches!(err, ScoringError::UnknownCategory(name) if name == "VIBES"));
    }

    #[test]
    fn bad_weight_values_are_rejected() {
        for bad in [f64::NAN, f64::INFINITY, -0.5] {
            let weights = BTreeMap::from([("SEO".to_string(), bad)]);
            assert!(matches!(
                ScoreCalculator::new(weights, SeverityImpact::default()),
                Err(ScoringError::InvalidWeight { .. })
            ));
        }
        assert!(matches!(
            ScoreCalculator::new(BTreeMap::new(), SeverityImpact::default()),
            Err(ScoringError::EmptyWeights)
        ));
    }

    #[test]
    fn grades_map_to_score_bands() {
        assert_eq!(grade(95), "A");
        assert_eq!(grade(90), "A");
        assert_eq!(grade(89), "B");
        assert_eq!(grade(70), "C");
        assert_eq!(grade(60), "D");
        assert_eq!(grade(59), "F");
    }
}
