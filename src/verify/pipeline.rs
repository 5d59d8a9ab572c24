//! Feature verification state machine
//!
//! Judges one expected feature against the evidence model through five
//! ordered stages, each only reached if the previous one passed:
//!
//! 1. Detect        - feature-specific predicate; no detection ⇒ MISSING
//! 2. Visibility    - above the fold, on desktop and mobile; failing
//!                    with the element present ⇒ POORLY_PLACED
//! 3. Interactivity - focusable/clickable; disabled state ⇒ BROKEN,
//!                    occlusion ⇒ POORLY_PLACED
//! 4. Functionality - safe-interaction outcome only; failure ⇒ BROKEN
//! 5. Evidence      - selector and console signals recorded regardless
//!
//! The pipeline is pure over the evidence value: no clock, no randomness,
//! so verifying twice yields identical results.

use crate::evidence::Evidence;
use crate::verify::detectors::{detect_feature, DetectorOutcome, InteractionEvidence};
use crate::verify::expectations::{BusinessType, ExpectationTable, FeatureTier};
use serde::Serialize;
use tracing::debug;

/// Terminal status of a feature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Found,
    Missing,
    Broken,
    PoorlyPlaced,
}

/// Where the detected element sits relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    AboveFold,
    BelowFold,
    Buried,
}

/// The verification result for one expected feature. Created fresh per
/// audit run; exists only to produce zero or one finding.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureCheck {
    pub feature_name: String,
    #[serde(skip)]
    pub tier: FeatureTier,
    pub expected: bool,
    pub found: bool,
    /// Some(..) only when a safe interaction outcome was judged.
    pub functional: Option<bool>,
    pub status: FeatureStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Console/error signals observed during the interaction stages.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Run the state machine for one feature. Returns None when the feature
/// has no implemented detector (evidence gap - the check is skipped,
/// never fabricated).
pub fn verify_feature(feature: &str, tier: FeatureTier, evidence: &Evidence) -> Option<FeatureCheck> {
    // Stage 1: detect.
    let detection = match detect_feature(feature, evidence) {
        DetectorOutcome::Unsupported => {
            debug!("No detector for feature '{feature}', skipping");
            return None;
        }
        DetectorOutcome::NotFound => {
            return Some(FeatureCheck {
                feature_name: feature.to_string(),
                tier,
                expected: true,
                found: false,
                functional: None,
                status: FeatureStatus::Missing,
                location: None,
                url: None,
                accessibility: None,
                selector: None,
                notes: Vec::new(),
            });
        }
        DetectorOutcome::Detected(d) => d,
    };

    let accessibility = if !detection.visible {
        Accessibility::Buried
    } else if detection.above_fold {
        Accessibility::AboveFold
    } else {
        Accessibility::BelowFold
    };

    // Stage 5 runs regardless of where the machine stops: capture the
    // selector and any console signals from the interaction evidence.
    let notes = match &detection.interaction {
        InteractionEvidence::Tested { console_errors, .. } => console_errors.clone(),
        _ => Vec::new(),
    };
    let base = FeatureCheck {
        feature_name: feature.to_string(),
        tier,
        expected: true,
        found: true,
        functional: None,
        status: FeatureStatus::Found,
        location: Some(detection.location.clone()),
        url: Some(detection.url.clone()),
        accessibility: Some(accessibility),
        selector: detection.selector.clone(),
        notes,
    };

    // Stage 2: visibility. A positioning failure is terminal; the
    // functionality stage is not reached for placement-only issues.
    if !detection.visible || !detection.above_fold || !detection.mobile_visible {
        return Some(FeatureCheck {
            status: FeatureStatus::PoorlyPlaced,
            ..base
        });
    }

    // Stage 3: interactivity. Disabled state is the mechanical cause and
    // wins the tie-break (BROKEN); occlusion is positional (POORLY_PLACED).
    if !detection.enabled {
        return Some(FeatureCheck {
            status: FeatureStatus::Broken,
            functional: Some(false),
            ..base
        });
    }
    if detection.occluded {
        return Some(FeatureCheck {
            status: FeatureStatus::PoorlyPlaced,
            ..base
        });
    }

    // Stage 4: functionality, only for recorded safe interactions.
    match detection.interaction {
        InteractionEvidence::Tested { succeeded: false, .. } => Some(FeatureCheck {
            status: FeatureStatus::Broken,
            functional: Some(false),
            ..base
        }),
        InteractionEvidence::Tested { succeeded: true, .. } => Some(FeatureCheck {
            functional: Some(true),
            ..base
        }),
        InteractionEvidence::Untested | InteractionEvidence::NotApplicable => Some(base),
    }
}

/// Verify every expected feature for a business type. Nice-to-have
/// features are still checked (their results surface in reports) but
/// they never produce MISSING findings downstream.
pub fn verify_all(
    table: &ExpectationTable,
    business: BusinessType,
    evidence: &Evidence,
) -> Vec<FeatureCheck> {
    let expectations = match table.get(business) {
        Some(e) => e,
        None => return Vec::new(),
    };

    expectations
        .iter()
        .filter_map(|(feature, tier)| verify_feature(feature, tier, evidence))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{CtaElement, MessagingLink, PageSnapshot};

    fn evidence_with(page: PageSnapshot) -> Evidence {
        Evidence {
            url: "https://site.test".into(),
            pages: vec![page],
            ..Default::default()
        }
    }

    fn homepage() -> PageSnapshot {
        PageSnapshot {
            url: "https://site.test/".into(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_feature_terminates_at_detect() {
        let evidence = evidence_with(homepage());
        let check =
            verify_feature("inquiry_form", FeatureTier::MustHave, &evidence).unwrap();
        assert_eq!(check.status, FeatureStatus::Missing);
        assert!(!check.found);
        assert!(check.functional.is_none());
    }

    #[test]
    fn below_fold_element_is_poorly_placed_not_broken() {
        let mut page = homepage();
        page.messaging_links = vec![MessagingLink {
            // Malformed href would fail stage 4, but stage 2 stops first.
            href: "https://example.com/chat".into(),
            is_visible: true,
            is_above_fold: false,
            ..Default::default()
        }];
        let check = verify_feature(
            "messaging_cta",
            FeatureTier::ShouldHave,
            &evidence_with(page),
        )
        .unwrap();
        assert_eq!(check.status, FeatureStatus::PoorlyPlaced);
        assert_eq!(check.accessibility, Some(Accessibility::BelowFold));
        assert!(check.functional.is_none());
    }

    #[test]
    fn disabled_element_is_broken_occluded_is_poorly_placed() {
        let mut page = homepage();
        page.ctas = vec![CtaElement {
            text: "Add to cart".into(),
            is_visible: true,
            is_above_fold: true,
            is_disabled: true,
            ..Default::default()
        }];
        let check =
            verify_feature("add_to_cart", FeatureTier::MustHave, &evidence_with(page)).unwrap();
        assert_eq!(check.status, FeatureStatus::Broken);
        assert_eq!(check.functional, Some(false));

        let mut page = homepage();
        page.ctas = vec![CtaElement {
            text: "Add to cart".into(),
            is_visible: true,
            is_above_fold: true,
            is_occluded: true,
            ..Default::default()
        }];
        let check =
            verify_feature("add_to_cart", FeatureTier::MustHave, &evidence_with(page)).unwrap();
        assert_eq!(check.status, FeatureStatus::PoorlyPlaced);
    }

    #[test]
    fn failed_safe_interaction_is_broken() {
        let mut page = homepage();
        page.console_errors = vec!["TypeError: undefined".into()];
        page.messaging_links = vec![MessagingLink {
            href: "https://example.com/not-a-messaging-link".into(),
            is_visible: true,
            is_above_fold: true,
            ..Default::default()
        }];
        let check = verify_feature(
            "messaging_cta",
            FeatureTier::ShouldHave,
            &evidence_with(page),
        )
        .unwrap();
        assert_eq!(check.status, FeatureStatus::Broken);
        assert_eq!(check.functional, Some(false));
        // Stage 5 captured console signals despite the failure.
        assert_eq!(check.notes.len(), 1);
    }

    #[test]
    fn unsupported_detector_skips_the_check() {
        let evidence = evidence_with(homepage());
        assert!(verify_feature("image_gallery", FeatureTier::MustHave, &evidence).is_none());
    }

    #[test]
    fn verification_is_idempotent() {
        let mut page = homepage();
        page.ctas = vec![CtaElement {
            text: "Get started".into(),
            is_visible: true,
            is_above_fold: true,
            ..Default::default()
        }];
        let evidence = evidence_with(page);
        let table = ExpectationTable::builtin();

        let first = verify_all(&table, BusinessType::Saas, &evidence);
        let second = verify_all(&table, BusinessType::Saas, &evidence);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.feature_name, b.feature_name);
            assert_eq!(a.status, b.status);
            assert_eq!(a.functional, b.functional);
        }
    }
}
