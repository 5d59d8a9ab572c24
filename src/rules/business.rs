//! Business-logic rules driven by the feature verification sub-engine
//!
//! Maps each verified feature check to at most one finding, by tier:
//! a missing must-have is a P0 conversion blocker, a missing should-have
//! is a P2 heuristic, a broken feature is P0 at any tier, and poor
//! placement lands at P1 (must) or P2 (should). Nice-to-have features
//! never produce findings.

use crate::evidence::Evidence;
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{finding, AuditContext, RuleModule};
use crate::verify::{
    feature_display_name, feature_recommendation, verify_all, FeatureCheck, FeatureStatus,
    FeatureTier,
};

pub struct BusinessLogicRules;

impl RuleModule for BusinessLogicRules {
    fn name(&self) -> &'static str {
        "business_logic"
    }

    fn description(&self) -> &'static str {
        "Business-type feature expectations and verification"
    }

    fn category(&self) -> Category {
        Category::BusinessLogic
    }

    fn evaluate(&self, evidence: &Evidence, ctx: &AuditContext) -> Vec<Finding> {
        let Some(business) = ctx.business_type else {
            return Vec::new();
        };

        verify_all(&ctx.expectations, business, evidence)
            .iter()
            .filter_map(|check| finding_for_check(check, business.as_str()))
            .collect()
    }
}

/// Short check-id fragment from a feature key, e.g. "inquiry_form" ->
/// "INQUIRYFO".
fn feature_id(feature: &str) -> String {
    feature
        .chars()
        .take(10)
        .collect::<String>()
        .to_uppercase()
        .replace('_', "")
}

fn feature_evidence(check: &FeatureCheck, fallback_note: &str) -> EvidenceRef {
    let mut e = EvidenceRef::page(check.url.as_deref().unwrap_or(""));
    if let Some(selector) = &check.selector {
        e = e.with_selector(selector);
    }
    let note = if check.notes.is_empty() {
        fallback_note.to_string()
    } else {
        check.notes.join("; ")
    };
    e.with_note(note)
}

fn finding_for_check(check: &FeatureCheck, business: &str) -> Option<Finding> {
    let display = feature_display_name(&check.feature_name);
    let fid = feature_id(&check.feature_name);

    match (check.status, check.tier) {
        // Broken outranks tier: a feature that fails under interaction is
        // always a conversion blocker.
        (FeatureStatus::Broken, _) => Some(
            finding(
                &format!("BIZ-BROKEN-{fid}"),
                Category::BusinessLogic,
                Severity::P0,
                format!("Feature broken: {display}"),
            )
            .summary(format!("'{display}' exists but doesn't appear to function correctly"))
            .impact("A broken critical feature means users cannot complete their goal. 100% conversion loss on this path.")
            .recommend(format!("Debug and fix the {display} functionality immediately"))
            .effort(Effort::M)
            .evidence(feature_evidence(check, "Feature failed interaction checks"))
            .tags(&["broken", "critical"])
            .build(),
        ),
        (FeatureStatus::Missing, FeatureTier::MustHave) => Some(
            finding(
                &format!("BIZ-MUST-{fid}"),
                Category::BusinessLogic,
                Severity::P0,
                format!("Critical feature missing: {display}"),
            )
            .summary(format!("As a {business} website, '{display}' is expected but not detected"))
            .impact(format!(
                "This feature is essential for {business} websites. Missing it may cause complete conversion failure."
            ))
            .recommend(feature_recommendation(&check.feature_name))
            .effort(Effort::M)
            .evidence(EvidenceRef::page("").with_note(format!("{display} not detected on any page")))
            .tags(&["business-critical", business])
            .build(),
        ),
        (FeatureStatus::Missing, FeatureTier::ShouldHave) => Some(
            finding(
                &format!("BIZ-SHOULD-{fid}"),
                Category::BusinessLogic,
                Severity::P2,
                format!("Recommended feature missing: {display}"),
            )
            .summary(format!("'{display}' is common for {business} websites but not detected"))
            .impact("Competitors likely have this feature. Missing it may put you at a disadvantage.")
            .recommend(feature_recommendation(&check.feature_name))
            .effort(Effort::M)
            .evidence(EvidenceRef::page("").with_note(format!("{display} not detected on any page")))
            .tags(&["enhancement", business])
            .confidence(0.7)
            .build(),
        ),
        (FeatureStatus::PoorlyPlaced, tier @ (FeatureTier::MustHave | FeatureTier::ShouldHave)) => {
            let severity = match tier {
                FeatureTier::MustHave => Severity::P1,
                _ => Severity::P2,
            };
            Some(
                finding(
                    &format!("BIZ-PLACE-{fid}"),
                    Category::BusinessLogic,
                    severity,
                    format!("Feature poorly positioned: {display}"),
                )
                .summary(format!("'{display}' exists but is not easily discoverable"))
                .impact("Users may not find this feature, reducing conversion rate")
                .recommend(format!(
                    "Move {display} to a more prominent position (above the fold or sticky)"
                ))
                .effort(Effort::S)
                .evidence(feature_evidence(check, "Feature hidden, occluded, or below the fold"))
                .tags(&["positioning", "ux"])
                .build(),
            )
        }
        // Found features and the nice-to-have tier produce nothing.
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BusinessContext, EngineConfig};
    use crate::evidence::{CtaElement, FormElement, PageSnapshot};
    use crate::verify::BusinessType;

    fn ctx_for(business: BusinessType) -> AuditContext {
        AuditContext::resolve(
            &EngineConfig::new().with_business(BusinessContext::Explicit(business)),
            &Evidence::default(),
        )
    }

    fn site(pages: Vec<PageSnapshot>) -> Evidence {
        Evidence {
            url: "https://a.test".into(),
            pages,
            ..Default::default()
        }
    }

    #[test]
    fn real_estate_without_inquiry_form_is_p0_business_critical() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ..Default::default()
        }]);
        let findings = BusinessLogicRules.evaluate(&evidence, &ctx_for(BusinessType::RealEstate));

        let form: Vec<_> = findings.iter().filter(|f| f.id == "BIZ-MUST-INQUIRYFO").collect();
        assert_eq!(form.len(), 1);
        assert_eq!(form[0].severity, Severity::P0);
        assert_eq!(form[0].category, Category::BusinessLogic);
        assert!(form[0].tags.contains(&"business-critical".to_string()));
        assert!(form[0].tags.contains(&"real_estate".to_string()));
    }

    #[test]
    fn present_form_emits_no_missing_finding() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            forms: vec![FormElement {
                field_count: 3,
                has_email_field: true,
                ..Default::default()
            }],
            ..Default::default()
        }]);
        let findings = BusinessLogicRules.evaluate(&evidence, &ctx_for(BusinessType::RealEstate));
        assert!(!findings.iter().any(|f| f.id == "BIZ-MUST-INQUIRYFO"));
    }

    #[test]
    fn disabled_cta_is_broken_at_any_tier() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ctas: vec![CtaElement {
                text: "Add to cart".into(),
                is_visible: true,
                is_above_fold: true,
                is_disabled: true,
                ..Default::default()
            }],
            ..Default::default()
        }]);
        let findings = BusinessLogicRules.evaluate(&evidence, &ctx_for(BusinessType::Ecommerce));
        let broken: Vec<_> = findings.iter().filter(|f| f.id.starts_with("BIZ-BROKEN")).collect();
        assert!(!broken.is_empty());
        assert!(broken.iter().all(|f| f.severity == Severity::P0));
    }

    #[test]
    fn no_business_type_means_no_findings() {
        let ctx = AuditContext::resolve(
            &EngineConfig::new().with_business(BusinessContext::Disabled),
            &Evidence::default(),
        );
        let findings = BusinessLogicRules.evaluate(&site(vec![]), &ctx);
        assert!(findings.is_empty());
    }

    #[test]
    fn missing_should_have_is_p2_heuristic() {
        // Saas with a signup CTA present but no testimonials heading.
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ctas: vec![CtaElement {
                text: "Get started".into(),
                is_visible: true,
                is_above_fold: true,
                ..Default::default()
            }],
            ..Default::default()
        }]);
        let findings = BusinessLogicRules.evaluate(&evidence, &ctx_for(BusinessType::Saas));
        let testimonials: Vec<_> = findings
            .iter()
            .filter(|f| f.id == "BIZ-SHOULD-TESTIMONIA")
            .collect();
        assert_eq!(testimonials.len(), 1);
        assert_eq!(testimonials[0].severity, Severity::P2);
        assert_eq!(testimonials[0].confidence, 0.7);
    }
}
