//! Conversion checks: CTAs, forms, messaging links, contact info

use crate::evidence::Evidence;
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{finding, AuditContext, RuleModule};

const WEAK_SUBMIT_TEXTS: [&str; 4] = ["submit", "send", "go", "ok"];

pub struct ConversionRules;

impl RuleModule for ConversionRules {
    fn name(&self) -> &'static str {
        "conversion"
    }

    fn description(&self) -> &'static str {
        "CTAs, lead-capture forms, messaging links, and contact info"
    }

    fn category(&self) -> Category {
        Category::Conversion
    }

    fn evaluate(&self, evidence: &Evidence, _ctx: &AuditContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        check_cta_presence(evidence, &mut findings);
        check_cta_above_fold(evidence, &mut findings);
        check_messaging_presence(evidence, &mut findings);
        check_messaging_visibility(evidence, &mut findings);
        check_forms(evidence, &mut findings);
        check_mobile_ctas(evidence, &mut findings);
        check_contact_info(evidence, &mut findings);
        findings
    }
}

fn check_cta_presence(evidence: &Evidence, findings: &mut Vec<Finding>) {
    if let Some(homepage) = evidence.homepage() {
        if homepage.ctas.is_empty() {
            findings.push(
                finding(
                    "CONV-CTA-001",
                    Category::Conversion,
                    Severity::P0,
                    "No CTAs detected on homepage",
                )
                .summary("Homepage has no identifiable call-to-action buttons or links")
                .impact("Without CTAs, visitors have no clear next step. This is a complete conversion blocker.")
                .recommend("Add prominent CTAs above the fold: 'Contact Us', 'Get Quote', 'Book Now', etc.")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&homepage.url).with_note("No CTAs found"))
                .tags(&["cta", "critical"])
                .build(),
            );
        }
    }

    let pages_without: Vec<&str> = evidence
        .pages
        .iter()
        .filter(|p| p.ctas.is_empty())
        .map(|p| p.url.as_str())
        .collect();

    if pages_without.len() > 1 {
        let mut f = finding(
            "CONV-CTA-002",
            Category::Conversion,
            Severity::P1,
            format!("Multiple pages lack CTAs ({} pages)", pages_without.len()),
        )
        .summary(format!("{} pages have no identifiable CTAs", pages_without.len()))
        .impact("Pages without CTAs are dead ends for conversion")
        .recommend("Add relevant CTAs to all content pages")
        .effort(Effort::M)
        .tags(&["cta", "multiple-pages"]);
        for url in pages_without.iter().take(3) {
            f = f.evidence(EvidenceRef::page(*url));
        }
        findings.push(f.build());
    }
}

fn check_cta_above_fold(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let Some(homepage) = evidence.homepage() else {
        return;
    };
    if homepage.ctas.is_empty() {
        return;
    }

    if !homepage.ctas.iter().any(|c| c.is_above_fold) {
        findings.push(
            finding(
                "CONV-FOLD-001",
                Category::Conversion,
                Severity::P1,
                "No CTA above the fold on homepage",
            )
            .summary("All CTAs require scrolling to see")
            .impact("Users who don't scroll will miss all conversion opportunities. Many users never scroll.")
            .recommend("Place the primary CTA in the hero section, visible without scrolling")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&homepage.url).with_note("CTAs below fold only"))
            .tags(&["cta", "above-fold"])
            .build(),
        );
    }

    let visible = homepage.ctas.iter().filter(|c| c.is_visible).count();
    if (visible as f64) < homepage.ctas.len() as f64 * 0.5 {
        findings.push(
            finding(
                "CONV-VIS-001",
                Category::Conversion,
                Severity::P2,
                "Many CTAs are not visible",
            )
            .summary(format!("Only {visible}/{} CTAs are visible", homepage.ctas.len()))
            .impact("Hidden CTAs cannot drive conversions")
            .recommend("Ensure CTAs are visible and not hidden by CSS or JavaScript")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&homepage.url))
            .tags(&["cta", "visibility"])
            .build(),
        );
    }
}

fn has_phone_contact(evidence: &Evidence) -> bool {
    evidence
        .pages
        .iter()
        .any(|p| !p.contact_info.phones.is_empty() || p.contact_info.has_tel_link)
}

fn check_messaging_presence(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let has_messaging = evidence.pages.iter().any(|p| !p.messaging_links.is_empty());
    if has_messaging {
        return;
    }

    // Only flag when a phone presence suggests chat contact is relevant.
    if has_phone_contact(evidence) {
        findings.push(
            finding(
                "CONV-MSG-001",
                Category::Conversion,
                Severity::P2,
                "No messaging contact option detected",
            )
            .summary("Website has phone contact but no chat-app integration")
            .impact("Chat apps are the preferred contact method in many markets. Missing one loses potential leads.")
            .recommend("Add a messaging button (e.g. a wa.me link). Consider a floating button for visibility.")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["messaging", "contact"])
            .confidence(0.8)
            .build(),
        );
    }
}

fn check_messaging_visibility(evidence: &Evidence, findings: &mut Vec<Finding>) {
    // Only the first page carrying messaging links is judged.
    let Some(page) = evidence.pages.iter().find(|p| !p.messaging_links.is_empty()) else {
        return;
    };

    let visible = page.messaging_links.iter().filter(|m| m.is_visible).count();
    let above_fold = page
        .messaging_links
        .iter()
        .filter(|m| m.is_above_fold)
        .count();

    if visible == 0 {
        findings.push(
            finding(
                "CONV-MSG-002",
                Category::Conversion,
                Severity::P1,
                "Messaging button not visible",
            )
            .summary("A chat link exists but is not visible on the page")
            .impact("A hidden messaging button defeats its purpose")
            .recommend("Make the messaging button visible. Consider a sticky/floating button.")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&page.url))
            .tags(&["messaging", "visibility"])
            .build(),
        );
    } else if above_fold == 0 {
        findings.push(
            finding(
                "CONV-MSG-003",
                Category::Conversion,
                Severity::P2,
                "Messaging button below fold",
            )
            .summary("The chat option requires scrolling to find")
            .impact("Users may not discover the chat option before leaving")
            .recommend("Add a sticky messaging button or place it in the header")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&page.url))
            .tags(&["messaging", "positioning"])
            .build(),
        );
    }
}

fn check_forms(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let total_forms: usize = evidence.pages.iter().map(|p| p.forms.len()).sum();

    if total_forms == 0 {
        findings.push(
            finding(
                "CONV-FORM-001",
                Category::Conversion,
                Severity::P1,
                "No contact/inquiry forms detected",
            )
            .summary("No forms found across audited pages")
            .impact("Forms are the primary lead-capture mechanism. Missing forms means missing leads.")
            .recommend("Add a contact/inquiry form to key pages (homepage, contact, service pages)")
            .effort(Effort::M)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["form", "lead-capture"])
            .build(),
        );
        return;
    }

    for page in &evidence.pages {
        for form in &page.forms {
            if form.field_count > 7 {
                findings.push(
                    finding(
                        "CONV-FORM-002",
                        Category::Conversion,
                        Severity::P2,
                        format!("Form has too many fields ({})", form.field_count),
                    )
                    .summary(format!("Form on {} has {} fields", page.name(), form.field_count))
                    .impact("Each additional field reduces conversion rate by ~10%. Long forms scare users away.")
                    .recommend("Reduce to essential fields only: Name, Email/Phone, Message. Collect more later.")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&page.url))
                    .tags(&["form", "optimization"])
                    .build(),
                );
            }

            if !form.has_email_field && !form.has_phone_field {
                findings.push(
                    finding(
                        "CONV-FORM-003",
                        Category::Conversion,
                        Severity::P2,
                        "Form missing contact field",
                    )
                    .summary("Form has no email or phone field")
                    .impact("Cannot follow up with leads if no contact method is captured")
                    .recommend("Add an email field (required) and a phone field (optional)")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&page.url))
                    .tags(&["form", "fields"])
                    .build(),
                );
            }

            let submit = form.submit_button_text.trim().to_lowercase();
            if WEAK_SUBMIT_TEXTS.contains(&submit.as_str()) {
                findings.push(
                    finding(
                        "CONV-FORM-004",
                        Category::Conversion,
                        Severity::P3,
                        format!("Weak form button text: '{}'", form.submit_button_text),
                    )
                    .summary("Form submit button uses generic text")
                    .impact("Action-oriented button text improves conversion rates")
                    .recommend("Use specific text: 'Get Quote', 'Book Now', 'Send Message'")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&page.url))
                    .tags(&["form", "microcopy"])
                    .build(),
                );
            }
        }
    }
}

fn check_mobile_ctas(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let Some(homepage) = evidence.homepage() else {
        return;
    };
    let desktop = homepage.ctas.len();
    let mobile = homepage.mobile_ctas.len();

    if desktop > 0 && mobile == 0 {
        findings.push(
            finding(
                "CONV-MOB-001",
                Category::Conversion,
                Severity::P0,
                "No CTAs visible on mobile",
            )
            .summary("Desktop has CTAs but none detected on the mobile viewport")
            .impact("Mobile users (often 50%+ of traffic) have no conversion path")
            .recommend("Ensure CTAs are visible on mobile. Check the responsive design.")
            .effort(Effort::M)
            .evidence(EvidenceRef::page(&homepage.url))
            .tags(&["mobile", "cta", "critical"])
            .build(),
        );
    } else if desktop > 0 && (mobile as f64) < desktop as f64 * 0.5 {
        findings.push(
            finding(
                "CONV-MOB-002",
                Category::Conversion,
                Severity::P1,
                "Fewer CTAs visible on mobile",
            )
            .summary(format!("Mobile shows {mobile} CTAs vs {desktop} on desktop"))
            .impact("Mobile users have fewer conversion opportunities")
            .recommend("Review the mobile design to ensure key CTAs remain visible")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&homepage.url))
            .tags(&["mobile", "cta"])
            .build(),
        );
    }
}

fn check_contact_info(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let has_phone = has_phone_contact(evidence);
    let has_email = evidence.pages.iter().any(|p| !p.contact_info.emails.is_empty());

    if !has_phone && !has_email {
        findings.push(
            finding(
                "CONV-CONTACT-001",
                Category::Conversion,
                Severity::P1,
                "No contact information detected",
            )
            .summary("No phone numbers or email addresses found")
            .impact("Users cannot contact the business directly")
            .recommend("Add a phone number and email in the header/footer. Use clickable tel: and mailto: links.")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["contact", "trust"])
            .build(),
        );
        return;
    }

    let displays_phone = evidence.pages.iter().any(|p| !p.contact_info.phones.is_empty());
    let has_tel_link = evidence.pages.iter().any(|p| p.contact_info.has_tel_link);
    if displays_phone && !has_tel_link {
        findings.push(
            finding(
                "CONV-CONTACT-002",
                Category::Conversion,
                Severity::P2,
                "Phone number not clickable",
            )
            .summary("A phone number is displayed but not as a tel: link")
            .impact("Mobile users cannot tap to call. Friction reduces calls.")
            .recommend("Wrap phone numbers in <a href='tel:+1234567890'>")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["contact", "mobile"])
            .build(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::evidence::{ContactInfo, CtaElement, FormElement, MessagingLink, PageSnapshot};

    fn ctx() -> AuditContext {
        AuditContext::resolve(&EngineConfig::new(), &Evidence::default())
    }

    fn cta(above_fold: bool) -> CtaElement {
        CtaElement {
            text: "Get started".into(),
            is_visible: true,
            is_above_fold: above_fold,
            ..Default::default()
        }
    }

    fn site(pages: Vec<PageSnapshot>) -> Evidence {
        Evidence {
            url: "https://a.test".into(),
            pages,
            ..Default::default()
        }
    }

    fn ids(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn empty_homepage_is_conversion_blocker() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ..Default::default()
        }]);
        let findings = ConversionRules.evaluate(&evidence, &ctx());
        let cta: Vec<_> = findings.iter().filter(|f| f.id == "CONV-CTA-001").collect();
        assert_eq!(cta.len(), 1);
        assert_eq!(cta[0].severity, Severity::P0);
    }

    #[test]
    fn below_fold_ctas_flagged() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ctas: vec![cta(false), cta(false)],
            mobile_ctas: vec![cta(false)],
            ..Default::default()
        }]);
        let findings = ConversionRules.evaluate(&evidence, &ctx());
        assert!(ids(&findings).contains(&"CONV-FOLD-001"));
        assert!(!ids(&findings).contains(&"CONV-CTA-001"));
    }

    #[test]
    fn phone_without_messaging_is_heuristic_p2() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ctas: vec![cta(true)],
            mobile_ctas: vec![cta(true)],
            contact_info: ContactInfo {
                phones: vec!["+123456789".into()],
                has_tel_link: true,
                ..Default::default()
            },
            ..Default::default()
        }]);
        let findings = ConversionRules.evaluate(&evidence, &ctx());
        let msg: Vec<_> = findings.iter().filter(|f| f.id == "CONV-MSG-001").collect();
        assert_eq!(msg.len(), 1);
        assert_eq!(msg[0].confidence, 0.8);
    }

    #[test]
    fn hidden_messaging_beats_below_fold() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ctas: vec![cta(true)],
            mobile_ctas: vec![cta(true)],
            messaging_links: vec![MessagingLink {
                href: "https://wa.me/123".into(),
                is_visible: false,
                is_above_fold: false,
                ..Default::default()
            }],
            ..Default::default()
        }]);
        let findings = ConversionRules.evaluate(&evidence, &ctx());
        assert!(ids(&findings).contains(&"CONV-MSG-002"));
        assert!(!ids(&findings).contains(&"CONV-MSG-003"));
    }

    #[test]
    fn form_quality_checks() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/contact".into(),
            ctas: vec![cta(true)],
            forms: vec![FormElement {
                field_count: 9,
                has_email_field: false,
                has_phone_field: false,
                submit_button_text: "Submit".into(),
                ..Default::default()
            }],
            ..Default::default()
        }]);
        let findings = ConversionRules.evaluate(&evidence, &ctx());
        let found = ids(&findings);
        assert!(found.contains(&"CONV-FORM-002"));
        assert!(found.contains(&"CONV-FORM-003"));
        assert!(found.contains(&"CONV-FORM-004"));
        assert!(!found.contains(&"CONV-FORM-001"));
    }

    #[test]
    fn missing_mobile_ctas_is_p0() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ctas: vec![cta(true), cta(true)],
            mobile_ctas: vec![],
            ..Default::default()
        }]);
        let findings = ConversionRules.evaluate(&evidence, &ctx());
        let mob: Vec<_> = findings.iter().filter(|f| f.id == "CONV-MOB-001").collect();
        assert_eq!(mob.len(), 1);
        assert_eq!(mob[0].severity, Severity::P0);
    }

    #[test]
    fn displayed_phone_without_tel_link() {
        let evidence = site(vec![PageSnapshot {
            url: "https://a.test/".into(),
            ctas: vec![cta(true)],
            mobile_ctas: vec![cta(true)],
            messaging_links: vec![MessagingLink {
                href: "https://wa.me/123".into(),
                is_visible: true,
                is_above_fold: true,
                ..Default::default()
            }],
            contact_info: ContactInfo {
                phones: vec!["+123456789".into()],
                has_tel_link: false,
                ..Default::default()
            },
            ..Default::default()
        }]);
        let findings = ConversionRules.evaluate(&evidence, &ctx());
        assert!(ids(&findings).contains(&"CONV-CONTACT-002"));
    }
}
