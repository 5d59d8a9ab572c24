//! Usability checks: navigation, mobile menu, console errors, structure

use crate::evidence::Evidence;
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{finding, AuditContext, RuleModule};

pub struct UxRules;

impl RuleModule for UxRules {
    fn name(&self) -> &'static str {
        "ux"
    }

    fn description(&self) -> &'static str {
        "Navigation, mobile usability, and script health"
    }

    fn category(&self) -> Category {
        Category::Ux
    }

    fn evaluate(&self, evidence: &Evidence, _ctx: &AuditContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        check_mobile_navigation(evidence, &mut findings);
        check_hamburger_menu(evidence, &mut findings);
        check_navigation_depth(evidence, &mut findings);
        check_link_text(evidence, &mut findings);
        check_console_errors(evidence, &mut findings);
        check_page_structure(evidence, &mut findings);
        check_form_friction(evidence, &mut findings);
        findings
    }
}

fn check_mobile_navigation(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let Some(homepage) = evidence.homepage() else {
        return;
    };
    let Some(nav) = &homepage.navigation else {
        return;
    };

    if !nav.has_hamburger && nav.links.len() > 5 {
        findings.push(
            finding("UX-NAV-001", Category::Ux, Severity::P2, "No mobile menu detected")
                .summary("Site has many navigation links but no hamburger/mobile menu detected")
                .impact("Mobile users may have difficulty navigating if the menu doesn't collapse properly")
                .recommend("Implement a hamburger menu for mobile with a clear toggle button")
                .effort(Effort::M)
                .evidence(EvidenceRef::page(&homepage.url))
                .tags(&["mobile", "navigation"])
                .confidence(0.7)
                .build(),
        );
    }
}

fn check_hamburger_menu(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let Some(homepage) = evidence.homepage() else {
        return;
    };
    let menu_works = homepage
        .navigation
        .as_ref()
        .and_then(|n| n.hamburger_menu_works);

    if menu_works == Some(false) {
        findings.push(
            finding("UX-MENU-001", Category::Ux, Severity::P1, "Hamburger menu not working")
                .summary("Mobile menu button detected but navigation doesn't appear when clicked")
                .impact("Mobile users cannot access navigation, which severely limits site usability on mobile")
                .recommend("Debug the hamburger menu JavaScript. Ensure the nav becomes visible on click.")
                .effort(Effort::M)
                .evidence(EvidenceRef::page(&homepage.url))
                .tags(&["mobile", "navigation", "broken"])
                .build(),
        );
    }
}

fn check_navigation_depth(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let Some(nav) = &page.navigation else {
            continue;
        };

        if nav.links.is_empty() {
            findings.push(
                finding(
                    "UX-NAV-002",
                    Category::Ux,
                    Severity::P1,
                    format!("No navigation detected on {}", page.name()),
                )
                .summary("Page appears to have no navigation menu")
                .impact("Users have no way to navigate to other pages")
                .recommend("Add clear navigation with links to key sections")
                .effort(Effort::M)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["navigation"])
                .build(),
            );
        } else if nav.links.len() < 3 {
            findings.push(
                finding(
                    "UX-NAV-003",
                    Category::Ux,
                    Severity::P2,
                    format!("Very limited navigation ({} links)", nav.links.len()),
                )
                .summary(format!("Navigation only has {} links", nav.links.len()))
                .impact("Users may not find important sections of the site")
                .recommend("Expand navigation to include all key sections: About, Services, Contact, etc.")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["navigation"])
                .build(),
            );
        }
    }
}

const GENERIC_LINK_TEXTS: [&str; 6] =
    ["click here", "read more", "learn more", "here", "more", "link"];

fn check_link_text(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let Some(nav) = &page.navigation else {
            continue;
        };

        let mut generic: Vec<String> = nav
            .links
            .iter()
            .map(|link| link.text.trim().to_lowercase())
            .filter(|text| GENERIC_LINK_TEXTS.contains(&text.as_str()))
            .collect();
        if generic.is_empty() {
            continue;
        }
        let count = generic.len();
        generic.sort_unstable();
        generic.dedup();

        findings.push(
            finding(
                "UX-NAV-004",
                Category::Ux,
                Severity::P3,
                format!("Generic link text detected ({count} instance(s))"),
            )
            .summary(format!(
                "Navigation contains non-descriptive link text: {}",
                generic.join(", ")
            ))
            .impact("Screen reader users hear 'click here' without any context about the destination")
            .recommend("Use descriptive link text that explains the destination, e.g. 'View our services' instead of 'Click here'")
            .effort(Effort::S)
            .evidence(
                EvidenceRef::page(&page.url).with_note(format!(
                    "Generic links: {}",
                    generic.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
                )),
            )
            .tags(&["accessibility", "links"])
            .build(),
        );
    }
}

fn check_console_errors(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let total_errors: usize = evidence.pages.iter().map(|p| p.console_errors.len()).sum();
    if total_errors == 0 {
        return;
    }

    let pages_with_errors: Vec<&str> = evidence
        .pages
        .iter()
        .filter(|p| !p.console_errors.is_empty())
        .map(|p| p.url.as_str())
        .collect();

    let severity = if total_errors > 5 { Severity::P1 } else { Severity::P2 };

    let mut samples: Vec<&str> = Vec::new();
    for page in &evidence.pages {
        samples.extend(page.console_errors.iter().take(2).map(String::as_str));
        if samples.len() >= 3 {
            break;
        }
    }
    let note: String = samples
        .iter()
        .take(2)
        .copied()
        .collect::<Vec<_>>()
        .join("; ")
        .chars()
        .take(200)
        .collect();

    findings.push(
        finding(
            "UX-JS-001",
            Category::Ux,
            severity,
            format!("JavaScript errors detected ({total_errors} total)"),
        )
        .summary(format!(
            "Found {total_errors} console errors across {} pages",
            pages_with_errors.len()
        ))
        .impact("JavaScript errors can break functionality and create a poor user experience")
        .recommend("Review and fix console errors. Check browser DevTools for details.")
        .effort(Effort::M)
        .evidence(
            EvidenceRef::page(pages_with_errors.first().copied().unwrap_or(&evidence.url))
                .with_note(format!("Errors: {note}")),
        )
        .tags(&["javascript", "errors"])
        .build(),
    );
}

fn check_page_structure(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let Some(homepage) = evidence.homepage() else {
        return;
    };

    let no_headings =
        homepage.headings_at("h1").is_empty() && homepage.headings_at("h2").is_empty();
    if no_headings && homepage.ctas.is_empty() {
        findings.push(
            finding(
                "UX-STRUCT-001",
                Category::Ux,
                Severity::P1,
                "Homepage appears to lack content structure",
            )
            .summary("No headings or CTAs detected on the homepage")
            .impact("Users may not understand what the site offers or what action to take")
            .recommend("Add a clear heading hierarchy and prominent calls to action")
            .effort(Effort::M)
            .evidence(EvidenceRef::page(&homepage.url))
            .tags(&["structure", "content"])
            .build(),
        );
    }
}

fn check_form_friction(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        for form in &page.forms {
            if form.required_count > 5 {
                findings.push(
                    finding(
                        "UX-FORM-001",
                        Category::Ux,
                        Severity::P2,
                        format!("Form has many required fields ({})", form.required_count),
                    )
                    .summary(format!("Form requires {} fields to be filled", form.required_count))
                    .impact("High-friction forms reduce completion rates")
                    .recommend("Reduce required fields to a minimum. Collect more info later.")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&page.url))
                    .tags(&["form", "friction"])
                    .build(),
                );
            }
        }
    }
}
