//! Markup hygiene checks that signal maintainability problems

use crate::evidence::Evidence;
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{finding, AuditContext, RuleModule};

pub struct MaintenanceRules;

impl RuleModule for MaintenanceRules {
    fn name(&self) -> &'static str {
        "maintenance"
    }

    fn description(&self) -> &'static str {
        "Markup hygiene and metadata completeness"
    }

    fn category(&self) -> Category {
        Category::Maintenance
    }

    fn evaluate(&self, evidence: &Evidence, _ctx: &AuditContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        for page in &evidence.pages {
            check_heading_presence(page, &mut findings);
            check_charset(page, &mut findings);
            check_og_tags(page, &mut findings);
        }
        findings
    }
}

fn check_heading_presence(page: &crate::evidence::PageSnapshot, findings: &mut Vec<Finding>) {
    let has_any = page.headings.values().any(|hs| !hs.is_empty());
    if !has_any {
        findings.push(
            finding(
                "MAINT-HEAD-001",
                Category::Maintenance,
                Severity::P2,
                format!("No headings at all on {}", page.name()),
            )
            .summary("Page markup contains no heading elements of any level")
            .impact("Content without a heading outline is hard to maintain, navigate, and style consistently")
            .recommend("Structure the page with semantic headings (H1 for the topic, H2/H3 for sections)")
            .effort(Effort::M)
            .evidence(EvidenceRef::page(&page.url).with_note("No heading elements found"))
            .tags(&["markup", "structure"])
            .build(),
        );
    }
}

fn check_charset(page: &crate::evidence::PageSnapshot, findings: &mut Vec<Finding>) {
    if !page.meta_tags.contains_key("charset") && !page.meta_tags.contains_key("content-type") {
        findings.push(
            finding(
                "MAINT-META-001",
                Category::Maintenance,
                Severity::P3,
                "Character encoding not specified",
            )
            .summary(format!("{} doesn't declare character encoding explicitly", page.name()))
            .impact("May cause character rendering issues in some browsers")
            .recommend("Add <meta charset='UTF-8'> in the <head> section")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&page.url).with_note("No charset meta tag found"))
            .tags(&["encoding", "meta"])
            .build(),
        );
    }
}

fn check_og_tags(page: &crate::evidence::PageSnapshot, findings: &mut Vec<Finding>) {
    let has_og = page.meta_tags.keys().any(|k| k.starts_with("og:"));
    if !has_og {
        findings.push(
            finding(
                "MAINT-META-002",
                Category::Maintenance,
                Severity::P3,
                format!("No Open Graph tags on {}", page.name()),
            )
            .summary("Page has no og: meta tags for link previews")
            .impact("Links shared on social/chat apps render without a preview card, which lowers click-through")
            .recommend("Add og:title, og:description, and og:image meta tags")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&page.url))
            .tags(&["meta", "social"])
            .confidence(0.7)
            .build(),
        );
    }
}
