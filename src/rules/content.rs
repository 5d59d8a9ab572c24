//! Content quality checks: placeholder titles, duplicated headings,
//! generic CTA copy

use crate::evidence::Evidence;
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{finding, AuditContext, RuleModule};
use std::collections::BTreeMap;

const PLACEHOLDER_TITLES: [&str; 7] =
    ["home", "homepage", "welcome", "untitled", "page", "website", "site"];

const WEAK_CTA_WORDS: [&str; 6] = ["submit", "click", "click here", "here", "go", "send"];

const STRONG_CTA_WORDS: [&str; 19] = [
    "get", "start", "book", "contact", "request", "download", "try", "buy", "order", "schedule",
    "call", "learn", "discover", "explore", "see", "view", "join", "sign up", "subscribe",
];

pub struct ContentRules;

impl RuleModule for ContentRules {
    fn name(&self) -> &'static str {
        "content"
    }

    fn description(&self) -> &'static str {
        "Copy quality across titles, headings, and CTAs"
    }

    fn category(&self) -> Category {
        Category::Content
    }

    fn evaluate(&self, evidence: &Evidence, _ctx: &AuditContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        check_placeholder_titles(evidence, &mut findings);
        check_duplicated_h1s(evidence, &mut findings);
        check_h1_copy(evidence, &mut findings);
        check_generic_cta_copy(evidence, &mut findings);
        findings
    }
}

fn is_placeholder_title(title: &str) -> bool {
    let lower = title.trim().to_lowercase();
    PLACEHOLDER_TITLES
        .iter()
        .any(|p| lower == *p || lower == format!("{p} page"))
}

fn check_placeholder_titles(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        if !page.title.is_empty() && is_placeholder_title(&page.title) {
            findings.push(
                finding(
                    "CONTENT-TITLE-001",
                    Category::Content,
                    Severity::P2,
                    format!("Placeholder page title on {}", page.name()),
                )
                .summary(format!("Title '{}' is not descriptive or unique", page.title))
                .impact("Generic titles don't differentiate the page in search results")
                .recommend("Use a specific, keyword-rich title that describes the page content")
                .effort(Effort::S)
                .evidence(
                    EvidenceRef::page(&page.url).with_note(format!("Generic title: '{}'", page.title)),
                )
                .tags(&["title", "copy"])
                .build(),
            );
        }
    }
}

fn check_duplicated_h1s(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let mut seen: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for page in &evidence.pages {
        for h1 in page.headings_at("h1") {
            let key = h1.trim().to_lowercase();
            if !key.is_empty() {
                seen.entry(key).or_default().push(page.url.as_str());
            }
        }
    }

    for (h1, urls) in seen {
        // Same H1 on multiple distinct pages.
        let mut distinct = urls.clone();
        distinct.dedup();
        if distinct.len() > 1 {
            let mut f = finding(
                "CONTENT-H1-001",
                Category::Content,
                Severity::P3,
                "Identical H1 used on multiple pages",
            )
            .summary(format!("The heading '{h1}' appears on {} pages", distinct.len()))
            .impact("Duplicated primary headings blur what each page is about, for users and search engines alike")
            .recommend("Give each page a unique H1 describing its specific content")
            .effort(Effort::S)
            .tags(&["headings", "duplicate"])
            .confidence(0.7);
            for url in distinct.iter().take(3) {
                f = f.evidence(EvidenceRef::page(*url));
            }
            findings.push(f.build());
        }
    }
}

/// H1 copy quality: too brief, too long, or a straight copy of the
/// title tag. Blank H1s are a structural problem handled elsewhere.
fn check_h1_copy(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        for h1 in page.headings_at("h1") {
            let h1 = h1.trim();
            if h1.is_empty() {
                continue;
            }
            let len = h1.chars().count();

            if len < 10 {
                findings.push(
                    finding(
                        "CONTENT-H1-002",
                        Category::Content,
                        Severity::P3,
                        format!("H1 heading too brief: '{h1}'"),
                    )
                    .summary("Primary heading doesn't fully communicate the page topic")
                    .impact("Weak topical signal for SEO and doesn't grab user attention")
                    .recommend("Expand the H1 to clearly and compellingly describe page content (20-70 chars)")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&page.url).with_note(format!("H1 is {len} characters")))
                    .tags(&["headings", "copy"])
                    .build(),
                );
            } else if len > 100 {
                findings.push(
                    finding(
                        "CONTENT-H1-003",
                        Category::Content,
                        Severity::P3,
                        "H1 heading too long",
                    )
                    .summary(format!("H1 is {len} characters: '{}...'", truncate(h1, 50)))
                    .impact("Long headings reduce scannability and visual impact")
                    .recommend("Keep the H1 concise (under 70 characters) for better readability")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&page.url).with_note(format!("H1 is {len} characters")))
                    .tags(&["headings", "copy"])
                    .build(),
                );
            }

            if !page.title.trim().is_empty()
                && h1.to_lowercase() == page.title.trim().to_lowercase()
            {
                findings.push(
                    finding(
                        "CONTENT-H1-004",
                        Category::Content,
                        Severity::P3,
                        "H1 identical to page title",
                    )
                    .summary(format!("Both the title tag and H1 read '{}'", truncate(h1, 40)))
                    .impact("Missed opportunity to target additional keyword variations")
                    .recommend("Vary the H1 slightly from the title to cover more keyword variations")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&page.url).with_note("H1 exactly matches title tag"))
                    .tags(&["headings", "copy"])
                    .build(),
                );
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn check_generic_cta_copy(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let mut weak: Vec<&str> = Vec::new();
        for cta in page.ctas.iter().chain(&page.mobile_ctas) {
            let text = cta.text.trim().to_lowercase();
            if text.is_empty() {
                continue;
            }
            let is_weak = WEAK_CTA_WORDS.iter().any(|w| text.contains(w));
            let is_strong = STRONG_CTA_WORDS.iter().any(|s| text.contains(s));
            if is_weak && !is_strong {
                weak.push(&cta.text);
            }
        }
        weak.sort_unstable();
        weak.dedup();

        if !weak.is_empty() {
            findings.push(
                finding(
                    "CONTENT-CTA-001",
                    Category::Content,
                    Severity::P3,
                    format!("Generic CTA copy detected ({} instance(s))", weak.len()),
                )
                .summary(format!(
                    "CTAs use generic language: {}",
                    weak.iter().take(3).copied().collect::<Vec<_>>().join(", ")
                ))
                .impact("Weak CTAs have lower click-through rates and conversion")
                .recommend("Use action-oriented, benefit-focused text like 'Get Started', 'Book Now', 'Download Free Guide'")
                .effort(Effort::S)
                .evidence(
                    EvidenceRef::page(&page.url).with_note(format!(
                        "Weak CTAs: {}",
                        weak.iter().take(5).copied().collect::<Vec<_>>().join(", ")
                    )),
                )
                .tags(&["cta", "copywriting"])
                .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::evidence::{CtaElement, PageSnapshot};

    fn ctx() -> AuditContext {
        AuditContext::resolve(&EngineConfig::new(), &Evidence::default())
    }

    fn page_with_h1(url: &str, h1: &str) -> PageSnapshot {
        PageSnapshot {
            url: url.into(),
            headings: BTreeMap::from([("h1".to_string(), vec![h1.to_string()])]),
            ..Default::default()
        }
    }

    #[test]
    fn placeholder_titles_flagged() {
        assert!(is_placeholder_title("Home"));
        assert!(is_placeholder_title("Untitled"));
        assert!(is_placeholder_title("Welcome page"));
        assert!(!is_placeholder_title("Acme Plumbing | 24h Service"));
    }

    #[test]
    fn duplicated_h1_across_pages() {
        let evidence = Evidence {
            pages: vec![
                page_with_h1("https://a.test/", "Our Services"),
                page_with_h1("https://a.test/about", "Our Services"),
                page_with_h1("https://a.test/contact", "Contact Us"),
            ],
            ..Default::default()
        };
        let findings = ContentRules.evaluate(&evidence, &ctx());
        let dup: Vec<_> = findings.iter().filter(|f| f.id == "CONTENT-H1-001").collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(dup[0].confidence, 0.7);
        assert_eq!(dup[0].evidence.len(), 2);
    }

    #[test]
    fn h1_length_bands_are_exclusive() {
        let long = "x".repeat(110);
        for (h1, expected) in [
            ("Plumbing", Some("CONTENT-H1-002")),
            ("Emergency Plumbing in Springfield", None),
            (long.as_str(), Some("CONTENT-H1-003")),
        ] {
            let evidence = Evidence {
                pages: vec![page_with_h1("https://a.test/", h1)],
                ..Default::default()
            };
            let findings = ContentRules.evaluate(&evidence, &ctx());
            let h1_findings: Vec<_> = findings
                .iter()
                .filter(|f| f.id == "CONTENT-H1-002" || f.id == "CONTENT-H1-003")
                .map(|f| f.id.as_str())
                .collect();
            match expected {
                Some(id) => assert_eq!(h1_findings, vec![id], "h1: {h1:?}"),
                None => assert!(h1_findings.is_empty(), "h1: {h1:?}"),
            }
        }
    }

    #[test]
    fn blank_h1_is_not_a_copy_problem() {
        let evidence = Evidence {
            pages: vec![page_with_h1("https://a.test/", "  ")],
            ..Default::default()
        };
        let findings = ContentRules.evaluate(&evidence, &ctx());
        assert!(!findings.iter().any(|f| f.id.starts_with("CONTENT-H1-00")));
    }

    #[test]
    fn h1_matching_title_flagged_case_insensitively() {
        let mut p = page_with_h1("https://a.test/", "Emergency Plumbing in Springfield");
        p.title = "emergency plumbing in springfield".into();
        let evidence = Evidence {
            pages: vec![p],
            ..Default::default()
        };
        let findings = ContentRules.evaluate(&evidence, &ctx());
        let dup: Vec<_> = findings.iter().filter(|f| f.id == "CONTENT-H1-004").collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(dup[0].severity, Severity::P3);
    }

    #[test]
    fn weak_cta_needs_no_strong_word() {
        let mk = |text: &str| CtaElement {
            text: text.into(),
            ..Default::default()
        };
        let evidence = Evidence {
            pages: vec![PageSnapshot {
                url: "https://a.test/".into(),
                // "Send request" contains a strong word, so only "Click here"
                // and "Submit" count as weak.
                ctas: vec![mk("Click here"), mk("Submit"), mk("Send request")],
                ..Default::default()
            }],
            ..Default::default()
        };
        let findings = ContentRules.evaluate(&evidence, &ctx());
        let cta: Vec<_> = findings.iter().filter(|f| f.id == "CONTENT-CTA-001").collect();
        assert_eq!(cta.len(), 1);
        assert!(cta[0].summary.contains("Click here"));
        assert!(!cta[0].summary.contains("Send request"));
    }
}
