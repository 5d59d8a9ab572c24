//! Technical SEO and content-structure checks

use crate::evidence::Evidence;
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{finding, AuditContext, RuleModule};

pub struct SeoRules;

impl RuleModule for SeoRules {
    fn name(&self) -> &'static str {
        "seo"
    }

    fn description(&self) -> &'static str {
        "Technical SEO and content structure"
    }

    fn category(&self) -> Category {
        Category::Seo
    }

    fn evaluate(&self, evidence: &Evidence, _ctx: &AuditContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        check_h1_headings(evidence, &mut findings);
        check_title_tags(evidence, &mut findings);
        check_meta_descriptions(evidence, &mut findings);
        check_heading_hierarchy(evidence, &mut findings);
        check_sitemap(evidence, &mut findings);
        check_robots_txt(evidence, &mut findings);
        check_canonical(evidence, &mut findings);
        check_internal_linking(evidence, &mut findings);
        check_viewport_meta(evidence, &mut findings);
        findings
    }
}

fn check_h1_headings(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let h1s = page.headings_at("h1");

        if h1s.is_empty() {
            findings.push(
                finding(
                    "SEO-H1-001",
                    Category::Seo,
                    Severity::P1,
                    format!("Missing H1 heading on {}", page.name()),
                )
                .summary("Page has no H1 heading element")
                .impact("H1 tells search engines the main topic of the page. A missing H1 weakens page relevance signals.")
                .recommend("Add a single, descriptive H1 that includes the primary keyword and describes page content")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["headings", "on-page"])
                .build(),
            );
        } else if h1s.len() > 1 {
            findings.push(
                finding(
                    "SEO-H1-002",
                    Category::Seo,
                    Severity::P2,
                    format!("Multiple H1s detected ({}) on {}", h1s.len(), page.name()),
                )
                .summary(format!("Page has {} H1 headings instead of one", h1s.len()))
                .impact("Multiple H1s dilute topical focus and confuse search engines about page hierarchy")
                .recommend("Keep a single H1 for the main topic. Convert others to H2 or H3 as appropriate.")
                .effort(Effort::S)
                .evidence(
                    EvidenceRef::page(&page.url)
                        .with_note(format!("H1s found: {}", h1s.iter().take(3).cloned().collect::<Vec<_>>().join(", "))),
                )
                .tags(&["headings", "structure"])
                .build(),
            );
        }

        // An H1 element that exists but holds no text is worse than a
        // short one and easy to miss in the browser. Report once per page.
        if h1s.iter().any(|h| h.trim().is_empty()) {
            findings.push(
                finding(
                    "SEO-H1-003",
                    Category::Seo,
                    Severity::P1,
                    format!("Empty H1 heading on {}", page.name()),
                )
                .summary("An H1 element exists but contains no text content")
                .impact("Search engines and screen readers expect meaningful H1 content")
                .recommend("Add descriptive text to the H1 element")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url).with_note("Empty H1 element detected"))
                .tags(&["headings", "on-page"])
                .build(),
            );
        }
    }
}

fn check_title_tags(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let title = page.title.trim();

        if title.is_empty() {
            findings.push(
                finding(
                    "SEO-TITLE-001",
                    Category::Seo,
                    Severity::P0,
                    format!("Missing page title on {}", page.name()),
                )
                .summary("Page has no title tag")
                .impact("The title is the most important on-page SEO element. A missing title severely hurts rankings and click-through rate.")
                .recommend("Add a descriptive title tag (50-60 characters) with the primary keyword")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["title", "critical"])
                .build(),
            );
        } else if title.chars().count() < 30 {
            findings.push(
                finding(
                    "SEO-TITLE-002",
                    Category::Seo,
                    Severity::P2,
                    format!("Title too short ({} chars) on {}", title.chars().count(), page.name()),
                )
                .summary(format!(
                    "Page title is only {} characters: '{}'",
                    title.chars().count(),
                    truncate(title, 50)
                ))
                .impact("Short titles miss the opportunity to include keywords and attract clicks")
                .recommend("Expand the title to 50-60 characters with relevant keywords")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url).with_note(format!("Title: {title}")))
                .tags(&["title"])
                .build(),
            );
        } else if title.chars().count() > 70 {
            findings.push(
                finding(
                    "SEO-TITLE-003",
                    Category::Seo,
                    Severity::P3,
                    format!("Title may be truncated ({} chars)", title.chars().count()),
                )
                .summary(format!(
                    "Page title is {} characters (may truncate in search results)",
                    title.chars().count()
                ))
                .impact("Titles over 60-70 characters get cut off in search results")
                .recommend("Trim the title to 60 characters or ensure important keywords are at the start")
                .effort(Effort::S)
                .evidence(
                    EvidenceRef::page(&page.url).with_note(format!("Title: {}...", truncate(title, 70))),
                )
                .tags(&["title"])
                .build(),
            );
        }
    }
}

fn check_meta_descriptions(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let description = page.meta_tags.get("description").map(String::as_str).unwrap_or("");

        if description.is_empty() {
            findings.push(
                finding(
                    "SEO-DESC-001",
                    Category::Seo,
                    Severity::P2,
                    format!("Missing meta description on {}", page.name()),
                )
                .summary("Page has no meta description")
                .impact("The meta description affects click-through rate from search results. Google may generate one, but it may not be optimal.")
                .recommend("Add a compelling meta description (120-160 chars) with a call to action")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["meta", "description"])
                .build(),
            );
        } else if description.chars().count() < 70 {
            findings.push(
                finding(
                    "SEO-DESC-002",
                    Category::Seo,
                    Severity::P3,
                    format!("Meta description too short ({} chars)", description.chars().count()),
                )
                .summary(format!("Description is only {} characters", description.chars().count()))
                .impact("Short descriptions don't fully use the search-result real estate")
                .recommend("Expand to 120-160 characters with compelling copy")
                .effort(Effort::S)
                .evidence(
                    EvidenceRef::page(&page.url).with_note(format!("Description: {description}")),
                )
                .tags(&["meta", "description"])
                .build(),
            );
        } else if description.chars().count() > 160 {
            findings.push(
                finding(
                    "SEO-DESC-003",
                    Category::Seo,
                    Severity::P3,
                    format!("Meta description may be truncated ({} chars)", description.chars().count()),
                )
                .summary(format!("Description is {} characters", description.chars().count()))
                .impact("Descriptions over 160 characters may be truncated in search results")
                .recommend("Trim to 160 characters or front-load key information")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["meta", "description"])
                .build(),
            );
        }
    }
}

fn check_heading_hierarchy(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let h1s = page.headings_at("h1");
        let h2s = page.headings_at("h2");
        let h3s = page.headings_at("h3");

        if !h3s.is_empty() && h2s.is_empty() {
            findings.push(
                finding(
                    "SEO-HIER-001",
                    Category::Seo,
                    Severity::P3,
                    format!("Heading hierarchy issue on {}", page.name()),
                )
                .summary("H3 headings found without H2 headings")
                .impact("Improper heading hierarchy can confuse both users and search engines")
                .recommend("Ensure a logical heading flow: H1, then H2, then H3")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["headings", "structure"])
                .build(),
            );
        }

        if !h1s.is_empty() && h2s.is_empty() && h3s.is_empty() {
            findings.push(
                finding(
                    "SEO-HIER-002",
                    Category::Seo,
                    Severity::P3,
                    format!("No subheadings on {}", page.name()),
                )
                .summary("Page has an H1 but no H2 or H3 headings")
                .impact("Subheadings help structure content for both users and search engines")
                .recommend("Add H2 subheadings to break up content and include secondary keywords")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["headings", "structure"])
                .confidence(0.7)
                .build(),
            );
        }
    }
}

fn check_sitemap(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let Some(probe) = &evidence.http_probe else {
        return;
    };
    if !probe.sitemap_exists {
        findings.push(
            finding("SEO-SITEMAP-001", Category::Seo, Severity::P2, "No sitemap.xml found")
                .summary("sitemap.xml not accessible at the standard location")
                .impact("A sitemap helps search engines discover and index pages. A missing sitemap may slow indexing.")
                .recommend("Create and submit an XML sitemap. Reference it in robots.txt. Submit to Google Search Console.")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&evidence.url))
                .tags(&["indexing", "crawling"])
                .build(),
        );
    }
}

/// `Disallow: /` only counts as blocking everything when it sits under a
/// `User-agent: *` section with no Allow rules.
fn robots_blocks_all(robots: &str) -> bool {
    if robots.contains("Allow:") {
        return false;
    }
    let lines: Vec<&str> = robots.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.trim() == "Disallow: /" {
            for prev in lines[..i].iter().rev() {
                let prev = prev.trim().to_lowercase();
                if prev.starts_with("user-agent:") {
                    return prev.contains('*');
                }
            }
            return false;
        }
    }
    false
}

fn check_robots_txt(evidence: &Evidence, findings: &mut Vec<Finding>) {
    let Some(probe) = &evidence.http_probe else {
        return;
    };

    match probe.robots_txt.as_deref() {
        None | Some("") => {
            findings.push(
                finding("SEO-ROBOTS-001", Category::Seo, Severity::P3, "No robots.txt found")
                    .summary("robots.txt not accessible")
                    .impact("Without robots.txt, search engines use defaults and may crawl unnecessary pages.")
                    .recommend("Create robots.txt with a sitemap reference and any necessary disallow rules")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&evidence.url))
                    .tags(&["crawling"])
                    .build(),
            );
        }
        Some(robots) if robots_blocks_all(robots) => {
            findings.push(
                finding(
                    "SEO-ROBOTS-002",
                    Category::Seo,
                    Severity::P0,
                    "robots.txt may be blocking all crawlers",
                )
                .summary("Detected 'Disallow: /' for all user agents")
                .impact("This may prevent search engines from indexing the entire site!")
                .recommend("Review robots.txt immediately. Ensure important pages are crawlable.")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&evidence.url).with_note("robots.txt blocks crawling"))
                .tags(&["critical", "indexing"])
                .build(),
            );
        }
        Some(_) => {}
    }
}

fn check_canonical(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        // No canonical on the homepage is often fine.
        if page.name() == "homepage" {
            continue;
        }

        let canonical = page.meta_tags.get("canonical").map(String::as_str).unwrap_or("");
        if canonical.is_empty() {
            findings.push(
                finding(
                    "SEO-CANON-001",
                    Category::Seo,
                    Severity::P3,
                    format!("No canonical tag on {}", page.name()),
                )
                .summary("Page lacks a canonical URL specification")
                .impact("May cause duplicate-content issues if the page is accessible via multiple URLs")
                .recommend("Add <link rel='canonical'> pointing to the preferred URL version")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["canonical", "duplicate"])
                .confidence(0.6)
                .build(),
            );
        }
    }
}

fn check_internal_linking(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let Some(nav) = &page.navigation else {
            continue;
        };
        if nav.links.len() < 3 {
            findings.push(
                finding(
                    "SEO-LINK-001",
                    Category::Seo,
                    Severity::P2,
                    format!("Limited navigation on {}", page.name()),
                )
                .summary(format!("Only {} navigation links found", nav.links.len()))
                .impact("Weak internal linking hurts both user navigation and SEO link-equity distribution")
                .recommend("Ensure comprehensive navigation with links to key sections")
                .effort(Effort::M)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["navigation", "internal-links"])
                .build(),
            );
        }
    }
}

fn check_viewport_meta(evidence: &Evidence, findings: &mut Vec<Finding>) {
    for page in &evidence.pages {
        let viewport = page.meta_tags.get("viewport").map(String::as_str).unwrap_or("");
        if viewport.is_empty() {
            findings.push(
                finding(
                    "SEO-MOBILE-001",
                    Category::Seo,
                    Severity::P1,
                    format!("Missing viewport meta tag on {}", page.name()),
                )
                .summary("Page lacks a viewport meta tag")
                .impact("Without a viewport tag, mobile browsers may render the page at desktop width. Hurts mobile SEO.")
                .recommend("Add <meta name='viewport' content='width=device-width, initial-scale=1'>")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&page.url))
                .tags(&["mobile", "viewport"])
                .build(),
            );
            // Only report once per site.
            break;
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
