//! Per-feature detection predicates
//!
//! A detector inspects the evidence model for one named feature and
//! reports either a structured `Detection` (with the placement and
//! interactivity facts the verification pipeline judges), `NotFound`, or
//! `Unsupported` when no real predicate exists for the feature yet.
//! Unsupported features are treated as an evidence gap and skipped -
//! a detector never fabricates a positive result.

use crate::evidence::{CtaElement, Evidence, PageSnapshot};
use regex::Regex;
use std::sync::OnceLock;

static MESSAGING_RE: OnceLock<Regex> = OnceLock::new();
static PRICE_RE: OnceLock<Regex> = OnceLock::new();

fn messaging_re() -> &'static Regex {
    MESSAGING_RE.get_or_init(|| {
        Regex::new(r"(?i)(wa\.me/\d+|api\.whatsapp\.com/send|t\.me/\w+|m\.me/\w+|tg://)").unwrap()
    })
}

fn price_re() -> &'static Regex {
    PRICE_RE.get_or_init(|| Regex::new(r"[$€£¥]\s?\d|(?i)\bprice\b|\bfrom\s+\d").unwrap())
}

/// What the collector observed about an interaction with the detected
/// element, if one was attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvidence {
    /// Interaction is stateful or destructive (form submit, payment);
    /// only presence and structure are ever checked.
    NotApplicable,
    /// Safe interaction allowed but no outcome was recorded.
    Untested,
    /// Safe interaction outcome.
    Tested {
        succeeded: bool,
        console_errors: Vec<String>,
    },
}

/// A detected feature instance with the facts the pipeline stages judge.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Page name the feature was found on ("homepage", "contact", ...).
    pub location: String,
    pub url: String,
    pub selector: Option<String>,
    pub visible: bool,
    pub above_fold: bool,
    /// Present in the mobile viewport. True when the collector gathered
    /// no mobile evidence (gap passes, it never fails a stage).
    pub mobile_visible: bool,
    pub enabled: bool,
    pub occluded: bool,
    pub interaction: InteractionEvidence,
}

impl Detection {
    /// A detection with no placement concerns, for features whose
    /// evidence carries no positioning data (forms, contact details,
    /// content density). Gaps pass: absent placement evidence never
    /// fails a stage.
    fn presence_only(page: &PageSnapshot, interaction: InteractionEvidence) -> Self {
        Self {
            location: page.name(),
            url: page.url.clone(),
            selector: None,
            visible: true,
            above_fold: true,
            mobile_visible: true,
            enabled: true,
            occluded: false,
            interaction,
        }
    }

    fn from_cta(page: &PageSnapshot, cta: &CtaElement, interaction: InteractionEvidence) -> Self {
        Self {
            location: page.name(),
            url: page.url.clone(),
            selector: cta.selector.clone(),
            visible: cta.is_visible,
            above_fold: cta.is_above_fold,
            mobile_visible: true,
            enabled: !cta.is_disabled,
            occluded: cta.is_occluded,
            interaction,
        }
    }
}

/// Result of running a feature detector.
#[derive(Debug, Clone)]
pub enum DetectorOutcome {
    Detected(Detection),
    NotFound,
    /// No real predicate implemented for this feature. The check is
    /// skipped entirely.
    Unsupported,
}

/// Run the detector for a named feature against the evidence model.
pub fn detect_feature(feature: &str, evidence: &Evidence) -> DetectorOutcome {
    match feature {
        "inquiry_form" | "contact_form" => detect_form(evidence),
        "messaging_cta" => detect_messaging(evidence),
        "property_listings" | "product_catalog" | "room_listings" => detect_listings(evidence),
        "price_display" => detect_prices(evidence),
        "contact_info" => detect_contact_info(evidence),
        "testimonials" => detect_heading(evidence, &["testimonial", "review", "client"]),
        "faq" => detect_nav_or_heading(evidence, &["faq"]),

        // Stateful CTAs: presence and placement only, never interacted with.
        "add_to_cart" => detect_cta(evidence, &["cart", "add to", "buy"], InteractionEvidence::NotApplicable),
        "checkout" => detect_cta(evidence, &["checkout", "purchase", "pay"], InteractionEvidence::NotApplicable),
        "booking_form" | "reservation" => detect_cta(evidence, &["book", "reserve", "schedule"], InteractionEvidence::NotApplicable),
        "appointment_booking" => detect_cta(evidence, &["appointment", "book", "schedule"], InteractionEvidence::NotApplicable),
        "signup_form" => detect_cta(evidence, &["sign up", "register", "get started"], InteractionEvidence::NotApplicable),
        "online_ordering" => detect_cta(evidence, &["order", "delivery"], InteractionEvidence::NotApplicable),

        // Safe CTAs (navigation-style): untested unless the collector
        // recorded an outcome.
        "virtual_tour" => detect_cta(evidence, &["tour", "virtual"], InteractionEvidence::Untested),
        "demo_request" => detect_cta(evidence, &["demo"], InteractionEvidence::Untested),
        "cta_button" => detect_any_cta(evidence),

        // Navigation links are on the safe allow-list; a present,
        // non-placeholder href counts as a successful interaction.
        "menu" => detect_nav_link(evidence, &["menu"]),
        "pricing_page" => detect_nav_link(evidence, &["pricing"]),
        "services_list" => detect_nav_link(evidence, &["service"]),
        "portfolio" => detect_nav_link(evidence, &["portfolio", "work", "projects"]),
        "about_page" => detect_nav_link(evidence, &["about"]),
        "team_page" => detect_nav_link(evidence, &["team"]),

        // No real predicate yet: image_gallery, location_map, search,
        // floor_plans, feature_list, and the remaining long tail.
        _ => DetectorOutcome::Unsupported,
    }
}

fn detect_form(evidence: &Evidence) -> DetectorOutcome {
    for page in &evidence.pages {
        if let Some(form) = page.forms.first() {
            let mut d = Detection::presence_only(page, InteractionEvidence::NotApplicable);
            d.selector = form.selector.clone();
            return DetectorOutcome::Detected(d);
        }
    }
    DetectorOutcome::NotFound
}

fn detect_messaging(evidence: &Evidence) -> DetectorOutcome {
    // Prefer the best-placed link across all pages.
    let mut best: Option<(&PageSnapshot, &crate::evidence::MessagingLink)> = None;
    for page in &evidence.pages {
        for link in &page.messaging_links {
            let better = match best {
                None => true,
                Some((_, current)) => {
                    (link.is_visible, link.is_above_fold) > (current.is_visible, current.is_above_fold)
                }
            };
            if better {
                best = Some((page, link));
            }
        }
    }
    match best {
        Some((page, link)) => DetectorOutcome::Detected(Detection {
            location: page.name(),
            url: page.url.clone(),
            selector: link.selector.clone(),
            visible: link.is_visible,
            above_fold: link.is_above_fold,
            mobile_visible: true,
            enabled: true,
            occluded: link.is_occluded,
            interaction: InteractionEvidence::Tested {
                succeeded: messaging_re().is_match(&link.href),
                console_errors: page.console_errors.clone(),
            },
        }),
        None => DetectorOutcome::NotFound,
    }
}

fn detect_listings(evidence: &Evidence) -> DetectorOutcome {
    // Listing pages show up as repeated card headings.
    for page in &evidence.pages {
        if page.headings_at("h2").len() >= 3 || page.headings_at("h3").len() >= 5 {
            return DetectorOutcome::Detected(Detection::presence_only(
                page,
                InteractionEvidence::Untested,
            ));
        }
    }
    DetectorOutcome::NotFound
}

fn detect_prices(evidence: &Evidence) -> DetectorOutcome {
    for page in &evidence.pages {
        let in_cta = page.ctas.iter().any(|c| price_re().is_match(&c.text));
        let in_heading = page
            .headings_at("h2")
            .iter()
            .chain(page.headings_at("h3"))
            .any(|h| price_re().is_match(h));
        if in_cta || in_heading {
            return DetectorOutcome::Detected(Detection::presence_only(
                page,
                InteractionEvidence::Untested,
            ));
        }
    }
    DetectorOutcome::NotFound
}

fn detect_contact_info(evidence: &Evidence) -> DetectorOutcome {
    for page in &evidence.pages {
        if !page.contact_info.phones.is_empty() || !page.contact_info.emails.is_empty() {
            return DetectorOutcome::Detected(Detection::presence_only(
                page,
                InteractionEvidence::Untested,
            ));
        }
    }
    DetectorOutcome::NotFound
}

fn detect_cta(
    evidence: &Evidence,
    keywords: &[&str],
    interaction: InteractionEvidence,
) -> DetectorOutcome {
    for page in &evidence.pages {
        if let Some(cta) = page
            .ctas
            .iter()
            .find(|c| contains_any(&c.text, keywords))
        {
            return DetectorOutcome::Detected(Detection::from_cta(page, cta, interaction));
        }
    }
    DetectorOutcome::NotFound
}

fn detect_any_cta(evidence: &Evidence) -> DetectorOutcome {
    for page in &evidence.pages {
        // Prefer an above-fold visible CTA; settle for any.
        let best = page
            .ctas
            .iter()
            .max_by_key(|c| (c.is_visible, c.is_above_fold));
        if let Some(cta) = best {
            return DetectorOutcome::Detected(Detection::from_cta(
                page,
                cta,
                InteractionEvidence::Untested,
            ));
        }
    }
    DetectorOutcome::NotFound
}

fn detect_nav_link(evidence: &Evidence, keywords: &[&str]) -> DetectorOutcome {
    for page in &evidence.pages {
        let nav = match &page.navigation {
            Some(nav) => nav,
            None => continue,
        };
        if let Some(link) = nav.links.iter().find(|l| contains_any(&l.text, keywords)) {
            let href_ok = link
                .href
                .as_deref()
                .map(|h| !h.is_empty() && h != "#")
                .unwrap_or(false);
            let mut d = Detection::presence_only(page, InteractionEvidence::Tested {
                succeeded: href_ok,
                console_errors: page.console_errors.clone(),
            });
            d.selector = None;
            return DetectorOutcome::Detected(d);
        }
        // Fall back to a matching CTA (e.g. a "View Menu" button).
        if let Some(cta) = page.ctas.iter().find(|c| contains_any(&c.text, keywords)) {
            return DetectorOutcome::Detected(Detection::from_cta(
                page,
                cta,
                InteractionEvidence::Untested,
            ));
        }
    }
    DetectorOutcome::NotFound
}

fn detect_heading(evidence: &Evidence, keywords: &[&str]) -> DetectorOutcome {
    for page in &evidence.pages {
        if page
            .headings_at("h2")
            .iter()
            .any(|h| contains_any(h, keywords))
        {
            return DetectorOutcome::Detected(Detection::presence_only(
                page,
                InteractionEvidence::Untested,
            ));
        }
    }
    DetectorOutcome::NotFound
}

fn detect_nav_or_heading(evidence: &Evidence, keywords: &[&str]) -> DetectorOutcome {
    match detect_nav_link(evidence, keywords) {
        DetectorOutcome::NotFound => detect_heading(evidence, keywords),
        found => found,
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}
