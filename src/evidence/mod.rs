//! The evidence model: an immutable snapshot of everything an external
//! collector gathered about a site for one audit run.
//!
//! The engine never produces this data and never mutates it. Every field
//! is optional at the serde level so a partial collector payload still
//! loads; rule modules treat absent fields as evidence gaps and skip the
//! affected checks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A call-to-action element found on a page.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CtaElement {
    pub text: String,
    /// "link" or "button".
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_above_fold: bool,
    /// Element carries a disabled attribute or aria-disabled.
    #[serde(default)]
    pub is_disabled: bool,
    /// Element was covered by another element at probe time.
    #[serde(default)]
    pub is_occluded: bool,
    #[serde(default)]
    pub selector: Option<String>,
}

/// A form found on a page. The collector never submits forms; it records
/// structure only.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormElement {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub field_count: usize,
    #[serde(default)]
    pub required_count: usize,
    #[serde(default)]
    pub has_email_field: bool,
    #[serde(default)]
    pub has_phone_field: bool,
    #[serde(default)]
    pub submit_button_text: String,
    #[serde(default)]
    pub selector: Option<String>,
}

/// One navigation link.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NavLink {
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Page navigation structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Navigation {
    #[serde(default)]
    pub links: Vec<NavLink>,
    #[serde(default)]
    pub has_hamburger: bool,
    /// Result of the collector's safe menu-toggle interaction, if it was
    /// attempted. None means the interaction was never tried.
    #[serde(default)]
    pub hamburger_menu_works: Option<bool>,
}

/// A messaging-app link (WhatsApp, Telegram, Messenger, ...) with its
/// placement flags.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessagingLink {
    pub href: String,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_above_fold: bool,
    /// Element was covered by another element at probe time.
    #[serde(default)]
    pub is_occluded: bool,
    #[serde(default)]
    pub selector: Option<String>,
}

/// Contact details scraped from page text and link attributes.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContactInfo {
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub has_tel_link: bool,
}

/// DOM facts for a single audited page.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// Heading text grouped by level: keys "h1", "h2", "h3".
    #[serde(default)]
    pub headings: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub ctas: Vec<CtaElement>,
    /// CTAs visible in the mobile viewport.
    #[serde(default)]
    pub mobile_ctas: Vec<CtaElement>,
    #[serde(default)]
    pub forms: Vec<FormElement>,
    #[serde(default)]
    pub navigation: Option<Navigation>,
    #[serde(default)]
    pub messaging_links: Vec<MessagingLink>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub meta_tags: BTreeMap<String, String>,
    #[serde(default)]
    pub console_errors: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

impl PageSnapshot {
    /// Headings at one level, empty if the level was not collected.
    pub fn headings_at(&self, level: &str) -> &[String] {
        self.headings.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Readable page name derived from the URL path ("homepage" for `/`).
    pub fn name(&self) -> String {
        page_name(&self.url)
    }
}

/// Readable page name from a URL: last path segment, or "homepage".
pub fn page_name(url: &str) -> String {
    let without_scheme = url.splitn(2, "//").last().unwrap_or(url);
    let path = without_scheme
        .splitn(2, '/')
        .nth(1)
        .unwrap_or("")
        .trim_end_matches('/');
    let last = path.rsplit('/').next().unwrap_or("");
    let clean = last.split('?').next().unwrap_or("");
    if clean.is_empty() {
        "homepage".to_string()
    } else {
        clean.to_string()
    }
}

/// Core Web Vitals from the performance report, all in their native units
/// (milliseconds except CLS, which is unitless).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoreWebVitals {
    #[serde(default)]
    pub lcp: Option<f64>,
    #[serde(default)]
    pub cls: Option<f64>,
    #[serde(default)]
    pub inp: Option<f64>,
    #[serde(default)]
    pub ttfb: Option<f64>,
    #[serde(default)]
    pub tbt: Option<f64>,
    #[serde(default)]
    pub fcp: Option<f64>,
    #[serde(default)]
    pub si: Option<f64>,
}

/// One optimization opportunity from the performance report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PerfOpportunity {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub savings_ms: Option<f64>,
    #[serde(default)]
    pub display_value: String,
}

/// Lighthouse-style performance report for one site.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PerformanceReport {
    /// Overall mobile performance score, 0-100.
    #[serde(default)]
    pub mobile_score: Option<f64>,
    /// Overall desktop performance score, 0-100.
    #[serde(default)]
    pub desktop_score: Option<f64>,
    #[serde(default)]
    pub mobile_vitals: CoreWebVitals,
    #[serde(default)]
    pub desktop_vitals: CoreWebVitals,
    #[serde(default)]
    pub opportunities: Vec<PerfOpportunity>,
}

/// Security header summary produced by the HTTP prober.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecurityHeaders {
    /// Headers present, lowercase name -> raw value.
    #[serde(default)]
    pub present: BTreeMap<String, String>,
    /// Expected headers that were absent, in the prober's fixed order.
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default)]
    pub has_hsts: bool,
    #[serde(default)]
    pub has_csp: bool,
    #[serde(default)]
    pub has_xframe: bool,
    /// 0-100 coverage score.
    #[serde(default)]
    pub score: f64,
}

/// SSL certificate facts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SslInfo {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub days_until_expiry: Option<i64>,
}

/// HTTP probe facts for the site entry URL.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HttpProbe {
    pub url: String,
    #[serde(default)]
    pub final_url: String,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub redirect_chain: Vec<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub security_headers: SecurityHeaders,
    #[serde(default)]
    pub ssl: Option<SslInfo>,
    #[serde(default)]
    pub robots_txt: Option<String>,
    #[serde(default)]
    pub sitemap_exists: bool,
}

/// Business-type signals detected by the collector.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BusinessSignals {
    #[serde(default)]
    pub detected_type: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub indicators: Vec<String>,
}

/// Complete evidence for one audit run. Treated as finished and finite:
/// the engine never awaits or refreshes it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Evidence {
    pub url: String,
    #[serde(default)]
    pub pages: Vec<PageSnapshot>,
    /// Absent when the performance probe never ran; the affected checks
    /// skip rather than guess.
    #[serde(default)]
    pub performance: Option<PerformanceReport>,
    #[serde(default)]
    pub http_probe: Option<HttpProbe>,
    #[serde(default)]
    pub business_signals: BusinessSignals,
    #[serde(default)]
    pub collected_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub collection_errors: Vec<String>,
}

impl Evidence {
    /// The homepage snapshot: the page whose path is the site root, or the
    /// first collected page as a fallback.
    pub fn homepage(&self) -> Option<&PageSnapshot> {
        self.pages
            .iter()
            .find(|p| p.name() == "homepage")
            .or_else(|| self.pages.first())
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_name_handles_roots_and_paths() {
        assert_eq!(page_name("https://site.test/"), "homepage");
        assert_eq!(page_name("https://site.test"), "homepage");
        assert_eq!(page_name("https://site.test/contact"), "contact");
        assert_eq!(page_name("https://site.test/about/"), "about");
        assert_eq!(page_name("https://site.test/pricing?plan=pro"), "pricing");
    }

    #[test]
    fn homepage_prefers_root_page() {
        let evidence = Evidence {
            url: "https://site.test".into(),
            pages: vec![
                PageSnapshot {
                    url: "https://site.test/contact".into(),
                    ..Default::default()
                },
                PageSnapshot {
                    url: "https://site.test/".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(evidence.homepage().unwrap().url, "https://site.test/");
    }

    #[test]
    fn partial_payload_deserializes_with_defaults() {
        let evidence: Evidence = serde_json::from_str(
            r#"{"url": "https://site.test", "pages": [{"url": "https://site.test/"}]}"#,
        )
        .unwrap();
        assert_eq!(evidence.pages.len(), 1);
        assert!(evidence.pages[0].forms.is_empty());
        assert!(evidence.http_probe.is_none());
        assert!(evidence.performance.is_none());
    }
}
