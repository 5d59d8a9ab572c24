//! End-to-end engine tests: evidence in, ordered findings and scorecard out.

use auditoire::config::{BusinessContext, EngineConfig};
use auditoire::evidence::{
    ContactInfo, CtaElement, Evidence, FormElement, HttpProbe, NavLink, Navigation, PageSnapshot,
    SecurityHeaders,
};
use auditoire::models::{Category, Severity, OVERALL_KEY};
use auditoire::rules::{AuditContext, RuleEngine};
use auditoire::verify::BusinessType;
use std::collections::BTreeMap;

fn nav(links: usize) -> Navigation {
    Navigation {
        links: (0..links)
            .map(|i| NavLink {
                text: format!("Section {i}"),
                href: Some(format!("/section{i}")),
            })
            .collect(),
        has_hamburger: true,
        hamburger_menu_works: Some(true),
    }
}

/// A homepage that passes the structural checks, so scenario tests can
/// assert on exactly the finding they provoke.
fn healthy_homepage() -> PageSnapshot {
    PageSnapshot {
        url: "https://acme.test/".into(),
        title: "Acme Plumbing | Emergency Service in Springfield".into(),
        headings: BTreeMap::from([
            ("h1".to_string(), vec!["Emergency Plumbing in Springfield".to_string()]),
            ("h2".to_string(), vec!["Our Services".to_string(), "Why Acme".to_string()]),
        ]),
        ctas: vec![CtaElement {
            text: "Get a Free Quote".into(),
            kind: "button".into(),
            is_visible: true,
            is_above_fold: true,
            ..Default::default()
        }],
        mobile_ctas: vec![CtaElement {
            text: "Call Now".into(),
            is_visible: true,
            is_above_fold: true,
            ..Default::default()
        }],
        forms: vec![FormElement {
            field_count: 4,
            required_count: 2,
            has_email_field: true,
            has_phone_field: true,
            submit_button_text: "Request a callback".into(),
            ..Default::default()
        }],
        navigation: Some(nav(4)),
        contact_info: ContactInfo {
            phones: vec!["+1 555 0100".into()],
            emails: vec!["hello@acme.test".into()],
            has_tel_link: true,
        },
        meta_tags: BTreeMap::from([
            ("description".to_string(), "d".repeat(130)),
            ("viewport".to_string(), "width=device-width, initial-scale=1".to_string()),
            ("charset".to_string(), "utf-8".to_string()),
            ("og:title".to_string(), "Acme Plumbing".to_string()),
        ]),
        ..Default::default()
    }
}

fn secure_probe() -> HttpProbe {
    HttpProbe {
        url: "https://acme.test".into(),
        final_url: "https://acme.test/".into(),
        status_code: 200,
        security_headers: SecurityHeaders {
            present: BTreeMap::from([
                ("strict-transport-security".to_string(), "max-age=63072000".to_string()),
                ("content-security-policy".to_string(), "default-src 'self'".to_string()),
                ("x-content-type-options".to_string(), "nosniff".to_string()),
                ("referrer-policy".to_string(), "no-referrer".to_string()),
            ]),
            missing: vec![],
            has_hsts: true,
            has_csp: true,
            has_xframe: true,
            score: 90.0,
        },
        sitemap_exists: true,
        robots_txt: Some("User-agent: *\nDisallow: /admin\n".into()),
        ..Default::default()
    }
}

fn healthy_evidence() -> Evidence {
    Evidence {
        url: "https://acme.test".into(),
        pages: vec![healthy_homepage()],
        http_probe: Some(secure_probe()),
        ..Default::default()
    }
}

fn run(evidence: &Evidence, config: &EngineConfig) -> Vec<auditoire::Finding> {
    let engine = RuleEngine::with_default_modules();
    let ctx = AuditContext::resolve(config, evidence);
    let (findings, _) = engine.run(evidence, &ctx).unwrap();
    findings
}

#[test]
fn missing_h1_yields_exactly_one_p1_seo_finding() {
    let mut evidence = healthy_evidence();
    evidence.pages[0].headings.remove("h1");

    let findings = run(&evidence, &EngineConfig::new());
    let h1: Vec<_> = findings.iter().filter(|f| f.id == "SEO-H1-001").collect();
    assert_eq!(h1.len(), 1);
    assert_eq!(h1[0].severity, Severity::P1);
    assert_eq!(h1[0].category, Category::Seo);
}

#[test]
fn http_site_yields_exactly_one_p0_tagged_ssl_critical() {
    let mut evidence = healthy_evidence();
    let probe = evidence.http_probe.as_mut().unwrap();
    probe.url = "http://acme.test".into();
    probe.final_url = "http://acme.test/".into();

    let findings = run(&evidence, &EngineConfig::new());
    let p0_ssl: Vec<_> = findings
        .iter()
        .filter(|f| {
            f.severity == Severity::P0
                && f.tags.contains(&"ssl".to_string())
                && f.tags.contains(&"critical".to_string())
        })
        .collect();
    assert_eq!(p0_ssl.len(), 1);
    assert_eq!(p0_ssl[0].id, "SEC-HTTPS-001");
}

#[test]
fn real_estate_without_inquiry_form_yields_p0_business_finding() {
    let mut evidence = healthy_evidence();
    evidence.pages[0].forms.clear();

    let config = EngineConfig::new()
        .with_business(BusinessContext::Explicit(BusinessType::RealEstate));
    let findings = run(&evidence, &config);

    let critical: Vec<_> = findings
        .iter()
        .filter(|f| {
            f.category == Category::BusinessLogic
                && f.severity == Severity::P0
                && f.tags.contains(&"business-critical".to_string())
        })
        .collect();
    assert!(
        critical.iter().any(|f| f.id == "BIZ-MUST-INQUIRYFO"),
        "expected a missing inquiry-form finding, got {:?}",
        critical.iter().map(|f| &f.id).collect::<Vec<_>>()
    );
}

#[test]
fn disabled_business_context_yields_no_business_findings() {
    let mut evidence = healthy_evidence();
    evidence.pages[0].forms.clear();

    let config = EngineConfig::new().with_business(BusinessContext::Disabled);
    let findings = run(&evidence, &config);
    assert!(!findings.iter().any(|f| f.category == Category::BusinessLogic));
}

#[test]
fn weak_security_headers_yield_p2_listing_missing_names() {
    let mut evidence = healthy_evidence();
    let probe = evidence.http_probe.as_mut().unwrap();
    probe.security_headers.score = 43.0;
    probe.security_headers.missing = vec![
        "strict-transport-security".to_string(),
        "content-security-policy".to_string(),
        "x-frame-options".to_string(),
        "permissions-policy".to_string(),
        "cross-origin-opener-policy".to_string(),
    ];

    let findings = run(&evidence, &EngineConfig::new());
    let headers: Vec<_> = findings.iter().filter(|f| f.id == "SEC-HEADERS-001").collect();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].severity, Severity::P2);
    assert!(headers[0].recommendation.contains("permissions-policy"));
}

#[test]
fn findings_come_out_in_canonical_order() {
    let mut evidence = healthy_evidence();
    // Provoke findings across several categories and severities.
    evidence.pages[0].headings.remove("h1");
    evidence.pages[0].meta_tags.remove("og:title");
    evidence.http_probe.as_mut().unwrap().security_headers.has_csp = false;

    let findings = run(&evidence, &EngineConfig::new());
    assert!(!findings.is_empty());
    for pair in findings.windows(2) {
        let key = |f: &auditoire::Finding| (f.severity.rank(), f.category.as_str());
        assert!(key(&pair[0]) <= key(&pair[1]), "out of order: {} then {}", pair[0].id, pair[1].id);
    }
}

#[test]
fn audits_are_idempotent() {
    let mut evidence = healthy_evidence();
    evidence.pages[0].headings.remove("h1");
    evidence.pages[0].meta_tags.remove("description");

    let config =
        EngineConfig::new().with_business(BusinessContext::Explicit(BusinessType::Agency));
    let first = run(&evidence, &config);
    let second = run(&evidence, &config);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn audit_facade_produces_complete_report() {
    let evidence = healthy_evidence();
    let report = auditoire::audit(&evidence, &EngineConfig::new(), 2).unwrap();

    for category in Category::ALL {
        assert!(
            report.scorecard.get(category.as_str()).is_some(),
            "missing scorecard entry for {category}"
        );
    }
    let overall = report.scorecard.get(OVERALL_KEY).unwrap();
    assert_eq!(report.overall_score, overall);
    assert!((0..=100).contains(&overall));
    assert_eq!(report.findings_summary.total, report.findings.len());
    assert_eq!(report.pages_audited, 1);
    assert_eq!(report.url, "https://acme.test");
}

#[test]
fn partial_evidence_still_produces_a_report() {
    // No probe, no performance report, one bare page: evidence gaps skip
    // checks, they never abort the audit.
    let evidence = Evidence {
        url: "https://bare.test".into(),
        pages: vec![PageSnapshot {
            url: "https://bare.test/".into(),
            ..Default::default()
        }],
        ..Default::default()
    };

    let report = auditoire::audit(&evidence, &EngineConfig::new(), 2).unwrap();
    assert!(report.findings_summary.total > 0);
    assert!(report.scorecard.get(OVERALL_KEY).is_some());
}
