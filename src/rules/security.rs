//! Transport security, security headers, and certificate checks

use crate::evidence::Evidence;
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{finding, AuditContext, RuleModule};

/// One year, the recommended HSTS floor.
const HSTS_MIN_MAX_AGE: u64 = 31_536_000;

pub struct SecurityRules;

impl RuleModule for SecurityRules {
    fn name(&self) -> &'static str {
        "security"
    }

    fn description(&self) -> &'static str {
        "HTTPS, security headers, and SSL certificate health"
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn evaluate(&self, evidence: &Evidence, _ctx: &AuditContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        let Some(probe) = &evidence.http_probe else {
            // No probe data means no transport checks; evidence gaps never
            // fabricate findings.
            return findings;
        };

        check_https(probe, &mut findings);
        check_hsts(evidence, probe, &mut findings);
        check_csp(evidence, probe, &mut findings);
        check_x_frame_options(evidence, probe, &mut findings);
        check_other_headers(evidence, probe, &mut findings);
        check_ssl_certificate(evidence, probe, &mut findings);
        check_mixed_content(evidence, probe, &mut findings);
        findings
    }
}

fn check_https(probe: &crate::evidence::HttpProbe, findings: &mut Vec<Finding>) {
    if !probe.final_url.starts_with("https://") {
        findings.push(
            finding("SEC-HTTPS-001", Category::Security, Severity::P0, "Site not using HTTPS")
                .summary("Website is served over unencrypted HTTP")
                .impact("Browsers show a 'Not Secure' warning. Google penalizes non-HTTPS sites. User data is at risk.")
                .recommend("Install an SSL certificate and redirect all HTTP to HTTPS immediately")
                .effort(Effort::M)
                .evidence(EvidenceRef::page(&probe.final_url).with_note("Site served over HTTP"))
                .tags(&["ssl", "critical"])
                .build(),
        );
    }

    if probe.url.starts_with("http://") && !probe.final_url.starts_with("https://") {
        findings.push(
            finding(
                "SEC-HTTPS-002",
                Category::Security,
                Severity::P0,
                "HTTP not redirecting to HTTPS",
            )
            .summary("HTTP version of the site doesn't redirect to HTTPS")
            .impact("Users accessing via HTTP remain on an insecure connection")
            .recommend("Configure the server to redirect all HTTP requests to HTTPS")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&probe.url))
            .tags(&["ssl", "redirect"])
            .build(),
        );
    }
}

fn parse_hsts_max_age(value: &str) -> Option<u64> {
    let after = value.split("max-age=").nth(1)?;
    after.split(';').next()?.trim().parse().ok()
}

fn check_hsts(
    evidence: &Evidence,
    probe: &crate::evidence::HttpProbe,
    findings: &mut Vec<Finding>,
) {
    let security = &probe.security_headers;

    if !security.has_hsts {
        findings.push(
            finding("SEC-HSTS-001", Category::Security, Severity::P2, "Missing HSTS header")
                .summary("Strict-Transport-Security header not set")
                .impact("Without HSTS, users could be vulnerable to SSL stripping and downgrade attacks")
                .recommend("Add header: Strict-Transport-Security: max-age=31536000; includeSubDomains")
                .effort(Effort::S)
                .evidence(EvidenceRef::page(&evidence.url))
                .tags(&["headers", "ssl"])
                .build(),
        );
        return;
    }

    let hsts_value = security
        .present
        .get("strict-transport-security")
        .map(String::as_str)
        .unwrap_or("");
    if let Some(max_age) = parse_hsts_max_age(hsts_value) {
        if max_age < HSTS_MIN_MAX_AGE {
            findings.push(
                finding("SEC-HSTS-002", Category::Security, Severity::P3, "HSTS max-age is short")
                    .summary(format!("HSTS max-age is {max_age} seconds (less than 1 year)"))
                    .impact("Short HSTS duration provides less protection")
                    .recommend("Set max-age to at least 31536000 (1 year)")
                    .effort(Effort::S)
                    .evidence(EvidenceRef::page(&evidence.url))
                    .tags(&["headers", "hsts"])
                    .build(),
            );
        }
    }
}

fn check_csp(
    evidence: &Evidence,
    probe: &crate::evidence::HttpProbe,
    findings: &mut Vec<Finding>,
) {
    if !probe.security_headers.has_csp {
        findings.push(
            finding(
                "SEC-CSP-001",
                Category::Security,
                Severity::P2,
                "Missing Content-Security-Policy header",
            )
            .summary("No CSP header to prevent XSS attacks")
            .impact("Site is more vulnerable to cross-site scripting (XSS) attacks and data injection")
            .recommend("Implement a Content-Security-Policy header. Start with report-only mode to test.")
            .effort(Effort::M)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["headers", "xss"])
            .build(),
        );
    }
}

fn check_x_frame_options(
    evidence: &Evidence,
    probe: &crate::evidence::HttpProbe,
    findings: &mut Vec<Finding>,
) {
    let security = &probe.security_headers;
    if security.has_xframe {
        return;
    }
    // CSP frame-ancestors is the modern replacement; either satisfies.
    let csp = security
        .present
        .get("content-security-policy")
        .map(String::as_str)
        .unwrap_or("");
    if csp.contains("frame-ancestors") {
        return;
    }

    findings.push(
        finding(
            "SEC-XFRAME-001",
            Category::Security,
            Severity::P2,
            "Missing clickjacking protection",
        )
        .summary("Neither X-Frame-Options nor CSP frame-ancestors is set")
        .impact("Site can be embedded in iframes on other domains, enabling clickjacking attacks")
        .recommend("Add X-Frame-Options: SAMEORIGIN or a CSP frame-ancestors directive")
        .effort(Effort::S)
        .evidence(EvidenceRef::page(&evidence.url))
        .tags(&["headers", "clickjacking"])
        .build(),
    );
}

fn check_other_headers(
    evidence: &Evidence,
    probe: &crate::evidence::HttpProbe,
    findings: &mut Vec<Finding>,
) {
    let security = &probe.security_headers;

    if !security.present.contains_key("x-content-type-options") {
        findings.push(
            finding(
                "SEC-XCTO-001",
                Category::Security,
                Severity::P3,
                "Missing X-Content-Type-Options header",
            )
            .summary("X-Content-Type-Options: nosniff not set")
            .impact("Browsers may try to MIME-sniff responses, potentially executing malicious content")
            .recommend("Add header: X-Content-Type-Options: nosniff")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["headers"])
            .build(),
        );
    }

    if !security.present.contains_key("referrer-policy") {
        findings.push(
            finding(
                "SEC-REF-001",
                Category::Security,
                Severity::P3,
                "Missing Referrer-Policy header",
            )
            .summary("No Referrer-Policy header set")
            .impact("Full URLs including sensitive parameters may be sent to third parties")
            .recommend("Add header: Referrer-Policy: strict-origin-when-cross-origin")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["headers", "privacy"])
            .build(),
        );
    }

    // Fires when fewer than half of the expected headers are in place.
    if security.score < 50.0 {
        let missing_list = security
            .missing
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        findings.push(
            finding(
                "SEC-HEADERS-001",
                Category::Security,
                Severity::P2,
                format!("Multiple security headers missing (score: {:.0}/100)", security.score),
            )
            .summary(format!("Security header score is only {:.0}/100", security.score))
            .impact("Missing security headers leave the site vulnerable to various attacks")
            .recommend(format!("Add missing headers: {missing_list}"))
            .effort(Effort::M)
            .evidence(EvidenceRef::metric(
                &evidence.url,
                "security_header_score",
                format!("{:.0}%", security.score),
                Some("100%"),
            ))
            .tags(&["headers"])
            .build(),
        );
    }
}

fn check_ssl_certificate(
    evidence: &Evidence,
    probe: &crate::evidence::HttpProbe,
    findings: &mut Vec<Finding>,
) {
    let Some(ssl) = &probe.ssl else {
        return;
    };

    if !ssl.valid {
        let error = ssl.error.as_deref().unwrap_or("unknown error");
        findings.push(
            finding("SEC-SSL-001", Category::Security, Severity::P0, "SSL certificate issue")
                .summary(format!("SSL problem: {error}"))
                .impact("Invalid SSL causes browser warnings and blocks access for many users. Destroys trust.")
                .recommend("Fix the SSL certificate immediately. Check expiration, domain match, and certificate chain.")
                .effort(Effort::M)
                .evidence(EvidenceRef::page(&evidence.url).with_note(error))
                .tags(&["ssl", "critical"])
                .build(),
        );
    }

    let Some(days) = ssl.days_until_expiry else {
        return;
    };
    if days < 0 {
        findings.push(
            finding(
                "SEC-SSL-002",
                Category::Security,
                Severity::P0,
                "SSL certificate has expired",
            )
            .summary(format!("Certificate expired {} days ago", days.abs()))
            .impact("Browsers will show security warnings. The site may be inaccessible.")
            .recommend("Renew the SSL certificate immediately")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["ssl", "critical", "expired"])
            .build(),
        );
    } else if days < 14 {
        findings.push(
            finding(
                "SEC-SSL-003",
                Category::Security,
                Severity::P1,
                format!("SSL certificate expiring soon ({days} days)"),
            )
            .summary(format!("Certificate expires in {days} days"))
            .impact("The site will show security warnings when the certificate expires")
            .recommend("Renew the SSL certificate now. Set up auto-renewal if possible.")
            .effort(Effort::S)
            .evidence(EvidenceRef::metric(&evidence.url, "ssl_expiry_days", days, None))
            .tags(&["ssl", "expiring"])
            .build(),
        );
    } else if days < 30 {
        findings.push(
            finding(
                "SEC-SSL-004",
                Category::Security,
                Severity::P2,
                format!("SSL certificate expiring in {days} days"),
            )
            .summary(format!(
                "Certificate expires: {}",
                ssl.expires.as_deref().unwrap_or("within 30 days")
            ))
            .impact("The certificate will expire soon")
            .recommend("Plan certificate renewal")
            .effort(Effort::S)
            .evidence(EvidenceRef::page(&evidence.url))
            .tags(&["ssl"])
            .build(),
        );
    }
}

fn check_mixed_content(
    evidence: &Evidence,
    probe: &crate::evidence::HttpProbe,
    findings: &mut Vec<Finding>,
) {
    if !probe.final_url.starts_with("https://") {
        return;
    }

    for page in &evidence.pages {
        let mixed: Vec<&String> = page
            .console_errors
            .iter()
            .filter(|e| {
                let lower = e.to_lowercase();
                lower.contains("mixed content") || lower.contains("insecure")
            })
            .collect();

        if let Some(first) = mixed.first() {
            let note: String = first.chars().take(100).collect();
            findings.push(
                finding("SEC-MIXED-001", Category::Security, Severity::P1, "Mixed content detected")
                    .summary("HTTPS page loads resources over HTTP")
                    .impact("Mixed content can be blocked by browsers and shows security warnings")
                    .recommend("Update all resource URLs to HTTPS. Check images, scripts, stylesheets, iframes.")
                    .effort(Effort::M)
                    .evidence(EvidenceRef::page(&page.url).with_note(note))
                    .tags(&["ssl", "mixed-content"])
                    .build(),
            );
            break;
        }
    }
}
