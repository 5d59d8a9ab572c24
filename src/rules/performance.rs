//! Performance checks over Lighthouse scores and Core Web Vitals
//!
//! Every numeric input maps to exactly one severity band or no finding;
//! the threshold tables below are total over their input range.

use crate::evidence::{Evidence, PerformanceReport};
use crate::models::{Category, Effort, EvidenceRef, Finding, Severity};
use crate::rules::base::{finding, AuditContext, RuleModule};

// Google's recommended Core Web Vitals thresholds (good / poor), ms
// unless noted.
const LCP_GOOD: f64 = 2500.0;
const LCP_POOR: f64 = 4000.0;
const CLS_GOOD: f64 = 0.1;
const CLS_POOR: f64 = 0.25;
const TBT_GOOD: f64 = 200.0;
const TBT_POOR: f64 = 600.0;
const FCP_POOR: f64 = 3000.0;
const TTFB_POOR: f64 = 1800.0;

pub struct PerformanceRules;

impl RuleModule for PerformanceRules {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn description(&self) -> &'static str {
        "Lighthouse score and Core Web Vitals"
    }

    fn category(&self) -> Category {
        Category::Performance
    }

    fn evaluate(&self, evidence: &Evidence, _ctx: &AuditContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        let Some(report) = &evidence.performance else {
            return findings;
        };

        check_lighthouse_score(evidence, report, &mut findings);
        check_lcp(evidence, report, &mut findings);
        check_cls(evidence, report, &mut findings);
        check_tbt(evidence, report, &mut findings);
        check_fcp(evidence, report, &mut findings);
        check_ttfb(evidence, report, &mut findings);
        check_opportunities(evidence, report, &mut findings);
        findings
    }
}

fn check_lighthouse_score(
    evidence: &Evidence,
    report: &PerformanceReport,
    findings: &mut Vec<Finding>,
) {
    // Mobile is the primary score; Google ranks on it.
    if let Some(mobile) = report.mobile_score {
        let score_evidence =
            EvidenceRef::metric(&evidence.url, "performance_score", format!("{mobile:.0}"), Some("90"));
        if mobile < 50.0 {
            findings.push(
                finding(
                    "PERF-SCORE-001",
                    Category::Performance,
                    Severity::P0,
                    format!("Critical mobile performance: {mobile:.0}/100"),
                )
                .summary(format!("Lighthouse mobile performance score is {mobile:.0}"))
                .impact("A score below 50 severely impacts user experience and SEO. Google uses mobile performance for rankings.")
                .recommend("Address Core Web Vitals issues immediately. Focus on LCP, TBT, and CLS.")
                .effort(Effort::L)
                .evidence(score_evidence)
                .tags(&["lighthouse", "critical", "mobile"])
                .build(),
            );
        } else if mobile < 75.0 {
            findings.push(
                finding(
                    "PERF-SCORE-002",
                    Category::Performance,
                    Severity::P1,
                    format!("Mobile performance needs improvement: {mobile:.0}/100"),
                )
                .summary(format!("Lighthouse mobile performance score is {mobile:.0} (target: 90+)"))
                .impact("A score below 75 may affect search rankings and user experience")
                .recommend("Focus on Core Web Vitals improvements: LCP, TBT, CLS")
                .effort(Effort::M)
                .evidence(score_evidence)
                .tags(&["lighthouse", "mobile"])
                .build(),
            );
        } else if mobile < 90.0 {
            findings.push(
                finding(
                    "PERF-SCORE-003",
                    Category::Performance,
                    Severity::P2,
                    format!("Mobile performance could be better: {mobile:.0}/100"),
                )
                .summary(format!("Lighthouse mobile score is {mobile:.0} (target: 90+)"))
                .impact("Good performance, but improvements can further boost user experience")
                .recommend("Review Lighthouse opportunities for remaining optimizations")
                .effort(Effort::M)
                .evidence(score_evidence)
                .tags(&["lighthouse", "mobile"])
                .build(),
            );
        }
    }

    if let (Some(mobile), Some(desktop)) = (report.mobile_score, report.desktop_score) {
        let diff = desktop - mobile;
        if diff > 20.0 {
            findings.push(
                finding(
                    "PERF-SCORE-004",
                    Category::Performance,
                    Severity::P2,
                    "Large desktop/mobile performance gap",
                )
                .summary(format!("Desktop: {desktop:.0}, Mobile: {mobile:.0} (diff: {diff:.0})"))
                .impact("Mobile users get a significantly worse experience than desktop")
                .recommend("Optimize specifically for mobile: reduce JS, optimize images, use responsive design")
                .effort(Effort::M)
                .evidence(EvidenceRef::metric(&evidence.url, "score_gap", format!("{diff:.0}"), Some("20")))
                .tags(&["lighthouse", "mobile-gap"])
                .build(),
            );
        }
    }
}

fn check_lcp(evidence: &Evidence, report: &PerformanceReport, findings: &mut Vec<Finding>) {
    let Some(lcp) = report.mobile_vitals.lcp else {
        return;
    };
    let lcp_s = lcp / 1000.0;
    let metric = EvidenceRef::metric(&evidence.url, "LCP", format!("{lcp_s:.2}s"), Some("2.5s"));

    if lcp > LCP_POOR {
        findings.push(
            finding(
                "PERF-LCP-001",
                Category::Performance,
                Severity::P0,
                format!("Critical LCP: {lcp_s:.1}s"),
            )
            .summary(format!("Largest Contentful Paint is {lcp_s:.1}s (should be <2.5s)"))
            .impact("LCP over 4s means most users see a blank or loading screen for too long. High bounce rate.")
            .recommend("Optimize the LCP element (usually the hero image/text). Use preload, optimize images, reduce server time.")
            .effort(Effort::M)
            .evidence(metric)
            .tags(&["cwv", "lcp", "critical"])
            .build(),
        );
    } else if lcp > LCP_GOOD {
        findings.push(
            finding(
                "PERF-LCP-002",
                Category::Performance,
                Severity::P1,
                format!("LCP needs improvement: {lcp_s:.1}s"),
            )
            .summary(format!("Largest Contentful Paint is {lcp_s:.1}s (target: <2.5s)"))
            .impact("LCP between 2.5-4s affects user perception and SEO")
            .recommend("Identify the LCP element in Lighthouse. Preload critical resources. Optimize images.")
            .effort(Effort::M)
            .evidence(metric)
            .tags(&["cwv", "lcp"])
            .build(),
        );
    }
}

fn check_cls(evidence: &Evidence, report: &PerformanceReport, findings: &mut Vec<Finding>) {
    let Some(cls) = report.mobile_vitals.cls else {
        return;
    };
    let metric = EvidenceRef::metric(&evidence.url, "CLS", format!("{cls:.3}"), Some("0.1"));

    if cls > CLS_POOR {
        findings.push(
            finding(
                "PERF-CLS-001",
                Category::Performance,
                Severity::P0,
                format!("Critical CLS: {cls:.3}"),
            )
            .summary(format!("Cumulative Layout Shift is {cls:.3} (should be <0.1)"))
            .impact("High CLS means content jumps around while loading. Users may click the wrong elements.")
            .recommend("Add size attributes to images/videos. Reserve space for ads/embeds. Avoid inserting content above existing content.")
            .effort(Effort::M)
            .evidence(metric)
            .tags(&["cwv", "cls", "critical"])
            .build(),
        );
    } else if cls > CLS_GOOD {
        findings.push(
            finding(
                "PERF-CLS-002",
                Category::Performance,
                Severity::P2,
                format!("CLS needs improvement: {cls:.3}"),
            )
            .summary(format!("Cumulative Layout Shift is {cls:.3} (target: <0.1)"))
            .impact("Layout shifts hurt user experience and conversion rates")
            .recommend("Identify shifting elements. Set explicit dimensions. Use CSS aspect-ratio.")
            .effort(Effort::S)
            .evidence(metric)
            .tags(&["cwv", "cls"])
            .build(),
        );
    }
}

fn check_tbt(evidence: &Evidence, report: &PerformanceReport, findings: &mut Vec<Finding>) {
    let Some(tbt) = report.mobile_vitals.tbt else {
        return;
    };
    let metric = EvidenceRef::metric(&evidence.url, "TBT", format!("{tbt:.0}ms"), Some("200ms"));

    if tbt > TBT_POOR {
        findings.push(
            finding(
                "PERF-TBT-001",
                Category::Performance,
                Severity::P1,
                format!("High Total Blocking Time: {tbt:.0}ms"),
            )
            .summary(format!("TBT is {tbt:.0}ms (should be <200ms)"))
            .impact("High TBT means the page feels unresponsive. Users may think it's broken.")
            .recommend("Reduce JavaScript execution time. Split long tasks. Defer non-critical JS.")
            .effort(Effort::L)
            .evidence(metric)
            .tags(&["cwv", "tbt", "interactivity"])
            .build(),
        );
    } else if tbt > TBT_GOOD {
        findings.push(
            finding(
                "PERF-TBT-002",
                Category::Performance,
                Severity::P2,
                format!("TBT could be improved: {tbt:.0}ms"),
            )
            .summary(format!("Total Blocking Time is {tbt:.0}ms (target: <200ms)"))
            .impact("Some users may experience slight delays in interaction")
            .recommend("Review long tasks in Chrome DevTools. Consider code splitting.")
            .effort(Effort::M)
            .evidence(metric)
            .tags(&["cwv", "tbt"])
            .build(),
        );
    }
}

fn check_fcp(evidence: &Evidence, report: &PerformanceReport, findings: &mut Vec<Finding>) {
    let Some(fcp) = report.mobile_vitals.fcp else {
        return;
    };
    if fcp > FCP_POOR {
        let fcp_s = fcp / 1000.0;
        findings.push(
            finding(
                "PERF-FCP-001",
                Category::Performance,
                Severity::P1,
                format!("Slow First Contentful Paint: {fcp_s:.1}s"),
            )
            .summary(format!("FCP is {fcp_s:.1}s (should be <1.8s)"))
            .impact("Users see a blank screen for too long. High abandonment risk.")
            .recommend("Eliminate render-blocking resources. Inline critical CSS. Optimize server response.")
            .effort(Effort::M)
            .evidence(EvidenceRef::metric(&evidence.url, "FCP", format!("{fcp_s:.2}s"), Some("1.8s")))
            .tags(&["fcp", "loading"])
            .build(),
        );
    }
}

fn check_ttfb(evidence: &Evidence, report: &PerformanceReport, findings: &mut Vec<Finding>) {
    let Some(ttfb) = report.mobile_vitals.ttfb else {
        return;
    };
    if ttfb > TTFB_POOR {
        findings.push(
            finding(
                "PERF-TTFB-001",
                Category::Performance,
                Severity::P1,
                format!("Slow server response: {ttfb:.0}ms TTFB"),
            )
            .summary(format!("Time to First Byte is {ttfb:.0}ms (should be <800ms)"))
            .impact("Slow TTFB delays everything else. The server is the bottleneck.")
            .recommend("Optimize server/database. Use a CDN. Enable caching. Consider static generation.")
            .effort(Effort::M)
            .evidence(EvidenceRef::metric(&evidence.url, "TTFB", format!("{ttfb:.0}ms"), Some("800ms")))
            .tags(&["ttfb", "server"])
            .build(),
        );
    }
}

fn check_opportunities(
    evidence: &Evidence,
    report: &PerformanceReport,
    findings: &mut Vec<Finding>,
) {
    for opp in report.opportunities.iter().take(5) {
        let Some(savings_ms) = opp.savings_ms else {
            continue;
        };
        if savings_ms <= 500.0 {
            continue;
        }

        let severity = if savings_ms > 1000.0 { Severity::P1 } else { Severity::P2 };
        let id: String = opp.id.chars().take(15).collect::<String>().to_uppercase();
        let summary = if opp.display_value.is_empty() {
            opp.description.chars().take(100).collect()
        } else {
            opp.display_value.clone()
        };

        findings.push(
            finding(
                &format!("PERF-OPP-{id}"),
                Category::Performance,
                severity,
                opp.title.clone(),
            )
            .summary(summary)
            .impact(format!("Fixing this could save ~{:.1}s of load time", savings_ms / 1000.0))
            .recommend(opportunity_recommendation(&opp.id))
            .effort(opportunity_effort(&opp.id))
            .evidence(EvidenceRef::metric(
                &evidence.url,
                "potential_savings",
                format!("{:.1}s", savings_ms / 1000.0),
                None,
            ))
            .tags(&["lighthouse", "opportunity"])
            .build(),
        );
    }
}

fn opportunity_recommendation(opp_id: &str) -> &'static str {
    match opp_id {
        "render-blocking-resources" => "Defer non-critical CSS/JS. Inline critical CSS. Use async/defer attributes.",
        "unused-css-rules" => "Remove unused CSS. Use PurgeCSS or a similar tool. Split CSS by route.",
        "unused-javascript" => "Remove unused JS. Use code splitting. Tree-shake dependencies.",
        "modern-image-formats" => "Convert images to WebP or AVIF. Use the picture element for fallbacks.",
        "uses-optimized-images" => "Compress images. Use appropriate quality settings (80-85% for JPEG).",
        "uses-responsive-images" => "Add srcset and sizes attributes. Serve appropriately sized images.",
        "uses-text-compression" => "Enable GZIP or Brotli compression on the server.",
        "uses-long-cache-ttl" => "Set Cache-Control headers with a long max-age for static assets.",
        "font-display" => "Add font-display: swap to @font-face rules. Preload critical fonts.",
        "dom-size" => "Reduce DOM complexity. Virtualize long lists. Lazy load sections.",
        "offscreen-images" => "Lazy load images below the fold. Use loading='lazy'.",
        "unminified-css" => "Minify CSS files. Use build tools like PostCSS.",
        "unminified-javascript" => "Minify JavaScript. Use Terser or a similar tool.",
        "legacy-javascript" => "Serve modern JavaScript to modern browsers. Use the module/nomodule pattern.",
        "efficient-animated-content" => "Use video instead of GIF. Optimize video encoding.",
        "uses-rel-preconnect" => "Add preconnect hints for third-party origins.",
        "server-response-time" => "Optimize server response. Use a CDN. Enable caching.",
        "redirects" => "Minimize redirect chains. Update links to final destinations.",
        "total-byte-weight" => "Reduce total page weight. Compress assets. Remove unused code.",
        _ => "See the Lighthouse report for specific guidance.",
    }
}

fn opportunity_effort(opp_id: &str) -> Effort {
    const EASY: [&str; 4] = [
        "font-display",
        "uses-text-compression",
        "uses-long-cache-ttl",
        "offscreen-images",
    ];
    const HARD: [&str; 4] = [
        "unused-javascript",
        "dom-size",
        "render-blocking-resources",
        "legacy-javascript",
    ];

    if EASY.contains(&opp_id) {
        Effort::S
    } else if HARD.contains(&opp_id) {
        Effort::L
    } else {
        Effort::M
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::evidence::{CoreWebVitals, PerfOpportunity};

    fn ctx() -> AuditContext {
        AuditContext::resolve(&EngineConfig::new(), &Evidence::default())
    }

    fn evidence(report: PerformanceReport) -> Evidence {
        Evidence {
            url: "https://a.test".into(),
            performance: Some(report),
            ..Default::default()
        }
    }

    fn score_findings(mobile: f64) -> Vec<String> {
        let report = PerformanceReport {
            mobile_score: Some(mobile),
            ..Default::default()
        };
        PerformanceRules
            .evaluate(&evidence(report), &ctx())
            .into_iter()
            .filter(|f| f.id.starts_with("PERF-SCORE"))
            .map(|f| f.id)
            .collect()
    }

    #[test]
    fn mobile_score_threshold_table_is_total() {
        assert_eq!(score_findings(30.0), vec!["PERF-SCORE-001"]);
        assert_eq!(score_findings(49.9), vec!["PERF-SCORE-001"]);
        assert_eq!(score_findings(50.0), vec!["PERF-SCORE-002"]);
        assert_eq!(score_findings(74.9), vec!["PERF-SCORE-002"]);
        assert_eq!(score_findings(75.0), vec!["PERF-SCORE-003"]);
        assert_eq!(score_findings(89.9), vec!["PERF-SCORE-003"]);
        assert!(score_findings(90.0).is_empty());
        assert!(score_findings(100.0).is_empty());
    }

    #[test]
    fn severity_matches_score_band() {
        let report = PerformanceReport {
            mobile_score: Some(42.0),
            ..Default::default()
        };
        let findings = PerformanceRules.evaluate(&evidence(report), &ctx());
        assert_eq!(findings[0].severity, Severity::P0);
    }

    #[test]
    fn desktop_mobile_gap() {
        let report = PerformanceReport {
            mobile_score: Some(92.0),
            desktop_score: Some(99.0),
            ..Default::default()
        };
        let findings = PerformanceRules.evaluate(&evidence(report), &ctx());
        assert!(findings.is_empty());

        let report = PerformanceReport {
            mobile_score: Some(60.0),
            desktop_score: Some(95.0),
            ..Default::default()
        };
        let findings = PerformanceRules.evaluate(&evidence(report), &ctx());
        assert!(findings.iter().any(|f| f.id == "PERF-SCORE-004"));
    }

    #[test]
    fn vitals_bands() {
        let report = PerformanceReport {
            mobile_vitals: CoreWebVitals {
                lcp: Some(4500.0),
                cls: Some(0.15),
                tbt: Some(700.0),
                fcp: Some(3500.0),
                ttfb: Some(2000.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let findings = PerformanceRules.evaluate(&evidence(report), &ctx());
        let ids: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();
        assert!(ids.contains(&"PERF-LCP-001"));
        assert!(ids.contains(&"PERF-CLS-002"));
        assert!(ids.contains(&"PERF-TBT-001"));
        assert!(ids.contains(&"PERF-FCP-001"));
        assert!(ids.contains(&"PERF-TTFB-001"));
    }

    #[test]
    fn good_vitals_yield_nothing() {
        let report = PerformanceReport {
            mobile_score: Some(95.0),
            desktop_score: Some(98.0),
            mobile_vitals: CoreWebVitals {
                lcp: Some(1800.0),
                cls: Some(0.05),
                tbt: Some(100.0),
                fcp: Some(1200.0),
                ttfb: Some(400.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let findings = PerformanceRules.evaluate(&evidence(report), &ctx());
        assert!(findings.is_empty());
    }

    #[test]
    fn opportunities_filtered_by_savings() {
        let mk = |id: &str, savings: f64| PerfOpportunity {
            id: id.into(),
            title: format!("Opportunity {id}"),
            savings_ms: Some(savings),
            ..Default::default()
        };
        let report = PerformanceReport {
            opportunities: vec![
                mk("render-blocking-resources", 1500.0),
                mk("unused-css-rules", 700.0),
                mk("font-display", 200.0),
            ],
            ..Default::default()
        };
        let findings = PerformanceRules.evaluate(&evidence(report), &ctx());
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].id, "PERF-OPP-RENDER-BLOCKING");
        assert_eq!(findings[0].severity, Severity::P1);
        assert_eq!(findings[0].effort, Effort::L);
        assert_eq!(findings[1].severity, Severity::P2);
    }

    #[test]
    fn missing_report_yields_nothing() {
        let findings = PerformanceRules.evaluate(&Evidence::default(), &ctx());
        assert!(findings.is_empty());
    }
}
