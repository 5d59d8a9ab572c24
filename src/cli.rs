//! CLI command definitions and handlers

use crate::config::{load_config, BusinessContext};
use crate::evidence::Evidence;
use crate::reporters::{self, OutputFormat};
use crate::rules::RuleEngine;
use crate::verify::BusinessType;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Auditoire - Website audit engine
#[derive(Parser, Debug)]
#[command(name = "auditoire")]
#[command(
    version,
    about = "Turn collected website evidence into prioritized findings and category scores",
    long_about = "Auditoire consumes an evidence file produced by a site collector (pages, \
Lighthouse-style performance report, HTTP/security probe) and runs its rule modules to \
produce a prioritized finding list plus a 0-100 scorecard per category.\n\n\
The engine is deterministic: the same evidence and configuration always produce the \
same report.",
    after_help = "\
Examples:
  auditoire analyze evidence.json                     Audit with auto-detected business type
  auditoire analyze evidence.json --format json       JSON output for scripting
  auditoire analyze evidence.json -o report.md -f md  Write a Markdown report
  auditoire analyze evidence.json --business-type real_estate
  auditoire categories                                List the built-in rule modules"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, default_value = "8", value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit an evidence file and render the report
    Analyze {
        /// Path to the evidence JSON produced by the collector
        evidence: PathBuf,

        /// Business type for feature verification (default: auto-detect)
        #[arg(long)]
        business_type: Option<String>,

        /// Config file path (default: ./auditoire.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Strip colors from text output
        #[arg(long)]
        no_color: bool,
    },

    /// List the built-in rule modules and their categories
    Categories,
}

/// Dispatch a parsed CLI invocation
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            evidence,
            business_type,
            config,
            format,
            output,
            no_color,
        } => run_analyze(
            &evidence,
            business_type.as_deref(),
            config.as_deref(),
            &format,
            output.as_deref(),
            no_color,
            cli.workers,
        ),
        Commands::Categories => run_categories(),
    }
}

fn run_analyze(
    evidence_path: &Path,
    business_type: Option<&str>,
    config_path: Option<&Path>,
    format: &str,
    output: Option<&Path>,
    no_color: bool,
    workers: usize,
) -> Result<()> {
    let raw = std::fs::read_to_string(evidence_path)
        .with_context(|| format!("Failed to read evidence file {}", evidence_path.display()))?;
    let evidence: Evidence = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse evidence file {}", evidence_path.display()))?;

    let mut config = load_config(config_path.unwrap_or(Path::new("auditoire.toml")));

    // An explicit CLI flag beats both the config file and auto-detection.
    if let Some(name) = business_type {
        let bt = BusinessType::parse(name).ok_or_else(|| {
            anyhow!(
                "Unknown business type '{}'. Known types: {}",
                name,
                BusinessType::ALL
                    .iter()
                    .map(|b| b.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
        config.business = BusinessContext::Explicit(bt);
    }

    let report = crate::audit(&evidence, &config, workers)?;

    let fmt = OutputFormat::from_str(format)?;
    let mut rendered = reporters::report_with_format(&report, fmt)?;
    if no_color || output.is_some() {
        rendered = console::strip_ansi_codes(&rendered).to_string();
    }

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} report written to {}",
                style("✓").green().bold(),
                style(path.display()).bold()
            );
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn run_categories() -> Result<()> {
    let engine = RuleEngine::with_default_modules();
    println!("{}", style("Built-in rule modules").bold());
    for module in engine.modules() {
        println!(
            "  {:<16} {:<15} {}",
            style(module.name()).cyan(),
            module.category(),
            style(module.description()).dim()
        );
    }
    Ok(())
}
