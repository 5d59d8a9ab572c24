//! Rule modules and the engine that runs them
//!
//! This module provides the rule framework and the category rule
//! implementations that turn collected evidence into findings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RuleEngine                            │
//! │  - Registers rule modules                                   │
//! │  - Runs modules in parallel (rayon)                         │
//! │  - Isolates panics per module                               │
//! │  - Collects findings into canonical order                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     RuleModule Trait                        │
//! │  - name(): Unique identifier                                │
//! │  - category(): Category the module reports under            │
//! │  - evaluate(evidence, ctx): Pure evaluation, no I/O         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every module is pure: the same evidence and context always produce
//! the same findings. Missing evidence sections make the relevant
//! checks pass silently rather than guess.
//!
//! # Usage
//!
//! ```ignore
//! use auditoire::rules::{AuditContext, RuleEngine};
//!
//! let engine = RuleEngine::with_default_modules();
//! let ctx = AuditContext::resolve(&config, &evidence);
//! let (findings, summary) = engine.run(&evidence, &ctx)?;
//! ```

pub mod base;
pub mod engine;

// Category rule implementations
pub mod business;
pub mod content;
pub mod conversion;
pub mod maintenance;
pub mod performance;
pub mod security;
pub mod seo;
pub mod ux;

pub use base::{finding, AuditContext, FindingBuilder, RuleModule, RuleResult, RunSummary};
pub use engine::RuleEngine;
