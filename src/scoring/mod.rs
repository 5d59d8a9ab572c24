//! Score calculation from findings
//!
//! Reduces the finding list to one integer score per category plus a
//! weighted `OVERALL` score.
//!
//! # Scoring Formula
//!
//! ```text
//! Category = clamp(100 - Σ impact(severity) × confidence, 0, 100)
//! OVERALL  = Σ weight(c) × Category(c) / Σ weight(c)   (used weights only)
//! ```
//!
//! A category with zero findings scores exactly 100, including categories
//! that were never evaluated. The overall denominator is the sum of
//! weights whose category actually has a score, so dropping a category
//! re-normalizes instead of silently deflating the result.
//!
//! # Severity Impact (points deducted per finding, default)
//!
//! - P0: 25
//! - P1: 15
//! - P2: 8
//! - P3: 3
//!
//! Confidence scales the deduction: a 0.7-confidence P2 costs 5.6 points.
//!
//! Malformed weight tables are the one configuration problem this engine
//! refuses to work around: they are rejected at construction with a
//! [`ScoringError`] instead of producing a scorecard nobody can trust.

mod calculator;

pub use crate::models::{Scorecard, OVERALL_KEY};
pub use calculator::{grade, ScoreCalculator, ScoringError};
