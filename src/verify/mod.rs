//! Feature verification sub-engine
//!
//! Judges whether business-critical capabilities (an inquiry form, a
//! booking flow, a messaging CTA) exist, are discoverable, and function,
//! by running each expected feature through a five-stage state machine
//! over the evidence model. Used by the business-logic rule module.

mod detectors;
mod expectations;
mod pipeline;

pub use detectors::{detect_feature, Detection, DetectorOutcome, InteractionEvidence};
pub use expectations::{
    feature_display_name, feature_recommendation, BusinessType, ExpectationTable,
    FeatureExpectations, FeatureTier,
};
pub use pipeline::{verify_all, verify_feature, Accessibility, FeatureCheck, FeatureStatus};
