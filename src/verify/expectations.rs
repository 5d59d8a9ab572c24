//! Feature expectation tables
//!
//! Declares which capabilities a site should have for each business type,
//! at three tiers: must-have, should-have, nice-to-have. The table is an
//! explicit value handed to the verification pipeline, never a process
//! global, so tests can substitute fixtures freely. Built-in defaults can
//! be overridden from a TOML file.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Supported business types for context-aware auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    RealEstate,
    Ecommerce,
    Saas,
    Hospitality,
    Restaurant,
    Healthcare,
    Agency,
    Other,
}

impl BusinessType {
    pub const ALL: [BusinessType; 8] = [
        BusinessType::RealEstate,
        BusinessType::Ecommerce,
        BusinessType::Saas,
        BusinessType::Hospitality,
        BusinessType::Restaurant,
        BusinessType::Healthcare,
        BusinessType::Agency,
        BusinessType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::RealEstate => "real_estate",
            BusinessType::Ecommerce => "ecommerce",
            BusinessType::Saas => "saas",
            BusinessType::Hospitality => "hospitality",
            BusinessType::Restaurant => "restaurant",
            BusinessType::Healthcare => "healthcare",
            BusinessType::Agency => "agency",
            BusinessType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<BusinessType> {
        BusinessType::ALL.iter().copied().find(|b| b.as_str() == s)
    }
}

impl std::fmt::Display for BusinessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority tier of an expected feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureTier {
    MustHave,
    ShouldHave,
    NiceToHave,
}

/// Expected features for one business type, by tier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureExpectations {
    #[serde(default)]
    pub must_have: Vec<String>,
    #[serde(default)]
    pub should_have: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
}

impl FeatureExpectations {
    /// Iterate (feature name, tier) pairs in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureTier)> {
        self.must_have
            .iter()
            .map(|f| (f.as_str(), FeatureTier::MustHave))
            .chain(
                self.should_have
                    .iter()
                    .map(|f| (f.as_str(), FeatureTier::ShouldHave)),
            )
            .chain(
                self.nice_to_have
                    .iter()
                    .map(|f| (f.as_str(), FeatureTier::NiceToHave)),
            )
    }
}

/// Lookup table from business type to expected features. Loaded once and
/// read-only for the lifetime of a run.
#[derive(Debug, Clone, Default)]
pub struct ExpectationTable {
    entries: BTreeMap<BusinessType, FeatureExpectations>,
}

impl ExpectationTable {
    /// Built-in expectations covering all eight business types.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();

        entries.insert(
            BusinessType::RealEstate,
            expectations(
                &[
                    "property_listings",
                    "inquiry_form",
                    "location_map",
                    "price_display",
                    "image_gallery",
                ],
                &[
                    "messaging_cta",
                    "virtual_tour",
                    "floor_plans",
                    "payment_calculator",
                ],
                &["compare_units", "favorites", "agent_profiles"],
            ),
        );
        entries.insert(
            BusinessType::Ecommerce,
            expectations(
                &[
                    "product_catalog",
                    "add_to_cart",
                    "checkout",
                    "search",
                    "price_display",
                ],
                &["filters", "reviews", "wishlist", "stock_status"],
                &["related_products", "recently_viewed", "size_guide"],
            ),
        );
        entries.insert(
            BusinessType::Saas,
            expectations(
                &["pricing_page", "signup_form", "feature_list", "cta_button"],
                &["demo_request", "testimonials", "integrations", "faq"],
                &["comparison_table", "case_studies", "api_docs"],
            ),
        );
        entries.insert(
            BusinessType::Hospitality,
            expectations(
                &[
                    "room_listings",
                    "booking_form",
                    "image_gallery",
                    "price_display",
                    "location_map",
                ],
                &[
                    "amenities",
                    "reviews",
                    "messaging_cta",
                    "availability_calendar",
                ],
                &["virtual_tour", "packages", "local_attractions"],
            ),
        );
        entries.insert(
            BusinessType::Restaurant,
            expectations(
                &["menu", "location_map", "contact_info", "hours"],
                &[
                    "online_ordering",
                    "reservation",
                    "messaging_cta",
                    "image_gallery",
                ],
                &["reviews", "loyalty_program", "special_offers"],
            ),
        );
        entries.insert(
            BusinessType::Healthcare,
            expectations(
                &[
                    "services_list",
                    "contact_info",
                    "location_map",
                    "appointment_booking",
                ],
                &[
                    "doctor_profiles",
                    "insurance_info",
                    "messaging_cta",
                    "patient_portal",
                ],
                &["telehealth", "reviews", "faq"],
            ),
        );
        entries.insert(
            BusinessType::Agency,
            expectations(
                &["services_list", "portfolio", "contact_form", "about_page"],
                &["case_studies", "team_page", "testimonials", "messaging_cta"],
                &["blog", "pricing", "client_logos"],
            ),
        );
        entries.insert(
            BusinessType::Other,
            expectations(
                &["contact_info", "about_page", "cta_button"],
                &["services_list", "messaging_cta", "location_map"],
                &["testimonials", "faq", "blog"],
            ),
        );

        Self { entries }
    }

    /// Expectations for one business type, if the table covers it.
    pub fn get(&self, business: BusinessType) -> Option<&FeatureExpectations> {
        self.entries.get(&business)
    }

    /// Replace or add the expectations for one business type.
    pub fn insert(&mut self, business: BusinessType, expectations: FeatureExpectations) {
        self.entries.insert(business, expectations);
    }

    /// Load per-type overrides from a TOML file on top of the built-in
    /// table. Sections are keyed by business type name:
    ///
    /// ```toml
    /// [real_estate]
    /// must_have = ["property_listings", "inquiry_form"]
    /// should_have = ["messaging_cta"]
    /// ```
    ///
    /// A missing or unparsable file leaves the built-in table untouched.
    pub fn with_overrides(mut self, path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return self,
        };
        let parsed: BTreeMap<String, FeatureExpectations> = match toml::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to parse {}: {e}. Keeping defaults.", path.display());
                return self;
            }
        };
        for (name, exp) in parsed {
            match BusinessType::parse(&name) {
                Some(bt) => {
                    self.entries.insert(bt, exp);
                }
                None => warn!("Unknown business type '{name}' in {}", path.display()),
            }
        }
        self
    }
}

fn expectations(must: &[&str], should: &[&str], nice: &[&str]) -> FeatureExpectations {
    FeatureExpectations {
        must_have: must.iter().map(|s| s.to_string()).collect(),
        should_have: should.iter().map(|s| s.to_string()).collect(),
        nice_to_have: nice.iter().map(|s| s.to_string()).collect(),
    }
}

/// Human-readable display name for a feature key.
pub fn feature_display_name(feature: &str) -> String {
    feature
        .split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Actionable recommendation for adding a missing feature.
pub fn feature_recommendation(feature: &str) -> String {
    match feature {
        "inquiry_form" | "contact_form" => {
            "Add a contact/inquiry form to key pages with minimal fields (Name, Email, Phone, Message)".into()
        }
        "messaging_cta" => {
            "Add a messaging button (e.g. wa.me link) in the header and as a floating sticky button".into()
        }
        "property_listings" | "room_listings" => {
            "Create a listing grid with key details: image, title, price, location".into()
        }
        "product_catalog" => {
            "Create a product catalog with images, prices, and add-to-cart buttons".into()
        }
        "price_display" => {
            "Display prices clearly. If pricing varies, show 'Starting from' or 'Contact for pricing'".into()
        }
        "image_gallery" => "Add an image gallery with lightbox and multiple angles".into(),
        "location_map" => "Embed a map showing the business location".into(),
        "virtual_tour" => "Consider a 360-degree virtual tour for an immersive experience".into(),
        "add_to_cart" => "Implement add-to-cart with clear feedback".into(),
        "checkout" => "Create a streamlined checkout with multiple payment options".into(),
        "search" => "Add search to help users find content quickly".into(),
        "booking_form" | "reservation" | "appointment_booking" => {
            "Add a booking form with date selection and availability check".into()
        }
        "contact_info" => "Display phone and email prominently in header/footer".into(),
        "menu" => "Create a menu page with categories, items, descriptions, and prices".into(),
        "pricing_page" => "Create a dedicated pricing page with clear plan comparison".into(),
        "signup_form" => "Add a signup form with an email field and clear value proposition".into(),
        "demo_request" => "Add a 'Request Demo' call to action with booking integration".into(),
        "cta_button" => "Add prominent call-to-action buttons on key pages".into(),
        "services_list" => "Create a services page listing all offerings with descriptions".into(),
        "portfolio" => "Add a portfolio section showcasing past projects".into(),
        "testimonials" => "Add a testimonials section with client quotes".into(),
        other => format!("Implement {} functionality", feature_display_name(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_all_business_types() {
        let table = ExpectationTable::builtin();
        for bt in BusinessType::ALL {
            let exp = table.get(bt).unwrap();
            assert!(!exp.must_have.is_empty(), "{bt} has no must-have features");
        }
    }

    #[test]
    fn business_type_parses_canonical_names() {
        assert_eq!(BusinessType::parse("real_estate"), Some(BusinessType::RealEstate));
        assert_eq!(BusinessType::parse("ecommerce"), Some(BusinessType::Ecommerce));
        assert_eq!(BusinessType::parse("bakery"), None);
    }

    #[test]
    fn iter_yields_tiers_in_order() {
        let exp = FeatureExpectations {
            must_have: vec!["a".into()],
            should_have: vec!["b".into()],
            nice_to_have: vec!["c".into()],
        };
        let pairs: Vec<_> = exp.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("a", FeatureTier::MustHave),
                ("b", FeatureTier::ShouldHave),
                ("c", FeatureTier::NiceToHave),
            ]
        );
    }

    #[test]
    fn overrides_replace_single_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.toml");
        std::fs::write(
            &path,
            r#"
[restaurant]
must_have = ["menu"]
"#,
        )
        .unwrap();

        let table = ExpectationTable::builtin().with_overrides(&path);
        let restaurant = table.get(BusinessType::Restaurant).unwrap();
        assert_eq!(restaurant.must_have, vec!["menu"]);
        assert!(restaurant.should_have.is_empty());
        // Untouched types keep their defaults
        assert!(!table.get(BusinessType::Saas).unwrap().must_have.is_empty());
    }

    #[test]
    fn display_name_title_cases() {
        assert_eq!(feature_display_name("inquiry_form"), "Inquiry Form");
        assert_eq!(feature_display_name("menu"), "Menu");
    }
}
