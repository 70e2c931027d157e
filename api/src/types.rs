//! Wire types shared with the marketplace services.
//!
//! Field names mirror the backend JSON exactly: snake_case bodies here,
//! camelCase multipart form keys in `client.rs`. Most response
//! fields are `#[serde(default)]` because the services omit empty arrays and
//! optional columns rather than sending nulls consistently.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Upper bound the upload service enforces on product images per product.
pub const MAX_UPLOAD_IMAGES: usize = 5;

/// Categorical ingredient-safety classification assigned by the analysis
/// service. The wire is case-insensitive ("Good", "good", …); anything
/// unrecognized collapses to [`Verdict::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Moderate,
    Bad,
    Harmful,
    #[default]
    Unknown,
}

impl Verdict {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Verdict::Good,
            "moderate" => Verdict::Moderate,
            "bad" => Verdict::Bad,
            "harmful" => Verdict::Harmful,
            _ => Verdict::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Good => "Good",
            Verdict::Moderate => "Moderate",
            Verdict::Bad => "Bad",
            Verdict::Harmful => "Harmful",
            Verdict::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Verdict::parse(&raw))
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Fixed skin-type tags used for filtering and analysis context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinType {
    Oily,
    Dry,
    Combination,
    Normal,
    Sensitive,
    AcneProne,
    All,
}

impl SkinType {
    /// Every tag, in the order the seller upload form offers them.
    pub const ALL: [SkinType; 7] = [
        SkinType::Oily,
        SkinType::Dry,
        SkinType::Combination,
        SkinType::Normal,
        SkinType::Sensitive,
        SkinType::AcneProne,
        SkinType::All,
    ];

    /// Tags usable as buyer-side filters ("all" is not a filter value).
    pub const FILTERABLE: [SkinType; 6] = [
        SkinType::Oily,
        SkinType::Normal,
        SkinType::Dry,
        SkinType::Combination,
        SkinType::AcneProne,
        SkinType::Sensitive,
    ];

    /// Wire value, as the backend stores it.
    pub fn as_str(self) -> &'static str {
        match self {
            SkinType::Oily => "oily",
            SkinType::Dry => "dry",
            SkinType::Combination => "combination",
            SkinType::Normal => "normal",
            SkinType::Sensitive => "sensitive",
            SkinType::AcneProne => "acne-prone",
            SkinType::All => "all",
        }
    }

    /// Human-facing label for selects and cards.
    pub fn label(self) -> &'static str {
        match self {
            SkinType::Oily => "Oily",
            SkinType::Dry => "Dry",
            SkinType::Combination => "Combination",
            SkinType::Normal => "Normal",
            SkinType::Sensitive => "Sensitive",
            SkinType::AcneProne => "Acne-Prone",
            SkinType::All => "All",
        }
    }
}

impl fmt::Display for SkinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkinType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oily" => Ok(SkinType::Oily),
            "dry" => Ok(SkinType::Dry),
            "combination" => Ok(SkinType::Combination),
            "normal" => Ok(SkinType::Normal),
            "sensitive" => Ok(SkinType::Sensitive),
            "acne-prone" => Ok(SkinType::AcneProne),
            "all" => Ok(SkinType::All),
            _ => Err(()),
        }
    }
}

/// One row of the suggestion dropdown.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Suggestion {
    pub product_id: i64,
    pub product_name: String,
}

/// Product card shape shared by the listing, search, and filter endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSummary {
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub skin_type: Option<String>,
    /// First product image, base64-encoded JPEG, when the row has one.
    #[serde(default)]
    pub image: Option<String>,
}

/// Product card shape of the seller's accepted/rejected lists.
#[derive(Debug, Clone, Deserialize)]
pub struct SellerProductSummary {
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalysisSummary {
    #[serde(default)]
    pub good: u32,
    #[serde(default)]
    pub moderate: u32,
    #[serde(default)]
    pub bad: u32,
    #[serde(default)]
    pub unknown: u32,
}

impl AnalysisSummary {
    pub fn total(&self) -> u32 {
        self.good + self.moderate + self.bad + self.unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IngredientVerdict {
    pub ingredient_name: String,
    #[serde(default)]
    pub verdict: Verdict,
}

/// Analysis result shape shared by the upload, check, and detail endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub overall_verdict: Verdict,
    #[serde(default)]
    pub summary: AnalysisSummary,
    #[serde(default)]
    pub highly_contributing: Vec<IngredientVerdict>,
    #[serde(default)]
    pub moderate_ingredients: Vec<IngredientVerdict>,
    #[serde(default)]
    pub least_contributing: Vec<IngredientVerdict>,
    #[serde(default)]
    pub overall_explanation: String,
}

impl AnalysisReport {
    /// All classified ingredients in contribution order.
    pub fn all_ingredients(&self) -> impl Iterator<Item = &IngredientVerdict> {
        self.highly_contributing
            .iter()
            .chain(self.moderate_ingredients.iter())
            .chain(self.least_contributing.iter())
    }
}

/// Buyer-facing product detail: gallery images plus the stored analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetail {
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub skin_type: Option<String>,
    #[serde(default)]
    pub seller_email: Option<String>,
    /// Base64-encoded JPEGs in display order; the first is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub analysis: AnalysisReport,
}

/// Seller-facing product detail: editable fields with the analysis columns
/// flattened alongside, exactly as the product-manager service returns them.
#[derive(Debug, Clone, Deserialize)]
pub struct SellerProductDetail {
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub skin_type: Option<String>,
    #[serde(flatten)]
    pub analysis: AnalysisReport,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductCounts {
    #[serde(default)]
    pub total_products: u32,
    #[serde(default)]
    pub accepted_products: u32,
    #[serde(default)]
    pub rejected_products: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SellerAccount {
    pub seller_id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub business_license_id: String,
    #[serde(default)]
    pub seller_phno: String,
}

/// Identity block returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginSeller {
    pub seller_id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub business_license_id: String,
    pub seller_phno: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountUpdate {
    pub name: String,
    pub email: String,
    pub business_license_id: String,
    pub seller_phno: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductUpdate {
    pub product_name: String,
    pub description: String,
    pub price: f64,
    pub product_type: String,
    pub brand_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckProductRequest {
    pub prod_type: String,
    pub skin_type: String,
    pub ingredients: String,
}

/// An image file staged for a multipart upload.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything the upload form collects for one product submission.
#[derive(Debug, Clone)]
pub struct NewProductUpload {
    pub seller_id: i64,
    pub product_name: String,
    pub description: String,
    pub price: String,
    pub product_type: String,
    pub brand_name: String,
    pub skin_type: SkinType,
    pub ingredients: String,
    pub images: Vec<ImageAttachment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn verdict_parse_is_case_insensitive() {
        assert_eq!(Verdict::parse("good"), Verdict::Good);
        assert_eq!(Verdict::parse("MODERATE"), Verdict::Moderate);
        assert_eq!(Verdict::parse(" Harmful "), Verdict::Harmful);
        assert_eq!(Verdict::parse("something else"), Verdict::Unknown);
    }

    #[test]
    fn analysis_report_tolerates_missing_sections() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{"overall_verdict": "Good"}"#).expect("decode report");
        assert_eq!(report.overall_verdict, Verdict::Good);
        assert_eq!(report.summary.total(), 0);
        assert_eq!(report.all_ingredients().count(), 0);
        assert_eq!(report.overall_explanation, "");
    }

    #[test]
    fn analysis_report_decodes_full_shape() {
        let raw = r#"{
            "overall_verdict": "Moderate",
            "summary": {"good": 2, "moderate": 1, "bad": 1, "unknown": 3},
            "highly_contributing": [{"ingredient_name": "alcohol denat", "verdict": "bad"}],
            "moderate_ingredients": [{"ingredient_name": "fragrance", "verdict": "Moderate"}],
            "least_contributing": [{"ingredient_name": "glycerin", "verdict": "GOOD"}],
            "overall_explanation": "Mixed bag."
        }"#;
        let report: AnalysisReport = serde_json::from_str(raw).expect("decode report");
        assert_eq!(report.summary.total(), 7);
        let verdicts: Vec<Verdict> = report.all_ingredients().map(|i| i.verdict).collect();
        assert_eq!(verdicts, vec![Verdict::Bad, Verdict::Moderate, Verdict::Good]);
    }

    #[test]
    fn seller_product_detail_flattens_analysis_columns() {
        let raw = r#"{
            "product_id": 9,
            "product_name": "Calm Serum",
            "description": "Soothing",
            "price": 499.0,
            "product_type": "serum",
            "brand_name": "Derma",
            "skin_type": "sensitive",
            "overall_verdict": "Good",
            "summary": {"good": 4, "moderate": 0, "bad": 0, "unknown": 1},
            "overall_explanation": "Mostly safe."
        }"#;
        let detail: SellerProductDetail = serde_json::from_str(raw).expect("decode detail");
        assert_eq!(detail.product_id, 9);
        assert_eq!(detail.analysis.overall_verdict, Verdict::Good);
        assert_eq!(detail.analysis.summary.good, 4);
    }

    #[test]
    fn skin_type_round_trips_through_wire_values() {
        for skin_type in SkinType::ALL {
            assert_eq!(skin_type.as_str().parse::<SkinType>(), Ok(skin_type));
        }
        assert_eq!("Acne-Prone".parse::<SkinType>(), Ok(SkinType::AcneProne));
        assert!("unknown".parse::<SkinType>().is_err());
    }

    #[test]
    fn filterable_skin_types_exclude_all() {
        assert!(!SkinType::FILTERABLE.contains(&SkinType::All));
    }
}
