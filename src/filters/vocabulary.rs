//! Domain vocabularies for filter validation
//!
//! Fixed tables describing what the indexed corpus actually contains.
//! Validation accepts only values present here; everything else is
//! metadata noise extracted from free text.

use crate::retrieval::filter_expr::FilterExpression;
use crate::types::{Category, FilterField};

/// Valid `document_type` payload values
pub const VALID_DOCUMENT_TYPES: [&str; 3] = ["constitucion", "decreto", "faq"];

/// Valid `source` payload values
pub const VALID_SOURCES: [&str; 3] = [
    "Constitución Política del Perú",
    "Compendio Derecho Laboral",
    "Preguntas Frecuentes",
];

/// Generic placeholder titles that never identify a single document
pub const GENERIC_TITLES: [&str; 6] = [
    "Constitución",
    "Constitución Política",
    "Decreto",
    "Decreto Legislativo",
    "FAQ",
    "Pregunta",
];

/// Decree titles present in the labor-law compendium
pub const DECRETO_TITLES: [&str; 3] = [
    "Decreto Legislativo N.° 728",
    "Decreto Legislativo N.° 713",
    "Decreto Legislativo N.° 650",
];

/// Constitution article number range
pub const ARTICLE_MIN: i64 = 1;
pub const ARTICLE_MAX: i64 = 206;

/// Accepted legislation year range
pub const YEAR_MIN: i64 = 1990;
pub const YEAR_MAX: i64 = 2024;

/// Number of indexed FAQ entries
const FAQ_COUNT: i64 = 10;

/// Whether `title` belongs to the known-title set of `document_type`
///
/// Document types without a title table accept any title.
pub fn is_known_title(document_type: &str, title: &str) -> bool {
    match document_type {
        "constitucion" => numbered_title(title, "Artículo ", ARTICLE_MIN, ARTICLE_MAX),
        "decreto" => DECRETO_TITLES.contains(&title),
        "faq" => numbered_title(title, "Pregunta Frecuente ", 1, FAQ_COUNT),
        _ => true,
    }
}

fn numbered_title(title: &str, prefix: &str, min: i64, max: i64) -> bool {
    title
        .strip_prefix(prefix)
        .and_then(|rest| rest.parse::<i64>().ok())
        .map(|n| (min..=max).contains(&n))
        .unwrap_or(false)
}

/// Category-intrinsic (source, document_type, topic) triple
///
/// Pure function of the category; `general` has no fixed metadata.
pub fn fixed_metadata_for(category: Category) -> FilterExpression {
    match category {
        Category::Constitucion => FilterExpression::new()
            .eq(FilterField::Source, "Constitución Política del Perú")
            .eq(FilterField::DocumentType, "constitucion")
            .eq(FilterField::Topic, "derechos_fundamentales"),
        Category::DerechoLaboral => FilterExpression::new()
            .eq(FilterField::Source, "Compendio Derecho Laboral")
            .eq(FilterField::DocumentType, "decreto")
            .eq(FilterField::Topic, "derecho_laboral"),
        Category::Faq => FilterExpression::new()
            .eq(FilterField::Source, "Preguntas Frecuentes")
            .eq(FilterField::DocumentType, "faq")
            .eq(FilterField::Topic, "Preguntas Frecuentes"),
        Category::General => FilterExpression::new(),
    }
}
