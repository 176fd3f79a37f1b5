//! Deterministic filter validation
//!
//! Applies the domain vocabularies in a fixed priority order and
//! records a discard reason for every rejected field. Validation never
//! fails: malformed input becomes a discard record, not an error.

use crate::filters::vocabulary::{
    is_known_title, ARTICLE_MAX, ARTICLE_MIN, GENERIC_TITLES, VALID_DOCUMENT_TYPES, VALID_SOURCES,
    YEAR_MAX, YEAR_MIN,
};
use crate::types::{ExtractedFilters, FilterField, ValidatedFilterSet};

/// Validate extracted filters against the domain vocabularies
///
/// Priority order: redundant fields, then primary identity fields
/// (document_type, source), then secondary fields (article_number,
/// year, title). The title check depends on an already-accepted
/// document_type, never on the classified category.
pub fn validate_filters(extracted: &ExtractedFilters) -> ValidatedFilterSet {
    let mut set = ValidatedFilterSet::default();

    // Redundant: topic duplicates what the category already implies
    if let Some(topic) = &extracted.topic {
        set.discard(FilterField::Topic, topic.clone().into(), "redundante");
    }

    if let Some(document_type) = &extracted.document_type {
        if VALID_DOCUMENT_TYPES.contains(&document_type.as_str()) {
            set.accept(FilterField::DocumentType, document_type.clone().into());
        } else {
            set.discard(
                FilterField::DocumentType,
                document_type.clone().into(),
                "valor inválido",
            );
        }
    }

    if let Some(source) = &extracted.source {
        if VALID_SOURCES.contains(&source.as_str()) {
            set.accept(FilterField::Source, source.clone().into());
        } else {
            set.discard(FilterField::Source, source.clone().into(), "valor inválido");
        }
    }

    if let Some(article_number) = extracted.article_number {
        if (ARTICLE_MIN..=ARTICLE_MAX).contains(&article_number) {
            set.accept(FilterField::ArticleNumber, article_number.into());
        } else {
            set.discard(
                FilterField::ArticleNumber,
                article_number.into(),
                "número inválido",
            );
        }
    }

    if let Some(year) = extracted.year {
        if (YEAR_MIN..=YEAR_MAX).contains(&year) {
            set.accept(FilterField::Year, year.into());
        } else {
            set.discard(FilterField::Year, year.into(), "año inválido");
        }
    }

    if let Some(title) = &extracted.title {
        validate_title(title, &mut set);
    }

    set
}

fn validate_title(title: &str, set: &mut ValidatedFilterSet) {
    if GENERIC_TITLES.contains(&title) {
        set.discard(FilterField::Title, title.to_string().into(), "genérico");
        return;
    }

    if let Some(document_type) = set
        .get(FilterField::DocumentType)
        .and_then(|v| v.as_text())
        .map(str::to_string)
    {
        if !is_known_title(&document_type, title) {
            set.discard(
                FilterField::Title,
                title.to_string().into(),
                format!("no coincide con {}", document_type),
            );
            return;
        }
    }

    set.accept(FilterField::Title, title.to_string().into());
}
