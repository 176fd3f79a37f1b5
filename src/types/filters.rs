//! Structured metadata filter types
//!
//! `ExtractedFilters` is the raw (possibly hallucinated) model output;
//! `ValidatedFilterSet` is the deterministic, vocabulary-checked form
//! consumed by the retrieval cascade. Discards are data, not errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata fields recognized by the retrieval schema
///
/// Declaration order fixes the iteration order of validated sets and
/// wire filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    DocumentType,
    Source,
    Title,
    ArticleNumber,
    Year,
    Topic,
}

impl FilterField {
    /// Wire name used in filter expressions and payload keys
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::DocumentType => "document_type",
            FilterField::Source => "source",
            FilterField::Title => "title",
            FilterField::ArticleNumber => "article_number",
            FilterField::Year => "year",
            FilterField::Topic => "topic",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar filter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl FilterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            FilterValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(n) => Some(*n),
            FilterValue::Text(_) => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Integer(n) => write!(f, "{}", n),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

/// Variable metadata extracted from the question text
///
/// Every field is optional; values arrive unvalidated and may be
/// nonsense. Only the validator decides what reaches retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFilters {
    #[serde(default)]
    pub article_number: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl ExtractedFilters {
    pub fn is_empty(&self) -> bool {
        self.article_number.is_none()
            && self.title.is_none()
            && self.year.is_none()
            && self.source.is_none()
            && self.document_type.is_none()
            && self.topic.is_none()
    }
}

/// A field rejected during validation, with its human-readable reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardedFilter {
    pub field: FilterField,
    pub value: FilterValue,
    pub reason: String,
}

impl fmt::Display for DiscardedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.value, self.reason)
    }
}

/// Vocabulary-checked filter set
///
/// Invariant: every accepted value satisfies its field's domain
/// constraint. Accepted fields iterate in `FilterField` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatedFilterSet {
    pub accepted: BTreeMap<FilterField, FilterValue>,
    pub discarded: Vec<DiscardedFilter>,
}

impl ValidatedFilterSet {
    pub fn accept(&mut self, field: FilterField, value: FilterValue) {
        self.accepted.insert(field, value);
    }

    pub fn discard(&mut self, field: FilterField, value: FilterValue, reason: impl Into<String>) {
        self.discarded.push(DiscardedFilter {
            field,
            value,
            reason: reason.into(),
        });
    }

    pub fn get(&self, field: FilterField) -> Option<&FilterValue> {
        self.accepted.get(&field)
    }

    /// True when at least one variable field survived validation
    pub fn has_variables(&self) -> bool {
        !self.accepted.is_empty()
    }
}
