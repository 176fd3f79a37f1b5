//! Metadata filter expressions
//!
//! A filter is a boolean AND of equality/membership predicates over the
//! fixed metadata schema. The empty expression means unfiltered search.
//! Conversion to the vector store's native filter lives in the store
//! adapter; this type only knows the neutral wire form.

use serde_json::json;
use std::collections::BTreeMap;

use crate::types::{FilterField, FilterValue};

/// One predicate over a metadata field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    Eq(FilterValue),
    In(Vec<FilterValue>),
}

/// AND of per-field predicates, at most one per field
///
/// Fields iterate in `FilterField` declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpression {
    clauses: BTreeMap<FilterField, FilterClause>,
}

impl FilterExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style equality predicate
    pub fn eq(mut self, field: FilterField, value: impl Into<FilterValue>) -> Self {
        self.insert(field, FilterClause::Eq(value.into()));
        self
    }

    pub fn insert(&mut self, field: FilterField, clause: FilterClause) {
        self.clauses.insert(field, clause);
    }

    pub fn remove(&mut self, field: FilterField) -> Option<FilterClause> {
        self.clauses.remove(&field)
    }

    pub fn contains(&self, field: FilterField) -> bool {
        self.clauses.contains_key(&field)
    }

    /// Equality value for a field, if present
    pub fn get(&self, field: FilterField) -> Option<&FilterValue> {
        match self.clauses.get(&field) {
            Some(FilterClause::Eq(value)) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FilterField> + '_ {
        self.clauses.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &FilterClause)> {
        self.clauses.iter().map(|(field, clause)| (*field, clause))
    }

    /// Comma-separated field list for diagnostics
    pub fn field_names(&self) -> String {
        self.fields()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Neutral wire form
    ///
    /// Empty → `null`; one predicate → `{field: {eq: v}}`; several →
    /// `{"and": [predicate, ...]}`. Membership uses `{field: {in: [..]}}`.
    pub fn to_wire(&self) -> serde_json::Value {
        let predicates: Vec<serde_json::Value> = self
            .iter()
            .map(|(field, clause)| match clause {
                FilterClause::Eq(value) => json!({ field.as_str(): { "eq": value } }),
                FilterClause::In(values) => json!({ field.as_str(): { "in": values } }),
            })
            .collect();

        match predicates.len() {
            0 => serde_json::Value::Null,
            1 => predicates.into_iter().next().expect("one predicate"),
            _ => json!({ "and": predicates }),
        }
    }
}
