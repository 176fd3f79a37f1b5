//! Retrieval strategy cascade
//!
//! Builds an ordered sequence of filter combinations from most to
//! least restrictive, ending in an unfiltered terminal strategy, then
//! executes them sequentially until one yields documents. The terminal
//! strategy guarantees retrieval is never blocked by an
//! over-constrained or mis-extracted filter.

use std::sync::Arc;

use crate::filters::fixed_metadata_for;
use crate::retrieval::filter_expr::{FilterClause, FilterExpression};
use crate::retrieval::store::DocumentRetriever;
use crate::types::{Category, Document, FilterField, ValidatedFilterSet};

/// A candidate filter combination, tried in list order
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalStrategy {
    pub name: &'static str,
    pub filters: FilterExpression,
    pub description: String,
}

impl RetrievalStrategy {
    fn new(name: &'static str, filters: FilterExpression) -> Self {
        let description = if filters.is_empty() {
            "Búsqueda semántica pura en toda la colección".to_string()
        } else {
            format!("Filtros: [{}]", filters.field_names())
        };
        Self {
            name,
            filters,
            description,
        }
    }
}

/// Build the cascade for a validated filter set and category
///
/// A strategy is appended only when its filter set differs from the
/// previously appended one. The terminal unfiltered strategy is always
/// present, exactly once, last.
pub fn build_strategies(
    validated: &ValidatedFilterSet,
    category: Category,
) -> Vec<RetrievalStrategy> {
    let fixed = fixed_metadata_for(category);
    let mut strategies: Vec<RetrievalStrategy> = Vec::new();

    let push = |strategies: &mut Vec<RetrievalStrategy>, name, filters: FilterExpression| {
        if strategies.last().map(|s| &s.filters) == Some(&filters) {
            return;
        }
        strategies.push(RetrievalStrategy::new(name, filters));
    };

    if validated.has_variables() && !fixed.is_empty() {
        // All filters: fixed triple plus every validated variable field
        let full = overlay(&fixed, validated, &[]);
        push(&mut strategies, "todos_filtros", full);

        // Title is the least reliable field; drop it first
        let without_title = overlay(&fixed, validated, &[FilterField::Title]);
        if without_title.len() > fixed.len() {
            push(&mut strategies, "sin_title", without_title);
        }

        let mut base = fixed.clone();
        base.remove(FilterField::DocumentType);
        let without_doc_type = overlay(
            &base,
            validated,
            &[FilterField::Title, FilterField::DocumentType],
        );
        if !without_doc_type.is_empty() {
            push(&mut strategies, "sin_document_type", without_doc_type);
        }

        base.remove(FilterField::Year);
        let without_year = overlay(
            &base,
            validated,
            &[FilterField::Title, FilterField::DocumentType, FilterField::Year],
        );
        if !without_year.is_empty() {
            push(&mut strategies, "sin_year", without_year);
        }
    }

    if !fixed.is_empty() {
        let mut basic = FilterExpression::new();
        for field in [FilterField::Source, FilterField::Topic] {
            if let Some(value) = fixed.get(field) {
                basic.insert(field, FilterClause::Eq(value.clone()));
            }
        }
        if !basic.is_empty() {
            push(&mut strategies, "solo_basicos", basic);
        }
    }

    strategies.push(RetrievalStrategy::new("sin_filtros", FilterExpression::new()));
    strategies
}

/// Fixed filters overlaid with validated variables, skipping `exclude`
fn overlay(
    fixed: &FilterExpression,
    validated: &ValidatedFilterSet,
    exclude: &[FilterField],
) -> FilterExpression {
    let mut combined = fixed.clone();
    for (field, value) in &validated.accepted {
        if !exclude.contains(field) {
            combined.insert(*field, FilterClause::Eq(value.clone()));
        }
    }
    combined
}

/// Executes the cascade against the retrieval capability
pub struct StrategyCascade {
    retriever: Arc<dyn DocumentRetriever>,
    top_k: usize,
    verbose: bool,
}

impl StrategyCascade {
    pub fn new(retriever: Arc<dyn DocumentRetriever>, top_k: usize, verbose: bool) -> Self {
        Self {
            retriever,
            top_k,
            verbose,
        }
    }

    /// Run strategies in order, returning the first non-empty result
    ///
    /// A failing search call counts as an empty result and the cascade
    /// moves on. Exhausting every strategy (terminal included) returns
    /// an empty set; that is a valid "no matching context" outcome, not
    /// an error.
    pub async fn retrieve(
        &self,
        question: &str,
        validated: &ValidatedFilterSet,
        category: Category,
    ) -> Vec<Document> {
        let strategies = build_strategies(validated, category);

        for (i, strategy) in strategies.iter().enumerate() {
            match self
                .retriever
                .search(question, &strategy.filters, self.top_k)
                .await
            {
                Ok(documents) if !documents.is_empty() => {
                    if self.verbose {
                        eprintln!(
                            "[CASCADE] {}/{} '{}' -> {} documentos",
                            i + 1,
                            strategies.len(),
                            strategy.name,
                            documents.len()
                        );
                    }
                    return documents;
                }
                Ok(_) => {
                    if self.verbose {
                        eprintln!(
                            "[CASCADE] {}/{} '{}' sin resultados",
                            i + 1,
                            strategies.len(),
                            strategy.name
                        );
                    }
                }
                Err(e) => {
                    if self.verbose {
                        eprintln!(
                            "[CASCADE] {}/{} '{}' falló, se continúa: {}",
                            i + 1,
                            strategies.len(),
                            strategy.name,
                            e
                        );
                    }
                }
            }
        }

        Vec::new()
    }

    /// One unfiltered search, used for step-back context retrieval
    pub async fn retrieve_unfiltered(&self, question: &str) -> Vec<Document> {
        self.retrieve_unfiltered_with_limit(question, self.top_k).await
    }

    /// Unfiltered search with an explicit result limit (naive mode)
    pub async fn retrieve_unfiltered_with_limit(
        &self,
        question: &str,
        top_k: usize,
    ) -> Vec<Document> {
        self.retriever
            .search(question, &FilterExpression::new(), top_k)
            .await
            .unwrap_or_default()
    }
}
