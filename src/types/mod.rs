//! Core data types exchanged between pipeline stages
//!
//! All entities here are created fresh per incoming question and never
//! shared mutably across concurrent invocations.

pub mod classification;
pub mod documents;
pub mod filters;

pub use classification::{Category, ClassificationResult, SpellCheck};
pub use documents::{Document, PipelineResult, RerankResult};
pub use filters::{
    DiscardedFilter, ExtractedFilters, FilterField, FilterValue, ValidatedFilterSet,
};
