//! Question routing stages
//!
//! Spell-check normalization, semantic category classification, and
//! step-back question generation. Every stage here fails open.

pub mod classifier;
pub mod normalizer;
pub mod prompts;
pub mod step_back;

pub use classifier::CategoryClassifier;
pub use normalizer::{Normalized, QuestionNormalizer};
pub use step_back::StepBackGenerator;
