//! Question classification types
//!
//! Output shapes for the spell-check router and the semantic category
//! classifier. Both are decoded defensively from model output; missing
//! or malformed fields fall back to safe defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document family a question targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Constitución Política del Perú
    Constitucion,
    /// Compendio de Derecho Laboral (decretos legislativos)
    DerechoLaboral,
    /// Preguntas frecuentes
    Faq,
    /// No specific corpus - pure semantic search
    General,
}

impl Category {
    /// Stable corpus vocabulary name
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Constitucion => "constitucion",
            Category::DerechoLaboral => "derecho_laboral",
            Category::Faq => "faq",
            Category::General => "general",
        }
    }

    /// Tolerant parse of classifier output; unknown values map to None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "constitucion" | "constitución" => Some(Category::Constitucion),
            "derecho_laboral" | "derecho laboral" => Some(Category::DerechoLaboral),
            "faq" => Some(Category::Faq),
            "general" => Some(Category::General),
            _ => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic classification of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    /// Confidence in [0.0, 1.0]
    pub confidence: f64,
    pub reasoning: String,
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self {
            category: Category::General,
            confidence: 0.5,
            reasoning: "Sin razonamiento".to_string(),
        }
    }
}

/// Spell-check output from the quality router
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellCheck {
    #[serde(default)]
    pub has_spelling_errors: bool,
    #[serde(default)]
    pub corrected_question: Option<String>,
}
