//! End-to-end pipeline tests with mock capabilities
//!
//! Exercises the full orchestration flow without Ollama or qdrant:
//! scripted model outputs, a filter-driven retriever with call
//! instrumentation, and a deterministic scorer.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lexrag::errors::{RagError, Result};
use lexrag::llm::CompletionModel;
use lexrag::pipeline::{PipelineConfig, RagPipeline, EMPTY_QUESTION_ERROR};
use lexrag::rerank::{PairScore, RelevanceScorer};
use lexrag::retrieval::{DocumentRetriever, FilterExpression};
use lexrag::types::{Category, Document, FilterField};

/// Model with one scripted JSON response per routing stage
///
/// Stage dispatch keys off the system prompt; an empty script makes
/// that stage fail, exercising its fallback policy.
struct ScriptedModel {
    spell: String,
    classification: String,
    extraction: String,
    step_back: String,
    answer: String,
    json_calls: AtomicUsize,
    complete_calls: AtomicUsize,
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self {
            spell: r#"{"has_spelling_errors": false, "corrected_question": null}"#.to_string(),
            classification:
                r#"{"category": "general", "confidence": 0.5, "reasoning": "sin señales"}"#
                    .to_string(),
            extraction: r#"{"article_number": null, "title": null, "year": null}"#.to_string(),
            step_back: r#"{"step_back_question": "¿Qué principios aplican?"}"#.to_string(),
            answer: "Respuesta generada.".to_string(),
            json_calls: AtomicUsize::new(0),
            complete_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        if self.answer.is_empty() {
            return Err(RagError::OllamaApi("scripted composition failure".to_string()));
        }
        Ok(self.answer.clone())
    }

    async fn complete_json(&self, system: &str, _user: &str) -> Result<serde_json::Value> {
        self.json_calls.fetch_add(1, Ordering::SeqCst);
        let script = if system.contains("corrector ortográfico") {
            &self.spell
        } else if system.contains("clasificación de documentos") {
            &self.classification
        } else if system.contains("análisis de texto legal") {
            &self.extraction
        } else if system.contains("preguntas de alto nivel") {
            &self.step_back
        } else {
            return Err(RagError::JsonParse("unknown stage prompt".to_string()));
        };

        if script.is_empty() {
            return Err(RagError::JsonParse("scripted failure".to_string()));
        }
        serde_json::from_str(script).map_err(|e| RagError::JsonParse(e.to_string()))
    }
}

/// Retriever whose results are a pure function of the filter
struct FilterDrivenRetriever {
    respond: Box<dyn Fn(&FilterExpression) -> Vec<Document> + Send + Sync>,
    calls: AtomicUsize,
    seen: Mutex<Vec<FilterExpression>>,
}

impl FilterDrivenRetriever {
    fn new(respond: impl Fn(&FilterExpression) -> Vec<Document> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen_filters(&self) -> Vec<FilterExpression> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentRetriever for FilterDrivenRetriever {
    async fn search(
        &self,
        _query: &str,
        filter: &FilterExpression,
        _top_k: usize,
    ) -> Result<Vec<Document>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(filter.clone());
        Ok((self.respond)(filter))
    }
}

/// Scores candidates by submission order (index 0 highest)
struct IdentityScorer {
    calls: AtomicUsize,
}

impl IdentityScorer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RelevanceScorer for IdentityScorer {
    async fn score_pairs(&self, _query: &str, candidates: &[String]) -> Result<Vec<PairScore>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(candidates
            .iter()
            .enumerate()
            .map(|(index, _)| PairScore {
                index,
                score: 1.0 - index as f32 * 0.01,
            })
            .collect())
    }
}

fn article_doc(n: i64) -> Document {
    let mut metadata = serde_json::Map::new();
    metadata.insert("article_number".to_string(), serde_json::json!(n));
    metadata.insert("document_type".to_string(), serde_json::json!("constitucion"));
    Document::with_metadata(format!("Artículo {}. Toda persona tiene derecho...", n), metadata)
}

fn pipeline_with(
    model: Arc<ScriptedModel>,
    retriever: Arc<FilterDrivenRetriever>,
    config: PipelineConfig,
) -> RagPipeline {
    RagPipeline::new(model, retriever, Arc::new(IdentityScorer::new()), config)
}

#[tokio::test]
async fn scenario_a_specific_article_short_circuits_on_full_strategy() {
    let model = Arc::new(ScriptedModel {
        classification:
            r#"{"category": "constitucion", "confidence": 0.95, "reasoning": "menciona un artículo"}"#
                .to_string(),
        extraction: r#"{"article_number": 2, "title": null, "year": null}"#.to_string(),
        ..ScriptedModel::default()
    });

    // Only the full strategy (fixed triple + article number) has results
    let retriever = Arc::new(FilterDrivenRetriever::new(|filter| {
        if filter.contains(FilterField::ArticleNumber) && filter.contains(FilterField::DocumentType)
        {
            vec![article_doc(2)]
        } else {
            Vec::new()
        }
    }));

    let pipeline = pipeline_with(model, retriever.clone(), PipelineConfig::default());
    let result = pipeline.invoke("¿Qué dice el artículo 2 de la Constitución?").await;

    assert_eq!(result.category, Category::Constitucion);
    assert!(result.error.is_none());
    assert_eq!(result.retrieved_context.len(), 1);
    assert!(result.retrieved_context[0].contains("Artículo 2"));

    // The first strategy succeeded, so exactly one search ran
    assert_eq!(retriever.call_count(), 1);
    let filter = &retriever.seen_filters()[0];
    assert_eq!(
        filter.get(FilterField::DocumentType).and_then(|v| v.as_text()),
        Some("constitucion")
    );
    assert_eq!(
        filter.get(FilterField::ArticleNumber).and_then(|v| v.as_integer()),
        Some(2)
    );
}

#[tokio::test]
async fn scenario_b_mismatched_title_is_discarded_and_never_filters_retrieval() {
    let model = Arc::new(ScriptedModel {
        classification:
            r#"{"category": "derecho_laboral", "confidence": 0.9, "reasoning": "tema laboral"}"#
                .to_string(),
        // A constitution-style title under a decreto document type
        extraction:
            r#"{"article_number": null, "title": "Artículo 5", "year": 1997, "document_type": "decreto"}"#
                .to_string(),
        ..ScriptedModel::default()
    });

    let retriever = Arc::new(FilterDrivenRetriever::new(|filter| {
        if filter.contains(FilterField::Year) {
            vec![Document::new("Decreto sobre descanso remunerado, 1997")]
        } else {
            Vec::new()
        }
    }));

    let pipeline = pipeline_with(model, retriever.clone(), PipelineConfig::default());
    let result = pipeline.invoke("¿Qué decreto de 1997 regula el Artículo 5?").await;

    let title_discard = result
        .discarded_filters
        .iter()
        .find(|d| d.field == FilterField::Title)
        .expect("title must be discarded");
    assert_eq!(title_discard.reason, "no coincide con decreto");

    // Retrieval proceeded without the title in any strategy
    assert!(result.error.is_none());
    assert!(!result.retrieved_context.is_empty());
    for filter in retriever.seen_filters() {
        assert!(!filter.contains(FilterField::Title));
    }
}

#[tokio::test]
async fn scenario_c_exhausted_cascade_yields_empty_context_without_error() {
    let model = Arc::new(ScriptedModel {
        classification: r#"{"category": "faq", "confidence": 0.85, "reasoning": "trámite"}"#
            .to_string(),
        answer: "La información no se encuentra en el contexto proporcionado".to_string(),
        ..ScriptedModel::default()
    });

    let retriever = Arc::new(FilterDrivenRetriever::new(|_| Vec::new()));

    let pipeline = pipeline_with(model, retriever.clone(), PipelineConfig::default());
    let result = pipeline.invoke("¿Cómo tramito un duplicado de DNI?").await;

    assert_eq!(result.category, Category::Faq);
    assert!(result.retrieved_context.is_empty());
    assert!(result.error.is_none());
    assert!(result.generated_answer.contains("no se encuentra"));

    // faq has a fixed triple and no variables: solo_basicos + terminal
    assert_eq!(retriever.call_count(), 2);
    let filters = retriever.seen_filters();
    assert!(filters.last().unwrap().is_empty());
}

#[tokio::test]
async fn cascade_stops_at_first_non_empty_strategy() {
    let model = Arc::new(ScriptedModel {
        classification:
            r#"{"category": "constitucion", "confidence": 0.9, "reasoning": "derechos"}"#.to_string(),
        extraction: r#"{"article_number": 300}"#.to_string(),
        ..ScriptedModel::default()
    });

    // article_number 300 is out of range, so strategies are
    // solo_basicos then sin_filtros; only the terminal one matches
    let retriever = Arc::new(FilterDrivenRetriever::new(|filter| {
        if filter.is_empty() {
            vec![Document::new("contexto genérico")]
        } else {
            Vec::new()
        }
    }));

    let pipeline = pipeline_with(model.clone(), retriever.clone(), PipelineConfig::default());
    let result = pipeline.invoke("¿Qué dice el artículo 300?").await;

    assert_eq!(retriever.call_count(), 2);
    assert_eq!(result.retrieved_context, vec!["contexto genérico".to_string()]);

    // The invalid number was discarded and never filtered a search
    assert!(result
        .discarded_filters
        .iter()
        .any(|d| d.field == FilterField::ArticleNumber && d.reason == "número inválido"));
    for filter in retriever.seen_filters() {
        assert!(!filter.contains(FilterField::ArticleNumber));
    }
}

#[tokio::test]
async fn spelling_correction_is_reported_and_used() {
    let model = Arc::new(ScriptedModel {
        spell:
            r#"{"has_spelling_errors": true, "corrected_question": "¿Qué dice la Constitución?"}"#
                .to_string(),
        ..ScriptedModel::default()
    });
    let retriever = Arc::new(FilterDrivenRetriever::new(|_| {
        vec![Document::new("contexto")]
    }));

    let pipeline = pipeline_with(model, retriever, PipelineConfig::default());
    let result = pipeline.invoke("que dice la constitucion").await;

    assert_eq!(result.question, "que dice la constitucion");
    assert_eq!(
        result.corrected_question.as_deref(),
        Some("¿Qué dice la Constitución?")
    );
}

#[tokio::test]
async fn classifier_failure_degrades_to_general() {
    let model = Arc::new(ScriptedModel {
        classification: String::new(), // scripted failure
        ..ScriptedModel::default()
    });
    let retriever = Arc::new(FilterDrivenRetriever::new(|_| Vec::new()));

    let pipeline = pipeline_with(model, retriever.clone(), PipelineConfig::default());
    let result = pipeline.invoke("¿pregunta rara?").await;

    assert_eq!(result.category, Category::General);
    assert!(result.error.is_none());
    // general with no variables: only the terminal strategy runs
    assert_eq!(retriever.call_count(), 1);
}

#[tokio::test]
async fn composition_failure_is_surfaced_in_error_field() {
    let model = Arc::new(ScriptedModel {
        answer: String::new(), // scripted composition failure
        ..ScriptedModel::default()
    });
    let retriever = Arc::new(FilterDrivenRetriever::new(|_| {
        vec![Document::new("contexto")]
    }));

    let pipeline = pipeline_with(model, retriever, PipelineConfig::default());
    let result = pipeline.invoke("¿pregunta?").await;

    assert_eq!(result.generated_answer, "");
    assert!(result.error.as_deref().unwrap().contains("Error al generar"));
    // Still a well-formed result with its retrieved context
    assert_eq!(result.retrieved_context.len(), 1);
}

#[tokio::test]
async fn empty_question_is_rejected_without_any_capability_call() {
    let model = Arc::new(ScriptedModel::default());
    let retriever = Arc::new(FilterDrivenRetriever::new(|_| {
        vec![Document::new("contexto")]
    }));
    let scorer = Arc::new(IdentityScorer::new());
    let pipeline = RagPipeline::new(
        model.clone(),
        retriever.clone(),
        scorer.clone(),
        PipelineConfig::default(),
    );

    for question in ["", "   "] {
        let result = pipeline.invoke(question).await;
        assert_eq!(result.error.as_deref(), Some(EMPTY_QUESTION_ERROR));
        assert_eq!(result.generated_answer, "");
        assert!(result.retrieved_context.is_empty());
    }

    assert_eq!(model.json_calls.load(Ordering::SeqCst), 0);
    assert_eq!(model.complete_calls.load(Ordering::SeqCst), 0);
    assert_eq!(retriever.call_count(), 0);
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn identical_invocations_yield_identical_results() {
    let model = Arc::new(ScriptedModel {
        classification:
            r#"{"category": "constitucion", "confidence": 0.95, "reasoning": "artículo"}"#.to_string(),
        extraction: r#"{"article_number": 2}"#.to_string(),
        ..ScriptedModel::default()
    });
    let retriever = Arc::new(FilterDrivenRetriever::new(|filter| {
        if filter.contains(FilterField::ArticleNumber) {
            vec![article_doc(2)]
        } else {
            Vec::new()
        }
    }));

    let pipeline = pipeline_with(model, retriever, PipelineConfig::default());
    let first = pipeline.invoke("¿Qué dice el artículo 2?").await;
    let second = pipeline.invoke("¿Qué dice el artículo 2?").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn rerank_caps_retrieved_context_to_top_n() {
    let model = Arc::new(ScriptedModel::default());
    let retriever = Arc::new(FilterDrivenRetriever::new(|_| {
        (0..12).map(|i| Document::new(format!("pasaje {}", i))).collect()
    }));

    let config = PipelineConfig {
        rerank_top_n: 4,
        ..PipelineConfig::default()
    };
    let pipeline = pipeline_with(model, retriever, config);
    let result = pipeline.invoke("¿pregunta?").await;

    assert_eq!(result.retrieved_context.len(), 4);
    assert_eq!(result.retrieved_context[0], "pasaje 0");
}

#[tokio::test]
async fn step_back_variant_merges_and_deduplicates_contexts() {
    let model = Arc::new(ScriptedModel {
        classification:
            r#"{"category": "constitucion", "confidence": 0.9, "reasoning": "principios"}"#
                .to_string(),
        ..ScriptedModel::default()
    });

    // Filtered searches return the specific passage; the unfiltered
    // step-back search returns a shared passage plus a general one
    let retriever = Arc::new(FilterDrivenRetriever::new(|filter| {
        if filter.is_empty() {
            vec![
                Document::new("pasaje compartido"),
                Document::new("pasaje general"),
            ]
        } else {
            vec![Document::new("pasaje compartido")]
        }
    }));

    let config = PipelineConfig {
        enable_step_back: true,
        ..PipelineConfig::default()
    };
    let pipeline = pipeline_with(model, retriever, config);
    let result = pipeline.invoke("¿Por qué el Perú tiene esa forma de gobierno?").await;

    assert!(result.error.is_none());
    assert_eq!(
        result.retrieved_context,
        vec!["pasaje compartido".to_string(), "pasaje general".to_string()]
    );
}

#[tokio::test]
async fn naive_mode_runs_single_unfiltered_search() {
    let model = Arc::new(ScriptedModel::default());
    let retriever = Arc::new(FilterDrivenRetriever::new(|filter| {
        assert!(filter.is_empty());
        vec![Document::new("pasaje directo")]
    }));

    let pipeline = pipeline_with(model.clone(), retriever.clone(), PipelineConfig::default());
    let result = pipeline.invoke_naive("¿Qué dice la Constitución?").await;

    assert_eq!(retriever.call_count(), 1);
    assert_eq!(result.retrieved_context, vec!["pasaje directo".to_string()]);
    assert_eq!(result.category, Category::General);
    // No routing calls were made
    assert_eq!(model.json_calls.load(Ordering::SeqCst), 0);
}
