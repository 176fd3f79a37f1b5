//! LexRag CLI entry point

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

use lexrag::cli::{Args, Commands};
use lexrag::config::Config;
use lexrag::llm::OllamaClient;
use lexrag::pipeline::{PipelineConfig, RagPipeline};
use lexrag::repl::{print_result, run_chat};
use lexrag::rerank::RerankClient;
use lexrag::retrieval::QdrantRetriever;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(message) = args.validate() {
        bail!(message);
    }

    let mut config = Config::load()?;
    apply_overrides(&mut config, &args);

    match &args.command {
        Some(Commands::Config) => {
            println!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
        Some(Commands::Doctor) => return doctor(&config).await,
        _ => {}
    }

    let pipeline = build_pipeline(&config, &args)?;

    match &args.command {
        Some(Commands::Chat) => run_chat(&pipeline, args.naive).await,
        _ => {
            let question = args.question.as_deref().unwrap_or_default();
            let result = if args.naive {
                pipeline.invoke_naive(question).await
            } else {
                pipeline.invoke(question).await
            };
            print_result(&result);
            Ok(())
        }
    }
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(model) = &args.model {
        config.ollama.model = model.clone();
    }
    if let Some(url) = &args.ollama_url {
        config.ollama.url = url.clone();
    }
    if let Some(url) = &args.qdrant_url {
        config.qdrant.url = url.clone();
    }
    if let Some(collection) = &args.collection {
        config.qdrant.collection = collection.clone();
    }
    if let Some(top_k) = args.top_k {
        config.pipeline.top_k = top_k;
    }
    if args.step_back {
        config.pipeline.enable_step_back = true;
    }
}

fn build_pipeline(config: &Config, args: &Args) -> Result<RagPipeline> {
    let ollama = Arc::new(OllamaClient::with_config(
        &config.ollama.url,
        &config.ollama.model,
        &config.ollama.embedding_model,
        config.ollama.temperature,
    )?);

    let retriever = Arc::new(QdrantRetriever::connect(
        &config.qdrant.url,
        ollama.clone(),
        &config.qdrant.collection,
    )?);

    let scorer = Arc::new(RerankClient::new(
        &config.rerank.url,
        &config.rerank.model,
        config.rerank.api_key.clone(),
    )?);

    let pipeline_config = PipelineConfig {
        top_k: config.pipeline.top_k,
        rerank_top_n: config.rerank.top_n,
        naive_top_k: config.pipeline.naive_top_k,
        enable_step_back: config.pipeline.enable_step_back,
        verbose: args.verbose,
    };

    Ok(RagPipeline::new(ollama, retriever, scorer, pipeline_config))
}

async fn doctor(config: &Config) -> Result<()> {
    let ollama = Arc::new(OllamaClient::with_config(
        &config.ollama.url,
        &config.ollama.model,
        &config.ollama.embedding_model,
        config.ollama.temperature,
    )?);

    let ollama_ok = ollama.health_check().await;
    print_check("Ollama", &config.ollama.url, ollama_ok);

    let qdrant_ok = match QdrantRetriever::connect(
        &config.qdrant.url,
        ollama.clone(),
        &config.qdrant.collection,
    ) {
        Ok(retriever) => retriever.health_check().await,
        Err(_) => false,
    };
    print_check(
        &format!("Qdrant ({})", config.qdrant.collection),
        &config.qdrant.url,
        qdrant_ok,
    );

    if !ollama_ok || !qdrant_ok {
        bail!("Hay servicios no disponibles");
    }
    Ok(())
}

fn print_check(name: &str, url: &str, ok: bool) {
    let status = if ok { "ok".green() } else { "sin conexión".red() };
    println!("{:<40} {} [{}]", name, status, url.dimmed());
}
