//! Interactive chat mode
//!
//! Minimal rustyline loop: read a question, run the pipeline, print
//! the answer with its diagnostics.

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Duration;

use crate::pipeline::RagPipeline;
use crate::types::PipelineResult;

/// Run the interactive chat loop until EOF or an exit command
pub async fn run_chat(pipeline: &RagPipeline, naive: bool) -> Result<()> {
    println!("{}", "LexRag - asistente legal peruano".bold());
    println!("{}", "Escribe tu pregunta, o 'salir' para terminar.".dimmed());

    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline("pregunta> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if matches!(question.to_lowercase().as_str(), "salir" | "exit" | "quit") {
                    break;
                }
                editor.add_history_entry(question)?;

                let spinner = thinking_spinner();
                let result = if naive {
                    pipeline.invoke_naive(question).await
                } else {
                    pipeline.invoke(question).await
                };
                spinner.finish_and_clear();

                print_result(&result);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Hasta luego.".dimmed());
    Ok(())
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("spinner template is valid"),
    );
    spinner.set_message("Pensando...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print a pipeline result to stdout
pub fn print_result(result: &PipelineResult) {
    if let Some(error) = &result.error {
        println!("{} {}", "error:".red().bold(), error);
        if result.generated_answer.is_empty() {
            return;
        }
    }

    println!("\n{}", result.generated_answer);

    let mut notes = vec![format!("categoría: {}", result.category)];
    if let Some(corrected) = &result.corrected_question {
        notes.push(format!("corregida: {}", corrected));
    }
    notes.push(format!("pasajes: {}", result.retrieved_context.len()));
    println!("{}", format!("[{}]", notes.join(" | ")).dimmed());

    for discard in &result.discarded_filters {
        println!("{}", format!("filtro descartado - {}", discard).yellow().dimmed());
    }
    println!();
}
