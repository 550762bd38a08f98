//! Command handlers
//!
//! Each handler wires together config, provider, and database for one CLI
//! command, then renders the result as text or JSON.

use anyhow::{Context, Result};
use serde_json::json;

use crate::config::Config;
use crate::db::{BatchRecord, Database, IdeaRecord};
use crate::llm::openrouter::OpenRouterProvider;
use crate::pipeline::{self, RunOptions};

/// How a handler renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Handle the `run` command: execute one full pipeline run.
pub async fn handle_run(
    config: &Config,
    date: Option<String>,
    max_per_category: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let api_key = Config::openrouter_api_key()
        .context("set OPENROUTER_API_KEY before running the pipeline")?;
    let provider = OpenRouterProvider::new(config.openrouter.clone(), api_key);

    let db = Database::new(&config.db_path()).await?;
    let summary = pipeline::run(
        config,
        &provider,
        &db,
        RunOptions {
            date,
            max_per_category,
        },
    )
    .await;
    db.close().await?;
    let summary = summary?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("Batch {} persisted", summary.batch_date);
            println!("  papers fetched:  {}", summary.papers_fetched);
            println!("  ideas persisted: {}", summary.ideas_persisted);
            println!(
                "  categories:      {} lucrative / {} promising / {} considerable / {} backlog",
                summary.counts.lucrative,
                summary.counts.promising,
                summary.counts.considerable,
                summary.counts.backlog
            );
            if !summary.research_themes.is_empty() {
                println!("  themes:");
                for theme in &summary.research_themes {
                    println!("    - {}", theme);
                }
            }
        }
    }

    Ok(())
}

/// Handle the `latest` command: show the most recent batch.
pub async fn handle_latest(config: &Config, format: OutputFormat) -> Result<()> {
    let db = Database::new(&config.db_path()).await?;
    let store = db.store();

    let batch = store.latest_batch().await?;
    match batch {
        Some(batch) => {
            let ideas = store.ideas_for_batch(&batch.id).await?;
            db.close().await?;
            render_batch(&batch, &ideas, format)
        }
        None => {
            db.close().await?;
            match format {
                OutputFormat::Json => println!("null"),
                OutputFormat::Text => println!("No batches stored yet. Run `mvpforge run` first."),
            }
            Ok(())
        }
    }
}

/// Handle the `show` command: show the batch for a specific date.
pub async fn handle_show(config: &Config, date: &str, format: OutputFormat) -> Result<()> {
    let db = Database::new(&config.db_path()).await?;
    let store = db.store();

    let batch = store.batch_by_date(date).await?;
    match batch {
        Some(batch) => {
            let ideas = store.ideas_for_batch(&batch.id).await?;
            db.close().await?;
            render_batch(&batch, &ideas, format)
        }
        None => {
            db.close().await?;
            match format {
                OutputFormat::Json => println!("null"),
                OutputFormat::Text => println!("No batch stored for {}.", date),
            }
            Ok(())
        }
    }
}

fn render_batch(batch: &BatchRecord, ideas: &[IdeaRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let payload = json!({
                "batch": batch,
                "ideas": ideas,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            println!("Batch {} ({} ideas)", batch.date, ideas.len());
            if !batch.research_themes.is_empty() {
                println!("Themes:");
                for theme in &batch.research_themes {
                    println!("  - {}", theme);
                }
            }
            println!();

            // Best ideas first
            let mut sorted: Vec<&IdeaRecord> = ideas.iter().collect();
            sorted.sort_by(|a, b| b.total_score.cmp(&a.total_score));

            for idea in sorted {
                println!(
                    "[{}] {} ({}/40)",
                    idea.category, idea.startup_name, idea.total_score
                );
                if !idea.value_proposition.is_empty() {
                    println!("  {}", idea.value_proposition);
                }
                if !idea.paper_title.is_empty() {
                    println!("  paper: {} <{}>", idea.paper_title, idea.paper_url);
                }
                if !idea.tech_stack.is_empty() {
                    println!("  stack: {}", idea.tech_stack.join(", "));
                }
                println!();
            }
        }
    }
    Ok(())
}
