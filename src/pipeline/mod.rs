//! End-to-end generation pipeline
//!
//! One run: fetch recent papers, drive the model fallback chain until a
//! payload is accepted, apply the rubric, and persist the batch under its
//! date key. Re-running for the same date replaces that date's batch.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blueprint::generator::BlueprintGenerator;
use crate::config::Config;
use crate::db::{BatchRecord, Database, IdeaRecord};
use crate::ingest::ArxivClient;
use crate::llm::ChatProvider;
use crate::rubric::{apply_rubric, CategoryCounts};

/// Research themes persisted per batch.
const THEME_LIMIT: usize = 3;

/// What one pipeline run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub batch_date: String,
    pub papers_fetched: usize,
    pub research_themes: Vec<String>,
    pub ideas_persisted: usize,
    pub counts: CategoryCounts,
}

/// Options for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Batch date override (YYYY-MM-DD); defaults to today in UTC
    pub date: Option<String>,
    /// Override for papers fetched per category
    pub max_per_category: Option<usize>,
}

/// Execute one full pipeline run.
///
/// The chat provider is injected so the orchestration path is testable
/// against a scripted or mock backend.
pub async fn run(
    config: &Config,
    chat: &dyn ChatProvider,
    db: &Database,
    options: RunOptions,
) -> Result<RunSummary> {
    let batch_date = options
        .date
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());
    let max_per_category = options
        .max_per_category
        .unwrap_or(config.ingest.max_per_category);

    tracing::info!(date = %batch_date, "starting pipeline run");

    let client = ArxivClient::new(&config.ingest);
    let papers = client
        .fetch_recent_papers(&config.ingest.categories, max_per_category)
        .await;

    if papers.is_empty() {
        bail!("no papers fetched from any category; nothing to generate");
    }
    tracing::info!(papers = papers.len(), "ingestion complete");

    let generator = BlueprintGenerator::new(chat, config.openrouter.models.clone())
        .with_cooldown(Duration::from_secs(config.openrouter.model_cooldown_secs));
    let mut result = generator
        .generate(&papers)
        .await
        .context("generation failed")?;

    apply_rubric(&mut result.ideas);
    let counts = CategoryCounts::tally(&result.ideas);
    tracing::info!(
        ideas = result.ideas.len(),
        lucrative = counts.lucrative,
        promising = counts.promising,
        "rubric applied"
    );

    let mut themes = result.research_themes.clone();
    themes.truncate(THEME_LIMIT);

    let sources = config
        .ingest
        .categories
        .iter()
        .map(|cat| format!("https://arxiv.org/list/{}/new", cat))
        .collect();

    let batch = BatchRecord::new(batch_date.clone(), sources, themes.clone(), counts);
    let ideas: Vec<IdeaRecord> = result
        .ideas
        .iter()
        .map(|idea| IdeaRecord::from_candidate(idea, &batch_date))
        .collect();

    db.store()
        .replace_batch(&batch, &ideas)
        .await
        .context("failed to persist batch")?;
    tracing::info!(date = %batch_date, ideas = ideas.len(), "batch persisted");

    Ok(RunSummary {
        batch_date,
        papers_fetched: papers.len(),
        research_themes: themes,
        ideas_persisted: ideas.len(),
        counts,
    })
}
