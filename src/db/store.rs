/// Batch and idea persistence operations
///
/// A batch (keyed by calendar date) owns its ideas by foreign reference.
/// `replace_batch` is the only write path: it supersedes everything stored
/// for that date in one transaction, which makes pipeline re-runs for the
/// same date idempotent.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::blueprint::IdeaCandidate;
use crate::rubric::{category_for, total_score, Category, CategoryCounts};

/// Ideas keep at most this many tech stack entries.
const TECH_STACK_LIMIT: usize = 12;

/// Ideas always persist exactly this many resume bullets (padded with "").
const RESUME_BULLET_COUNT: usize = 3;

/// One pipeline run's aggregate record, keyed by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchRecord {
    /// YYYY-MM-DD; doubles as the primary key
    pub id: String,
    pub date: String,
    pub sources: Vec<String>,
    pub research_themes: Vec<String>,
    pub counts: CategoryCounts,
    pub created_at: i64,
}

impl BatchRecord {
    pub fn new(
        date: impl Into<String>,
        sources: Vec<String>,
        research_themes: Vec<String>,
        counts: CategoryCounts,
    ) -> Self {
        let date = date.into();
        Self {
            id: date.clone(),
            date,
            sources,
            research_themes,
            counts,
            created_at: unix_now(),
        }
    }
}

/// One persisted idea row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdeaRecord {
    pub id: String,
    pub batch_date: String,
    pub category: Category,
    pub startup_name: String,
    pub value_proposition: String,
    pub why_this_paper: String,
    pub technical_core: String,
    pub implementation: String,
    pub tech_stack: Vec<String>,
    pub resume_bullets: Vec<String>,
    pub score_demand_urgency: i64,
    pub score_pricing_power: i64,
    pub score_distribution_ease: i64,
    pub score_speed_to_mvp: i64,
    pub total_score: i64,
    pub paper_title: String,
    pub paper_url: String,
    pub paper_authors: Vec<String>,
    pub paper_abstract: Option<String>,
    pub paper_arxiv_id: Option<String>,
    pub paper_published_at: Option<String>,
    pub paper_primary_category: Option<String>,
    pub created_at: i64,
}

impl IdeaRecord {
    /// Flatten a categorized idea candidate into a row for the given batch.
    pub fn from_candidate(idea: &IdeaCandidate, batch_date: &str) -> Self {
        let mut resume_bullets = idea.resume_bullets.clone();
        resume_bullets.resize(RESUME_BULLET_COUNT, String::new());
        resume_bullets.truncate(RESUME_BULLET_COUNT);

        let mut tech_stack = idea.tech_stack.clone();
        tech_stack.truncate(TECH_STACK_LIMIT);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            batch_date: batch_date.to_string(),
            category: idea.category.unwrap_or_else(|| category_for(&idea.scores)),
            startup_name: if idea.startup_name.is_empty() {
                "Untitled".to_string()
            } else {
                idea.startup_name.clone()
            },
            value_proposition: idea.value_proposition.clone(),
            why_this_paper: idea.why_this_paper.clone(),
            technical_core: idea.technical_core.clone(),
            implementation: idea.implementation.clone(),
            tech_stack,
            resume_bullets,
            score_demand_urgency: idea.scores.demand_urgency as i64,
            score_pricing_power: idea.scores.pricing_power as i64,
            score_distribution_ease: idea.scores.distribution_ease as i64,
            score_speed_to_mvp: idea.scores.speed_to_mvp as i64,
            total_score: idea.total_score.unwrap_or_else(|| total_score(&idea.scores)),
            paper_title: idea.paper.title.clone(),
            paper_url: idea.paper.url.clone(),
            paper_authors: idea.paper.authors.clone(),
            paper_abstract: idea.paper.abstract_text.clone(),
            paper_arxiv_id: idea.paper.arxiv_id.clone(),
            paper_published_at: idea.paper.published_at.clone(),
            paper_primary_category: idea.paper.primary_category.clone(),
            created_at: unix_now(),
        }
    }
}

/// Batch store for database operations
pub struct BatchStore {
    pool: SqlitePool,
}

impl BatchStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Replace everything stored for a batch date: delete prior ideas and
    /// batch row, insert the new batch, bulk-insert the new ideas. One
    /// transaction, so a failed run never leaves partial state behind.
    pub async fn replace_batch(&self, batch: &BatchRecord, ideas: &[IdeaRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM ideas WHERE batch_date = ?")
            .bind(&batch.id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete prior ideas")?;

        sqlx::query("DELETE FROM batches WHERE id = ?")
            .bind(&batch.id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete prior batch")?;

        sqlx::query(
            "INSERT INTO batches (id, date, created_at, sources, research_themes, \
             counts_backlog, counts_considerable, counts_promising, counts_lucrative) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&batch.id)
        .bind(&batch.date)
        .bind(batch.created_at)
        .bind(to_json_text(&batch.sources))
        .bind(to_json_text(&batch.research_themes))
        .bind(batch.counts.backlog)
        .bind(batch.counts.considerable)
        .bind(batch.counts.promising)
        .bind(batch.counts.lucrative)
        .execute(&mut *tx)
        .await
        .context("Failed to insert batch")?;

        for idea in ideas {
            sqlx::query(
                "INSERT INTO ideas (id, batch_date, category, startup_name, value_proposition, \
                 why_this_paper, technical_core, implementation, tech_stack, resume_bullets, \
                 score_demand_urgency, score_pricing_power, score_distribution_ease, \
                 score_speed_to_mvp, total_score, paper_title, paper_url, paper_authors, \
                 paper_abstract, paper_arxiv_id, paper_published_at, paper_primary_category, \
                 created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&idea.id)
            .bind(&idea.batch_date)
            .bind(idea.category.as_str())
            .bind(&idea.startup_name)
            .bind(&idea.value_proposition)
            .bind(&idea.why_this_paper)
            .bind(&idea.technical_core)
            .bind(&idea.implementation)
            .bind(to_json_text(&idea.tech_stack))
            .bind(to_json_text(&idea.resume_bullets))
            .bind(idea.score_demand_urgency)
            .bind(idea.score_pricing_power)
            .bind(idea.score_distribution_ease)
            .bind(idea.score_speed_to_mvp)
            .bind(idea.total_score)
            .bind(&idea.paper_title)
            .bind(&idea.paper_url)
            .bind(to_json_text(&idea.paper_authors))
            .bind(&idea.paper_abstract)
            .bind(&idea.paper_arxiv_id)
            .bind(&idea.paper_published_at)
            .bind(&idea.paper_primary_category)
            .bind(idea.created_at)
            .execute(&mut *tx)
            .await
            .context("Failed to insert idea")?;
        }

        tx.commit().await.context("Failed to commit batch")?;
        Ok(())
    }

    /// Most recent batch by date, or None.
    pub async fn latest_batch(&self) -> Result<Option<BatchRecord>> {
        let row = sqlx::query("SELECT * FROM batches ORDER BY date DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch latest batch")?;

        row.map(|r| batch_from_row(&r)).transpose()
    }

    /// Batch for a specific date, or None.
    pub async fn batch_by_date(&self, date: &str) -> Result<Option<BatchRecord>> {
        let row = sqlx::query("SELECT * FROM batches WHERE id = ?")
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch batch")?;

        row.map(|r| batch_from_row(&r)).transpose()
    }

    /// All ideas for a batch date, insertion order.
    pub async fn ideas_for_batch(&self, date: &str) -> Result<Vec<IdeaRecord>> {
        let rows = sqlx::query("SELECT * FROM ideas WHERE batch_date = ? ORDER BY created_at, id")
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch ideas")?;

        rows.iter().map(idea_from_row).collect()
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn to_json_text(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn from_json_text(text: &str) -> Vec<String> {
    serde_json::from_str(text).unwrap_or_default()
}

fn batch_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<BatchRecord> {
    Ok(BatchRecord {
        id: row.try_get("id")?,
        date: row.try_get("date")?,
        sources: from_json_text(row.try_get("sources")?),
        research_themes: from_json_text(row.try_get("research_themes")?),
        counts: CategoryCounts {
            backlog: row.try_get("counts_backlog")?,
            considerable: row.try_get("counts_considerable")?,
            promising: row.try_get("counts_promising")?,
            lucrative: row.try_get("counts_lucrative")?,
        },
        created_at: row.try_get("created_at")?,
    })
}

fn idea_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<IdeaRecord> {
    let category: String = row.try_get("category")?;
    Ok(IdeaRecord {
        id: row.try_get("id")?,
        batch_date: row.try_get("batch_date")?,
        category: Category::from_str_lossy(&category),
        startup_name: row.try_get("startup_name")?,
        value_proposition: row.try_get("value_proposition")?,
        why_this_paper: row.try_get("why_this_paper")?,
        technical_core: row.try_get("technical_core")?,
        implementation: row.try_get("implementation")?,
        tech_stack: from_json_text(row.try_get("tech_stack")?),
        resume_bullets: from_json_text(row.try_get("resume_bullets")?),
        score_demand_urgency: row.try_get("score_demand_urgency")?,
        score_pricing_power: row.try_get("score_pricing_power")?,
        score_distribution_ease: row.try_get("score_distribution_ease")?,
        score_speed_to_mvp: row.try_get("score_speed_to_mvp")?,
        total_score: row.try_get("total_score")?,
        paper_title: row.try_get("paper_title")?,
        paper_url: row.try_get("paper_url")?,
        paper_authors: from_json_text(row.try_get("paper_authors")?),
        paper_abstract: row.try_get("paper_abstract")?,
        paper_arxiv_id: row.try_get("paper_arxiv_id")?,
        paper_published_at: row.try_get("paper_published_at")?,
        paper_primary_category: row.try_get("paper_primary_category")?,
        created_at: row.try_get("created_at")?,
    })
}
