//! Persistence integration tests: batch replacement semantics and reads
//! against a real on-disk SQLite database.

use tempfile::TempDir;

use mvpforge::db::{BatchRecord, Database, IdeaRecord};
use mvpforge::rubric::{Category, CategoryCounts};

fn idea(batch_date: &str, name: &str, total: i64) -> IdeaRecord {
    IdeaRecord {
        id: uuid::Uuid::new_v4().to_string(),
        batch_date: batch_date.to_string(),
        category: Category::Promising,
        startup_name: name.to_string(),
        value_proposition: "v".into(),
        why_this_paper: "w".into(),
        technical_core: "t".into(),
        implementation: "i".into(),
        tech_stack: vec!["rust".into(), "sqlite".into()],
        resume_bullets: vec!["a".into(), "b".into(), "c".into()],
        score_demand_urgency: 7,
        score_pricing_power: 6,
        score_distribution_ease: 7,
        score_speed_to_mvp: 6,
        total_score: total,
        paper_title: "Paper".into(),
        paper_url: "http://arxiv.org/abs/2601.01234v1".into(),
        paper_authors: vec!["Doe, J.".into()],
        paper_abstract: Some("abstract".into()),
        paper_arxiv_id: Some("2601.01234".into()),
        paper_published_at: Some("2026-01-15".into()),
        paper_primary_category: Some("cs.LG".into()),
        created_at: 0,
    }
}

fn batch(date: &str, ideas: u32) -> BatchRecord {
    BatchRecord::new(
        date,
        vec!["https://arxiv.org/list/cs.LG/new".to_string()],
        vec!["a".into(), "b".into(), "c".into()],
        CategoryCounts {
            promising: ideas,
            ..Default::default()
        },
    )
}

async fn test_db(dir: &TempDir) -> Database {
    Database::new(&dir.path().join("test.db")).await.unwrap()
}

#[tokio::test]
async fn replace_batch_round_trips() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;
    let store = db.store();

    let date = "2026-08-30";
    let ideas = vec![idea(date, "First", 26), idea(date, "Second", 12)];
    store.replace_batch(&batch(date, 2), &ideas).await.unwrap();

    let stored = store.batch_by_date(date).await.unwrap().unwrap();
    assert_eq!(stored.id, date);
    assert_eq!(stored.research_themes, vec!["a", "b", "c"]);
    assert_eq!(stored.counts.promising, 2);

    let stored_ideas = store.ideas_for_batch(date).await.unwrap();
    assert_eq!(stored_ideas.len(), 2);
    assert_eq!(stored_ideas[0].startup_name, "First");
    assert_eq!(stored_ideas[0].tech_stack, vec!["rust", "sqlite"]);
    assert_eq!(stored_ideas[0].paper_arxiv_id.as_deref(), Some("2601.01234"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn rerun_for_same_date_replaces_everything() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;
    let store = db.store();

    let date = "2026-08-30";
    let first = vec![idea(date, "Old-A", 20), idea(date, "Old-B", 21)];
    store.replace_batch(&batch(date, 2), &first).await.unwrap();

    let second = vec![
        idea(date, "New-A", 30),
        idea(date, "New-B", 31),
        idea(date, "New-C", 32),
    ];
    store.replace_batch(&batch(date, 3), &second).await.unwrap();

    // Exactly one batch row for that date, holding only the second run's ideas
    let batch_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM batches WHERE id = ?")
        .bind(date)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(batch_count, 1);

    let ideas = store.ideas_for_batch(date).await.unwrap();
    assert_eq!(ideas.len(), 3);
    assert!(ideas.iter().all(|i| i.startup_name.starts_with("New-")));

    db.close().await.unwrap();
}

#[tokio::test]
async fn replacing_one_date_leaves_other_dates_alone() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;
    let store = db.store();

    store
        .replace_batch(&batch("2026-08-29", 1), &[idea("2026-08-29", "Kept", 26)])
        .await
        .unwrap();
    store
        .replace_batch(&batch("2026-08-30", 1), &[idea("2026-08-30", "Fresh", 26)])
        .await
        .unwrap();
    store
        .replace_batch(&batch("2026-08-30", 1), &[idea("2026-08-30", "Fresher", 26)])
        .await
        .unwrap();

    let kept = store.ideas_for_batch("2026-08-29").await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].startup_name, "Kept");

    db.close().await.unwrap();
}

#[tokio::test]
async fn latest_batch_orders_by_date() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;
    let store = db.store();

    assert!(store.latest_batch().await.unwrap().is_none());

    // Inserted out of order on purpose
    store.replace_batch(&batch("2026-08-30", 0), &[]).await.unwrap();
    store.replace_batch(&batch("2026-08-28", 0), &[]).await.unwrap();
    store.replace_batch(&batch("2026-08-29", 0), &[]).await.unwrap();

    let latest = store.latest_batch().await.unwrap().unwrap();
    assert_eq!(latest.id, "2026-08-30");

    db.close().await.unwrap();
}

#[tokio::test]
async fn missing_date_reads_as_none() {
    let dir = TempDir::new().unwrap();
    let db = test_db(&dir).await;
    let store = db.store();

    assert!(store.batch_by_date("1999-01-01").await.unwrap().is_none());
    assert!(store.ideas_for_batch("1999-01-01").await.unwrap().is_empty());

    db.close().await.unwrap();
}
