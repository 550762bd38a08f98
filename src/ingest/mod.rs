//! arXiv paper ingestion
//!
//! Fetches the newest papers per category from the arXiv Atom API. Ingestion
//! degrades per category: a failed category logs a warning and contributes
//! nothing, so the pipeline always receives whatever was collected.

use anyhow::{anyhow, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::config::IngestConfig;

/// A single fetched paper. Immutable once fetched; consumed read-only by
/// the blueprint generator and prompt builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaperRef {
    pub title: String,
    pub url: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub arxiv_id: String,
    /// YYYY-MM-DD
    pub published_at: String,
    pub primary_category: String,
}

/// Client for the arXiv Atom query API
pub struct ArxivClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    category_cooldown: Duration,
}

impl ArxivClient {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            category_cooldown: Duration::from_secs(config.category_cooldown_secs),
        }
    }

    /// Fetch the newest papers for each category, newest-first, deduplicated
    /// by arXiv id across categories.
    ///
    /// Never fails as a whole: a category that errors is skipped with a
    /// warning and the papers collected so far are kept.
    pub async fn fetch_recent_papers(
        &self,
        categories: &[String],
        max_per_category: usize,
    ) -> Vec<PaperRef> {
        let mut papers: Vec<PaperRef> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();

        for (idx, category) in categories.iter().enumerate() {
            if idx > 0 && !self.category_cooldown.is_zero() {
                tracing::debug!(
                    cooldown_secs = self.category_cooldown.as_secs(),
                    "waiting before next category to avoid rate limit"
                );
                tokio::time::sleep(self.category_cooldown).await;
            }

            tracing::info!(category = %category, max = max_per_category, "querying arXiv");
            match self.fetch_category(category, max_per_category).await {
                Ok(fetched) => {
                    for paper in fetched {
                        if seen_ids.insert(paper.arxiv_id.clone()) {
                            papers.push(paper);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(category = %category, error = %e, "category fetch failed, continuing");
                }
            }
        }

        tracing::info!(total = papers.len(), "arXiv ingestion complete");
        papers
    }

    async fn fetch_category(&self, category: &str, max_results: usize) -> Result<Vec<PaperRef>> {
        let response = self
            .http
            .get(&self.base_url)
            .timeout(self.request_timeout)
            .query(&[("search_query", format!("cat:{}", category))])
            .query(&[("start", "0")])
            .query(&[("max_results", max_results.to_string())])
            .query(&[("sortBy", "submittedDate"), ("sortOrder", "descending")])
            .header(
                reqwest::header::ACCEPT,
                "application/atom+xml, application/xml;q=0.9, text/xml;q=0.8",
            )
            .send()
            .await
            .context("arXiv request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("arXiv API error: HTTP {}", status));
        }

        let text = response.text().await.context("reading arXiv response body")?;
        parse_atom_feed(&text)
    }
}

/// Parse an arXiv Atom feed into paper records.
fn parse_atom_feed(xml: &str) -> Result<Vec<PaperRef>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut out: Vec<PaperRef> = Vec::new();

    let mut in_entry = false;
    let mut cur_id = String::new();
    let mut cur_title = String::new();
    let mut cur_published = String::new();
    let mut cur_summary = String::new();
    let mut cur_authors: Vec<String> = Vec::new();
    let mut cur_primary = String::new();
    let mut text_target: Option<&'static str> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name_buf: Vec<u8> = e.name().as_ref().to_vec();
                let name = local_name(&name_buf);
                match name {
                    b"entry" => {
                        in_entry = true;
                        cur_id.clear();
                        cur_title.clear();
                        cur_published.clear();
                        cur_summary.clear();
                        cur_authors.clear();
                        cur_primary.clear();
                        text_target = None;
                    }
                    b"id" if in_entry => text_target = Some("id"),
                    b"title" if in_entry => text_target = Some("title"),
                    b"published" if in_entry => text_target = Some("published"),
                    b"summary" if in_entry => text_target = Some("summary"),
                    b"name" if in_entry => text_target = Some("author"),
                    b"primary_category" if in_entry => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref().ends_with(b"term") {
                                cur_primary = String::from_utf8_lossy(&attr.value).to_string();
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                // primary_category is usually a self-closing element
                let name_buf: Vec<u8> = e.name().as_ref().to_vec();
                if in_entry && local_name(&name_buf) == b"primary_category" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref().ends_with(b"term") {
                            cur_primary = String::from_utf8_lossy(&attr.value).to_string();
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(tag) = text_target.take() {
                    let txt = t.unescape().unwrap_or_default().to_string();
                    match tag {
                        "id" => cur_id = txt,
                        "title" => cur_title = txt,
                        "published" => cur_published = txt,
                        "summary" => cur_summary = txt,
                        "author" => cur_authors.push(txt),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name_buf: Vec<u8> = e.name().as_ref().to_vec();
                if local_name(&name_buf) == b"entry" && in_entry {
                    in_entry = false;
                    out.push(PaperRef {
                        title: collapse_whitespace(&cur_title),
                        url: cur_id.trim().to_string(),
                        authors: cur_authors.clone(),
                        abstract_text: collapse_whitespace(&cur_summary),
                        arxiv_id: normalize_id(&cur_id),
                        published_at: cur_published.chars().take(10).collect(),
                        primary_category: cur_primary.clone(),
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("XML parse error: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// Strip any namespace prefix from an element name.
fn local_name(raw: &[u8]) -> &[u8] {
    match raw.iter().position(|b| *b == b':') {
        Some(ix) => &raw[ix + 1..],
        None => raw,
    }
}

/// Canonical arXiv id from an entry id URL, version suffix stripped.
/// "http://arxiv.org/abs/2501.01234v2" -> "2501.01234"
fn normalize_id(entry_id: &str) -> String {
    let tail = entry_id.rsplit('/').next().unwrap_or(entry_id).trim();
    let tail = tail.strip_prefix("arXiv:").unwrap_or(tail);
    tail.split('v').next().unwrap_or(tail).to_string()
}

/// Collapse internal newlines and runs of whitespace into single spaces.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
