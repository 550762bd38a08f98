//! arXiv ingestion integration tests against a mock Atom endpoint.

use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mvpforge::config::IngestConfig;
use mvpforge::ingest::ArxivClient;

fn feed(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, title, category)| {
            format!(
                r#"<entry>
    <id>http://arxiv.org/abs/{id}v1</id>
    <published>2026-08-29T12:00:00Z</published>
    <title>{title}</title>
    <summary>Summary of {title}.</summary>
    <author><name>Doe, J.</name></author>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="{category}"/>
  </entry>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  {body}
</feed>"#
    )
}

fn atom_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/atom+xml")
}

fn client_for(server: &MockServer) -> ArxivClient {
    ArxivClient::new(&IngestConfig {
        base_url: server.uri(),
        category_cooldown_secs: 0,
        request_timeout_secs: 5,
        ..Default::default()
    })
}

#[tokio::test]
async fn fetches_all_categories_and_dedupes_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("search_query", "cat:cs.LG"))
        .respond_with(atom_response(feed(&[
            ("2601.00001", "Routing", "cs.LG"),
            ("2601.00002", "Shared paper", "cs.LG"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("search_query", "cat:cs.MA"))
        .respond_with(atom_response(feed(&[
            ("2601.00002", "Shared paper", "cs.LG"),
            ("2601.00003", "Swarms", "cs.MA"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let papers = client
        .fetch_recent_papers(&["cs.LG".to_string(), "cs.MA".to_string()], 25)
        .await;

    // Cross-category duplicate kept once
    assert_eq!(papers.len(), 3);
    let ids: Vec<&str> = papers.iter().map(|p| p.arxiv_id.as_str()).collect();
    assert_eq!(ids, vec!["2601.00001", "2601.00002", "2601.00003"]);
    assert_eq!(papers[0].title, "Routing");
    assert_eq!(papers[0].published_at, "2026-08-29");
}

#[tokio::test]
async fn failed_category_is_skipped_not_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("search_query", "cat:cs.LG"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("search_query", "cat:cs.MA"))
        .respond_with(atom_response(feed(&[("2601.00003", "Swarms", "cs.MA")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let papers = client
        .fetch_recent_papers(&["cs.LG".to_string(), "cs.MA".to_string()], 25)
        .await;

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].arxiv_id, "2601.00003");
}

#[tokio::test]
async fn all_categories_failing_yields_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let papers = client.fetch_recent_papers(&["cs.LG".to_string()], 25).await;
    assert!(papers.is_empty());
}

#[tokio::test]
async fn respects_max_results_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("max_results", "5"))
        .respond_with(atom_response(feed(&[("2601.00001", "Routing", "cs.LG")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let papers = client.fetch_recent_papers(&["cs.LG".to_string()], 5).await;
    assert_eq!(papers.len(), 1);
}
