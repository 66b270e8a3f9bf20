//! Connector tests against mocked HTTP servers
//!
//! Every HTTP connector (LLM endpoint, Tavily, Wikipedia, arXiv) is exercised
//! against a wiremock server, so the full request/response cycle runs without
//! touching the network.

use sage::llm::{LLMClient, OpenAIClient};
use sage::tools::{ArxivExtractor, TavilyClient, WikipediaExtractor};
use sage::AppError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---- OpenAI-compatible client ----

#[tokio::test]
async fn openai_client_returns_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "hello there"}}
            ]
        })))
        .mount(&server)
        .await;

    let client =
        OpenAIClient::new("sk-test", "gpt-4o").with_api_base(format!("{}/v1", server.uri()));
    let response = client.generate("hi").await.unwrap();
    assert_eq!(response, "hello there");
}

#[tokio::test]
async fn openai_client_sends_system_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": "be terse"},
                {"role": "user", "content": "hi"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "ok"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        OpenAIClient::new("sk-test", "gpt-4o").with_api_base(format!("{}/v1", server.uri()));
    client.generate_with_system("be terse", "hi").await.unwrap();
}

#[tokio::test]
async fn openai_client_surfaces_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client =
        OpenAIClient::new("sk-test", "gpt-4o").with_api_base(format!("{}/v1", server.uri()));
    let err = client.generate("hi").await.unwrap_err();
    assert!(matches!(err, AppError::Llm(_)));
    assert!(err.to_string().contains("429"));
}

// ---- Tavily search ----

#[tokio::test]
async fn tavily_search_parses_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"query": "rust ownership"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "title": "Ownership - The Rust Book",
                    "url": "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
                    "content": "Ownership is Rust's most unique feature.",
                    "score": 0.92
                },
                {
                    "title": "Rust (programming language)",
                    "url": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
                    "content": "Rust is a general-purpose programming language.",
                    "score": 0.81
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = TavilyClient::new("tvly-test", 10).with_api_base(server.uri());
    let hits = client.search("rust ownership").await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "Ownership - The Rust Book");
    assert!(hits[1].url.contains("wikipedia.org"));
}

#[tokio::test]
async fn tavily_zero_results_is_a_search_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let client = TavilyClient::new("tvly-test", 10).with_api_base(server.uri());
    let err = client.search("nothing").await.unwrap_err();
    assert!(matches!(err, AppError::Search(_)));
    assert!(err.to_string().contains("no results"));
}

// ---- Wikipedia ----

#[tokio::test]
async fn wikipedia_summary_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Machine_learning"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Machine learning",
            "extract": "Machine learning is a field of study in artificial intelligence.",
            "content_urls": {
                "desktop": {"page": "https://en.wikipedia.org/wiki/Machine_learning"}
            }
        })))
        .mount(&server)
        .await;

    let extractor = WikipediaExtractor::new().with_base_url(server.uri());
    let article = extractor.fetch_article("Machine_learning").await.unwrap();
    assert_eq!(article.title, "Machine learning");
    assert!(article.summary.starts_with("Machine learning is"));
    assert_eq!(article.url, "https://en.wikipedia.org/wiki/Machine_learning");
}

#[tokio::test]
async fn wikipedia_batch_skips_missing_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Exists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Exists",
            "extract": "An article.",
            "content_urls": {"desktop": {"page": "https://en.wikipedia.org/wiki/Exists"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let extractor = WikipediaExtractor::new().with_base_url(server.uri());
    let articles = extractor
        .extract_articles(&[
            "https://en.wikipedia.org/wiki/Exists",
            "https://en.wikipedia.org/wiki/Missing",
        ])
        .await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Exists");
}

// ---- arXiv ----

const ABS_PAGE: &str = r#"
<html><body><div id="abs">
  <h1 class="title mathjax"><span class="descriptor">Title:</span>Attention Is All You Need</h1>
  <div class="authors"><a href="/a/1">Ashish Vaswani</a>, <a href="/a/2">Noam Shazeer</a></div>
  <div class="dateline">[Submitted on 12 Jun 2017]</div>
  <blockquote class="abstract mathjax">
    <span class="descriptor">Abstract:</span>
    The dominant sequence transduction models are based on complex recurrent networks.
  </blockquote>
</div></body></html>
"#;

#[tokio::test]
async fn arxiv_paper_is_extracted_from_abs_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abs/1706.03762"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ABS_PAGE))
        .mount(&server)
        .await;

    let extractor = ArxivExtractor::new().with_base_url(server.uri());
    let papers = extractor
        .extract_papers(&["https://arxiv.org/abs/1706.03762"])
        .await;
    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].title, "Attention Is All You Need");
    assert_eq!(papers[0].authors.len(), 2);
    assert_eq!(papers[0].arxiv_id, "1706.03762");
    assert!(papers[0].url.ends_with("/abs/1706.03762"));
}

#[tokio::test]
async fn arxiv_http_error_skips_the_paper() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abs/0000.00000"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let extractor = ArxivExtractor::new().with_base_url(server.uri());
    let papers = extractor
        .extract_papers(&["https://arxiv.org/abs/0000.00000"])
        .await;
    assert!(papers.is_empty());
}
