//! Shared fixtures for the integration tests

use career_scout::classifier::LlmClassifier;
use career_scout::config::{
    ClassifierSettings, CompanyEntry, Config, CrawlerConfig, LocatorConfig, OutputConfig,
    UserAgentConfig,
};
use career_scout::crawler::{build_http_client, Coordinator, HttpFetcher};
use career_scout::storage::SqliteStorage;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Builds a config pointing at a single company and a mock classifier
pub fn test_config(company_url: &str, classifier: &MockServer, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            probe_timeout_ms: 2_000,
            page_timeout_ms: 2_000,
            network_idle_settle_ms: 0,
            sitemap_enabled: true,
            sitemap_verify_limit: 3,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestScout".to_string(),
            crawler_version: "0.1.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: ":memory:".to_string(),
            summary_path: "./test_summary.md".to_string(),
            results_dir: None,
        },
        classifier: Some(ClassifierSettings {
            endpoint: format!("{}{}", classifier.uri(), COMPLETIONS_PATH),
            model: "test-model".to_string(),
            api_key_env: "CAREER_SCOUT_INTEGRATION_KEY_UNSET".to_string(),
            system_prompt: "You classify pages.".to_string(),
            user_template: "{text}".to_string(),
            max_text_length: 6_000,
            max_links: 15,
            min_interval_ms: 0,
            request_timeout_ms: 2_000,
        }),
        locator: LocatorConfig::default(),
        companies: vec![CompanyEntry {
            name: "Acme".to_string(),
            url: company_url.to_string(),
        }],
    }
}

/// Wires a coordinator with the real HTTP fetcher, the real classifier
/// and an in-memory store
pub fn coordinator(config: Config) -> Coordinator {
    coordinator_with_storage(config, SqliteStorage::open_in_memory().unwrap())
}

/// Same as [`coordinator`] over a pre-populated store
pub fn coordinator_with_storage(config: Config, storage: SqliteStorage) -> Coordinator {
    let client = build_http_client(&config.user_agent).unwrap();
    let fetcher = HttpFetcher::new(client, Duration::ZERO);
    let settings = config.classifier.clone().unwrap();
    let classifier = LlmClassifier::new(settings, None)
        .unwrap()
        .with_api_key("integration-key");

    Coordinator::with_parts(
        config,
        "integration-hash".to_string(),
        storage,
        Box::new(fetcher),
        Box::new(classifier),
    )
}

/// Serves `body` as HTML at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// A chat-completions answer carrying `verdict` as the message content
pub fn completion(verdict: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": verdict.to_string() } }]
    }))
}

/// Answers classifier requests whose prompt contains `marker` with `verdict`
pub async fn mount_verdict(classifier: &MockServer, marker: &str, verdict: Value) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_string_contains(marker))
        .respond_with(completion(verdict))
        .mount(classifier)
        .await;
}

pub fn target_verdict() -> Value {
    json!({
        "is_target": true,
        "confidence": 90,
        "reasoning": "Lists open positions",
        "suggested_urls": []
    })
}

pub fn not_target_verdict(suggestions: &[(&str, &str)]) -> Value {
    let suggested: Vec<Value> = suggestions
        .iter()
        .map(|(url, text)| json!({ "url": url, "text": text }))
        .collect();
    json!({
        "is_target": false,
        "confidence": 70,
        "reasoning": "Landing page without listings",
        "suggested_urls": suggested
    })
}
