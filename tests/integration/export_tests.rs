//! Config-to-summary tests over an on-disk database
//!
//! These go through the same path as the binary: a TOML file on disk,
//! `Coordinator::new`, then `--stats` / `--export-summary` style reads
//! from a freshly opened store.

use crate::common::{mount_page, mount_verdict, target_verdict, COMPLETIONS_PATH};
use career_scout::config::load_config_with_hash;
use career_scout::crawler::Coordinator;
use career_scout::output::{
    format_markdown_summary, generate_markdown_summary, generate_summary, load_statistics,
};
use career_scout::storage::{open_storage, RunStatus, Storage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::MockServer;

fn write_config(dir: &Path, site: &MockServer, llm: &MockServer) -> std::path::PathBuf {
    let config = format!(
        r#"
[crawler]
max-depth = 3
probe-timeout-ms = 2000
page-timeout-ms = 2000
sitemap-enabled = false

[user-agent]
crawler-name = "TestScout"
crawler-version = "0.1.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
database-path = '{db}'
summary-path = '{summary}'
results-dir = '{results}'

[classifier]
endpoint = "{llm}{completions}"
model = "test-model"
api-key-env = "CAREER_SCOUT_EXPORT_KEY_UNSET"

[[company]]
name = "Acme"
url = "{site}/"

[[company]]
name = "Globex"
url = "{site}/globex"
"#,
        db = dir.join("scout.db").display(),
        summary = dir.join("out").join("targets.md").display(),
        results = dir.join("results").display(),
        llm = llm.uri(),
        completions = COMPLETIONS_PATH,
        site = site.uri(),
    );
    let path = dir.join("scout.toml");
    fs::write(&path, config).unwrap();
    path
}

#[tokio::test]
async fn test_crawl_then_export_summary() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;
    mount_page(&site, "/careers", "<html><body><p>ACME-CAREERS</p></body></html>").await;
    mount_verdict(&llm, "ACME-CAREERS", target_verdict()).await;

    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path(), &site, &llm);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();
    let summary_path = config.output.summary_path.clone();
    let db_path = config.output.database_path.clone();

    let mut coordinator = Coordinator::new(config, hash.clone()).unwrap();
    let counters = coordinator.run().await.unwrap();
    drop(coordinator);

    // Both companies share the mock host, so both find the same careers page
    assert_eq!(counters.companies_processed, 2);
    assert_eq!(counters.targets_found, 2);

    let storage = open_storage(Path::new(&db_path)).unwrap();
    let stats = load_statistics(&storage).unwrap();
    assert_eq!(stats.total_companies, 2);
    assert_eq!(stats.companies_with_target, 2);
    assert_eq!(stats.depth_breakdown.get(&1), Some(&2));

    let run = stats.latest_run.unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, hash);

    let summary = generate_summary(&storage).unwrap();
    assert_eq!(summary.total_targets(), 2);
    generate_markdown_summary(&summary, Path::new(&summary_path)).unwrap();

    let markdown = fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("### Acme"));
    assert!(markdown.contains("### Globex"));
    assert!(markdown.contains(&format!("{}/careers", site.uri())));
    assert_eq!(markdown, format_markdown_summary(&summary));
}

#[tokio::test]
async fn test_classifications_are_archived() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;
    mount_page(&site, "/careers", "<p>ACME-CAREERS</p>").await;
    mount_verdict(&llm, "ACME-CAREERS", target_verdict()).await;

    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path(), &site, &llm);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let mut coordinator = Coordinator::new(config, hash).unwrap();
    coordinator.run().await.unwrap();

    let archived: Vec<_> = fs::read_dir(dir.path().join("results"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert!(!archived.is_empty());

    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&archived[0]).unwrap()).unwrap();
    assert!(record["page_url"].as_str().unwrap().ends_with("/careers"));
    assert_eq!(record["result"]["is_target"], serde_json::Value::Bool(true));
}

#[tokio::test]
async fn test_summary_of_fresh_database() {
    let dir = TempDir::new().unwrap();
    let storage = open_storage(&dir.path().join("fresh.db")).unwrap();

    assert_eq!(storage.count_companies().unwrap(), 0);
    let summary = generate_summary(&storage).unwrap();
    let markdown = format_markdown_summary(&summary);

    assert!(summary.latest_run.is_none());
    assert!(markdown.contains("No target pages found yet."));
}
