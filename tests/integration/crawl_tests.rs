//! End-to-end crawl tests
//!
//! These tests use wiremock to stand in for a company website and the
//! classifier endpoint, and run the full locate/classify/explore cycle.

use crate::common::{
    coordinator, coordinator_with_storage, mount_page, mount_verdict, not_target_verdict,
    target_verdict, test_config, COMPLETIONS_PATH,
};
use career_scout::storage::{FrontierRecord, FrontierWrite, SqliteStorage, Storage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entries(storage: &dyn Storage) -> Vec<FrontierRecord> {
    let company = storage.list_companies().unwrap().remove(0);
    storage.list_frontier(company.id).unwrap()
}

async fn classifier_calls(classifier: &MockServer) -> usize {
    classifier
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == COMPLETIONS_PATH)
        .count()
}

#[tokio::test]
async fn test_career_page_is_target() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/careers",
        "<html><body><h1>Careers</h1><p>ACME-CAREERS</p></body></html>",
    )
    .await;
    mount_verdict(&llm, "ACME-CAREERS", target_verdict()).await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    let counters = coordinator.run().await.unwrap();

    assert_eq!(counters.companies_processed, 1);
    assert_eq!(counters.targets_found, 1);
    assert_eq!(counters.companies_exhausted, 0);

    let entries = entries(coordinator.storage());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url, format!("{}/careers", site.uri()));
    assert_eq!(entries[0].depth, 1);
    assert_eq!(entries[0].is_target, Some(true));
    assert!(entries[0].last_visited.is_some());
}

#[tokio::test]
async fn test_suggestion_followed_to_target() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/careers",
        r#"<html><body><p>ACME-LANDING</p><a href="/careers/openings">See openings</a></body></html>"#,
    )
    .await;
    mount_page(
        &site,
        "/careers/openings",
        "<html><body><p>ACME-OPENINGS</p></body></html>",
    )
    .await;
    mount_verdict(
        &llm,
        "ACME-LANDING",
        not_target_verdict(&[("/careers/openings", "See openings")]),
    )
    .await;
    mount_verdict(&llm, "ACME-OPENINGS", target_verdict()).await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    let counters = coordinator.run().await.unwrap();

    assert_eq!(counters.targets_found, 1);

    let entries = entries(coordinator.storage());
    let summary: Vec<(String, u32, Option<bool>)> = entries
        .into_iter()
        .map(|e| (e.url, e.depth, e.is_target))
        .collect();
    assert_eq!(
        summary,
        vec![
            (format!("{}/careers", site.uri()), 1, Some(false)),
            (format!("{}/careers/openings", site.uri()), 2, Some(true)),
        ]
    );
}

#[tokio::test]
async fn test_exploration_stops_at_max_depth() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(&site, "/careers", "<html><body><p>ACME-LANDING</p></body></html>").await;
    mount_page(&site, "/a", "<html><body><p>ACME-PAGE-A</p></body></html>").await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>ACME-PAGE-B</p>", "text/html"))
        .expect(0)
        .mount(&site)
        .await;

    mount_verdict(&llm, "ACME-LANDING", not_target_verdict(&[("/a", "A")])).await;
    mount_verdict(&llm, "ACME-PAGE-A", not_target_verdict(&[("/b", "B")])).await;
    mount_verdict(&llm, "ACME-PAGE-B", target_verdict()).await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 2));
    let counters = coordinator.run().await.unwrap();

    assert_eq!(counters.targets_found, 0);
    assert_eq!(counters.companies_exhausted, 1);

    let depths: Vec<u32> = entries(coordinator.storage()).iter().map(|e| e.depth).collect();
    assert_eq!(depths, vec![1, 2]);
    assert!(depths.iter().all(|d| *d <= 2));
}

#[tokio::test]
async fn test_company_with_target_is_not_revisited() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(&site, "/careers", "<html><body><p>ACME-CAREERS</p></body></html>").await;
    mount_verdict(&llm, "ACME-CAREERS", target_verdict()).await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    let first = coordinator.run().await.unwrap();
    let second = coordinator.run().await.unwrap();

    assert_eq!(first.companies_processed, 1);
    assert_eq!(second.companies_processed, 0);
    assert_eq!(second.targets_rotted, 0);
    assert_eq!(classifier_calls(&llm).await, 1);

    let storage = coordinator.storage();
    assert_eq!(storage.count_frontier().unwrap(), 1);
    assert_eq!(storage.count_companies().unwrap(), 1);

    let latest = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(latest.counters, second);
}

#[tokio::test]
async fn test_rerun_without_target_rewrites_same_rows() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/careers",
        r#"<html><body><p>ACME-LANDING</p><a href="/a">Teams</a></body></html>"#,
    )
    .await;
    mount_page(&site, "/a", "<html><body><p>ACME-TEAMS</p></body></html>").await;
    mount_verdict(&llm, "ACME-LANDING", not_target_verdict(&[("/a", "Teams")])).await;
    mount_verdict(&llm, "ACME-TEAMS", not_target_verdict(&[])).await;

    let shape = |entries: Vec<FrontierRecord>| -> Vec<(i64, String, u32, Option<bool>)> {
        entries
            .into_iter()
            .map(|e| (e.id, e.url, e.depth, e.is_target))
            .collect()
    };

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    let first = coordinator.run().await.unwrap();
    let before = shape(entries(coordinator.storage()));
    let second = coordinator.run().await.unwrap();
    let after = shape(entries(coordinator.storage()));

    assert_eq!(first.companies_exhausted, 1);
    assert_eq!(second.companies_processed, 1);
    assert_eq!(second.companies_exhausted, 1);
    assert_eq!(classifier_calls(&llm).await, 4);

    assert_eq!(before.len(), 2);
    assert_eq!(before[0].1, format!("{}/careers", site.uri()));
    assert_eq!((before[0].2, before[0].3), (1, Some(false)));
    assert_eq!(before[1].1, format!("{}/a", site.uri()));
    assert_eq!((before[1].2, before[1].3), (2, Some(false)));
    assert_eq!(after, before);
    assert_eq!(coordinator.storage().count_frontier().unwrap(), 2);
}

#[tokio::test]
async fn test_rotted_target_is_replaced() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(&site, "/careers", "<html><body><p>ACME-CAREERS</p></body></html>").await;
    mount_verdict(&llm, "ACME-CAREERS", target_verdict()).await;
    mount_verdict(&llm, "ACME-JOBS", target_verdict()).await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    coordinator.run().await.unwrap();

    // The old careers page disappears; a jobs page takes its place
    site.reset().await;
    mount_page(&site, "/jobs", "<html><body><p>ACME-JOBS</p></body></html>").await;

    let counters = coordinator.run().await.unwrap();
    assert_eq!(counters.targets_rotted, 1);
    assert_eq!(counters.companies_processed, 1);
    assert_eq!(counters.targets_found, 1);

    let urls: Vec<(String, Option<bool>)> = entries(coordinator.storage())
        .into_iter()
        .map(|e| (e.url, e.is_target))
        .collect();
    assert_eq!(urls, vec![(format!("{}/jobs", site.uri()), Some(true))]);
}

#[tokio::test]
async fn test_rot_check_keeps_live_targets() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;
    mount_page(&site, "/careers", "<p>still here</p>").await;

    let mut storage = SqliteStorage::open_in_memory().unwrap();
    let (company, _) = storage.upsert_company("Acme", &site.uri()).unwrap();
    for (route, depth) in [("/careers", 1), ("/gone", 2)] {
        storage
            .record_frontier(&FrontierWrite::visited(
                company,
                format!("{}{}", site.uri(), route),
                "127.0.0.1",
                depth,
                true,
            ))
            .unwrap();
    }

    let mut coordinator = coordinator_with_storage(test_config(&site.uri(), &llm, 3), storage);
    let rotted = coordinator.check_rot().await.unwrap();

    assert_eq!(rotted, vec![company]);
    let remaining: Vec<String> = entries(coordinator.storage())
        .into_iter()
        .map(|e| e.url)
        .collect();
    assert_eq!(remaining, vec![format!("{}/careers", site.uri())]);
    assert_eq!(classifier_calls(&llm).await, 0);
}

#[tokio::test]
async fn test_classifier_outage_uses_keyword_fallback() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/careers",
        "<html><body><h2>Open positions</h2><p>Apply now for a job on our team.</p></body></html>",
    )
    .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&llm)
        .await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    let counters = coordinator.run().await.unwrap();

    assert_eq!(counters.targets_found, 1);
    let entries = entries(coordinator.storage());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].is_target, Some(true));
}

#[tokio::test]
async fn test_link_text_locates_career_page() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<html><body><nav><a href="/about">About</a><a href="/people/hiring-now">Work with us</a></nav></body></html>"#,
    )
    .await;
    mount_page(&site, "/people/hiring-now", "<p>ACME-HIRING</p>").await;
    mount_verdict(&llm, "ACME-HIRING", target_verdict()).await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    let counters = coordinator.run().await.unwrap();

    assert_eq!(counters.targets_found, 1);
    let entries = entries(coordinator.storage());
    assert_eq!(entries[0].url, format!("{}/people/hiring-now", site.uri()));
    assert_eq!(entries[0].depth, 1);
}

#[tokio::test]
async fn test_sitemap_locates_career_page() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(&site, "/", "<html><body><p>Welcome</p></body></html>").await;
    let sitemap = format!(
        "<?xml version=\"1.0\"?><urlset><url><loc>{0}/blog</loc></url>\
         <url><loc> {0}/en/open-roles/job-openings </loc></url></urlset>",
        site.uri()
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sitemap, "application/xml"))
        .mount(&site)
        .await;
    mount_page(&site, "/en/open-roles/job-openings", "<p>ACME-SITEMAP</p>").await;
    mount_verdict(&llm, "ACME-SITEMAP", target_verdict()).await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    let counters = coordinator.run().await.unwrap();

    assert_eq!(counters.targets_found, 1);
    let entries = entries(coordinator.storage());
    assert_eq!(
        entries[0].url,
        format!("{}/en/open-roles/job-openings", site.uri())
    );
}

#[tokio::test]
async fn test_no_career_page_leaves_company_queued() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;
    mount_page(&site, "/", "<html><body><p>Just a homepage</p></body></html>").await;

    let mut coordinator = coordinator(test_config(&site.uri(), &llm, 3));
    let counters = coordinator.run().await.unwrap();

    assert_eq!(counters.companies_exhausted, 1);
    assert_eq!(classifier_calls(&llm).await, 0);

    let storage = coordinator.storage();
    assert_eq!(storage.count_frontier().unwrap(), 0);
    assert_eq!(storage.companies_without_target().unwrap().len(), 1);
}
