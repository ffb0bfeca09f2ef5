//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that:
//! - Seeds companies from the configuration
//! - Re-probes known target pages and drops the ones that rotted
//! - Runs locate, classify and explore for every company lacking a target
//! - Commits each company's frontier writes as one transaction
//! - Records the run and its counters

use crate::classifier::{Classifier, LlmClassifier};
use crate::config::Config;
use crate::crawler::explorer::Explorer;
use crate::crawler::fetcher::{FetchResult, Fetcher, HttpFetcher, WaitStrategy};
use crate::crawler::locator::CareerLocator;
use crate::state::{CompanyPhase, PhaseTracker};
use crate::storage::{
    CompanyRecord, FrontierWrite, RunCounters, RunStatus, SqliteStorage, Storage,
};
use crate::url::{extract_domain, frontier_key, normalize_company_url};
use crate::{ConfigError, ScoutError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Frontier depth of the career page found from a company root
pub const CAREER_PAGE_DEPTH: u32 = 1;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: String,
    storage: SqliteStorage,
    fetcher: Box<dyn Fetcher>,
    classifier: Box<dyn Classifier>,
}

impl Coordinator {
    /// Creates a coordinator with the HTTP fetcher and the remote classifier
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `config_hash` - Hash recorded with every run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScoutError)` - Missing classifier settings, or storage/client setup failed
    pub fn new(config: Config, config_hash: String) -> Result<Self, ScoutError> {
        let settings = config
            .classifier
            .clone()
            .ok_or_else(|| ConfigError::Missing("[classifier] section".to_string()))?;

        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let fetcher = HttpFetcher::from_config(
            &config.user_agent,
            Duration::from_millis(config.crawler.network_idle_settle_ms),
        )?;
        let classifier = LlmClassifier::new(
            settings,
            config.output.results_dir.as_ref().map(PathBuf::from),
        )?;

        Ok(Self::with_parts(
            config,
            config_hash,
            storage,
            Box::new(fetcher),
            Box::new(classifier),
        ))
    }

    /// Creates a coordinator from explicit collaborators
    pub fn with_parts(
        config: Config,
        config_hash: String,
        storage: SqliteStorage,
        fetcher: Box<dyn Fetcher>,
        classifier: Box<dyn Classifier>,
    ) -> Self {
        Self {
            config,
            config_hash,
            storage,
            fetcher,
            classifier,
        }
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Inserts configured companies whose normalized URL is not yet known
    ///
    /// Returns the number of newly inserted companies.
    pub fn seed_companies(&mut self) -> Result<usize, ScoutError> {
        let mut inserted = 0;
        for entry in &self.config.companies {
            let url = normalize_company_url(&entry.url)?;
            let (id, created) = self.storage.upsert_company(entry.name.trim(), &url)?;
            if created {
                tracing::debug!(company_id = id, name = %entry.name, url = %url, "Seeded company");
                inserted += 1;
            }
        }
        tracing::info!(
            configured = self.config.companies.len(),
            inserted,
            "Company seeding complete"
        );
        Ok(inserted)
    }

    /// Re-probes every target entry; dead ones are deleted
    ///
    /// Alive means any status below 400 after redirects. Network failures
    /// count as dead. Returns the affected company IDs in probe order.
    pub async fn check_rot(&mut self) -> Result<Vec<i64>, ScoutError> {
        let probe_timeout = Duration::from_millis(self.config.crawler.probe_timeout_ms);
        let targets = self.storage.target_entries()?;
        tracing::info!(targets = targets.len(), "Checking target pages for rot");

        let mut rotted = Vec::new();
        for entry in targets {
            let alive = match Url::parse(&entry.url) {
                Ok(url) => matches!(
                    self.fetcher
                        .fetch(&url, WaitStrategy::DomContentLoaded, probe_timeout)
                        .await,
                    FetchResult::Success(_)
                ),
                Err(_) => false,
            };

            if !alive {
                tracing::warn!(
                    company_id = entry.company_id,
                    url = %entry.url,
                    "Target page rotted, re-queueing company"
                );
                self.storage.delete_frontier_entry(entry.id)?;
                rotted.push(entry.company_id);
            }
        }
        Ok(rotted)
    }

    /// Companies without a target plus companies whose target rotted
    fn work_queue(&self, rotted: &[i64]) -> Result<Vec<CompanyRecord>, ScoutError> {
        let mut queue = self.storage.companies_without_target()?;
        let mut seen: HashSet<i64> = queue.iter().map(|c| c.id).collect();

        for &company_id in rotted {
            if seen.insert(company_id) {
                queue.push(self.storage.get_company(company_id)?);
            }
        }
        Ok(queue)
    }

    /// Runs one crawl: seed, rot check, then every queued company in turn
    ///
    /// A failing company is rolled back and counted; the run continues.
    pub async fn run(&mut self) -> Result<RunCounters, ScoutError> {
        let run_id = self.storage.create_run(&self.config_hash)?;
        tracing::info!(run_id, "Starting crawl run");

        let mut counters = RunCounters::default();
        match self.run_inner(&mut counters).await {
            Ok(()) => {
                self.storage
                    .finish_run(run_id, RunStatus::Completed, &counters)?;
                tracing::info!(
                    run_id,
                    processed = counters.companies_processed,
                    targets = counters.targets_found,
                    exhausted = counters.companies_exhausted,
                    failed = counters.companies_failed,
                    rotted = counters.targets_rotted,
                    "Crawl run completed"
                );
                Ok(counters)
            }
            Err(e) => {
                tracing::error!(run_id, error = %e, "Crawl run failed");
                self.storage.rollback_company()?;
                self.storage.finish_run(run_id, RunStatus::Failed, &counters)?;
                Err(e)
            }
        }
    }

    async fn run_inner(&mut self, counters: &mut RunCounters) -> Result<(), ScoutError> {
        self.seed_companies()?;

        let rotted = self.check_rot().await?;
        counters.targets_rotted = rotted.len() as u64;

        let queue = self.work_queue(&rotted)?;
        tracing::info!(companies = queue.len(), "Companies queued");

        let page_timeout = Duration::from_millis(self.config.crawler.page_timeout_ms);
        let Self {
            config,
            storage,
            fetcher,
            classifier,
            ..
        } = self;

        let mut worker = CompanyWorker {
            locator: CareerLocator::new(&**fetcher, &config.locator, &config.crawler),
            explorer: Explorer::new(&**fetcher, &**classifier, page_timeout),
            classifier: &**classifier,
            max_depth: config.crawler.max_depth,
        };

        for company in &queue {
            counters.companies_processed += 1;
            tracing::info!(company_id = company.id, name = %company.name, url = %company.url, "Processing company");

            let outcome = match storage.begin_company() {
                Ok(()) => match worker.process(&mut *storage, company).await {
                    Ok(phase) => storage
                        .commit_company()
                        .map(|()| phase)
                        .map_err(ScoutError::from),
                    Err(e) => Err(e),
                },
                Err(e) => Err(e.into()),
            };

            match outcome {
                Ok(phase) => {
                    match phase {
                        CompanyPhase::TargetFound => counters.targets_found += 1,
                        _ => counters.companies_exhausted += 1,
                    }
                    tracing::info!(company_id = company.id, outcome = %phase, "Company done");
                }
                Err(e) => {
                    tracing::error!(
                        company_id = company.id,
                        name = %company.name,
                        error = %e,
                        "Company failed, rolling back"
                    );
                    storage.rollback_company()?;
                    counters.companies_failed += 1;
                }
            }
        }

        Ok(())
    }
}

/// Per-run collaborators for processing one company at a time
struct CompanyWorker<'a> {
    locator: CareerLocator<'a>,
    explorer: Explorer<'a>,
    classifier: &'a dyn Classifier,
    max_depth: u32,
}

impl CompanyWorker<'_> {
    /// Locate, classify, explore; returns the terminal phase
    async fn process(
        &mut self,
        storage: &mut dyn Storage,
        company: &CompanyRecord,
    ) -> Result<CompanyPhase, ScoutError> {
        let mut tracker = PhaseTracker::new(company.id);
        let root = Url::parse(&company.url)?;

        tracker.advance(CompanyPhase::Locating)?;
        let Some(located) = self.locator.locate(&root).await else {
            tracker.advance(CompanyPhase::Exhausted)?;
            return Ok(tracker.phase());
        };

        tracker.advance(CompanyPhase::Classifying)?;
        self.explorer.mark_visited(company.id, &located.url);
        let classification = self.classifier.classify(&located.page).await;

        storage.record_frontier(&FrontierWrite::visited(
            company.id,
            frontier_key(&located.url),
            extract_domain(&located.url).unwrap_or_default(),
            CAREER_PAGE_DEPTH,
            classification.is_target,
        ))?;

        if classification.is_target {
            tracing::info!(url = %located.url, strategy = %located.strategy, "Career page is a target");
            tracker.advance(CompanyPhase::TargetFound)?;
            return Ok(tracker.phase());
        }

        tracker.advance(CompanyPhase::Exploring)?;
        tracing::info!(
            url = %located.url,
            suggestions = classification.suggestions.len(),
            "Career page is not a target, exploring suggestions"
        );

        let found = self
            .explorer
            .explore(
                storage,
                &located.page.final_url,
                &classification.suggestions,
                company.id,
                CAREER_PAGE_DEPTH + 1,
                self.max_depth,
            )
            .await?;

        tracker.advance(if found {
            CompanyPhase::TargetFound
        } else {
            CompanyPhase::Exhausted
        })?;
        Ok(tracker.phase())
    }
}

/// Runs a complete crawl with the production collaborators
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `config_hash` - Hash of the configuration file, recorded with the run
pub async fn run_crawl(config: Config, config_hash: String) -> Result<RunCounters, ScoutError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
