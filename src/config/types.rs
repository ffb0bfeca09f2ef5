use crate::config::tables;
use serde::Deserialize;

/// Main configuration structure for Career-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    /// Required: a crawl cannot start without a classifier definition
    pub classifier: Option<ClassifierSettings>,
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(default, rename = "company")]
    pub companies: Vec<CompanyEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Deepest frontier depth the explorer may write (career page is depth 1)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Timeout for a single candidate probe (milliseconds)
    #[serde(rename = "probe-timeout-ms", default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Timeout for a full page load (milliseconds)
    #[serde(rename = "page-timeout-ms", default = "default_page_timeout_ms")]
    pub page_timeout_ms: u64,

    /// Extra wait after a network-idle load, for late content (milliseconds)
    #[serde(rename = "network-idle-settle-ms", default)]
    pub network_idle_settle_ms: u64,

    /// Whether the sitemap strategy runs after probing and link scanning
    #[serde(rename = "sitemap-enabled", default = "default_true")]
    pub sitemap_enabled: bool,

    /// How many sitemap matches are verified before giving up
    #[serde(rename = "sitemap-verify-limit", default = "default_sitemap_verify_limit")]
    pub sitemap_verify_limit: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,

    /// Directory receiving one JSON file per classification, if set
    #[serde(rename = "results-dir", default)]
    pub results_dir: Option<String>,
}

/// Remote classifier settings
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    /// Chat-completions endpoint URL
    pub endpoint: String,

    /// Model name sent with every request
    pub model: String,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// System message of the classification prompt
    #[serde(rename = "system-prompt", default = "default_system_prompt")]
    pub system_prompt: String,

    /// User message template; `{text}` is replaced by the prepared page excerpt
    #[serde(rename = "user-template", default = "default_user_template")]
    pub user_template: String,

    #[serde(rename = "max-text-length", default = "default_max_text_length")]
    pub max_text_length: usize,

    #[serde(rename = "max-links", default = "default_max_links")]
    pub max_links: usize,

    /// Minimum spacing between two remote calls (milliseconds)
    #[serde(rename = "min-interval-ms", default)]
    pub min_interval_ms: u64,

    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Locator keyword tables
///
/// Every list defaults to the built-in table; a config file only needs to
/// name the lists it wants to replace.
#[derive(Debug, Clone, Deserialize)]
pub struct LocatorConfig {
    /// Path suffixes probed directly against the company root
    #[serde(rename = "career-paths", default = "tables::career_paths")]
    pub career_paths: Vec<String>,

    /// Fragments that mark a link URL as career-related
    #[serde(rename = "url-fragments", default = "tables::url_fragments")]
    pub url_fragments: Vec<String>,

    /// Link text / aria-label / title keywords
    #[serde(default = "tables::link_keywords")]
    pub keywords: Vec<String>,

    /// Substrings searched for in sitemap `<loc>` entries
    #[serde(rename = "sitemap-keywords", default = "tables::sitemap_keywords")]
    pub sitemap_keywords: Vec<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            career_paths: tables::career_paths(),
            url_fragments: tables::url_fragments(),
            keywords: tables::link_keywords(),
            sitemap_keywords: tables::sitemap_keywords(),
        }
    }
}

/// Seed company entry
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyEntry {
    /// Display name
    pub name: String,

    /// Root URL of the company website
    pub url: String,
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

fn default_page_timeout_ms() -> u64 {
    15_000
}

fn default_true() -> bool {
    true
}

fn default_sitemap_verify_limit() -> usize {
    3
}

fn default_api_key_env() -> String {
    "CLASSIFIER_API_KEY".to_string()
}

fn default_system_prompt() -> String {
    "You are an expert in analyzing company career pages. Answer in JSON.".to_string()
}

fn default_user_template() -> String {
    "{text}".to_string()
}

fn default_max_text_length() -> usize {
    6_000
}

fn default_max_links() -> usize {
    15
}

fn default_request_timeout_ms() -> u64 {
    60_000
}
