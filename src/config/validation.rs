use crate::config::types::{
    ClassifierSettings, CompanyEntry, Config, CrawlerConfig, LocatorConfig, OutputConfig,
    UserAgentConfig,
};
use crate::url::normalize_company_url;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    match &config.classifier {
        Some(classifier) => validate_classifier(classifier)?,
        None => {
            return Err(ConfigError::Missing(
                "[classifier] section is required".to_string(),
            ))
        }
    }
    validate_locator(&config.locator)?;
    validate_companies(&config.companies)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be >= 1, got {}",
            config.max_depth
        )));
    }

    if config.probe_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_ms must be >= 100ms, got {}ms",
            config.probe_timeout_ms
        )));
    }

    if config.page_timeout_ms < config.probe_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "page_timeout_ms ({}ms) must not be shorter than probe_timeout_ms ({}ms)",
            config.page_timeout_ms, config.probe_timeout_ms
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.results_dir, Some(dir) if dir.is_empty()) {
        return Err(ConfigError::Validation(
            "results_dir cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_classifier(config: &ClassifierSettings) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid classifier endpoint: {}", e)))?;
    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Classifier endpoint must be HTTP(S), got '{}'",
            config.endpoint
        )));
    }

    if config.model.trim().is_empty() {
        return Err(ConfigError::Missing("classifier model".to_string()));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Missing("classifier api-key-env".to_string()));
    }

    if !config.user_template.contains("{text}") {
        return Err(ConfigError::Validation(
            "classifier user-template must contain a {text} placeholder".to_string(),
        ));
    }

    if config.max_text_length == 0 {
        return Err(ConfigError::Validation(
            "classifier max-text-length must be > 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_locator(config: &LocatorConfig) -> Result<(), ConfigError> {
    if let Some(path) = config.career_paths.iter().find(|p| !p.starts_with('/')) {
        return Err(ConfigError::Validation(format!(
            "career path '{}' must start with '/'",
            path
        )));
    }

    let empty_keyword = config
        .url_fragments
        .iter()
        .chain(&config.keywords)
        .chain(&config.sitemap_keywords)
        .any(|k| k.trim().is_empty());
    if empty_keyword {
        return Err(ConfigError::Validation(
            "locator keywords cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}

fn validate_companies(companies: &[CompanyEntry]) -> Result<(), ConfigError> {
    for entry in companies {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Company with URL '{}' has an empty name",
                entry.url
            )));
        }

        normalize_company_url(&entry.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid URL for company '{}': {}", entry.name, e))
        })?;
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ConfigError::Validation(format!("Invalid email format: '{}'", email)))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
