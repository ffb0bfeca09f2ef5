//! Remote classifier over an OpenAI-compatible chat-completions endpoint

use crate::classifier::archive::{archive_verdict, fallback_record};
use crate::classifier::heuristic::fallback_classification;
use crate::classifier::prompt::{page_excerpt, render_user_message, response_schema};
use crate::classifier::{Classification, Classifier, ClassifierError, Suggestion};
use crate::config::ClassifierSettings;
use crate::crawler::FetchedPage;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// The model's answer, as constrained by `response_schema`
#[derive(Debug, Deserialize)]
struct ModelVerdict {
    is_target: bool,
    #[serde(default)]
    suggested_urls: Vec<ModelSuggestion>,
}

#[derive(Debug, Deserialize)]
struct ModelSuggestion {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl From<ModelVerdict> for Classification {
    fn from(verdict: ModelVerdict) -> Self {
        Classification {
            is_target: verdict.is_target,
            suggestions: verdict
                .suggested_urls
                .into_iter()
                .map(|s| Suggestion {
                    url: s.url.unwrap_or_default().trim().to_string(),
                    text: s.text.unwrap_or_default().trim().to_string(),
                })
                .collect(),
        }
    }
}

/// Classifier backed by a chat-completions model
///
/// Calls are spaced at least `min-interval-ms` apart. Any failure (transport,
/// status, malformed answer) falls back to the keyword heuristic, so
/// `classify` always produces a verdict.
pub struct LlmClassifier {
    client: Client,
    settings: ClassifierSettings,
    api_key: Option<String>,
    results_dir: Option<PathBuf>,
    last_call: Mutex<Option<Instant>>,
}

impl LlmClassifier {
    /// Creates the classifier, reading the API key from `api-key-env`
    pub fn new(
        settings: ClassifierSettings,
        results_dir: Option<PathBuf>,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()?;

        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(
                env = %settings.api_key_env,
                "No classifier API key set, sending unauthenticated requests"
            );
        }

        Ok(Self {
            client,
            settings,
            api_key,
            results_dir,
            last_call: Mutex::new(None),
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Waits until `min-interval-ms` has passed since the previous call
    async fn throttle(&self) {
        let interval = Duration::from_millis(self.settings.min_interval_ms);
        let mut last = self.last_call.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval - elapsed;
                tracing::debug!(wait_ms = wait.as_millis() as u64, "Throttling classifier call");
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }

    fn request_body(&self, page: &FetchedPage) -> Value {
        let excerpt = page_excerpt(
            page.final_url.as_str(),
            &page.text,
            &page.links,
            self.settings.max_text_length,
            self.settings.max_links,
        );

        json!({
            "model": self.settings.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": self.settings.system_prompt },
                { "role": "user", "content": render_user_message(&self.settings.user_template, &excerpt) }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "career_page_analysis",
                    "strict": true,
                    "schema": response_schema()
                }
            }
        })
    }

    /// Sends one request and returns the model's JSON answer
    async fn request_verdict(&self, page: &FetchedPage) -> Result<Value, ClassifierError> {
        self.throttle().await;

        let mut request = self
            .client
            .post(&self.settings.endpoint)
            .json(&self.request_body(page));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClassifierError::MalformedResponse("empty completion".to_string()))?;

        serde_json::from_str(&content).map_err(|e| ClassifierError::MalformedResponse(e.to_string()))
    }

    fn archive(&self, page_url: &str, record: &Value) {
        let Some(dir) = &self.results_dir else {
            return;
        };
        match archive_verdict(dir, page_url, record) {
            Ok(path) => tracing::debug!(path = %path.display(), "Archived classification"),
            Err(e) => tracing::warn!(error = %e, "Failed to archive classification"),
        }
    }
}

/// Validates the model's answer once, at the boundary
fn parse_verdict(raw: &Value) -> Result<Classification, ClassifierError> {
    let verdict: ModelVerdict = serde_json::from_value(raw.clone())
        .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;
    Ok(verdict.into())
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, page: &FetchedPage) -> Classification {
        let page_url = page.final_url.as_str();

        let outcome = match self.request_verdict(page).await {
            Ok(raw) => parse_verdict(&raw).map(|classification| (raw, classification)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok((raw, classification)) => {
                tracing::info!(
                    url = %page_url,
                    is_target = classification.is_target,
                    suggestions = classification.suggestions.len(),
                    "Page classified"
                );
                self.archive(page_url, &raw);
                classification
            }
            Err(e) => {
                tracing::warn!(url = %page_url, error = %e, "Classifier failed, using keyword fallback");
                let classification = fallback_classification(&page.text);
                self.archive(page_url, &fallback_record(classification.is_target));
                classification
            }
        }
    }
}
