//! Optional model-backed corrector (spec §6).
//!
//! Mirrors the shape of the reference Ollama provider: a host/model pair
//! with environment-variable overrides, a bounded timeout, and a
//! reachability probe performed once at construction. If the probe fails the
//! corrector is simply not built — the composite pipeline runs without it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

use super::{CancelToken, Corrector, CorrectorError, CorrectorOutcome};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const PRIORITY: i32 = 10;

#[derive(Debug, Error)]
pub enum ModelCorrectorError {
    #[error("model endpoint unreachable: {0}")]
    Unavailable(String),
}

/// Suggests a correction by prompting an Ollama-compatible `/api/generate`
/// endpoint. Not enabled unless [`ModelCorrector::connect`] succeeds.
pub struct ModelCorrector {
    base_url: String,
    model: String,
    client: Client,
    cache: Mutex<HashMap<String, String>>,
}

impl ModelCorrector {
    /// Resolves base URL and model from the environment
    /// (`QUERYFORGE_MODEL_URL`, `QUERYFORGE_MODEL_NAME`), builds an HTTP
    /// client with a 15-second timeout, and probes reachability with a
    /// lightweight GET. Returns `Err` if the probe fails, so callers can
    /// construct the composite pipeline without this corrector.
    pub async fn connect() -> Result<Self, ModelCorrectorError> {
        let base_url =
            std::env::var("QUERYFORGE_MODEL_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("QUERYFORGE_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelCorrectorError::Unavailable(e.to_string()))?;

        let probe_url = format!("{base_url}/api/tags");
        let probe = client
            .get(&probe_url)
            .send()
            .await
            .map_err(|e| ModelCorrectorError::Unavailable(e.to_string()))?;

        if !probe.status().is_success() {
            return Err(ModelCorrectorError::Unavailable(format!(
                "probe returned {}",
                probe.status()
            )));
        }

        Ok(Self {
            base_url,
            model,
            client,
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn prompt(query: &str) -> String {
        format!(
            "Correct any spelling mistakes in the following Russian search query. \
             Return only the corrected query, with no explanation and no quotes.\n\nQuery: {query}"
        )
    }

    fn extract_correction(raw: &str) -> Option<String> {
        let first_line = raw.lines().next().unwrap_or("").trim();
        let trimmed = first_line.trim_matches(|c| c == '"' || c == '\'');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    async fn generate(&self, query: &str) -> Result<String, CorrectorError> {
        let cache_key = query.trim().to_lowercase();
        if let Some(cached) = self.cache.lock().unwrap().get(&cache_key).cloned() {
            return Ok(cached);
        }

        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": Self::prompt(query),
            "stream": false,
            "options": {
                "temperature": 0.1,
                "top_p": 0.9,
                "max_tokens": 64,
                "repeat_penalty": 1.05,
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CorrectorError::Stage(self.name().to_string(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(CorrectorError::Stage(
                self.name().to_string(),
                format!("http {}", response.status()),
            ));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CorrectorError::Stage(self.name().to_string(), e.to_string()))?;

        let raw_response = parsed["response"].as_str().unwrap_or("");
        let corrected = Self::extract_correction(raw_response).unwrap_or_else(|| query.to_string());

        self.cache
            .lock()
            .unwrap()
            .insert(cache_key, corrected.clone());

        Ok(corrected)
    }
}

#[async_trait]
impl Corrector for ModelCorrector {
    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn name(&self) -> &str {
        "Model"
    }

    async fn try_correct(
        &self,
        query: &str,
        cancel: &CancelToken,
        deadline: Option<Duration>,
    ) -> Result<CorrectorOutcome, CorrectorError> {
        if cancel.is_cancelled() {
            return Err(CorrectorError::Cancelled);
        }

        let call = self.generate(query);
        let corrected = match deadline {
            Some(d) => match tokio::time::timeout(d, call).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!("model corrector exceeded deadline of {d:?}");
                    return Err(CorrectorError::Timeout(self.name().to_string()));
                }
            },
            None => call.await?,
        };

        Ok(CorrectorOutcome::changed(self.name(), query, &corrected))
    }
}
