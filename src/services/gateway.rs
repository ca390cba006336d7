use crate::config::ProviderSettings;
use crate::models::{ChatMessage, ChatRequest, ChatResponse, Provider};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors from a single provider attempt
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API returned {0}: {1}")]
    ApiFailure(StatusCode, String),

    #[error("response contained no answer text")]
    EmptyAnswer,
}

/// One failed attempt, kept for the combined error
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: Provider,
    pub error: ProviderError,
}

/// Errors from the whole attempt chain
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no LLM provider API key is configured")]
    NotConfigured,

    #[error("all LLM providers failed: {}", summarize(.0))]
    AllProvidersFailed(Vec<ProviderFailure>),
}

fn summarize(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.provider.as_str(), f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A completion plus which provider actually served it
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub provider: Provider,
}

/// Model ids for the primary and fallback attempts of one call
#[derive(Debug, Clone)]
pub struct CompletionModels {
    pub primary: String,
    pub fallback: String,
}

impl From<&ProviderSettings> for CompletionModels {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            primary: settings.primary_model.clone(),
            fallback: settings.fallback_model.clone(),
        }
    }
}

struct Attempt<'a> {
    provider: Provider,
    url: &'a str,
    api_key: &'a str,
    model: &'a str,
}

/// Provider-agnostic chat-completion client
///
/// Tries OpenRouter first, then OpenAI, and reports which provider answered.
/// There is exactly one fallback hop; no backoff, no circuit breaker.
pub struct ProviderGateway {
    settings: ProviderSettings,
    client: Client,
}

impl ProviderGateway {
    /// Create a new gateway from injected settings
    pub fn new(settings: ProviderSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { settings, client }
    }

    /// Whether at least one provider key is configured
    pub fn has_any_provider(&self) -> bool {
        self.settings.openrouter_api_key.is_some() || self.settings.openai_api_key.is_some()
    }

    /// Default model pair from the injected settings
    pub fn default_models(&self) -> CompletionModels {
        CompletionModels::from(&self.settings)
    }

    /// Build the ordered attempt chain for one call
    ///
    /// OpenAI joins the chain as fallback only when enabled, or as primary
    /// when no OpenRouter key exists at all.
    fn attempts<'a>(&'a self, models: &'a CompletionModels) -> Vec<Attempt<'a>> {
        let mut attempts = Vec::with_capacity(2);

        if let Some(key) = self.settings.openrouter_api_key.as_deref() {
            attempts.push(Attempt {
                provider: Provider::Openrouter,
                url: &self.settings.openrouter_url,
                api_key: key,
                model: &models.primary,
            });
        }

        if let Some(key) = self.settings.openai_api_key.as_deref() {
            if self.settings.enable_fallback || attempts.is_empty() {
                attempts.push(Attempt {
                    provider: Provider::Openai,
                    url: &self.settings.openai_url,
                    api_key: key,
                    model: &models.fallback,
                });
            }
        }

        attempts
    }

    /// Request a chat completion, falling back across providers
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        models: &CompletionModels,
    ) -> Result<Completion, GatewayError> {
        let attempts = self.attempts(models);
        if attempts.is_empty() {
            return Err(GatewayError::NotConfigured);
        }
        let last = attempts.len() - 1;

        let mut failures = Vec::new();
        for (i, attempt) in attempts.into_iter().enumerate() {
            match self.try_provider(&attempt, messages).await {
                Ok(text) => {
                    tracing::debug!(
                        "Completion served by {} ({} chars)",
                        attempt.provider.as_str(),
                        text.len()
                    );
                    return Ok(Completion {
                        text,
                        provider: attempt.provider,
                    });
                }
                Err(error) => {
                    if i < last {
                        tracing::warn!(
                            "{} attempt failed ({}), trying fallback",
                            attempt.provider.as_str(),
                            error
                        );
                    } else {
                        tracing::warn!(
                            "{} attempt failed ({}), no fallback left",
                            attempt.provider.as_str(),
                            error
                        );
                    }
                    failures.push(ProviderFailure {
                        provider: attempt.provider,
                        error,
                    });
                }
            }
        }

        Err(GatewayError::AllProvidersFailed(failures))
    }

    async fn try_provider(
        &self,
        attempt: &Attempt<'_>,
        messages: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        let payload = ChatRequest {
            model: attempt.model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
        };

        let mut request = self
            .client
            .post(attempt.url)
            .bearer_auth(attempt.api_key)
            .json(&payload);

        // OpenRouter wants to know who is calling
        if attempt.provider == Provider::Openrouter {
            request = request
                .header("HTTP-Referer", &self.settings.referer)
                .header("X-Title", &self.settings.app_title);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiFailure(status, detail));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyAnswer)
    }
}
