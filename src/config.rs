use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub providers: ProviderSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// LLM provider credentials, endpoints and sampling parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openrouter_url")]
    pub openrouter_url: String,
    #[serde(default = "default_openai_url")]
    pub openai_url: String,
    /// Model id sent to OpenRouter
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
    /// Model id sent to OpenAI when falling back
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,
    /// Whether a failed OpenRouter call may retry against OpenAI
    #[serde(default = "default_true")]
    pub enable_fallback: bool,
    /// Sent as HTTP-Referer to OpenRouter
    #[serde(default = "default_referer")]
    pub referer: String,
    /// Sent as X-Title to OpenRouter
    #[serde(default = "default_app_title")]
    pub app_title: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openai_api_key: None,
            openrouter_url: default_openrouter_url(),
            openai_url: default_openai_url(),
            primary_model: default_primary_model(),
            fallback_model: default_fallback_model(),
            enable_fallback: default_true(),
            referer: default_referer(),
            app_title: default_app_title(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

fn default_openrouter_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}
fn default_openai_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_primary_model() -> String {
    "openai/gpt-4o-mini".to_string()
}
fn default_fallback_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_true() -> bool {
    true
}
fn default_referer() -> String {
    "https://yoohoo.guru".to_string()
}
fn default_app_title() -> String {
    "YooHoo Guru".to_string()
}
fn default_max_tokens() -> u32 {
    2000
}
fn default_temperature() -> f64 {
    0.7
}
fn default_top_p() -> f64 {
    0.9
}

/// Matching defaults applied when a caller passes no explicit options
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_match_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_match_limit(),
            max_limit: default_max_limit(),
            min_score: default_min_score(),
        }
    }
}

fn default_match_limit() -> usize {
    5
}
fn default_max_limit() -> usize {
    20
}
fn default_min_score() -> f64 {
    70.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with YOOHOO_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., YOOHOO_PROVIDERS__PRIMARY_MODEL -> providers.primary_model
            .add_source(
                Environment::with_prefix("YOOHOO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Plain API-key variables override nested config values
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("YOOHOO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply plain environment-variable overrides for provider API keys
///
/// Deployments set OPENROUTER_API_KEY / OPENAI_API_KEY directly; those win over
/// anything in the config files or the YOOHOO_-prefixed namespace.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let openrouter_key = env::var("OPENROUTER_API_KEY")
        .or_else(|_| env::var("YOOHOO_PROVIDERS__OPENROUTER_API_KEY"))
        .ok();
    let openai_key = env::var("OPENAI_API_KEY")
        .or_else(|_| env::var("YOOHOO_PROVIDERS__OPENAI_API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(key) = openrouter_key {
        builder = builder.set_override("providers.openrouter_api_key", key)?;
    }
    if let Some(key) = openai_key {
        builder = builder.set_override("providers.openai_api_key", key)?;
    }

    builder.build()
}
