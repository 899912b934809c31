use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub risk: RiskConfig,
}

/// Which summarizer produces the points.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerMode {
    /// TF-IDF sentence ranking, no network.
    Local,
    /// Hosted language model with a canned fallback.
    Remote,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RiskClassifier {
    /// Count-based for local summaries, keyword-based for remote ones.
    Auto,
    Count,
    Keyword,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_page_title")]
    pub page_title: String,
    #[serde(default = "default_mode")]
    pub mode: SummarizerMode,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            page_title: default_page_title(),
            mode: default_mode(),
            top_n: default_top_n(),
        }
    }
}

fn default_page_title() -> String {
    "TermsInShort".to_string()
}

fn default_mode() -> SummarizerMode {
    SummarizerMode::Local
}

fn default_top_n() -> usize {
    5
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("TermsInShort/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RemoteConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_remote_timeout(),
        }
    }
}

fn default_max_chars() -> usize {
    2500
}
fn default_max_new_tokens() -> u32 {
    250
}
fn default_temperature() -> f32 {
    0.2
}
fn default_remote_timeout() -> u64 {
    60
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub huggingface: Option<HuggingFaceConfig>,
    #[serde(default)]
    pub openrouter: Option<OpenRouterConfig>,
    #[serde(default)]
    pub ollama: Option<OllamaConfig>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            huggingface: Some(HuggingFaceConfig::default()),
            openrouter: None,
            ollama: None,
        }
    }
}

fn default_provider() -> String {
    "huggingface".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HuggingFaceConfig {
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_hf_model")]
    pub model_id: String,
    #[serde(default = "default_hf_base_url")]
    pub base_url: String,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            model_id: default_hf_model(),
            base_url: default_hf_base_url(),
        }
    }
}

fn default_hf_model() -> String {
    "mistralai/Mistral-7B-Instruct-v0.2".to_string()
}

fn default_hf_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OpenRouterConfig {
    #[serde(default)]
    pub api_key: String,
    pub model_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model_id: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model_id: "llama3".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RiskConfig {
    #[serde(default = "default_classifier")]
    pub classifier: RiskClassifier,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            classifier: default_classifier(),
        }
    }
}

fn default_classifier() -> RiskClassifier {
    RiskClassifier::Auto
}

impl Config {
    /// Loads `config.toml` from the default locations, falling back to
    /// built-in defaults when no file exists.
    pub fn load() -> Result<Self> {
        let config_path = get_config_path();
        if !config_path.exists() {
            log::info!("[Config] No config at {:?}, using defaults", config_path);
            let mut config = Config::default();
            config.apply_env_overrides();
            return Ok(config);
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config.toml at {:?}", path))?;

        let mut config = Self::parse(&content)?;
        config.apply_env_overrides();
        log::info!("[Config] Loaded {:?}", path);

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config.toml")
    }

    /// Secrets come from the environment when present so tokens need not
    /// live in the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("HF_API_TOKEN") {
            if !token.trim().is_empty() {
                self.models
                    .huggingface
                    .get_or_insert_with(HuggingFaceConfig::default)
                    .api_token = token;
            }
        }
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            if let Some(openrouter) = self.models.openrouter.as_mut() {
                if !key.trim().is_empty() {
                    openrouter.api_key = key;
                }
            }
        }
    }

    /// Resolves `auto` against the active summarizer.
    pub fn effective_classifier(&self) -> RiskClassifier {
        match (self.risk.classifier, self.general.mode) {
            (RiskClassifier::Auto, SummarizerMode::Local) => RiskClassifier::Count,
            (RiskClassifier::Auto, SummarizerMode::Remote) => RiskClassifier::Keyword,
            (other, _) => other,
        }
    }
}

pub fn get_exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn get_config_path() -> PathBuf {
    let exe_dir = get_exe_dir();
    let config_path = exe_dir.join("config").join("config.toml");

    if config_path.exists() {
        return config_path;
    }

    let cwd_config = PathBuf::from("config/config.toml");
    if cwd_config.exists() {
        return cwd_config;
    }

    config_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.general.page_title, "TermsInShort");
        assert_eq!(config.general.mode, SummarizerMode::Local);
        assert_eq!(config.general.top_n, 5);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.remote.max_chars, 2500);
        assert_eq!(config.remote.max_new_tokens, 250);
        assert!((config.remote.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.remote.timeout_secs, 60);
        assert_eq!(config.models.provider, "huggingface");
        assert_eq!(config.risk.classifier, RiskClassifier::Auto);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config = Config::parse(
            r#"
            [general]
            mode = "remote"

            [remote]
            max_chars = 1000

            [models]
            provider = "ollama"

            [models.ollama]
            base_url = "http://127.0.0.1:11434"
            model_id = "phi3"
            "#,
        )
        .unwrap();

        assert_eq!(config.general.mode, SummarizerMode::Remote);
        assert_eq!(config.general.top_n, 5);
        assert_eq!(config.remote.max_chars, 1000);
        assert_eq!(config.remote.max_new_tokens, 250);
        assert_eq!(config.models.provider, "ollama");
        assert_eq!(config.models.ollama.unwrap().model_id, "phi3");
        assert!(config.models.huggingface.is_none());
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        assert!(Config::parse("[general]\nmode = \"psychic\"").is_err());
    }

    #[test]
    fn test_auto_classifier_follows_mode() {
        let mut config = Config::default();
        assert_eq!(config.effective_classifier(), RiskClassifier::Count);

        config.general.mode = SummarizerMode::Remote;
        assert_eq!(config.effective_classifier(), RiskClassifier::Keyword);

        config.risk.classifier = RiskClassifier::Count;
        assert_eq!(config.effective_classifier(), RiskClassifier::Count);
    }
}
