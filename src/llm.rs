use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::{HuggingFaceConfig, ModelConfig, OllamaConfig, OpenRouterConfig};

#[derive(Debug, thiserror::Error)]
pub enum RemoteModelError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Sampling and transport limits for one completion.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 250,
            temperature: 0.2,
            timeout: Duration::from_secs(60),
        }
    }
}

/// A hosted text-generation backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, RemoteModelError>;
}

/// Builds the provider named by `config.provider`.
pub fn provider_from_config(
    config: &ModelConfig,
) -> Result<Box<dyn CompletionProvider>, RemoteModelError> {
    let client = Client::new();
    match config.provider.as_str() {
        "huggingface" => {
            let hf = config
                .huggingface
                .clone()
                .ok_or_else(|| RemoteModelError::NotConfigured("[models.huggingface] missing".into()))?;
            if hf.api_token.trim().is_empty() {
                return Err(RemoteModelError::NotConfigured(
                    "Hugging Face API token not set (api_token or HF_API_TOKEN)".into(),
                ));
            }
            Ok(Box::new(HuggingFaceProvider::new(client, hf)))
        }
        "openrouter" => {
            let or = config
                .openrouter
                .clone()
                .ok_or_else(|| RemoteModelError::NotConfigured("[models.openrouter] missing".into()))?;
            Ok(Box::new(OpenRouterProvider::new(client, or)))
        }
        "ollama" => {
            let ollama = config.ollama.clone().unwrap_or_default();
            Ok(Box::new(OllamaProvider::new(client, ollama)))
        }
        other => Err(RemoteModelError::NotConfigured(format!(
            "unknown provider: {}",
            other
        ))),
    }
}

async fn read_json(res: reqwest::Response) -> Result<Value, RemoteModelError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(RemoteModelError::Api {
            status: status.as_u16(),
            body: body.chars().take(300).collect(),
        });
    }
    Ok(res.json().await?)
}

fn non_empty(text: &str) -> Result<String, RemoteModelError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RemoteModelError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Hugging Face Inference API, text-generation task.
pub struct HuggingFaceProvider {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceProvider {
    pub fn new(client: Client, config: HuggingFaceConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CompletionProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, RemoteModelError> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model_id
        );

        let body = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": params.max_new_tokens,
                "temperature": params.temperature,
                "return_full_text": false
            }
        });

        log::debug!("[Remote] POST {}", url);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .timeout(params.timeout)
            .json(&body)
            .send()
            .await?;

        let json = read_json(res).await?;
        parse_hf_response(&json)
    }
}

/// Inference API answers with `[{"generated_text": ...}]`, some deployments
/// with a bare object.
fn parse_hf_response(json: &Value) -> Result<String, RemoteModelError> {
    let text = json[0]["generated_text"]
        .as_str()
        .or_else(|| json["generated_text"].as_str())
        .ok_or_else(|| RemoteModelError::Parse("missing generated_text".into()))?;
    non_empty(text)
}

pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterProvider {
    pub fn new(client: Client, config: OpenRouterConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, RemoteModelError> {
        let body = json!({
            "model": self.config.model_id,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "max_tokens": params.max_new_tokens,
            "temperature": params.temperature
        });

        let res = self
            .client
            .post("https://openrouter.ai/api/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .timeout(params.timeout)
            .json(&body)
            .send()
            .await?;

        let json = read_json(res).await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| RemoteModelError::Parse("missing choices[0].message.content".into()))?;
        non_empty(content)
    }
}

pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn new(client: Client, config: OllamaConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, RemoteModelError> {
        let body = json!({
            "model": self.config.model_id,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": params.temperature,
                "num_predict": params.max_new_tokens
            }
        });

        let url = format!("{}/api/generate", self.config.base_url.trim_end_matches('/'));
        let res = self
            .client
            .post(&url)
            .timeout(params.timeout)
            .json(&body)
            .send()
            .await?;

        let json = read_json(res).await?;
        let response = json["response"]
            .as_str()
            .ok_or_else(|| RemoteModelError::Parse("no response field".into()))?;
        non_empty(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hf_array_response() {
        let json = json!([{"generated_text": "  1. They sell data.  "}]);
        assert_eq!(parse_hf_response(&json).unwrap(), "1. They sell data.");
    }

    #[test]
    fn test_parse_hf_object_response() {
        let json = json!({"generated_text": "1. Point"});
        assert_eq!(parse_hf_response(&json).unwrap(), "1. Point");
    }

    #[test]
    fn test_parse_hf_malformed_response() {
        let json = json!({"error": "Model is currently loading"});
        assert!(matches!(parse_hf_response(&json), Err(RemoteModelError::Parse(_))));

        let json = json!([{"generated_text": "   "}]);
        assert!(matches!(parse_hf_response(&json), Err(RemoteModelError::EmptyResponse)));
    }

    #[test]
    fn test_missing_token_is_not_configured() {
        let config = ModelConfig::default();
        assert!(matches!(
            provider_from_config(&config),
            Err(RemoteModelError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_unknown_provider() {
        let config = ModelConfig {
            provider: "carrier-pigeon".into(),
            ..ModelConfig::default()
        };
        assert!(matches!(
            provider_from_config(&config),
            Err(RemoteModelError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_ollama_defaults_when_section_missing() {
        let config = ModelConfig {
            provider: "ollama".into(),
            ..ModelConfig::default()
        };
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }
}
