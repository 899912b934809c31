use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::{Config, RiskClassifier, SummarizerMode};
use crate::llm::{self, CompletionProvider, GenerationParams};
use crate::risk::{self, RiskLevel};
use crate::source::{self, AcquireError, DocumentSource};
use crate::summarizer::extractive::ExtractiveSummarizer;
use crate::summarizer::remote::{RemoteSummarizer, FALLBACK_SUMMARY};
use crate::summarizer::{Summary, SummaryMethod};
use crate::text;

pub const MISSING_INPUT_WARNING: &str = "Please provide a valid URL or PDF.";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisResult {
    /// The document had no text; nothing was summarized.
    MissingInput { warning: String },
    Report(Report),
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub source: String,
    pub method: SummaryMethod,
    pub summary: Summary,
    pub risk: RiskLevel,
    pub risk_score: usize,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub sentence_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<usize>,
    pub analyzed_at: String,
}

/// Runs one document through acquisition, summarization and risk scoring.
pub struct Analyzer {
    config: Config,
    client: Client,
    extractive: ExtractiveSummarizer,
    remote: Option<RemoteSummarizer>,
    remote_init_error: Option<String>,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        let (provider, remote_init_error) = match config.general.mode {
            SummarizerMode::Local => (None, None),
            SummarizerMode::Remote => match llm::provider_from_config(&config.models) {
                Ok(provider) => (Some(provider), None),
                Err(e) => {
                    log::warn!("[Analyzer] Remote model unavailable: {}", e);
                    (None, Some(e.to_string()))
                }
            },
        };
        Self::build(config, provider, remote_init_error)
    }

    /// Uses `provider` for the remote summarizer regardless of `[models]`.
    pub fn with_provider(config: Config, provider: Box<dyn CompletionProvider>) -> Self {
        Self::build(config, Some(provider), None)
    }

    fn build(
        config: Config,
        provider: Option<Box<dyn CompletionProvider>>,
        remote_init_error: Option<String>,
    ) -> Self {
        let params = GenerationParams {
            max_new_tokens: config.remote.max_new_tokens,
            temperature: config.remote.temperature,
            timeout: Duration::from_secs(config.remote.timeout_secs),
        };
        let remote = provider.map(|p| RemoteSummarizer::new(p, params, config.remote.max_chars));

        Self {
            extractive: ExtractiveSummarizer::new(config.general.top_n),
            client: Client::new(),
            config,
            remote,
            remote_init_error,
        }
    }

    /// Fetches or reads `source` and analyzes it. Acquisition failures are
    /// returned to the caller untouched.
    pub async fn analyze(&self, source: &DocumentSource) -> Result<AnalysisResult, AcquireError> {
        let raw = source::acquire(&self.client, source, &self.config.fetch).await?;
        Ok(self.analyze_text(&raw, &source.label()).await)
    }

    pub async fn analyze_text(&self, raw: &str, source_label: &str) -> AnalysisResult {
        let normalized = text::normalize_whitespace(raw);
        if normalized.trim().is_empty() {
            log::info!("[Analyzer] No text extracted from {}", source_label);
            return AnalysisResult::MissingInput {
                warning: MISSING_INPUT_WARNING.to_string(),
            };
        }

        let sentences = text::split_sentences(&normalized);
        log::info!(
            "[Analyzer] {} chars, {} candidate sentences from {}",
            normalized.chars().count(),
            sentences.len(),
            source_label
        );

        let mut fallback_reason = None;
        let mut chunk_count = None;

        let (method, summary) = match self.config.general.mode {
            SummarizerMode::Local => (
                SummaryMethod::Extractive,
                Summary::Extracted(self.extractive.summarize(&sentences)),
            ),
            SummarizerMode::Remote => {
                let outcome = match &self.remote {
                    Some(remote) => remote.summarize(&normalized).await.map_err(|e| e.to_string()),
                    None => Err(self
                        .remote_init_error
                        .clone()
                        .unwrap_or_else(|| "remote model not configured".to_string())),
                };
                let generated_text = match outcome {
                    Ok(generated) => {
                        chunk_count = Some(generated.chunk_count);
                        generated.text
                    }
                    Err(reason) => {
                        log::warn!("[Analyzer] Remote summary failed, using fallback: {}", reason);
                        chunk_count = Some(text::chunk_text(&normalized, self.config.remote.max_chars).len());
                        fallback_reason = Some(reason);
                        FALLBACK_SUMMARY.to_string()
                    }
                };
                (SummaryMethod::RemoteModel, Summary::Generated(generated_text))
            }
        };

        let (risk, risk_score) = match self.config.effective_classifier() {
            RiskClassifier::Keyword => {
                let score = risk::keyword_score(&summary.text());
                (risk::keyword_risk(&summary.text()), score)
            }
            _ => (risk::risk_level_from_count(summary.len()), summary.len()),
        };

        AnalysisResult::Report(Report {
            title: self.config.general.page_title.clone(),
            source: source_label.to_string(),
            method,
            summary,
            risk,
            risk_score,
            fallback_used: fallback_reason.is_some(),
            fallback_reason,
            sentence_count: sentences.len(),
            chunk_count,
            analyzed_at: chrono::Local::now().to_rfc3339(),
        })
    }
}
