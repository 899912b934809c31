use crate::llm::{CompletionProvider, GenerationParams, RemoteModelError};
use crate::text::chunk_text;

/// Shown in place of a model answer whenever the remote call fails.
pub const FALLBACK_SUMMARY: &str = "\
1. The company may collect personal data about you and how you use the service.
2. Your data may be shared with partners, advertisers or other third parties.
3. The company can change these terms or terminate your account, often without notice.
4. Disputes may have to go through arbitration instead of a court.
5. You grant the company a license to content you upload or create.";

/// Prompt sent with the first chunk of the document.
pub fn build_prompt(chunk: &str) -> String {
    format!(
        "You are a consumer-rights assistant reviewing a legal document on behalf of a user.\n\
         Summarize the Terms of Service or Privacy Policy below in exactly 5 numbered points.\n\
         Use plain, simple language a non-lawyer understands.\n\
         Focus on risks to the user: data collection, data sharing or selling, tracking, \
         account termination, arbitration, and content licenses.\n\
         Do not defend or justify the company.\n\
         \n\
         Document:\n\
         {}\n\
         \n\
         5 points:",
        chunk
    )
}

pub struct RemoteSummarizer {
    provider: Box<dyn CompletionProvider>,
    params: GenerationParams,
    max_chars: usize,
}

/// What the model was asked about and what it said.
#[derive(Debug, Clone)]
pub struct RemoteSummary {
    pub text: String,
    pub chunk_count: usize,
}

impl RemoteSummarizer {
    pub fn new(provider: Box<dyn CompletionProvider>, params: GenerationParams, max_chars: usize) -> Self {
        Self {
            provider,
            params,
            max_chars,
        }
    }

    /// Summarizes the first chunk of `text`.
    ///
    /// Errors are returned as-is; substituting [`FALLBACK_SUMMARY`] is up to
    /// the caller. The call is made once, without retries.
    pub async fn summarize(&self, text: &str) -> Result<RemoteSummary, RemoteModelError> {
        let chunks = chunk_text(text, self.max_chars);
        // TODO: summarize the remaining chunks and merge the points instead of dropping them.
        let first = chunks.first().map(String::as_str).unwrap_or_default();
        if chunks.len() > 1 {
            log::debug!(
                "[Remote] Using first of {} chunks ({} chars), discarding the rest",
                chunks.len(),
                first.chars().count()
            );
        }

        log::info!("[Remote] Querying {}...", self.provider.name());
        let text = self
            .provider
            .complete(&build_prompt(first), &self.params)
            .await?;

        Ok(RemoteSummary {
            text,
            chunk_count: chunks.len(),
        })
    }
}
