//! Summarization backends
//!
//! `extractive` ranks existing sentences locally; `remote` asks a hosted
//! model for five plain-language points.

pub mod extractive;
pub mod remote;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Summary {
    /// Sentences picked verbatim from the document, most central first.
    Extracted(Vec<String>),
    /// A block of model-written (or fallback) text.
    Generated(String),
}

impl Summary {
    /// Number of points: sentences, or non-empty lines of generated text.
    pub fn len(&self) -> usize {
        match self {
            Summary::Extracted(sentences) => sentences.len(),
            Summary::Generated(text) => text.lines().filter(|l| !l.trim().is_empty()).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The summary as one string, for keyword scanning.
    pub fn text(&self) -> String {
        match self {
            Summary::Extracted(sentences) => sentences.join(" "),
            Summary::Generated(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMethod {
    Extractive,
    RemoteModel,
}

impl SummaryMethod {
    pub fn description(&self) -> &'static str {
        match self {
            SummaryMethod::Extractive => {
                "This summary is generated using extractive NLP-based sentence ranking."
            }
            SummaryMethod::RemoteModel => {
                "This summary is generated by a hosted language model and may contain mistakes."
            }
        }
    }
}
