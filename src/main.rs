mod config;
mod llm;
mod logger;
mod pipeline;
mod present;
mod risk;
mod source;
mod summarizer;
mod text;

#[cfg(test)]
mod fixtures;

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, RiskClassifier, SummarizerMode};
use crate::pipeline::{AnalysisResult, Analyzer};
use crate::present::OutputFormat;
use crate::source::DocumentSource;

/// Summarizes a Terms of Service or Privacy Policy and rates its risk.
#[derive(Debug, Parser)]
#[command(name = "TermsInShort", version, about)]
struct Cli {
    /// Terms of Service or Privacy Policy URL
    #[arg(long, conflicts_with_all = ["pdf", "text"])]
    url: Option<String>,

    /// Terms and Conditions PDF
    #[arg(long, conflicts_with = "text")]
    pdf: Option<PathBuf>,

    /// Plain text file
    #[arg(long)]
    text: Option<PathBuf>,

    /// Summarizer to use (overrides config)
    #[arg(long, value_enum)]
    mode: Option<SummarizerMode>,

    /// Number of points for the local summarizer
    #[arg(long)]
    top_n: Option<usize>,

    /// Risk classifier (overrides config)
    #[arg(long, value_enum)]
    risk: Option<RiskClassifier>,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn source(&self) -> DocumentSource {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            DocumentSource::Url(url.to_string())
        } else if let Some(pdf) = &self.pdf {
            DocumentSource::Pdf(pdf.clone())
        } else if let Some(text) = &self.text {
            DocumentSource::Text(text.clone())
        } else {
            DocumentSource::Empty
        }
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.general.mode = mode;
        }
        if let Some(top_n) = self.top_n {
            config.general.top_n = top_n;
        }
        if let Some(risk) = self.risk {
            config.risk.classifier = risk;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.verbose) {
        eprintln!("[!] Failed to initialize logging: {}", e);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply_overrides(&mut config);

    log::info!(
        "[*] {} starting. Mode: {:?}, Provider: {}",
        config.general.page_title,
        config.general.mode,
        config.models.provider
    );

    let analyzer = Analyzer::new(config);
    let source = cli.source();

    let result = analyzer
        .analyze(&source)
        .await
        .with_context(|| format!("Failed to read {}", source.label()))?;

    let mut stdout = std::io::stdout();
    write!(stdout, "{}", present::render(&result, cli.format)?)?;
    stdout.flush()?;

    if let AnalysisResult::MissingInput { .. } = result {
        std::process::exit(2);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_inputs_are_exclusive() {
        let res = Cli::try_parse_from(["TermsInShort", "--url", "https://a.test", "--pdf", "a.pdf"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "TermsInShort",
            "--url",
            "https://example.com/terms",
            "--mode",
            "remote",
            "--top-n",
            "3",
            "--risk",
            "keyword",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.general.mode, SummarizerMode::Remote);
        assert_eq!(config.general.top_n, 3);
        assert_eq!(config.risk.classifier, RiskClassifier::Keyword);
        assert!(matches!(cli.source(), DocumentSource::Url(_)));
    }

    #[test]
    fn test_no_input_is_empty_source() {
        let cli = Cli::try_parse_from(["TermsInShort"]).unwrap();
        assert!(matches!(cli.source(), DocumentSource::Empty));
        assert_eq!(cli.format, OutputFormat::Text);

        let cli = Cli::try_parse_from(["TermsInShort", "--url", "   "]).unwrap();
        assert!(matches!(cli.source(), DocumentSource::Empty));
    }
}
