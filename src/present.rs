use anyhow::Result;
use clap::ValueEnum;

use crate::pipeline::{AnalysisResult, Report};
use crate::summarizer::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

pub fn render(result: &AnalysisResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)? + "\n"),
        OutputFormat::Text => Ok(match result {
            AnalysisResult::MissingInput { warning } => format!("[!] {}\n", warning),
            AnalysisResult::Report(report) => render_text(report),
        }),
        OutputFormat::Html => Ok(match result {
            AnalysisResult::MissingInput { warning } => {
                format!("<div class=\"warning\">{}</div>\n", escape_html(warning))
            }
            AnalysisResult::Report(report) => render_html(report),
        }),
    }
}

fn heading(report: &Report) -> String {
    let count = match &report.summary {
        Summary::Extracted(points) => points.len(),
        Summary::Generated(_) => 5,
    };
    format!("{} Things You Should Know", count)
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} - {}\n", report.title, report.source));
    out.push('\n');
    out.push_str(&format!("{}\n", heading(report)));

    if report.summary.is_empty() {
        out.push_str("  (no sentences long enough to summarize)\n");
    }

    match &report.summary {
        Summary::Extracted(points) => {
            for (i, point) in points.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, point));
            }
        }
        Summary::Generated(text) => {
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                out.push_str(&format!("  {}\n", line.trim()));
            }
        }
    }

    out.push('\n');
    out.push_str(&format!("Risk Level: {}\n", report.risk));
    if report.fallback_used {
        out.push_str("Note: the language model could not be reached; showing a generic summary.\n");
    }
    out.push_str(&format!("{}\n", report.method.description()));
    out
}

fn render_html(report: &Report) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"result-card\">\n");
    html.push_str(&format!("  <h3>{}</h3>\n", escape_html(&heading(report))));

    match &report.summary {
        Summary::Extracted(points) => {
            html.push_str("  <ol>\n");
            for point in points {
                html.push_str(&format!("    <li>{}</li>\n", escape_html(point)));
            }
            html.push_str("  </ol>\n");
        }
        Summary::Generated(text) => {
            html.push_str(&format!("  <pre>{}</pre>\n", escape_html(text.trim())));
        }
    }

    html.push_str(&format!(
        "  <p style=\"margin-top:16px;\"><strong>Risk Level:</strong> {}</p>\n",
        report.risk
    ));
    if report.fallback_used {
        html.push_str("  <p class=\"fallback\">The language model could not be reached; showing a generic summary.</p>\n");
    }
    html.push_str(&format!(
        "  <p style=\"font-size:12px; opacity:0.85;\">{}</p>\n",
        escape_html(report.method.description())
    ));
    html.push_str("</div>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
