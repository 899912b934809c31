//! TF-IDF centrality ranking.
//!
//! Every sentence is treated as its own document. Sentences are embedded as
//! L2-normalized TF-IDF vectors and scored by their summed cosine similarity
//! to the whole collection, so sentences that share vocabulary with many
//! others rank first.

use regex::Regex;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use stop_words::{get, LANGUAGE};

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static regex"))
}

/// Sparse unit vector: term index -> weight.
type SparseVector = HashMap<usize, f64>;

pub struct ExtractiveSummarizer {
    top_n: usize,
    stopwords: HashSet<String>,
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ExtractiveSummarizer {
    pub fn new(top_n: usize) -> Self {
        let stopwords = get(LANGUAGE::English)
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        Self { top_n, stopwords }
    }

    /// Returns the `top_n` most central sentences, most central first.
    ///
    /// Collections no larger than `top_n` come back untouched in document
    /// order. Equal scores keep document order.
    pub fn summarize(&self, sentences: &[String]) -> Vec<String> {
        if sentences.len() <= self.top_n {
            return sentences.to_vec();
        }

        let scores = self.centrality_scores(sentences);

        let mut ranked: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        log::debug!(
            "[Summarizer] Ranked {} sentences, keeping {}",
            ranked.len(),
            self.top_n
        );

        ranked
            .into_iter()
            .take(self.top_n)
            .map(|(idx, _)| sentences[idx].clone())
            .collect()
    }

    /// Row sums of the cosine similarity matrix, diagonal included.
    pub fn centrality_scores(&self, sentences: &[String]) -> Vec<f64> {
        let vectors = self.tfidf_vectors(sentences);

        let mut scores = vec![0.0; vectors.len()];
        for i in 0..vectors.len() {
            for j in i..vectors.len() {
                let sim = dot(&vectors[i], &vectors[j]);
                scores[i] += sim;
                if i != j {
                    scores[j] += sim;
                }
            }
        }
        scores
    }

    fn tokenize(&self, sentence: &str) -> Vec<String> {
        let lower = sentence.to_lowercase();
        token_re()
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|token| !self.stopwords.contains(*token))
            .map(str::to_string)
            .collect()
    }

    fn tfidf_vectors(&self, sentences: &[String]) -> Vec<SparseVector> {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut term_counts: Vec<HashMap<usize, f64>> = Vec::with_capacity(sentences.len());

        for sentence in sentences {
            let mut counts = HashMap::new();
            for token in self.tokenize(sentence) {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token).or_insert(next);
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
            term_counts.push(counts);
        }

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for counts in &term_counts {
            for idx in counts.keys() {
                doc_freq[*idx] += 1;
            }
        }

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let n = sentences.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|df| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        term_counts
            .into_iter()
            .map(|counts| {
                let mut vector: SparseVector = counts
                    .into_iter()
                    .map(|(idx, tf)| (idx, tf * idf[idx]))
                    .collect();
                normalize(&mut vector);
                vector
            })
            .collect()
    }
}

fn normalize(vector: &mut SparseVector) {
    let norm = vector.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in vector.values_mut() {
            *value /= norm;
        }
    }
}

fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(idx, weight)| large.get(idx).map(|other| weight * other))
        .sum()
}
