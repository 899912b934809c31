use serde::Serialize;
use std::fmt;

/// Terms whose presence in a summary raises the keyword score.
pub const RISK_KEYWORDS: [&str; 7] = [
    "data",
    "share",
    "sell",
    "terminate",
    "arbitration",
    "license",
    "tracking",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    fn from_score(score: usize) -> Self {
        if score >= 4 {
            RiskLevel::High
        } else if score >= 2 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rates risk by how many summary points were produced.
///
/// With the default of five points this is HIGH for nearly every document.
pub fn risk_level_from_count(points: usize) -> RiskLevel {
    RiskLevel::from_score(points)
}

/// Number of distinct keywords contained in `text`, case-insensitively.
///
/// Plain substring containment: "database" counts for "data", and repeats of
/// one keyword count once.
pub fn keyword_score(text: &str) -> usize {
    let lower = text.to_lowercase();
    RISK_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(**keyword))
        .count()
}

pub fn keyword_risk(text: &str) -> RiskLevel {
    RiskLevel::from_score(keyword_score(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_boundaries() {
        assert_eq!(risk_level_from_count(5), RiskLevel::High);
        assert_eq!(risk_level_from_count(4), RiskLevel::High);
        assert_eq!(risk_level_from_count(3), RiskLevel::Medium);
        assert_eq!(risk_level_from_count(2), RiskLevel::Medium);
        assert_eq!(risk_level_from_count(1), RiskLevel::Low);
        assert_eq!(risk_level_from_count(0), RiskLevel::Low);
    }

    #[test]
    fn test_keyword_risk_high() {
        let text = "We may share and sell your data; arbitration required.";
        assert_eq!(keyword_score(text), 4);
        assert_eq!(keyword_risk(text), RiskLevel::High);
    }

    #[test]
    fn test_keyword_is_case_insensitive_substring() {
        assert_eq!(keyword_score("DATABASE licensed"), 2);
        assert_eq!(keyword_risk("DATABASE licensed"), RiskLevel::Medium);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        assert_eq!(keyword_score("data data data data"), 1);
        assert_eq!(keyword_risk("data data data data"), RiskLevel::Low);
    }

    #[test]
    fn test_no_keywords_is_low() {
        assert_eq!(keyword_risk("You can cancel at any time."), RiskLevel::Low);
        assert_eq!(keyword_risk(""), RiskLevel::Low);
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(RiskLevel::Medium.to_string(), "MEDIUM");
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
    }
}
