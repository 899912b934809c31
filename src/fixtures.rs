//! Sample documents used by the tests.

pub const SAMPLE_TERMS: &str = r#"TERMS OF SERVICE

Last Updated: January 2026

1. ACCOUNTS
You must be at least 16 years old to create an account with Example Corp.
You are responsible for keeping your password confidential and secure.

2. PERSONAL DATA
We collect personal data such as your name, email address and device identifiers.
We use tracking cookies to measure how you use the service and to show you ads.
Your personal data may be shared with advertising partners and analytics providers.
We may sell aggregated personal data to third parties for marketing purposes.

3. YOUR CONTENT
You grant us a worldwide, royalty-free license to use any content you upload.
This license continues even after you delete your account.

4. TERMINATION
We may terminate or suspend your account at any time without prior notice.
We are not liable for any loss of data caused by termination of your account.

5. DISPUTES
Any dispute will be resolved by binding arbitration rather than in court.
You waive any right to participate in a class action lawsuit against us.

6. CHANGES
We may change these terms at any time and continued use means you accept them."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{chunk_text, normalize_whitespace, split_sentences};

    #[test]
    fn test_sample_fits_one_chunk() {
        let normalized = normalize_whitespace(SAMPLE_TERMS);
        assert!(normalized.chars().count() < 2500);
        assert_eq!(chunk_text(&normalized, 2500).len(), 1);
        assert!(split_sentences(&normalized).len() > 5);
    }
}
