//! Heading detection for plain-text documents.
//!
//! Plain text carries no explicit heading markup, so headings are
//! recognized by shape. Rules run in a fixed order and the first match
//! wins: numbered outline prefixes, all-uppercase lines, structural
//! keywords, then title-case lines. Two rejection gates run before any
//! rule so long prose lines never become headings.

use regex::Regex;

use super::options::HeadingConfig;

/// Detects heading lines and their levels in plain text.
pub struct HeadingDetector {
    config: HeadingConfig,
    numbered: Regex,
    keyword: Regex,
}

impl HeadingDetector {
    /// Create a new heading detector with default configuration.
    pub fn new() -> Self {
        Self::with_config(HeadingConfig::default())
    }

    /// Create a new heading detector with custom configuration.
    pub fn with_config(config: HeadingConfig) -> Self {
        Self {
            config,
            numbered: Regex::new(r"^(\d+(?:\.\d+)*\.?)\s+(.+)$").unwrap(),
            keyword: Regex::new(r"(?i)^(phase|section|part|chapter)\s+\d").unwrap(),
        }
    }

    /// Detect whether a line is a heading.
    ///
    /// Returns the heading level (1 through 6) or `None`. The heading
    /// title is always the full trimmed line, numbering prefix included.
    pub fn detect(&self, line: &str) -> Option<u8> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let len = trimmed.chars().count();

        // Rejection gates: long lines and sentence-like lines are prose.
        if len > self.config.max_line_len {
            return None;
        }
        if trimmed.ends_with('.')
            && trimmed.split(' ').count() > self.config.sentence_word_limit
        {
            return None;
        }

        // Numbered outline prefix: "2. Scope", "1.2.3 Risk Management".
        // Level is the number of dot-separated groups, capped at 6.
        if let Some(caps) = self.numbered.captures(trimmed) {
            let groups = caps[1].split('.').filter(|g| !g.is_empty()).count();
            let level = groups.min(6) as u8;
            log::trace!("heading (numbered, level {}): {}", level, trimmed);
            return Some(level);
        }

        // All-uppercase line of plausible heading length. Uppercase lines
        // are only ever headings via this rule or the keyword rule; a
        // short "OK" must not fall through to the title-case rule below.
        let all_upper =
            trimmed == trimmed.to_uppercase() && trimmed.chars().any(char::is_uppercase);
        if all_upper
            && len > self.config.uppercase_min_len
            && len < self.config.uppercase_max_len
        {
            log::trace!("heading (uppercase): {}", trimmed);
            return Some(1);
        }

        // Structural keyword followed by a number: "Phase 2", "Section 3".
        if self.keyword.is_match(trimmed) {
            log::trace!("heading (keyword): {}", trimmed);
            return Some(1);
        }

        // Short title-case line that does not read like a sentence.
        if !all_upper
            && len < self.config.title_case_max_len
            && !trimmed.ends_with('.')
            && !trimmed.ends_with(',')
            && self.is_title_case(trimmed)
        {
            log::trace!("heading (title case): {}", trimmed);
            return Some(2);
        }

        None
    }

    /// Check whether enough words start with a non-lowercase character.
    ///
    /// Splits on single spaces so repeated spaces produce empty words;
    /// those count in the denominator and the word limit, making messy
    /// spacing read less title-like.
    fn is_title_case(&self, line: &str) -> bool {
        let words: Vec<&str> = line.split(' ').collect();
        if words.len() > self.config.title_case_max_words {
            return false;
        }
        let capitalized = words
            .iter()
            .filter(|w| w.chars().next().map_or(false, |c| !c.is_lowercase()))
            .count();
        capitalized as f32 >= words.len() as f32 * self.config.title_case_min_ratio
    }
}

impl Default for HeadingDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_headings() {
        let detector = HeadingDetector::new();
        assert_eq!(detector.detect("1. Overview"), Some(1));
        assert_eq!(detector.detect("1.2 Goals"), Some(2));
        assert_eq!(detector.detect("1.2.3 Risk Management"), Some(3));
        assert_eq!(detector.detect("2 Timeline"), Some(1));
    }

    #[test]
    fn test_numbered_level_caps_at_six() {
        let detector = HeadingDetector::new();
        assert_eq!(detector.detect("1.1.1.1.1.1.1.1 Deep Item"), Some(6));
    }

    #[test]
    fn test_bare_numbering_is_not_a_heading() {
        let detector = HeadingDetector::new();
        // The numbered rule needs text after the prefix, and the trailing
        // period blocks the title-case rule.
        assert_eq!(detector.detect("1."), None);
    }

    #[test]
    fn test_uppercase_headings() {
        let detector = HeadingDetector::new();
        assert_eq!(detector.detect("TEST"), Some(1));
        assert_eq!(detector.detect("DELIVERABLES AND MILESTONES"), Some(1));
    }

    #[test]
    fn test_short_uppercase_is_rejected_entirely() {
        let detector = HeadingDetector::new();
        // Fails the length bound of the uppercase rule and must not be
        // picked up by the title-case rule either.
        assert_eq!(detector.detect("OK"), None);
        assert_eq!(detector.detect("FAQ"), None);
    }

    #[test]
    fn test_keyword_headings() {
        let detector = HeadingDetector::new();
        assert_eq!(detector.detect("Phase 2 Deliverables"), Some(1));
        assert_eq!(detector.detect("Section 3: Payment Terms"), Some(1));
        assert_eq!(detector.detect("chapter 1 introduction"), Some(1));
        // Keyword without a number is not structural
        assert_eq!(detector.detect("Phase two begins later"), None);
    }

    #[test]
    fn test_title_case_headings() {
        let detector = HeadingDetector::new();
        assert_eq!(detector.detect("Statement of Work"), Some(2));
        assert_eq!(detector.detect("Project Scope And Deliverables"), Some(2));
    }

    #[test]
    fn test_title_case_rejects_sentences() {
        let detector = HeadingDetector::new();
        assert_eq!(detector.detect("This is a sentence that ends."), None);
        assert_eq!(detector.detect("Continues below,"), None);
        assert_eq!(
            detector.detect("the consultant will provide ongoing support"),
            None
        );
    }

    #[test]
    fn test_title_case_counts_uncased_words_as_capitalized() {
        let detector = HeadingDetector::new();
        // Digits have no case, so they count toward the capitalized half.
        assert_eq!(detector.detect("Q1 2024 Budget Summary"), Some(2));
    }

    #[test]
    fn test_title_case_words_split_on_spaces_only() {
        let detector = HeadingDetector::new();
        // A tab-separated pair with no spaces is one capitalized word, so
        // short capitalized table rows read as headings, not rows.
        assert_eq!(detector.detect("Phase\tStart"), Some(2));
    }

    #[test]
    fn test_rejection_gates() {
        let detector = HeadingDetector::new();
        let long_line = "A".repeat(101);
        assert_eq!(detector.detect(&long_line), None);

        let sentence =
            "The contractor shall deliver all work products described in this statement of work.";
        assert_eq!(detector.detect(sentence), None);
    }

    #[test]
    fn test_blank_lines_are_not_headings() {
        let detector = HeadingDetector::new();
        assert_eq!(detector.detect(""), None);
        assert_eq!(detector.detect("   "), None);
    }

    #[test]
    fn test_custom_config() {
        let detector = HeadingDetector::with_config(HeadingConfig {
            uppercase_min_len: 1,
            ..Default::default()
        });
        assert_eq!(detector.detect("OK"), Some(1));
    }
}
