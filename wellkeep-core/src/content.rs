//! Keyword-based content checks: crisis detection and word filtering.
//!
//! Matching is case-insensitive and substring-based (no word boundaries),
//! which suits the mixed Chinese/English keyword lists these checks carry.

use log::debug;
use once_cell::sync::Lazy;

use wellkeep_lexicon::Lexicon;

use crate::config::{default_policy, SecurityPolicy};
use crate::errors::WellkeepError;

/// Compiled keyword sets for one policy.
#[derive(Debug)]
pub struct PolicyScanner {
    crisis_rule: Lexicon,
    crisis_content: Lexicon,
    blocked: Lexicon,
}

impl PolicyScanner {
    pub fn new(policy: &SecurityPolicy) -> Result<Self, WellkeepError> {
        let scanner = Self {
            crisis_rule: Lexicon::new(&policy.crisis_keywords.rule)?,
            crisis_content: Lexicon::new(&policy.crisis_keywords.content)?,
            blocked: Lexicon::new(&policy.blocked_words)?,
        };
        debug!(
            "Built keyword scanner: {} rule terms, {} content terms, {} blocked words.",
            scanner.crisis_rule.words().len(),
            scanner.crisis_content.words().len(),
            scanner.blocked.words().len()
        );
        Ok(scanner)
    }

    /// Matches against the short list used by the `crisisDetection` form rule.
    pub fn flags_crisis_rule(&self, text: &str) -> bool {
        self.crisis_rule.contains_any(text)
    }

    /// Matches against the full bilingual crisis list.
    pub fn detects_crisis(&self, text: &str) -> bool {
        self.crisis_content.contains_any(text)
    }

    /// Masks each blocked word with one `*` per character.
    pub fn filter(&self, text: &str) -> String {
        self.blocked.mask(text, '*')
    }
}

static DEFAULT_SCANNER: Lazy<PolicyScanner> = Lazy::new(|| {
    PolicyScanner::new(default_policy()).expect("embedded keyword lists build a valid automaton")
});

/// The scanner built from the embedded default policy.
pub fn default_scanner() -> &'static PolicyScanner {
    &DEFAULT_SCANNER
}

/// True when the text contains any term from the default bilingual crisis list.
pub fn detect_crisis_content(text: &str) -> bool {
    default_scanner().detects_crisis(text)
}

/// Masks the default block-list in `text`.
pub fn filter_inappropriate_content(text: &str) -> String {
    default_scanner().filter(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_crisis_content_is_bilingual_and_case_insensitive() {
        assert!(detect_crisis_content("I think about SUICIDE a lot"));
        assert!(detect_crisis_content("Sometimes I want to Hurt Myself"));
        assert!(detect_crisis_content("真想一了百了"));
        assert!(!detect_crisis_content("Had a calm day at the beach."));
        assert!(!detect_crisis_content(""));
    }

    #[test]
    fn test_content_list_covers_rule_list() {
        assert!(detect_crisis_content("伤害自己"));
        assert!(default_scanner().flags_crisis_rule("伤害自己"));
        // "解脱" is only on the broader list.
        assert!(detect_crisis_content("我想解脱"));
        assert!(!default_scanner().flags_crisis_rule("我想解脱"));
    }

    #[test]
    fn test_filter_masks_with_equal_length() {
        assert_eq!(filter_inappropriate_content("你真是个废物!"), "你真是个**!");
        assert_eq!(filter_inappropriate_content("滚蛋 滚蛋"), "** **");
        assert_eq!(filter_inappropriate_content("nothing to see"), "nothing to see");
        assert_eq!(filter_inappropriate_content(""), "");
    }

    #[test]
    fn test_custom_policy_scanner() {
        let mut policy = default_policy().clone();
        policy.blocked_words = vec!["Darn".to_string()];
        let scanner = PolicyScanner::new(&policy).unwrap();
        assert_eq!(scanner.filter("DARN it, darn."), "**** it, ****.");
    }
}
