use epoa_core::TermMatch;

use crate::pdf::PageText;

pub const DEFAULT_TRIGGER_WORDS: [&str; 4] = ["compensation", "salary", "usd", "$"];

/// Case-insensitive literal substring check. `$` and `usd` are separate terms;
/// no currency-format folding is done.
#[derive(Clone, Debug)]
pub struct TriggerWordRule {
    words: Vec<String>,
}

impl TriggerWordRule {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Every (term, line) hit, in page then line order.
    pub fn eval(&self, pages: &[PageText]) -> Vec<TermMatch> {
        let needles: Vec<(String, String)> = self.words.iter().map(|w| (w.clone(), w.to_lowercase())).collect();
        let mut matches = Vec::new();
        for page in pages {
            for line in page.text.lines() {
                let haystack = line.to_lowercase();
                for (term, needle) in &needles {
                    if haystack.contains(needle.as_str()) {
                        matches.push(TermMatch { term: term.clone(), page: page.page, line: line.trim().to_string() });
                    }
                }
            }
        }
        matches
    }
}

impl Default for TriggerWordRule {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32, text: &str) -> PageText {
        PageText { page: n, text: text.to_string() }
    }

    #[test]
    fn matches_are_case_insensitive() {
        let rule = TriggerWordRule::new(["salary"]);
        let hits = rule.eval(&[page(1, "About us\nCompetitive SALARY package\n")]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term, "salary");
        assert_eq!(hits[0].line, "Competitive SALARY package");
    }

    #[test]
    fn reports_all_terms_not_just_first() {
        let hits = TriggerWordRule::default().eval(&[
            page(1, "Total compensation: $120,000 - $150,000"),
            page(2, "Paid in USD"),
        ]);
        let terms: Vec<&str> = hits.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, vec!["compensation", "$", "usd"]);
        assert_eq!(hits[2].page, 2);
    }

    #[test]
    fn dollar_sign_is_literal() {
        let rule = TriggerWordRule::new(["$"]);
        assert!(rule.eval(&[page(1, "Pay: 100,000 dollars")]).is_empty());
        assert_eq!(rule.eval(&[page(1, "Pay: $100k")]).len(), 1);
    }

    #[test]
    fn blank_words_are_ignored() {
        let rule = TriggerWordRule::new(["", "  ", "salary"]);
        assert_eq!(rule.words(), &["salary".to_string()]);
    }
}
