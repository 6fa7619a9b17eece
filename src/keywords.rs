//! Keyword extraction from free-text queries
//!
//! Turns something like "Senior Flutter developers, remote jobs" into the
//! terms worth matching against listings: `["senior", "flutter", "developer"]`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not alphanumeric, whitespace or `.`, `+`, `#`
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s.+#]").unwrap());

/// Tokens of this many characters or fewer are dropped
const MIN_TOKEN_CHARS: usize = 2;

/// Generic English function words plus job-posting boilerplate
const STOPWORDS: &[&str] = &[
    // function words
    "the", "and", "for", "with", "from", "into", "that", "this", "these", "those", "are",
    "was", "were", "been", "being", "have", "has", "had", "not", "but", "any", "all", "can",
    "could", "would", "should", "will", "shall", "may", "might", "must", "you", "your",
    "our", "their", "them", "they", "who", "what", "which", "where", "when", "how", "why",
    "about", "some", "more", "most", "than", "then", "there", "here", "also", "just",
    "only", "very", "such", "like", "out", "over", "under", "via", "per", "get", "got",
    "show", "give", "list", "please", "want", "need", "find", "search", "its", "let",
    "new", "latest", "recent", "today", "now",
    // job-posting boilerplate
    "job", "jobs", "hiring", "hire", "apply", "application", "applications", "remote",
    "position", "positions", "role", "roles", "opening", "openings", "opportunity",
    "opportunities", "vacancy", "vacancies", "career", "careers", "work", "working",
    "looking", "seeking", "candidate", "candidates", "company", "companies", "team",
    "anywhere", "worldwide", "fulltime", "parttime",
];

/// Extracts normalized keywords from a raw query
///
/// Stemming is on by default; `without_stemming` keeps surviving tokens as
/// typed (lowercased).
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stem: bool,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self { stem: true }
    }

    pub fn without_stemming() -> Self {
        Self { stem: false }
    }

    /// Deduplicated keywords in first-seen order
    ///
    /// An empty result means the query had nothing worth matching; callers
    /// must treat it as "no results", never as "match everything".
    pub fn extract(&self, query: &str) -> Vec<String> {
        let lowered = query.to_lowercase();
        let cleaned = DISALLOWED.replace_all(&lowered, " ");

        let mut seen = HashSet::new();
        cleaned
            .split_whitespace()
            .map(|token| token.trim_end_matches('.'))
            .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
            .filter(|token| token.chars().any(char::is_alphanumeric))
            .filter(|token| !STOPWORDS.contains(token))
            .map(|token| {
                if self.stem {
                    stem(token)
                } else {
                    token.to_string()
                }
            })
            .filter(|keyword| seen.insert(keyword.clone()))
            .collect()
    }
}

/// Extracts keywords with the default extractor
pub fn extract_keywords(query: &str) -> Vec<String> {
    KeywordExtractor::new().extract(query)
}

/// Suffix-stripping stemmer
///
/// Only purely alphabetic tokens are touched, so `node.js` and `c++` pass
/// through. Every stem is a prefix of its word and at least three characters
/// long, which keeps substring matching hitting the inflected forms.
pub fn stem(word: &str) -> String {
    if !word.chars().all(|c| c.is_alphabetic()) {
        return word.to_string();
    }

    let stripped = strip_suffix(word);
    if stripped.chars().count() >= 3 {
        stripped.to_string()
    } else {
        word.to_string()
    }
}

fn strip_suffix(word: &str) -> &str {
    if let Some(base) = word.strip_suffix("ing") {
        if base.chars().count() >= 4 {
            return base;
        }
    }
    if let Some(base) = word.strip_suffix("ed") {
        if base.chars().count() >= 4 && !base.ends_with('e') {
            return base;
        }
    }
    if let Some(base) = word.strip_suffix("sses") {
        return &word[..base.len() + 2];
    }
    if let Some(base) = word.strip_suffix("es") {
        if ["x", "ch", "sh"].iter().any(|s| base.ends_with(s)) {
            return base;
        }
    }
    if let Some(base) = word.strip_suffix('s') {
        if !(base.ends_with('s') || base.ends_with('u') || base.ends_with('i')) {
            return base;
        }
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_drops_stopwords_and_boilerplate() {
        assert_eq!(extract_keywords("flutter jobs"), vec!["flutter"]);
        assert_eq!(
            extract_keywords("Hiring: remote Rust engineer, apply now!"),
            vec!["rust", "engineer"]
        );
    }

    #[test]
    fn test_extract_keeps_technical_punctuation() {
        assert_eq!(extract_keywords("C++ and Node.js"), vec!["c++", "node.js"]);
    }

    #[test]
    fn test_extract_trims_sentence_dots() {
        assert_eq!(extract_keywords("kotlin. swift..."), vec!["kotlin", "swift"]);
    }

    #[test]
    fn test_extract_keeps_leading_dot() {
        assert_eq!(extract_keywords(".NET developer"), vec![".net", "developer"]);
    }

    #[test]
    fn test_extract_drops_punctuation_only_tokens() {
        assert_eq!(extract_keywords("+++ ### .+# rust"), vec!["rust"]);
    }

    #[test]
    fn test_extract_drops_short_tokens() {
        // "c#" and "go" are two characters long
        assert_eq!(extract_keywords("c# go ux rust"), vec!["rust"]);
    }

    #[test]
    fn test_extract_collapses_plural_forms() {
        assert_eq!(extract_keywords("developers developer"), vec!["developer"]);
    }

    #[test]
    fn test_extract_without_stemming() {
        let extractor = KeywordExtractor::without_stemming();
        assert_eq!(extractor.extract("Developers"), vec!["developers"]);
    }

    #[test]
    fn test_extract_empty_for_stopword_only_queries() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("remote jobs for me").is_empty());
        assert!(extract_keywords("?!, -- ...").is_empty());
    }

    #[test]
    fn test_extract_deduplicates_preserving_order() {
        assert_eq!(
            extract_keywords("python Django PYTHON django"),
            vec!["python", "django"]
        );
    }

    #[test]
    fn test_stem_rules() {
        assert_eq!(stem("engineers"), "engineer");
        assert_eq!(stem("testing"), "test");
        assert_eq!(stem("engineering"), "engineer");
        assert_eq!(stem("managed"), "manag");
        assert_eq!(stem("boxes"), "box");
        assert_eq!(stem("classes"), "class");
        assert_eq!(stem("status"), "status");
        assert_eq!(stem("analysis"), "analysis");
        assert_eq!(stem("class"), "class");
    }

    #[test]
    fn test_stem_keeps_short_and_technical_words() {
        assert_eq!(stem("king"), "king");
        assert_eq!(stem("ads"), "ads");
        assert_eq!(stem("node.js"), "node.js");
        assert_eq!(stem("c++"), "c++");
    }

    #[test]
    fn test_stems_are_prefixes() {
        for word in ["developers", "designing", "watches", "deployed", "kubernetes"] {
            assert!(word.starts_with(&stem(word)), "{word} -> {}", stem(word));
        }
    }
}
