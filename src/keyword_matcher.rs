use std::collections::{BTreeSet, HashMap};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::MatcherError;

// @module: Keyword vocabulary and whole-word hit counting

// @const: Built-in per-language keyword sets
static BUILTIN_KEYWORDS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut sets: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    sets.insert(
        "c",
        &["int", "char", "if", "else", "for", "while", "return", "printf", "#include"],
    );
    sets.insert(
        "cpp",
        &["std", "cout", "cin", "class", "public", "private", "template", "::", "->"],
    );
    sets.insert(
        "java",
        &["public", "class", "static", "void", "String", "System", "new", "return"],
    );
    sets
});

/// Returns the built-in keyword set for a language, if one exists
pub fn builtin_keywords(language: &str) -> Option<&'static [&'static str]> {
    BUILTIN_KEYWORDS.get(language).copied()
}

/// Returns the names of all built-in keyword languages, sorted
pub fn builtin_languages() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTIN_KEYWORDS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Counts whole-word keyword occurrences in single lines of text.
///
/// The matcher is built once from an immutable vocabulary and is stateless
/// afterwards; it can be shared read-only across concurrent scans. Matches
/// are non-overlapping and case-sensitive. A keyword whose edge is a word
/// character must sit at a word boundary on that side, so `int` never counts
/// inside `intelligent`; edges made of punctuation (`::`, `->`, the `#` in
/// `#include`) are matched literally, since boundary logic only constrains
/// alphanumeric runs.
#[derive(Debug)]
pub struct KeywordMatcher {
    // @field: Compiled alternation over the whole vocabulary
    pattern: Regex,

    // @field: The merged vocabulary, longest-first
    vocabulary: Vec<String>,
}

impl KeywordMatcher {
    /// Build a matcher by merging the built-in keyword sets of the given
    /// languages plus any extra user-supplied keywords
    pub fn from_languages(languages: &[String], extra_keywords: &[String]) -> Result<Self, MatcherError> {
        let mut merged: BTreeSet<String> = BTreeSet::new();

        for language in languages {
            let keywords = builtin_keywords(language)
                .ok_or_else(|| MatcherError::UnknownLanguage(language.clone()))?;
            merged.extend(keywords.iter().map(|k| (*k).to_string()));
        }

        for keyword in extra_keywords {
            if !keyword.is_empty() {
                merged.insert(keyword.clone());
            }
        }

        Self::from_keywords(merged)
    }

    /// Build a matcher from an explicit keyword collection
    pub fn from_keywords<I, S>(keywords: I) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // Dedupe, then order longest-first so that overlapping tokens
        // (e.g. `::` inside `:::`) resolve deterministically in the alternation
        let unique: BTreeSet<String> = keywords.into_iter().map(|k| k.into()).collect();
        let mut vocabulary: Vec<String> = unique.into_iter().filter(|k| !k.is_empty()).collect();
        vocabulary.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        if vocabulary.is_empty() {
            return Err(MatcherError::EmptyVocabulary(
                "no languages selected and no extra keywords given".to_string(),
            ));
        }

        let alternation = vocabulary
            .iter()
            .map(|k| token_pattern(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation)?;

        Ok(KeywordMatcher { pattern, vocabulary })
    }

    /// Count non-overlapping keyword occurrences in one line of text
    pub fn count_hits(&self, line: &str) -> usize {
        self.pattern.find_iter(line).count()
    }

    /// The merged vocabulary this matcher was built from
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}

// Word boundaries only make sense against alphanumeric runs; a token edge
// made of punctuation gets no anchor and matches literally
fn token_pattern(keyword: &str) -> String {
    let escaped = regex::escape(keyword);
    let leading = keyword.chars().next().is_some_and(is_word_char);
    let trailing = keyword.chars().last().is_some_and(is_word_char);

    let mut pattern = String::with_capacity(escaped.len() + 4);
    if leading {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&escaped);
    if trailing {
        pattern.push_str(r"\b");
    }
    pattern
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
