/*!
 * Tests for keyword vocabulary merging and hit counting
 */

use anyhow::Result;
use codesift::errors::MatcherError;
use codesift::keyword_matcher::{builtin_keywords, builtin_languages, KeywordMatcher};

fn default_matcher() -> Result<KeywordMatcher> {
    let languages = vec!["c".to_string(), "cpp".to_string(), "java".to_string()];
    Ok(KeywordMatcher::from_languages(&languages, &[])?)
}

/// Test that word-boundary matching rejects keywords inside longer identifiers
#[test]
fn test_count_hits_withKeywordInsideIdentifier_shouldNotCount() -> Result<()> {
    let matcher = default_matcher()?;

    assert_eq!(matcher.count_hits("intelligent systems are expensive"), 0);
    assert_eq!(matcher.count_hits("int intelligent = 0;"), 1);
    assert_eq!(matcher.count_hits("int_count = 5"), 0);

    Ok(())
}

/// Test that punctuation-edged vocabulary entries match literally
#[test]
fn test_count_hits_withPunctuationTokens_shouldMatchLiterally() -> Result<()> {
    let matcher = default_matcher()?;

    // Leading '#' carries no boundary requirement, so a line-initial
    // directive still counts
    assert_eq!(matcher.count_hits("#include <stdio.h>"), 1);
    assert_eq!(matcher.count_hits("ptr->field"), 1);
    assert_eq!(matcher.count_hits("std::cout << cin;"), 4);

    Ok(())
}

/// Test that matching is case-sensitive
#[test]
fn test_count_hits_withWrongCase_shouldNotCount() -> Result<()> {
    let matcher = default_matcher()?;

    assert_eq!(matcher.count_hits("INT Return WHILE"), 0);
    assert_eq!(matcher.count_hits("String name;"), 1);
    assert_eq!(matcher.count_hits("string name;"), 0);

    Ok(())
}

/// Test that repeated occurrences are counted non-overlapping
#[test]
fn test_count_hits_withRepeatedKeywords_shouldCountEachOccurrence() -> Result<()> {
    let matcher = default_matcher()?;

    assert_eq!(matcher.count_hits("return return return"), 3);
    assert_eq!(matcher.count_hits("for (int i = 0; i < n; i++)"), 2);

    Ok(())
}

/// Test that a line without any vocabulary word yields zero
#[test]
fn test_count_hits_withPlainLogLine_shouldReturnZero() -> Result<()> {
    let matcher = default_matcher()?;

    assert_eq!(matcher.count_hits("2024-03-01 12:00:01 request handled in 13ms"), 0);
    assert_eq!(matcher.count_hits(""), 0);

    Ok(())
}

/// Test that keywords shared between languages are merged once
#[test]
fn test_from_languages_withOverlappingSets_shouldDeduplicateVocabulary() -> Result<()> {
    let languages = vec!["c".to_string(), "java".to_string()];
    let matcher = KeywordMatcher::from_languages(&languages, &[])?;

    // "return" appears in both built-in sets
    let occurrences = matcher
        .vocabulary()
        .iter()
        .filter(|k| k.as_str() == "return")
        .count();
    assert_eq!(occurrences, 1);

    Ok(())
}

/// Test that extra user-supplied keywords extend the vocabulary
#[test]
fn test_from_languages_withExtraKeywords_shouldMatchThem() -> Result<()> {
    let languages = vec!["c".to_string()];
    let extra = vec!["fn".to_string(), "impl".to_string()];
    let matcher = KeywordMatcher::from_languages(&languages, &extra)?;

    assert_eq!(matcher.count_hits("fn main() {"), 1);
    assert_eq!(matcher.count_hits("impl Display for Thing"), 2);

    Ok(())
}

/// Test that an unknown language name is rejected
#[test]
fn test_from_languages_withUnknownLanguage_shouldFail() {
    let languages = vec!["cobol".to_string()];
    let result = KeywordMatcher::from_languages(&languages, &[]);

    assert!(matches!(result, Err(MatcherError::UnknownLanguage(_))));
}

/// Test that an empty vocabulary is rejected
#[test]
fn test_from_keywords_withNoKeywords_shouldFail() {
    let result = KeywordMatcher::from_keywords(Vec::<String>::new());

    assert!(matches!(result, Err(MatcherError::EmptyVocabulary(_))));
}

/// Test the built-in language registry
#[test]
fn test_builtin_languages_shouldExposeKnownSets() {
    assert_eq!(builtin_languages(), vec!["c", "cpp", "java"]);
    assert!(builtin_keywords("c").is_some());
    assert!(builtin_keywords("fortran").is_none());
}
