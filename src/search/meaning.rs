//! Heuristic filter deciding whether an identifier is a human-readable name.
//!
//! Metadata extracted from compiled modules is full of names nobody wrote by
//! hand: compiler-generated backing fields, obfuscated members, hashed lambda
//! closures. Those are dropped from the catalog before indexing.

use super::dictionary::{self, WordIndex};
use super::tokenize::tokenize;

/// Prefixes of compiler-emitted property accessors.
const ACCESSOR_PREFIXES: &[&str] = &["get_", "set_"];

/// Short tokens that still count as words.
const SHORT_WORD_ALLOW_LIST: &[&str] = &["id", "io", "ui", "db"];

/// Substrings that mark an identifier as intentional even without dictionary hits.
const COMMON_DEV_SUBSTRINGS: &[&str] = &[
    "get", "set", "add", "remove", "init", "load", "save", "read", "write", "name", "value",
];

/// Minimum share of dictionary-checked tokens (in percent) that must be words.
const ENGLISH_HIT_PERCENT: usize = 40;

/// Returns true if `identifier` looks like a name worth cataloging, using the
/// process-wide dictionary.
pub fn is_meaningful(identifier: &str) -> bool {
    is_meaningful_with(identifier, dictionary::global())
}

/// Same as [`is_meaningful`] against an explicit dictionary.
pub fn is_meaningful_with(identifier: &str, words: &WordIndex) -> bool {
    if identifier.trim().is_empty() {
        return false;
    }

    if ACCESSOR_PREFIXES
        .iter()
        .any(|prefix| identifier.starts_with(prefix))
    {
        return true;
    }

    let raw = identifier.trim_matches('_');
    if raw.chars().count() <= 2 {
        return true;
    }

    let mut dictionary_checked = 0usize;
    let mut english_hits = 0usize;

    for token in tokenize(raw) {
        let token = token.trim_matches('_').to_lowercase();
        if token.is_empty() {
            continue;
        }
        if token.chars().count() <= 2 && !SHORT_WORD_ALLOW_LIST.contains(&token.as_str()) {
            continue;
        }

        dictionary_checked += 1;
        if words.contains(&token) {
            english_hits += 1;
        }
    }

    if english_hits > 0
        && english_hits * 100 >= dictionary_checked.max(1) * ENGLISH_HIT_PERCENT
    {
        return true;
    }

    contains_vowel(raw) && contains_dev_substring(raw)
}

fn contains_vowel(text: &str) -> bool {
    text.chars()
        .flat_map(char::to_lowercase)
        .any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
}

fn contains_dev_substring(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMMON_DEV_SUBSTRINGS
        .iter()
        .any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("x", true)] // too short to judge
    #[case("__ab__", true)]
    #[case("get_value", true)] // accessor prefix
    #[case("set_Qx7Zk", true)]
    #[case("a1b2c3d4", false)]
    #[case("DoWork", true)]
    #[case("TestService", true)]
    #[case("GetHTTPResponse", true)]
    #[case("userId", true)]
    #[case("xkcdqwrt", false)]
    #[case("zqxLoadz", true)] // vowel + "load"
    #[case("b__BackingField", true)]
    #[case("<Main>b__0", false)] // compiler-generated closure
    #[case("<Main>d__12", false)] // compiler-generated state machine
    #[case("", false)]
    #[case("   ", false)]
    fn test_is_meaningful(#[case] identifier: &str, #[case] expected: bool) {
        check!(is_meaningful(identifier) == expected);
    }

    #[test]
    fn test_deterministic_across_calls() {
        for identifier in ["GetHTTPResponse", "a1b2c3d4", "zzqv", "PublicNestedClass"] {
            let first = is_meaningful(identifier);
            for _ in 0..3 {
                check!(is_meaningful(identifier) == first);
            }
        }
    }

    #[test]
    fn test_hit_ratio_threshold() {
        let words = WordIndex::from_words(["marble"]);
        // 1 hit out of 2 checked tokens = 50%
        check!(is_meaningful_with("MarbleQzxv", &words));
        // 1 hit out of 3 checked tokens = 33%
        check!(!is_meaningful_with("MarbleQzxvBrrp", &words));
    }

    #[test]
    fn test_short_allow_list_counts_toward_ratio() {
        let words = WordIndex::from_words(["id"]);
        check!(is_meaningful_with("IdQq", &words));
    }
}
