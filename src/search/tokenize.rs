//! Identifier tokenization for code-aware indexing.
//!
//! This module implements a small state machine that splits raw program identifiers
//! on several boundaries at once:
//! - **camelCase / PascalCase**: "getValue" → ["get", "value"]
//! - **Acronym runs**: "HTTPResponse" → ["http", "response"]
//! - **snake_case / kebab-case / whitespace**: "parse_json" → ["parse", "json"]
//! - **Letter/digit**: "Vector3D" → ["vector", "3", "d"]
//!
//! Acronym runs of four or more capitals are additionally expanded into dense
//! 2-4 character n-grams so that abbreviations buried inside them ("TP" in
//! "HTTP", "XML" in "HTTPXML") can be matched as whole tokens.

use std::ops::RangeInclusive;

/// Identifiers this short (after trimming underscores) are emitted as a single token.
const SHORT_IDENTIFIER_LENGTH: usize = 2;

/// Minimum length of an all-uppercase fragment before n-gram expansion kicks in.
const ACRONYM_MIN_LENGTH: usize = 4;

/// Window sizes emitted for acronym runs.
const ACRONYM_NGRAM_SIZES: RangeInclusive<usize> = 2..=4;

/// Splits an identifier into lowercase sub-tokens.
///
/// Total on every input: blank strings yield an empty vector, never an error.
/// The order of tokens follows their position in the identifier, with acronym
/// n-grams emitted directly after the acronym they were taken from.
pub fn tokenize(identifier: &str) -> Vec<String> {
    let trimmed = identifier.trim().trim_matches('_');
    if trimmed.trim().is_empty() {
        return vec![];
    }

    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= SHORT_IDENTIFIER_LENGTH {
        return vec![trimmed.to_lowercase()];
    }

    let mut tokens = Vec::with_capacity(chars.len() / 3 + 1);
    for fragment in split_fragments(&chars) {
        push_fragment(fragment, &mut tokens);
    }
    tokens
}

/// Tokenizes free text (a documentation sentence, a dotted type name, a
/// parameter list): words are cut at whitespace and punctuation other than
/// `_` and `-`, then tokenized as identifiers.
pub fn tokenize_text(text: &str) -> Vec<String> {
    text.split(is_text_separator)
        .filter(|word| !word.is_empty())
        .flat_map(tokenize)
        .collect()
}

fn is_text_separator(c: char) -> bool {
    c.is_whitespace() || (!c.is_alphanumeric() && c != '_' && c != '-')
}

/// Walks the identifier once, cutting it at delimiters and case/digit boundaries.
fn split_fragments(chars: &[char]) -> Vec<&[char]> {
    let mut fragments = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &c) in chars.iter().enumerate() {
        if is_delimiter(c) {
            // Only `_`, `-` and whitespace cut; other punctuation stays inside the fragment
            if let Some(s) = start.take() {
                fragments.push(&chars[s..i]);
            }
            continue;
        }

        match start {
            None => start = Some(i),
            Some(s) if i > s && is_boundary(chars, i) => {
                fragments.push(&chars[s..i]);
                start = Some(i);
            }
            Some(_) => {}
        }
    }

    if let Some(s) = start {
        fragments.push(&chars[s..]);
    }

    fragments
}

fn is_delimiter(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// Returns true if a new fragment starts at `i`. Caller guarantees `chars[i - 1]`
/// belongs to the current fragment.
fn is_boundary(chars: &[char], i: usize) -> bool {
    let prev = chars[i - 1];
    let current = chars[i];

    if (prev.is_alphabetic() && current.is_numeric())
        || (prev.is_numeric() && current.is_alphabetic())
    {
        return true;
    }

    if !current.is_uppercase() {
        return false;
    }

    // "getValue": lowercase → uppercase
    if prev.is_lowercase() {
        return true;
    }

    // "HTTPResponse": the last capital of a run starts the next word
    prev.is_uppercase() && chars.get(i + 1).is_some_and(|next| next.is_lowercase())
}

fn push_fragment(fragment: &[char], tokens: &mut Vec<String>) {
    tokens.push(lowercase(fragment));

    if is_acronym_run(fragment) {
        for size in ACRONYM_NGRAM_SIZES {
            for window in fragment.windows(size) {
                tokens.push(lowercase(window));
            }
        }
    }
}

fn is_acronym_run(fragment: &[char]) -> bool {
    fragment.len() >= ACRONYM_MIN_LENGTH && fragment.iter().all(|c| c.is_uppercase())
}

fn lowercase(chars: &[char]) -> String {
    chars.iter().flat_map(|c| c.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("snake_case_name", &["snake", "case", "name"])]
    #[case("kebab-case", &["kebab", "case"])]
    #[case("getValue", &["get", "value"])]
    #[case("IPublicNestedInterface", &["i", "public", "nested", "interface"])]
    #[case("value2Text", &["value", "2", "text"])]
    #[case("Outer+Inner", &["outer+inner"])]
    #[case("<Main>b__0", &["<main>b", "0"])]
    #[case("  spaced   words ", &["spaced", "words"])]
    #[case("__x", &["x"])]
    #[case("Id", &["id"])]
    fn test_tokenize_exact(#[case] input: &str, #[case] expected: &[&str]) {
        let tokens = tokenize(input);
        check!(tokens == expected);
    }

    #[rstest]
    #[case("GetHTTPResponse", &["get", "http", "response", "tp", "ht", "tt", "htt", "ttp"])]
    #[case("HTTPXML", &["httpxml", "xml", "tp", "pxml", "ttpx"])]
    #[case("HTTP2Server", &["http", "2", "server"])]
    #[case("XMLHttpRequest", &["xml", "http", "request"])]
    fn test_tokenize_contains(#[case] input: &str, #[case] expected: &[&str]) {
        let tokens = tokenize(input);
        for token in expected {
            check!(tokens.contains(&token.to_string()), "missing {token} in {tokens:?}");
        }
    }

    #[test]
    fn test_short_acronyms_not_expanded() {
        // Three capitals is below the n-gram threshold
        check!(tokenize("XMLDoc") == vec!["xml", "doc"]);
    }

    #[test]
    fn test_tokens_are_lowercase() {
        for token in tokenize("ParseJSONDocument_FromURL") {
            check!(token == token.to_lowercase());
        }
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    #[case("___")]
    fn test_blank_input(#[case] input: &str) {
        check!(tokenize(input).is_empty());
    }

    #[rstest]
    #[case("GetHTTPResponse")]
    #[case("a1b2c3d4")]
    #[case("Москва")]
    #[case("🦀🦀🦀")]
    fn test_idempotent(#[case] input: &str) {
        check!(tokenize(input) == tokenize(input));
    }

    #[test]
    fn test_tokenize_text_splits_words() {
        let tokens = tokenize_text("count System.Int32");
        check!(tokens == vec!["count", "system", "int", "32"]);
    }

    #[test]
    fn test_tokenize_text_splits_punctuation() {
        let tokens = tokenize_text("Outer+Inner, (see List<Item>)");
        check!(tokens == vec!["outer", "inner", "see", "list", "item"]);
    }
}
