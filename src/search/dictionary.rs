//! Natural-language word list backing the identifier meaningfulness check.
//!
//! The list can be large (hundreds of thousands of entries when an external
//! `words_alpha.txt` is installed), so lookups go through an exact-match set,
//! fall back to a binary search over a case-insensitively sorted array, and are
//! memoized in a process-wide cache. Lookup results never change for the lifetime
//! of a [`WordIndex`], which makes the unbounded cache safe.

use ahash::{AHashMap, AHashSet};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::{OnceLock, RwLock};

/// Built-in English and programming vocabulary, one word per line.
const BUILTIN_WORDS: &str = include_str!("words.txt");

static GLOBAL: OnceLock<WordIndex> = OnceLock::new();

/// Case-insensitive word dictionary with a memoized lookup path.
#[derive(Debug)]
pub struct WordIndex {
    /// Lowercased words for O(1) exact hits
    exact: AHashSet<String>,
    /// Words as loaded, sorted with [`cmp_ignore_case`]
    sorted: Vec<String>,
    /// Per-word lookup results, keyed by the lowercased query
    cache: RwLock<AHashMap<String, bool>>,
}

impl WordIndex {
    /// Builds an index from any iterator of words. Blank entries are ignored.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        sorted.sort_by(|a, b| cmp_ignore_case(a, b));
        sorted.dedup_by(|a, b| cmp_ignore_case(a, b) == Ordering::Equal);

        let exact = sorted.iter().map(|w| w.to_lowercase()).collect();

        Self {
            exact,
            sorted,
            cache: RwLock::new(AHashMap::new()),
        }
    }

    /// The vocabulary compiled into the binary.
    pub fn builtin() -> Self {
        Self::from_words(BUILTIN_WORDS.lines())
    }

    /// Loads a newline-separated word list from disk.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_words(text.lines()))
    }

    /// Returns true if `word` is in the dictionary, ignoring case.
    pub fn contains(&self, word: &str) -> bool {
        let word = word.trim();
        if word.is_empty() {
            return false;
        }

        let key = word.to_lowercase();
        if let Some(hit) = self
            .cache
            .read()
            .ok()
            .and_then(|cache| cache.get(&key).copied())
        {
            return hit;
        }

        let found = self.exact.contains(&key)
            || self
                .sorted
                .binary_search_by(|probe| cmp_ignore_case(probe, word))
                .is_ok();

        // Poisoned cache: answer without memoizing
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, found);
        }

        found
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

/// Returns the process-wide dictionary, initializing it with the built-in
/// vocabulary on first use unless [`install`] ran earlier.
pub fn global() -> &'static WordIndex {
    GLOBAL.get_or_init(|| {
        let index = WordIndex::builtin();
        tracing::debug!("Loaded built-in dictionary with {} words", index.len());
        index
    })
}

/// Installs a custom dictionary as the process-wide one.
///
/// Returns false if the global dictionary was already initialized, in which case
/// `index` is dropped and the existing one stays in place.
pub fn install(index: WordIndex) -> bool {
    let len = index.len();
    let installed = GLOBAL.set(index).is_ok();
    if installed {
        tracing::info!("Installed dictionary with {} words", len);
    } else {
        tracing::warn!("Dictionary already initialized, ignoring replacement");
    }
    installed
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("value", true)]
    #[case("VALUE", true)]
    #[case("Service", true)]
    #[case("qzxv", false)]
    #[case("", false)]
    #[case("   ", false)]
    fn test_builtin_lookup(#[case] word: &str, #[case] expected: bool) {
        let index = WordIndex::builtin();
        check!(index.contains(word) == expected);
    }

    #[test]
    fn test_cached_lookup_is_stable() {
        let index = WordIndex::from_words(["Alpha", "beta"]);
        let first = index.contains("ALPHA");
        let second = index.contains("alpha");
        check!(first);
        check!(first == second);
        check!(!index.contains("gamma"));
        check!(!index.contains("gamma"));
    }

    #[test]
    fn test_duplicates_collapse_ignoring_case() {
        let index = WordIndex::from_words(["Word", "word", "WORD", " other "]);
        check!(index.len() == 2);
        check!(index.contains("other"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "frobnicate\nwidget\n\n").unwrap();

        let index = WordIndex::load(&path).unwrap();
        check!(index.len() == 2);
        check!(index.contains("Frobnicate"));
    }
}
