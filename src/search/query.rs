//! Keyword query parsing, execution, ranking and highlighting.

use crate::catalog::model::NESTED_TYPE_SEPARATOR;
use crate::error::SearchError;
use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

use super::document::{ElementKind, IndexedDocument};
use super::index::{IndexSnapshot, SearchIndex};
use super::scoring::{SearchField, field_score, inverse_document_frequency, round_score};

/// Facets are counted over at most this many matches, in ranking order.
pub const FACET_SCAN_LIMIT: usize = 1000;

/// Element-kind filter applied to a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    Only(ElementKind),
}

impl SearchScope {
    /// Parses `all|types|methods|properties|fields|enums`, ignoring case.
    /// Anything else means [`SearchScope::All`].
    pub fn parse(scope: &str) -> Self {
        ElementKind::from_scope(scope).map_or(Self::All, Self::Only)
    }

    pub fn matches(self, kind: ElementKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == kind,
        }
    }
}

/// A parsed keyword query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Raw keywords in input order
    pub terms: Vec<String>,
    pub scope: SearchScope,
    pub limit: usize,
    pub offset: usize,
}

impl SearchQuery {
    /// Splits `raw_keywords` on whitespace after turning nested-type separators into spaces.
    pub fn parse(raw_keywords: &str, scope: &str, limit: usize, offset: usize) -> Self {
        let terms = raw_keywords
            .replace(NESTED_TYPE_SEPARATOR, " ")
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Self {
            terms,
            scope: SearchScope::parse(scope),
            limit,
            offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub element_kind: ElementKind,
    pub name: String,
    pub full_name: String,
    pub parent_type: Option<String>,
    pub return_type: Option<String>,
    pub documentation: Option<String>,
    pub relevance_score: f64,
    pub matched_terms: Vec<String>,
    /// `"{field}:{term}"` → character offsets of every occurrence
    pub highlight_positions: BTreeMap<String, Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

impl Pagination {
    /// Page metadata for `returned` items taken at `offset` out of `total`.
    pub const fn new(total: usize, limit: usize, offset: usize, returned: usize) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset.saturating_add(returned) < total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSearchResult {
    pub results: Vec<SearchHit>,
    pub pagination: Pagination,
    pub search_terms: String,
    pub search_time_ms: f64,
    /// Element kind → matches of that kind among the first [`FACET_SCAN_LIMIT`] matches
    pub facet_counts: BTreeMap<String, usize>,
}

/// Matches of one query, before hits are materialized.
#[derive(Debug, Default)]
struct Execution {
    hits: Vec<SearchHit>,
    total: usize,
    facets: BTreeMap<String, usize>,
}

/// Runs keyword queries against a [`SearchIndex`].
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a SearchIndex,
}

impl<'a> QueryEngine<'a> {
    pub const fn new(index: &'a SearchIndex) -> Self {
        Self { index }
    }

    /// Searches the index. Never fails: internal errors are logged and yield an
    /// empty result.
    pub fn search(
        &self,
        raw_keywords: &str,
        scope: &str,
        limit: usize,
        offset: usize,
    ) -> KeywordSearchResult {
        let start = Instant::now();
        let query = SearchQuery::parse(raw_keywords, scope, limit, offset);

        let execution = self.execute(&query).unwrap_or_else(|e| {
            tracing::error!("Search for '{}' failed: {}", raw_keywords, e);
            Execution::default()
        });

        let pagination = Pagination::new(execution.total, limit, offset, execution.hits.len());
        let search_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::debug!(
            "Search '{}' ({:?}) matched {} documents in {:.2}ms",
            raw_keywords,
            query.scope,
            execution.total,
            search_time_ms
        );

        KeywordSearchResult {
            results: execution.hits,
            pagination,
            search_terms: raw_keywords.to_string(),
            search_time_ms,
            facet_counts: execution.facets,
        }
    }

    fn execute(&self, query: &SearchQuery) -> Result<Execution, SearchError> {
        if query.is_empty() {
            return Ok(Execution::default());
        }

        self.index.with_snapshot(|snapshot| {
            let ranked = rank(snapshot, query);

            let mut facets = BTreeMap::new();
            for &(ordinal, _) in ranked.iter().take(FACET_SCAN_LIMIT) {
                let kind = snapshot.document(ordinal).kind;
                *facets.entry(kind.as_str().to_string()).or_insert(0) += 1;
            }

            let hits = ranked
                .iter()
                .skip(query.offset)
                .take(query.limit)
                .map(|&(ordinal, score)| build_hit(snapshot.document(ordinal), score, &query.terms))
                .collect();

            Execution {
                hits,
                total: ranked.len(),
                facets,
            }
        })
    }
}

/// Every document satisfying all terms within the scope, best first.
fn rank(snapshot: &IndexSnapshot, query: &SearchQuery) -> Vec<(u32, f32)> {
    let total_documents = snapshot.documents().len();
    let mut combined: Option<AHashMap<u32, f32>> = None;

    for term in &query.terms {
        let needle = term.to_lowercase();
        let term_scores = score_term(snapshot, &needle);
        let idf = inverse_document_frequency(total_documents, term_scores.len());

        combined = Some(match combined {
            None => term_scores
                .into_iter()
                .map(|(ordinal, score)| (ordinal, score * idf))
                .collect(),
            Some(mut so_far) => {
                so_far.retain(|ordinal, score| match term_scores.get(ordinal) {
                    Some(term_score) => {
                        *score += term_score * idf;
                        true
                    }
                    None => false,
                });
                so_far
            }
        });

        if combined.as_ref().is_some_and(|scores| scores.is_empty()) {
            break;
        }
    }

    let mut ranked: Vec<(u32, f32)> = combined
        .unwrap_or_default()
        .into_iter()
        .filter(|&(ordinal, _)| query.scope.matches(snapshot.document(ordinal).kind))
        .collect();

    ranked.sort_by(|(a_ord, a_score), (b_ord, b_score)| {
        b_score
            .total_cmp(a_score)
            .then_with(|| snapshot.document(*a_ord).id.cmp(&snapshot.document(*b_ord).id))
    });
    ranked
}

/// Per-document score of one term: for each field, the best-matching index
/// term weighted by the field boost.
fn score_term(snapshot: &IndexSnapshot, needle: &str) -> AHashMap<u32, f32> {
    let mut scores: AHashMap<u32, f32> = AHashMap::new();

    for field in SearchField::ALL {
        let mut best: AHashMap<u32, u32> = AHashMap::new();
        for (ordinal, quality) in snapshot.field(field).matches(needle) {
            let entry = best.entry(ordinal).or_insert(quality);
            *entry = (*entry).max(quality);
        }
        for (ordinal, quality) in best {
            *scores.entry(ordinal).or_insert(0.0) += field_score(field, quality);
        }
    }

    scores
}

fn build_hit(document: &IndexedDocument, score: f32, terms: &[String]) -> SearchHit {
    let mut matched_terms: Vec<String> = Vec::new();
    let mut highlight_positions = BTreeMap::new();

    for term in terms {
        let in_name = find_all_positions(&document.name, term);
        let in_docs = document
            .documentation
            .as_deref()
            .map(|docs| find_all_positions(docs, term))
            .unwrap_or_default();

        if (!in_name.is_empty() || !in_docs.is_empty()) && !matched_terms.contains(term) {
            matched_terms.push(term.clone());
        }
        if !in_name.is_empty() {
            highlight_positions.insert(format!("name:{}", term), in_name);
        }
        if !in_docs.is_empty() {
            highlight_positions.insert(format!("doc:{}", term), in_docs);
        }
    }

    SearchHit {
        id: document.id.clone(),
        element_kind: document.kind,
        name: document.name.clone(),
        full_name: document.full_name.clone(),
        parent_type: document.parent_type.clone(),
        return_type: document.return_type.clone(),
        documentation: document.documentation.clone(),
        relevance_score: round_score(score),
        matched_terms,
        highlight_positions,
    }
}

/// Character offsets of every case-insensitive occurrence of `term` in `text`,
/// overlapping occurrences included.
fn find_all_positions(text: &str, term: &str) -> Vec<usize> {
    let haystack: Vec<char> = text.chars().collect();
    let needle: Vec<char> = term.chars().collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }

    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| {
            window
                .iter()
                .zip(&needle)
                .all(|(&a, &b)| chars_eq_ignore_case(a, b))
        })
        .map(|(position, _)| position)
        .collect()
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn document(id: &str, kind: ElementKind, name: &str, documentation: Option<&str>) -> IndexedDocument {
        IndexedDocument {
            id: id.to_string(),
            kind,
            name: name.to_string(),
            full_name: format!("App.{}", name),
            parent_type: None,
            return_type: None,
            documentation: documentation.map(str::to_string),
            namespace: Some("App".to_string()),
            parameters: None,
            content_tokens: vec![name.to_string()],
        }
    }

    fn sample_index() -> SearchIndex {
        let index = SearchIndex::new();
        index.build(vec![
            document("type:App.TestService", ElementKind::Type, "TestService", Some("Test service")),
            document("method:App.TestService.DoWork()", ElementKind::Method, "DoWork", Some("Does the work")),
            document("method:App.TestService.RunTest()", ElementKind::Method, "RunTest", None),
            document("field:App.TestService.testCount", ElementKind::Field, "testCount", None),
        ]);
        index
    }

    #[rstest]
    #[case("all", SearchScope::All)]
    #[case("Methods", SearchScope::Only(ElementKind::Method))]
    #[case("ENUMS", SearchScope::Only(ElementKind::EnumValue))]
    #[case("", SearchScope::All)]
    #[case("widgets", SearchScope::All)]
    fn test_scope_parse(#[case] raw: &str, #[case] expected: SearchScope) {
        check!(SearchScope::parse(raw) == expected);
    }

    #[test]
    fn test_parse_splits_nested_separator() {
        let query = SearchQuery::parse("  Outer+Inner   work ", "all", 10, 0);
        check!(query.terms == vec!["Outer", "Inner", "work"]);
    }

    #[test]
    fn test_terms_are_and_combined() {
        let index = sample_index();
        let engine = QueryEngine::new(&index);

        let result = engine.search("test run", "all", 10, 0);
        check!(result.pagination.total == 1);
        check!(result.results[0].name == "RunTest");
    }

    #[test]
    fn test_exact_name_ranks_first() {
        let index = sample_index();
        let result = QueryEngine::new(&index).search("testservice", "all", 10, 0);
        check!(result.results[0].id == "type:App.TestService");
    }

    #[test]
    fn test_scope_filters_hits() {
        let index = sample_index();
        let result = QueryEngine::new(&index).search("test", "methods", 10, 0);
        check!(result.pagination.total == 1);
        check!(result.results.iter().all(|hit| hit.element_kind == ElementKind::Method));
        check!(result.facet_counts.get("Method") == Some(&1));
    }

    #[test]
    fn test_highlights_and_matched_terms() {
        let index = sample_index();
        let result = QueryEngine::new(&index).search("work WORK", "all", 10, 0);
        let hit = &result.results[0];

        check!(hit.name == "DoWork");
        check!(hit.matched_terms == vec!["work", "WORK"]);
        check!(hit.highlight_positions.get("name:work") == Some(&vec![2]));
        check!(hit.highlight_positions.get("doc:work") == Some(&vec![9]));
    }

    #[test]
    fn test_empty_query_is_empty_result() {
        let index = sample_index();
        let result = QueryEngine::new(&index).search("   ", "all", 10, 0);
        check!(result.results.is_empty());
        check!(result.pagination.total == 0);
        check!(!result.pagination.has_more);
        check!(result.facet_counts.is_empty());
    }

    #[test]
    fn test_offset_past_end() {
        let index = sample_index();
        let result = QueryEngine::new(&index).search("test", "all", 10, 50);
        check!(result.results.is_empty());
        check!(result.pagination.total == 3);
        check!(!result.pagination.has_more);
    }

    #[rstest]
    #[case("aaaa", "aa", vec![0, 1, 2])]
    #[case("DoWork", "work", vec![2])]
    #[case("Straße", "SSE", vec![])]
    #[case("abc", "", vec![])]
    #[case("ab", "abc", vec![])]
    fn test_find_all_positions(#[case] text: &str, #[case] term: &str, #[case] expected: Vec<usize>) {
        check!(find_all_positions(text, term) == expected);
    }
}
