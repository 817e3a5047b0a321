//! Multi-field inverted index over catalog documents.

use crate::error::SearchError;
use ahash::AHashSet;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use super::document::{ElementKind, IndexedDocument};
use super::scoring::{SearchField, calculate_relevance};

/// Postings for one field: term → ascending document ordinals.
#[derive(Debug, Default)]
pub(crate) struct FieldPostings {
    terms: BTreeMap<String, Vec<u32>>,
}

impl FieldPostings {
    fn add<I>(&mut self, doc: u32, terms: I)
    where
        I: IntoIterator<Item = String>,
    {
        for term in terms {
            let postings = self.terms.entry(term).or_default();
            // Documents are added in ordinal order, so a repeat is always the last entry
            if postings.last() != Some(&doc) {
                postings.push(doc);
            }
        }
    }

    /// Every document holding a term that contains `needle`, with the best
    /// match quality among those terms.
    pub(crate) fn matches<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = (u32, u32)> + 'a {
        self.terms.iter().flat_map(move |(term, docs)| {
            calculate_relevance(term, needle)
                .into_iter()
                .flat_map(move |quality| docs.iter().map(move |&doc| (doc, quality)))
        })
    }

    pub(crate) fn term_count(&self) -> usize {
        self.terms.len()
    }
}

/// Immutable result of one build.
#[derive(Debug, Default)]
pub(crate) struct IndexSnapshot {
    documents: Vec<IndexedDocument>,
    fields: [FieldPostings; 4],
    kind_counts: [usize; 5],
}

impl IndexSnapshot {
    fn from_documents(documents: Vec<IndexedDocument>) -> Self {
        let mut snapshot = Self::default();

        for (ordinal, document) in (0u32..).zip(&documents) {
            for field in SearchField::ALL {
                snapshot.fields[field.ordinal()].add(ordinal, analyze(field, document));
            }
            snapshot.kind_counts[document.kind.ordinal()] += 1;
        }

        snapshot.documents = documents;
        snapshot
    }

    pub(crate) fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub(crate) fn document(&self, ordinal: u32) -> &IndexedDocument {
        &self.documents[ordinal as usize]
    }

    pub(crate) fn field(&self, field: SearchField) -> &FieldPostings {
        &self.fields[field.ordinal()]
    }

    fn kind_count(&self, kind: ElementKind) -> usize {
        self.kind_counts[kind.ordinal()]
    }
}

/// Splits a document field into lowercase index terms.
fn analyze(field: SearchField, document: &IndexedDocument) -> Vec<String> {
    let whitespace = |text: &str| -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    };

    match field {
        SearchField::Name => whitespace(&document.name),
        SearchField::Content => document
            .content_tokens
            .iter()
            .flat_map(|entry| whitespace(entry))
            .collect(),
        SearchField::Documentation => document
            .documentation
            .as_deref()
            .map(|text| {
                text.split(|c: char| !c.is_alphanumeric())
                    .filter(|word| !word.is_empty())
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default(),
        SearchField::Parameters => document
            .parameters
            .as_ref()
            .map(|params| params.iter().flat_map(|p| whitespace(p)).collect())
            .unwrap_or_default(),
    }
}

/// Counters reported by [`SearchIndex::statistics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatistics {
    pub total_documents: usize,
    /// Distinct terms summed over all fields
    pub total_terms: usize,
    pub types_indexed: usize,
    pub methods_indexed: usize,
    pub properties_indexed: usize,
    pub fields_indexed: usize,
    pub enums_indexed: usize,
    pub index_size_bytes: u64,
    pub last_build_time: DateTime<Utc>,
}

/// Outcome of a [`SearchIndex::build`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub indexed: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct IndexState {
    snapshot: IndexSnapshot,
    last_build_time: Option<DateTime<Utc>>,
    size_estimate: u64,
}

/// In-memory search index.
///
/// All operations serialize on one lock. A build constructs the new snapshot
/// before taking the lock and swaps it in, so readers see either the previous
/// generation or the new one, never a mix.
#[derive(Debug, Default)]
pub struct SearchIndex {
    state: Mutex<IndexState>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the index contents with `documents`.
    ///
    /// Documents with a duplicate id or that fail to encode are skipped with a
    /// warning; the rest of the build proceeds.
    pub fn build(&self, documents: Vec<IndexedDocument>) -> BuildSummary {
        let start = Instant::now();
        let offered = documents.len();

        let mut seen = AHashSet::with_capacity(offered);
        let mut size_estimate = 0u64;
        let mut accepted = Vec::with_capacity(offered);

        for document in documents {
            match admit(&mut seen, &document) {
                Ok(encoded_len) => {
                    size_estimate += encoded_len as u64;
                    accepted.push(document);
                }
                Err(e) => tracing::warn!("Skipping document: {}", e),
            }
        }

        let summary = BuildSummary {
            indexed: accepted.len(),
            skipped: offered - accepted.len(),
        };
        let snapshot = IndexSnapshot::from_documents(accepted);

        {
            let mut state = self.lock_recovering();
            state.snapshot = snapshot;
            state.size_estimate = size_estimate;
            state.last_build_time = Some(next_build_time(state.last_build_time));
        }

        tracing::info!(
            "Indexed {} documents ({} skipped) in {:?}",
            summary.indexed,
            summary.skipped,
            start.elapsed()
        );
        summary
    }

    /// Same as [`build`](Self::build).
    pub fn update(&self, documents: Vec<IndexedDocument>) -> BuildSummary {
        self.build(documents)
    }

    /// Empties the index. The last build time is kept.
    pub fn clear(&self) {
        let mut state = self.lock_recovering();
        state.snapshot = IndexSnapshot::default();
        state.size_estimate = 0;
        tracing::info!("Search index cleared");
    }

    pub fn statistics(&self) -> IndexStatistics {
        let state = self.lock_recovering();
        let snapshot = &state.snapshot;

        IndexStatistics {
            total_documents: snapshot.documents.len(),
            total_terms: SearchField::ALL
                .iter()
                .map(|&field| snapshot.field(field).term_count())
                .sum(),
            types_indexed: snapshot.kind_count(ElementKind::Type),
            methods_indexed: snapshot.kind_count(ElementKind::Method),
            properties_indexed: snapshot.kind_count(ElementKind::Property),
            fields_indexed: snapshot.kind_count(ElementKind::Field),
            enums_indexed: snapshot.kind_count(ElementKind::EnumValue),
            index_size_bytes: state.size_estimate,
            last_build_time: state.last_build_time.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    /// Runs `f` against the current snapshot under the index lock.
    pub(crate) fn with_snapshot<R>(
        &self,
        f: impl FnOnce(&IndexSnapshot) -> R,
    ) -> Result<R, SearchError> {
        let state = self.state.lock().map_err(|_| SearchError::LockPoisoned)?;
        Ok(f(&state.snapshot))
    }

    /// Writers replace whole fields, so state behind a poisoned lock is still consistent.
    fn lock_recovering(&self) -> MutexGuard<'_, IndexState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Checks a document for admission and returns its encoded size.
fn admit(seen: &mut AHashSet<String>, document: &IndexedDocument) -> Result<usize, SearchError> {
    if seen.contains(&document.id) {
        return Err(SearchError::DuplicateId(document.id.clone()));
    }
    let encoded = postcard::to_allocvec(document).map_err(|source| SearchError::Encode {
        id: document.id.clone(),
        source,
    })?;
    seen.insert(document.id.clone());
    Ok(encoded.len())
}

/// Strictly increasing build timestamps, even when the clock has not advanced.
fn next_build_time(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(previous) if now <= previous => previous + TimeDelta::microseconds(1),
        _ => now,
    }
}
