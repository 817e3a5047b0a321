//! Relevance scoring for keyword search.
//!
//! A document's score is the sum, over query terms, of the best match quality
//! in each field weighted by that field's boost, multiplied by the term's
//! inverse document frequency.

/// Searchable fields of an [`IndexedDocument`](super::IndexedDocument).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchField {
    Name,
    Content,
    Documentation,
    Parameters,
}

impl SearchField {
    pub(crate) const ALL: [Self; 4] = [
        Self::Name,
        Self::Content,
        Self::Documentation,
        Self::Parameters,
    ];

    pub(crate) const fn boost(self) -> f32 {
        match self {
            Self::Name => 3.0,
            Self::Content => 1.0,
            Self::Documentation | Self::Parameters => 0.5,
        }
    }

    pub(crate) const fn ordinal(self) -> usize {
        self as usize
    }
}

/// Calculate simple text relevance score.
///
/// Returns a score based on how well the query matches the text:
/// - 100: Exact match
/// - 50: Text starts with query
/// - 10: Text contains query
/// - None: No match
pub(crate) fn calculate_relevance(text: &str, query: &str) -> Option<u32> {
    if text == query {
        Some(100)
    } else if text.starts_with(query) {
        Some(50)
    } else if text.contains(query) {
        Some(10)
    } else {
        None
    }
}

/// Weighted contribution of a single field match.
pub(crate) fn field_score(field: SearchField, relevance: u32) -> f32 {
    field.boost() * relevance as f32 / 100.0
}

/// Inverse document frequency: rarer terms weigh more. Always positive.
pub(crate) fn inverse_document_frequency(total_documents: usize, matching: usize) -> f32 {
    let ratio = total_documents as f32 / (matching as f32 + 1.0);
    (1.0 + ratio.ln()).max(0.1)
}

/// Rounds a score to two decimals for presentation.
pub(crate) fn round_score(score: f32) -> f64 {
    (f64::from(score) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("dowork", "dowork", Some(100))]
    #[case("dowork", "do", Some(50))]
    #[case("dowork", "work", Some(10))]
    #[case("dowork", "play", None)]
    fn test_calculate_relevance(#[case] text: &str, #[case] query: &str, #[case] expected: Option<u32>) {
        check!(calculate_relevance(text, query) == expected);
    }

    #[test]
    fn test_name_outweighs_documentation() {
        check!(field_score(SearchField::Name, 10) > field_score(SearchField::Documentation, 100) / 2.0);
        check!(field_score(SearchField::Name, 100) > field_score(SearchField::Content, 100));
    }

    #[test]
    fn test_idf_prefers_rare_terms() {
        check!(inverse_document_frequency(100, 1) > inverse_document_frequency(100, 50));
        check!(inverse_document_frequency(1, 1) > 0.0);
    }

    #[rstest]
    #[case(1.23456, 1.23)]
    #[case(2.0, 2.0)]
    #[case(0.126, 0.13)]
    fn test_round_score(#[case] score: f32, #[case] expected: f64) {
        check!((round_score(score) - expected).abs() < 1e-9);
    }
}
