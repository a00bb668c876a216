use crate::matrix::TermMatrix;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocId = u32;

/// Document names in collection enumeration order, indexed by `DocId`.
/// Persisted alongside the index so query-time translation cannot drift
/// from the order the builder saw.
pub type DocumentNameTable = Vec<String>;

/// One entry of a postings list: this document contains the term with this
/// weight. Weights are always > 0; a zero weight is simply not stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f32,
}

/// Term -> postings mapping, immutable after construction.
///
/// Every vocabulary term is present, possibly with an empty list; callers
/// must treat an empty list like any other, not as an unknown term.
/// Postings are sorted by weight descending, ties in document-ascending
/// order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    /// Transpose a sparse weight matrix into postings lists.
    ///
    /// Fails with [`Error::MalformedMatrix`] on a negative or non-finite
    /// weight, or a cell whose column is outside the vocabulary.
    pub fn from_matrix(matrix: &TermMatrix) -> Result<Self, Error> {
        let mut postings: HashMap<String, Vec<Posting>> = matrix
            .vocabulary
            .iter()
            .map(|term| (term.clone(), Vec::new()))
            .collect();

        for cell in &matrix.cells {
            let term = matrix.vocabulary.get(cell.col as usize).ok_or_else(|| {
                Error::MalformedMatrix(format!(
                    "column {} out of range (vocabulary size {})",
                    cell.col,
                    matrix.vocabulary.len()
                ))
            })?;
            if !cell.weight.is_finite() || cell.weight < 0.0 {
                return Err(Error::MalformedMatrix(format!(
                    "weight {} for document {} in column {}",
                    cell.weight, cell.doc, cell.col
                )));
            }
            if cell.weight == 0.0 {
                continue;
            }
            postings
                .get_mut(term.as_str())
                .ok_or_else(|| Error::MalformedMatrix(format!("unknown term {term:?}")))?
                .push(Posting { doc_id: cell.doc, weight: cell.weight });
        }

        // Stable sort: equal weights keep the cell iteration order, which is
        // document-ascending.
        for list in postings.values_mut() {
            list.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        }

        tracing::debug!(num_terms = postings.len(), "inverted index built");
        Ok(Self { postings })
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MatrixCell;

    fn matrix(vocab: &[&str], cells: &[(DocId, u32, f32)]) -> TermMatrix {
        TermMatrix {
            vocabulary: vocab.iter().map(|s| s.to_string()).collect(),
            cells: cells
                .iter()
                .map(|&(doc, col, weight)| MatrixCell { doc, col, weight })
                .collect(),
            num_docs: cells.iter().map(|c| c.0 + 1).max().unwrap_or(0),
        }
    }

    #[test]
    fn postings_sorted_by_weight_descending() {
        let m = matrix(&["apple"], &[(0, 0, 0.2), (1, 0, 0.9), (2, 0, 0.5)]);
        let idx = InvertedIndex::from_matrix(&m).unwrap();
        let list = idx.postings("apple").unwrap();
        let weights: Vec<f32> = list.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![0.9, 0.5, 0.2]);
    }

    #[test]
    fn equal_weights_keep_document_order() {
        let m = matrix(&["apple"], &[(0, 0, 0.5), (1, 0, 0.5), (2, 0, 0.5)]);
        let idx = InvertedIndex::from_matrix(&m).unwrap();
        let ids: Vec<DocId> = idx.postings("apple").unwrap().iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn zero_weight_cells_are_skipped() {
        let m = matrix(&["apple", "pear"], &[(0, 0, 0.0), (0, 1, 0.3)]);
        let idx = InvertedIndex::from_matrix(&m).unwrap();
        assert!(idx.postings("apple").unwrap().is_empty());
        assert_eq!(idx.postings("pear").unwrap().len(), 1);
    }

    #[test]
    fn unreferenced_vocabulary_term_gets_empty_list() {
        let m = matrix(&["apple", "pear"], &[(0, 0, 0.3)]);
        let idx = InvertedIndex::from_matrix(&m).unwrap();
        assert_eq!(idx.postings("pear"), Some(&[][..]));
        assert_eq!(idx.postings("plum"), None);
    }

    #[test]
    fn negative_weight_is_malformed() {
        let m = matrix(&["apple"], &[(0, 0, -0.1)]);
        assert!(matches!(
            InvertedIndex::from_matrix(&m),
            Err(Error::MalformedMatrix(_))
        ));
    }

    #[test]
    fn out_of_range_column_is_malformed() {
        let m = matrix(&["apple"], &[(0, 3, 0.5)]);
        assert!(matches!(
            InvertedIndex::from_matrix(&m),
            Err(Error::MalformedMatrix(_))
        ));
    }

    #[test]
    fn no_duplicate_doc_ids_from_vectorizer_output() {
        let docs: Vec<Vec<String>> = vec![
            "apple pear apple apple".split_whitespace().map(str::to_string).collect(),
            "pear plum".split_whitespace().map(str::to_string).collect(),
        ];
        let m = crate::Vectorizer::default().fit_transform(&docs);
        let idx = InvertedIndex::from_matrix(&m).unwrap();
        for (_, list) in idx.iter() {
            let mut ids: Vec<DocId> = list.iter().map(|p| p.doc_id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), list.len());
        }
    }
}
