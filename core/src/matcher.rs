use crate::{DocId, DocumentNameTable, Error, IndexSnapshot, InvertedIndex, Posting};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub name: String,
    pub score: f32,
}

/// Read-only query engine over one loaded index/name-table pair.
///
/// Holds no interior mutability: once constructed it can be shared across
/// any number of concurrent readers without locking.
#[derive(Debug)]
pub struct Searcher {
    index: InvertedIndex,
    doc_names: DocumentNameTable,
}

impl Searcher {
    /// Takes ownership of the pair. Fails with [`Error::EmptyIndex`] if the
    /// index has no terms, and with [`Error::CorruptIndex`] if any posting
    /// references a document outside the name table.
    pub fn new(index: InvertedIndex, doc_names: DocumentNameTable) -> Result<Self, Error> {
        if index.is_empty() {
            return Err(Error::EmptyIndex);
        }
        let num_docs = doc_names.len() as u64;
        for (term, list) in index.iter() {
            if let Some(p) = list.iter().find(|p| u64::from(p.doc_id) >= num_docs) {
                return Err(Error::CorruptIndex(format!(
                    "posting for {term:?} references document {} of {num_docs}",
                    p.doc_id
                )));
            }
        }
        tracing::debug!(
            num_terms = index.num_terms(),
            num_docs = doc_names.len(),
            "searcher ready"
        );
        Ok(Self { index, doc_names })
    }

    pub fn from_snapshot(snapshot: IndexSnapshot) -> Result<Self, Error> {
        Self::new(snapshot.index, snapshot.doc_names)
    }

    pub fn num_docs(&self) -> usize {
        self.doc_names.len()
    }

    /// Rank documents for a de-duplicated token set.
    ///
    /// Tokens absent from the vocabulary are skipped; a fully
    /// out-of-vocabulary query yields an empty result. Candidates come from
    /// the intersection of the matched postings' document sets, falling back
    /// to their union when the intersection holds fewer than `nresults`
    /// documents; under the fallback a document missing a matched term is
    /// charged half the minimum weight seen across the matched lists. The
    /// score is the harmonic mean of the per-term weights, which punishes a
    /// document that is weak on any single query term.
    pub fn query(&self, tokens: &[String], nresults: usize) -> Result<Vec<Hit>, Error> {
        if nresults == 0 {
            return Err(Error::InvalidArgument("nresults must be positive"));
        }

        let matched: Vec<&[Posting]> = tokens
            .iter()
            .filter_map(|t| self.index.postings(t))
            .collect();
        if matched.is_empty() {
            return Ok(Vec::new());
        }

        let weights: Vec<HashMap<DocId, f32>> = matched
            .iter()
            .map(|list| list.iter().map(|p| (p.doc_id, p.weight)).collect())
            .collect();

        let mut intersection: HashSet<DocId> = weights[0].keys().copied().collect();
        for map in &weights[1..] {
            intersection.retain(|d| map.contains_key(d));
        }

        let candidates: HashSet<DocId> = if intersection.len() < nresults {
            weights.iter().flat_map(|m| m.keys().copied()).collect()
        } else {
            intersection
        };
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Half the minimum observed weight; only ever read in union mode,
        // where a candidate can miss some matched term.
        let min_weight = matched
            .iter()
            .flat_map(|list| list.iter().map(|p| p.weight))
            .fold(f32::INFINITY, f32::min);
        let placeholder = min_weight / 2.0;

        let mut scored: Vec<(DocId, f32)> = candidates
            .into_iter()
            .map(|doc| {
                let inv_sum: f64 = weights
                    .iter()
                    .map(|m| 1.0 / f64::from(m.get(&doc).copied().unwrap_or(placeholder)))
                    .sum();
                (doc, (weights.len() as f64 / inv_sum) as f32)
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(nresults);

        Ok(scored
            .into_iter()
            .map(|(doc, score)| Hit {
                name: self.doc_names[doc as usize].clone(),
                score,
            })
            .collect())
    }
}
