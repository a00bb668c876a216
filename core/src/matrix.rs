use crate::DocId;
use std::collections::HashMap;

/// One nonzero cell of the document/term weight matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixCell {
    pub doc: DocId,
    pub col: u32,
    pub weight: f32,
}

/// Sparse document/term weight matrix plus its vocabulary.
///
/// Cells are iterated in document-ascending order; the index builder relies
/// on that order to break weight ties deterministically.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TermMatrix {
    pub vocabulary: Vec<String>,
    pub cells: Vec<MatrixCell>,
    pub num_docs: u32,
}

/// TF-IDF weighting over tokenized documents.
///
/// tf = 1 + ln(count), idf = ln(N/df) (or smoothed ln(1 + N/df)), weights
/// L2-normalized per document. The vocabulary is sorted so column order is
/// stable across runs on the same collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vectorizer {
    pub smoothed_idf: bool,
}

impl Vectorizer {
    pub fn new(smoothed_idf: bool) -> Self {
        Self { smoothed_idf }
    }

    pub fn fit_transform(&self, documents: &[Vec<String>]) -> TermMatrix {
        let num_docs = documents.len() as u32;

        // Vocabulary: sorted distinct terms across the collection.
        let mut vocabulary: Vec<String> = {
            let mut terms: Vec<&String> = documents.iter().flatten().collect();
            terms.sort_unstable();
            terms.dedup();
            terms.into_iter().cloned().collect()
        };
        vocabulary.shrink_to_fit();
        let columns: HashMap<&str, u32> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i as u32))
            .collect();

        // Document frequency per column.
        let mut df = vec![0u32; vocabulary.len()];
        let mut counts_per_doc: Vec<Vec<(u32, u32)>> = Vec::with_capacity(documents.len());
        for tokens in documents {
            let mut counts: HashMap<u32, u32> = HashMap::new();
            for token in tokens {
                *counts.entry(columns[token.as_str()]).or_insert(0) += 1;
            }
            let mut sorted: Vec<(u32, u32)> = counts.into_iter().collect();
            sorted.sort_unstable_by_key(|&(col, _)| col);
            for &(col, _) in &sorted {
                df[col as usize] += 1;
            }
            counts_per_doc.push(sorted);
        }

        let n = num_docs.max(1) as f32;
        let mut cells = Vec::new();
        for (doc, counts) in counts_per_doc.into_iter().enumerate() {
            let mut row: Vec<(u32, f32)> = Vec::with_capacity(counts.len());
            let mut norm = 0.0f32;
            for (col, count) in counts {
                let tf = 1.0 + (count as f32).ln();
                let df_t = df[col as usize].max(1) as f32;
                let idf = if self.smoothed_idf {
                    (1.0 + n / df_t).ln()
                } else {
                    (n / df_t).ln()
                };
                let w = tf * idf;
                norm += w * w;
                row.push((col, w));
            }
            let norm = if norm > 0.0 { norm.sqrt() } else { 1.0 };
            for (col, w) in row {
                let weight = w / norm;
                // A term present in every document gets idf 0 under the
                // unsmoothed scheme; its cells vanish here and its postings
                // list stays empty.
                if weight > 0.0 {
                    cells.push(MatrixCell { doc: doc as DocId, col, weight });
                }
            }
        }

        TermMatrix { vocabulary, cells, num_docs }
    }
}
