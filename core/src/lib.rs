//! Core of the retrieval engine: tokenization, TF-IDF vectorization,
//! inverted-index construction, snapshot persistence, and query matching.
//!
//! The index is built offline in one batch and is immutable afterwards; the
//! server loads a snapshot once and serves read-only queries from it.

pub mod error;
pub mod index;
pub mod matcher;
pub mod matrix;
pub mod persist;
pub mod tokenizer;

pub use error::Error;
pub use index::{DocId, DocumentNameTable, InvertedIndex, Posting};
pub use matcher::{Hit, Searcher};
pub use matrix::{TermMatrix, Vectorizer};
pub use persist::IndexSnapshot;
