// src/pipeline/mod.rs
pub mod corpus;
pub mod document;

pub use corpus::{extract_corpus, CorpusTable};
pub use document::DocumentProcessor;
