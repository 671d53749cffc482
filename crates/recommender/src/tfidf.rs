//! Term-frequency / inverse-document-frequency vectorization.
//!
//! Small, fit-once vectorizer for the item text profiles. Tokens are
//! whitespace-split and lowercased by default; idf uses the smoothed form
//! `ln((1 + n) / (1 + df)) + 1` and every output vector is L2-normalized,
//! so cosine similarity between two vectors reduces to their dot product.

use std::collections::{HashMap, HashSet};

/// Sparse tf-idf vector: vocabulary index -> weight
pub type SparseVector = HashMap<usize, f64>;

/// Fit-once tf-idf vectorizer over a document corpus
#[derive(Debug, Default)]
pub struct TfIdfVectorizer {
    lowercase: bool,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self {
            lowercase: true,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Set whether tokens are lowercased (default: true)
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|token| {
                if self.lowercase {
                    token.to_lowercase()
                } else {
                    token.to_string()
                }
            })
            .collect()
    }

    /// Learn the vocabulary and idf weights from `docs`
    pub fn fit(&mut self, docs: &[&str]) {
        self.vocabulary.clear();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc in docs {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in self.tokenize(doc) {
                let next_index = self.vocabulary.len();
                let index = *self.vocabulary.entry(token).or_insert(next_index);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                if seen.insert(index) {
                    document_frequency[index] += 1;
                }
            }
        }

        let n_docs = docs.len() as f64;
        self.idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
    }

    /// Vectorize one document with the fitted vocabulary.
    ///
    /// Unknown tokens are ignored; the result is L2-normalized (or empty,
    /// when nothing in the document is in the vocabulary).
    pub fn transform(&self, doc: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in self.tokenize(doc) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let norm: f64 = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in vector.values_mut() {
                *weight /= norm;
            }
        }
        vector
    }

    /// Fit on `docs` and return their vectors in order
    pub fn fit_transform(&mut self, docs: &[&str]) -> Vec<SparseVector> {
        self.fit(docs);
        docs.iter().map(|doc| self.transform(doc)).collect()
    }
}

/// Dot product of two sparse vectors. Since `transform` L2-normalizes,
/// this is the cosine similarity of the two documents.
pub fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(index, weight)| large.get(index).map(|other| weight * other))
        .sum()
}
