//! TF-IDF vector space over response trigger phrases.

use std::collections::{HashMap, HashSet};

use triage_core::Catalog;

/// Sparse, L2-normalized term vector.
type SparseVector = HashMap<usize, f64>;

/// One candidate document: its position in catalog order and its vector.
#[derive(Debug)]
struct Document {
    index: usize,
    vector: SparseVector,
}

/// Term-weighted space built from every non-fallback candidate's triggers.
///
/// Built once per retriever and read-only afterwards.
#[derive(Debug)]
pub(crate) struct VectorSpace {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: Vec<Document>,
}

impl VectorSpace {
    pub(crate) fn build(catalog: &Catalog) -> Self {
        let corpus: Vec<(usize, Vec<String>)> = catalog
            .responses()
            .enumerate()
            .filter(|(_, candidate)| !candidate.is_fallback())
            .map(|(index, candidate)| {
                let tokens = candidate
                    .triggers
                    .iter()
                    .flat_map(|trigger| tokenize(trigger))
                    .collect();
                (index, tokens)
            })
            .collect();

        let mut vocabulary = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        for (_, tokens) in &corpus {
            let mut seen = HashSet::new();
            for token in tokens {
                let next = vocabulary.len();
                let term = *vocabulary.entry(token.clone()).or_insert(next);
                if term == document_frequency.len() {
                    document_frequency.push(0);
                }
                if seen.insert(term) {
                    document_frequency[term] += 1;
                }
            }
        }

        let n = corpus.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect::<Vec<_>>();

        let documents = corpus
            .into_iter()
            .map(|(index, tokens)| Document {
                index,
                vector: weigh(&tokens, &vocabulary, &idf),
            })
            .collect();

        Self {
            vocabulary,
            idf,
            documents,
        }
    }

    /// Cosine similarity of `text` against every document, as
    /// `(catalog index, score)` in catalog order.
    pub(crate) fn similarities(&self, text: &str) -> Vec<(usize, f64)> {
        let query = weigh(&tokenize(text), &self.vocabulary, &self.idf);
        self.documents
            .iter()
            .map(|doc| (doc.index, dot(&query, &doc.vector)))
            .collect()
    }

    pub(crate) fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Lower-case words of letters, digits and apostrophes.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn weigh(tokens: &[String], vocabulary: &HashMap<String, usize>, idf: &[f64]) -> SparseVector {
    let mut vector = SparseVector::new();
    for token in tokens {
        if let Some(&term) = vocabulary.get(token) {
            *vector.entry(term).or_insert(0.0) += 1.0;
        }
    }
    for (term, weight) in vector.iter_mut() {
        *weight *= idf[*term];
    }

    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum()
}
