use nexbot_core::{NexbotError, NexbotResult};
use std::collections::HashMap;

/// Sparse vector as `(dimension, weight)` pairs sorted by dimension.
pub type SparseVector = Vec<(usize, f64)>;

/// Tokenize into lowercase runs of two or more word characters
/// (letters, digits, underscore).
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() > 1)
        .map(str::to_lowercase)
        .collect()
}

/// A TF-IDF vector space fitted over a fixed list of documents.
///
/// Weights follow the smoothed formulation
/// ```text
/// idf(t)    = ln((1 + n) / (1 + df(t))) + 1
/// w(t, d)   = count(t, d) * idf(t)
/// ```
/// and every vector (documents and projected queries alike) is L2-normalized.
#[derive(Debug, Clone)]
pub struct TfidfSpace {
    /// term -> dimension
    vocabulary: HashMap<String, usize>,
    /// dimension -> idf weight
    idf: Vec<f64>,
    /// One vector per fitted document, in input order.
    rows: Vec<SparseVector>,
}

impl TfidfSpace {
    /// Learn the vocabulary and idf weights from `documents` and vectorize them.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> NexbotResult<Self> {
        if documents.is_empty() {
            return Err(NexbotError::ResourceEmpty(
                "cannot fit a vector space on zero documents".to_string(),
            ));
        }

        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        // Dimensions are assigned in sorted term order, independent of hashing.
        let mut terms: Vec<&str> = tokenized.iter().flatten().map(String::as_str).collect();
        terms.sort_unstable();
        terms.dedup();
        if terms.is_empty() {
            return Err(NexbotError::Lookup(
                "empty vocabulary; the documents contain no indexable terms".to_string(),
            ));
        }
        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(dim, term)| ((*term).to_string(), dim))
            .collect();

        // Document frequencies
        let mut df = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let mut seen: Vec<usize> = tokens.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            seen.sort_unstable();
            seen.dedup();
            for dim in seen {
                df[dim] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let mut space = Self {
            vocabulary,
            idf,
            rows: Vec::with_capacity(tokenized.len()),
        };
        space.rows = tokenized.iter().map(|tokens| space.weigh(tokens)).collect();
        Ok(space)
    }

    /// Project arbitrary text into this space. Terms outside the fitted
    /// vocabulary contribute nothing.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&tokenize(text))
    }

    /// Vectors of the fitted documents, in input order.
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Number of distinct terms in the vocabulary.
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(&dim) = self.vocabulary.get(token) {
                *counts.entry(dim).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(dim, count)| (dim, count * self.idf[dim]))
            .collect();
        vector.sort_unstable_by_key(|&(dim, _)| dim);

        // L2 normalize
        let norm: f64 = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }
}

/// Cosine similarity of two sparse vectors; 0.0 when either is all-zero.
pub fn cosine_similarity(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    let na: f64 = a.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}
