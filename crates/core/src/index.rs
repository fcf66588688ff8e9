use crate::models::{DocumentChunk, ScoredPassage};

/// One stored (vector, chunk) pair.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    vector: Vec<f32>,
    chunk: DocumentChunk,
}

impl IndexEntry {
    pub fn new(vector: Vec<f32>, chunk: DocumentChunk) -> Self {
        Self { vector, chunk }
    }
}

/// Append-only in-memory vector index with brute-force cosine search.
///
/// Entries are never updated or removed individually; the index only grows
/// between [`VectorIndex::reset`] calls. The structure is not internally
/// synchronized — one index belongs to one agent, and callers that share an
/// agent across threads must serialize access behind a single lock.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append entries in order. An empty batch is a no-op.
    pub fn insert(&mut self, entries: impl IntoIterator<Item = IndexEntry>) {
        self.entries.extend(entries);
    }

    /// Return up to `k` entries by descending cosine similarity to `query`.
    ///
    /// An empty index yields an empty result, never an error. Equal scores
    /// keep insertion order (the sort is stable), so repeated searches over
    /// the same entries return the same ranking.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredPassage> {
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(query, &entry.vector), entry))
            .collect();

        scored.sort_by(|left, right| right.0.total_cmp(&left.0));

        scored
            .into_iter()
            .take(k)
            .map(|(score, entry)| ScoredPassage {
                chunk_id: entry.chunk.chunk_id,
                document: entry.chunk.document.clone(),
                page: entry.chunk.page,
                text: entry.chunk.text.clone(),
                score,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Discard every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}
