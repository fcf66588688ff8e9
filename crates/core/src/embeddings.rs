use crate::error::ProviderError;
use crate::providers::EmbeddingProvider;
use async_trait::async_trait;

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 128;

/// Deterministic offline embedder: character trigrams hashed into a
/// fixed-size bucket histogram, L2-normalized so dot product equals cosine
/// similarity. No model download, no network — the default for tests and
/// for running without an embedding service.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

impl HashEmbedder {
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions];
        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        if chars.len() < 3 {
            for ch in &chars {
                let bucket = (fnv1a(&ch.to_string()) % vector.len() as u64) as usize;
                vector[bucket] += 1.0;
            }
        } else {
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                let bucket = (fnv1a(&trigram) % vector.len() as u64) as usize;
                vector[bucket] += 1.0;
            }
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        vector
    }
}

fn fnv1a(token: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::{HashEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
    use crate::index::cosine_similarity;

    #[test]
    fn embedding_is_deterministic() {
        let embedder = HashEmbedder::default();
        let first = embedder.embed_text("the measurement campaign results");
        let second = embedder.embed_text("the measurement campaign results");
        assert_eq!(first, second);
    }

    #[test]
    fn embedding_has_configured_length() {
        assert_eq!(HashEmbedder::default().embed_text("abc").len(), DEFAULT_EMBEDDING_DIMENSIONS);
        assert_eq!(HashEmbedder::with_dimensions(32).embed_text("abc").len(), 32);
    }

    #[test]
    fn embedding_is_unit_length() {
        let vector = HashEmbedder::default().embed_text("some reasonably long input text");
        let magnitude: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_embeds_to_zero_vector() {
        let vector = HashEmbedder::default().embed_text("");
        assert!(vector.iter().all(|value| *value == 0.0));
    }

    #[test]
    fn shared_vocabulary_scores_higher_than_unrelated_text() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed_text("summarize section 2 results");
        let relevant = embedder.embed_text("Section 2: Results of the evaluation");
        let unrelated = embedder.embed_text("unrelated banana smoothie recipe");

        assert!(
            cosine_similarity(&query, &relevant) > cosine_similarity(&query, &unrelated)
        );
    }
}
