use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded-length passage cut from a document, the unit of embedding and
/// retrieval. Page attribution is best-effort: a chunk that crosses a page
/// boundary carries the page its first character came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub chunk_id: Uuid,
    pub document: String,
    pub page: u32,
    pub text: String,
}

/// A retrieved chunk with its similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub chunk_id: Uuid,
    pub document: String,
    pub page: u32,
    pub text: String,
    pub score: f32,
}

/// Identity of an uploaded file, for caller-owned re-upload detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFingerprint {
    pub name: String,
    pub checksum: String,
    pub ingested_at: DateTime<Utc>,
}
