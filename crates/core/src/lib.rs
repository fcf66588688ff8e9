pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod index;
pub mod ingest;
pub mod models;
pub mod orchestrator;
pub mod providers;

pub use chunking::{split_pages, ChunkingOptions};
pub use embeddings::{HashEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{ConfigurationError, ExtractionError, IngestError, ProviderError, Result};
pub use extractor::{LopdfExtractor, PageText, PdfExtractor};
pub use index::{cosine_similarity, IndexEntry, VectorIndex};
pub use ingest::{
    discover_pdf_files, fingerprint_file, ingest_folder, IngestedDocument, IngestionReport,
    SkippedPdf,
};
pub use models::{DocumentChunk, DocumentFingerprint, ScoredPassage};
pub use orchestrator::{
    QaAgent, DEFAULT_CHUNK_MAX_CHARS, DEFAULT_CHUNK_OVERLAP_CHARS, RETRIEVAL_TOP_K,
};
pub use providers::{ChatMessage, ChatRole, EmbeddingProvider, GroqClient, LlmProvider, OllamaEmbedder};
