use thiserror::Error;

/// Failure to turn a source document into page text.
///
/// Fatal to that document only; other documents in the same batch are
/// unaffected.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("pdf parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text cleanup pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("pdf has no readable page text")]
    NoText,
}

/// Invalid chunking parameters. Programmer error, not user-recoverable.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("chunk overlap {overlap_chars} must be smaller than chunk size {max_chars}")]
    OverlapTooLarge {
        max_chars: usize,
        overlap_chars: usize,
    },
}

/// Embedding or completion backend failure.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{provider} request failed: {details}")]
    Backend { provider: String, details: String },

    #[error("missing api key for {0}")]
    MissingApiKey(String),

    #[error("{0} returned an empty response")]
    EmptyResponse(String),
}

/// Any failure during the document load pipeline.
///
/// Wraps the stage that failed so callers can report per-document failures
/// and continue with the remaining documents.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("invalid chunking config: {0}")]
    Chunking(#[from] ConfigurationError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] ProviderError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("no pdf files found in {0}")]
    NoDocuments(String),

    #[error("embedding count {actual} does not match chunk count {expected}")]
    EmbeddingCountMismatch { expected: usize, actual: usize },
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
