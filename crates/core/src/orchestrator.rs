use crate::chunking::{split_pages, ChunkingOptions};
use crate::error::{IngestError, ProviderError};
use crate::extractor::PdfExtractor;
use crate::index::{IndexEntry, VectorIndex};
use crate::models::ScoredPassage;
use crate::providers::{ChatMessage, EmbeddingProvider, LlmProvider};
use tracing::{debug, info};

pub const DEFAULT_CHUNK_MAX_CHARS: usize = 1_000;
pub const DEFAULT_CHUNK_OVERLAP_CHARS: usize = 200;
pub const RETRIEVAL_TOP_K: usize = 3;

const ANSWER_TEMPERATURE: f32 = 0.0;
const ANSWER_MAX_TOKENS: u32 = 1_024;

pub const GENERAL_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer the user's question to the best of your ability.";

pub const GROUNDED_SYSTEM_PROMPT: &str = "You are a helpful and accurate assistant. Answer the \
     user's question using the provided context. If the context is not relevant to the question, \
     answer from your general knowledge.";

/// Facade over the whole pipeline: extraction, chunking, embedding, the
/// vector index, and prompt composition.
///
/// The agent has two modes and no other state: until a document has been
/// ingested it answers from general knowledge; afterwards it retrieves the
/// closest passages and grounds the prompt in them. Conversation history is
/// the caller's concern — every `ask` stands alone.
///
/// Each agent owns its index exclusively; construct one per corpus.
pub struct QaAgent<P, E, L> {
    extractor: P,
    embedder: E,
    llm: L,
    options: ChunkingOptions,
    index: Option<VectorIndex>,
}

impl<P, E, L> QaAgent<P, E, L>
where
    P: PdfExtractor,
    E: EmbeddingProvider,
    L: LlmProvider,
{
    pub fn new(extractor: P, embedder: E, llm: L) -> Self {
        Self {
            extractor,
            embedder,
            llm,
            options: ChunkingOptions {
                max_chars: DEFAULT_CHUNK_MAX_CHARS,
                overlap_chars: DEFAULT_CHUNK_OVERLAP_CHARS,
            },
            index: None,
        }
    }

    pub fn with_chunking_options(mut self, options: ChunkingOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether at least one document has been ingested since the last reset.
    pub fn is_indexed(&self) -> bool {
        self.index.as_ref().is_some_and(|index| !index.is_empty())
    }

    pub fn chunk_count(&self) -> usize {
        self.index.as_ref().map_or(0, VectorIndex::len)
    }

    /// Ingest one document: extract pages, chunk, embed, insert.
    ///
    /// Additive — every call grows the corpus, nothing is replaced. Returns
    /// the number of chunks added. All-or-nothing per document: entries are
    /// inserted only after every chunk of the document has embedded, so a
    /// failure leaves the index exactly as it was.
    pub async fn load_document(&mut self, name: &str, bytes: &[u8]) -> Result<usize, IngestError> {
        let pages = self.extractor.extract_bytes(bytes)?;
        let chunks = split_pages(&pages, name, &self.options)?;
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(IngestError::EmbeddingCountMismatch {
                expected: chunks.len(),
                actual: vectors.len(),
            });
        }

        let added = chunks.len();
        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexEntry::new(vector, chunk));
        self.index.get_or_insert_with(VectorIndex::new).insert(entries);

        info!(document = name, chunks = added, "document ingested");
        Ok(added)
    }

    /// Embed the question and return the `k` nearest passages. Empty when
    /// nothing has been ingested.
    pub async fn retrieve(
        &self,
        question: &str,
        k: usize,
    ) -> Result<Vec<ScoredPassage>, ProviderError> {
        let Some(index) = self.index.as_ref().filter(|index| !index.is_empty()) else {
            return Ok(Vec::new());
        };

        let vectors = self.embedder.embed_batch(&[question.to_string()]).await?;
        let query = vectors
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse("embedding".to_string()))?;

        Ok(index.search(&query, k))
    }

    /// Answer a question, from the ingested documents when there are any,
    /// from general knowledge otherwise.
    ///
    /// This is a terminal, user-facing surface: a provider failure comes
    /// back as a readable answer string, never as an error, and leaves the
    /// index untouched.
    pub async fn ask(&self, question: &str) -> String {
        match self.answer(question).await {
            Ok(answer) => answer,
            Err(error) => format!("Error communicating with AI: {error}"),
        }
    }

    async fn answer(&self, question: &str) -> Result<String, ProviderError> {
        let (context, system_prompt) = if self.is_indexed() {
            let passages = self.retrieve(question, RETRIEVAL_TOP_K).await?;
            debug!(passages = passages.len(), "retrieved context");
            let context = passages
                .iter()
                .map(|passage| passage.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            (context, GROUNDED_SYSTEM_PROMPT)
        } else {
            (String::new(), GENERAL_SYSTEM_PROMPT)
        };

        let user_message = format!("Context:\n{context}\n\nQuestion: \n{question}\n");
        let messages = [
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_message),
        ];

        self.llm
            .complete(&messages, ANSWER_TEMPERATURE, ANSWER_MAX_TOKENS)
            .await
    }

    /// Discard the index and return to the initial, general-knowledge mode.
    pub fn reset(&mut self) {
        self.index = None;
        info!("agent reset");
    }
}
