use crate::error::IngestError;
use crate::extractor::PdfExtractor;
use crate::models::DocumentFingerprint;
use crate::orchestrator::QaAgent;
use crate::providers::{EmbeddingProvider, LlmProvider};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Recursively collect `.pdf` files under `folder`, sorted for a stable
/// ingestion order.
pub fn discover_pdf_files(folder: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort_unstable();
    files
}

/// Checksum-based identity of a file on disk, for the caller's re-upload
/// bookkeeping. The core never tracks which files were loaded.
pub fn fingerprint_file(path: &Path) -> Result<DocumentFingerprint, IngestError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| IngestError::MissingFileName(path.display().to_string()))?;

    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);

    Ok(DocumentFingerprint {
        name: name.to_string(),
        checksum: format!("{:x}", hasher.finalize()),
        ingested_at: Utc::now(),
    })
}

#[derive(Debug)]
pub struct IngestedDocument {
    pub name: String,
    pub chunk_count: usize,
}

#[derive(Debug)]
pub struct SkippedPdf {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug)]
pub struct IngestionReport {
    pub documents: Vec<IngestedDocument>,
    pub skipped: Vec<SkippedPdf>,
}

impl IngestionReport {
    pub fn chunk_total(&self) -> usize {
        self.documents.iter().map(|doc| doc.chunk_count).sum()
    }
}

/// Load every PDF under `folder` into the agent, best-effort.
///
/// A document that fails to load is recorded in the report and skipped;
/// the remaining documents still load (a failed document commits nothing,
/// so the index never holds partial content). A folder with no PDFs at all
/// is an error.
pub async fn ingest_folder<P, E, L>(
    agent: &mut QaAgent<P, E, L>,
    folder: &Path,
) -> Result<IngestionReport, IngestError>
where
    P: PdfExtractor,
    E: EmbeddingProvider,
    L: LlmProvider,
{
    let files = discover_pdf_files(folder);
    if files.is_empty() {
        return Err(IngestError::NoDocuments(folder.display().to_string()));
    }

    let mut documents = Vec::new();
    let mut skipped = Vec::new();

    for path in files {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            skipped.push(SkippedPdf {
                reason: format!("path has no file name: {}", path.display()),
                path,
            });
            continue;
        };
        let name = name.to_string();

        let loaded = match tokio::fs::read(&path).await {
            Ok(bytes) => agent.load_document(&name, &bytes).await,
            Err(error) => Err(IngestError::Io(error)),
        };

        match loaded {
            Ok(chunk_count) => documents.push(IngestedDocument { name, chunk_count }),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipped pdf");
                skipped.push(SkippedPdf {
                    path,
                    reason: error.to_string(),
                });
            }
        }
    }

    Ok(IngestionReport { documents, skipped })
}
