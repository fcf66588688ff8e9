use chrono::Utc;
use clap::{Parser, Subcommand};
use pdf_insight_core::providers::groq::DEFAULT_GROQ_MODEL;
use pdf_insight_core::providers::ollama::{
    DEFAULT_OLLAMA_EMBED_DIMENSIONS, DEFAULT_OLLAMA_EMBED_MODEL,
};
use pdf_insight_core::{
    fingerprint_file, ingest_folder, ChatMessage, ChatRole, EmbeddingProvider, GroqClient,
    HashEmbedder, LlmProvider, LopdfExtractor, OllamaEmbedder, PdfExtractor, QaAgent,
    RETRIEVAL_TOP_K,
};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-insight", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Groq API key used for answer generation.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Chat model requested from the completion endpoint.
    #[arg(long, default_value = DEFAULT_GROQ_MODEL)]
    model: String,

    /// Ollama base URL for embeddings. Falls back to the offline hashing
    /// embedder when unset.
    #[arg(long, env = "OLLAMA_URL")]
    ollama_url: Option<String>,

    /// Embedding model requested from Ollama.
    #[arg(long, default_value = DEFAULT_OLLAMA_EMBED_MODEL)]
    embed_model: String,

    /// Embedding dimensions expected from Ollama.
    #[arg(long, default_value_t = DEFAULT_OLLAMA_EMBED_DIMENSIONS)]
    embed_dimensions: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Load PDFs and answer a single question.
    Ask {
        /// Question to answer.
        question: String,

        /// PDF file(s) to load before answering.
        #[arg(long)]
        pdf: Vec<PathBuf>,

        /// Folder of PDFs to load recursively.
        #[arg(long)]
        folder: Option<PathBuf>,

        /// Print the retrieved passages before the answer.
        #[arg(long, default_value_t = false)]
        show_context: bool,
    },
    /// Interactive chat session over stdin.
    Chat {
        /// PDF file(s) to load before the session starts.
        #[arg(long)]
        pdf: Vec<PathBuf>,

        /// Folder of PDFs to load recursively before the session starts.
        #[arg(long)]
        folder: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let Cli {
        command,
        api_key,
        model,
        ollama_url,
        embed_model,
        embed_dimensions,
    } = Cli::parse();

    let llm = GroqClient::new(api_key, model)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        "pdf-insight boot"
    );

    match ollama_url {
        Some(url) => {
            let embedder = OllamaEmbedder::new(&url, embed_model, embed_dimensions)?;
            run(QaAgent::new(LopdfExtractor, embedder, llm), command).await
        }
        None => {
            run(
                QaAgent::new(LopdfExtractor, HashEmbedder::default(), llm),
                command,
            )
            .await
        }
    }
}

async fn run<P, E, L>(mut agent: QaAgent<P, E, L>, command: Command) -> anyhow::Result<()>
where
    P: PdfExtractor,
    E: EmbeddingProvider,
    L: LlmProvider,
{
    let mut session = Session::default();

    match command {
        Command::Ask {
            question,
            pdf,
            folder,
            show_context,
        } => {
            session
                .load_sources(&mut agent, &pdf, folder.as_deref())
                .await?;

            if show_context && agent.is_indexed() {
                match agent.retrieve(&question, RETRIEVAL_TOP_K).await {
                    Ok(passages) => {
                        for passage in passages {
                            println!(
                                "[{:.4}] {} p.{}: {}",
                                passage.score,
                                passage.document,
                                passage.page,
                                snippet(&passage.text)
                            );
                        }
                    }
                    Err(error) => warn!(%error, "context retrieval failed"),
                }
            }

            println!("{}", agent.ask(&question).await);
        }
        Command::Chat { pdf, folder } => {
            session
                .load_sources(&mut agent, &pdf, folder.as_deref())
                .await?;
            chat_loop(&mut agent, &mut session).await?;
        }
    }

    Ok(())
}

/// Session state the core deliberately does not own: which files were
/// already uploaded, and the conversation transcript.
#[derive(Default)]
struct Session {
    processed: HashSet<String>,
    history: Vec<ChatMessage>,
}

impl Session {
    async fn load_sources<P, E, L>(
        &mut self,
        agent: &mut QaAgent<P, E, L>,
        pdfs: &[PathBuf],
        folder: Option<&Path>,
    ) -> anyhow::Result<()>
    where
        P: PdfExtractor,
        E: EmbeddingProvider,
        L: LlmProvider,
    {
        for path in pdfs {
            if let Err(error) = self.load_file(agent, path).await {
                warn!(path = %path.display(), %error, "failed to load pdf");
                println!("failed to load {}: {error}", path.display());
            }
        }

        if let Some(folder) = folder {
            let report = ingest_folder(agent, folder).await?;
            for skipped in &report.skipped {
                warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped pdf");
                println!("skipped {}: {}", skipped.path.display(), skipped.reason);
            }
            for document in &report.documents {
                println!("{}: added {} chunks", document.name, document.chunk_count);
            }
        }

        Ok(())
    }

    async fn load_file<P, E, L>(
        &mut self,
        agent: &mut QaAgent<P, E, L>,
        path: &Path,
    ) -> anyhow::Result<()>
    where
        P: PdfExtractor,
        E: EmbeddingProvider,
        L: LlmProvider,
    {
        let fingerprint = fingerprint_file(path)?;
        if self.processed.contains(&fingerprint.checksum) {
            println!("{} already loaded, skipping", fingerprint.name);
            return Ok(());
        }

        let bytes = tokio::fs::read(path).await?;
        let chunks = agent.load_document(&fingerprint.name, &bytes).await?;
        self.processed.insert(fingerprint.checksum);
        println!("{}: added {} chunks", fingerprint.name, chunks);
        Ok(())
    }

    fn clear(&mut self) {
        self.processed.clear();
        self.history.clear();
    }
}

async fn chat_loop<P, E, L>(
    agent: &mut QaAgent<P, E, L>,
    session: &mut Session,
) -> anyhow::Result<()>
where
    P: PdfExtractor,
    E: EmbeddingProvider,
    L: LlmProvider,
{
    println!(
        "pdf-insight chat. Ask a question, or use :load <path>, :history, :reset, :quit."
    );

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(path) = line.strip_prefix(":load ") {
            let path = PathBuf::from(path.trim());
            if let Err(error) = session.load_file(agent, &path).await {
                println!("failed to load {}: {error}", path.display());
            }
            continue;
        }

        match line {
            ":quit" | ":q" => break,
            ":reset" => {
                agent.reset();
                session.clear();
                println!("documents and history cleared");
            }
            ":history" => {
                for turn in &session.history {
                    let speaker = match turn.role {
                        ChatRole::User => "you",
                        ChatRole::Assistant => "assistant",
                        ChatRole::System => "system",
                    };
                    println!("{speaker}: {}", turn.content);
                }
            }
            question => {
                let answer = agent.ask(question).await;
                println!("{answer}");
                session.history.push(ChatMessage::user(question));
                session.history.push(ChatMessage::assistant(&answer));
            }
        }
    }

    Ok(())
}

fn snippet(text: &str) -> String {
    const MAX: usize = 160;
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= MAX {
        flattened
    } else {
        let cut: String = flattened.chars().take(MAX).collect();
        format!("{cut}...")
    }
}
