use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{AnswerResult, Config, TextChunk};
use crate::domain::ports::{ChatBackend, DocumentSource, EmbeddingBackend, GroundingValidator};
use crate::services::{
    AnswerSynthesizer, Chunker, EmbeddingProvider, Retriever, RetryPolicy, VectorStore,
};

/// Question-answering engine over a fixed document corpus
///
/// The `RagEngine` owns everything a question needs:
/// - The chunked corpus, kept for inspection
/// - The vector store, built once and shared read-only
/// - The answer synthesizer (retrieval, generation, grounding)
///
/// # Concurrency Design
///
/// The store sits behind an `Arc` and is never mutated after
/// [`RagEngine::initialize`] returns, so `ask_question` takes `&self` and any
/// number of questions may run at once against one engine.
///
/// # Examples
///
/// ```no_run
/// use docrag::adapters::{DirectoryDocumentSource, OllamaClient, OllamaClientConfig};
/// use docrag::application::RagEngine;
/// use docrag::domain::models::Config;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let client = Arc::new(OllamaClient::new(OllamaClientConfig::from(&config.backend))?);
/// let source = DirectoryDocumentSource::from_config(&config.corpus);
///
/// let engine = RagEngine::initialize(config, client.clone(), client, &source).await?;
/// let answer = engine.ask_question("How do I turn on the device?").await?;
/// println!("{}", answer.text);
/// # Ok(())
/// # }
/// ```
pub struct RagEngine {
    config: Config,
    chunks: Vec<TextChunk>,
    store: Arc<VectorStore>,
    synthesizer: AnswerSynthesizer,
}

impl RagEngine {
    /// Verify models, load and chunk the corpus, and build the vector store.
    ///
    /// # Errors
    /// Every error here is fatal to startup:
    /// * `RagError::Config` - invalid chunking configuration
    /// * `RagError::Provider` - the embedding backend could not be reached
    ///   after retries
    /// * `RagError::ModelUnavailable` - a configured model is not installed
    /// * `RagError::Document` - the corpus could not be loaded
    /// * `RagError::StoreInitialization` - nothing could be embedded
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub async fn initialize(
        config: Config,
        embedding_backend: Arc<dyn EmbeddingBackend>,
        chat_backend: Arc<dyn ChatBackend>,
        source: &dyn DocumentSource,
    ) -> RagResult<Self> {
        let started = Instant::now();
        let chunker = Chunker::with_config(config.chunking.clone())?;

        let retry = RetryPolicy::from_config(&config.retrieval);
        let provider = EmbeddingProvider::new(embedding_backend, config.models.embedding.clone());
        retry.execute("verify_embedding_model", || provider.verify()).await?;
        // Both models are served by the same backend
        retry
            .execute("verify_language_model", || {
                provider.verify_model(&config.models.language)
            })
            .await?;

        let documents = source.load().await?;
        let chunks = chunker.chunk_documents(&documents);
        if chunks.is_empty() {
            return Err(RagError::StoreInitialization(format!(
                "no chunks of at least {} characters in {} documents",
                config.chunking.min_chunk_size,
                documents.len()
            )));
        }

        let store = VectorStore::build(
            &provider,
            chunks.clone(),
            config.retrieval.build_concurrency,
            retry,
        )
        .await?;

        let retriever = Retriever::new(provider, config.retrieval.clone());
        let synthesizer = AnswerSynthesizer::new(
            retriever,
            chat_backend,
            config.models.language.clone(),
            config.generation.clone(),
        )?;

        info!(
            document_count = documents.len(),
            chunk_count = chunks.len(),
            entry_count = store.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "RAG engine ready"
        );

        Ok(Self {
            config,
            chunks,
            store: Arc::new(store),
            synthesizer,
        })
    }

    /// Replace the grounding check used for every subsequent question
    pub fn with_grounding_validator(mut self, validator: Arc<dyn GroundingValidator>) -> Self {
        self.synthesizer = self.synthesizer.with_validator(validator);
        self
    }

    /// Answer a question from the corpus.
    ///
    /// Backend failures never surface here; they end in the fallback answer.
    ///
    /// # Errors
    /// `RagError::InvalidQuery` when `query` is empty or whitespace
    pub async fn ask_question(&self, query: &str) -> RagResult<AnswerResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RagError::InvalidQuery("question cannot be empty".to_string()));
        }

        Ok(self.synthesizer.answer(&self.store, query).await)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Chunks produced from the corpus, including any that failed to embed
    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    pub fn store(&self) -> Arc<VectorStore> {
        Arc::clone(&self.store)
    }
}

impl std::fmt::Debug for RagEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagEngine")
            .field("chunk_count", &self.chunks.len())
            .field("entry_count", &self.store.len())
            .field("synthesizer", &self.synthesizer)
            .finish()
    }
}
