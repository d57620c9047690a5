//! Session context: one document, one index, one conversation

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::agent::{AgentAnswer, AgentMode, AnsweringAgent, ConversationMemory};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::evaluation::EvaluationRun;
use crate::domain::index::IndexHandle;
use crate::domain::ingestion::{ChunkingStrategy, DocumentInput, DocumentKind};
use crate::domain::llm::LlmProvider;
use crate::domain::retrieval::ContextRetriever;
use crate::domain::DomainError;
use crate::infrastructure::agent::{DirectAgent, ReactAgent};
use crate::infrastructure::embedding::OpenAiEmbeddingProvider;
use crate::infrastructure::ingestion::{LoaderFactory, RecursiveChunker};
use crate::infrastructure::judge::LlmJudge;
use crate::infrastructure::llm::{HttpClient, OpenAiProvider};
use crate::infrastructure::services::{
    EvaluationService, IndexedRetriever, IndexingService, RetrievalService,
};

/// What an ingestion produced
#[derive(Debug, Clone, Serialize)]
pub struct IngestionSummary {
    pub source_id: String,
    pub kind: DocumentKind,
    pub characters: usize,
    pub chunks: usize,
    pub dimensions: Option<usize>,
}

/// Everything needed to answer and evaluate questions about one document.
///
/// Sessions share nothing, so several can live in one process.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    config: AppConfig,
    chunker: RecursiveChunker,
    indexer: IndexingService,
    handle: Arc<IndexHandle>,
    retriever: Arc<IndexedRetriever>,
    agent: Arc<dyn AnsweringAgent>,
    evaluator: EvaluationService,
}

impl Session {
    /// Build a session on explicit providers; the judge shares the chat provider
    pub fn new(
        config: AppConfig,
        llm: Arc<dyn LlmProvider>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let timeout = config.provider.timeout();
        let handle = Arc::new(IndexHandle::new(
            &config.embedding.model,
            config.embedding.metric,
        ));

        let indexer = IndexingService::new(embeddings.clone(), &config.embedding, timeout);
        let retrieval = Arc::new(RetrievalService::new(
            embeddings,
            &config.embedding.model,
            timeout,
        ));
        let retriever = Arc::new(IndexedRetriever::new(
            retrieval,
            handle.clone(),
            config.retrieval.top_k,
        ));

        let agent: Arc<dyn AnsweringAgent> = match config.agent.mode {
            AgentMode::React => Arc::new(ReactAgent::new(
                llm.clone(),
                retriever.clone(),
                config.agent.clone(),
                timeout,
            )),
            AgentMode::Direct => Arc::new(DirectAgent::new(
                llm.clone(),
                retriever.clone(),
                config.agent.clone(),
                timeout,
            )),
        };

        let judge = LlmJudge::new(llm, config.judge.clone(), timeout);

        let session = Self {
            id: Uuid::new_v4(),
            config,
            chunker: RecursiveChunker::new(),
            indexer,
            handle,
            retriever,
            agent,
            evaluator: EvaluationService::new(Arc::new(judge)),
        };

        info!(
            session = %session.id,
            agent = session.agent.name(),
            metric = session.handle.metric().as_str(),
            "Session created"
        );

        Ok(session)
    }

    /// Build a session talking to the configured OpenAI-compatible endpoint
    pub fn from_config(config: AppConfig) -> Result<Self, DomainError> {
        let api_key = config.provider.resolved_api_key()?;
        let client = HttpClient::with_timeout(config.provider.timeout())?;

        let llm = Arc::new(OpenAiProvider::with_base_url(
            client.clone(),
            api_key.as_str(),
            &config.provider.base_url,
        ));
        let embeddings = Arc::new(OpenAiEmbeddingProvider::with_base_url(
            client,
            api_key.as_str(),
            &config.provider.base_url,
        ));

        Self::new(config, llm, embeddings)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load, chunk and index a document, replacing any previous one.
    ///
    /// On failure the previously indexed document stays searchable.
    #[instrument(skip(self, input), fields(session = %self.id))]
    pub async fn ingest(&self, input: DocumentInput) -> Result<IngestionSummary, DomainError> {
        let loader = LoaderFactory::for_input(&input)?;
        let document = loader.load(&input).await?;

        let chunks = self
            .chunker
            .split(&document.source_id, &document.text, &self.config.chunking)?;
        let chunk_count = chunks.len();

        let index = self.indexer.rebuild(&self.handle, chunks).await?;

        let summary = IngestionSummary {
            source_id: document.source_id,
            kind: document.kind,
            characters: document.text.chars().count(),
            chunks: chunk_count,
            dimensions: index.dimensions(),
        };

        info!(
            source = %summary.source_id,
            chunks = summary.chunks,
            chunker = self.chunker.name(),
            "Document ingested"
        );

        Ok(summary)
    }

    pub async fn ingest_text(
        &self,
        text: impl Into<String>,
    ) -> Result<IngestionSummary, DomainError> {
        self.ingest(DocumentInput::from_text(text)).await
    }

    /// Answer a question; the turn is added to the conversation memory
    pub async fn ask(&self, question: &str) -> Result<AgentAnswer, DomainError> {
        self.agent.answer(question).await
    }

    /// Context the retriever returns for `query`
    pub async fn retrieve_context(&self, query: &str) -> Result<String, DomainError> {
        self.retriever.retrieve(query).await
    }

    /// Answer and score a question
    pub async fn evaluate(&self, question: &str) -> Result<EvaluationRun, DomainError> {
        self.evaluator
            .evaluate_with_details(question, self.agent.as_ref(), self.retriever.as_ref())
            .await
    }

    pub async fn memory(&self) -> ConversationMemory {
        self.agent.memory().await
    }
}
