//! Top-level report entry point
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::errors::Result;
use crate::generation::{ChatCompletionClient, Generator, TwoStagePipeline};
use crate::rag::{ReportCategory, RetrievalRouter};
use crate::reports::ReportKind;
use crate::store::{EmbeddingEngine, QdrantStore, SimilaritySearch};

/// Default number of records retrieved per report
pub const DEFAULT_RESULTS: usize = 8;

/// What to report on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub query: String,
    pub category: ReportCategory,
    pub n_results: usize,
}

impl ReportRequest {
    /// Combined category, default result budget
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: ReportCategory::default(),
            n_results: DEFAULT_RESULTS,
        }
    }

    pub fn with_category(mut self, category: ReportCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_results(mut self, n_results: usize) -> Self {
        self.n_results = n_results;
        self
    }
}

/// Retrieval followed by two-stage generation.
///
/// Holds no per-request state; one dispatcher can serve concurrent requests.
pub struct ReportDispatcher {
    router: RetrievalRouter<dyn SimilaritySearch>,
    pipeline: TwoStagePipeline<dyn Generator>,
}

impl ReportDispatcher {
    pub fn new(store: Arc<dyn SimilaritySearch>, generator: Arc<dyn Generator>) -> Self {
        Self {
            router: RetrievalRouter::new(store),
            pipeline: TwoStagePipeline::new(generator),
        }
    }

    /// Wire the Qdrant store, local embedder and chat completions client from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let embedder = Arc::new(EmbeddingEngine::new(&config.vector_store.embedding_model)?);
        let store = QdrantStore::connect(&config.vector_store, embedder)?;
        let generator = ChatCompletionClient::from_env(config.generation.clone())?;

        Ok(Self::new(Arc::new(store), Arc::new(generator)))
    }

    /// Generate a report for `query` over `category`, retrieving `n_results` records
    pub async fn generate_report(
        &self,
        query: &str,
        category: ReportCategory,
        n_results: usize,
    ) -> Result<String> {
        info!(%category, n_results, "Generating report");
        let context = self.router.retrieve_for(category, query, n_results).await?;
        self.pipeline.run(query, &context).await
    }

    pub async fn generate(&self, request: &ReportRequest) -> Result<String> {
        self.generate_report(&request.query, request.category, request.n_results)
            .await
    }

    pub async fn generate_kind(&self, kind: &ReportKind) -> Result<String> {
        info!(report = kind.key(), "Generating predefined report");
        self.generate(&kind.request()).await
    }

    /// Run a caller-built prompt through the analyst alone, skipping retrieval
    pub async fn generate_custom_report(&self, prompt: &str) -> Result<String> {
        self.pipeline.run_custom(prompt).await
    }
}
