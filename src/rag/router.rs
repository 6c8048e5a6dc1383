//! Report category to retrieval mapping
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::{ReportError, Result};
use crate::rag::context::ContextComposer;
use crate::rag::normalize::{normalize, Retrieval};
use crate::store::SimilaritySearch;

/// Report scope selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportCategory {
    Sales,
    Marketing,
    #[default]
    Combined,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 3] = [
        ReportCategory::Sales,
        ReportCategory::Marketing,
        ReportCategory::Combined,
    ];

    /// Metadata `type` value searched for this category; `None` searches everything
    pub fn type_filter(&self) -> Option<&'static str> {
        match self {
            ReportCategory::Sales => Some("sales"),
            ReportCategory::Marketing => Some("marketing"),
            ReportCategory::Combined => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCategory::Sales => "sales",
            ReportCategory::Marketing => "marketing",
            ReportCategory::Combined => "combined",
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportCategory {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sales" => Ok(ReportCategory::Sales),
            "marketing" => Ok(ReportCategory::Marketing),
            "combined" => Ok(ReportCategory::Combined),
            other => Err(ReportError::ConfigError(format!(
                "Unknown report category '{}' (expected sales, marketing or combined)",
                other
            ))),
        }
    }
}

/// Runs the retrieval that matches a report category
pub struct RetrievalRouter<S: ?Sized> {
    store: Arc<S>,
    composer: ContextComposer,
}

impl<S: SimilaritySearch + ?Sized> RetrievalRouter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            composer: ContextComposer::new(),
        }
    }

    /// Search and normalize, keeping the typed result
    pub async fn retrieve(
        &self,
        category: ReportCategory,
        query: &str,
        n_results: usize,
    ) -> Result<Retrieval> {
        debug!(%category, n_results, "Retrieving context");

        let results = self
            .store
            .search(query, n_results, category.type_filter())
            .await?;

        let retrieval = normalize(&results);
        match &retrieval {
            Retrieval::NoData => info!(%category, "No relevant records found"),
            Retrieval::Items(items) => info!(%category, hits = items.len(), "Retrieved context"),
        }

        Ok(retrieval)
    }

    /// Search, normalize and compose into the context string
    pub async fn retrieve_for(
        &self,
        category: ReportCategory,
        query: &str,
        n_results: usize,
    ) -> Result<String> {
        let retrieval = self.retrieve(category, query, n_results).await?;
        Ok(self.composer.compose(&retrieval))
    }
}
