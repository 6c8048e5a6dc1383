//! Similarity search over the sales/marketing vector collection
//!
//! The rest of the crate only sees the `SimilaritySearch` trait and the raw
//! batch it returns. `QdrantStore` is the production implementation; it
//! embeds query text locally with an `Embedder`.

pub mod embedding;
pub mod qdrant;
pub mod records;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::errors::Result;

pub use embedding::{Embedder, EmbeddingEngine};
pub use qdrant::{CollectionStats, QdrantStore};
pub use records::{load_records, MarketingRecord, SalesRecord, StoredDocument};

/// Opaque metadata attached to a stored document
pub type Metadata = serde_json::Map<String, JsonValue>;

/// Metadata field that discriminates sales from marketing records
pub const TYPE_FIELD: &str = "type";

/// One similarity-search match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    pub document: String,
    pub metadata: Metadata,
    /// Smaller is more similar
    pub distance: f64,
}

/// Column-oriented batch returned by one search call.
///
/// A list is `None` when the backing store did not return it at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawResults {
    pub documents: Option<Vec<String>>,
    pub metadatas: Option<Vec<Metadata>>,
    pub distances: Option<Vec<f64>>,
}

impl RawResults {
    /// Build a well-formed batch from row-oriented hits
    pub fn from_hits(hits: Vec<RawHit>) -> Self {
        let mut documents = Vec::with_capacity(hits.len());
        let mut metadatas = Vec::with_capacity(hits.len());
        let mut distances = Vec::with_capacity(hits.len());

        for hit in hits {
            documents.push(hit.document);
            metadatas.push(hit.metadata);
            distances.push(hit.distance);
        }

        Self {
            documents: Some(documents),
            metadatas: Some(metadatas),
            distances: Some(distances),
        }
    }

    /// Row view of the batch.
    ///
    /// Returns `None` if any list is missing. Lists of unequal length are
    /// zipped to the shortest one.
    pub fn hits(&self) -> Option<Vec<RawHit>> {
        let documents = self.documents.as_ref()?;
        let metadatas = self.metadatas.as_ref()?;
        let distances = self.distances.as_ref()?;

        Some(
            documents
                .iter()
                .zip(metadatas)
                .zip(distances)
                .map(|((document, metadata), distance)| RawHit {
                    document: document.clone(),
                    metadata: metadata.clone(),
                    distance: *distance,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.documents.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only query interface over a persistent vector collection
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Return at most `n_results` hits for `query`, most similar first.
    ///
    /// With `type_filter` set, only documents whose `type` metadata equals it
    /// are considered.
    async fn search(
        &self,
        query: &str,
        n_results: usize,
        type_filter: Option<&str>,
    ) -> Result<RawResults>;
}
