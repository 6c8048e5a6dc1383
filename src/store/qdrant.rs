//! Qdrant-backed similarity search
use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        condition::ConditionOneOf, r#match::MatchValue, value::Kind,
        vectors_config::Config as VectorsConfigKind, with_payload_selector::SelectorOptions,
        Condition, CreateCollection, Distance, FieldCondition, Filter, Match, PointStruct,
        SearchPoints, Value as QdrantValue, VectorParams, VectorsConfig, WithPayloadSelector,
    },
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::embedding::Embedder;
use super::records::StoredDocument;
use super::{Metadata, RawResults, SimilaritySearch, TYPE_FIELD};
use crate::config::VectorStoreConfig;
use crate::errors::{ReportError, Result};

/// Payload key holding the document text
const DOCUMENT_FIELD: &str = "document";

/// Point count and name of the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub collection_name: String,
    pub total_documents: u64,
}

/// Sales/marketing collection stored in Qdrant.
///
/// Read paths take `&self` and hold no locks, so one store can serve
/// concurrent report requests.
pub struct QdrantStore {
    client: QdrantClient,
    collection: String,
    embedder: Arc<dyn Embedder>,
}

impl QdrantStore {
    /// Connect to the configured Qdrant instance
    pub fn connect(config: &VectorStoreConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let client = QdrantClient::from_url(&config.url)
            .build()
            .map_err(|e| ReportError::IndexUnavailable(format!("{}: {}", config.url, e)))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            embedder,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    async fn collection_exists(&self) -> Result<bool> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| ReportError::IndexUnavailable(e.to_string()))?;

        Ok(collections
            .collections
            .iter()
            .any(|c| c.name == self.collection))
    }

    /// Create the collection (cosine distance) if it does not exist yet
    pub async fn ensure_collection(&self) -> Result<()> {
        if self.collection_exists().await? {
            debug!(collection = %self.collection, "Loaded existing collection");
            return Ok(());
        }

        self.client
            .create_collection(&CreateCollection {
                collection_name: self.collection.clone(),
                vectors_config: Some(VectorsConfig {
                    config: Some(VectorsConfigKind::Params(VectorParams {
                        size: self.embedder.dimension() as u64,
                        distance: Distance::Cosine.into(),
                        ..Default::default()
                    })),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| {
                ReportError::IndexUnavailable(format!(
                    "Failed to create collection {}: {}",
                    self.collection, e
                ))
            })?;

        info!(collection = %self.collection, "Created new collection");
        Ok(())
    }

    /// Embed and upsert documents, returning how many were stored
    pub async fn upsert(&self, documents: Vec<StoredDocument>) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.document.clone()).collect();
        let embedder = Arc::clone(&self.embedder);
        let embeddings = tokio::task::spawn_blocking(move || {
            let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
            embedder.embed_batch(&texts)
        })
        .await
        .map_err(|e| ReportError::EmbeddingError(format!("Embedding task failed: {}", e)))??;

        let points: Vec<PointStruct> = documents
            .iter()
            .zip(embeddings)
            .map(|(doc, embedding)| {
                let mut payload: HashMap<String, QdrantValue> = doc
                    .metadata
                    .iter()
                    .map(|(k, v)| (k.clone(), json_to_qdrant_value(v)))
                    .collect();
                payload.insert("key".to_string(), QdrantValue::from(doc.key.clone()));
                payload.insert(
                    DOCUMENT_FIELD.to_string(),
                    QdrantValue::from(doc.document.clone()),
                );
                PointStruct::new(point_id(&doc.key), embedding, payload)
            })
            .collect();

        let count = points.len();
        self.client
            .upsert_points_blocking(self.collection.clone(), None, points, None)
            .await
            .map_err(|e| ReportError::QueryError(format!("Failed to upsert points: {}", e)))?;

        info!(count, collection = %self.collection, "Loaded documents");
        Ok(count)
    }

    /// Drop the collection so the corpus can be reloaded. Missing collection is a no-op.
    pub async fn clear(&self) -> Result<bool> {
        if !self.collection_exists().await? {
            debug!(collection = %self.collection, "Nothing to clear");
            return Ok(false);
        }

        self.client
            .delete_collection(self.collection.clone())
            .await
            .map_err(|e| {
                ReportError::IndexUnavailable(format!(
                    "Failed to delete collection {}: {}",
                    self.collection, e
                ))
            })?;

        info!(collection = %self.collection, "Cleared collection");
        Ok(true)
    }

    /// Embed query text on the blocking pool; the BERT forward pass is CPU-bound
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let query = query.to_string();

        tokio::task::spawn_blocking(move || embedder.embed(&query))
            .await
            .map_err(|e| ReportError::IndexUnavailable(format!("Embedding task failed: {}", e)))?
            .map_err(|e| ReportError::IndexUnavailable(e.to_string()))
    }

    /// Collection statistics
    pub async fn stats(&self) -> Result<CollectionStats> {
        let info = self
            .client
            .collection_info(self.collection.clone())
            .await
            .map_err(|e| ReportError::IndexUnavailable(e.to_string()))?;

        Ok(CollectionStats {
            collection_name: self.collection.clone(),
            total_documents: info.result.and_then(|r| r.points_count).unwrap_or(0),
        })
    }
}

#[async_trait]
impl SimilaritySearch for QdrantStore {
    async fn search(
        &self,
        query: &str,
        n_results: usize,
        type_filter: Option<&str>,
    ) -> Result<RawResults> {
        if n_results == 0 {
            return Err(ReportError::QueryError(
                "n_results must be greater than 0".to_string(),
            ));
        }

        if !self.collection_exists().await? {
            return Err(ReportError::IndexUnavailable(format!(
                "Collection not found: {}",
                self.collection
            )));
        }

        if self.stats().await?.total_documents == 0 {
            return Err(ReportError::QueryError(format!(
                "Collection {} is empty",
                self.collection
            )));
        }

        let query_embedding = self.embed_query(query).await?;

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection.clone(),
                vector: query_embedding,
                limit: n_results as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                filter: type_filter.map(type_equals),
                ..Default::default()
            })
            .await
            .map_err(|e| ReportError::QueryError(format!("Failed to search points: {}", e)))?;

        debug!(
            hits = search_result.result.len(),
            filter = ?type_filter,
            "Similarity search complete"
        );

        let mut documents = Vec::with_capacity(search_result.result.len());
        let mut metadatas = Vec::with_capacity(search_result.result.len());
        let mut distances = Vec::with_capacity(search_result.result.len());

        for point in search_result.result {
            let (document, metadata) = split_payload(point.payload);
            documents.push(document);
            metadatas.push(metadata);
            distances.push(score_to_distance(point.score));
        }

        Ok(RawResults {
            documents: Some(documents),
            metadatas: Some(metadatas),
            distances: Some(distances),
        })
    }
}

/// Stable point id for a source key, so re-ingesting a record overwrites it
fn point_id(key: &str) -> String {
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

/// Cosine similarity to cosine distance
fn score_to_distance(score: f32) -> f64 {
    1.0 - f64::from(score)
}

/// Keyword equality match on the `type` payload field
fn type_equals(value: &str) -> Filter {
    Filter {
        must: vec![Condition {
            condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                key: TYPE_FIELD.to_string(),
                r#match: Some(Match {
                    match_value: Some(MatchValue::Keyword(value.to_string())),
                }),
                ..Default::default()
            })),
        }],
        ..Default::default()
    }
}

fn split_payload(payload: HashMap<String, QdrantValue>) -> (String, Metadata) {
    let mut document = String::new();
    let mut metadata = Metadata::new();

    for (key, value) in payload {
        if key == DOCUMENT_FIELD {
            if let Some(Kind::StringValue(s)) = value.kind {
                document = s;
            }
        } else if let Some(json) = qdrant_to_json_value(&value) {
            metadata.insert(key, json);
        }
    }

    (document, metadata)
}

fn json_to_qdrant_value(json: &JsonValue) -> QdrantValue {
    match json {
        JsonValue::String(s) => QdrantValue::from(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                QdrantValue::from(i)
            } else if let Some(f) = n.as_f64() {
                QdrantValue::from(f)
            } else {
                QdrantValue::from(0)
            }
        }
        JsonValue::Bool(b) => QdrantValue::from(*b),
        _ => QdrantValue::from(""),
    }
}

fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    value.kind.as_ref().and_then(|kind| match kind {
        Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
        Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
        Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
        Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
        _ => None,
    })
}
