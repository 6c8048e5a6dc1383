//! Raw hits to ranked, typed context items
//!
//! Rank follows the order the index returned (most similar first); items are
//! never re-sorted. Relevance is `1 - distance` and is not clamped, so a
//! distance above 1 yields a negative score.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use tracing::debug;

use crate::store::{Metadata, RawHit, RawResults, TYPE_FIELD};

/// Text used in place of a context when retrieval found nothing
pub const NO_RESULTS: &str = "No relevant information found.";

/// Record type discriminator as read from the `type` metadata field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    Sales,
    Marketing,
    /// Metadata has no `type` field
    Unknown,
    /// Any other `type` value, kept verbatim
    Other(String),
}

impl RecordType {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        match metadata.get(TYPE_FIELD).and_then(value_text) {
            None => RecordType::Unknown,
            Some(t) if t == "sales" => RecordType::Sales,
            Some(t) if t == "marketing" => RecordType::Marketing,
            Some(t) => RecordType::Other(t),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Sales => "sales",
            RecordType::Marketing => "marketing",
            RecordType::Unknown => "unknown",
            RecordType::Other(t) => t,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shown for a sales record; `None` when the metadata lacks them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesDetails {
    pub product: Option<String>,
    pub revenue: Option<String>,
    pub region: Option<String>,
    pub quarter: Option<String>,
}

/// Fields shown for a marketing record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketingDetails {
    pub campaign_name: Option<String>,
    pub channel: Option<String>,
    pub budget: Option<String>,
    pub conversions: Option<String>,
}

/// Typed view of a hit's metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Sales(SalesDetails),
    Marketing(MarketingDetails),
    Untyped(RecordType),
}

impl Record {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let field = |key: &str| metadata.get(key).and_then(value_text);

        match RecordType::from_metadata(metadata) {
            RecordType::Sales => Record::Sales(SalesDetails {
                product: field("product"),
                revenue: field("revenue"),
                region: field("region"),
                quarter: field("quarter"),
            }),
            RecordType::Marketing => Record::Marketing(MarketingDetails {
                campaign_name: field("campaign_name"),
                channel: field("channel"),
                budget: field("budget"),
                conversions: field("conversions"),
            }),
            other => Record::Untyped(other),
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            Record::Sales(_) => RecordType::Sales,
            Record::Marketing(_) => RecordType::Marketing,
            Record::Untyped(t) => t.clone(),
        }
    }
}

/// A hit after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    /// 1-based position in the result list
    pub rank: usize,
    pub relevance_score: f64,
    pub record: Record,
    pub content: String,
    pub metadata: Metadata,
}

impl ContextItem {
    pub fn from_hit(rank: usize, hit: RawHit) -> Self {
        Self {
            rank,
            relevance_score: 1.0 - hit.distance,
            record: Record::from_metadata(&hit.metadata),
            content: hit.document,
            metadata: hit.metadata,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record.record_type()
    }
}

/// Outcome of normalizing one search batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Retrieval {
    Items(Vec<ContextItem>),
    /// Nothing usable came back; rendered as [`NO_RESULTS`]
    NoData,
}

impl Retrieval {
    pub fn items(&self) -> &[ContextItem] {
        match self {
            Retrieval::Items(items) => items,
            Retrieval::NoData => &[],
        }
    }
}

/// Normalize a column-oriented search batch.
///
/// A batch missing any of its lists, or with no documents, is `NoData`.
pub fn normalize(results: &RawResults) -> Retrieval {
    match results.hits() {
        Some(hits) => normalize_hits(hits),
        None => {
            debug!("Search batch is missing result lists");
            Retrieval::NoData
        }
    }
}

/// Normalize row-oriented hits, preserving their order as rank order
pub fn normalize_hits(hits: Vec<RawHit>) -> Retrieval {
    if hits.is_empty() {
        return Retrieval::NoData;
    }

    Retrieval::Items(
        hits.into_iter()
            .enumerate()
            .map(|(i, hit)| ContextItem::from_hit(i + 1, hit))
            .collect(),
    )
}

/// Display text of a metadata value; JSON null counts as absent
fn value_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
