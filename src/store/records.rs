//! Source records loaded into the collection

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::Path;

use super::{Metadata, TYPE_FIELD};
use crate::errors::{ReportError, Result};

/// Record identifier as it appears in the source JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub id: RecordId,
    pub product: String,
    pub category: String,
    pub revenue: f64,
    pub units_sold: u64,
    pub region: String,
    pub quarter: String,
    pub customer_segment: String,
    pub sales_rep: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub id: RecordId,
    pub campaign_name: String,
    pub channel: String,
    pub budget: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub quarter: String,
    pub target_segment: String,
    pub description: String,
}

/// A record ready to be embedded and stored
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Source key, e.g. `sales_17`
    pub key: String,
    pub document: String,
    pub metadata: Metadata,
}

fn text(value: impl ToString) -> JsonValue {
    JsonValue::String(value.to_string())
}

impl SalesRecord {
    /// Numeric fields are stored as strings, matching how the collection is queried
    pub fn to_stored(&self) -> StoredDocument {
        let mut metadata = Metadata::new();
        metadata.insert(TYPE_FIELD.to_string(), text("sales"));
        metadata.insert("id".to_string(), text(&self.id));
        metadata.insert("product".to_string(), text(&self.product));
        metadata.insert("category".to_string(), text(&self.category));
        metadata.insert("revenue".to_string(), text(self.revenue));
        metadata.insert("units_sold".to_string(), text(self.units_sold));
        metadata.insert("region".to_string(), text(&self.region));
        metadata.insert("quarter".to_string(), text(&self.quarter));
        metadata.insert("customer_segment".to_string(), text(&self.customer_segment));
        metadata.insert("sales_rep".to_string(), text(&self.sales_rep));

        StoredDocument {
            key: format!("sales_{}", self.id),
            document: self.description.clone(),
            metadata,
        }
    }
}

impl MarketingRecord {
    pub fn to_stored(&self) -> StoredDocument {
        let mut metadata = Metadata::new();
        metadata.insert(TYPE_FIELD.to_string(), text("marketing"));
        metadata.insert("id".to_string(), text(&self.id));
        metadata.insert("campaign_name".to_string(), text(&self.campaign_name));
        metadata.insert("channel".to_string(), text(&self.channel));
        metadata.insert("budget".to_string(), text(self.budget));
        metadata.insert("impressions".to_string(), text(self.impressions));
        metadata.insert("clicks".to_string(), text(self.clicks));
        metadata.insert("conversions".to_string(), text(self.conversions));
        metadata.insert("quarter".to_string(), text(&self.quarter));
        metadata.insert("target_segment".to_string(), text(&self.target_segment));

        StoredDocument {
            key: format!("marketing_{}", self.id),
            document: self.description.clone(),
            metadata,
        }
    }
}

/// Read a JSON array of records from disk
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ReportError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&content)?)
}
