//! In-memory fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use reportbuddy::generation::{GenerationRequest, Generator, StageRole};
use reportbuddy::store::{Metadata, RawHit, RawResults, SimilaritySearch};
use reportbuddy::{ReportError, Result};
use serde_json::{json, Value};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub query: String,
    pub n_results: usize,
    pub type_filter: Option<String>,
}

/// Vector store fake: filters on `type`, truncates to `n_results`, records calls
#[derive(Default)]
pub struct InMemoryStore {
    hits: Vec<RawHit>,
    unavailable: bool,
    calls: Mutex<Vec<SearchCall>>,
}

impl InMemoryStore {
    pub fn new(hits: Vec<RawHit>) -> Self {
        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SimilaritySearch for InMemoryStore {
    async fn search(&self, query: &str, n_results: usize, type_filter: Option<&str>) -> Result<RawResults> {
        self.calls.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            n_results,
            type_filter: type_filter.map(str::to_string),
        });

        if self.unavailable {
            return Err(ReportError::IndexUnavailable("collection not found".to_string()));
        }

        let hits = self
            .hits
            .iter()
            .filter(|hit| match type_filter {
                Some(t) => hit.metadata.get("type").and_then(Value::as_str) == Some(t),
                None => true,
            })
            .take(n_results)
            .cloned()
            .collect();
        Ok(RawResults::from_hits(hits))
    }
}

/// Generator fake: deterministic text per role, optional analyst failure, records calls
#[derive(Default)]
pub struct RecordingGenerator {
    fail_analyst: bool,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_analyst() -> Self {
        Self {
            fail_analyst: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_for(&self, role: StageRole) -> usize {
        self.requests().iter().filter(|r| r.role == role).count()
    }

    /// Text the analyst returns for a prompt
    pub fn findings_for(prompt: &str) -> String {
        let query = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Query: "))
            .unwrap_or("custom");
        format!("FINDINGS for {} ({} prompt chars)", query, prompt.len())
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());

        match request.role {
            StageRole::Analyst if self.fail_analyst => Err(ReportError::GenerationTimeout {
                stage: StageRole::Analyst,
                timeout_secs: 120,
            }),
            StageRole::Analyst => Ok(Self::findings_for(&request.prompt)),
            StageRole::Writer => Ok(format!("# Report\n\n{}", request.prompt)),
        }
    }
}

pub fn metadata(value: Value) -> Metadata {
    value.as_object().cloned().unwrap_or_default()
}

pub fn sales_hit(document: &str, product: &str, revenue: Value, distance: f64) -> RawHit {
    RawHit {
        document: document.to_string(),
        metadata: metadata(json!({
            "type": "sales",
            "product": product,
            "revenue": revenue,
            "region": "NA",
            "quarter": "Q3",
        })),
        distance,
    }
}

pub fn marketing_hit(document: &str, campaign: &str, distance: f64) -> RawHit {
    RawHit {
        document: document.to_string(),
        metadata: metadata(json!({
            "type": "marketing",
            "campaign_name": campaign,
            "channel": "Email",
            "budget": "10000",
            "conversions": "230",
        })),
        distance,
    }
}

pub fn sample_hits() -> Vec<RawHit> {
    vec![
        sales_hit("Q3 revenue up 12%", "Widget A", json!(500000), 0.09),
        marketing_hit("Email campaign generated strong engagement", "Spring Blast", 0.2),
        sales_hit("Gadget sales flat in EU", "Gadget B", json!("120000"), 0.35),
        marketing_hit("Social spend underperformed", "Launch", 0.5),
    ]
}
