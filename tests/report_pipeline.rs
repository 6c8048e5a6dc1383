//! End-to-end report generation against in-memory store and generator

mod common;

use common::{sales_hit, sample_hits, InMemoryStore, RecordingGenerator, SearchCall};
use reportbuddy::errors::ErrorKind;
use reportbuddy::generation::StageRole;
use reportbuddy::rag::{normalize, ContextComposer, Retrieval, NO_RESULTS};
use reportbuddy::reports::{ReportDispatcher, ReportKind};
use reportbuddy::store::RawResults;
use reportbuddy::ReportCategory;
use serde_json::json;
use std::sync::Arc;

fn dispatcher(store: Arc<InMemoryStore>, generator: Arc<RecordingGenerator>) -> ReportDispatcher {
    ReportDispatcher::new(store, generator)
}

#[test]
fn test_round_trip_hit_to_context() {
    let results = RawResults::from_hits(vec![sales_hit("Q3 revenue up 12%", "Widget A", json!(500000), 0.09)]);

    let retrieval = normalize(&results);
    let items = retrieval.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].rank, 1);
    assert!((items[0].relevance_score - 0.91).abs() < 1e-12);
    assert_eq!(items[0].record_type().as_str(), "sales");

    let context = ContextComposer::new().compose(&retrieval);
    assert!(context.contains("1. [SALES] (Relevance: 0.91)"));
    assert!(context.contains("   Q3 revenue up 12%"));
    assert!(context.contains("Product: Widget A, Revenue: $500000, Region: NA, Quarter: Q3"));
}

#[test]
fn test_empty_hits_compose_to_sentinel() {
    let retrieval = normalize(&RawResults::from_hits(Vec::new()));
    assert!(matches!(retrieval, Retrieval::NoData));
    assert_eq!(ContextComposer::new().compose(&retrieval), NO_RESULTS);
}

#[tokio::test]
async fn test_report_runs_both_stages_over_retrieved_context() {
    let store = Arc::new(InMemoryStore::new(sample_hits()));
    let generator = Arc::new(RecordingGenerator::new());
    let dispatcher = dispatcher(store.clone(), generator.clone());

    let report = dispatcher
        .generate_report("Top products in Q3", ReportCategory::Combined, 8)
        .await
        .unwrap();

    assert_eq!(
        store.calls(),
        vec![SearchCall {
            query: "Top products in Q3".to_string(),
            n_results: 8,
            type_filter: None,
        }]
    );

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].role, StageRole::Analyst);
    assert!(requests[0].prompt.contains("Retrieved relevant information:"));
    assert!(requests[0].prompt.contains("1. [SALES] (Relevance: 0.91)"));
    assert!(requests[0].prompt.contains("2. [MARKETING] (Relevance: 0.80)"));
    assert!(requests[0]
        .prompt
        .contains("Campaign: Spring Blast, Channel: Email, Budget: $10000, Conversions: 230"));

    let findings = RecordingGenerator::findings_for(&requests[0].prompt);
    assert_eq!(requests[1].role, StageRole::Writer);
    assert!(requests[1].prompt.contains(&findings));
    assert!(report.starts_with("# Report"));
    assert!(report.contains(&findings));
}

#[tokio::test]
async fn test_sales_category_filters_search() {
    let store = Arc::new(InMemoryStore::new(sample_hits()));
    let generator = Arc::new(RecordingGenerator::new());
    let dispatcher = dispatcher(store.clone(), generator.clone());

    dispatcher
        .generate_report("Regional revenue", ReportCategory::Sales, 5)
        .await
        .unwrap();

    let calls = store.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].n_results, 5);
    assert_eq!(calls[0].type_filter.as_deref(), Some("sales"));

    let analyst_prompt = &generator.requests()[0].prompt;
    assert!(analyst_prompt.contains("[SALES]"));
    assert!(!analyst_prompt.contains("[MARKETING]"));
}

#[tokio::test]
async fn test_no_matches_send_sentinel_to_analyst() {
    let store = Arc::new(InMemoryStore::new(Vec::new()));
    let generator = Arc::new(RecordingGenerator::new());
    let dispatcher = dispatcher(store, generator.clone());

    dispatcher
        .generate_report("Anything about Mars", ReportCategory::Marketing, 8)
        .await
        .unwrap();

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].prompt.contains(NO_RESULTS));
    assert!(!requests[0].prompt.contains("Retrieved relevant information:"));
}

#[tokio::test]
async fn test_analyst_failure_stops_before_writer() {
    let store = Arc::new(InMemoryStore::new(sample_hits()));
    let generator = Arc::new(RecordingGenerator::failing_analyst());
    let dispatcher = dispatcher(store, generator.clone());

    let err = dispatcher
        .generate_report("Top products", ReportCategory::Combined, 8)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::GenerationTimeout);
    assert!(err.is_generation_failure());
    assert_eq!(generator.calls_for(StageRole::Analyst), 1);
    assert_eq!(generator.calls_for(StageRole::Writer), 0);
}

#[tokio::test]
async fn test_unavailable_index_propagates_without_generation() {
    let store = Arc::new(InMemoryStore::unavailable());
    let generator = Arc::new(RecordingGenerator::new());
    let dispatcher = dispatcher(store, generator.clone());

    let err = dispatcher
        .generate_report("Top products", ReportCategory::Combined, 8)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IndexUnavailable);
    assert!(generator.requests().is_empty());
}

#[tokio::test]
async fn test_custom_report_bypasses_retrieval() {
    let store = Arc::new(InMemoryStore::new(sample_hits()));
    let generator = Arc::new(RecordingGenerator::new());
    let dispatcher = dispatcher(store.clone(), generator.clone());

    let output = dispatcher
        .generate_custom_report("Summarize: revenue 500000 in NA")
        .await
        .unwrap();

    assert!(store.calls().is_empty());
    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].role, StageRole::Analyst);
    assert_eq!(output, RecordingGenerator::findings_for("Summarize: revenue 500000 in NA"));
}

#[tokio::test]
async fn test_predefined_reports_route_by_kind() {
    let store = Arc::new(InMemoryStore::new(sample_hits()));
    let generator = Arc::new(RecordingGenerator::new());
    let dispatcher = dispatcher(store.clone(), generator);

    dispatcher
        .generate_kind(&ReportKind::MarketingCampaign {
            channel: Some("Email".to_string()),
            quarter: None,
        })
        .await
        .unwrap();
    dispatcher
        .generate_kind(&ReportKind::QuarterlySummary {
            quarter: "Q3 2024".to_string(),
        })
        .await
        .unwrap();

    let calls = store.calls();
    assert_eq!(calls[0].query, "Analyze marketing campaign performance for Email channel");
    assert_eq!(calls[0].type_filter.as_deref(), Some("marketing"));
    assert_eq!(calls[0].n_results, 8);
    assert_eq!(calls[1].type_filter, None);
    assert_eq!(calls[1].n_results, 10);
}

#[tokio::test]
async fn test_concurrent_reports_share_one_dispatcher() {
    let store = Arc::new(InMemoryStore::new(sample_hits()));
    let generator = Arc::new(RecordingGenerator::new());
    let dispatcher = dispatcher(store.clone(), generator.clone());

    let (a, b) = tokio::join!(
        dispatcher.generate_report("first", ReportCategory::Sales, 2),
        dispatcher.generate_report("second", ReportCategory::Marketing, 2),
    );

    assert!(a.unwrap().contains("FINDINGS for first"));
    assert!(b.unwrap().contains("FINDINGS for second"));
    assert_eq!(store.calls().len(), 2);
    assert_eq!(generator.requests().len(), 4);
}
