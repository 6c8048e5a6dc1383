//! Context composer: ranked items to the evidence text handed to generation
use crate::rag::normalize::{ContextItem, MarketingDetails, Record, Retrieval, SalesDetails, NO_RESULTS};

/// First line of every composed context
pub const CONTEXT_HEADER: &str = "Retrieved relevant information:\n";

/// Marker for a metadata field the record does not carry
pub const MISSING_FIELD: &str = "unknown";

/// Renders a [`Retrieval`] as free text.
///
/// Output shape, per item:
///
/// ```text
/// 1. [SALES] (Relevance: 0.91)
///    Q3 revenue up 12%
///    Product: Widget A, Revenue: $500000, Region: NA, Quarter: Q3
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextComposer;

impl ContextComposer {
    pub fn new() -> Self {
        Self
    }

    /// Compose the context string. `NoData` renders as [`NO_RESULTS`] alone.
    pub fn compose(&self, retrieval: &Retrieval) -> String {
        match retrieval {
            Retrieval::NoData => NO_RESULTS.to_string(),
            Retrieval::Items(items) if items.is_empty() => NO_RESULTS.to_string(),
            Retrieval::Items(items) => {
                let mut parts = vec![CONTEXT_HEADER.to_string()];
                for item in items {
                    self.push_item(&mut parts, item);
                }
                parts.join("\n")
            }
        }
    }

    fn push_item(&self, parts: &mut Vec<String>, item: &ContextItem) {
        parts.push(format!(
            "\n{}. [{}] (Relevance: {:.2})",
            item.rank,
            item.record_type().as_str().to_uppercase(),
            item.relevance_score
        ));
        parts.push(format!("   {}", item.content));

        match &item.record {
            Record::Sales(details) => parts.push(sales_line(details)),
            Record::Marketing(details) => parts.push(marketing_line(details)),
            Record::Untyped(_) => {}
        }
    }
}

fn or_missing(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(MISSING_FIELD)
}

fn sales_line(details: &SalesDetails) -> String {
    format!(
        "   Product: {}, Revenue: ${}, Region: {}, Quarter: {}",
        or_missing(&details.product),
        or_missing(&details.revenue),
        or_missing(&details.region),
        or_missing(&details.quarter)
    )
}

fn marketing_line(details: &MarketingDetails) -> String {
    format!(
        "   Campaign: {}, Channel: {}, Budget: ${}, Conversions: {}",
        or_missing(&details.campaign_name),
        or_missing(&details.channel),
        or_missing(&details.budget),
        or_missing(&details.conversions)
    )
}
