//! Predefined report requests
use serde::{Deserialize, Serialize};

use crate::rag::ReportCategory;
use crate::reports::ReportRequest;

/// Result budget for most predefined reports
const STANDARD_RESULTS: usize = 8;

/// Quarterly summaries look at more records
const SUMMARY_RESULTS: usize = 10;

/// A named report with its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportKind {
    SalesPerformance {
        region: Option<String>,
        quarter: Option<String>,
    },
    MarketingCampaign {
        channel: Option<String>,
        quarter: Option<String>,
    },
    QuarterlySummary {
        quarter: String,
    },
    ProductAnalysis {
        product: String,
    },
    RegionalAnalysis {
        region: String,
    },
    Custom {
        query: String,
    },
}

impl ReportKind {
    pub fn key(&self) -> &'static str {
        match self {
            ReportKind::SalesPerformance { .. } => "sales_performance",
            ReportKind::MarketingCampaign { .. } => "marketing_campaign",
            ReportKind::QuarterlySummary { .. } => "quarterly_summary",
            ReportKind::ProductAnalysis { .. } => "product_analysis",
            ReportKind::RegionalAnalysis { .. } => "regional_analysis",
            ReportKind::Custom { .. } => "custom",
        }
    }

    /// Build the query text for this report
    pub fn query(&self) -> String {
        match self {
            ReportKind::SalesPerformance { region, quarter } => {
                let mut parts = vec!["Analyze sales performance".to_string()];
                if let Some(region) = region {
                    parts.push(format!("in {}", region));
                }
                if let Some(quarter) = quarter {
                    parts.push(format!("for {}", quarter));
                }
                parts.join(" ")
            }
            ReportKind::MarketingCampaign { channel, quarter } => {
                let mut parts = vec!["Analyze marketing campaign performance".to_string()];
                if let Some(channel) = channel {
                    parts.push(format!("for {} channel", channel));
                }
                if let Some(quarter) = quarter {
                    parts.push(format!("in {}", quarter));
                }
                parts.join(" ")
            }
            ReportKind::QuarterlySummary { quarter } => format!(
                "Provide a comprehensive summary of sales and marketing performance for {}",
                quarter
            ),
            ReportKind::ProductAnalysis { product } => {
                format!("Analyze the performance and marketing of {}", product)
            }
            ReportKind::RegionalAnalysis { region } => {
                format!("Analyze sales and marketing performance in {}", region)
            }
            ReportKind::Custom { query } => query.clone(),
        }
    }

    pub fn category(&self) -> ReportCategory {
        match self {
            ReportKind::SalesPerformance { .. } => ReportCategory::Sales,
            ReportKind::MarketingCampaign { .. } => ReportCategory::Marketing,
            _ => ReportCategory::Combined,
        }
    }

    pub fn n_results(&self) -> usize {
        match self {
            ReportKind::QuarterlySummary { .. } => SUMMARY_RESULTS,
            _ => STANDARD_RESULTS,
        }
    }

    pub fn request(&self) -> ReportRequest {
        ReportRequest {
            query: self.query(),
            category: self.category(),
            n_results: self.n_results(),
        }
    }
}

/// Report types offered to callers, as (key, description)
pub fn available_report_types() -> Vec<(&'static str, &'static str)> {
    vec![
        ("sales_performance", "Sales performance analysis by region/quarter"),
        ("marketing_campaign", "Marketing campaign performance analysis"),
        ("quarterly_summary", "Comprehensive quarterly summary"),
        ("product_analysis", "Product-specific performance analysis"),
        ("regional_analysis", "Regional sales and marketing analysis"),
        ("custom", "Custom analysis based on your query"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_performance_query() {
        let kind = ReportKind::SalesPerformance {
            region: Some("North America".to_string()),
            quarter: Some("Q1 2024".to_string()),
        };
        let request = kind.request();
        assert_eq!(request.query, "Analyze sales performance in North America for Q1 2024");
        assert_eq!(request.category, ReportCategory::Sales);
        assert_eq!(request.n_results, 8);

        let bare = ReportKind::SalesPerformance {
            region: None,
            quarter: None,
        };
        assert_eq!(bare.query(), "Analyze sales performance");
    }

    #[test]
    fn test_marketing_campaign_query() {
        let kind = ReportKind::MarketingCampaign {
            channel: Some("Email".to_string()),
            quarter: Some("Q2".to_string()),
        };
        assert_eq!(kind.query(), "Analyze marketing campaign performance for Email channel in Q2");
        assert_eq!(kind.category(), ReportCategory::Marketing);
    }

    #[test]
    fn test_quarterly_summary_uses_larger_budget() {
        let kind = ReportKind::QuarterlySummary {
            quarter: "Q3 2024".to_string(),
        };
        let request = kind.request();
        assert_eq!(request.n_results, 10);
        assert_eq!(request.category, ReportCategory::Combined);
        assert!(request.query.ends_with("for Q3 2024"));
    }

    #[test]
    fn test_custom_query_is_verbatim() {
        let kind = ReportKind::Custom {
            query: "Which channel converts best?".to_string(),
        };
        assert_eq!(kind.query(), "Which channel converts best?");
        assert_eq!(kind.key(), "custom");
    }

    #[test]
    fn test_available_types_match_kinds() {
        let keys: Vec<&str> = available_report_types().iter().map(|(k, _)| *k).collect();
        let kinds = [
            ReportKind::SalesPerformance { region: None, quarter: None },
            ReportKind::MarketingCampaign { channel: None, quarter: None },
            ReportKind::QuarterlySummary { quarter: String::new() },
            ReportKind::ProductAnalysis { product: String::new() },
            ReportKind::RegionalAnalysis { region: String::new() },
            ReportKind::Custom { query: String::new() },
        ];
        assert_eq!(keys, kinds.iter().map(|k| k.key()).collect::<Vec<_>>());
    }
}
