// Daily batch: three reports generated concurrently, then fanned out to sinks
use chrono::{Local, NaiveDate};
use futures_util::future::try_join3;
use std::sync::Arc;
use tracing::{error, info};

use crate::delivery::{ReportBatch, ReportSink};
use crate::errors::Result;
use crate::reports::{ReportDispatcher, ReportKind};

pub const SALES_REPORT: &str = "daily_sales_report";
pub const MARKETING_REPORT: &str = "daily_marketing_report";
pub const EXECUTIVE_SUMMARY: &str = "daily_executive_summary";

pub struct DailyBatch {
    dispatcher: Arc<ReportDispatcher>,
    summary_quarter: String,
    sinks: Vec<Box<dyn ReportSink>>,
}

impl DailyBatch {
    pub fn new(dispatcher: Arc<ReportDispatcher>, summary_quarter: impl Into<String>) -> Self {
        Self {
            dispatcher,
            summary_quarter: summary_quarter.into(),
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Generate the three daily reports. Any generation failure fails the batch.
    pub async fn generate(&self, date: NaiveDate) -> Result<ReportBatch> {
        let sales = ReportKind::SalesPerformance {
            region: None,
            quarter: None,
        };
        let marketing = ReportKind::MarketingCampaign {
            channel: None,
            quarter: None,
        };
        let summary = ReportKind::QuarterlySummary {
            quarter: self.summary_quarter.clone(),
        };

        let (sales, marketing, summary) = try_join3(
            self.dispatcher.generate_kind(&sales),
            self.dispatcher.generate_kind(&marketing),
            self.dispatcher.generate_kind(&summary),
        )
        .await?;

        let mut batch = ReportBatch::new(date);
        batch.push(SALES_REPORT, "Sales Performance Report", sales);
        batch.push(MARKETING_REPORT, "Marketing Campaign Report", marketing);
        batch.push(EXECUTIVE_SUMMARY, "Executive Summary", summary);
        Ok(batch)
    }

    /// Hand a batch to every sink; returns how many accepted it
    pub async fn deliver(&self, batch: &ReportBatch) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.deliver(batch).await {
                Ok(()) => {
                    info!(sink = sink.name(), reports = batch.reports.len(), "Batch delivered");
                    delivered += 1;
                }
                Err(e) => error!(sink = sink.name(), error = %e, "Batch delivery failed"),
            }
        }
        delivered
    }

    /// Generate today's batch and deliver it
    pub async fn run(&self) -> Result<ReportBatch> {
        let date = Local::now().date_naive();
        info!(%date, "Generating daily reports");
        let batch = self.generate(date).await?;
        self.deliver(&batch).await;
        Ok(batch)
    }
}
