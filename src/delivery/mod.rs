//! Report delivery
//!
//! A daily batch produces three reports and hands them to every configured
//! `ReportSink`. Only the file sink ships here; mail or chat delivery plugs in
//! as further sink implementations.

pub mod batch;
pub mod file;
pub mod schedule;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;

pub use batch::DailyBatch;
pub use file::{save_report, FileSink};
pub use schedule::{next_run_after, run_scheduler};

/// One generated report, keyed by the stem used for its file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedReport {
    pub name: String,
    pub title: String,
    pub content: String,
}

/// Reports generated together for one day
#[derive(Debug, Clone)]
pub struct ReportBatch {
    pub date: NaiveDate,
    pub reports: Vec<NamedReport>,
}

impl ReportBatch {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            reports: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, title: impl Into<String>, content: String) {
        self.reports.push(NamedReport {
            name: name.into(),
            title: title.into(),
            content,
        });
    }

    /// `YYYYMMDD` stamp appended to file names
    pub fn stamp(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }
}

/// Destination for a finished batch
#[async_trait]
pub trait ReportSink: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, batch: &ReportBatch) -> Result<()>;
}
