//! Report requests and the dispatcher that serves them

pub mod catalog;
pub mod dispatcher;

pub use catalog::{available_report_types, ReportKind};
pub use dispatcher::{ReportDispatcher, ReportRequest, DEFAULT_RESULTS};
