//! ReportBuddy - Retrieval-augmented business reports
//!
//! Turns a natural-language question about sales and marketing data into a
//! structured report.
//!
//! # Architecture
//!
//! - **store**: similarity search over the Qdrant collection
//! - **rag**: result normalisation, context composition, category routing
//! - **generation**: analyst then writer calls against a chat completions API
//! - **reports**: the dispatcher and predefined report catalog
//! - **delivery**: daily batch, file sink and scheduler

pub mod errors;
pub mod config;

pub mod store;
pub mod rag;
pub mod generation;
pub mod reports;
pub mod delivery;

pub mod cli;

// Re-export commonly used types
pub use errors::{ReportError, Result};
pub use rag::ReportCategory;
pub use reports::{ReportDispatcher, ReportRequest};
