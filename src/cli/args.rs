//! Command-line argument parsing for ReportBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::rag::ReportCategory;
use crate::reports::ReportKind;

/// ReportBuddy - Retrieval-augmented sales and marketing reports
#[derive(Parser, Debug)]
#[command(name = "reportbuddy")]
#[command(version)]
#[command(about = "Generate sales and marketing reports from a vector index", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only warnings, errors and the report itself)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a report for a free-form query
    Report {
        /// What the report should answer
        query: String,

        /// Record category to retrieve from
        #[arg(long, default_value = "combined")]
        category: ReportCategory,

        /// Number of records to retrieve (defaults to retrieval.default_results)
        #[arg(long)]
        results: Option<usize>,

        /// Write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a prompt file through the analyst, skipping retrieval
    Custom {
        #[arg(long)]
        prompt_file: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sales performance report
    Sales {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        quarter: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Marketing campaign report
    Marketing {
        #[arg(long)]
        channel: Option<String>,
        #[arg(long)]
        quarter: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Quarterly summary report
    Quarterly {
        /// Quarter label, e.g. "Q3 2024"
        quarter: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Product analysis report
    Product {
        name: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Regional analysis report
    Regional {
        region: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available report types
    Types,

    /// Load sales and marketing records into the vector index
    Ingest {
        /// JSON array of sales records
        #[arg(long)]
        sales: PathBuf,

        /// JSON array of marketing records
        #[arg(long)]
        marketing: PathBuf,
    },

    /// Show vector index statistics
    Stats,

    /// Delete the vector collection so the data can be reloaded
    Clear,

    /// Generate and deliver the daily batch once
    Daily,

    /// Run the daily batch on schedule until Ctrl-C
    Schedule,

    /// Display current configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}

impl Commands {
    /// Predefined report for this command, if it is one
    pub fn report_kind(&self) -> Option<ReportKind> {
        match self {
            Commands::Sales { region, quarter, .. } => Some(ReportKind::SalesPerformance {
                region: region.clone(),
                quarter: quarter.clone(),
            }),
            Commands::Marketing { channel, quarter, .. } => Some(ReportKind::MarketingCampaign {
                channel: channel.clone(),
                quarter: quarter.clone(),
            }),
            Commands::Quarterly { quarter, .. } => Some(ReportKind::QuarterlySummary {
                quarter: quarter.clone(),
            }),
            Commands::Product { name, .. } => Some(ReportKind::ProductAnalysis {
                product: name.clone(),
            }),
            Commands::Regional { region, .. } => Some(ReportKind::RegionalAnalysis {
                region: region.clone(),
            }),
            _ => None,
        }
    }

    /// Whether this command reads the configuration file
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::Types)
    }

    /// Output path requested for a single-report command
    pub fn output(&self) -> Option<&PathBuf> {
        match self {
            Commands::Report { output, .. }
            | Commands::Custom { output, .. }
            | Commands::Sales { output, .. }
            | Commands::Marketing { output, .. }
            | Commands::Quarterly { output, .. }
            | Commands::Product { output, .. }
            | Commands::Regional { output, .. } => output.as_ref(),
            _ => None,
        }
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing directive when RUST_LOG is unset
    pub fn log_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "reportbuddy=warn",
            Verbosity::Normal => "reportbuddy=info",
            Verbosity::Verbose => "reportbuddy=debug",
            Verbosity::VeryVerbose => "reportbuddy=trace",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
