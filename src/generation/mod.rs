//! Text generation stages
//!
//! Each stage is one stateless request/response call against a
//! [`Generator`]. The role only selects the system message; no conversation
//! state survives a call.

pub mod client;
pub mod pipeline;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::Result;

pub use client::ChatCompletionClient;
pub use pipeline::TwoStagePipeline;

/// Role a generation call is made in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageRole {
    /// Turns retrieved evidence into findings
    Analyst,
    /// Turns findings into the final report
    Writer,
}

impl StageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageRole::Analyst => "analyst",
            StageRole::Writer => "writer",
        }
    }

    /// System message sent with every call in this role
    pub fn system_message(&self) -> &'static str {
        match self {
            StageRole::Analyst => prompts::ANALYST_SYSTEM_MESSAGE,
            StageRole::Writer => prompts::WRITER_SYSTEM_MESSAGE,
        }
    }
}

impl fmt::Display for StageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One single-shot generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub role: StageRole,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(role: StageRole, prompt: impl Into<String>) -> Self {
        Self {
            role,
            prompt: prompt.into(),
        }
    }
}

/// Generation service: one prompt in, one completion out
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
