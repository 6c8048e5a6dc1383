// Two-stage generation: analyst findings feed the writer's report
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::{ReportError, Result};
use crate::generation::prompts::{analysis_prompt, report_prompt};
use crate::generation::{GenerationRequest, Generator, StageRole};

/// Analyst-then-writer pipeline.
///
/// Exactly one call per stage. The writer call is only issued once the
/// analyst call has returned its complete, non-empty output; any stage
/// failure aborts the run with that stage's error. The writer's text is
/// returned as-is.
pub struct TwoStagePipeline<G: ?Sized> {
    generator: Arc<G>,
}

impl<G: Generator + ?Sized> TwoStagePipeline<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }

    /// Produce the final report for `query` from the composed context
    pub async fn run(&self, query: &str, context: &str) -> Result<String> {
        info!(stage = %StageRole::Analyst, "Analyzing retrieved data");
        let findings = self
            .call(StageRole::Analyst, analysis_prompt(query, context))
            .await?;
        if findings.trim().is_empty() {
            error!(stage = %StageRole::Analyst, "Analyst returned empty findings");
            return Err(ReportError::GenerationServiceError {
                stage: StageRole::Analyst,
                message: "Empty completion".to_string(),
            });
        }

        info!(stage = %StageRole::Writer, findings_chars = findings.len(), "Writing report");
        let report = self
            .call(StageRole::Writer, report_prompt(query, &findings))
            .await?;

        info!(report_chars = report.len(), "Report generation complete");
        Ok(report)
    }

    /// Single analyst call on a caller-assembled prompt; no retrieval, no writer stage
    pub async fn run_custom(&self, prompt: &str) -> Result<String> {
        info!(stage = %StageRole::Analyst, "Running custom prompt");
        self.call(StageRole::Analyst, prompt.to_string()).await
    }

    async fn call(&self, role: StageRole, prompt: String) -> Result<String> {
        let output = self
            .generator
            .generate(GenerationRequest::new(role, prompt))
            .await
            .map_err(|e| {
                error!(stage = %role, error = %e, "Generation stage failed");
                e
            })?;

        Ok(output)
    }
}
