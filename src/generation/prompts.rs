//! Prompt templates for the analyst and writer stages

pub const ANALYST_SYSTEM_MESSAGE: &str = "You are a Senior Data Analyst specializing in sales and marketing analytics.

Your responsibilities:
1. Analyze sales and marketing data provided to you
2. Identify trends, patterns, and anomalies
3. Calculate key metrics and KPIs
4. Provide data-driven insights
5. Be precise and analytical in your findings

You receive context from a retrieval system containing real sales and marketing data.
Base all your analysis on this retrieved context.";

pub const WRITER_SYSTEM_MESSAGE: &str = "You are a Professional Report Writer specialized in business reporting.

Your responsibilities:
1. Take analytical findings and create comprehensive reports
2. Structure reports with clear sections (Executive Summary, Key Findings, etc.)
3. Write in a professional, clear, and engaging manner
4. Provide actionable recommendations
5. Format reports properly with bullet points and sections

Create reports that executives can easily understand and act upon.";

/// Stage 1 prompt: query plus composed evidence
pub fn analysis_prompt(query: &str, context: &str) -> String {
    format!(
        "Based on the following data retrieved from our database, please analyze and identify key insights:

Query: {query}

{context}

Please provide:
1. Key metrics and numbers
2. Notable trends
3. Top performers
4. Areas of concern
5. Data-driven insights"
    )
}

/// Stage 2 prompt: query plus the analyst's full findings
pub fn report_prompt(query: &str, findings: &str) -> String {
    format!(
        "Based on the data analyst's findings, create a comprehensive professional report.

Original Query: {query}

Data Analyst's Findings:
{findings}

Create a detailed report with these sections:
1. Executive Summary
2. Key Findings
3. Detailed Analysis
4. Insights and Trends
5. Recommendations

Make it professional, clear, and actionable."
    )
}
