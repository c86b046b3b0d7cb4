use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies the pipeline and time window to collect steps for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInfoRequest {
    pub organization_id: String,
    pub pipeline_id: String,
    pub pipeline_name: String,
    pub repository: String,
    pub organization_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Canonical step inventory of a pipeline, handed to the metrics engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInfo {
    pub pipeline_id: String,
    pub pipeline_name: String,
    /// Unique, non-empty job names in collation order
    pub steps: Vec<String>,
    pub repository: String,
    pub org_id: String,
    pub org_name: String,
}

impl PipelineInfo {
    pub fn assemble(request: &PipelineInfoRequest, steps: Vec<String>) -> Self {
        Self {
            pipeline_id: request.pipeline_id.clone(),
            pipeline_name: request.pipeline_name.clone(),
            steps,
            repository: request.repository.clone(),
            org_id: request.organization_id.clone(),
            org_name: request.organization_name.clone(),
        }
    }
}
