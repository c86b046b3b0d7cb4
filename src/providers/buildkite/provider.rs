use log::{info, warn};

use crate::auth::Token;
use crate::error::{BuildLensError, Result};
use crate::output::PhaseProgress;
use crate::pipeline_info::{PipelineInfo, PipelineInfoRequest};

use super::client::{BuildkiteClient, ClientSettings};
use super::collector::collect_build_records;
use super::query::FetchWindow;
use super::steps::normalize_steps;
use super::types::{deserialize_builds, Build};

/// Buildkite pipeline step provider.
///
/// Collects every build of a pipeline within a time window from the Buildkite
/// REST API and reduces their jobs to the canonical list of pipeline steps.
pub struct BuildkiteProvider {
    pub client: BuildkiteClient,
    pub page_size: u32,
}

impl BuildkiteProvider {
    /// Creates a new Buildkite provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - REST API base URL (e.g., <https://api.buildkite.com/v2/>)
    /// * `token` - API access token with `read_builds` scope
    /// * `settings` - Concurrency, retry and timeout behavior
    /// * `page_size` - Builds requested per page
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or a setting is out of range.
    pub fn new(
        base_url: &str,
        token: Token,
        settings: ClientSettings,
        page_size: u32,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(BuildLensError::Config(
                "page size must be at least 1".to_string(),
            ));
        }

        let client = BuildkiteClient::new(base_url, token, settings)?;

        Ok(Self { client, page_size })
    }

    /// Fetches and types every build created within the request's window.
    ///
    /// # Errors
    ///
    /// Fails if any page cannot be fetched or any record is not a valid build.
    pub async fn fetch_builds(&self, request: &PipelineInfoRequest) -> Result<Vec<Build>> {
        let builds_url = self
            .client
            .builds_url(&request.organization_id, &request.pipeline_id)?;
        let window = FetchWindow::new(request.start_time, request.end_time, self.page_size);

        let records = collect_build_records(&self.client, &builds_url, &window).await?;
        let builds = deserialize_builds(records)?;

        info!("Fetched {} builds", builds.len());

        Ok(builds)
    }

    /// Collects the pipeline step inventory for the requested pipeline and window.
    ///
    /// Progress is displayed in two phases:
    /// 1. Fetching builds (all pages)
    /// 2. Normalizing job names into steps
    ///
    /// # Returns
    ///
    /// `PipelineInfo` with the request's identity fields and the deduplicated,
    /// collation-sorted step names. An empty step list is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any page request fails (after retries for retryable failures)
    /// - Any build record is missing its `id` or is malformed
    pub async fn fetch_pipeline_info(&self, request: &PipelineInfoRequest) -> Result<PipelineInfo> {
        info!(
            "Collecting steps for pipeline {}/{}",
            request.organization_id, request.pipeline_id
        );

        let progress = PhaseProgress::start_phase_1();

        let builds = self.fetch_builds(request).await?;

        let progress = progress.finish_phase_1_start_phase_2(builds.len());

        let steps = normalize_steps(&builds)?;

        if steps.is_empty() {
            warn!(
                "No named jobs found for pipeline {}/{} in the requested window",
                request.organization_id, request.pipeline_id
            );
        }

        progress.finish_phase_2(steps.len());

        Ok(PipelineInfo::assemble(request, steps))
    }
}
