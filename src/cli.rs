use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::{Config, OutputFormat};
use crate::output;
use crate::pipeline_info::{PipelineInfo, PipelineInfoRequest};
use crate::providers::buildkite::BuildkiteProvider;

#[derive(Parser)]
#[command(name = "buildlens")]
#[command(author, version, about = "Buildkite Pipeline Step Inventory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./buildlens.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write JSON output to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the step inventory of a Buildkite pipeline
    Buildkite {
        #[arg(short, long, env = "BUILDKITE_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// REST API base URL (overrides config)
        #[arg(short, long)]
        url: Option<String>,

        /// Organization slug
        #[arg(long)]
        org_id: String,

        #[arg(long)]
        org_name: Option<String>,

        /// Pipeline slug
        #[arg(short = 'P', long)]
        pipeline_id: String,

        #[arg(long)]
        pipeline_name: Option<String>,

        #[arg(short, long, default_value = "")]
        repository: String,

        /// Earliest build creation time (RFC 3339)
        #[arg(long)]
        since: DateTime<Utc>,

        /// Latest build creation time (RFC 3339)
        #[arg(long)]
        until: DateTime<Utc>,

        #[arg(long)]
        page_size: Option<u32>,

        #[arg(long)]
        max_concurrent_requests: Option<usize>,
    },
}

impl Cli {
    async fn execute_buildkite(
        &self,
        config: Config,
        token: Option<&str>,
        url: Option<&str>,
        request: PipelineInfoRequest,
        page_size: Option<u32>,
        max_concurrent_requests: Option<usize>,
    ) -> Result<()> {
        if request.start_time > request.end_time {
            bail!(
                "--since ({}) must not be later than --until ({})",
                request.start_time,
                request.end_time
            );
        }

        let mut buildkite = config.buildkite;
        if let Some(url) = url {
            buildkite.base_url = url.to_owned();
        }
        if let Some(page_size) = page_size {
            buildkite.page_size = page_size;
        }
        if let Some(max_concurrent_requests) = max_concurrent_requests {
            buildkite.max_concurrent_requests = max_concurrent_requests;
        }

        let token = token
            .map(Token::from)
            .or_else(|| buildkite.token.as_deref().map(Token::from))
            .context("A Buildkite API token is required (--token, BUILDKITE_TOKEN or config file)")?;

        info!(
            "Collecting Buildkite steps for pipeline: {}/{}",
            request.organization_id, request.pipeline_id
        );

        let provider = BuildkiteProvider::new(
            &buildkite.base_url,
            token,
            buildkite.client_settings(),
            buildkite.page_size,
        )?;

        let info = provider.fetch_pipeline_info(&request).await?;

        let format = self.format.unwrap_or(config.output.format);
        let pretty = self.pretty || config.output.pretty;

        if format == OutputFormat::Summary && self.output.is_none() {
            output::print_summary(&info);
            return Ok(());
        }

        self.write_json(&info, pretty)
    }

    fn write_json(&self, info: &PipelineInfo, pretty: bool) -> Result<()> {
        let json_output = if pretty {
            serde_json::to_string_pretty(info)?
        } else {
            serde_json::to_string(info)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            info!("Pipeline info written to: {}", output_path.display());
        } else {
            println!("{json_output}");
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Buildkite {
                token,
                url,
                org_id,
                org_name,
                pipeline_id,
                pipeline_name,
                repository,
                since,
                until,
                page_size,
                max_concurrent_requests,
            } => {
                let request = PipelineInfoRequest {
                    organization_id: org_id.clone(),
                    pipeline_id: pipeline_id.clone(),
                    pipeline_name: pipeline_name.clone().unwrap_or_else(|| pipeline_id.clone()),
                    repository: repository.clone(),
                    organization_name: org_name.clone().unwrap_or_else(|| org_id.clone()),
                    start_time: *since,
                    end_time: *until,
                };

                self.execute_buildkite(
                    config,
                    token.as_deref(),
                    url.as_deref(),
                    request,
                    *page_size,
                    *max_concurrent_requests,
                )
                .await
            }
        }
    }
}
