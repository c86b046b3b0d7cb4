use log::debug;
use reqwest::header::LINK;
use serde_json::Value;
use url::Url;

use super::core::BuildkiteClient;
use crate::error::{BuildLensError, Result};
use crate::providers::buildkite::pagination::PaginationInfo;
use crate::providers::buildkite::query::FetchWindow;

/// One page of the builds listing, before any typing of the records.
#[derive(Debug)]
pub struct RawPage {
    pub records: Vec<Value>,
    pub pagination: PaginationInfo,
}

impl BuildkiteClient {
    /// Fetches a single page of builds for the given window.
    ///
    /// The request slot is held until the body has been read, so the
    /// concurrency limit covers whole page downloads.
    pub async fn fetch_builds_page(
        &self,
        builds_url: &Url,
        window: &FetchWindow,
        page: u32,
    ) -> Result<RawPage> {
        let _permit = self.acquire_permit().await?;

        debug!("Fetching builds page {page} from {builds_url}");

        let response = self
            .get_with_retry(builds_url, &window.query_for_page(page))
            .await?;

        let pagination = PaginationInfo::from_link_header(response.headers().get(LINK));
        let body = response.bytes().await?;
        let records: Vec<Value> =
            serde_json::from_slice(&body).map_err(|source| BuildLensError::MalformedPage {
                page,
                source,
            })?;

        debug!(
            "Page {page}: {} builds (last page {})",
            records.len(),
            pagination.last_page
        );

        Ok(RawPage {
            records,
            pagination,
        })
    }
}
