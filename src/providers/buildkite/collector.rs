use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};
use serde_json::Value;
use url::Url;

use super::client::BuildkiteClient;
use super::query::FetchWindow;
use crate::error::{BuildLensError, Result};

/// Fetches every page of builds for the window and merges their records.
///
/// Page 1 is fetched first to learn the page count from its `Link` header.
/// Pages `2..=last` are then requested concurrently. At most
/// `max_concurrent_requests` page futures exist at any time, so a huge page
/// count costs neither memory nor connections up front. The first failing
/// page aborts the whole collection and drops the requests still in flight;
/// no partial result is returned.
///
/// Record order in the result is unspecified.
pub async fn collect_build_records(
    client: &BuildkiteClient,
    builds_url: &Url,
    window: &FetchWindow,
) -> Result<Vec<Value>> {
    let first = client
        .fetch_builds_page(builds_url, window, 1)
        .await
        .map_err(|e| page_error(1, e))?;

    let last_page = first.pagination.last_page;
    let mut records = first.records;

    if last_page <= 1 {
        debug!("Single page of builds ({} records)", records.len());
        return Ok(records);
    }

    info!("Fetching {} remaining pages of builds...", last_page - 1);

    let remaining: Vec<Vec<Value>> = stream::iter(2..=last_page)
        .map(|page| async move {
            client
                .fetch_builds_page(builds_url, window, page)
                .await
                .map(|raw| raw.records)
                .map_err(|e| page_error(page, e))
        })
        .buffer_unordered(client.max_concurrent_requests())
        .try_collect()
        .await?;

    records.extend(remaining.into_iter().flatten());

    info!("Collected {} build records from {last_page} pages", records.len());

    Ok(records)
}

fn page_error(page: u32, source: BuildLensError) -> BuildLensError {
    BuildLensError::PageFetch {
        page,
        source: Box::new(source),
    }
}
