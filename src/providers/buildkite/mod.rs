mod client;
mod collector;
mod pagination;
mod provider;
mod query;
mod steps;
mod types;

pub use client::{
    ClientSettings, DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_DELAY_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
pub use provider::BuildkiteProvider;
pub use query::DEFAULT_PAGE_SIZE;
