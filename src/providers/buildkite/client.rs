mod builds;
mod core;

pub use self::core::{
    BuildkiteClient, ClientSettings, DEFAULT_BASE_URL, DEFAULT_MAX_CONCURRENT_REQUESTS,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
