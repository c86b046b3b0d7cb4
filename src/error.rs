use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildLensError {
    #[error("Buildkite API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Buildkite API error (status {status}) persisted after {retries} retries")]
    ApiErrorAfterRetries { status: u16, retries: u32 },

    #[error("Failed to fetch builds page {page}: {source}")]
    PageFetch {
        page: u32,
        #[source]
        source: Box<BuildLensError>,
    },

    #[error("Builds page {page} is not a JSON array of builds: {source}")]
    MalformedPage {
        page: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid build record at index {index}: {source}")]
    InvalidBuild {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to load collation rules: {0}")]
    Collation(String),

    #[error("Request limiter was closed while requests were pending")]
    LimiterClosed,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, BuildLensError>;
