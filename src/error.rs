use thiserror::Error;

/// Failure of one of the startup catalog fetches.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The durable key-value store could not be read or written.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid toml: {0}")]
    Format(#[from] toml::de::Error),

    #[error("no storage location available")]
    NoLocation,
}
