use crate::ItemId;

/// Failures reported by an [`ItemStore`](crate::ItemStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("item {0} not found")]
    NotFound(ItemId),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True for failures of the transport rather than of the request itself.
    pub fn is_network(&self) -> bool {
        matches!(self, StoreError::Network(_) | StoreError::Status { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Network(e.to_string())
        }
    }
}
