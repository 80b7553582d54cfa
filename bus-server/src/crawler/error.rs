//! Crawl error types.

use crate::datamall::DataMallError;
use crate::store::StoreError;

/// Error that aborted a crawl.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Fetching a page from the API failed
    #[error("fetch failed: {0}")]
    Upstream(#[from] DataMallError),

    /// Persisting a page failed
    #[error("save failed: {0}")]
    Store(#[from] StoreError),

    /// The crawl observed its cancellation token
    #[error("crawl cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CrawlError::Store(StoreError::WriteFailed("disk full".to_string()));
        assert_eq!(err.to_string(), "save failed: store write failed: disk full");

        assert_eq!(CrawlError::Cancelled.to_string(), "crawl cancelled");
    }
}
