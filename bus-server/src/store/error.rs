//! Store error types.

/// Error from a datastore write.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The backing store rejected the write
    #[error("store write failed: {0}")]
    WriteFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::WriteFailed("disk full".to_string());
        assert_eq!(err.to_string(), "store write failed: disk full");
    }
}
