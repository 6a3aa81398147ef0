//! Error types for carousel operations.

use crate::transport::TransportError;

/// Result type for carousel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Carousel error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The control identifier did not match the `<prefix>:<session_id>:<action>`
    /// format, or named an unknown action.
    #[error("Invalid control id: {0}")]
    InvalidControlId(String),

    /// The caller-supplied page renderer panicked.
    #[error("Page renderer panicked on page {page}")]
    RenderPanic {
        /// Page index that was being rendered
        page: usize,
    },

    /// A responder call failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidControlId("bad:id".to_string());
        assert_eq!(err.to_string(), "Invalid control id: bad:id");

        let err = Error::RenderPanic { page: 3 };
        assert_eq!(err.to_string(), "Page renderer panicked on page 3");
    }

    #[test]
    fn test_transport_error_conversion() {
        let err: Error = TransportError::SendFailed("connection reset".to_string()).into();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
