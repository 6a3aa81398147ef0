//! Transport seam between the carousel core and the hosting platform.
//!
//! The core never performs network I/O itself; it hands [`MessageCreate`]
//! and [`MessageUpdate`] instructions to a [`Responder`] supplied by the
//! embedding application.

use async_trait::async_trait;

use crate::render::{MessageCreate, MessageUpdate};

/// Result type for responder operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport error type.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error("Interaction expired: {0}")]
    Expired(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Responder trait for delivering rendered messages.
///
/// Implement this against the originating interaction context of one
/// message: all four operations target that message or its invoker.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Send the initial rendered message.
    async fn respond_create(&self, message: MessageCreate) -> TransportResult<()>;

    /// Edit the rendered message in place.
    async fn respond_update(&self, message: MessageUpdate) -> TransportResult<()>;

    /// Send a short text visible only to the acting user.
    async fn send_ephemeral(&self, text: &str) -> TransportResult<()>;

    /// Strip the control buttons from the message without re-rendering its
    /// content. Used when the session is gone.
    async fn clear_controls(&self) -> TransportResult<()>;
}
