//! Carousel Core - paged message sessions with navigation controls.
//!
//! This crate manages ephemeral multi-page message sessions for chat
//! platforms: it tracks per-session navigation state, renders a footer and
//! a five-button control row (first, back, stop, next, last), dispatches
//! inbound button presses, and expires idle sessions in the background.
//!
//! Page content comes from the caller as a pure function of the page index;
//! delivery goes through a [`Responder`] implemented by the embedding
//! application, so the core never talks to a platform directly.
//!
//! ## Architecture
//!
//! ```text
//! button press → Paginator::handle_control_event → SessionRegistry
//!                         ↓                             ↑
//! platform ←── Responder ←── render               expiry sweeper
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod controls;
pub mod error;
pub mod manager;
pub mod registry;
pub mod render;
pub mod session;
pub mod sweeper;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use controls::{
    format_control_id, parse_control_id, ButtonOptions, ButtonStyle, ControlAction, ControlButton,
    ControlsConfig,
};
pub use error::{Error, Result};
pub use manager::{ControlEvent, Paginator};
pub use registry::SessionRegistry;
pub use render::{MessageCreate, MessageUpdate, PagePayload};
pub use session::{ExpireMode, PageContent, PageRenderer, Session};
pub use sweeper::SweeperHandle;
pub use transport::{Responder, TransportError, TransportResult};
