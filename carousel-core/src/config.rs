//! Manager configuration.

use std::time::Duration;

use crate::controls::ControlsConfig;

/// Configuration for a [`Paginator`](crate::manager::Paginator).
///
/// [`Config::default`] matches the stock setup: the five-button control row,
/// a 30 second sweep interval, and a 5 minute idle expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Control buttons to render, in display order
    pub controls: ControlsConfig,
    /// Message sent to an actor who is not the session owner
    pub no_permission_message: String,
    /// First segment of every control id; events whose ids carry a different
    /// prefix are ignored
    pub control_id_prefix: String,
    /// Accent color for rendered pages, as 0xRRGGBB
    pub accent_color: u32,
    /// How often the sweeper scans for expired sessions
    pub cleanup_interval: Duration,
    /// How long a session may stay idle before the sweeper evicts it
    pub expire_after: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controls: ControlsConfig::default(),
            no_permission_message: "You can't interact with this paginator because it's not yours."
                .to_string(),
            control_id_prefix: "carousel".to_string(),
            accent_color: 0x4c50c1,
            cleanup_interval: Duration::from_secs(30),
            expire_after: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the control button set.
    pub fn with_controls(mut self, controls: ControlsConfig) -> Self {
        self.controls = controls;
        self
    }

    /// Set the message sent to an actor who is not the session owner.
    pub fn with_no_permission_message(mut self, message: impl Into<String>) -> Self {
        self.no_permission_message = message.into();
        self
    }

    /// Set the control id prefix.
    pub fn with_control_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.control_id_prefix = prefix.into();
        self
    }

    /// Set the accent color for rendered pages.
    pub fn with_accent_color(mut self, color: u32) -> Self {
        self.accent_color = color;
        self
    }

    /// Set how often the sweeper scans for expired sessions.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Set how long a session may stay idle before eviction.
    pub fn with_expire_after(mut self, expire_after: Duration) -> Self {
        self.expire_after = expire_after;
        self
    }
}
