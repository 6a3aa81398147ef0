//! Message rendering.
//!
//! Pure construction of outbound message instructions from a session
//! snapshot: caller content, the `Page: n/total` footer, and the control row
//! with per-button disabled state.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::controls::{format_control_id, ControlAction, ControlButton};
use crate::error::{Error, Result};
use crate::session::Session;

/// Rendered content of one page, ready for a transport to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePayload {
    /// Page title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Footer showing the 1-based page position
    pub footer: String,
    /// Accent color as 0xRRGGBB
    pub accent_color: u32,
}

/// Instruction to send a new message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreate {
    /// Rendered page content
    pub payload: PagePayload,
    /// Control buttons, in display order
    pub controls: Vec<ControlButton>,
    /// Whether the message is visible only to the invoking user
    pub ephemeral: bool,
}

/// Instruction to edit an existing message in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageUpdate {
    /// Rendered page content
    pub payload: PagePayload,
    /// Control buttons, in display order
    pub controls: Vec<ControlButton>,
}

/// Build the control row for a session's current page.
///
/// `first` and `back` are disabled on the first page, `next` and `last` on
/// the last page. `stop` is never disabled. Actions absent from the
/// configured control set are not rendered.
pub fn build_controls(config: &Config, session: &Session) -> Vec<ControlButton> {
    config
        .controls
        .iter()
        .map(|(action, options)| {
            let disabled = match action {
                ControlAction::First | ControlAction::Back => session.is_first_page(),
                ControlAction::Next | ControlAction::Last => session.is_last_page(),
                ControlAction::Stop => false,
            };

            ControlButton {
                control_id: format_control_id(&config.control_id_prefix, session.id(), action),
                action,
                label: options.label.clone(),
                emoji: options.emoji.clone(),
                style: options.style,
                disabled,
            }
        })
        .collect()
}

/// Render the session's current page into a payload.
///
/// The caller-supplied renderer runs behind a panic boundary; a panicking
/// renderer surfaces as [`Error::RenderPanic`] instead of unwinding into the
/// dispatch path.
pub fn render_payload(config: &Config, session: &Session) -> Result<PagePayload> {
    let page = session.current_page();

    let content = catch_unwind(AssertUnwindSafe(|| session.render_page(page))).map_err(|_| {
        tracing::error!(session_id = %session.id(), page = page, "Page renderer panicked");
        Error::RenderPanic { page }
    })?;

    Ok(PagePayload {
        title: content.title,
        body: content.body,
        footer: format!("Page: {}/{}", page + 1, session.page_count()),
        accent_color: config.accent_color,
    })
}

/// Render the instruction to send a session's initial message.
pub fn render_create(config: &Config, session: &Session, ephemeral: bool) -> Result<MessageCreate> {
    Ok(MessageCreate {
        payload: render_payload(config, session)?,
        controls: build_controls(config, session),
        ephemeral,
    })
}

/// Render the instruction to update a session's message in place.
pub fn render_update(config: &Config, session: &Session) -> Result<MessageUpdate> {
    Ok(MessageUpdate {
        payload: render_payload(config, session)?,
        controls: build_controls(config, session),
    })
}
