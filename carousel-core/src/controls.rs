//! Navigation controls and their wire identifiers.
//!
//! Every rendered message carries a row of up to five buttons (first, back,
//! stop, next, last). Each button encodes a control id of the form
//! `<prefix>:<session_id>:<action>` that comes back verbatim in the
//! interaction event when the button is pressed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A navigation action carried by a control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    /// Jump to the first page
    First,
    /// Go back one page
    Back,
    /// Terminate the session and strip its controls
    Stop,
    /// Advance one page
    Next,
    /// Jump to the last page
    Last,
}

impl ControlAction {
    /// All actions in display order.
    pub const ALL: [ControlAction; 5] = [
        ControlAction::First,
        ControlAction::Back,
        ControlAction::Stop,
        ControlAction::Next,
        ControlAction::Last,
    ];

    /// Returns the action name used in control ids.
    pub fn as_str(self) -> &'static str {
        match self {
            ControlAction::First => "first",
            ControlAction::Back => "back",
            ControlAction::Stop => "stop",
            ControlAction::Next => "next",
            ControlAction::Last => "last",
        }
    }

    /// Parse an action name from a control id segment.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first" => Some(ControlAction::First),
            "back" => Some(ControlAction::Back),
            "stop" => Some(ControlAction::Stop),
            "next" => Some(ControlAction::Next),
            "last" => Some(ControlAction::Last),
            _ => None,
        }
    }
}

/// Visual style of a control button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    /// Accent-colored button
    #[default]
    Primary,
    /// Neutral button
    Secondary,
    /// Green button
    Success,
    /// Red button
    Danger,
}

/// Visual options for a single control button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonOptions {
    /// Button label text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Button emoji
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Button style
    pub style: ButtonStyle,
}

impl ButtonOptions {
    /// Create button options with default style and no label or emoji.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the button label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the button emoji.
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Set the button style.
    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }
}

/// Ordered set of control buttons to render.
///
/// Each action appears at most once. Actions absent from the set are not
/// rendered, so callers can strip navigation down to any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    buttons: Vec<(ControlAction, ButtonOptions)>,
}

impl ControlsConfig {
    /// Create an empty control set.
    pub fn empty() -> Self {
        Self {
            buttons: Vec::new(),
        }
    }

    /// Add a button, or replace its options if the action is already present.
    ///
    /// A replaced button keeps its position; a new button is appended.
    pub fn with_button(mut self, action: ControlAction, options: ButtonOptions) -> Self {
        match self.buttons.iter_mut().find(|(a, _)| *a == action) {
            Some((_, existing)) => *existing = options,
            None => self.buttons.push((action, options)),
        }
        self
    }

    /// Remove a button from the set.
    pub fn without(mut self, action: ControlAction) -> Self {
        self.buttons.retain(|(a, _)| *a != action);
        self
    }

    /// Get the options for an action, if present.
    pub fn get(&self, action: ControlAction) -> Option<&ButtonOptions> {
        self.buttons
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, options)| options)
    }

    /// Iterate over the buttons in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ControlAction, &ButtonOptions)> {
        self.buttons.iter().map(|(action, options)| (*action, options))
    }

    /// Returns the number of buttons in the set.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Returns true if the set has no buttons.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

impl Default for ControlsConfig {
    /// The stock five-button row: ⏮ ◀ 🗑 ▶ ⏩, with a red stop button.
    fn default() -> Self {
        Self::empty()
            .with_button(ControlAction::First, ButtonOptions::new().with_emoji("⏮"))
            .with_button(ControlAction::Back, ButtonOptions::new().with_emoji("◀"))
            .with_button(
                ControlAction::Stop,
                ButtonOptions::new()
                    .with_emoji("🗑")
                    .with_style(ButtonStyle::Danger),
            )
            .with_button(ControlAction::Next, ButtonOptions::new().with_emoji("▶"))
            .with_button(ControlAction::Last, ButtonOptions::new().with_emoji("⏩"))
    }
}

/// A fully rendered control button, ready for a transport to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlButton {
    /// Control id sent back by the platform when the button is pressed
    pub control_id: String,
    /// Action this button triggers
    pub action: ControlAction,
    /// Button label text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Button emoji
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Button style
    pub style: ButtonStyle,
    /// Whether the button is rendered greyed out and inert
    pub disabled: bool,
}

/// Build the control id for a session action.
pub fn format_control_id(prefix: &str, session_id: &str, action: ControlAction) -> String {
    format!("{}:{}:{}", prefix, session_id, action.as_str())
}

/// Parse a control id of the form `<prefix>:<session_id>:<action>`.
///
/// The id must split into exactly three segments and the first segment must
/// equal `prefix` in full, so ids from unrelated features sharing the event
/// stream never match.
pub fn parse_control_id(prefix: &str, control_id: &str) -> Result<(String, ControlAction)> {
    let parts: Vec<&str> = control_id.split(':').collect();
    if parts.len() != 3 || parts[0] != prefix {
        return Err(Error::InvalidControlId(control_id.to_string()));
    }

    let action = ControlAction::parse(parts[2])
        .ok_or_else(|| Error::InvalidControlId(control_id.to_string()))?;

    Ok((parts[1].to_string(), action))
}
