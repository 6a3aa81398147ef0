//! Session manager and control dispatch.
//!
//! [`Paginator`] ties the pieces together: it owns the configuration and the
//! session registry, renders messages through [`crate::render`], and drives
//! the dispatch state machine for inbound control events.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::controls::{parse_control_id, ControlAction};
use crate::error::Result;
use crate::registry::SessionRegistry;
use crate::render;
use crate::session::Session;
use crate::sweeper::{self, SweeperHandle};
use crate::transport::Responder;

/// An inbound control interaction, as received from the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEvent {
    /// Control id carried by the pressed button
    pub control_id: String,
    /// Identity of the acting user, if the platform provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

impl ControlEvent {
    /// Create an event with no actor identity.
    pub fn new(control_id: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
            actor: None,
        }
    }

    /// Set the acting user's identity.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Manages paginated message sessions.
///
/// One `Paginator` instance serves an entire application; clone it freely,
/// all clones share the same registry. Feed every control interaction from
/// the host event loop into [`Paginator::handle_control_event`]; events that
/// do not carry this paginator's id prefix are ignored, so the event stream
/// can be shared with unrelated features.
#[derive(Clone)]
pub struct Paginator {
    config: Config,
    registry: SessionRegistry,
}

impl Paginator {
    /// Create a paginator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: SessionRegistry::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a session and send its initial message.
    ///
    /// Replaces any existing session with the same id. The session stays
    /// registered even if the send fails; the transport error is returned
    /// to the caller.
    pub async fn create_session(
        &self,
        responder: &dyn Responder,
        session: Session,
        ephemeral: bool,
    ) -> Result<()> {
        let message = render::render_create(&self.config, &session, ephemeral)?;

        tracing::info!(
            session_id = %session.id(),
            pages = session.page_count(),
            expire_mode = session.expire_mode().name(),
            ephemeral = ephemeral,
            "Session created"
        );

        self.registry.insert(session).await;
        responder.respond_create(message).await?;
        Ok(())
    }

    /// Register a session against an existing message and edit it in place.
    ///
    /// Replaces any existing session with the same id.
    pub async fn update_session(&self, responder: &dyn Responder, session: Session) -> Result<()> {
        let message = render::render_update(&self.config, &session)?;

        tracing::info!(
            session_id = %session.id(),
            pages = session.page_count(),
            "Session updated"
        );

        self.registry.insert(session).await;
        responder.respond_update(message).await?;
        Ok(())
    }

    /// Handle one inbound control interaction.
    ///
    /// Every outcome is handled internally: foreign or malformed events are
    /// ignored, stale sessions get their controls stripped, unauthorized
    /// actors get the configured denial message, and transport failures are
    /// logged. Nothing here is fatal to the host.
    pub async fn handle_control_event(&self, responder: &dyn Responder, event: &ControlEvent) {
        let (session_id, action) =
            match parse_control_id(&self.config.control_id_prefix, &event.control_id) {
                Ok(parsed) => parsed,
                Err(_) => {
                    tracing::debug!(
                        control_id = %event.control_id,
                        "Ignoring control event with foreign or malformed id"
                    );
                    return;
                }
            };

        let Some(session) = self.registry.get(&session_id).await else {
            tracing::debug!(session_id = %session_id, "Control event for unknown session, stripping controls");
            if let Err(e) = responder.clear_controls().await {
                tracing::error!(session_id = %session_id, error = %e, "Failed to strip controls from stale message");
            }
            return;
        };

        if !session.permits(event.actor.as_deref()) {
            tracing::warn!(
                session_id = %session_id,
                actor = event.actor.as_deref().unwrap_or("<anonymous>"),
                "Denied control event from non-owner"
            );
            if let Err(e) = responder.send_ephemeral(&self.config.no_permission_message).await {
                tracing::error!(session_id = %session_id, error = %e, "Failed to send denial message");
            }
            return;
        }

        if action == ControlAction::Stop {
            self.registry.remove(&session_id).await;
            tracing::info!(session_id = %session_id, "Session stopped");
            if let Err(e) = responder.clear_controls().await {
                tracing::error!(session_id = %session_id, error = %e, "Failed to strip controls from stopped session");
            }
            return;
        }

        // Transition and idle-clock touch happen under one lock acquisition;
        // the snapshot is rendered after the lock is released.
        let updated = self
            .registry
            .update(&session_id, |session| {
                session.go_to(action);
                session.touch();
                session.clone()
            })
            .await;

        let Some(updated) = updated else {
            // Removed between lookup and transition, by a sweep or a stop
            tracing::debug!(session_id = %session_id, "Session disappeared mid-dispatch");
            return;
        };

        tracing::debug!(
            session_id = %session_id,
            action = action.as_str(),
            page = updated.current_page(),
            "Applied control action"
        );

        let message = match render::render_update(&self.config, &updated) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Failed to render page");
                return;
            }
        };

        if let Err(e) = responder.respond_update(message).await {
            tracing::error!(session_id = %session_id, error = %e, "Failed to update message");
        }
    }

    /// Spawn the background expiry sweeper with this paginator's configured
    /// interval and idle timeout.
    pub fn spawn_sweeper(&self) -> SweeperHandle {
        sweeper::spawn(
            self.registry.clone(),
            self.config.cleanup_interval,
            self.config.expire_after,
        )
    }

    /// Returns the number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.registry.len().await
    }

    /// Returns true if a session with the given id is live.
    pub async fn contains_session(&self, session_id: &str) -> bool {
        self.registry.contains(session_id).await
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
