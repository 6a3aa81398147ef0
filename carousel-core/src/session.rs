//! Session state for one paginated interaction.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::controls::ControlAction;

/// When a session's idle clock starts counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpireMode {
    /// The idle clock starts at registration and never resets; the session
    /// expires a fixed time after creation regardless of activity.
    #[default]
    AfterCreation,
    /// Every accepted interaction resets the idle clock; the session expires
    /// a fixed time after it was last used.
    AfterLastUsage,
}

impl ExpireMode {
    /// Returns the mode name for display and logging.
    pub fn name(self) -> &'static str {
        match self {
            ExpireMode::AfterCreation => "after_creation",
            ExpireMode::AfterLastUsage => "after_last_usage",
        }
    }
}

/// Caller-authored content for a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PageContent {
    /// Create empty page content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the page body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Capability to render one page of a session.
///
/// Implemented for free by any `Fn(usize) -> PageContent` closure, so most
/// callers never implement this directly.
pub trait PageRenderer: Send + Sync {
    /// Produce the content for the given zero-based page index.
    fn render_page(&self, page: usize) -> PageContent;
}

impl<F> PageRenderer for F
where
    F: Fn(usize) -> PageContent + Send + Sync,
{
    fn render_page(&self, page: usize) -> PageContent {
        self(page)
    }
}

/// State of one paginated interaction.
///
/// Construct with [`Session::new`], then hand it to the manager, which owns
/// it for the rest of its lifecycle. The current page only moves through
/// [`Session::go_to`], which clamps every transition into
/// `0..page_count`, so a forged or stale control event can never drive the
/// index out of range.
#[derive(Clone)]
pub struct Session {
    id: String,
    page_count: usize,
    current_page: usize,
    owner: Option<String>,
    expire_mode: ExpireMode,
    last_used: Instant,
    renderer: Arc<dyn PageRenderer>,
}

impl Session {
    /// Create a session with the given id, page count, and page renderer.
    ///
    /// The id must not contain `:`, which separates control id segments.
    /// A zero page count is clamped to 1.
    pub fn new(
        id: impl Into<String>,
        page_count: usize,
        renderer: impl PageRenderer + 'static,
    ) -> Self {
        let id = id.into();
        if id.contains(':') {
            tracing::warn!(session_id = %id, "Session id contains ':', its control events will not parse");
        }
        let page_count = if page_count == 0 {
            tracing::warn!(session_id = %id, "Session created with zero pages, clamping to 1");
            1
        } else {
            page_count
        };

        Self {
            id,
            page_count,
            current_page: 0,
            owner: None,
            expire_mode: ExpireMode::default(),
            last_used: Instant::now(),
            renderer: Arc::new(renderer),
        }
    }

    /// Restrict control events to the given owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the expiry mode.
    pub fn with_expire_mode(mut self, mode: ExpireMode) -> Self {
        self.expire_mode = mode;
        self
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Total number of pages.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Current zero-based page index.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Owner allowed to operate the controls, if restricted.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Expiry mode.
    pub fn expire_mode(&self) -> ExpireMode {
        self.expire_mode
    }

    /// Returns true if the current page is the first page.
    pub fn is_first_page(&self) -> bool {
        self.current_page == 0
    }

    /// Returns true if the current page is the last page.
    pub fn is_last_page(&self) -> bool {
        self.current_page + 1 >= self.page_count
    }

    /// Returns true if the actor may operate this session's controls.
    ///
    /// Unowned sessions permit any actor. Owned sessions require the exact
    /// owner identity; an anonymous actor is denied.
    pub fn permits(&self, actor: Option<&str>) -> bool {
        match self.owner.as_deref() {
            Some(owner) => actor == Some(owner),
            None => true,
        }
    }

    /// Apply a navigation action, clamping into `0..page_count`.
    ///
    /// `Stop` is not a navigation and leaves the page unchanged; the manager
    /// handles it by removing the session instead.
    pub fn go_to(&mut self, action: ControlAction) {
        self.current_page = match action {
            ControlAction::First => 0,
            ControlAction::Back => self.current_page.saturating_sub(1),
            ControlAction::Next => (self.current_page + 1).min(self.page_count - 1),
            ControlAction::Last => self.page_count - 1,
            ControlAction::Stop => self.current_page,
        };
    }

    /// Render the content for the given page via the caller's renderer.
    pub fn render_page(&self, page: usize) -> PageContent {
        self.renderer.render_page(page)
    }

    /// How long the session has been idle.
    pub fn idle_time(&self) -> Duration {
        self.last_used.elapsed()
    }

    /// Reset the idle clock if the expiry mode counts from last usage.
    pub(crate) fn touch(&mut self) {
        if self.expire_mode == ExpireMode::AfterLastUsage {
            self.last_used = Instant::now();
        }
    }

    /// Unconditionally reset the idle clock. Called on registration.
    pub(crate) fn stamp(&mut self) {
        self.last_used = Instant::now();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("page_count", &self.page_count)
            .field("current_page", &self.current_page)
            .field("owner", &self.owner)
            .field("expire_mode", &self.expire_mode)
            .finish_non_exhaustive()
    }
}
