//! # Page Navigation
//!
//! Maps menu actions to remote resources and turns them into assembled
//! documents.
//!
//! ## Remote layout
//!
//! ```text
//! README.md                       home page (Markdown)
//! gui/{id}.html                   page body (required)
//! gui/Script/{id}.js              page script (required)
//! gui/Styles/{id}_styles.css      page style (optional)
//! ```
//!
//! Loads are asynchronous. Each one is paired with a [`NavigationTicket`]
//! and only the result of the most recent ticket is ever displayed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::assembler::{AssembledDocument, Assembler};
use crate::error::{InvalidPageId, NavigationError};
use crate::fetch::ResourceSource;
use crate::markdown::render_markdown;

/// Stylesheet of the home page.
pub const HOME_STYLE: &str = include_str!("../assets/home.css");

/// Link interception script of the home page.
pub const HOME_SCRIPT: &str = include_str!("../assets/home.js");

/// Identifier of the Markdown landing page.
pub const HOME_PAGE: &str = "home";

/// Remote path of the landing page.
pub const README_PATH: &str = "README.md";

/// Pages published under `gui/`.
pub const KNOWN_PAGES: [&str; 10] = [
    "search",
    "cycles",
    "sortie",
    "archon",
    "arbitration",
    "nightwave",
    "fissures",
    "baro",
    "events",
    "info_git",
];

/// A page identifier usable as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    /// Validates `id`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPageId`] unless `id` is non-empty and made only of
    /// ASCII lowercase letters, digits and `_`.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidPageId> {
        let id = id.into();
        if is_valid_id(&id) {
            Ok(Self(id))
        } else {
            Err(InvalidPageId(id))
        }
    }

    /// The landing page.
    #[must_use]
    pub fn home() -> Self {
        Self(HOME_PAGE.to_string())
    }

    /// Builds an id from a compile-time constant already known to be valid.
    pub(crate) fn known(id: &'static str) -> Self {
        debug_assert!(is_valid_id(id), "invalid built-in page id {id}");
        Self(id.to_string())
    }

    /// The identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the landing page.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.0 == HOME_PAGE
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PageId {
    type Err = InvalidPageId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Where a page's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// Rendered from Markdown with the built-in home script and style.
    Markdown {
        /// Path of the Markdown file.
        path: String,
    },
    /// Assembled from separately published fragments.
    Fragments {
        /// Body markup.
        html: String,
        /// Page script.
        script: String,
        /// Page stylesheet, if the page has one.
        style: Option<String>,
    },
}

/// Resources that make up one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    /// Page being described.
    pub page: PageId,
    /// Resource paths.
    pub source: PageSource,
}

impl PageDescriptor {
    /// Describes `page` using the remote layout.
    #[must_use]
    pub fn for_page(page: PageId) -> Self {
        let source = if page.is_home() {
            PageSource::Markdown {
                path: README_PATH.to_string(),
            }
        } else {
            let id = page.as_str();
            PageSource::Fragments {
                html: format!("gui/{id}.html"),
                script: format!("gui/Script/{id}.js"),
                style: Some(format!("gui/Styles/{id}_styles.css")),
            }
        };
        Self { page, source }
    }

    /// Title of the error document shown when this page fails.
    #[must_use]
    pub fn error_title(&self) -> &'static str {
        match self.source {
            PageSource::Markdown { .. } => "Error loading README",
            PageSource::Fragments { .. } => "Error loading page",
        }
    }
}

/// What a menu entry asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Show the landing page.
    ShowHome,
    /// Show a page published under `gui/`.
    Navigate(PageId),
}

impl MenuAction {
    /// Page this action leads to.
    #[must_use]
    pub fn page(&self) -> PageId {
        match self {
            Self::ShowHome => PageId::home(),
            Self::Navigate(page) => page.clone(),
        }
    }
}

/// Outcome of loading a page. Both variants carry a displayable document.
#[derive(Debug)]
pub enum PageLoad {
    /// The page was assembled.
    Ready {
        /// Page that was loaded.
        page: PageId,
        /// Assembled document.
        document: AssembledDocument,
    },
    /// A required resource failed; `document` explains the failure.
    Failed {
        /// Page that was requested.
        page: PageId,
        /// What went wrong.
        error: NavigationError,
        /// Error document.
        document: AssembledDocument,
    },
}

impl PageLoad {
    /// Page this load is for.
    #[must_use]
    pub fn page(&self) -> &PageId {
        match self {
            Self::Ready { page, .. } | Self::Failed { page, .. } => page,
        }
    }

    /// Document to display.
    #[must_use]
    pub fn document(&self) -> &AssembledDocument {
        match self {
            Self::Ready { document, .. } | Self::Failed { document, .. } => document,
        }
    }

    /// Whether the page loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Fetches and assembles pages.
///
/// Cheap to clone; clones share the underlying source.
#[derive(Clone)]
pub struct Navigator {
    source: Arc<dyn ResourceSource>,
    assembler: Assembler,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Creates a navigator reading from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ResourceSource>, assembler: Assembler) -> Self {
        Self { source, assembler }
    }

    /// Loads the page `action` points to.
    ///
    /// Never fails: when a required resource is unavailable the result is
    /// [`PageLoad::Failed`] holding an error document.
    pub async fn load(&self, action: &MenuAction) -> PageLoad {
        let descriptor = PageDescriptor::for_page(action.page());
        tracing::info!(page = %descriptor.page, "Loading page");

        match self.assemble(&descriptor).await {
            Ok(document) => PageLoad::Ready {
                page: descriptor.page,
                document,
            },
            Err(error) => {
                tracing::error!(page = %descriptor.page, error = %error, "Failed to load page");
                let document = self
                    .assembler
                    .error_document(descriptor.error_title(), &error.to_string());
                PageLoad::Failed {
                    page: descriptor.page,
                    error,
                    document,
                }
            }
        }
    }

    async fn assemble(
        &self,
        descriptor: &PageDescriptor,
    ) -> Result<AssembledDocument, NavigationError> {
        match &descriptor.source {
            PageSource::Markdown { path } => {
                let markdown = self.source.fetch(path).await?;
                let body = render_markdown(&markdown);
                Ok(self.assembler.assemble(&body, HOME_SCRIPT, HOME_STYLE)?)
            }
            PageSource::Fragments {
                html,
                script,
                style,
            } => {
                let body = self.source.fetch(html).await?;
                let script = self.source.fetch(script).await?;
                let style = match style {
                    Some(path) => self.optional(path).await,
                    None => String::new(),
                };
                Ok(self.assembler.assemble(&body, &script, &style)?)
            }
        }
    }

    async fn optional(&self, path: &str) -> String {
        self.source.fetch(path).await.unwrap_or_else(|e| {
            tracing::debug!(path, error = %e, "Optional resource unavailable");
            String::new()
        })
    }
}

/// Identifies one navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationTicket(u64);

/// Which page is showing and which navigation is the latest.
#[derive(Debug, Default)]
pub struct NavigationState {
    current_page: Option<PageId>,
    latest: u64,
}

impl NavigationState {
    /// Page of the last successful navigation.
    #[must_use]
    pub fn current_page(&self) -> Option<&PageId> {
        self.current_page.as_ref()
    }

    /// Starts a navigation, superseding any in flight.
    pub fn issue(&mut self) -> NavigationTicket {
        self.latest += 1;
        NavigationTicket(self.latest)
    }

    /// Whether `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_latest(&self, ticket: NavigationTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Records a finished load.
    ///
    /// Returns `false` without changing anything if `ticket` has been
    /// superseded. Only successful loads move `current_page`.
    pub fn record(&mut self, ticket: NavigationTicket, load: &PageLoad) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(page = %load.page(), "Discarding superseded page load");
            return false;
        }
        if load.is_ready() {
            self.current_page = Some(load.page().clone());
        }
        true
    }
}
