//! # Application State
//!
//! Shared state built around the [`Hub`] using Dioxus signals and context.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dioxus::prelude::*;
use infohub_core::bridge::{parse_message, post_to_frame_script};
use infohub_core::{
    BridgeError, EmbeddedMessage, Hub, MenuAction, NativeMessage, PageId, PaletteDraft,
    ThemeError, ThemeMode,
};

use crate::components::FRAME_ID;

/// The hub created at startup, shared with the UI through launch context.
pub type SharedHub = Arc<Mutex<Hub>>;

/// State of the channel to the displayed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    /// No document shown yet.
    Idle,
    /// Document shown, waiting for `bridge_ready`.
    Connecting,
    /// Theme and link handling are live.
    Ready,
    /// The document gave up waiting for the transport.
    Failed,
}

impl BridgeStatus {
    /// Short label for the status bar.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Connecting => "Connecting to page...",
            Self::Ready => "Ready",
            Self::Failed => "Page bridge unavailable",
        }
    }

    /// Status after a new document is shown.
    ///
    /// Only a loaded page carries the transport; the error document never
    /// reports `bridge_ready`.
    #[must_use]
    pub fn after_load(loaded: bool) -> Self {
        if loaded {
            Self::Connecting
        } else {
            Self::Idle
        }
    }
}

/// Global application state.
///
/// Shared across all components via Dioxus context.
/// Use `use_context::<AppState>()` to access in components.
///
/// # Examples
///
/// ```rust,ignore
/// #[component]
/// fn Status() -> Element {
///     let state = use_context::<AppState>();
///     let loading = *state.loading.read();
///
///     rsx! {
///         if loading { p { "Loading..." } }
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    hub: SharedHub,

    /// Markup of the displayed document.
    pub document: Signal<Option<String>>,

    /// Stylesheet of the native shell.
    pub native_stylesheet: Signal<String>,

    /// Active theme mode.
    pub theme_mode: Signal<ThemeMode>,

    /// Menu action most recently chosen.
    pub selected: Signal<Option<MenuAction>>,

    /// Page of the last successful navigation.
    pub current_page: Signal<Option<PageId>>,

    /// Whether a navigation is in flight.
    pub loading: Signal<bool>,

    /// Channel to the displayed document.
    pub bridge_status: Signal<BridgeStatus>,

    /// Last error worth showing to the user.
    pub last_error: Signal<Option<String>>,
}

impl AppState {
    /// Creates the state, seeding the theme signals from the hub.
    #[must_use]
    pub fn new(hub: SharedHub) -> Self {
        let (stylesheet, mode) = {
            let guard = hub.lock().unwrap_or_else(PoisonError::into_inner);
            let theme = guard.theme();
            (theme.native_stylesheet().to_string(), theme.mode())
        };

        Self {
            hub,
            document: Signal::new(None),
            native_stylesheet: Signal::new(stylesheet),
            theme_mode: Signal::new(mode),
            selected: Signal::new(None),
            current_page: Signal::new(None),
            loading: Signal::new(false),
            bridge_status: Signal::new(BridgeStatus::Idle),
            last_error: Signal::new(None),
        }
    }

    fn hub(&self) -> MutexGuard<'_, Hub> {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows the landing page.
    pub fn show_home(&self) {
        self.navigate(MenuAction::ShowHome);
    }

    /// Loads the page for `action` in the background.
    ///
    /// If another navigation starts before this one finishes, this one's
    /// result is dropped.
    pub fn navigate(&self, action: MenuAction) {
        let (ticket, navigator) = {
            let mut hub = self.hub();
            (hub.begin(), hub.navigator())
        };

        let mut state = self.clone();
        state.selected.set(Some(action.clone()));
        state.loading.set(true);

        spawn(async move {
            let load = navigator.load(&action).await;
            let (shown, current) = {
                let mut hub = state.hub();
                let shown = hub.complete(ticket, load);
                (shown, hub.current_page().cloned())
            };
            let Some(shown) = shown else {
                return;
            };

            let loaded = shown.error.is_none();
            state.current_page.set(current);
            state.last_error.set(shown.error);
            let html = shown.document.into_string();
            // An identical srcdoc does not reload the frame, so no new handshake.
            if state.document.peek().as_deref() != Some(html.as_str()) {
                state.bridge_status.set(BridgeStatus::after_load(loaded));
                state.document.set(Some(html));
            }
            state.loading.set(false);
        });
    }

    /// Current custom palette, for pre-filling the editor.
    #[must_use]
    pub fn palette_draft(&self) -> Option<PaletteDraft> {
        self.hub().theme().palette().map(PaletteDraft::from)
    }

    /// Switches theme and restyles the shell and the displayed document.
    ///
    /// # Errors
    ///
    /// Returns the [`ThemeError`] from the hub; nothing changes on error.
    pub fn apply_theme(
        &self,
        mode: ThemeMode,
        palette: Option<PaletteDraft>,
    ) -> Result<(), ThemeError> {
        let change = self.hub().set_theme(mode, palette)?;

        let mut native_stylesheet = self.native_stylesheet;
        let mut theme_mode = self.theme_mode;
        native_stylesheet.set(change.native_stylesheet);
        theme_mode.set(mode);

        if self.document.peek().is_some() {
            tracing::debug!(page = ?change.page, "Applying theme to displayed page");
            post_to_frame(&change.message);
        }
        Ok(())
    }

    /// Handles a raw message forwarded from the displayed document.
    pub fn receive(&self, value: serde_json::Value) {
        let message = match parse_message(value) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed bridge message");
                return;
            }
        };
        let ready = message == EmbeddedMessage::BridgeReady;

        let result = self.hub().handle_embedded(message);
        let mut status = self.bridge_status;
        match result {
            Ok(reply) => {
                if ready {
                    status.set(BridgeStatus::Ready);
                }
                if let Some(reply) = reply {
                    post_to_frame(&reply);
                }
            }
            Err(e @ BridgeError::InitTimeout { .. }) => {
                status.set(BridgeStatus::Failed);
                self.report(&e);
            }
            Err(e) => self.report(&e),
        }
    }

    /// Shows `error` to the user.
    pub fn report(&self, error: &dyn std::fmt::Display) {
        let mut last_error = self.last_error;
        last_error.set(Some(error.to_string()));
    }

    /// Dismisses the shown error.
    pub fn clear_error(&self) {
        let mut last_error = self.last_error;
        last_error.set(None);
    }
}

/// Posts `message` into the content frame.
fn post_to_frame(message: &NativeMessage) {
    let eval = document::eval(&post_to_frame_script(FRAME_ID, message));
    spawn(async move {
        if let Err(e) = eval.await {
            tracing::warn!(error = %e, "Failed to post bridge message");
        }
    });
}
