//! # Hub
//!
//! Owns navigation, theme and bridge state for one window.
//!
//! ```text
//! menu click -> begin() -> Navigator::load (async) -> complete()
//!                                                       |
//!                   display document <-------------------+
//!                   bridge_ready -> handle_embedded() -> theme override
//! ```
//!
//! Navigations started with [`Hub::begin`] can be loaded on another task
//! with a cloned [`Navigator`]; [`Hub::complete`] drops results that were
//! superseded in the meantime.

use std::sync::Arc;

use crate::assembler::{AssembledDocument, Assembler};
use crate::bridge::{Bridge, EmbeddedMessage, NativeMessage};
use crate::config::HubConfig;
use crate::error::{BridgeError, FetchError, ThemeError};
use crate::fetch::{RemoteFetcher, ResourceSource};
use crate::navigation::{
    MenuAction, NavigationState, NavigationTicket, Navigator, PageId, PageLoad,
};
use crate::paths::AppPaths;
use crate::theme::{PaletteDraft, PlatformFont, SettingsStore, ThemeManager, ThemeMode, ThemeState};

/// A finished navigation ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Page that was requested.
    pub page: PageId,
    /// Document replacing the embedded view's content.
    pub document: AssembledDocument,
    /// Why the page could not be loaded, if it could not.
    pub error: Option<String>,
}

/// Result of a successful theme change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeChange {
    /// New stylesheet for the native shell.
    pub native_stylesheet: String,
    /// Message injecting the new override into the displayed document.
    pub message: NativeMessage,
    /// Page the override applies to, if one is showing.
    pub page: Option<PageId>,
}

/// Application controller.
#[derive(Debug)]
pub struct Hub {
    navigator: Navigator,
    theme: ThemeManager,
    navigation: NavigationState,
    bridge: Bridge,
}

impl Hub {
    /// Creates a hub from its parts.
    #[must_use]
    pub fn new(navigator: Navigator, theme: ThemeManager, bridge: Bridge) -> Self {
        Self {
            navigator,
            theme,
            navigation: NavigationState::default(),
            bridge,
        }
    }

    /// Wires the production hub: HTTP source, theme record under `paths`,
    /// system URL opener.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the HTTP client cannot be built.
    pub fn from_config(config: &HubConfig, paths: &AppPaths) -> Result<Self, FetchError> {
        let fetcher = RemoteFetcher::from_config(config)?;
        let assembler = Assembler::new(fetcher.base_url(), config.bridge)
            .with_jquery_url(config.jquery_url.clone());
        let source: Arc<dyn ResourceSource> = Arc::new(fetcher);
        let theme = ThemeManager::load_persisted(
            SettingsStore::new(paths.theme_file()),
            PlatformFont::detect(),
        );
        Ok(Self::new(
            Navigator::new(source, assembler),
            theme,
            Bridge::default(),
        ))
    }

    /// A handle for loading pages off the UI thread.
    #[must_use]
    pub fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }

    /// Starts a navigation. Any earlier one still loading is superseded.
    pub fn begin(&mut self) -> NavigationTicket {
        self.navigation.issue()
    }

    /// Finishes the navigation identified by `ticket`.
    ///
    /// Returns `None` when a newer navigation has started since.
    pub fn complete(&mut self, ticket: NavigationTicket, load: PageLoad) -> Option<Presentation> {
        if !self.navigation.record(ticket, &load) {
            return None;
        }
        Some(match load {
            PageLoad::Ready { page, document } => Presentation {
                page,
                document,
                error: None,
            },
            PageLoad::Failed {
                page,
                error,
                document,
            } => Presentation {
                page,
                document,
                error: Some(error.to_string()),
            },
        })
    }

    /// Loads and completes a navigation in one step.
    pub async fn navigate(&mut self, action: &MenuAction) -> Option<Presentation> {
        let ticket = self.begin();
        let load = self.navigator.load(action).await;
        self.complete(ticket, load)
    }

    /// Whether `ticket` still belongs to the newest navigation.
    #[must_use]
    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.navigation.is_latest(ticket)
    }

    /// Page of the last successful navigation.
    #[must_use]
    pub fn current_page(&self) -> Option<&PageId> {
        self.navigation.current_page()
    }

    /// The active theme.
    #[must_use]
    pub fn theme(&self) -> &ThemeState {
        self.theme.state()
    }

    /// Message applying the active theme to the displayed document.
    #[must_use]
    pub fn theme_message(&self) -> NativeMessage {
        self.theme.embedded_override().into()
    }

    /// Switches theme.
    ///
    /// The displayed page is not reloaded; apply the returned message to it
    /// instead.
    ///
    /// # Errors
    ///
    /// See [`ThemeManager::set_theme`].
    pub fn set_theme(
        &mut self,
        mode: ThemeMode,
        palette: Option<PaletteDraft>,
    ) -> Result<ThemeChange, ThemeError> {
        let state = self.theme.set_theme(mode, palette)?;
        Ok(ThemeChange {
            native_stylesheet: state.native_stylesheet().to_string(),
            message: state.embedded_override().into(),
            page: self.navigation.current_page().cloned(),
        })
    }

    /// Handles a message from the embedded document, returning the reply to
    /// post back, if any.
    ///
    /// # Errors
    ///
    /// See [`Bridge::handle`].
    pub fn handle_embedded(
        &self,
        message: EmbeddedMessage,
    ) -> Result<Option<NativeMessage>, BridgeError> {
        self.bridge.handle(message, || self.theme_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::RecordingOpener;
    use crate::config::BridgeSettings;
    use crate::fetch::testing::MemorySource;

    struct Fixture {
        hub: Hub,
        source: Arc<MemorySource>,
        opener: Arc<RecordingOpener>,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let source = Arc::new(
            MemorySource::default()
                .with("README.md", "# Warframe Info Hub\n\n[Repo](https://github.com/)")
                .with("gui/baro.html", "<div>Baro</div>")
                .with("gui/Script/baro.js", "console.log('x')"),
        );
        let opener = Arc::new(RecordingOpener::default());
        let dir = tempfile::tempdir().unwrap();

        let navigator = Navigator::new(
            source.clone(),
            Assembler::new("https://example.com/", BridgeSettings::default()),
        );
        let theme = ThemeManager::load_persisted(
            SettingsStore::new(dir.path().join("theme.json")),
            PlatformFont::for_os("linux"),
        );
        let hub = Hub::new(navigator, theme, Bridge::new(opener.clone()));

        Fixture {
            hub,
            source,
            opener,
            _dir: dir,
        }
    }

    fn baro() -> MenuAction {
        MenuAction::Navigate(PageId::new("baro").unwrap())
    }

    #[tokio::test]
    async fn test_navigate_records_page() {
        let mut f = fixture();
        assert!(f.hub.current_page().is_none());

        let shown = f.hub.navigate(&baro()).await.unwrap();
        assert!(shown.error.is_none());
        assert!(shown.document.as_str().contains("<div>Baro</div>"));
        assert_eq!(f.hub.current_page().map(PageId::as_str), Some("baro"));
    }

    #[tokio::test]
    async fn test_failed_navigation_shows_error_and_keeps_page() {
        let mut f = fixture();
        f.hub.navigate(&MenuAction::ShowHome).await.unwrap();

        let action = MenuAction::Navigate(PageId::new("nightwave").unwrap());
        let shown = f.hub.navigate(&action).await.unwrap();

        let error = shown.error.unwrap();
        assert!(error.contains("gui/nightwave.html"));
        assert!(shown.document.as_str().contains("Error loading page"));
        assert!(f.hub.current_page().unwrap().is_home());
    }

    #[tokio::test]
    async fn test_light_to_dark_on_home_does_not_refetch() {
        let mut f = fixture();
        f.hub.navigate(&MenuAction::ShowHome).await.unwrap();
        assert_eq!(f.source.count("README.md"), 1);

        let light_sheet = f.hub.theme().native_stylesheet().to_string();
        let light_message = f.hub.theme_message();

        let change = f.hub.set_theme(ThemeMode::Dark, None).unwrap();
        assert_ne!(change.native_stylesheet, light_sheet);
        assert_ne!(change.message, light_message);
        let NativeMessage::ApplyThemeOverride { css, .. } = &change.message;
        assert!(css.contains("#2b2b2b"));

        assert_eq!(f.source.count("README.md"), 1);
        assert!(change.page.unwrap().is_home());
    }

    #[tokio::test]
    async fn test_superseded_navigation_is_dropped() {
        let mut f = fixture();
        let navigator = f.hub.navigator();

        let slow = f.hub.begin();
        let fast = f.hub.begin();
        assert!(!f.hub.is_current(slow));

        let home = navigator.load(&MenuAction::ShowHome).await;
        let baro = navigator.load(&baro()).await;

        assert!(f.hub.complete(fast, baro).is_some());
        assert!(f.hub.complete(slow, home).is_none());
        assert_eq!(f.hub.current_page().map(PageId::as_str), Some("baro"));
    }

    #[test]
    fn test_bridge_ready_gets_current_theme() {
        let mut f = fixture();
        f.hub.set_theme(ThemeMode::Dark, None).unwrap();

        let reply = f.hub.handle_embedded(EmbeddedMessage::BridgeReady).unwrap();
        assert_eq!(reply, Some(f.hub.theme_message()));
    }

    #[test]
    fn test_open_url_goes_to_opener() {
        let f = fixture();

        let reply = f
            .hub
            .handle_embedded(EmbeddedMessage::OpenUrl {
                url: "https://warframe.com/".into(),
            })
            .unwrap();
        assert!(reply.is_none());
        assert_eq!(*f.opener.opened.lock().unwrap(), vec!["https://warframe.com/"]);

        let err = f
            .hub
            .handle_embedded(EmbeddedMessage::OpenUrl {
                url: "file:///etc/passwd".into(),
            })
            .unwrap_err();
        assert!(matches!(err, BridgeError::DisallowedScheme { .. }));
        assert_eq!(f.opener.opened.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_rejected_custom_theme_keeps_state() {
        let mut f = fixture();
        let before = f.hub.theme().clone();

        let draft = PaletteDraft {
            background: Some("#000000".into()),
            ..PaletteDraft::default()
        };
        let err = f.hub.set_theme(ThemeMode::Custom, Some(draft)).unwrap_err();
        assert!(matches!(err, ThemeError::IncompletePalette { .. }));
        assert_eq!(f.hub.theme(), &before);
    }
}
