//! # Theme Manager
//!
//! Holds the active theme, persists it and derives the stylesheets for the
//! native shell and the embedded page.
//!
//! ```text
//! Light <-> Dark
//!   ^        ^
//!   +- Custom (entered only with a complete palette)
//! ```
//!
//! A theme change never re-fetches page content: the caller injects the new
//! [`EmbeddedOverride`] into the current document through the bridge.

mod palette;
mod store;
mod styles;

pub use palette::{Palette, PaletteDraft, ThemeMode, UnknownThemeMode, PALETTE_KEYS};
pub use store::{PersistedTheme, SettingsStore};
pub use styles::{derive_embedded_override, native_stylesheet, EmbeddedOverride, PlatformFont};

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{PersistenceError, ThemeError};

/// The active theme.
///
/// The palette is present exactly when the mode is [`ThemeMode::Custom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    selection: Selection,
    native_stylesheet: String,
    saved_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    Light,
    Dark,
    Custom(Palette),
}

impl Selection {
    fn mode(&self) -> ThemeMode {
        match self {
            Self::Light => ThemeMode::Light,
            Self::Dark => ThemeMode::Dark,
            Self::Custom(_) => ThemeMode::Custom,
        }
    }

    fn palette(&self) -> Option<&Palette> {
        match self {
            Self::Custom(palette) => Some(palette),
            Self::Light | Self::Dark => None,
        }
    }
}

impl ThemeState {
    fn new(selection: Selection, font: PlatformFont, saved_at: Option<u64>) -> Self {
        let native_stylesheet = native_stylesheet(selection.mode(), selection.palette(), font);
        Self {
            selection,
            native_stylesheet,
            saved_at,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.selection.mode()
    }

    /// Custom palette, present only in custom mode.
    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        self.selection.palette()
    }

    /// Stylesheet for the native shell.
    #[must_use]
    pub fn native_stylesheet(&self) -> &str {
        &self.native_stylesheet
    }

    /// When this state was last persisted (unix seconds).
    #[must_use]
    pub fn saved_at(&self) -> Option<u64> {
        self.saved_at
    }

    /// Override for the embedded page.
    #[must_use]
    pub fn embedded_override(&self) -> EmbeddedOverride {
        derive_embedded_override(self.mode(), self.palette())
    }

    fn to_record(&self) -> PersistedTheme {
        PersistedTheme {
            theme: self.mode().as_str().to_string(),
            stylesheet: self.native_stylesheet.clone(),
            custom_theme: self
                .palette()
                .and_then(|palette| serde_json::to_value(palette).ok()),
            saved_at: self.saved_at,
        }
    }
}

/// Owns the theme state and its persistent record.
#[derive(Debug)]
pub struct ThemeManager {
    state: ThemeState,
    store: SettingsStore,
    font: PlatformFont,
}

impl ThemeManager {
    /// Loads the persisted theme.
    ///
    /// Never fails: a missing, unreadable or malformed record, an unknown
    /// mode, or an incomplete custom palette all give the light theme. On
    /// first run the default record is written.
    #[must_use]
    pub fn load_persisted(store: SettingsStore, font: PlatformFont) -> Self {
        let (selection, saved_at) = match store.read() {
            Ok(Some(record)) => (Self::selection_from(&record, font), record.saved_at),
            Ok(None) => {
                tracing::debug!(path = ?store.path(), "No theme record, using light theme");
                let state = ThemeState::new(Selection::Light, font, now());
                if let Err(e) = store.write(&state.to_record()) {
                    tracing::warn!(error = %e, "Failed to write default theme record");
                }
                return Self { state, store, font };
            }
            Err(e) => {
                tracing::warn!(path = ?store.path(), error = %e, "Failed to load theme, using light theme");
                (Selection::Light, None)
            }
        };

        let state = ThemeState::new(selection, font, saved_at);
        tracing::info!(theme = %state.mode(), "Loaded theme");
        Self { state, store, font }
    }

    fn selection_from(record: &PersistedTheme, font: PlatformFont) -> Selection {
        let selection = match record.theme.parse::<ThemeMode>() {
            Ok(ThemeMode::Light) => Selection::Light,
            Ok(ThemeMode::Dark) => Selection::Dark,
            Ok(ThemeMode::Custom) => {
                let palette = record
                    .custom_theme
                    .clone()
                    .map(serde_json::from_value::<Palette>);
                match palette {
                    Some(Ok(palette)) => Selection::Custom(palette),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Stored custom theme is incomplete, using light theme");
                        Selection::Light
                    }
                    None => {
                        tracing::warn!("Custom theme selected but no palette stored, using light theme");
                        Selection::Light
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unknown stored theme, using light theme");
                Selection::Light
            }
        };

        if native_stylesheet(selection.mode(), selection.palette(), font) != record.stylesheet {
            tracing::debug!("Stored stylesheet is stale, re-derived");
        }
        selection
    }

    /// The active theme.
    #[must_use]
    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    /// Override for the embedded page under the active theme.
    #[must_use]
    pub fn embedded_override(&self) -> EmbeddedOverride {
        self.state.embedded_override()
    }

    /// Switches theme and persists it.
    ///
    /// `palette` is required for [`ThemeMode::Custom`] and ignored otherwise.
    /// The record is written before the in-memory state changes, so on error
    /// the active theme is untouched.
    ///
    /// # Errors
    ///
    /// * [`ThemeError::IncompletePalette`] - custom mode without a complete,
    ///   valid palette
    /// * [`ThemeError::Persistence`] - the record could not be written
    pub fn set_theme(
        &mut self,
        mode: ThemeMode,
        palette: Option<PaletteDraft>,
    ) -> Result<&ThemeState, ThemeError> {
        let selection = match mode {
            ThemeMode::Light => Selection::Light,
            ThemeMode::Dark => Selection::Dark,
            ThemeMode::Custom => {
                let draft = palette.ok_or_else(|| ThemeError::IncompletePalette {
                    missing: PALETTE_KEYS.to_vec(),
                })?;
                Selection::Custom(Palette::try_from(draft)?)
            }
        };

        let next = ThemeState::new(selection, self.font, now());
        self.persist(&next)?;

        tracing::info!(from = %self.state.mode(), to = %next.mode(), "Theme changed");
        self.state = next;
        Ok(&self.state)
    }

    fn persist(&self, state: &ThemeState) -> Result<(), PersistenceError> {
        self.store.write(&state.to_record())
    }
}

fn now() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}
