//! Theme modes and custom palettes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Keys every custom palette must define.
pub const PALETTE_KEYS: [&str; 5] = ["background", "text", "button", "border", "highlight"];

/// Theme selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Built-in light scheme.
    #[default]
    Light,
    /// Built-in dark scheme.
    Dark,
    /// User-supplied five-colour palette.
    Custom,
}

impl ThemeMode {
    /// Stored name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognised mode names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownThemeMode(pub String);

impl fmt::Display for UnknownThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme '{}'", self.0)
    }
}

impl std::error::Error for UnknownThemeMode {}

impl FromStr for ThemeMode {
    type Err = UnknownThemeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "custom" => Ok(Self::Custom),
            other => Err(UnknownThemeMode(other.to_string())),
        }
    }
}

/// A complete custom palette.
///
/// Every key is present and holds a CSS colour; partial palettes cannot be
/// constructed. Build one from a [`PaletteDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PaletteDraft")]
pub struct Palette {
    background: String,
    text: String,
    button: String,
    border: String,
    highlight: String,
}

impl Palette {
    /// Window and page background.
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Buttons and code blocks.
    #[must_use]
    pub fn button(&self) -> &str {
        &self.button
    }

    /// Borders and separators.
    #[must_use]
    pub fn border(&self) -> &str {
        &self.border
    }

    /// Hover, selection and links.
    #[must_use]
    pub fn highlight(&self) -> &str {
        &self.highlight
    }
}

/// A palette being edited; any key may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteDraft {
    /// Background colour.
    pub background: Option<String>,
    /// Text colour.
    pub text: Option<String>,
    /// Button colour.
    pub button: Option<String>,
    /// Border colour.
    pub border: Option<String>,
    /// Highlight colour.
    pub highlight: Option<String>,
}

impl PaletteDraft {
    /// Returns the value for one of [`PALETTE_KEYS`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "background" => self.background.as_deref(),
            "text" => self.text.as_deref(),
            "button" => self.button.as_deref(),
            "border" => self.border.as_deref(),
            "highlight" => self.highlight.as_deref(),
            _ => None,
        }
    }

    /// Sets one of [`PALETTE_KEYS`]; unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let slot = match key {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "button" => &mut self.button,
            "border" => &mut self.border,
            "highlight" => &mut self.highlight,
            _ => return,
        };
        *slot = Some(value.into());
    }
}

impl From<&Palette> for PaletteDraft {
    fn from(palette: &Palette) -> Self {
        Self {
            background: Some(palette.background.clone()),
            text: Some(palette.text.clone()),
            button: Some(palette.button.clone()),
            border: Some(palette.border.clone()),
            highlight: Some(palette.highlight.clone()),
        }
    }
}

impl TryFrom<PaletteDraft> for Palette {
    type Error = ThemeError;

    fn try_from(draft: PaletteDraft) -> Result<Self, Self::Error> {
        let missing: Vec<&'static str> = PALETTE_KEYS
            .into_iter()
            .filter(|key| !draft.get(key).is_some_and(is_css_color))
            .collect();

        match draft {
            PaletteDraft {
                background: Some(background),
                text: Some(text),
                button: Some(button),
                border: Some(border),
                highlight: Some(highlight),
            } if missing.is_empty() => Ok(Self {
                background,
                text,
                button,
                border,
                highlight,
            }),
            _ => Err(ThemeError::IncompletePalette { missing }),
        }
    }
}

/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` and alphabetic keywords.
fn is_css_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else {
        !value.is_empty() && value.len() <= 32 && value.chars().all(|c| c.is_ascii_alphabetic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> PaletteDraft {
        PaletteDraft {
            background: Some("#101820".into()),
            text: Some("#f2aa4c".into()),
            button: Some("#1f2a36".into()),
            border: Some("#334455".into()),
            highlight: Some("goldenrod".into()),
        }
    }

    #[test]
    fn test_mode_round_trips_through_str() {
        for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Custom] {
            assert_eq!(mode.as_str().parse::<ThemeMode>().unwrap(), mode);
        }
        assert!("solarized".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_complete_draft_builds_palette() {
        let palette = Palette::try_from(full_draft()).unwrap();
        assert_eq!(palette.background(), "#101820");
        assert_eq!(palette.highlight(), "goldenrod");
    }

    #[test]
    fn test_missing_keys_are_reported() {
        let mut draft = full_draft();
        draft.border = None;
        draft.highlight = None;

        let err = Palette::try_from(draft).unwrap_err();
        match err {
            ThemeError::IncompletePalette { missing } => {
                assert_eq!(missing, vec!["border", "highlight"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_colours_are_rejected() {
        for bad in ["", "#12", "#ggg", "red; } body { display:none", "rgb(1,2,3)"] {
            let mut draft = full_draft();
            draft.text = Some(bad.into());
            assert!(Palette::try_from(draft).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_palette_deserialize_requires_all_keys() {
        let partial = serde_json::json!({
            "background": "#000000",
            "text": "#ffffff",
            "button": "#111111",
            "border": "#222222"
        });
        assert!(serde_json::from_value::<Palette>(partial).is_err());

        let full = serde_json::json!({
            "background": "#000000",
            "text": "#ffffff",
            "button": "#111111",
            "border": "#222222",
            "highlight": "#333333",
            "extra": "ignored"
        });
        let palette: Palette = serde_json::from_value(full).unwrap();
        assert_eq!(palette.border(), "#222222");
    }

    #[test]
    fn test_draft_set_and_get() {
        let mut draft = PaletteDraft::default();
        draft.set("button", "#abcdef");
        draft.set("unknown", "#000");
        assert_eq!(draft.get("button"), Some("#abcdef"));
        assert_eq!(draft.get("unknown"), None);

        let palette = Palette::try_from(full_draft()).unwrap();
        assert_eq!(PaletteDraft::from(&palette), full_draft());
    }
}
