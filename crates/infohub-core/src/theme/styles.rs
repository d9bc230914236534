//! Stylesheets derived from a theme.
//!
//! Two surfaces are styled: the native shell (sidebar, buttons, content
//! panel) and the embedded page, which receives an override ruleset through
//! the bridge.

use crate::bridge::NativeMessage;

use super::palette::{Palette, ThemeMode};

/// Default UI font for the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformFont {
    /// CSS font family.
    pub family: &'static str,
    /// Size in points.
    pub size_pt: u8,
}

impl PlatformFont {
    /// Font for the platform this binary was built for.
    #[must_use]
    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    /// Font for a `std::env::consts::OS` value.
    #[must_use]
    pub fn for_os(os: &str) -> Self {
        match os {
            "windows" => Self {
                family: "'Segoe UI'",
                size_pt: 9,
            },
            "macos" => Self {
                family: "-apple-system, BlinkMacSystemFont",
                size_pt: 13,
            },
            "linux" => Self {
                family: "Ubuntu, Arial",
                size_pt: 11,
            },
            _ => Self {
                family: "Arial",
                size_pt: 10,
            },
        }
    }
}

/// Colours of the native shell.
struct ShellColors<'a> {
    background: &'a str,
    text: &'a str,
    button: &'a str,
    button_border: &'a str,
    menu_border: &'a str,
    menu_background: &'a str,
    menu_text: &'a str,
    item_border: &'a str,
    hover: &'a str,
    selected_background: &'a str,
    selected_text: &'a str,
    panel: &'a str,
}

const LIGHT_SHELL: ShellColors<'static> = ShellColors {
    background: "#ffffff",
    text: "#000000",
    button: "#e0e0e0",
    button_border: "#b0b0b0",
    menu_border: "#d0d0d0",
    menu_background: "#f0f0f0",
    menu_text: "#333333",
    item_border: "#e0e0e0",
    hover: "#e0e0e0",
    selected_background: "#a0a0a0",
    selected_text: "#ffffff",
    panel: "#ffffff",
};

const DARK_SHELL: ShellColors<'static> = ShellColors {
    background: "#2b2b2b",
    text: "#ffffff",
    button: "#3b3b3b",
    button_border: "#505050",
    menu_border: "#505050",
    menu_background: "#1b1b1b",
    menu_text: "#e0e0e0",
    item_border: "#3b3b3b",
    hover: "#3b3b3b",
    selected_background: "#505050",
    selected_text: "#ffffff",
    panel: "#2b2b2b",
};

impl<'a> ShellColors<'a> {
    fn custom(palette: &'a Palette) -> Self {
        Self {
            background: palette.background(),
            text: palette.text(),
            button: palette.button(),
            button_border: palette.border(),
            menu_border: palette.border(),
            menu_background: palette.background(),
            menu_text: palette.text(),
            item_border: palette.border(),
            hover: palette.highlight(),
            selected_background: palette.highlight(),
            selected_text: palette.text(),
            panel: palette.background(),
        }
    }
}

/// Builds the native shell stylesheet.
///
/// `palette` is only consulted for [`ThemeMode::Custom`]; a custom mode
/// without one renders the light scheme.
#[must_use]
pub fn native_stylesheet(mode: ThemeMode, palette: Option<&Palette>, font: PlatformFont) -> String {
    let c = match (mode, palette) {
        (ThemeMode::Dark, _) => DARK_SHELL,
        (ThemeMode::Custom, Some(palette)) => ShellColors::custom(palette),
        (ThemeMode::Light | ThemeMode::Custom, _) => LIGHT_SHELL,
    };

    format!(
        "body, .app-layout, .dialog {{ font-family: {family}; font-size: {size}pt; background-color: {bg}; color: {text}; }}
button {{ background-color: {button}; color: {text}; border: 1px solid {button_border}; padding: 5px; }}
.sidebar {{ background-color: {menu_bg}; }}
.menu-tree {{ border: 1px solid {menu_border}; background-color: {menu_bg}; color: {menu_text}; }}
.menu-item {{ padding: 10px; border-bottom: 1px solid {item_border}; }}
.menu-item:hover {{ background-color: {hover}; }}
.menu-item.selected {{ background-color: {selected_bg}; color: {selected_text}; }}
.content-panel, .content-frame {{ background-color: {panel}; }}
",
        family = font.family,
        size = font.size_pt,
        bg = c.background,
        text = c.text,
        button = c.button,
        button_border = c.button_border,
        menu_bg = c.menu_background,
        menu_border = c.menu_border,
        menu_text = c.menu_text,
        item_border = c.item_border,
        hover = c.hover,
        selected_bg = c.selected_background,
        selected_text = c.selected_text,
        panel = c.panel,
    )
}

/// Override injected into the embedded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedOverride {
    /// Ruleset replacing the previously injected one.
    pub css: String,
    /// Script run after the ruleset is applied.
    pub js: String,
}

impl From<EmbeddedOverride> for NativeMessage {
    fn from(value: EmbeddedOverride) -> Self {
        NativeMessage::ApplyThemeOverride {
            css: value.css,
            js: value.js,
        }
    }
}

/// Derives the embedded override for a theme.
///
/// Light and dark use fixed colours; custom maps background and text
/// directly, links to the highlight, and code blocks to button and border.
#[must_use]
pub fn derive_embedded_override(mode: ThemeMode, palette: Option<&Palette>) -> EmbeddedOverride {
    let (mode, [background, text, link, code_background, code_border]) = match (mode, palette) {
        (ThemeMode::Dark, _) => (mode, ["#2b2b2b", "#ffffff", "#4da6ff", "#3b3b3b", "#505050"]),
        (ThemeMode::Custom, Some(p)) => (
            mode,
            [p.background(), p.text(), p.highlight(), p.button(), p.border()],
        ),
        (ThemeMode::Light | ThemeMode::Custom, _) => (
            ThemeMode::Light,
            ["#ffffff", "#000000", "#0066cc", "#f0f0f0", "#d0d0d0"],
        ),
    };

    let css = format!(
        "body {{ background-color: {background}; color: {text}; }}
a {{ color: {link}; }}
pre, code {{ background-color: {code_background}; border-color: {code_border}; }}
"
    );
    let js = format!(
        "document.documentElement.setAttribute(\"data-infohub-theme\", \"{mode}\");
if (typeof window.onThemeChange === \"function\") {{ window.onThemeChange(\"{mode}\"); }}"
    );

    EmbeddedOverride { css, js }
}
