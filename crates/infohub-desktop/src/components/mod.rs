//! # UI Components
//!
//! UI components for the Warframe Info Hub window:
//! - [`Layout`] - Application shell
//! - [`Sidebar`] - Menu tree
//! - [`ThemeSelector`] - Theme picker
//! - [`CustomThemeDialog`] - Palette editor
//! - [`ContentView`] - Frame hosting the page document

mod content_view;
mod custom_theme_dialog;
mod layout;
mod sidebar;
mod theme_selector;

pub use content_view::{ContentView, FRAME_ID};
pub use custom_theme_dialog::CustomThemeDialog;
pub use layout::Layout;
pub use sidebar::Sidebar;
pub use theme_selector::ThemeSelector;
