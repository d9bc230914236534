//! # Warframe Info Hub Core
//!
//! Content loading and theming pipeline behind the Warframe Info Hub
//! desktop client:
//! - Fetching page fragments from the raw-content origin
//! - Rendering the Markdown landing page
//! - Assembling fragments into documents with a bridge bootstrap
//! - Messaging between the native shell and the embedded document
//! - Light, dark and custom themes with persistence
//! - Page navigation with superseded-load detection
//!
//! The crate has no GUI dependency; the desktop binary drives a [`Hub`].

pub mod assembler;
pub mod bridge;
pub mod config;
pub mod error;
pub mod fetch;
pub mod hub;
pub mod markdown;
pub mod menu;
pub mod navigation;
pub mod paths;
pub mod theme;

pub use assembler::{AssembledDocument, Assembler};
pub use bridge::{Bridge, EmbeddedMessage, NativeMessage};
pub use config::{BridgeSettings, HubConfig};
pub use error::{
    BridgeError, FetchError, InvalidPageId, NavigationError, PersistenceError, StartupError,
    ThemeError,
};
pub use fetch::{RemoteFetcher, ResourceSource};
pub use hub::{Hub, Presentation, ThemeChange};
pub use markdown::render_markdown;
pub use menu::{main_menu, MenuEntry, MenuNode};
pub use navigation::{MenuAction, NavigationTicket, Navigator, PageId, PageLoad};
pub use paths::AppPaths;
pub use theme::{Palette, PaletteDraft, ThemeMode, ThemeState};
