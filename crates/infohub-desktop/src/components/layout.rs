//! # Layout Component
//!
//! Main application layout.

use dioxus::prelude::*;

use super::{ContentView, Sidebar};
use crate::state::AppState;

/// Application shell.
///
/// The native stylesheet is emitted here so every theme change restyles the
/// whole window.
///
/// # Structure
///
/// ```text
/// +--------------------------------------------+
/// | Sidebar   |  Status bar                    |
/// |           |--------------------------------|
/// |  Menu     |                                |
/// |  tree     |  Content frame                 |
/// |           |                                |
/// |  Theme    |                                |
/// +--------------------------------------------+
/// ```
#[component]
pub fn Layout() -> Element {
    let state = use_context::<AppState>();
    let stylesheet = state.native_stylesheet.read().clone();
    let status = state.bridge_status.read().label();
    let error = state.last_error.read().clone();
    let loading = *state.loading.read();

    rsx! {
        style { id: "infohub-native-style", "{stylesheet}" }

        div {
            class: "app-layout",

            Sidebar {}

            div {
                class: "main-panel",

                div {
                    class: "status-bar",

                    if loading {
                        span { class: "status-loading", "Loading..." }
                    } else {
                        span { class: "status-text", "{status}" }
                    }
                }

                if let Some(message) = error {
                    div {
                        class: "alert alert-error",
                        span { "{message}" }
                        button {
                            class: "btn-sm btn-ghost",
                            onclick: move |_| state.clear_error(),
                            "Dismiss"
                        }
                    }
                }

                ContentView {}
            }
        }
    }
}
