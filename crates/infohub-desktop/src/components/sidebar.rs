//! # Sidebar Component
//!
//! Menu tree and theme picker.

use dioxus::prelude::*;
use infohub_core::{main_menu, MenuEntry, MenuNode};

use super::ThemeSelector;
use crate::state::AppState;

/// Navigation sidebar.
#[component]
pub fn Sidebar() -> Element {
    let menu = use_hook(main_menu);

    rsx! {
        nav {
            class: "sidebar",

            div {
                class: "sidebar-brand",
                "Warframe Info Hub"
            }

            ul {
                class: "menu-tree",
                for entry in menu {
                    MenuRow { key: "{entry.label}", entry }
                }
            }

            ThemeSelector {}
        }
    }
}

/// One menu row; groups render their children expanded.
#[component]
fn MenuRow(entry: MenuEntry) -> Element {
    let state = use_context::<AppState>();

    match entry.node {
        MenuNode::Item(action) => {
            let selected = state.selected.read().as_ref() == Some(&action);
            let class = if selected {
                "menu-item selected"
            } else {
                "menu-item"
            };

            rsx! {
                li {
                    class: "{class}",
                    onclick: move |_| state.navigate(action.clone()),
                    "{entry.label}"
                }
            }
        }
        MenuNode::Group(children) => rsx! {
            li {
                class: "menu-group",
                details {
                    open: true,
                    summary { class: "menu-item", "{entry.label}" }
                    ul {
                        for child in children {
                            MenuRow { key: "{child.label}", entry: child }
                        }
                    }
                }
            }
        },
    }
}
