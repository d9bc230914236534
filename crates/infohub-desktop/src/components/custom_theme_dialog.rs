//! # Custom Theme Dialog
//!
//! Five-colour palette editor.

use dioxus::prelude::*;
use infohub_core::theme::PALETTE_KEYS;
use infohub_core::{PaletteDraft, ThemeMode};

use crate::state::AppState;

/// Starting colours when no custom palette exists yet.
const DEFAULT_COLOURS: [&str; 5] = ["#2b2b2b", "#ffffff", "#3b3b3b", "#505050", "#4da6ff"];

/// Palette editor. Applying validates the palette; errors stay in the
/// dialog and leave the theme unchanged.
#[component]
pub fn CustomThemeDialog(on_close: EventHandler<()>) -> Element {
    let state = use_context::<AppState>();
    let initial = state.palette_draft().unwrap_or_else(default_draft);
    let mut draft = use_signal(move || initial);
    let mut error = use_signal(|| Option::<String>::None);

    let rows: Vec<(&'static str, &'static str, String)> = PALETTE_KEYS
        .into_iter()
        .map(|key| {
            let value = draft.read().get(key).unwrap_or_default().to_string();
            (key, label(key), value)
        })
        .collect();

    let on_apply = move |_| {
        let palette = draft.read().clone();
        match state.apply_theme(ThemeMode::Custom, Some(palette)) {
            Ok(()) => on_close.call(()),
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    rsx! {
        div {
            class: "dialog-backdrop",

            div {
                class: "dialog",

                h3 { class: "mb-md", "Custom theme" }

                for (key, text, value) in rows {
                    div {
                        key: "{key}",
                        class: "colour-row",
                        label { r#for: "colour-{key}", "{text}" }
                        input {
                            id: "colour-{key}",
                            r#type: "color",
                            value: "{value}",
                            oninput: move |evt| draft.write().set(key, evt.value()),
                        }
                    }
                }

                if let Some(message) = error() {
                    div { class: "alert alert-error", "{message}" }
                }

                div {
                    class: "btn-group",
                    button { class: "btn-primary", onclick: on_apply, "Apply" }
                    button { class: "btn-ghost", onclick: move |_| on_close.call(()), "Cancel" }
                }
            }
        }
    }
}

fn default_draft() -> PaletteDraft {
    let mut draft = PaletteDraft::default();
    for (key, colour) in PALETTE_KEYS.into_iter().zip(DEFAULT_COLOURS) {
        draft.set(key, colour);
    }
    draft
}

fn label(key: &str) -> &'static str {
    match key {
        "background" => "Background",
        "text" => "Text",
        "button" => "Buttons",
        "border" => "Borders",
        "highlight" => "Highlight",
        _ => "Colour",
    }
}
