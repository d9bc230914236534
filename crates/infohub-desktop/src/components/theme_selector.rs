//! # Theme Selector Component

use dioxus::prelude::*;
use infohub_core::ThemeMode;

use super::CustomThemeDialog;
use crate::state::AppState;

const SELECT_ID: &str = "theme-select";

/// Light, dark and custom theme picker.
///
/// Choosing custom opens the palette editor; the mode only changes once a
/// complete palette is applied there.
#[component]
pub fn ThemeSelector() -> Element {
    let state = use_context::<AppState>();
    let mut editing = use_signal(|| false);
    let theme_mode = state.theme_mode;
    let mode = *theme_mode.read();

    let on_change = move |evt: FormEvent| match evt.value().parse::<ThemeMode>() {
        Ok(ThemeMode::Custom) => editing.set(true),
        Ok(mode) => {
            if let Err(e) = state.apply_theme(mode, None) {
                tracing::error!(error = %e, "Failed to change theme");
                state.report(&e);
            }
        }
        Err(e) => tracing::warn!(error = %e, "Unknown theme selected"),
    };

    // A cancelled dialog leaves the control on "custom" while the mode is
    // unchanged, so put the control back in step with the mode.
    let on_close = move |()| {
        editing.set(false);
        let eval = document::eval(&select_value_script(*theme_mode.peek()));
        spawn(async move {
            if let Err(e) = eval.await {
                tracing::warn!(error = %e, "Failed to reset theme selector");
            }
        });
    };

    rsx! {
        div {
            class: "theme-selector",

            label { r#for: SELECT_ID, "Theme" }

            select {
                id: SELECT_ID,
                value: "{mode}",
                onchange: on_change,
                option { value: "light", selected: mode == ThemeMode::Light, "Light" }
                option { value: "dark", selected: mode == ThemeMode::Dark, "Dark" }
                option { value: "custom", selected: mode == ThemeMode::Custom, "Custom..." }
            }

            if mode == ThemeMode::Custom {
                button {
                    class: "btn-sm",
                    onclick: move |_| editing.set(true),
                    "Edit colours"
                }
            }

            if editing() {
                CustomThemeDialog { on_close }
            }
        }
    }
}

/// Script setting the selector's shown value to `mode`.
fn select_value_script(mode: ThemeMode) -> String {
    format!(
        "document.getElementById({id}).value = {value};\nreturn true;",
        id = serde_json::Value::from(SELECT_ID),
        value = serde_json::Value::from(mode.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_value_script_targets_selector() {
        let script = select_value_script(ThemeMode::Dark);
        assert!(script.contains(r#"document.getElementById("theme-select")"#));
        assert!(script.contains(r#".value = "dark";"#));

        let script = select_value_script(ThemeMode::Light);
        assert!(script.contains(r#".value = "light";"#));
    }
}
