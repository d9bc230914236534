//! # Content View
//!
//! Sandboxed frame showing the assembled page document, plus the host end
//! of the bridge.

use dioxus::prelude::*;
use infohub_core::bridge::host_listener_script;

use crate::state::AppState;

/// Element id of the content frame.
pub const FRAME_ID: &str = "content-frame";

/// Frame hosting the current document.
///
/// Messages posted by the document are received through a long-lived eval
/// and handed to [`AppState::receive`].
#[component]
pub fn ContentView() -> Element {
    let state = use_context::<AppState>();
    let page = state.document.read().clone();

    let listener = state.clone();
    use_future(move || {
        let state = listener.clone();
        async move {
            let mut eval = document::eval(&host_listener_script(FRAME_ID));
            loop {
                match eval.recv::<serde_json::Value>().await {
                    Ok(value) => state.receive(value),
                    Err(e) => {
                        tracing::error!(error = %e, "Bridge listener stopped");
                        break;
                    }
                }
            }
        }
    });

    rsx! {
        div {
            class: "content-panel",

            match page {
                Some(html) => rsx! {
                    iframe {
                        id: FRAME_ID,
                        class: "content-frame",
                        "sandbox": "allow-scripts allow-forms",
                        "srcdoc": "{html}",
                    }
                },
                None => rsx! {
                    div { class: "content-placeholder", "Loading Warframe Info Hub..." }
                },
            }
        }
    }
}
