//! # Native/Embedded Bridge
//!
//! One typed channel between the host and the embedded page.
//!
//! The embedded document talks to the host through `postMessage` envelopes
//! tagged with [`CHANNEL`]. Remote page scripts only ever see the object
//! exposed as `window.pyotherside`, whose single method `open_url` is the
//! one privileged capability granted to remote content.
//!
//! ```text
//! embedded page                         host
//! -------------                         ----
//! pyotherside.open_url(u)  --open_url-->  Bridge::handle -> UrlOpener
//! channel opened           --bridge_ready--> reply ApplyThemeOverride
//! console.*                --console-->   tracing
//! poll cap reached         --bridge_timeout--> BridgeError::InitTimeout
//!                          <--apply_theme_override-- ThemeManager
//! ```

use std::sync::Arc;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Envelope tag shared by both directions.
pub const CHANNEL: &str = "infohub";

/// Global name the bridge object is exposed under in the page.
///
/// Existing remote scripts call `window.pyotherside.open_url(...)`.
pub const BRIDGE_OBJECT_NAME: &str = "pyotherside";

/// Constructor the transport script defines in the page.
pub const TRANSPORT_GLOBAL: &str = "InfoHubChannel";

/// Source of the bridge transport loaded by every assembled document.
pub const TRANSPORT_SCRIPT: &str = include_str!("../assets/transport.js");

/// Schemes `open_url` will hand to the operating system.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Messages sent by the embedded document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbeddedMessage {
    /// The page asked to open a link in the default browser.
    OpenUrl {
        /// URL as supplied by the page.
        url: String,
    },
    /// The transport loaded and the bridge object is exposed.
    BridgeReady,
    /// The bootstrap gave up waiting for the transport.
    BridgeTimeout {
        /// Polls made before giving up.
        attempts: u32,
    },
    /// Console output forwarded from the page.
    Console {
        /// Console method that was called.
        level: ConsoleLevel,
        /// Joined arguments.
        message: String,
    },
}

/// Console method names forwarded by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    /// `console.log`
    Log,
    /// `console.info`
    Info,
    /// `console.warn`
    Warn,
    /// `console.error`
    Error,
}

/// Messages the host pushes into the embedded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NativeMessage {
    /// Replace the injected theme style and run the theme script.
    ApplyThemeOverride {
        /// Override stylesheet.
        css: String,
        /// Script run after the stylesheet is swapped.
        js: String,
    },
}

#[derive(Serialize)]
struct Envelope<'a> {
    channel: &'static str,
    #[serde(flatten)]
    message: &'a NativeMessage,
}

impl NativeMessage {
    /// Serializes the message with its channel envelope.
    #[must_use]
    pub fn to_wire(&self) -> String {
        let envelope = Envelope {
            channel: CHANNEL,
            message: self,
        };
        // A struct of strings always serializes.
        serde_json::to_string(&envelope).unwrap_or_default()
    }
}

/// Parses a raw value received from the host listener.
///
/// # Errors
///
/// Returns the serde error when the value is not a known message.
pub fn parse_message(value: serde_json::Value) -> Result<EmbeddedMessage, serde_json::Error> {
    serde_json::from_value(value)
}

/// Hands URLs to the operating system.
pub trait UrlOpener: Send + Sync {
    /// Opens `url` with the default handler.
    ///
    /// # Errors
    ///
    /// Returns the launcher's I/O error.
    fn open(&self, url: &Url) -> std::io::Result<()>;
}

/// Opens URLs with the desktop's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &Url) -> std::io::Result<()> {
        open::that(url.as_str())
    }
}

/// Host side of the bridge.
#[derive(Clone)]
pub struct Bridge {
    opener: Arc<dyn UrlOpener>,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge").finish_non_exhaustive()
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(Arc::new(SystemOpener))
    }
}

impl Bridge {
    /// Creates a bridge that opens links through `opener`.
    #[must_use]
    pub fn new(opener: Arc<dyn UrlOpener>) -> Self {
        Self { opener }
    }

    /// Handles one message from the embedded document.
    ///
    /// `current_theme` is the override to send back when the page reports
    /// its channel as ready.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] for rejected or failed `open_url` calls and
    /// for bootstrap timeouts.
    pub fn handle(
        &self,
        message: EmbeddedMessage,
        current_theme: impl FnOnce() -> NativeMessage,
    ) -> Result<Option<NativeMessage>, BridgeError> {
        match message {
            EmbeddedMessage::OpenUrl { url } => {
                self.open_external_url(&url)?;
                Ok(None)
            }
            EmbeddedMessage::BridgeReady => {
                tracing::debug!("Bridge channel ready, applying theme");
                Ok(Some(current_theme()))
            }
            EmbeddedMessage::BridgeTimeout { attempts } => {
                tracing::error!(attempts, "Embedded bridge failed to initialise");
                Err(BridgeError::InitTimeout { attempts })
            }
            EmbeddedMessage::Console { level, message } => {
                match level {
                    ConsoleLevel::Error => tracing::error!(target: "infohub::page", "{message}"),
                    ConsoleLevel::Warn => tracing::warn!(target: "infohub::page", "{message}"),
                    ConsoleLevel::Log | ConsoleLevel::Info => {
                        tracing::debug!(target: "infohub::page", "{message}");
                    }
                }
                Ok(None)
            }
        }
    }

    /// Opens an external link requested by the page.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the URL is malformed, not http(s), or the
    /// OS handler fails.
    pub fn open_external_url(&self, raw: &str) -> Result<(), BridgeError> {
        let url = Url::parse(raw).map_err(|e| BridgeError::InvalidUrl {
            url: raw.to_string(),
            message: e.to_string(),
        })?;

        if !ALLOWED_SCHEMES.contains(&url.scheme()) {
            tracing::warn!(url = raw, "Rejected open_url request");
            return Err(BridgeError::DisallowedScheme {
                scheme: url.scheme().to_string(),
            });
        }

        self.opener.open(&url).map_err(|source| BridgeError::Open {
            url: url.to_string(),
            source,
        })?;
        tracing::info!(%url, "Opened external URL");
        Ok(())
    }
}

/// Host-side script that forwards messages from the content frame.
///
/// Run through the webview's eval channel; each accepted message is handed
/// to `dioxus.send`.
#[must_use]
pub fn host_listener_script(frame_id: &str) -> String {
    format!(
        r#"window.addEventListener("message", function (event) {{
    var frame = document.getElementById({frame});
    if (!frame || event.source !== frame.contentWindow) {{
        return;
    }}
    var data = event.data;
    if (data && data.channel === {channel}) {{
        dioxus.send(data);
    }}
}});
await new Promise(function () {{}});"#,
        frame = js_string(frame_id),
        channel = js_string(CHANNEL),
    )
}

/// Host-side script that posts `message` into the content frame.
///
/// The script throws when the frame is missing, so the failure surfaces as
/// an error from the evaluation.
#[must_use]
pub fn post_to_frame_script(frame_id: &str, message: &NativeMessage) -> String {
    format!(
        r#"var frame = document.getElementById({frame});
if (!frame || !frame.contentWindow) {{
    throw new Error("content frame not available for bridge message");
}}
frame.contentWindow.postMessage({payload}, "*");
return true;"#,
        frame = js_string(frame_id),
        payload = message.to_wire(),
    )
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Opener that records URLs instead of launching anything.
    #[derive(Default)]
    pub struct RecordingOpener {
        pub opened: Mutex<Vec<String>>,
    }

    impl UrlOpener for RecordingOpener {
        fn open(&self, url: &Url) -> std::io::Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingOpener;
    use super::*;

    fn theme() -> NativeMessage {
        NativeMessage::ApplyThemeOverride {
            css: "body { color: red; }".into(),
            js: String::new(),
        }
    }

    fn bridge() -> (Bridge, Arc<RecordingOpener>) {
        let opener = Arc::new(RecordingOpener::default());
        (Bridge::new(opener.clone()), opener)
    }

    #[test]
    fn test_open_url_hands_https_to_opener() {
        let (bridge, opener) = bridge();
        let msg = parse_message(serde_json::json!({
            "channel": "infohub",
            "kind": "open_url",
            "url": "https://warframe.fandom.com/wiki/Baro_Ki%27Teer"
        }))
        .unwrap();

        assert_eq!(bridge.handle(msg, theme).unwrap(), None);
        assert_eq!(
            *opener.opened.lock().unwrap(),
            vec!["https://warframe.fandom.com/wiki/Baro_Ki%27Teer".to_string()]
        );
    }

    #[test]
    fn test_open_url_rejects_other_schemes() {
        let (bridge, opener) = bridge();

        for url in ["file:///etc/passwd", "javascript:alert(1)", "ftp://example.com/"] {
            let err = bridge.open_external_url(url).unwrap_err();
            assert!(matches!(err, BridgeError::DisallowedScheme { .. }), "{url}");
        }
        assert!(matches!(
            bridge.open_external_url("not a url"),
            Err(BridgeError::InvalidUrl { .. })
        ));
        assert!(opener.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_bridge_ready_replies_with_theme() {
        let (bridge, _) = bridge();
        let reply = bridge.handle(EmbeddedMessage::BridgeReady, theme).unwrap();
        assert_eq!(reply, Some(theme()));
    }

    #[test]
    fn test_bridge_timeout_is_reported() {
        let (bridge, _) = bridge();
        let msg = parse_message(serde_json::json!({"kind": "bridge_timeout", "attempts": 100}))
            .unwrap();
        let err = bridge.handle(msg, theme).unwrap_err();
        assert!(matches!(err, BridgeError::InitTimeout { attempts: 100 }));
    }

    #[test]
    fn test_console_message_parses() {
        let msg = parse_message(serde_json::json!({
            "channel": "infohub",
            "kind": "console",
            "level": "warn",
            "message": "slow API"
        }))
        .unwrap();
        assert_eq!(
            msg,
            EmbeddedMessage::Console {
                level: ConsoleLevel::Warn,
                message: "slow API".into()
            }
        );
        let (bridge, _) = bridge();
        assert_eq!(bridge.handle(msg, theme).unwrap(), None);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(parse_message(serde_json::json!({"kind": "exec", "code": "rm -rf"})).is_err());
    }

    #[test]
    fn test_native_message_wire_format() {
        let wire: serde_json::Value = serde_json::from_str(&theme().to_wire()).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({
                "channel": "infohub",
                "kind": "apply_theme_override",
                "css": "body { color: red; }",
                "js": ""
            })
        );
    }

    #[test]
    fn test_frame_scripts_quote_frame_id() {
        let post = post_to_frame_script("content-frame", &theme());
        assert!(post.contains(r#"document.getElementById("content-frame")"#));
        assert!(post.contains(r#""kind":"apply_theme_override""#));
        assert!(post.contains("throw new Error"));
        assert!(!post.contains("console.warn"));

        let listen = host_listener_script("content-frame");
        assert!(listen.contains("dioxus.send(data)"));
        assert!(listen.contains(r#"data.channel === "infohub""#));
    }

    #[test]
    fn test_transport_exposes_bridge_object() {
        assert!(TRANSPORT_SCRIPT.contains(TRANSPORT_GLOBAL));
        assert!(TRANSPORT_SCRIPT.contains(BRIDGE_OBJECT_NAME));
        assert!(TRANSPORT_SCRIPT.contains("open_url"));
        assert!(TRANSPORT_SCRIPT.contains("infohub-theme-override"));
    }
}
