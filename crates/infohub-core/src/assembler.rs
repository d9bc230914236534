//! # Document Assembler
//!
//! Wraps fetched fragments in a self-contained HTML document with the
//! bridge bootstrap.
//!
//! The transport script and the page's own script load with no ordering
//! guarantee, so the bootstrap polls for the transport every
//! `poll_interval_ms` and gives up after `max_attempts`, posting a
//! `bridge_timeout` message to the host.

use askama::Template;

use crate::bridge::{BRIDGE_OBJECT_NAME, CHANNEL, TRANSPORT_GLOBAL, TRANSPORT_SCRIPT};
use crate::config::{BridgeSettings, DEFAULT_JQUERY_URL};

/// Title of every assembled document.
pub const DOCUMENT_TITLE: &str = "Warframe Info Hub";

/// Optional page function called once the bridge is ready.
pub const PAGE_READY_HOOK: &str = "initSearch";

/// Served when even the error template fails to render.
const FALLBACK_ERROR_DOCUMENT: &str =
    "<!DOCTYPE html><html><body><h1>Error</h1><p>The page could not be displayed.</p></body></html>";

#[derive(Template)]
#[template(path = "document.html")]
struct DocumentTemplate<'a> {
    title: &'a str,
    base_url: &'a str,
    jquery_url: &'a str,
    transport: &'a str,
    style: &'a str,
    script: &'a str,
    body: &'a str,
    poll_interval_ms: u32,
    max_attempts: u32,
    transport_global: &'a str,
    bridge_object: &'a str,
    ready_hook: &'a str,
    channel: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    title: &'a str,
    message: &'a str,
}

/// A complete document ready for the embedded view.
///
/// Built fresh on every navigation and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    html: String,
}

impl AssembledDocument {
    /// The document markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Consumes the document, returning its markup.
    #[must_use]
    pub fn into_string(self) -> String {
        self.html
    }
}

/// Builds documents for one content origin.
#[derive(Debug, Clone)]
pub struct Assembler {
    base_url: String,
    jquery_url: String,
    bridge: BridgeSettings,
}

impl Assembler {
    /// Creates an assembler whose documents resolve relative links against
    /// `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, bridge: BridgeSettings) -> Self {
        Self {
            base_url: base_url.into(),
            jquery_url: DEFAULT_JQUERY_URL.to_string(),
            bridge,
        }
    }

    /// Loads jQuery from `url` instead of the default CDN build.
    ///
    /// Page scripts expect `$` to be defined before they run.
    #[must_use]
    pub fn with_jquery_url(mut self, url: impl Into<String>) -> Self {
        self.jquery_url = url.into();
        self
    }

    /// Assembles `body_html`, `script` and `style` into one document.
    ///
    /// `body_html` is placed verbatim; `script` is followed by the bridge
    /// bootstrap in the same inline block.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn assemble(
        &self,
        body_html: &str,
        script: &str,
        style: &str,
    ) -> Result<AssembledDocument, askama::Error> {
        let template = DocumentTemplate {
            title: DOCUMENT_TITLE,
            base_url: &self.base_url,
            jquery_url: &self.jquery_url,
            transport: TRANSPORT_SCRIPT,
            style,
            script,
            body: body_html,
            poll_interval_ms: self.bridge.poll_interval_ms,
            max_attempts: self.bridge.max_attempts.max(1),
            transport_global: TRANSPORT_GLOBAL,
            bridge_object: BRIDGE_OBJECT_NAME,
            ready_hook: PAGE_READY_HOOK,
            channel: CHANNEL,
        };
        Ok(AssembledDocument {
            html: template.render()?,
        })
    }

    /// Builds the minimal document shown when a page fails to load.
    ///
    /// `message` is HTML-escaped.
    #[must_use]
    pub fn error_document(&self, title: &str, message: &str) -> AssembledDocument {
        let html = ErrorTemplate { title, message }.render().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to render error document");
            FALLBACK_ERROR_DOCUMENT.to_string()
        });
        AssembledDocument { html }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> Assembler {
        Assembler::new("https://example.com/content/", BridgeSettings::default())
    }

    fn between<'a>(html: &'a str, start: &str, end: &str) -> &'a str {
        let from = html.find(start).unwrap() + start.len();
        let to = from + html[from..].find(end).unwrap();
        &html[from..to]
    }

    #[test]
    fn test_document_head_declarations() {
        let doc = assembler().assemble("<p>x</p>", "", "").unwrap();
        let html = doc.as_str();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
        assert!(html.contains(r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#));
        assert!(html.contains(r#"<base href=""#));
        assert!(html.contains("example.com"));
        assert!(html.contains("<title>Warframe Info Hub</title>"));
        assert!(html.contains(r#"<script id="infohub-transport">"#));
    }

    #[test]
    fn test_body_is_verbatim() {
        let body = r#"<div class="baro" data-x='1'>Baro &amp; <b>Ki'Teer</b></div>"#;
        let doc = assembler().assemble(body, "", "").unwrap();
        assert_eq!(between(doc.as_str(), "<body>\n", "\n</body>"), body);
    }

    #[test]
    fn test_style_and_script_are_inline() {
        let doc = assembler()
            .assemble("", "console.log('x');", ".a > .b { color: red; }")
            .unwrap();
        let html = doc.as_str();

        assert_eq!(
            between(html, r#"<style id="infohub-page-style">"#, "</style>"),
            ".a > .b { color: red; }"
        );

        let script = between(html, r#"<script id="infohub-page-script">"#, "</script>");
        let page = script.find("console.log('x');").unwrap();
        let bootstrap = script.find("function initBridge()").unwrap();
        assert!(page < bootstrap);
    }

    #[test]
    fn test_bootstrap_polls_and_caps() {
        let settings = BridgeSettings {
            poll_interval_ms: 100,
            max_attempts: 25,
        };
        let doc = Assembler::new("https://example.com/", settings)
            .assemble("", "", "")
            .unwrap();
        let html = doc.as_str();

        assert!(html.contains("var pollInterval = 100;"));
        assert!(html.contains("var maxAttempts = 25;"));
        assert!(html.contains("setTimeout(initBridge, pollInterval)"));
        assert!(html.contains(r#"kind: "bridge_timeout""#));
        assert!(html.contains(r#"window["pyotherside"] = channel.objects["pyotherside"]"#));
        assert!(html.contains(r#"typeof window["initSearch"] === "function""#));
        assert!(html.contains(r#"typeof window["InfoHubChannel"] === "undefined""#));
    }

    #[test]
    fn test_jquery_loads_before_page_script() {
        let doc = assembler()
            .assemble("<div>Baro</div>", "$(function(){ initBaro(); });", "")
            .unwrap();
        let html = doc.as_str();

        let jquery = html.find("code.jquery.com/jquery-3.6.0.min.js").unwrap();
        let page = html.find(r#"<script id="infohub-page-script">"#).unwrap();
        assert!(jquery < page);
    }

    #[test]
    fn test_jquery_url_is_configurable() {
        let doc = assembler()
            .with_jquery_url("https://cdn.example.net/jq.js")
            .assemble("", "", "")
            .unwrap();
        let html = doc.as_str();
        assert!(html.contains("jq.js"));
        assert!(!html.contains("code.jquery.com"));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let a = assembler().assemble("<p>1</p>", "var a = 1;", "p {}").unwrap();
        let b = assembler().assemble("<p>1</p>", "var a = 1;", "p {}").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_error_document_escapes_message() {
        let doc = assembler().error_document("Error loading page", "bad <script>alert(1)</script>");
        let html = doc.as_str();

        assert!(html.contains("<h1>Error loading page</h1>"));
        assert!(html.contains("bad "));
        assert!(html.contains("alert(1)"));
        assert!(!html.contains("<script>"));
    }
}
