//! # Errors
//!
//! Error types for each stage of the content and theme pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching a remote resource.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The base URL and path did not form a valid URL.
    #[error("invalid resource URL '{url}': {message}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser message.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request for {path} timed out")]
    Timeout {
        /// Relative path of the resource.
        path: String,
    },

    /// DNS, connection, TLS or body read failure.
    #[error("network error fetching {path}: {source}")]
    Network {
        /// Relative path of the resource.
        path: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{path} returned HTTP {status}")]
    Status {
        /// Relative path of the resource.
        path: String,
        /// HTTP status code.
        status: u16,
    },
}

impl FetchError {
    /// Returns the relative path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Timeout { path } | Self::Network { path, .. } | Self::Status { path, .. } => {
                Some(path)
            }
            Self::Client(_) | Self::InvalidUrl { .. } => None,
        }
    }
}

/// A page identifier that cannot be turned into a safe resource path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid page id '{0}': expected lowercase letters, digits or '_'")]
pub struct InvalidPageId(pub String);

/// Errors that abort a navigation.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// A required resource could not be fetched.
    #[error("{0}")]
    Fetch(#[from] FetchError),

    /// The document template failed to render.
    #[error("failed to assemble document: {0}")]
    Assemble(#[from] askama::Error),
}

/// Errors reading or writing the persisted theme record.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// No platform configuration directory could be determined.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// File system failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The record was not valid JSON.
    #[error("invalid theme record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by theme changes.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// A custom theme was requested without a complete, valid palette.
    #[error("custom theme requires a complete palette (missing or invalid: {})", missing.join(", "))]
    IncompletePalette {
        /// Palette keys that were absent or not a CSS colour.
        missing: Vec<&'static str>,
    },

    /// The new theme could not be persisted.
    #[error("failed to save theme: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Errors raised while handling a message from the embedded document.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The URL passed to `open_url` did not parse.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// Raw URL from the page.
        url: String,
        /// Parser message.
        message: String,
    },

    /// The URL scheme is not one the bridge hands to the OS.
    #[error("refusing to open URL with scheme '{scheme}'")]
    DisallowedScheme {
        /// The rejected scheme.
        scheme: String,
    },

    /// The OS handler failed to launch.
    #[error("failed to open {url}: {source}")]
    Open {
        /// URL that was being opened.
        url: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document gave up waiting for the bridge transport.
    #[error("bridge transport not available after {attempts} attempts")]
    InitTimeout {
        /// Number of polls the document made.
        attempts: u32,
    },
}

/// Errors that prevent the application from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    /// A platform directory could not be determined.
    #[error("could not determine {0} directory")]
    MissingDirectory(&'static str),

    /// A required directory could not be created.
    #[error("failed to create {path}: {source}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_palette_lists_keys() {
        let err = ThemeError::IncompletePalette {
            missing: vec!["border", "highlight"],
        };
        assert_eq!(
            err.to_string(),
            "custom theme requires a complete palette (missing or invalid: border, highlight)"
        );
    }

    #[test]
    fn test_status_error_mentions_path() {
        let err = FetchError::Status {
            path: "gui/baro.html".into(),
            status: 404,
        };
        assert_eq!(err.path(), Some("gui/baro.html"));
        assert_eq!(err.to_string(), "gui/baro.html returned HTTP 404");
    }
}
