//! Error types for the vo-votable crate.
//!
//! This module provides the [`VoTableError`] type for errors that can occur
//! while reading, fetching and interpreting VOTable documents.

use camino::Utf8PathBuf;

/// Errors that can occur while loading a VOTable document.
///
/// # Examples
///
/// ```
/// use vo_votable::VoTableError;
///
/// fn describe(err: &VoTableError) -> &'static str {
///     if err.is_network() {
///         "network"
///     } else {
///         "document"
///     }
/// }
///
/// let err = VoTableError::UnsupportedSerialization("BINARY2".to_owned());
/// assert_eq!(describe(&err), "document");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum VoTableError {
    /// The text is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document root is not a `VOTABLE` element.
    #[error("not a VOTable document (root element is '{0}')")]
    NotVoTable(String),

    /// The table data uses a serialization other than TABLEDATA.
    #[error("unsupported table serialization: {0}")]
    UnsupportedSerialization(String),

    /// The document contains no table.
    #[error("no table found in document")]
    NoTable,

    /// The service reported a failed query through `QUERY_STATUS`.
    #[error("service reported query error: {0}")]
    QueryStatus(String),

    /// Failed to read a document from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The path that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The location is neither a usable URL nor a path.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP request failed before a response was received.
    #[error("request to {url} failed: {source}")]
    Http {
        /// The requested URL.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read response from {url}: {source}")]
    Body {
        /// The requested URL.
        url: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body exceeded the configured limit.
    #[error("response from {url} exceeds {limit} bytes")]
    TooLarge {
        /// The requested URL.
        url: String,
        /// The configured limit.
        limit: u64,
    },

    /// The response body is not UTF-8.
    #[error("response from {url} is not valid UTF-8")]
    NotUtf8 {
        /// The requested URL.
        url: String,
    },
}

impl VoTableError {
    /// Creates a new [`VoTableError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`VoTableError::InvalidUrl`] error.
    #[inline]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for failures of the HTTP exchange itself.
    #[inline]
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Body { .. } | Self::Status { .. } | Self::TooLarge { .. }
        )
    }
}
