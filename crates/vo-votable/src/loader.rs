//! Where documents come from: local files or HTTP(S) URLs.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use vo_core::VoElement;

use crate::client::VoTableClient;
use crate::error::VoTableError;
use crate::parser::parse_document;
use crate::response::DataLinkResponse;

/// Reads and parses a VOTable file.
///
/// # Errors
///
/// Returns [`VoTableError::Read`] when the file cannot be read, and any
/// [`parse_document`] error.
pub fn load_document(path: &Utf8Path) -> Result<VoElement, VoTableError> {
    let xml = std::fs::read_to_string(path).map_err(|e| VoTableError::read(path, e))?;
    debug!(%path, bytes = xml.len(), "Read VOTable file");
    parse_document(&xml)
}

/// A document location given on the command line.
///
/// # Examples
///
/// ```
/// use vo_votable::DocumentSource;
///
/// assert!(matches!(DocumentSource::parse("https://h/dl?ID=x"), DocumentSource::Url(_)));
/// assert!(matches!(DocumentSource::parse("links.xml"), DocumentSource::File(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// A path on disk.
    File(Utf8PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl DocumentSource {
    /// Classifies `location` by its scheme prefix.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let is_url = ["http://", "https://"].iter().any(|scheme| {
            location
                .get(..scheme.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(scheme))
        });
        if is_url {
            Self::Url(location.to_owned())
        } else {
            Self::File(Utf8PathBuf::from(location))
        }
    }

    /// Reads and parses the document.
    ///
    /// # Errors
    ///
    /// Returns [`VoTableError::Read`] for files, the client's errors for
    /// URLs, and any [`parse_document`] error.
    pub fn load(&self, client: &VoTableClient) -> Result<VoElement, VoTableError> {
        match self {
            Self::File(path) => load_document(path),
            Self::Url(url) => client.fetch_document(url),
        }
    }

    /// Reads the document as a DataLink response.
    ///
    /// # Errors
    ///
    /// See [`DocumentSource::load`] and [`DataLinkResponse::from_document`].
    pub fn load_datalink(&self, client: &VoTableClient) -> Result<DataLinkResponse, VoTableError> {
        match self {
            Self::File(path) => DataLinkResponse::from_document(&load_document(path)?),
            Self::Url(url) => client.fetch_datalink(url),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{path}"),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(
            DocumentSource::parse("HTTPS://h/x"),
            DocumentSource::Url("HTTPS://h/x".to_owned())
        );
    }

    #[test]
    fn test_other_schemes_are_paths() {
        assert_eq!(
            DocumentSource::parse("ftp://h/x"),
            DocumentSource::File(Utf8PathBuf::from("ftp://h/x"))
        );
        assert_eq!(
            DocumentSource::parse("./data/links.xml").to_string(),
            "./data/links.xml"
        );
    }

    #[test]
    fn test_url_source_goes_through_client() {
        let client = VoTableClient::new(&vo_core::FetchConfig::default()).unwrap();
        let err = DocumentSource::Url("http://[::1".to_owned())
            .load_datalink(&client)
            .unwrap_err();
        assert!(matches!(err, VoTableError::InvalidUrl { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_document(Utf8Path::new("/definitely/not/here.xml")).unwrap_err();
        assert!(matches!(err, VoTableError::Read { .. }));
    }
}
