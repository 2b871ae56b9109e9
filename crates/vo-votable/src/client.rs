//! Blocking HTTP retrieval of VOTable documents.
//!
//! Only `http` and `https` URLs are fetched. A non-success status fails the
//! request, and bodies larger than [`FetchConfig::max_response_bytes`] are
//! rejected without being read past the limit.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;
use vo_core::{FetchConfig, LinkTableView, VoElement};

use crate::error::VoTableError;
use crate::parser::parse_document;
use crate::response::DataLinkResponse;
use crate::table::{check_query_status, find_results_table, parse_table};

/// HTTP client for DataLink and SODA endpoints.
#[derive(Debug, Clone)]
pub struct VoTableClient {
    client: Client,
    max_response_bytes: u64,
}

impl VoTableClient {
    /// Builds a client from fetch settings.
    ///
    /// # Errors
    ///
    /// Returns [`VoTableError::Client`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &FetchConfig) -> Result<Self, VoTableError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(VoTableError::Client)?;
        Ok(Self {
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Fetches the body of `url` as text.
    ///
    /// # Errors
    ///
    /// Returns [`VoTableError::InvalidUrl`] for unparsable or non-HTTP URLs,
    /// [`VoTableError::Http`] when no response arrives,
    /// [`VoTableError::Status`] for non-success statuses,
    /// [`VoTableError::TooLarge`] past the size limit and
    /// [`VoTableError::NotUtf8`] for binary bodies.
    pub fn fetch_text(&self, url: &str) -> Result<String, VoTableError> {
        let parsed = Url::parse(url).map_err(|e| VoTableError::invalid_url(url, e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(VoTableError::invalid_url(
                    url,
                    format!("unsupported scheme '{other}'"),
                ));
            }
        }

        debug!(%url, "Fetching VOTable");
        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|source| VoTableError::Http {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        let text = read_body(url, status, response, self.max_response_bytes)?;
        debug!(%url, bytes = text.len(), "Fetched VOTable");
        Ok(text)
    }

    /// Fetches and parses a VOTable document.
    ///
    /// # Errors
    ///
    /// See [`VoTableClient::fetch_text`] and [`parse_document`].
    pub fn fetch_document(&self, url: &str) -> Result<VoElement, VoTableError> {
        parse_document(&self.fetch_text(url)?)
    }

    /// Fetches a DataLink `{links}` response and returns only its links table.
    ///
    /// # Errors
    ///
    /// See [`VoTableClient::fetch_document`]. Also fails with
    /// [`VoTableError::QueryStatus`] or [`VoTableError::NoTable`].
    pub fn fetch_links(&self, url: &str) -> Result<LinkTableView, VoTableError> {
        links_from_document(&self.fetch_document(url)?)
    }

    /// Fetches a DataLink `{links}` response with its service descriptors.
    ///
    /// # Errors
    ///
    /// See [`VoTableClient::fetch_document`] and
    /// [`DataLinkResponse::from_document`].
    pub fn fetch_datalink(&self, url: &str) -> Result<DataLinkResponse, VoTableError> {
        DataLinkResponse::from_document(&self.fetch_document(url)?)
    }
}

/// Turns a response into its text.
///
/// Fails on a non-success `status`, on bodies longer than `limit` bytes (at
/// most `limit + 1` bytes are read) and on bodies that are not UTF-8.
fn read_body<R: Read>(
    url: &str,
    status: StatusCode,
    body: R,
    limit: u64,
) -> Result<String, VoTableError> {
    if !status.is_success() {
        return Err(VoTableError::Status {
            url: url.to_owned(),
            status: status.as_u16(),
        });
    }

    let mut bytes = Vec::new();
    body.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|source| VoTableError::Body {
            url: url.to_owned(),
            source,
        })?;
    if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > limit {
        return Err(VoTableError::TooLarge {
            url: url.to_owned(),
            limit,
        });
    }

    String::from_utf8(bytes).map_err(|_| VoTableError::NotUtf8 {
        url: url.to_owned(),
    })
}

fn links_from_document(root: &VoElement) -> Result<LinkTableView, VoTableError> {
    check_query_status(root)?;
    let table = find_results_table(root).ok_or(VoTableError::NoTable)?;
    Ok(LinkTableView::new(parse_table(table)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> VoTableClient {
        VoTableClient::new(&FetchConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = client().fetch_text("file:///etc/passwd").unwrap_err();
        assert!(matches!(err, VoTableError::InvalidUrl { .. }));
        assert!(err.to_string().contains("unsupported scheme 'file'"));
    }

    #[test]
    fn test_rejects_unparsable_url() {
        let err = client().fetch_links("not a url").unwrap_err();
        assert!(matches!(err, VoTableError::InvalidUrl { .. }));
        assert!(!err.is_network());
    }

    const URL: &str = "http://h/dl?ID=ivo%3A%2F%2Fx";

    const LINKS: &str = r##"<VOTABLE><RESOURCE type="results"><TABLE>
        <FIELD name="ID"/><FIELD name="access_url"/><FIELD name="semantics"/>
        <DATA><TABLEDATA>
          <TR><TD>ivo://x</TD><TD>http://h/x.fits</TD><TD>#this</TD></TR>
        </TABLEDATA></DATA>
      </TABLE></RESOURCE></VOTABLE>"##;

    #[test]
    fn test_body_to_links_table() {
        let text = read_body(URL, StatusCode::OK, LINKS.as_bytes(), 1024).unwrap();
        let links = links_from_document(&parse_document(&text).unwrap()).unwrap();
        assert_eq!(links.row_count(), 1);
        assert_eq!(links.primary_link(), Ok("http://h/x.fits"));
    }

    #[test]
    fn test_body_size_limit_is_inclusive() {
        let body = "x".repeat(16);
        let text = read_body(URL, StatusCode::OK, body.as_bytes(), 16).unwrap();
        assert_eq!(text.len(), 16);

        let body = "x".repeat(17);
        let err = read_body(URL, StatusCode::OK, body.as_bytes(), 16).unwrap_err();
        assert!(matches!(err, VoTableError::TooLarge { limit: 16, .. }));
        assert!(err.is_network());
    }

    #[test]
    fn test_error_status_is_not_read() {
        let err = read_body(URL, StatusCode::NOT_FOUND, LINKS.as_bytes(), 1024).unwrap_err();
        assert!(matches!(err, VoTableError::Status { status: 404, .. }));
    }

    #[test]
    fn test_binary_body_is_rejected() {
        let body: &[u8] = &[0xff, 0xfe, 0x00];
        let err = read_body(URL, StatusCode::OK, body, 1024).unwrap_err();
        assert!(matches!(err, VoTableError::NotUtf8 { .. }));
    }

    #[test]
    fn test_failed_query_status_in_links() {
        let root = parse_document(
            r#"<VOTABLE><RESOURCE type="results">
                 <INFO name="QUERY_STATUS" value="ERROR">UsageFault</INFO>
               </RESOURCE></VOTABLE>"#,
        )
        .unwrap();
        let err = links_from_document(&root).unwrap_err();
        assert!(matches!(err, VoTableError::QueryStatus(m) if m == "UsageFault"));
    }

    #[test]
    fn test_no_timeout_is_accepted() {
        let config = FetchConfig {
            timeout_secs: None,
            ..FetchConfig::default()
        };
        assert!(VoTableClient::new(&config).is_ok());
    }
}
