//! DataLink responses: a links table plus the service descriptors that
//! travel with it.

use tracing::debug;
use vo_core::{LinkError, LinkTableView, ServiceDescriptor, ServiceRegistry, VoElement};

use crate::error::VoTableError;
use crate::parser::parse_document;
use crate::table::{check_query_status, find_results_table, parse_table};

/// A parsed DataLink `{links}` response.
///
/// # Examples
///
/// ```
/// use vo_votable::DataLinkResponse;
///
/// let response = DataLinkResponse::parse(r##"<VOTABLE>
///   <RESOURCE type="results"><TABLE>
///     <FIELD name="ID" datatype="char" arraysize="*"/>
///     <FIELD name="access_url" datatype="char" arraysize="*"/>
///     <FIELD name="semantics" datatype="char" arraysize="*"/>
///     <DATA><TABLEDATA>
///       <TR><TD>ivo://x</TD><TD>http://h/x.fits</TD><TD>#this</TD></TR>
///     </TABLEDATA></DATA>
///   </TABLE></RESOURCE>
/// </VOTABLE>"##)?;
///
/// assert_eq!(response.primary_link()?, "http://h/x.fits");
/// assert!(response.services().is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DataLinkResponse {
    links: LinkTableView,
    services: ServiceRegistry,
}

impl DataLinkResponse {
    /// Parses response XML.
    ///
    /// # Errors
    ///
    /// See [`DataLinkResponse::from_document`]; also fails on malformed XML.
    pub fn parse(xml: &str) -> Result<Self, VoTableError> {
        Self::from_document(&parse_document(xml)?)
    }

    /// Builds a response from an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`VoTableError::QueryStatus`] when the service reported an
    /// error, [`VoTableError::NoTable`] when there is no links table, and
    /// [`VoTableError::UnsupportedSerialization`] for non-TABLEDATA tables.
    pub fn from_document(root: &VoElement) -> Result<Self, VoTableError> {
        check_query_status(root)?;
        let table = find_results_table(root).ok_or(VoTableError::NoTable)?;
        let links = LinkTableView::new(parse_table(table)?);
        let services = ServiceRegistry::from_document(root);
        debug!(
            rows = links.row_count(),
            services = services.len(),
            "Read DataLink response"
        );
        Ok(Self { links, services })
    }

    /// The links table.
    #[inline]
    #[must_use]
    pub const fn links(&self) -> &LinkTableView {
        &self.links
    }

    /// The service descriptors.
    #[inline]
    #[must_use]
    pub const fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Mutable access to the service descriptors, for setting parameters.
    #[inline]
    pub fn services_mut(&mut self) -> &mut ServiceRegistry {
        &mut self.services
    }

    /// Splits the response into its parts.
    #[must_use]
    pub fn into_parts(self) -> (LinkTableView, ServiceRegistry) {
        (self.links, self.services)
    }

    /// The descriptor referenced by the `service_def` of `row`.
    #[must_use]
    pub fn service_for_row(&self, row: usize) -> Option<&ServiceDescriptor> {
        let reference = self.links.service_def_at(row)?;
        self.services.find_by_reference_id(reference)
    }

    /// Access URL of the `#this` row.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NoPrimaryLink`] when there is no usable `#this` row.
    #[inline]
    pub fn primary_link(&self) -> Result<&str, LinkError> {
        self.links.primary_link()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r##"<VOTABLE>
      <RESOURCE type="results"><TABLE>
        <FIELD name="ID" datatype="char" arraysize="*"/>
        <FIELD name="access_url" datatype="char" arraysize="*"/>
        <FIELD name="service_def" datatype="char" arraysize="*"/>
        <FIELD name="semantics" datatype="char" arraysize="*"/>
        <DATA><TABLEDATA>
          <TR><TD>ivo://x</TD><TD>http://h/x.fits</TD><TD/><TD>#this</TD></TR>
          <TR><TD>ivo://x</TD><TD/><TD>cutout</TD><TD>#cutout</TD></TR>
        </TABLEDATA></DATA>
      </TABLE></RESOURCE>
      <RESOURCE type="meta" utype="adhoc:service" ID="cutout">
        <PARAM name="standardID" datatype="char" arraysize="*" value="ivo://ivoa.net/std/SODA#sync-1.0"/>
        <PARAM name="accessURL" datatype="char" arraysize="*" value="http://h/soda"/>
        <GROUP name="inputParams">
          <PARAM name="ID" datatype="char" arraysize="*" ref="pubdid" value=""/>
        </GROUP>
      </RESOURCE>
    </VOTABLE>"##;

    #[test]
    fn test_service_for_row_follows_service_def() {
        let response = DataLinkResponse::parse(RESPONSE).unwrap();
        assert!(response.service_for_row(0).is_none());
        let service = response.service_for_row(1).unwrap();
        assert_eq!(service.access_url(), Some("http://h/soda"));
        assert!(service.is_soda());
    }

    #[test]
    fn test_parts() {
        let (links, services) = DataLinkResponse::parse(RESPONSE).unwrap().into_parts();
        assert_eq!(links.row_count(), 2);
        assert_eq!(services.soda_field_ref(), Some("pubdid"));
    }

    #[test]
    fn test_missing_table() {
        let err = DataLinkResponse::parse("<VOTABLE><RESOURCE/></VOTABLE>").unwrap_err();
        assert!(matches!(err, VoTableError::NoTable));
    }

    #[test]
    fn test_error_status_wins_over_table() {
        let err = DataLinkResponse::parse(
            r#"<VOTABLE><RESOURCE type="results">
                 <INFO name="QUERY_STATUS" value="ERROR">NotFoundFault</INFO>
                 <TABLE><FIELD name="ID"/></TABLE>
               </RESOURCE></VOTABLE>"#,
        )
        .unwrap_err();
        assert!(matches!(err, VoTableError::QueryStatus(m) if m == "NotFoundFault"));
    }
}
