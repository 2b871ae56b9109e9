//! `TABLE` elements to [`ResultTable`]s.
//!
//! Only the TABLEDATA serialization is read. Empty `<TD/>` cells become
//! `None`; cell text is trimmed.

use tracing::debug;
use vo_core::{ColumnInfo, ResultTable, VoElement};

use crate::error::VoTableError;

/// Serializations other than TABLEDATA that may appear inside `DATA`.
const OTHER_SERIALIZATIONS: [&str; 3] = ["BINARY", "BINARY2", "FITS"];

/// Reads one `TABLE` element.
///
/// # Errors
///
/// Returns [`VoTableError::UnsupportedSerialization`] when the data block
/// is BINARY, BINARY2 or FITS.
///
/// # Examples
///
/// ```
/// use vo_votable::{parse_document, parse_table};
///
/// let root = parse_document(r#"<VOTABLE><RESOURCE><TABLE name="links">
///   <FIELD name="ID" datatype="char" arraysize="*"/>
///   <FIELD name="semantics" datatype="char" arraysize="*"/>
///   <DATA><TABLEDATA><TR><TD>ivo://x</TD><TD>#this</TD></TR></TABLEDATA></DATA>
/// </TABLE></RESOURCE></VOTABLE>"#)?;
/// let table_el = root.descendants_by_name("TABLE")[0];
///
/// let table = parse_table(table_el)?;
/// assert_eq!(table.name.as_deref(), Some("links"));
/// assert_eq!(table.cell(0, 1), Some("#this"));
/// # Ok::<(), vo_votable::VoTableError>(())
/// ```
pub fn parse_table(table: &VoElement) -> Result<ResultTable, VoTableError> {
    let columns: Vec<ColumnInfo> = table.children_by_name("FIELD").map(column_info).collect();

    let mut rows = Vec::new();
    if let Some(data) = table.child_by_name("DATA") {
        if let Some(other) = OTHER_SERIALIZATIONS
            .iter()
            .find(|s| data.child_by_name(s).is_some())
        {
            return Err(VoTableError::UnsupportedSerialization((*other).to_owned()));
        }
        if let Some(tabledata) = data.child_by_name("TABLEDATA") {
            rows = tabledata
                .children_by_name("TR")
                .map(|tr| {
                    tr.children_by_name("TD")
                        .map(|td| Some(td.text()).filter(|t| !t.is_empty()).map(str::to_owned))
                        .collect()
                })
                .collect();
        }
    }

    debug!(
        columns = columns.len(),
        rows = rows.len(),
        "Read TABLEDATA table"
    );
    Ok(ResultTable {
        name: table.non_empty_attribute("name").map(str::to_owned),
        columns,
        rows,
    })
}

fn column_info(field: &VoElement) -> ColumnInfo {
    let attr = |name: &str| field.non_empty_attribute(name).map(str::to_owned);
    ColumnInfo {
        name: field.attribute("name").unwrap_or_default().to_owned(),
        id: attr("ID"),
        ucd: attr("ucd"),
        utype: attr("utype"),
        datatype: attr("datatype"),
        unit: attr("unit"),
    }
}

/// Finds the table holding query results.
///
/// Prefers the first `RESOURCE type="results"` that owns a `TABLE`, then
/// falls back to the first `RESOURCE` with a `TABLE` anywhere in the
/// document.
#[must_use]
pub fn find_results_table(root: &VoElement) -> Option<&VoElement> {
    let resources = root.descendants_by_name("RESOURCE");
    resources
        .iter()
        .copied()
        .filter(|r| {
            r.attribute("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("results"))
        })
        .chain(resources.iter().copied())
        .find_map(|r| r.child_by_name("TABLE"))
}

/// Checks the DALI `QUERY_STATUS` INFO of the results resource.
///
/// # Errors
///
/// Returns [`VoTableError::QueryStatus`] carrying the INFO's text (or its
/// `value` when the text is empty) if the status is `ERROR`.
pub fn check_query_status(root: &VoElement) -> Result<(), VoTableError> {
    let infos = root
        .children_by_name("RESOURCE")
        .flat_map(|r| r.children_by_name("INFO"))
        .chain(root.children_by_name("INFO"));

    for info in infos {
        let is_status = info
            .attribute("name")
            .is_some_and(|n| n.eq_ignore_ascii_case("QUERY_STATUS"));
        let is_error = info
            .attribute("value")
            .is_some_and(|v| v.eq_ignore_ascii_case("ERROR"));
        if is_status && is_error {
            let message = if info.text().is_empty() {
                info.attribute("value").unwrap_or_default()
            } else {
                info.text()
            };
            return Err(VoTableError::QueryStatus(message.to_owned()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    #[test]
    fn test_field_metadata_and_empty_cells() {
        let root = parse_document(
            r#"<VOTABLE><RESOURCE type="results"><TABLE>
                 <FIELD name="ssa_pubDID" ID="pubdid" ucd="meta.ref.ivoid" datatype="char" arraysize="*"/>
                 <FIELD name="flux" unit="Jy" datatype="double"/>
                 <DATA><TABLEDATA>
                   <TR><TD> ivo://a </TD><TD/></TR>
                   <TR><TD>ivo://b</TD><TD>1.5</TD></TR>
                 </TABLEDATA></DATA>
               </TABLE></RESOURCE></VOTABLE>"#,
        )
        .unwrap();
        let table = parse_table(find_results_table(&root).unwrap()).unwrap();

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.columns[0].id.as_deref(), Some("pubdid"));
        assert_eq!(table.columns[0].ucd.as_deref(), Some("meta.ref.ivoid"));
        assert_eq!(table.columns[1].unit.as_deref(), Some("Jy"));
        assert_eq!(table.name, None);
        assert_eq!(table.cell(0, 0), Some("ivo://a"));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(1, 1), Some("1.5"));
        assert_eq!(table.find_column_by_ref("pubdid"), Some(0));
    }

    #[test]
    fn test_binary_is_rejected() {
        let root = parse_document(
            r#"<VOTABLE><RESOURCE><TABLE><FIELD name="a" datatype="int"/>
                 <DATA><BINARY2><STREAM encoding="base64">AAAA</STREAM></BINARY2></DATA>
               </TABLE></RESOURCE></VOTABLE>"#,
        )
        .unwrap();
        let err = parse_table(find_results_table(&root).unwrap()).unwrap_err();
        assert!(matches!(err, VoTableError::UnsupportedSerialization(s) if s == "BINARY2"));
    }

    #[test]
    fn test_table_without_data_is_empty() {
        let root = parse_document(
            r#"<VOTABLE><RESOURCE><TABLE><FIELD name="a"/></TABLE></RESOURCE></VOTABLE>"#,
        )
        .unwrap();
        let table = parse_table(find_results_table(&root).unwrap()).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn test_results_resource_preferred() {
        let root = parse_document(
            r#"<VOTABLE>
                 <RESOURCE type="meta"><TABLE name="meta"/></RESOURCE>
                 <RESOURCE type="results"><TABLE name="results"/></RESOURCE>
               </VOTABLE>"#,
        )
        .unwrap();
        let table = find_results_table(&root).unwrap();
        assert_eq!(table.attribute("name"), Some("results"));
    }

    #[test]
    fn test_query_status() {
        let ok = parse_document(
            r#"<VOTABLE><RESOURCE type="results"><INFO name="QUERY_STATUS" value="OK"/></RESOURCE></VOTABLE>"#,
        )
        .unwrap();
        assert!(check_query_status(&ok).is_ok());

        let failed = parse_document(
            r#"<VOTABLE><RESOURCE type="results">
                 <INFO name="QUERY_STATUS" value="ERROR">UsageFault: missing ID</INFO>
               </RESOURCE></VOTABLE>"#,
        )
        .unwrap();
        let err = check_query_status(&failed).unwrap_err();
        assert_eq!(
            err.to_string(),
            "service reported query error: UsageFault: missing ID"
        );
    }
}
