//! XML text to [`VoElement`] trees.

use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;
use vo_core::VoElement;

use crate::error::VoTableError;

/// Parses VOTable XML text into an element tree rooted at `VOTABLE`.
///
/// Namespace prefixes are dropped from element and attribute names, so
/// documents with and without the VOTable namespace read the same. A DTD is
/// tolerated but not used.
///
/// # Errors
///
/// Returns [`VoTableError::Xml`] for malformed XML and
/// [`VoTableError::NotVoTable`] when the root is not `VOTABLE`.
///
/// # Examples
///
/// ```
/// use vo_votable::parse_document;
///
/// let root = parse_document(r#"<VOTABLE xmlns="http://www.ivoa.net/xml/VOTable/v1.3">
///     <RESOURCE type="results"/>
/// </VOTABLE>"#)?;
/// assert_eq!(root.children_by_name("RESOURCE").count(), 1);
/// # Ok::<(), vo_votable::VoTableError>(())
/// ```
pub fn parse_document(xml: &str) -> Result<VoElement, VoTableError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let document = Document::parse_with_options(xml, options)?;
    let root = document.root_element();
    let name = root.tag_name().name();
    if name != "VOTABLE" {
        return Err(VoTableError::NotVoTable(name.to_owned()));
    }

    let element = convert(root);
    debug!(
        resources = element.children_by_name("RESOURCE").count(),
        "Parsed VOTable document"
    );
    Ok(element)
}

fn convert(node: Node<'_, '_>) -> VoElement {
    let mut element = VoElement::new(node.tag_name().name());
    element.attributes = node
        .attributes()
        .map(|a| (a.name().to_owned(), a.value().to_owned()))
        .collect();

    for child in node.children() {
        if child.is_element() {
            element.children.push(convert(child));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.text.push_str(text);
            }
        }
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_are_stripped() {
        let root = parse_document(
            r#"<v:VOTABLE xmlns:v="http://www.ivoa.net/xml/VOTable/v1.3"
                          xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
                          xsi:schemaLocation="x y">
                 <v:RESOURCE utype="adhoc:service"/>
               </v:VOTABLE>"#,
        )
        .unwrap();
        assert_eq!(root.name, "VOTABLE");
        assert_eq!(root.attribute("schemaLocation"), Some("x y"));
        let resource = root.child_by_name("RESOURCE").unwrap();
        assert_eq!(resource.attribute("utype"), Some("adhoc:service"));
    }

    #[test]
    fn test_text_and_cdata() {
        let root = parse_document(
            "<VOTABLE><INFO name=\"QUERY_STATUS\" value=\"OK\"> a <![CDATA[<b>]]> </INFO></VOTABLE>",
        )
        .unwrap();
        assert_eq!(root.child_by_name("INFO").unwrap().text(), "a <b>");
    }

    #[test]
    fn test_rejects_other_roots() {
        let err = parse_document("<html><body/></html>").unwrap_err();
        assert!(matches!(err, VoTableError::NotVoTable(name) if name == "html"));
    }

    #[test]
    fn test_rejects_malformed_xml() {
        let err = parse_document("<VOTABLE><RESOURCE></VOTABLE>").unwrap_err();
        assert!(matches!(err, VoTableError::Xml(_)));
    }

    #[test]
    fn test_entities_are_decoded() {
        let root = parse_document(
            r#"<VOTABLE><PARAM name="accessURL" value="http://h/s?a=1&amp;b=2"/></VOTABLE>"#,
        )
        .unwrap();
        let param = root.child_by_name("PARAM").unwrap();
        assert_eq!(param.attribute("value"), Some("http://h/s?a=1&b=2"));
    }
}
