//! Owned VOTable element tree.
//!
//! [`VoElement`] is the hand-off format between the VOTable loader and the
//! service model. It keeps only what the model reads: local element names,
//! attributes in document order, child elements, and concatenated text.
//!
//! # Examples
//!
//! ```
//! use vo_core::VoElement;
//!
//! let resource = VoElement::new("RESOURCE")
//!     .with_attribute("utype", "adhoc:service")
//!     .with_child(VoElement::new("PARAM").with_attribute("name", "accessURL"));
//!
//! assert_eq!(resource.attribute("utype"), Some("adhoc:service"));
//! assert_eq!(resource.children_by_name("PARAM").count(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// A single element of a parsed VOTable document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoElement {
    /// Local element name (namespace prefix removed), e.g. `RESOURCE`.
    pub name: String,

    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order.
    pub children: Vec<VoElement>,

    /// Concatenated character data directly inside this element.
    pub text: String,
}

impl VoElement {
    /// Creates an element with no attributes, children or text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute, returning the element for chaining.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Adds a child element, returning the element for chaining.
    #[must_use]
    pub fn with_child(mut self, child: VoElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the text content, returning the element for chaining.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets an attribute, replacing an existing attribute of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Returns the value of the named attribute, if present.
    ///
    /// Attribute names are matched exactly, as XML requires.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the named attribute when present and not blank.
    #[must_use]
    pub fn non_empty_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).filter(|v| !v.trim().is_empty())
    }

    /// Returns `true` if this element has the given local name.
    #[inline]
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Iterates over the direct children with the given local name.
    pub fn children_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a VoElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the first direct child with the given local name.
    #[must_use]
    pub fn child_by_name(&self, name: &str) -> Option<&VoElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Collects every descendant (not including `self`) with the given
    /// local name, in document order.
    #[must_use]
    pub fn descendants_by_name(&self, name: &str) -> Vec<&VoElement> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }

    /// Returns the trimmed text content of this element.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

fn collect_descendants<'a>(element: &'a VoElement, name: &str, found: &mut Vec<&'a VoElement>) {
    for child in &element.children {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}
