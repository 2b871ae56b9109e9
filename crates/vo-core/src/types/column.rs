//! Column roles of a DataLink links table.

use serde::{Deserialize, Serialize};

/// The role a links-table column plays.
///
/// # Examples
///
/// ```
/// use vo_core::LinkColumn;
///
/// assert_eq!(LinkColumn::from_column_name("access_url"), Some(LinkColumn::AccessUrl));
/// assert_eq!(LinkColumn::from_column_name("content type"), Some(LinkColumn::ContentType));
/// assert_eq!(LinkColumn::from_column_name("local_semantics"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkColumn {
    /// `ID`: the dataset identifier the link belongs to.
    Id,
    /// `semantics`
    Semantics,
    /// `access_url`
    AccessUrl,
    /// `content_type`
    ContentType,
    /// `content_length`
    ContentLength,
    /// `service_def`: reference to a service resource in the same document.
    ServiceDef,
    /// `error_message`
    ErrorMessage,
    /// `description`
    Description,
}

impl LinkColumn {
    /// All roles, in the order columns are usually declared.
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::AccessUrl,
        Self::ServiceDef,
        Self::ErrorMessage,
        Self::Description,
        Self::Semantics,
        Self::ContentType,
        Self::ContentLength,
    ];

    /// Canonical column name.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Semantics => "semantics",
            Self::AccessUrl => "access_url",
            Self::ContentType => "content_type",
            Self::ContentLength => "content_length",
            Self::ServiceDef => "service_def",
            Self::ErrorMessage => "error_message",
            Self::Description => "description",
        }
    }

    /// Maps a raw column name to its role.
    ///
    /// Whitespace in the name is replaced with `_` before a case-insensitive
    /// comparison with the canonical names. Unrecognized names yield `None`.
    #[must_use]
    pub fn from_column_name(raw: &str) -> Option<Self> {
        let normalized = normalize_column_name(raw);
        Self::ALL
            .into_iter()
            .find(|role| role.column_name().eq_ignore_ascii_case(&normalized))
    }
}

/// Replaces every whitespace character with `_` after trimming.
#[must_use]
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_round_trips_through_its_name() {
        for role in LinkColumn::ALL {
            assert_eq!(LinkColumn::from_column_name(role.column_name()), Some(role));
        }
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_column_name(" error message "), "error_message");
        assert_eq!(normalize_column_name("service\tdef"), "service_def");
        assert_eq!(
            LinkColumn::from_column_name("Error Message"),
            Some(LinkColumn::ErrorMessage)
        );
        assert_eq!(LinkColumn::from_column_name("id"), Some(LinkColumn::Id));
    }
}
