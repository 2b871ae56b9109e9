//! Service capability classification.
//!
//! This module provides the [`Capability`] enum, derived from a service's
//! IVOA standard identifier.

use serde::{Deserialize, Serialize};

/// Lower-case prefix of SODA standard identifiers.
pub const SODA_STANDARD_PREFIX: &str = "ivo://ivoa.net/std/soda#";

/// Lower-case prefix of DataLink `links` endpoint identifiers.
pub const DATALINK_STANDARD_PREFIX: &str = "ivo://ivoa.net/std/datalink#links";

/// The kind of service a resource describes.
///
/// # Examples
///
/// ```
/// use vo_core::Capability;
///
/// assert_eq!(Capability::classify(Some("ivo://ivoa.net/std/SODA#sync-1.0")), Capability::Soda);
/// assert_eq!(Capability::classify(Some("ivo://ivoa.net/std/DataLink#links-1.0")), Capability::DataLinks);
/// assert_eq!(Capability::classify(None), Capability::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// A DataLink `links` endpoint.
    DataLinks,

    /// A SODA cutout/filter service.
    Soda,

    /// Anything else, including resources with no standard identifier.
    #[default]
    Other,
}

impl Capability {
    /// Classifies a standard identifier.
    #[must_use]
    pub fn classify(standard_id: Option<&str>) -> Self {
        if is_soda_standard(standard_id) {
            Self::Soda
        } else if is_datalink_standard(standard_id) {
            Self::DataLinks
        } else {
            Self::Other
        }
    }

    /// Returns a short label for display.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DataLinks => "datalink",
            Self::Soda => "soda",
            Self::Other => "other",
        }
    }
}

/// Returns `true` if `standard_id` names a SODA capability.
#[must_use]
pub fn is_soda_standard(standard_id: Option<&str>) -> bool {
    standard_id.is_some_and(|id| starts_with_ignore_case(id, SODA_STANDARD_PREFIX))
}

/// Returns `true` if `standard_id` names a DataLink `links` capability.
#[must_use]
pub fn is_datalink_standard(standard_id: Option<&str>) -> bool {
    standard_id.is_some_and(|id| starts_with_ignore_case(id, DATALINK_STANDARD_PREFIX))
}

fn starts_with_ignore_case(value: &str, lower_prefix: &str) -> bool {
    value
        .get(..lower_prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(lower_prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soda_prefix_case_insensitive() {
        assert!(is_soda_standard(Some("ivo://ivoa.net/std/SODA#sync-1.0")));
        assert!(is_soda_standard(Some("IVO://IVOA.NET/STD/soda#async-1.0")));
        assert!(!is_soda_standard(Some("ivo://ivoa.net/std/soda")));
        assert!(!is_soda_standard(None));
    }

    #[test]
    fn test_datalink_prefix() {
        assert!(is_datalink_standard(Some("ivo://ivoa.net/std/DataLink#links-1.0")));
        assert!(is_datalink_standard(Some("ivo://ivoa.net/std/datalink#links")));
        assert!(!is_datalink_standard(Some("ivo://ivoa.net/std/datalink#other")));
        assert!(!is_datalink_standard(Some("")));
    }

    #[test]
    fn test_non_ascii_does_not_panic() {
        assert!(!is_soda_standard(Some("ivo://ivoa.net/std/sodé")));
        assert_eq!(Capability::classify(Some("ünïcode")), Capability::Other);
    }

    #[test]
    fn test_capability_serialization() {
        assert_eq!(
            serde_json::to_string(&Capability::DataLinks).unwrap(),
            r#""data_links""#
        );
        assert_eq!(serde_json::to_string(&Capability::Soda).unwrap(), r#""soda""#);
    }
}
