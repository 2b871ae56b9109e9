//! DataLink link semantics.
//!
//! A links-table row carries a `semantics` term saying what its link points
//! at. The core vocabulary is closed in [`Semantics`]; any other term is kept
//! verbatim in [`Semantics::Other`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// The semantics term of a DataLink row.
///
/// # Examples
///
/// ```
/// use vo_core::Semantics;
///
/// assert_eq!(Semantics::parse("#this"), Semantics::This);
/// assert_eq!(Semantics::parse("#PREVIEW"), Semantics::Preview);
/// assert_eq!(Semantics::parse("#weird").as_str(), "#weird");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semantics {
    /// `#this`: the primary data product.
    This,
    /// `#preview`
    Preview,
    /// `#progenitor`
    Progenitor,
    /// `#derivation`
    Derivation,
    /// `#auxiliary`
    Auxiliary,
    /// `#calibration`
    Calibration,
    /// `#coderived`
    Coderived,
    /// `#documentation`
    Documentation,
    /// `#counterpart`
    Counterpart,
    /// `#cutout`
    Cutout,
    /// `#proc`: a server-side processing service.
    Proc,
    /// Any term outside the core vocabulary, stored as given.
    Other(String),
}

impl Semantics {
    /// The tag identifying the primary data product.
    pub const THIS: &'static str = "#this";

    /// Parses a semantics term. Matching is case-insensitive.
    #[must_use]
    pub fn parse(term: &str) -> Self {
        let term = term.trim();
        KNOWN
            .iter()
            .find(|(tag, _)| tag.eq_ignore_ascii_case(term))
            .map_or_else(|| Self::Other(term.to_owned()), |(_, s)| s.clone())
    }

    /// Returns the term as it appears in a links table.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::This => "#this",
            Self::Preview => "#preview",
            Self::Progenitor => "#progenitor",
            Self::Derivation => "#derivation",
            Self::Auxiliary => "#auxiliary",
            Self::Calibration => "#calibration",
            Self::Coderived => "#coderived",
            Self::Documentation => "#documentation",
            Self::Counterpart => "#counterpart",
            Self::Cutout => "#cutout",
            Self::Proc => "#proc",
            Self::Other(term) => term,
        }
    }

    /// Returns `true` if `term` names these semantics (case-insensitive).
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(term.trim())
    }
}

const KNOWN: [(&str, Semantics); 11] = [
    ("#this", Semantics::This),
    ("#preview", Semantics::Preview),
    ("#progenitor", Semantics::Progenitor),
    ("#derivation", Semantics::Derivation),
    ("#auxiliary", Semantics::Auxiliary),
    ("#calibration", Semantics::Calibration),
    ("#coderived", Semantics::Coderived),
    ("#documentation", Semantics::Documentation),
    ("#counterpart", Semantics::Counterpart),
    ("#cutout", Semantics::Cutout),
    ("#proc", Semantics::Proc),
];

impl fmt::Display for Semantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Semantics {
    fn from(term: &str) -> Self {
        Self::parse(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_terms() {
        assert_eq!(Semantics::parse("#this"), Semantics::This);
        assert_eq!(Semantics::parse(" #Auxiliary "), Semantics::Auxiliary);
        assert_eq!(Semantics::parse("#proc"), Semantics::Proc);
    }

    #[test]
    fn test_parse_unknown_keeps_term() {
        let s = Semantics::parse("http://example.org/sem#thumb");
        assert_eq!(s, Semantics::Other("http://example.org/sem#thumb".to_owned()));
        assert_eq!(s.to_string(), "http://example.org/sem#thumb");
    }

    #[test]
    fn test_matches() {
        assert!(Semantics::This.matches("#THIS"));
        assert!(!Semantics::This.matches("#preview"));
        assert!(Semantics::Other("#custom".to_owned()).matches("#Custom"));
    }
}
