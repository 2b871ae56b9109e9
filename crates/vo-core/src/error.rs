//! Error types for the vo-core crate.
//!
//! Absent services, columns and links are not errors in this crate; they are
//! `None`. The types here cover caller mistakes ([`ParamError`]), the one
//! lookup callers expect to always succeed ([`LinkError`]), and bad
//! configuration ([`ConfigError`]).

use crate::param::Arity;

/// Errors raised when setting a [`ServiceParameter`](crate::ServiceParameter) value.
///
/// # Examples
///
/// ```
/// use vo_core::{Arity, ParamError};
///
/// let err = ParamError::ArityMismatch {
///     name: "BAND".to_owned(),
///     expected: Arity::Interval,
/// };
/// assert!(err.to_string().contains("BAND"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// The setter used does not match the parameter's arity.
    #[error("parameter '{name}' is {expected}, wrong setter used")]
    ArityMismatch {
        /// Parameter name.
        name: String,
        /// The parameter's actual arity.
        expected: Arity,
    },
}

/// Errors raised by [`LinkTableView`](crate::LinkTableView) lookups that
/// callers expect to succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// No usable `#this` row exists in the links table.
    #[error("no primary link found")]
    NoPrimaryLink,
}

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration text is not valid JSON for [`Config`](crate::Config).
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
