//! Service input parameters.
//!
//! A [`ServiceParameter`] is one user-tunable knob of a service, built from a
//! `<PARAM>` inside the service's `inputParams` group. Its [`Arity`] is fixed
//! when it is built: SODA interval parameters (`xtype="interval"` with an
//! `arraysize` other than `1`) hold a min/max pair, everything else holds a
//! single string.
//!
//! # Examples
//!
//! ```
//! use vo_core::{Arity, ServiceParameter, VoElement};
//!
//! let band = VoElement::new("PARAM")
//!     .with_attribute("name", "BAND")
//!     .with_attribute("unit", "m")
//!     .with_attribute("xtype", "interval")
//!     .with_attribute("arraysize", "2");
//!
//! let mut param = ServiceParameter::from_param(&band, "ivo://svc/soda");
//! assert_eq!(param.arity(), Arity::Interval);
//!
//! param.set_interval("5e-7", "6e-7")?;
//! assert_eq!(param.query_value().as_deref(), Some("5e-7 6e-7"));
//! assert!(param.set_value("nope").is_err());
//! # Ok::<(), vo_core::ParamError>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::element::VoElement;
use crate::encode::encode_query_value;
use crate::error::ParamError;

/// Whether a parameter takes one value or a min/max pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// A single value.
    Scalar,
    /// A `min max` pair; either bound may be empty (unbounded).
    Interval,
}

impl Arity {
    /// Decides the arity from a PARAM's `xtype` and `arraysize` attributes.
    ///
    /// An absent `arraysize` counts as "not 1".
    #[must_use]
    pub fn from_declaration(xtype: Option<&str>, arraysize: Option<&str>) -> Self {
        let is_interval = xtype.is_some_and(|x| x.trim().eq_ignore_ascii_case("interval"));
        if is_interval && arraysize.map(str::trim) != Some("1") {
            Self::Interval
        } else {
            Self::Scalar
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalar => "scalar",
            Self::Interval => "interval",
        })
    }
}

/// The current value of a parameter. The variant always matches the
/// parameter's [`Arity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    /// Value of a scalar parameter; empty means unset.
    Scalar(String),
    /// Bounds of an interval parameter; an empty bound is unbounded.
    Interval {
        /// Lower bound.
        min: String,
        /// Upper bound.
        max: String,
    },
}

impl ParamValue {
    fn empty(arity: Arity) -> Self {
        match arity {
            Arity::Scalar => Self::Scalar(String::new()),
            Arity::Interval => Self::Interval {
                min: String::new(),
                max: String::new(),
            },
        }
    }

    /// The arity this value belongs to.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        match self {
            Self::Scalar(_) => Arity::Scalar,
            Self::Interval { .. } => Arity::Interval,
        }
    }
}

/// Range and enumerated options declared in a PARAM's `<VALUES>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedValues {
    /// `<MIN value>`, if declared.
    pub min: Option<String>,
    /// `<MAX value>`, if declared.
    pub max: Option<String>,
    /// `<OPTION value>` entries in declaration order.
    pub options: SmallVec<[String; 4]>,
}

impl AllowedValues {
    fn from_values_element(values: &VoElement) -> Self {
        let bound = |name: &str| {
            values
                .child_by_name(name)
                .and_then(|el| el.attribute("value"))
                .map(str::to_owned)
        };
        Self {
            min: bound("MIN"),
            max: bound("MAX"),
            options: values
                .children_by_name("OPTION")
                .filter_map(|o| o.attribute("value"))
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Returns `true` if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.options.is_empty()
    }
}

/// A named request parameter of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceParameter {
    name: String,
    service_name: String,
    datatype: Option<String>,
    unit: Option<String>,
    ucd: Option<String>,
    utype: Option<String>,
    xtype: Option<String>,
    arraysize: Option<String>,
    description: Option<String>,
    default_value: Option<String>,
    allowed: AllowedValues,
    value: ParamValue,
}

impl ServiceParameter {
    /// Builds a parameter from a `<PARAM>` declaration of `service_name`.
    ///
    /// The current value starts empty; the declared `value` attribute is kept
    /// as [`default_value`](Self::default_value).
    #[must_use]
    pub fn from_param(param: &VoElement, service_name: &str) -> Self {
        let attr = |name: &str| param.non_empty_attribute(name).map(str::to_owned);
        let xtype = attr("xtype");
        let arraysize = attr("arraysize");
        let arity = Arity::from_declaration(xtype.as_deref(), arraysize.as_deref());

        Self {
            name: param.attribute("name").unwrap_or_default().to_owned(),
            service_name: service_name.to_owned(),
            datatype: attr("datatype"),
            unit: attr("unit"),
            ucd: attr("ucd"),
            utype: attr("utype"),
            xtype,
            arraysize,
            description: param
                .child_by_name("DESCRIPTION")
                .map(VoElement::text)
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
            default_value: attr("value"),
            allowed: param
                .child_by_name("VALUES")
                .map(AllowedValues::from_values_element)
                .unwrap_or_default(),
            value: ParamValue::empty(arity),
        }
    }

    /// Creates an unset scalar parameter with no metadata.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::bare(name.into(), Arity::Scalar)
    }

    /// Creates an unset interval parameter with no metadata.
    #[must_use]
    pub fn interval(name: impl Into<String>) -> Self {
        Self::bare(name.into(), Arity::Interval)
    }

    fn bare(name: String, arity: Arity) -> Self {
        Self {
            name,
            service_name: String::new(),
            datatype: None,
            unit: None,
            ucd: None,
            utype: None,
            xtype: (arity == Arity::Interval).then(|| "interval".to_owned()),
            arraysize: None,
            description: None,
            default_value: None,
            allowed: AllowedValues::default(),
            value: ParamValue::empty(arity),
        }
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the service exposing this parameter.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// VOTable datatype.
    #[must_use]
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// Physical unit.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Unified Content Descriptor.
    #[must_use]
    pub fn ucd(&self) -> Option<&str> {
        self.ucd.as_deref()
    }

    /// Data-model type.
    #[must_use]
    pub fn utype(&self) -> Option<&str> {
        self.utype.as_deref()
    }

    /// Extended type, e.g. `interval`.
    #[must_use]
    pub fn xtype(&self) -> Option<&str> {
        self.xtype.as_deref()
    }

    /// Declared array size.
    #[must_use]
    pub fn arraysize(&self) -> Option<&str> {
        self.arraysize.as_deref()
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The `value` attribute of the declaration.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Declared range and options.
    #[must_use]
    pub fn allowed_values(&self) -> &AllowedValues {
        &self.allowed
    }

    /// Scalar or interval.
    #[inline]
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.value.arity()
    }

    /// Current value(s).
    #[must_use]
    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    /// Sets the value of a scalar parameter.
    ///
    /// The value is stored and later emitted verbatim; a whitespace-only
    /// value counts as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::ArityMismatch`] if this is an interval parameter.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<(), ParamError> {
        if self.arity() != Arity::Scalar {
            return Err(self.mismatch());
        }
        if let ParamValue::Scalar(current) = &mut self.value {
            *current = value.into();
        }
        Ok(())
    }

    /// Sets both bounds of an interval parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::ArityMismatch`] if this is a scalar parameter.
    pub fn set_interval(
        &mut self,
        min: impl Into<String>,
        max: impl Into<String>,
    ) -> Result<(), ParamError> {
        if self.arity() != Arity::Interval {
            return Err(self.mismatch());
        }
        if let ParamValue::Interval { min: lo, max: hi } = &mut self.value {
            *lo = min.into();
            *hi = max.into();
        }
        Ok(())
    }

    /// Resets the value(s) to empty, keeping the arity.
    pub fn clear(&mut self) {
        self.value = ParamValue::empty(self.arity());
    }

    fn mismatch(&self) -> ParamError {
        ParamError::ArityMismatch {
            name: self.name.clone(),
            expected: self.arity(),
        }
    }

    /// The unencoded query value, or `None` when nothing is set.
    ///
    /// A value counts as set when it holds a non-whitespace character; set
    /// values are emitted as given. Interval bounds are joined with one
    /// space and only trailing whitespace is dropped, so a lower-only
    /// interval yields `"min"` while an upper-only one keeps its leading
    /// separator (`" max"`).
    #[must_use]
    pub fn query_value(&self) -> Option<String> {
        match &self.value {
            ParamValue::Scalar(v) => (!v.trim().is_empty()).then(|| v.clone()),
            ParamValue::Interval { min, max } => {
                if min.trim().is_empty() && max.trim().is_empty() {
                    return None;
                }
                Some(format!("{min} {max}").trim_end().to_owned())
            }
        }
    }

    /// Returns `true` if the parameter would appear in a request.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.query_value().is_some()
    }

    /// The percent-encoded query value, or `None` when nothing is set.
    #[must_use]
    pub fn encoded_value(&self) -> Option<String> {
        self.query_value().map(|v| encode_query_value(&v))
    }
}
