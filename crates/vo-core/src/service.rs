//! Service resource descriptors.
//!
//! A [`ServiceDescriptor`] is built from one `<RESOURCE utype="adhoc:service">`
//! block. Its identity (access URL, standard identifier, registry identifier)
//! comes from the resource's top-level PARAMs; its user-tunable inputs come
//! from the PARAMs of the `inputParams` GROUP. The two are added through
//! separate operations because they are separate VOTable constructs.
//!
//! ```xml
//! <RESOURCE type="meta" utype="adhoc:service" ID="soda_svc">
//!   <PARAM name="standardID" datatype="char" arraysize="*"
//!          value="ivo://ivoa.net/std/SODA#sync-1.0"/>
//!   <PARAM name="accessURL" datatype="char" arraysize="*"
//!          value="http://example.org/soda/sync"/>
//!   <GROUP name="inputParams">
//!     <PARAM name="ID" datatype="char" arraysize="*" ref="pubdid" value=""/>
//!     <PARAM name="BAND" unit="m" datatype="double" arraysize="2" xtype="interval" value=""/>
//!   </GROUP>
//! </RESOURCE>
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::element::VoElement;
use crate::encode::{append_id, encode_query_value};
use crate::error::ParamError;
use crate::hash::{fx_hash_map, FxHashMap};
use crate::param::ServiceParameter;
use crate::types::{is_datalink_standard, is_soda_standard, Capability};

/// Name of the GROUP holding a service's input parameters.
pub const INPUT_PARAMS_GROUP: &str = "inputParams";

/// Input parameter carrying the dataset identifier.
pub const ID_PARAM: &str = "ID";

/// Input parameter carrying the requested response format.
pub const RESPONSE_FORMAT_PARAM: &str = "RESPONSEFORMAT";

/// Parameter names never written into a request fragment.
pub const RESERVED_PARAMS: [&str; 2] = ["IDSource", "AccessURL"];

/// Description of one VO service resource.
///
/// # Examples
///
/// ```
/// use vo_core::ServiceDescriptor;
///
/// let mut soda = ServiceDescriptor::new();
/// soda.add_capability_metadata([
///     ("standardID", "ivo://ivoa.net/std/SODA#sync-1.0"),
///     ("accessURL", "http://example.org/soda"),
/// ]);
/// assert!(soda.is_soda());
/// assert!(!soda.is_datalink());
/// assert_eq!(soda.access_url(), Some("http://example.org/soda"));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceDescriptor {
    reference_id: Option<String>,
    field_ref: Option<String>,
    access_url: Option<String>,
    standard_id: Option<String>,
    resource_identifier: Option<String>,
    default_format: Option<String>,
    parameters: Vec<ServiceParameter>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl ServiceDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: fx_hash_map(),
            ..Self::default()
        }
    }

    /// Creates an empty descriptor with the given reference identifier.
    #[must_use]
    pub fn with_reference_id(reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: Some(reference_id.into()),
            ..Self::new()
        }
    }

    /// Builds a descriptor from a service `<RESOURCE>` element.
    ///
    /// The resource's `ID` attribute becomes the reference identifier, its
    /// direct PARAMs feed [`add_capability_metadata`](Self::add_capability_metadata),
    /// and each `inputParams` GROUP feeds
    /// [`add_input_parameter_group`](Self::add_input_parameter_group).
    #[must_use]
    pub fn from_resource(resource: &VoElement) -> Self {
        let mut descriptor = Self::new();
        descriptor.reference_id = resource.non_empty_attribute("ID").map(str::to_owned);

        descriptor.add_capability_metadata(resource.children_by_name("PARAM").filter_map(|p| {
            Some((p.attribute("name")?, p.attribute("value").unwrap_or_default()))
        }));

        for group in resource.children_by_name("GROUP") {
            let is_inputs = group
                .attribute("name")
                .is_some_and(|n| n.eq_ignore_ascii_case(INPUT_PARAMS_GROUP));
            if is_inputs {
                descriptor.add_input_parameter_group(group.children_by_name("PARAM"));
            }
        }

        debug!(
            reference_id = descriptor.reference_id.as_deref().unwrap_or("-"),
            capability = descriptor.capability().label(),
            parameters = descriptor.parameters.len(),
            "Parsed service resource"
        );
        descriptor
    }

    /// Merges name/value metadata pairs into the identity fields.
    ///
    /// Recognized names (case-insensitive) are `accessURL`, `standardID` and
    /// `resourceIdentifier`; anything else is ignored.
    pub fn add_capability_metadata<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in pairs {
            let slot = if name.eq_ignore_ascii_case("accessURL") {
                &mut self.access_url
            } else if name.eq_ignore_ascii_case("standardID") {
                &mut self.standard_id
            } else if name.eq_ignore_ascii_case("resourceIdentifier") {
                &mut self.resource_identifier
            } else {
                continue;
            };
            *slot = Some(value.trim().to_owned());
        }
    }

    /// Adds the PARAM declarations of an `inputParams` group.
    ///
    /// The `ID` declaration is not a tunable parameter: its `ref` attribute
    /// (or, failing that, its `value`) names the result-table field that
    /// supplies dataset identifiers. Every other declaration becomes a
    /// [`ServiceParameter`]; a later declaration replaces an earlier one of
    /// the same name.
    pub fn add_input_parameter_group<'a, I>(&mut self, params: I)
    where
        I: IntoIterator<Item = &'a VoElement>,
    {
        let service_name = self.display_name().to_owned();
        for param in params {
            let Some(name) = param.non_empty_attribute("name") else {
                warn!(service = %service_name, "Skipping input PARAM without a name");
                continue;
            };

            if name.eq_ignore_ascii_case(ID_PARAM) {
                self.field_ref = param
                    .non_empty_attribute("ref")
                    .or_else(|| param.non_empty_attribute("value"))
                    .map(str::to_owned);
                continue;
            }

            let parameter = ServiceParameter::from_param(param, &service_name);
            if name.eq_ignore_ascii_case(RESPONSE_FORMAT_PARAM) && self.default_format.is_none() {
                self.default_format = parameter.default_value().map(str::to_owned);
            }
            self.insert_parameter(parameter);
        }
    }

    /// Inserts a parameter, replacing (in place) any parameter of the same name.
    pub fn insert_parameter(&mut self, parameter: ServiceParameter) {
        if let Some(&slot) = self.index.get(parameter.name()) {
            self.parameters[slot] = parameter;
        } else {
            self.index
                .insert(parameter.name().to_owned(), self.parameters.len());
            self.parameters.push(parameter);
        }
    }

    fn display_name(&self) -> &str {
        self.reference_id
            .as_deref()
            .or(self.resource_identifier.as_deref())
            .or(self.access_url.as_deref())
            .unwrap_or_default()
    }

    /// `ID` attribute of the service resource.
    #[must_use]
    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    /// Result-table field that supplies the `ID` parameter.
    #[must_use]
    pub fn field_ref(&self) -> Option<&str> {
        self.field_ref.as_deref()
    }

    /// Service endpoint.
    #[must_use]
    pub fn access_url(&self) -> Option<&str> {
        self.access_url.as_deref()
    }

    /// IVOA standard identifier.
    #[must_use]
    pub fn standard_id(&self) -> Option<&str> {
        self.standard_id.as_deref()
    }

    /// Registry identifier of the resource.
    #[must_use]
    pub fn resource_identifier(&self) -> Option<&str> {
        self.resource_identifier.as_deref()
    }

    /// Default response format.
    #[must_use]
    pub fn default_format(&self) -> Option<&str> {
        self.default_format.as_deref()
    }

    /// Overrides the default response format.
    pub fn set_default_format(&mut self, format: impl Into<String>) {
        self.default_format = Some(format.into());
    }

    /// Returns `true` if the standard identifier names SODA.
    #[must_use]
    pub fn is_soda(&self) -> bool {
        is_soda_standard(self.standard_id())
    }

    /// Returns `true` if the standard identifier names a DataLink links endpoint.
    #[must_use]
    pub fn is_datalink(&self) -> bool {
        is_datalink_standard(self.standard_id())
    }

    /// Capability derived from the standard identifier.
    #[must_use]
    pub fn capability(&self) -> Capability {
        Capability::classify(self.standard_id())
    }

    /// Input parameters in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &ServiceParameter> {
        self.parameters.iter()
    }

    /// Number of input parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Looks up a parameter by exact name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ServiceParameter> {
        self.index.get(name).map(|&i| &self.parameters[i])
    }

    /// Looks up a parameter by exact name for mutation.
    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut ServiceParameter> {
        let i = *self.index.get(name)?;
        self.parameters.get_mut(i)
    }

    /// Sets a scalar parameter. Returns `Ok(false)` if no such parameter exists.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::ArityMismatch`] if the parameter is an interval.
    pub fn set_parameter_value(&mut self, name: &str, value: &str) -> Result<bool, ParamError> {
        match self.parameter_mut(name) {
            Some(p) => p.set_value(value).map(|()| true),
            None => Ok(false),
        }
    }

    /// Sets an interval parameter. Returns `Ok(false)` if no such parameter exists.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::ArityMismatch`] if the parameter is scalar.
    pub fn set_parameter_interval(
        &mut self,
        name: &str,
        min: &str,
        max: &str,
    ) -> Result<bool, ParamError> {
        match self.parameter_mut(name) {
            Some(p) => p.set_interval(min, max).map(|()| true),
            None => Ok(false),
        }
    }

    /// Clears every parameter value.
    pub fn clear_parameter_values(&mut self) {
        self.parameters.iter_mut().for_each(ServiceParameter::clear);
    }

    /// Builds the query-string fragment for a SODA request.
    ///
    /// Returns `""` unless this is a SODA service. Otherwise every set
    /// parameter contributes `&NAME=value` in declaration order, with values
    /// percent-encoded (space as `%20`). `IDSource` and `AccessURL` are never
    /// emitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use vo_core::{ServiceDescriptor, ServiceParameter};
    ///
    /// let mut soda = ServiceDescriptor::new();
    /// soda.add_capability_metadata([("standardID", "ivo://ivoa.net/std/SODA#sync-1.0")]);
    /// soda.insert_parameter(ServiceParameter::scalar("POS"));
    /// soda.insert_parameter(ServiceParameter::interval("TIME"));
    /// soda.set_parameter_interval("TIME", "2020-01-01", "")?;
    ///
    /// assert_eq!(soda.build_request_query_fragment(), "&TIME=2020-01-01");
    /// # Ok::<(), vo_core::ParamError>(())
    /// ```
    #[must_use]
    pub fn build_request_query_fragment(&self) -> String {
        if !self.is_soda() {
            return String::new();
        }
        self.parameters
            .iter()
            .filter(|p| !is_reserved(p.name()))
            .filter_map(|p| p.query_value().map(|v| encode_query_pair(p.name(), &v)))
            .collect()
    }

    /// Full request URL for dataset `id`: the access URL, `ID=<id>`, and the
    /// query fragment. `None` when the access URL is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use vo_core::ServiceDescriptor;
    ///
    /// let mut links = ServiceDescriptor::new();
    /// links.add_capability_metadata([
    ///     ("standardID", "ivo://ivoa.net/std/DataLink#links-1.0"),
    ///     ("accessURL", "http://example.org/dl"),
    /// ]);
    /// assert_eq!(
    ///     links.request_url("ivo://example/ds?1").as_deref(),
    ///     Some("http://example.org/dl?ID=ivo%3A%2F%2Fexample%2Fds%3F1")
    /// );
    /// ```
    #[must_use]
    pub fn request_url(&self, id: &str) -> Option<String> {
        let base = self.access_url().filter(|u| !u.is_empty())?;
        let mut url = append_id(base, id);
        url.push_str(&self.build_request_query_fragment());
        Some(url)
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED_PARAMS.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// Encodes a single `&name=value` pair the way the fragment builder does.
#[must_use]
pub fn encode_query_pair(name: &str, value: &str) -> String {
    format!("&{name}={}", encode_query_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SODA_ID: &str = "ivo://ivoa.net/std/SODA#sync-1.0";

    fn param(name: &str) -> VoElement {
        VoElement::new("PARAM")
            .with_attribute("name", name)
            .with_attribute("value", "")
    }

    fn soda_resource() -> VoElement {
        VoElement::new("RESOURCE")
            .with_attribute("type", "meta")
            .with_attribute("utype", "adhoc:service")
            .with_attribute("ID", "soda_svc")
            .with_child(param("standardID").with_attribute("value", SODA_ID))
            .with_child(param("accessURL").with_attribute("value", "http://example.org/soda"))
            .with_child(param("resourceIdentifier").with_attribute("value", "ivo://example/soda"))
            .with_child(
                VoElement::new("GROUP")
                    .with_attribute("name", "inputParams")
                    .with_child(param("ID").with_attribute("ref", "pubdid"))
                    .with_child(param("POS"))
                    .with_child(
                        param("BAND")
                            .with_attribute("xtype", "interval")
                            .with_attribute("arraysize", "2"),
                    )
                    .with_child(param("RESPONSEFORMAT").with_attribute("value", "application/fits")),
            )
    }

    #[test]
    fn test_from_resource() {
        let d = ServiceDescriptor::from_resource(&soda_resource());
        assert_eq!(d.reference_id(), Some("soda_svc"));
        assert_eq!(d.access_url(), Some("http://example.org/soda"));
        assert_eq!(d.standard_id(), Some(SODA_ID));
        assert_eq!(d.resource_identifier(), Some("ivo://example/soda"));
        assert_eq!(d.field_ref(), Some("pubdid"));
        assert_eq!(d.default_format(), Some("application/fits"));
        assert!(d.is_soda());
        assert_eq!(d.capability(), Capability::Soda);

        let names: Vec<_> = d.parameters().map(ServiceParameter::name).collect();
        assert_eq!(names, ["POS", "BAND", "RESPONSEFORMAT"]);
        assert!(d.parameter("ID").is_none());
        assert_eq!(d.parameter("POS").map(ServiceParameter::service_name), Some("soda_svc"));
    }

    #[test]
    fn test_capability_keys_case_insensitive_and_unknown_ignored() {
        let mut d = ServiceDescriptor::new();
        d.add_capability_metadata([
            ("ACCESSURL", "http://a"),
            ("StandardId", "ivo://ivoa.net/std/datalink#links-1.1"),
            ("contentType", "ignored"),
        ]);
        assert_eq!(d.access_url(), Some("http://a"));
        assert!(d.is_datalink());
        assert!(!d.is_soda());
    }

    #[test]
    fn test_id_param_prefers_ref_over_value() {
        let mut d = ServiceDescriptor::new();
        d.add_input_parameter_group([&param("ID").with_attribute("value", "literal")]);
        assert_eq!(d.field_ref(), Some("literal"));

        let with_ref = param("ID")
            .with_attribute("value", "literal")
            .with_attribute("ref", "obs_publisher_did");
        d.add_input_parameter_group([&with_ref]);
        assert_eq!(d.field_ref(), Some("obs_publisher_did"));
    }

    #[test]
    fn test_duplicate_parameter_last_wins_in_place() {
        let mut d = ServiceDescriptor::new();
        let first = param("A").with_attribute("unit", "m");
        let second = param("A").with_attribute("unit", "nm");
        d.add_input_parameter_group([&first, &param("B"), &second]);
        assert_eq!(d.parameter_count(), 2);
        assert_eq!(d.parameter("A").and_then(ServiceParameter::unit), Some("nm"));
        let names: Vec<_> = d.parameters().map(ServiceParameter::name).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_fragment_empty_for_non_soda() {
        let mut d = ServiceDescriptor::new();
        d.insert_parameter(ServiceParameter::scalar("POS"));
        d.set_parameter_value("POS", "CIRCLE 1 2 3").unwrap();
        assert_eq!(d.build_request_query_fragment(), "");
    }

    #[test]
    fn test_fragment_encodes_and_skips() {
        let mut d = ServiceDescriptor::from_resource(&soda_resource());
        assert_eq!(d.build_request_query_fragment(), "");

        d.set_parameter_value("POS", "CIRCLE 10 +20 0.5").unwrap();
        d.set_parameter_interval("BAND", "5e-7", "6e-7").unwrap();
        insta::assert_snapshot!(
            d.build_request_query_fragment(),
            @"&POS=CIRCLE%2010%20%2B20%200.5&BAND=5e-7%206e-7"
        );
    }

    #[test]
    fn test_reserved_names_never_emitted() {
        let mut d = ServiceDescriptor::new();
        d.add_capability_metadata([("standardID", SODA_ID)]);
        d.insert_parameter(ServiceParameter::scalar("IDSource"));
        d.insert_parameter(ServiceParameter::scalar("AccessURL"));
        d.insert_parameter(ServiceParameter::scalar("FLUX"));
        d.set_parameter_value("IDSource", "pubdid").unwrap();
        d.set_parameter_value("AccessURL", "http://x").unwrap();
        d.set_parameter_value("FLUX", "1").unwrap();
        assert_eq!(d.build_request_query_fragment(), "&FLUX=1");
    }

    #[test]
    fn test_unknown_parameter_is_not_applied() {
        let mut d = ServiceDescriptor::from_resource(&soda_resource());
        assert_eq!(d.set_parameter_value("NOPE", "1"), Ok(false));
        assert!(d.set_parameter_value("BAND", "1").is_err());
        assert_eq!(d.build_request_query_fragment(), "");
    }

    #[test]
    fn test_request_url() {
        let mut d = ServiceDescriptor::from_resource(&soda_resource());
        d.set_parameter_interval("BAND", "", "6e-7").unwrap();
        assert_eq!(
            d.request_url("ivo://x/y").as_deref(),
            Some("http://example.org/soda?ID=ivo%3A%2F%2Fx%2Fy&BAND=%206e-7")
        );
        assert_eq!(ServiceDescriptor::new().request_url("x"), None);
    }

    #[test]
    fn test_one_sided_interval_fragments() {
        let mut d = ServiceDescriptor::from_resource(&soda_resource());
        d.set_parameter_interval("BAND", "5e-7", "").unwrap();
        let lower = d.build_request_query_fragment();
        d.set_parameter_interval("BAND", "", "5e-7").unwrap();
        let upper = d.build_request_query_fragment();

        assert_eq!(lower, "&BAND=5e-7");
        assert_eq!(upper, "&BAND=%205e-7");
    }

    #[test]
    fn test_clear_parameter_values() {
        let mut d = ServiceDescriptor::from_resource(&soda_resource());
        d.set_parameter_value("POS", "x").unwrap();
        d.clear_parameter_values();
        assert_eq!(d.build_request_query_fragment(), "");
    }

    #[test]
    fn test_encode_query_pair() {
        assert_eq!(encode_query_pair("POL", "I Q"), "&POL=I%20Q");
    }
}
