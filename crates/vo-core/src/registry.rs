//! The service descriptors of one VOTable response.
//!
//! A [`ServiceRegistry`] is rebuilt for every response; it is never patched
//! in place. "The" SODA service and "the" DataLink service are the first
//! descriptors of each kind in document order. Responses without either are
//! normal and answer `None`.
//!
//! # Parameter routing
//!
//! [`ServiceRegistry::set_parameter_value`] and
//! [`ServiceRegistry::set_parameter_interval`] only reach the SODA service,
//! and only parameters it declares. Anything else is silently ignored so
//! callers can probe optional parameters; the returned `bool` says whether
//! the value was applied.

use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::element::VoElement;
use crate::error::ParamError;
use crate::service::ServiceDescriptor;

/// `utype` marking a RESOURCE as a service descriptor.
pub const SERVICE_RESOURCE_UTYPE: &str = "adhoc:service";

/// Ordered collection of service descriptors.
///
/// # Examples
///
/// ```
/// use vo_core::{ServiceDescriptor, ServiceRegistry};
///
/// let mut soda = ServiceDescriptor::with_reference_id("soda_svc");
/// soda.add_capability_metadata([("standardID", "ivo://ivoa.net/std/SODA#sync-1.0")]);
///
/// let registry = ServiceRegistry::from_descriptor(soda);
/// assert_eq!(registry.service_reference_id(), Some("soda_svc"));
/// assert!(registry.find_datalink_service().is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceRegistry {
    services: SmallVec<[ServiceDescriptor; 2]>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding a single descriptor.
    #[must_use]
    pub fn from_descriptor(descriptor: ServiceDescriptor) -> Self {
        let mut services = SmallVec::new();
        services.push(descriptor);
        Self { services }
    }

    /// Builds one descriptor per resource element, in order.
    #[must_use]
    pub fn from_resources<'a, I>(resources: I) -> Self
    where
        I: IntoIterator<Item = &'a VoElement>,
    {
        Self {
            services: resources
                .into_iter()
                .map(ServiceDescriptor::from_resource)
                .collect(),
        }
    }

    /// Builds descriptors from every `RESOURCE` with `utype="adhoc:service"`
    /// anywhere below `root`, in document order.
    #[must_use]
    pub fn from_document(root: &VoElement) -> Self {
        let resources = root
            .descendants_by_name("RESOURCE")
            .into_iter()
            .filter(|r| is_service_resource(r));
        let registry = Self::from_resources(resources);
        debug!(services = registry.len(), "Collected service resources");
        registry
    }

    /// Appends a descriptor.
    pub fn push(&mut self, descriptor: ServiceDescriptor) {
        self.services.push(descriptor);
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if there are no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Descriptors in order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter()
    }

    /// First descriptor whose capability is a DataLink links endpoint.
    #[must_use]
    pub fn find_datalink_service(&self) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.is_datalink())
    }

    /// First descriptor whose capability is SODA.
    #[must_use]
    pub fn find_soda_service(&self) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.is_soda())
    }

    fn find_soda_service_mut(&mut self) -> Option<&mut ServiceDescriptor> {
        self.services.iter_mut().find(|s| s.is_soda())
    }

    /// Descriptor whose reference identifier equals `id` exactly.
    #[must_use]
    pub fn find_by_reference_id(&self, id: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.reference_id() == Some(id))
    }

    /// Field reference of the DataLink service: the result-table column that
    /// holds dataset identifiers.
    #[must_use]
    pub fn identifier_source_field(&self) -> Option<&str> {
        self.find_datalink_service()?.field_ref()
    }

    /// Reference identifier of the SODA service.
    #[must_use]
    pub fn service_reference_id(&self) -> Option<&str> {
        self.find_soda_service()?.reference_id()
    }

    /// Field reference of the SODA service's `ID` parameter.
    #[must_use]
    pub fn soda_field_ref(&self) -> Option<&str> {
        self.find_soda_service()?.field_ref()
    }

    /// Sets a scalar parameter on the SODA service.
    ///
    /// Returns `Ok(false)` without doing anything when there is no SODA
    /// service or it does not declare `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::ArityMismatch`] if the parameter is an interval.
    pub fn set_parameter_value(&mut self, name: &str, value: &str) -> Result<bool, ParamError> {
        match self.find_soda_service_mut() {
            Some(soda) => soda.set_parameter_value(name, value),
            None => Ok(false),
        }
    }

    /// Sets an interval parameter on the SODA service.
    ///
    /// Returns `Ok(false)` without doing anything when there is no SODA
    /// service or it does not declare `name`.
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
        match self.find_soda_service_mut() {
            Some(soda) => soda.set_parameter_interval(name, min, max),
            None => Ok(false),
        }
    }

    /// Query fragment of the SODA service, or `""` without one.
    #[must_use]
    pub fn soda_query_fragment(&self) -> String {
        self.find_soda_service()
            .map(ServiceDescriptor::build_request_query_fragment)
            .unwrap_or_default()
    }

    /// SODA request URL for dataset `id`.
    #[must_use]
    pub fn soda_request_url(&self, id: &str) -> Option<String> {
        self.find_soda_service()?.request_url(id)
    }

    /// DataLink links request URL for dataset `id`.
    #[must_use]
    pub fn links_request_url(&self, id: &str) -> Option<String> {
        self.find_datalink_service()?.request_url(id)
    }
}

impl<'a> IntoIterator for &'a ServiceRegistry {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.services.iter()
    }
}

/// Returns `true` if `resource` is a service-descriptor RESOURCE.
#[must_use]
pub fn is_service_resource(resource: &VoElement) -> bool {
    resource.is("RESOURCE")
        && resource
            .attribute("utype")
            .is_some_and(|u| u.trim().eq_ignore_ascii_case(SERVICE_RESOURCE_UTYPE))
}
