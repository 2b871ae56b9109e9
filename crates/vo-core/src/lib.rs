//! Core types for the vo-datalink workspace.
//!
//! This crate models the service side of IVOA DataLink responses:
//!
//! - [`ServiceParameter`] - one scalar or interval input of a service
//! - [`ServiceDescriptor`] - one `adhoc:service` resource
//! - [`ServiceRegistry`] - the descriptors of a response, with SODA routing
//! - [`LinkTableView`] - lookups over the links table
//!
//! It performs no I/O. Documents arrive as [`VoElement`] trees and
//! [`ResultTable`]s built by a loader such as `vo-votable`.
//!
//! # Example
//!
//! ```
//! use vo_core::{ServiceRegistry, VoElement};
//!
//! let param = |name: &str, value: &str| {
//!     VoElement::new("PARAM").with_attribute("name", name).with_attribute("value", value)
//! };
//! let soda = VoElement::new("RESOURCE")
//!     .with_attribute("utype", "adhoc:service")
//!     .with_attribute("ID", "soda")
//!     .with_child(param("standardID", "ivo://ivoa.net/std/SODA#sync-1.0"))
//!     .with_child(param("accessURL", "http://example.org/soda"))
//!     .with_child(
//!         VoElement::new("GROUP")
//!             .with_attribute("name", "inputParams")
//!             .with_child(param("POS", "")),
//!     );
//! let root = VoElement::new("VOTABLE").with_child(soda);
//!
//! let mut services = ServiceRegistry::from_document(&root);
//! services.set_parameter_value("POS", "CIRCLE 10 20 0.5")?;
//! assert_eq!(
//!     services.soda_request_url("ivo://ds").as_deref(),
//!     Some("http://example.org/soda?ID=ivo%3A%2F%2Fds&POS=CIRCLE%2010%2020%200.5")
//! );
//! # Ok::<(), vo_core::ParamError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod element;
pub mod encode;
pub mod error;
pub mod hash;
pub mod links;
pub mod param;
pub mod registry;
pub mod service;
pub mod table;
pub mod types;

pub use config::{ColorScheme, Config, FetchConfig, OutputConfig};
pub use element::VoElement;
pub use encode::{append_id, encode_query_value};
pub use error::{ConfigError, LinkError, ParamError};
pub use hash::{fx_hash_map, FxHashMap};
pub use links::{LinkColumns, LinkRow, LinkTableView};
pub use param::{AllowedValues, Arity, ParamValue, ServiceParameter};
pub use registry::{is_service_resource, ServiceRegistry, SERVICE_RESOURCE_UTYPE};
pub use service::{
    encode_query_pair, ServiceDescriptor, ID_PARAM, INPUT_PARAMS_GROUP, RESERVED_PARAMS,
    RESPONSE_FORMAT_PARAM,
};
pub use table::{ColumnInfo, ResultTable};
pub use types::{
    is_datalink_standard, is_soda_standard, normalize_column_name, Capability, LinkColumn,
    Semantics, DATALINK_STANDARD_PREFIX, SODA_STANDARD_PREFIX,
};
