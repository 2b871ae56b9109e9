//! Classification types for the DataLink model.
//!
//! # Module Organization
//!
//! - [`capability`] - Service capability derived from a standard identifier
//! - [`column`] - Column roles of a links table
//! - [`semantics`] - Link semantics terms
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use vo_core::{Capability, LinkColumn, Semantics};
//! ```

pub mod capability;
pub mod column;
pub mod semantics;

pub use capability::{
    is_datalink_standard, is_soda_standard, Capability, DATALINK_STANDARD_PREFIX,
    SODA_STANDARD_PREFIX,
};
pub use column::{normalize_column_name, LinkColumn};
pub use semantics::Semantics;
