//! VOTable loading for the vo-datalink workspace.
//!
//! This crate turns VOTable XML into the types of `vo-core`:
//!
//! - [`parse_document`] - XML text to a [`VoElement`](vo_core::VoElement) tree
//! - [`parse_table`] - a `TABLE` element to a [`ResultTable`](vo_core::ResultTable)
//! - [`DataLinkResponse`] - a links table plus its service descriptors
//! - [`VoTableClient`] - blocking HTTP retrieval with a size cap
//!
//! # Example
//!
//! ```
//! use vo_votable::DataLinkResponse;
//!
//! let mut response = DataLinkResponse::parse(r##"<VOTABLE>
//!   <RESOURCE type="results"><TABLE>
//!     <FIELD name="ID" datatype="char" arraysize="*"/>
//!     <FIELD name="service_def" datatype="char" arraysize="*"/>
//!     <FIELD name="semantics" datatype="char" arraysize="*"/>
//!     <DATA><TABLEDATA>
//!       <TR><TD>ivo://x</TD><TD>soda</TD><TD>#cutout</TD></TR>
//!     </TABLEDATA></DATA>
//!   </TABLE></RESOURCE>
//!   <RESOURCE type="meta" utype="adhoc:service" ID="soda">
//!     <PARAM name="standardID" datatype="char" arraysize="*" value="ivo://ivoa.net/std/SODA#sync-1.0"/>
//!     <PARAM name="accessURL" datatype="char" arraysize="*" value="http://h/soda"/>
//!     <GROUP name="inputParams">
//!       <PARAM name="BAND" datatype="double" arraysize="2" xtype="interval" value=""/>
//!     </GROUP>
//!   </RESOURCE>
//! </VOTABLE>"##)?;
//!
//! response.services_mut().set_parameter_interval("BAND", "5e-7", "6e-7")?;
//! assert_eq!(
//!     response.services().soda_request_url("ivo://x").as_deref(),
//!     Some("http://h/soda?ID=ivo%3A%2F%2Fx&BAND=5e-7%206e-7")
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod loader;
pub mod parser;
pub mod response;
pub mod table;

pub use client::VoTableClient;
pub use error::VoTableError;
pub use loader::{load_document, DocumentSource};
pub use parser::parse_document;
pub use response::DataLinkResponse;
pub use table::{check_query_status, find_results_table, parse_table};
