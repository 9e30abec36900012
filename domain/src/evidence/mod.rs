//! Evidence bundles and the oracle request format.
//!
//! - [`manifest::Manifest`] — resolved description of one bundle
//! - [`combine::combine_query`] — primary + secondary bundles → one query
//! - [`request::ProtocolRequest`] — mode prefix, identifier list and addendum

pub mod combine;
pub mod manifest;
pub mod request;

pub use combine::{combine_query, sanitize_addendum};
pub use manifest::Manifest;
pub use request::{EvidenceRequest, ProtocolMode, ProtocolRequest};
