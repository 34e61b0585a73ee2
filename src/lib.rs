// Comparable-property lookup against the deep comps web service

pub mod client;
pub mod config;
pub mod lookup;
pub mod report;
pub mod schema;
pub mod validate;

// Re-export key types for convenience
pub use client::{build_request_url, ComparablesSource, CompsClient, CompsQuery, FetchError};
pub use config::{ClientConfig, MapsConfig};
pub use lookup::{lookup, LookupError};
pub use report::{distance_matrix_url, write_listing, write_listing_json, ListingLine, UrlError};
pub use schema::{parse_response, Address, Message, ParseError, Property, RentInfo, Request, Response};
pub use validate::{validate_response, ValidationError};
