//! Office 365 IP Address and URL web service interaction.
//!
//! This module handles everything outside the rule engine's inputs:
//! - [`client`] - HTTP calls for the version document and endpoint list
//! - [`store`] - local copies of the last fetched payloads

mod client;
mod store;

// Re-export public types and functions
pub use client::{parse_endpoints, EndpointClient, Fetched};
pub use store::PayloadStore;
