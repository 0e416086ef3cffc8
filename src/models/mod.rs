//! Domain models for PAC rule generation.
//!
//! This module contains the core data structures used throughout the application:
//! - [`AddressMaskPair`] - IPv4 address with its dotted-decimal subnet mask
//! - [`EndpointEvent`] - one endpoint set from the web service
//! - [`VersionInfo`] - the web service version document

mod event;
mod ipv4;
mod version;

// Re-export public types
pub use event::EndpointEvent;
pub use ipv4::{convert, get_cidr_mask, mask_for_prefix, AddressMaskPair, MAX_LENGTH};
pub use version::{VersionInfo, DEFAULT_VERSION};
