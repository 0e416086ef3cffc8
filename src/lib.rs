//! Proxy auto-configuration (PAC) file generation for the Office 365 IP
//! Address and URL web service.
//!
//! - [`models`] - endpoint events, address/mask pairs and version documents
//! - [`processing`] - the rule-generation engine
//! - [`endpoints`] - web service client and local payload store
//! - [`service`] - the `update-check` and `generate` actions

pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;
pub mod service;

pub use config::PacConfig;
pub use error::PacError;
pub use models::EndpointEvent;
pub use service::{GenerateOptions, PacFileService};

use processing::{generated_section, merge, render_block, RenderOptions};

/// Render the rules for `events` and splice them into `template`.
///
/// The rules replace whatever sits between the two markers, on lines of
/// their own.
pub fn build_pac_file(
    events: &[EndpointEvent],
    template: &str,
    start_marker: &str,
    end_marker: &str,
    options: &RenderOptions,
) -> Result<String, PacError> {
    let block = render_block(events, options)?;
    merge(template, start_marker, end_marker, &generated_section(&block))
}

/// File name of the PAC file generated for a version.
pub fn output_file_name(version: &str) -> String {
    format!("proxy-{version}.pac")
}
