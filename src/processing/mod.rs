//! PAC rule generation.
//!
//! This module contains the rule-generation engine:
//! - [`formatter`] - PAC rule lines for one event
//! - [`dedup`] - factoring values shared by several events into a common section
//! - [`render`] - assembling and trimming the full rule block
//! - [`template`] - splicing the block into a template between markers

mod dedup;
mod formatter;
mod render;
mod template;

// Re-export public functions
pub use dedup::{optimize, Optimized, ReducedEvent};
pub use formatter::{format_event, RuleLine, OR_SEPARATOR, RULE_INDENT};
pub use render::{
    finish_block, generated_section, render_block, render_optimized, RenderOptions, VersionHeader,
};
pub use template::merge;
