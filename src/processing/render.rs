//! Assemble the full rule block from a list of events.

use super::dedup::{optimize, Optimized};
use super::formatter::{comment_line, event_comment, format_event, format_rules, RuleLine};
use crate::error::Result;
use crate::models::EndpointEvent;
use itertools::Itertools;

/// Comment opening the shared section of an optimized block.
pub const COMMON_HEADER: &str = "Common rules shared by multiple events";

/// Version label and change log link written above a non-optimized block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHeader {
    pub version: String,
    pub changes_url: String,
}

/// How to render a block.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Factor values shared by several events into a common section.
    pub optimize: bool,
    /// Header lines, only written in non-optimized mode.
    pub header: Option<VersionHeader>,
}

/// Render the rule block for `events`.
pub fn render_block(events: &[EndpointEvent], options: &RenderOptions) -> Result<String> {
    if options.optimize {
        return Ok(render_optimized(&optimize(events)?));
    }

    let mut lines = Vec::new();
    if let Some(header) = &options.header {
        lines.push(comment_line(&format!(
            "Office 365 endpoints version {}",
            header.version
        )));
        lines.push(comment_line(&format!("See changes: {}", header.changes_url)));
    }
    for event in events {
        lines.extend(format_event(event)?);
    }
    Ok(finish_block(lines))
}

/// Render the output of [`optimize`]: shared section first, then each event.
///
/// The shared section is left out when nothing is common.
pub fn render_optimized(optimized: &Optimized) -> String {
    let mut lines = Vec::new();
    if !optimized.common_urls.is_empty() || !optimized.common_pairs.is_empty() {
        lines.extend(format_rules(
            comment_line(COMMON_HEADER),
            &optimized.common_urls,
            &optimized.common_pairs,
        ));
    }
    for event in &optimized.events {
        lines.extend(format_rules(
            event_comment(&event.id, &event.service_area),
            &event.urls,
            &event.pairs,
        ));
    }
    finish_block(lines)
}

/// Render the lines, dropping trailing blank lines and the separator of the
/// last match line.
///
/// With no match line at all a `false` term is added so the disjunction
/// stays well-formed.
pub fn finish_block(mut lines: Vec<RuleLine>) -> String {
    while lines.last() == Some(&RuleLine::Blank) {
        lines.pop();
    }

    let last_match = match lines.iter().rposition(RuleLine::is_match) {
        Some(i) => i,
        None => {
            lines.push(RuleLine::Match("false".to_string()));
            lines.len() - 1
        }
    };

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| line.render(i == last_match))
        .join("\n")
}

/// Block as inserted between the template markers, on lines of its own.
pub fn generated_section(block: &str) -> String {
    format!("\n{block}\n")
}
