//! Optimization report.

use crate::models::EndpointEvent;
use crate::processing::Optimized;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    if quoted.len() >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Counts before and after optimization for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: String,
    pub service_area: String,
    pub urls_before: usize,
    pub ranges_before: usize,
    pub urls_after: usize,
    pub ranges_after: usize,
}

/// Summary of an optimization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationReport {
    pub events_in: usize,
    pub events_out: usize,
    pub common_urls: usize,
    pub common_pairs: usize,
    pub rows: Vec<EventRow>,
}

impl OptimizationReport {
    pub fn new(events: &[EndpointEvent], optimized: &Optimized) -> OptimizationReport {
        let mut remaining = optimized.events.iter().peekable();
        let rows = events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let reduced = remaining.next_if(|r| r.index == index);
                EventRow {
                    id: event.id.clone(),
                    service_area: event.service_area.clone(),
                    urls_before: event.urls.len(),
                    ranges_before: event.ip_ranges.len(),
                    urls_after: reduced.map_or(0, |r| r.urls.len()),
                    ranges_after: reduced.map_or(0, |r| r.pairs.len()),
                }
            })
            .collect();

        OptimizationReport {
            events_in: events.len(),
            events_out: optimized.events.len(),
            common_urls: optimized.common_urls.len(),
            common_pairs: optimized.common_pairs.len(),
            rows,
        }
    }

    /// Report as text lines, one row per input event.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "events: {} in, {} out ({} removed)",
                self.events_in,
                self.events_out,
                self.events_in - self.events_out
            ),
            format!(
                "common section: {} url(s), {} address range(s)",
                self.common_urls, self.common_pairs
            ),
            format!(
                "{},{},{},{}",
                format_field("id", 6),
                format_field("service_area", 14),
                format_field("urls", 10),
                format_field("ranges", 10)
            ),
        ];
        for row in &self.rows {
            lines.push(format!(
                "{},{},{},{}",
                format_field(&row.id, 6),
                format_field(&row.service_area, 14),
                format_field(format!("{}->{}", row.urls_before, row.urls_after), 10),
                format_field(format!("{}->{}", row.ranges_before, row.ranges_after), 10),
            ));
        }
        lines
    }

    pub fn print(&self) {
        println!(
            "#{}# Optimization report {}",
            "REPORT".on_blue(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        for line in self.lines() {
            println!("{line}");
        }
    }
}
