//! PAC rule line formatting.
//!
//! Every match line is one term of a `||` disjunction. Lines are kept as
//! [`RuleLine`] values until the block is assembled, so
//! [`crate::processing::finish_block`] knows which line is the last term
//! without looking at the rendered text.

use crate::error::Result;
use crate::models::{convert, AddressMaskPair, EndpointEvent};

/// Indentation of every generated line inside the PAC function body.
pub const RULE_INDENT: &str = "                ";

/// Separator closing each match line.
pub const OR_SEPARATOR: &str = " ||";

/// One line of a rule block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleLine {
    /// `// {text}`
    Comment(String),
    /// A term of the disjunction, without indentation or separator.
    Match(String),
    Blank,
}

impl RuleLine {
    /// Text of the line. `last` leaves the separator off a match line.
    pub fn render(&self, last: bool) -> String {
        match self {
            RuleLine::Comment(text) => format!("{RULE_INDENT}// {text}"),
            RuleLine::Match(term) if last => format!("{RULE_INDENT}{term}"),
            RuleLine::Match(term) => format!("{RULE_INDENT}{term}{OR_SEPARATOR}"),
            RuleLine::Blank => String::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, RuleLine::Match(_))
    }
}

pub fn comment_line(text: &str) -> RuleLine {
    RuleLine::Comment(text.to_string())
}

/// `shExpMatch(host, "{url}")`
pub fn host_match_line(url: &str) -> RuleLine {
    RuleLine::Match(format!("shExpMatch(host, \"{url}\")"))
}

/// `isInNet(myIpAddress(),"{address}","{mask}")`
pub fn net_match_line(pair: &AddressMaskPair) -> RuleLine {
    RuleLine::Match(format!(
        "isInNet(myIpAddress(),\"{address}\",\"{mask}\")",
        address = pair.address,
        mask = pair.mask
    ))
}

/// Comment identifying an event.
pub fn event_comment(id: &str, service_area: &str) -> RuleLine {
    comment_line(&format!("Event ID {id} - {service_area}"))
}

/// Format a comment followed by the URL group and the address group.
///
/// A non-empty group is closed by a blank line.
pub fn format_rules(
    comment: RuleLine,
    urls: &[String],
    pairs: &[AddressMaskPair],
) -> Vec<RuleLine> {
    let mut lines = Vec::with_capacity(urls.len() + pairs.len() + 3);
    lines.push(comment);

    if !urls.is_empty() {
        lines.extend(urls.iter().map(|url| host_match_line(url)));
        lines.push(RuleLine::Blank);
    }

    if !pairs.is_empty() {
        lines.extend(pairs.iter().map(net_match_line));
        lines.push(RuleLine::Blank);
    }

    lines
}

/// Format one event. Each CIDR is converted exactly once.
pub fn format_event(event: &EndpointEvent) -> Result<Vec<RuleLine>> {
    let pairs = event
        .ip_ranges
        .iter()
        .map(|cidr| convert(cidr))
        .collect::<Result<Vec<_>>>()?;

    Ok(format_rules(
        event_comment(&event.id, &event.service_area),
        &event.urls,
        &pairs,
    ))
}
