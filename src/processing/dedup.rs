//! Cross-event de-duplication of URLs and address/mask pairs.
//!
//! A value is common when it occurs more than once in the flattened sequence
//! of all events, even if every occurrence is inside the same event. Common
//! values are listed once, in first-seen order, and removed from every event.

use crate::error::Result;
use crate::models::{convert, AddressMaskPair, EndpointEvent};
use itertools::Itertools;
use std::collections::HashSet;
use std::hash::Hash;

/// An event after common values were taken out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedEvent {
    /// Position of the source event in the input list.
    pub index: usize,
    pub id: String,
    pub service_area: String,
    pub urls: Vec<String>,
    pub pairs: Vec<AddressMaskPair>,
}

impl ReducedEvent {
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.pairs.is_empty()
    }
}

/// Result of [`optimize`]: the shared section and the remaining events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Optimized {
    pub common_urls: Vec<String>,
    pub common_pairs: Vec<AddressMaskPair>,
    /// Events that still have rules of their own, in input order.
    pub events: Vec<ReducedEvent>,
}

/// Values occurring more than once, in order of first occurrence.
fn repeated<'a, T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Clone + 'a,
    I: Iterator<Item = &'a T> + Clone,
{
    let counts = values.clone().counts();
    values
        .filter(|v| counts[v] > 1)
        .unique()
        .cloned()
        .collect()
}

/// Split the events into a common section and per-event remainders.
///
/// Fails if any CIDR does not parse, nothing is returned in that case.
pub fn optimize(events: &[EndpointEvent]) -> Result<Optimized> {
    let converted = events
        .iter()
        .map(|e| {
            e.ip_ranges
                .iter()
                .map(|cidr| convert(cidr))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let common_urls = repeated(events.iter().flat_map(|e| e.urls.iter()));
    let common_pairs = repeated(converted.iter().flatten());

    let url_set: HashSet<&String> = common_urls.iter().collect();
    let pair_set: HashSet<&AddressMaskPair> = common_pairs.iter().collect();

    let reduced = events
        .iter()
        .zip(converted)
        .enumerate()
        .map(|(index, (event, pairs))| ReducedEvent {
            index,
            id: event.id.clone(),
            service_area: event.service_area.clone(),
            urls: event
                .urls
                .iter()
                .filter(|u| !url_set.contains(u))
                .cloned()
                .collect(),
            pairs: pairs
                .into_iter()
                .filter(|p| !pair_set.contains(p))
                .collect(),
        })
        .filter(|e| !e.is_empty())
        .collect();

    Ok(Optimized {
        common_urls,
        common_pairs,
        events: reduced,
    })
}
