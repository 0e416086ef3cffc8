//! Endpoint event data model.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

/// One endpoint set ("event") from the web service: a service area with the
/// hostnames and IPv4 ranges that should bypass the proxy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EndpointEvent {
    /// Event identifier. The service sends a number, test data may use strings.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    /// Service area label, only used in the rule comment.
    #[serde(default)]
    pub service_area: String,
    /// Hostname patterns, may contain wildcards.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub urls: Vec<String>,
    /// IPv4 ranges in CIDR notation.
    #[serde(rename = "ips", default, deserialize_with = "null_as_empty")]
    pub ip_ranges: Vec<String>,
}

impl EndpointEvent {
    pub fn new(id: &str, service_area: &str, urls: &[&str], ip_ranges: &[&str]) -> Self {
        EndpointEvent {
            id: id.to_string(),
            service_area: service_area.to_string(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            ip_ranges: ip_ranges.iter().map(|ip| ip.to_string()).collect(),
        }
    }

    /// True when the event carries neither URLs nor IP ranges.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.ip_ranges.is_empty()
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid event id: {other}"))),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
