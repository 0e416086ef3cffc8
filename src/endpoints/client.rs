//! Office 365 IP Address and URL web service client.

use crate::config::{PacConfig, HTTP_TIMEOUT_SEC};
use crate::models::{EndpointEvent, VersionInfo};
use crate::output::console;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::time::Duration;

/// Client for the `/version`, `/endpoints` and `/changes` calls.
pub struct EndpointClient {
    http: reqwest::Client,
    root_url: String,
    instance: String,
    client_request_id: String,
    include_ipv6: bool,
}

/// A fetched document: raw body and its parsed form.
#[derive(Debug)]
pub struct Fetched<T> {
    pub raw: String,
    pub parsed: T,
}

impl EndpointClient {
    pub fn new(config: &PacConfig) -> Result<EndpointClient, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SEC))
            .build()
            .map_err(|e| format!("Error building HTTP client: {e}"))?;
        Ok(EndpointClient {
            http,
            root_url: config.web_service_root_url.clone(),
            instance: config.instance.clone(),
            client_request_id: config.client_request_id.clone(),
            include_ipv6: config.include_ipv6,
        })
    }

    pub fn version_url(&self) -> String {
        format!(
            "{}/version/{}?clientrequestid={}",
            self.root_url, self.instance, self.client_request_id
        )
    }

    pub fn endpoints_url(&self) -> String {
        let url = format!(
            "{}/endpoints/{}?clientrequestid={}",
            self.root_url, self.instance, self.client_request_id
        );
        if self.include_ipv6 {
            url
        } else {
            format!("{url}&NoIPv6=true")
        }
    }

    /// Change log link for a version, written into the PAC header.
    pub fn changes_url(&self, version: &str) -> String {
        format!(
            "{}/changes/{}/{}?clientrequestid={}",
            self.root_url, self.instance, version, self.client_request_id
        )
    }

    /// Fetch the latest version document.
    pub async fn fetch_version(&self) -> Result<Fetched<VersionInfo>, Box<dyn Error>> {
        let raw = self.get(&self.version_url()).await?;
        let parsed = parse_json(&raw, "version")?;
        Ok(Fetched { raw, parsed })
    }

    /// Fetch the endpoint list. IPv6 ranges are dropped.
    pub async fn fetch_endpoints(&self) -> Result<Fetched<Vec<EndpointEvent>>, Box<dyn Error>> {
        let raw = self.get(&self.endpoints_url()).await?;
        let parsed = parse_endpoints(&raw)?;
        Ok(Fetched { raw, parsed })
    }

    async fn get(&self, url: &str) -> Result<String, Box<dyn Error>> {
        log::info!("GET {url}");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| format!("Error calling {url}: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Web service returned {status} for {url}").into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("Error reading response from {url}: {e}"))?;
        log::debug!("GET {url} -> {} bytes", body.len());

        if body.trim().is_empty() {
            return Err(
                "Office 365 endpoint API data is empty. Please check the configuration and try again."
                    .into(),
            );
        }
        Ok(body)
    }
}

fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let parsed = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", raw);
        format!("Error parsing {what} JSON: path={} error={}", e.path(), e)
    })?;
    Ok(parsed)
}

/// Parse an endpoint payload, dropping IPv6 ranges.
pub fn parse_endpoints(raw: &str) -> Result<Vec<EndpointEvent>, Box<dyn Error>> {
    let mut events: Vec<EndpointEvent> = parse_json(raw, "endpoints")?;
    for event in events.iter_mut() {
        let before = event.ip_ranges.len();
        event.ip_ranges.retain(|cidr| !cidr.contains(':'));
        let dropped = before - event.ip_ranges.len();
        if dropped > 0 {
            console::warning(format!(
                "Event {}: skipped {dropped} IPv6 range(s)",
                event.id
            ));
        }
    }
    log::info!("Parsed {} endpoint events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(include_ipv6: bool) -> EndpointClient {
        let config = PacConfig {
            web_service_root_url: "https://endpoints.example.test".to_string(),
            client_request_id: "b10c5ed1-bad1-445f-b386-b919946339a7".to_string(),
            include_ipv6,
            ..Default::default()
        };
        EndpointClient::new(&config).unwrap()
    }

    #[test]
    fn test_urls() {
        let c = client(false);
        assert_eq!(
            c.version_url(),
            "https://endpoints.example.test/version/Worldwide?clientrequestid=b10c5ed1-bad1-445f-b386-b919946339a7"
        );
        assert_eq!(
            c.endpoints_url(),
            "https://endpoints.example.test/endpoints/Worldwide?clientrequestid=b10c5ed1-bad1-445f-b386-b919946339a7&NoIPv6=true"
        );
        assert_eq!(
            c.changes_url("2024103000"),
            "https://endpoints.example.test/changes/Worldwide/2024103000?clientrequestid=b10c5ed1-bad1-445f-b386-b919946339a7"
        );
        assert!(!client(true).endpoints_url().contains("NoIPv6"));
    }

    #[test]
    fn test_parse_endpoints_sample() {
        let raw = std::fs::read_to_string("src/tests/test_data/endpoints_sample.json")
            .expect("Error reading test data");
        let events = parse_endpoints(&raw).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].id, "1");
        assert_eq!(events[0].service_area, "Exchange");
        // IPv6 range removed from event 1.
        assert!(events[0].ip_ranges.iter().all(|r| !r.contains(':')));
        assert_eq!(events[0].ip_ranges, vec!["13.107.6.152/31", "40.92.0.0/15"]);
    }

    #[test]
    fn test_parse_version() {
        let raw = std::fs::read_to_string("src/tests/test_data/version_sample.json")
            .expect("Error reading test data");
        let info: VersionInfo = parse_json(&raw, "version").unwrap();
        assert_eq!(info.instance, "Worldwide");
        assert_eq!(info.latest, "2024103000");
    }

    #[test]
    fn test_parse_error_has_path() {
        let err = parse_endpoints(r#"[{"id":1,"serviceArea":"A","urls":[5]}]"#).unwrap_err();
        assert!(err.to_string().contains("urls"), "{err}");
    }
}
