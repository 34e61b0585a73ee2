// Comparables fetcher: builds the GetDeepComps request and performs the single HTTP GET

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;

const DEEP_COMPS_PATH: &str = "webservice/GetDeepComps.htm";
const API_KEY_PARAM: &str = "zws-id";

// Error types for the comparables fetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid base URL {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API responded with status {status} for {url}")]
    Status { status: StatusCode, url: String },
}

// Parameters substituted into the request URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompsQuery {
    pub zpid: u64,
    pub count: u32,
    pub rent_estimate: bool,
}

impl CompsQuery {
    pub fn from_config(zpid: u64, config: &ClientConfig) -> Self {
        Self {
            zpid,
            count: config.count,
            rent_estimate: config.rent_estimate,
        }
    }
}

/// Resolves `path` below `base_url`, keeping any path prefix the base carries.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let prefix = format!("{}/", base.path());
        base.set_path(&prefix);
    }
    base.join(path)
}

// Request URL with the API key masked, safe for logs and errors
fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    masked
        .query_pairs_mut()
        .clear()
        .extend_pairs(pairs.iter().map(|(k, v)| {
            if k == API_KEY_PARAM {
                (k.as_str(), "REDACTED")
            } else {
                (k.as_str(), v.as_str())
            }
        }));
    masked.to_string()
}

/// Builds `<base>/webservice/GetDeepComps.htm?zpid=..&zws-id=..&rentzestimate=..&count=..`.
pub fn build_request_url(
    base_url: &str,
    api_key: &str,
    query: &CompsQuery,
) -> Result<Url, FetchError> {
    let mut url = endpoint_url(base_url, DEEP_COMPS_PATH)
        .map_err(|e| FetchError::InvalidUrl(format!("{base_url:?}: {e}")))?;

    url.query_pairs_mut()
        .append_pair("zpid", &query.zpid.to_string())
        .append_pair(API_KEY_PARAM, api_key)
        .append_pair("rentzestimate", &query.rent_estimate.to_string())
        .append_pair("count", &query.count.to_string());

    Ok(url)
}

// Source of raw comparables documents
#[async_trait]
pub trait ComparablesSource: Send + Sync {
    async fn fetch(&self, query: &CompsQuery) -> Result<Bytes, FetchError>;
}

pub struct CompsClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl CompsClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn query(&self, zpid: u64) -> CompsQuery {
        CompsQuery::from_config(zpid, &self.config)
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.config.timeout_ms)
        } else {
            FetchError::Network(err)
        }
    }
}

#[async_trait]
impl ComparablesSource for CompsClient {
    async fn fetch(&self, query: &CompsQuery) -> Result<Bytes, FetchError> {
        let url = build_request_url(&self.config.base_url, &self.config.api_key, query)?;

        // The URL carries the API key, so only the query parameters are logged
        info!(
            zpid = query.zpid,
            count = query.count,
            rent_estimate = query.rent_estimate,
            "Requesting comparables"
        );

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: redacted(&url),
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!(status = status.as_u16(), bytes = body.len(), "Received comparables");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_request_url_round_trip() {
        let query = CompsQuery {
            zpid: 48749425,
            count: 25,
            rent_estimate: true,
        };
        let url = build_request_url("http://www.zillow.com", "X1-ZWz1abc_123", &query).unwrap();

        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("www.zillow.com"));
        assert_eq!(url.path(), "/webservice/GetDeepComps.htm");

        let params = query_map(&url);
        assert_eq!(params.len(), 4);
        assert_eq!(params["zpid"], "48749425");
        assert_eq!(params["zws-id"], "X1-ZWz1abc_123");
        assert_eq!(params["rentzestimate"], "true");
        assert_eq!(params["count"], "25");
    }

    #[test]
    fn test_request_url_query_order() {
        let query = CompsQuery {
            zpid: 7,
            count: 5,
            rent_estimate: false,
        };
        let url = build_request_url("http://localhost:8080/", "key", &query).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/webservice/GetDeepComps.htm?zpid=7&zws-id=key&rentzestimate=false&count=5"
        );
    }

    #[test]
    fn test_request_url_escapes_key() {
        let query = CompsQuery {
            zpid: 1,
            count: 1,
            rent_estimate: true,
        };
        let url = build_request_url("http://www.zillow.com", "a&b=c", &query).unwrap();

        assert!(url.as_str().contains("zws-id=a%26b%3Dc"));
        assert_eq!(query_map(&url)["zws-id"], "a&b=c");
    }

    #[test]
    fn test_request_url_keeps_base_path() {
        let query = CompsQuery {
            zpid: 7,
            count: 5,
            rent_estimate: true,
        };

        for base in ["http://proxy.local/zillow", "http://proxy.local/zillow/"] {
            let url = build_request_url(base, "key", &query).unwrap();
            assert_eq!(url.path(), "/zillow/webservice/GetDeepComps.htm", "{base}");
        }
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let query = CompsQuery {
            zpid: 7,
            count: 5,
            rent_estimate: true,
        };
        let url = build_request_url("http://www.zillow.com", "secret-key", &query).unwrap();
        let masked = redacted(&url);

        assert!(!masked.contains("secret-key"), "{masked}");
        assert_eq!(
            masked,
            "http://www.zillow.com/webservice/GetDeepComps.htm?zpid=7&zws-id=REDACTED&rentzestimate=true&count=5"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let query = CompsQuery {
            zpid: 1,
            count: 1,
            rent_estimate: true,
        };
        let err = build_request_url("not a url", "key", &query).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_query_from_config() {
        let mut config = ClientConfig::new("key");
        config.count = 10;
        config.rent_estimate = false;

        let client = CompsClient::new(config).unwrap();
        assert_eq!(
            client.query(99),
            CompsQuery {
                zpid: 99,
                count: 10,
                rent_estimate: false,
            }
        );
    }
}
