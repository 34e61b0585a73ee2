// Client and distance-matrix configuration

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://www.zillow.com";
pub const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_COUNT: u32 = 25;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// Comparables API configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub count: u32,
    pub rent_estimate: bool,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            count: DEFAULT_COUNT,
            rent_estimate: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// Distance-matrix service configuration
#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub base_url: String,
    pub api_key: String,
}

impl MapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_MAPS_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }
}
