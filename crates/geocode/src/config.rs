use std::time::Duration;

use assetdb_core::env_parse_with_default;

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
/// Nominatim's usage policy requires an identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = "mercil_geocoder";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
/// One request per second, the public instance's hard limit.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Total attempts per address, including the first.
    pub max_attempts: usize,
    /// Sleep before retry `n` is `backoff_base * 2^(n-1)`.
    pub backoff_base: Duration,
    /// Minimum spacing between outbound requests.
    pub min_interval: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: Duration::from_secs(1),
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
        }
    }
}

impl GeocoderConfig {
    /// Reads `GEOCODER_URL`, `GEOCODER_USER_AGENT`, `GEOCODE_TIMEOUT_SECS`,
    /// `GEOCODE_MAX_ATTEMPTS` and `GEOCODE_DELAY_MS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GEOCODER_URL").unwrap_or(defaults.base_url),
            user_agent: std::env::var("GEOCODER_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout: Duration::from_secs(env_parse_with_default(
                "GEOCODE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            max_attempts: env_parse_with_default("GEOCODE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)
                .max(1),
            backoff_base: defaults.backoff_base,
            min_interval: Duration::from_millis(env_parse_with_default(
                "GEOCODE_DELAY_MS",
                DEFAULT_MIN_INTERVAL_MS,
            )),
        }
    }
}
