use assetdb_core::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::error::GeocodeError;
use crate::rate_limit::RateLimiter;
use crate::Geocoder;

/// One element of Nominatim's `/search?format=json` response. Coordinates
/// arrive as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Client for a Nominatim-compatible search API.
#[derive(Debug)]
pub struct NominatimClient {
    client: reqwest::Client,
    config: GeocoderConfig,
    limiter: RateLimiter,
}

impl NominatimClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::ClientInit(e.to_string()))?;
        let limiter = RateLimiter::new(config.min_interval);
        let config =
            GeocoderConfig { base_url: config.base_url.trim_end_matches('/').to_owned(), ..config };
        Ok(Self { client, config, limiter })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn request_once(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        self.limiter.acquire().await;

        let response = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            return Err(GeocodeError::HttpStatus { code: status.as_u16(), body });
        }

        let body = response.text().await?;
        let places: Vec<Place> = serde_json::from_str(&body).map_err(|e| {
            GeocodeError::JsonParse {
                context: format!("search response (body: {})", truncate(&body, 200)),
                source: e,
            }
        })?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };
        let point = parse_point(&place.lat, &place.lon)?;
        tracing::debug!(
            address,
            display_name = place.display_name.as_deref().unwrap_or(""),
            lat = point.latitude(),
            lon = point.longitude(),
            "geocoded"
        );
        Ok(Some(point))
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_error: Option<GeocodeError> = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let factor = 1u32 << (attempt - 1).min(16);
                let delay = self.config.backoff_base.saturating_mul(factor);
                tracing::warn!(
                    address,
                    "geocode retry attempt {attempt}/{} after {delay:?}",
                    max_attempts - 1
                );
                tokio::time::sleep(delay).await;
            }

            match self.request_once(address).await {
                Ok(found) => {
                    if found.is_none() {
                        tracing::warn!(address, "could not geocode address");
                    }
                    return Ok(found);
                },
                Err(e) if e.is_transient() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        let last = last_error.unwrap_or_else(|| GeocodeError::HttpStatus {
            code: 0,
            body: "no attempt made".to_owned(),
        });
        Err(GeocodeError::RetriesExhausted(Box::new(last)))
    }
}

fn parse_point(lat: &str, lon: &str) -> Result<GeoPoint, GeocodeError> {
    let invalid = || GeocodeError::InvalidCoordinates(format!("lat={lat}, lon={lon}"));
    let lat_f: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon_f: f64 = lon.trim().parse().map_err(|_| invalid())?;
    GeoPoint::new(lat_f, lon_f).map_err(|_| invalid())
}

/// Truncates a string to the given maximum length at a char boundary.
fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_string_coordinates() {
        let p = parse_point("13.7563", " 100.5018 ").unwrap();
        assert_eq!(p.latitude(), 13.7563);
        assert_eq!(p.longitude(), 100.5018);
    }

    #[test]
    fn parse_point_rejects_garbage_and_range() {
        assert!(matches!(parse_point("abc", "1"), Err(GeocodeError::InvalidCoordinates(_))));
        assert!(matches!(parse_point("95", "1"), Err(GeocodeError::InvalidCoordinates(_))));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let thai = "โรงพยาบาล";
        let t = truncate(thai, 4);
        assert!(t.len() <= 4);
        assert!(thai.starts_with(t));
    }

    #[test]
    fn new_trims_trailing_slash() {
        let config =
            GeocoderConfig { base_url: "http://localhost:8080/".to_owned(), ..Default::default() };
        let client = NominatimClient::new(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
