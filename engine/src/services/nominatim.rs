//! Nominatim-compatible geocoding client
//!
//! Resolves free-text addresses through the `/search` endpoint of a Nominatim
//! server. All calls share one [`RateLimiter`]; the public OpenStreetMap
//! instance allows one request per second and requires a `User-Agent`.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use shared::{ComponentId, Coordinate, component_debug, component_warn, defaults};
use crate::config::GeocoderConfig;
use crate::error::{EngineError, EngineResult};
use crate::services::rate_limiter::RateLimiter;
use crate::traits::Geocoder;
use crate::types::GeocodeFailure;

/// One search hit. Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Real geocoder backed by HTTP
pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: Url,
    limiter: RateLimiter,
}

impl NominatimGeocoder {
    /// Create a client from configuration
    pub fn new(config: &GeocoderConfig) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EngineError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            search_url: Self::search_url(&config.base_url)?,
            limiter: RateLimiter::new(config.min_delay),
        })
    }

    fn search_url(base_url: &str) -> EngineResult<Url> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|url| url.join("search"))
            .map_err(|e| EngineError::config(format!("Invalid geocoder URL '{base_url}': {e}")))
    }

    fn request_url(&self, address: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }

    /// Addresses that can never match and are not worth a rate-limited call
    fn is_placeholder(address: &str) -> bool {
        let trimmed = address.trim();
        trimmed.is_empty() || trimmed == defaults::ADDRESS
    }

    fn parse_places(places: &[Place]) -> Result<Coordinate, GeocodeFailure> {
        let place = places.first().ok_or(GeocodeFailure::NoMatch)?;
        let lat = place
            .lat
            .parse::<f64>()
            .map_err(|e| GeocodeFailure::InvalidResponse(format!("bad latitude '{}': {e}", place.lat)))?;
        let lon = place
            .lon
            .parse::<f64>()
            .map_err(|e| GeocodeFailure::InvalidResponse(format!("bad longitude '{}': {e}", place.lon)))?;
        Coordinate::from_parts(Some(lat), Some(lon))
            .ok_or_else(|| GeocodeFailure::InvalidResponse("non-finite coordinate".to_string()))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeFailure> {
        if Self::is_placeholder(address) {
            return Err(GeocodeFailure::NoMatch);
        }

        let waited = self.limiter.acquire().await;
        component_debug!(
            ComponentId::Geocoder,
            waited_ms = waited.as_millis() as u64,
            "Resolving address '{}'",
            address
        );

        let response = self
            .client
            .get(self.request_url(address))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeFailure::Timeout
                } else {
                    GeocodeFailure::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            component_warn!(ComponentId::Geocoder, "Geocoder returned HTTP {} for '{}'", status, address);
            return match status.as_u16() {
                429 => Err(GeocodeFailure::RateLimited),
                _ => Err(GeocodeFailure::ServiceUnavailable(status.to_string())),
            };
        }

        let places: Vec<Place> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GeocodeFailure::Timeout
            } else {
                GeocodeFailure::InvalidResponse(format!("Failed to parse response: {e}"))
            }
        })?;

        Self::parse_places(&places)
    }
}
