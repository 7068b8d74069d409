use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::common::Coordinates;
use crate::config::GeolocationSource;

use super::GeoError;

/// Bounded wait for the startup fix.
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: LOCATE_TIMEOUT,
            high_accuracy: true,
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self, options: &PositionOptions)
    -> Result<Coordinates, GeoError>;
}

/// Builds the provider for a configured source; `None` means no capability.
pub fn provider_for(source: &GeolocationSource) -> Option<Box<dyn LocationProvider>> {
    match source {
        GeolocationSource::Ip { endpoint } => {
            Some(Box::new(IpLocationProvider::new(Client::new(), endpoint)))
        }
        GeolocationSource::Fixed { lat, lng } => Some(Box::new(FixedLocationProvider(
            Coordinates::new(*lat, *lng),
        ))),
        GeolocationSource::Disabled => None,
    }
}

/// Resolves the machine's approximate position through an IP lookup service.
pub struct IpLocationProvider {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon")]
    longitude: f64,
}

impl IpLocationProvider {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeoError> {
        if options.high_accuracy {
            log::debug!("IP lookup cannot honour high accuracy; using best effort");
        }

        let response = self.client.get(&self.endpoint).send().await.map_err(|err| {
            log::warn!("Location lookup failed: {err}");
            GeoError::PositionUnavailable
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GeoError::PermissionDenied);
            }
            status if !status.is_success() => {
                log::warn!("Location lookup returned {status}");
                return Err(GeoError::PositionUnavailable);
            }
            _ => {}
        }

        let lookup: IpLookup = response.json().await.map_err(|err| {
            log::warn!("Location lookup body not understood: {err}");
            GeoError::PositionUnavailable
        })?;

        Ok(Coordinates::new(lookup.latitude, lookup.longitude))
    }
}

/// Always reports the same position.
pub struct FixedLocationProvider(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeoError> {
        Ok(self.0)
    }
}
