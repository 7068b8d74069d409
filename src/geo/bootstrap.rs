use tokio::time;

use crate::common::Coordinates;

use super::{GeoError, LocationProvider, PositionOptions};

/// Where the map opens and what, if anything, to tell the user about it.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapOutcome {
    pub center: Coordinates,
    pub notice: Option<GeoError>,
}

impl BootstrapOutcome {
    pub fn from_result(result: Result<Coordinates, GeoError>, fallback: Coordinates) -> Self {
        match result {
            Ok(center) => Self {
                center,
                notice: None,
            },
            Err(err) => Self {
                center: fallback,
                notice: Some(err),
            },
        }
    }

    pub fn notice_text(&self) -> Option<&'static str> {
        self.notice.map(|err| err.user_message())
    }
}

/// Requests a single fix; never retries.
pub async fn locate(
    provider: Option<&dyn LocationProvider>,
    options: &PositionOptions,
) -> Result<Coordinates, GeoError> {
    let Some(provider) = provider else {
        return Err(GeoError::Unsupported);
    };

    let position = time::timeout(options.timeout, provider.current_position(options))
        .await
        .map_err(|_| GeoError::Timeout)??;

    let in_range = (-90.0..=90.0).contains(&position.lat) && (-180.0..=180.0).contains(&position.lng);
    if !in_range {
        log::warn!("Discarding out-of-range fix {position:?}");
        return Err(GeoError::PositionUnavailable);
    }

    Ok(position)
}

pub async fn bootstrap(
    provider: Option<&dyn LocationProvider>,
    options: &PositionOptions,
    fallback: Coordinates,
) -> BootstrapOutcome {
    let result = locate(provider, options).await;
    match &result {
        Ok(center) => log::info!("Located at {:.4}, {:.4}", center.lat, center.lng),
        Err(err) => log::error!("Unable to get location: {err}"),
    }
    BootstrapOutcome::from_result(result, fallback)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::geo::FixedLocationProvider;

    const FALLBACK: Coordinates = Coordinates::new(20.0, 0.0);

    struct NeverResolves;

    #[async_trait]
    impl LocationProvider for NeverResolves {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, GeoError> {
            std::future::pending().await
        }
    }

    struct Denied;

    #[async_trait]
    impl LocationProvider for Denied {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, GeoError> {
            Err(GeoError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn fix_becomes_center() {
        let provider = FixedLocationProvider(Coordinates::new(37.56, 126.97));
        let outcome = bootstrap(Some(&provider), &PositionOptions::default(), FALLBACK).await;

        assert_eq!(outcome.center, Coordinates::new(37.56, 126.97));
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.notice_text(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn no_fix_within_bound_times_out() {
        let started = time::Instant::now();
        let outcome = bootstrap(Some(&NeverResolves), &PositionOptions::default(), FALLBACK).await;

        assert!(started.elapsed() >= PositionOptions::default().timeout);
        assert_eq!(outcome.center, FALLBACK);
        assert_eq!(outcome.notice, Some(GeoError::Timeout));
        assert_eq!(outcome.notice_text(), Some(GeoError::Timeout.user_message()));
    }

    #[tokio::test]
    async fn missing_capability_is_unsupported() {
        let outcome = bootstrap(None, &PositionOptions::default(), FALLBACK).await;
        assert_eq!(outcome.center, FALLBACK);
        assert_eq!(outcome.notice, Some(GeoError::Unsupported));
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let outcome = bootstrap(Some(&Denied), &PositionOptions::default(), FALLBACK).await;
        assert_eq!(outcome.notice, Some(GeoError::PermissionDenied));
    }

    #[tokio::test]
    async fn out_of_range_fix_is_unavailable() {
        let provider = FixedLocationProvider(Coordinates::new(123.0, 0.0));
        let result = locate(Some(&provider), &PositionOptions::default()).await;
        assert_eq!(result, Err(GeoError::PositionUnavailable));
    }
}
