//! Position acquisition for attendance actions.

use async_trait::async_trait;
use hierarchy::Location;
use std::time::Duration;
use tracing::warn;

use crate::error::GeolocationError;

/// A source of the device's current position (browser API, GPS, fixed test value).
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Location, GeolocationError>;
}

/// Asks `provider` for a position, giving up after `timeout`.
///
/// A timeout is reported as [`GeolocationError::Timeout`] and callers treat it
/// the same as a denial: the action needing the position is not attempted.
pub async fn locate(provider: &dyn GeolocationProvider, timeout: Duration) -> Result<Location, GeolocationError> {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(result) => result,
        Err(_) => {
            warn!(?timeout, "geolocation timed out");
            Err(GeolocationError::Timeout(timeout))
        }
    }
}

/// Always answers with the same result.
#[derive(Debug, Clone)]
pub struct FixedPosition(pub Result<Location, GeolocationError>);

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<Location, GeolocationError> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Hanging;

    #[async_trait]
    impl GeolocationProvider for Hanging {
        async fn current_position(&self) -> Result<Location, GeolocationError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn hanging_provider_times_out() {
        let err = locate(&Hanging, Duration::from_millis(20)).await.unwrap_err();
        assert_eq!(err, GeolocationError::Timeout(Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn fixed_position_passes_through() {
        let here = Location::new(26.85, 80.95).unwrap();
        assert_eq!(locate(&FixedPosition(Ok(here)), Duration::from_secs(1)).await, Ok(here));
        assert_eq!(
            locate(&FixedPosition(Err(GeolocationError::Denied)), Duration::from_secs(1)).await,
            Err(GeolocationError::Denied)
        );
    }
}
