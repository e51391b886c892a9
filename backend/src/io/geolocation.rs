//! Geolocation collaborator.
//!
//! A [`Locator`] answers with coordinates or nothing at all; it never errors.
//! [`GeolocationService`] bounds every lookup with a timeout. When the
//! timeout wins, the lookup future is dropped, which cancels it, and the
//! caller gets `None` through the normal return value.

use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use shared::Coordinates;

/// Source of the device position
#[async_trait]
pub trait Locator: Send + Sync {
    /// Current position, `None` when unknown or denied
    async fn locate(&self) -> Option<Coordinates>;
}

/// Always answers with the same, preconfigured position
#[derive(Debug, Clone, Copy)]
pub struct StaticLocator {
    coordinates: Coordinates,
}

impl StaticLocator {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl Locator for StaticLocator {
    async fn locate(&self) -> Option<Coordinates> {
        Some(self.coordinates)
    }
}

/// No position source on this device
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocator;

#[async_trait]
impl Locator for UnavailableLocator {
    async fn locate(&self) -> Option<Coordinates> {
        None
    }
}

#[derive(Clone)]
pub struct GeolocationService {
    locator: Arc<dyn Locator>,
    timeout: Duration,
}

impl GeolocationService {
    pub fn new(locator: Arc<dyn Locator>, timeout: Duration) -> Self {
        Self { locator, timeout }
    }

    /// Service that answers from config when coordinates are set, never otherwise
    pub fn from_config(coordinates: Option<Coordinates>, timeout: Duration) -> Self {
        let locator: Arc<dyn Locator> = match coordinates {
            Some(coordinates) => Arc::new(StaticLocator::new(coordinates)),
            None => Arc::new(UnavailableLocator),
        };
        Self::new(locator, timeout)
    }

    /// Best-effort position, bounded by the configured timeout
    pub async fn current_position(&self) -> Option<Coordinates> {
        match tokio::time::timeout(self.timeout, self.locator.locate()).await {
            Ok(Some(coordinates)) => {
                debug!("📍 GEO: Position {}", coordinates);
                Some(coordinates)
            }
            Ok(None) => {
                debug!("📍 GEO: Position not available");
                None
            }
            Err(_) => {
                warn!("📍 GEO: Lookup abandoned after {:?}", self.timeout);
                None
            }
        }
    }
}

impl std::fmt::Debug for GeolocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeolocationService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
