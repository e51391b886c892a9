//! Capture of report metadata: timestamp and approximate position.

use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use log::info;
use std::sync::Arc;

use crate::io::geolocation::GeolocationService;
use shared::ReportMeta;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Clone)]
pub struct ReportMetaService {
    clock: Arc<dyn Clock>,
    geolocation: GeolocationService,
    offset: FixedOffset,
    timezone_label: String,
}

impl ReportMetaService {
    pub fn new(
        clock: Arc<dyn Clock>,
        geolocation: GeolocationService,
        offset: FixedOffset,
        timezone_label: String,
    ) -> Self {
        Self {
            clock,
            geolocation,
            offset,
            timezone_label,
        }
    }

    /// Capture metadata for one export
    ///
    /// The timestamp is taken before the position lookup so that a slow
    /// lookup does not shift it.
    pub async fn capture(&self) -> ReportMeta {
        let captured_at = self
            .clock
            .now()
            .with_timezone(&self.offset)
            .trunc_subsecs(0);
        let coordinates = self.geolocation.current_position().await;
        info!(
            "🕒 META: Captured {} ({}) {}",
            captured_at.format("%Y-%m-%d %H:%M:%S"),
            self.timezone_label,
            if coordinates.is_some() { "with location" } else { "without location" }
        );
        ReportMeta {
            captured_at,
            timezone_label: self.timezone_label.clone(),
            coordinates,
        }
    }
}
