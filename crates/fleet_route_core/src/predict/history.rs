use std::collections::HashMap;

use fleet_route_derive::New;

use crate::{DriverId, ZoneId};

/// Aggregated past deliveries for one driver or zone.
#[derive(Clone, Copy, Debug, PartialEq, New)]
pub struct PerformanceStats {
    pub samples: usize,
    pub avg_actual_minutes: f64,
    /// What the speed-only estimate predicted for the same deliveries.
    pub avg_baseline_minutes: f64,
}

/// Read-only view of historical durations. Implementations answer `None` for unknown keys.
pub trait HistorySource {
    fn driver_stats(&self, driver: &DriverId) -> Option<PerformanceStats>;

    fn zone_stats(&self, zone: &ZoneId) -> Option<PerformanceStats>;
}

impl<T: HistorySource + ?Sized> HistorySource for &T {
    fn driver_stats(&self, driver: &DriverId) -> Option<PerformanceStats> {
        (**self).driver_stats(driver)
    }

    fn zone_stats(&self, zone: &ZoneId) -> Option<PerformanceStats> {
        (**self).zone_stats(zone)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoHistory;

impl HistorySource for NoHistory {
    fn driver_stats(&self, _driver: &DriverId) -> Option<PerformanceStats> {
        None
    }

    fn zone_stats(&self, _zone: &ZoneId) -> Option<PerformanceStats> {
        None
    }
}

/// In-memory statistics loaded once per planning call.
#[derive(Clone, Debug, Default)]
pub struct HistorySnapshot {
    drivers: HashMap<DriverId, PerformanceStats>,
    zones: HashMap<ZoneId, PerformanceStats>,
}

impl HistorySnapshot {
    pub fn with_driver(mut self, driver: impl Into<DriverId>, stats: PerformanceStats) -> Self {
        self.drivers.insert(driver.into(), stats);
        self
    }

    pub fn with_zone(mut self, zone: impl Into<ZoneId>, stats: PerformanceStats) -> Self {
        self.zones.insert(zone.into(), stats);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.zones.is_empty()
    }
}

impl HistorySource for HistorySnapshot {
    fn driver_stats(&self, driver: &DriverId) -> Option<PerformanceStats> {
        self.drivers.get(driver).copied()
    }

    fn zone_stats(&self, zone: &ZoneId) -> Option<PerformanceStats> {
        self.zones.get(zone).copied()
    }
}
