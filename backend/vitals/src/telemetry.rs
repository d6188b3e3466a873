//! # Telemetry
//!
//! Synthetic vitals and GPS points standing in for a collar sensor.
//!
//! Anything that implements [`TelemetrySource`] can feed the classifier and
//! the ranker, so a real device stream only has to provide the two calls.
//!
//! ## Ranges
//! - Baseline: heart rate [70, 100), temperature [38.0, 39.0), SpO2 [95, 100)
//! - Demo: heart rate [70, 110), temperature [37.5, 40.0), SpO2 [92, 100)
//!
//! The baseline never leaves the normal band. The demo ranges exist so the
//! emergency view can reach warning and critical states.
//!
//! ## Locations
//! Every point is the base origin plus independent uniform noise of at most
//! 0.0025 degrees per axis. Points do not depend on each other.

use std::ops::Range;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::models::{GeoPoint, LocationData, VitalReading};

pub const LOCATION_JITTER_DEG: f64 = 0.0025;
pub const DEFAULT_HISTORY_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct VitalRanges {
    pub heart_rate: Range<u32>,
    pub temperature: Range<f64>,
    pub sp_o2: Range<u32>,
}

impl VitalRanges {
    pub const BASELINE: VitalRanges = VitalRanges {
        heart_rate: 70..100,
        temperature: 38.0..39.0,
        sp_o2: 95..100,
    };

    pub const DEMO: VitalRanges = VitalRanges {
        heart_rate: 70..110,
        temperature: 37.5..40.0,
        sp_o2: 92..100,
    };
}

#[cfg_attr(test, mockall::automock)]
pub trait TelemetrySource {
    fn next_reading(&mut self, at: DateTime<Utc>) -> VitalReading;

    fn next_location(&mut self, at: DateTime<Utc>) -> LocationData;
}

pub struct MockTelemetry<R: Rng> {
    ranges: VitalRanges,
    origin: GeoPoint,
    rng: R,
}

impl<R: Rng> MockTelemetry<R> {
    pub fn new(ranges: VitalRanges, origin: GeoPoint, rng: R) -> Self {
        Self { ranges, origin, rng }
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }
}

impl<R: Rng> TelemetrySource for MockTelemetry<R> {
    fn next_reading(&mut self, at: DateTime<Utc>) -> VitalReading {
        VitalReading {
            timestamp: at,
            heart_rate: self.rng.gen_range(self.ranges.heart_rate.clone()),
            temperature: self.rng.gen_range(self.ranges.temperature.clone()),
            sp_o2: self.rng.gen_range(self.ranges.sp_o2.clone()),
        }
    }

    fn next_location(&mut self, at: DateTime<Utc>) -> LocationData {
        let jitter = -LOCATION_JITTER_DEG..LOCATION_JITTER_DEG;

        LocationData {
            timestamp: at,
            point: GeoPoint {
                latitude: self.origin.latitude + self.rng.gen_range(jitter.clone()),
                longitude: self.origin.longitude + self.rng.gen_range(jitter),
            },
        }
    }
}

/// `count` readings, newest first, spaced `interval` apart back from `now`.
///
/// Stops early when a timestamp would fall outside what `DateTime` can hold.
pub fn generate_readings<S: TelemetrySource + ?Sized>(
    source: &mut S,
    count: usize,
    interval: Duration,
    now: DateTime<Utc>,
) -> Vec<VitalReading> {
    (0..count)
        .map_while(|i| offset_back(now, interval, i))
        .map(|at| source.next_reading(at))
        .collect()
}

/// `count` locations, newest first, spaced `interval` apart back from `now`.
pub fn generate_locations<S: TelemetrySource + ?Sized>(
    source: &mut S,
    count: usize,
    interval: Duration,
    now: DateTime<Utc>,
) -> Vec<LocationData> {
    (0..count)
        .map_while(|i| offset_back(now, interval, i))
        .map(|at| source.next_location(at))
        .collect()
}

/// `now - interval * steps`, or `None` once that leaves the representable range.
fn offset_back(now: DateTime<Utc>, interval: Duration, steps: usize) -> Option<DateTime<Utc>> {
    let steps = i32::try_from(steps).ok()?;

    now.checked_sub_signed(interval.checked_mul(steps)?)
}

/// Prepends `item` and drops whatever falls past `capacity`.
pub fn push_newest<T>(history: &mut Vec<T>, item: T, capacity: usize) {
    history.insert(0, item);
    history.truncate(capacity);
}
