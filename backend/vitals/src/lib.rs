//! # Vitals
//!
//! Shared pet health domain.
//!
//! - [`models`]: readings, locations, clinics, alerts, reports
//! - [`classifier`]: severity from the latest reading
//! - [`proximity`]: nearest clinics by haversine distance
//! - [`telemetry`]: synthetic sensor feed
//! - [`reports`]: daily health summaries
//! - [`catalog`]: fixed demo data
//!
//! Classification and ranking are pure. Given the same reading and the same
//! clinic list they always return the same result; only the telemetry and
//! report generators draw random numbers.

pub mod catalog;
pub mod classifier;
pub mod models;
pub mod proximity;
pub mod reports;
pub mod telemetry;

pub use classifier::{Classification, classify};
pub use models::{GeoPoint, Severity, VitalMetric, VitalReading};
pub use proximity::{haversine_km, rank};
pub use telemetry::{MockTelemetry, TelemetrySource, VitalRanges};
