use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalReading {
    pub timestamp: DateTime<Utc>,
    pub heart_rate: u32,
    pub temperature: f64,
    #[serde(rename = "spO2")]
    pub sp_o2: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub point: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Veterinarian {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    /// Kilometres from the last ranking origin. Never authoritative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VitalMetric {
    #[serde(rename = "heartRate")]
    HeartRate,
    #[serde(rename = "temperature")]
    Temperature,
    #[serde(rename = "spO2")]
    SpO2,
}

impl VitalMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            VitalMetric::HeartRate => "heartRate",
            VitalMetric::Temperature => "temperature",
            VitalMetric::SpO2 => "spO2",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            VitalMetric::HeartRate => "bpm",
            VitalMetric::Temperature => "°C",
            VitalMetric::SpO2 => "%",
        }
    }

    /// Raw value of this metric in a reading.
    pub fn value_of(self, reading: &VitalReading) -> f64 {
        match self {
            VitalMetric::HeartRate => reading.heart_rate as f64,
            VitalMetric::Temperature => reading.temperature,
            VitalMetric::SpO2 => reading.sp_o2 as f64,
        }
    }
}

impl fmt::Display for VitalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub breed: String,
    pub age: u32,
    pub weight: f64,
    pub sex: Sex,
    pub owner_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Vaccination,
    Appointment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    pub pet_id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub date: NaiveDate,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veterinarian: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert {
    pub id: String,
    pub pet_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub metric: VitalMetric,
    pub value: f64,
    pub status: AlertStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 3] = [
        ActivityLevel::Low,
        ActivityLevel::Moderate,
        ActivityLevel::High,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub date: NaiveDate,
    pub average_heart_rate: u32,
    pub average_temperature: f64,
    #[serde(rename = "averageSpO2")]
    pub average_sp_o2: u32,
    pub activity_level: ActivityLevel,
    pub alerts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietRecommendation {
    pub id: String,
    pub pet_id: String,
    pub timestamp: DateTime<Utc>,
    pub recommendation: String,
    pub source: DietSource,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown time range: {0}")]
pub struct UnknownTimeRange(pub String);

/// History window offered by the monitoring and tracking views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    Day,
}

impl TimeRange {
    pub fn span(self) -> Duration {
        match self {
            TimeRange::OneHour => Duration::hours(1),
            TimeRange::SixHours => Duration::hours(6),
            TimeRange::Day => Duration::hours(24),
        }
    }

    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.span()
    }
}

impl FromStr for TimeRange {
    type Err = UnknownTimeRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(TimeRange::OneHour),
            "6h" => Ok(TimeRange::SixHours),
            "24h" => Ok(TimeRange::Day),
            other => Err(UnknownTimeRange(other.to_string())),
        }
    }
}

/// Anything stamped with a recording instant.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for VitalReading {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for LocationData {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Keeps the entries recorded at or after the range cutoff, preserving order.
pub fn within<T: Timestamped + Clone>(items: &[T], range: TimeRange, now: DateTime<Utc>) -> Vec<T> {
    let cutoff = range.cutoff(now);

    items
        .iter()
        .filter(|item| item.timestamp() >= cutoff)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn reading_at(timestamp: DateTime<Utc>) -> VitalReading {
        VitalReading {
            timestamp,
            heart_rate: 80,
            temperature: 38.5,
            sp_o2: 97,
        }
    }

    #[test]
    fn test_reading_json_field_names() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_value(reading_at(at)).unwrap();

        assert_eq!(json["heartRate"], 80);
        assert_eq!(json["spO2"], 97);
        assert_eq!(json["temperature"], 38.5);
    }

    #[test]
    fn test_vet_flattens_location() {
        let vet = Veterinarian {
            id: "vet1".into(),
            name: "Clinic".into(),
            address: "Somewhere".into(),
            phone: "000".into(),
            email: String::new(),
            location: GeoPoint::new(28.47, 77.50),
            distance: None,
        };
        let json = serde_json::to_value(&vet).unwrap();

        assert_eq!(json["latitude"], 28.47);
        assert_eq!(json["longitude"], 77.50);
        assert!(json.get("distance").is_none());
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("1h".parse::<TimeRange>(), Ok(TimeRange::OneHour));
        assert_eq!("24h".parse::<TimeRange>(), Ok(TimeRange::Day));
        assert!("2d".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::default(), TimeRange::SixHours);
    }

    #[test]
    fn test_within_drops_old_entries() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let readings: Vec<_> = (0..24)
            .map(|i| reading_at(now - Duration::hours(i)))
            .collect();

        assert_eq!(within(&readings, TimeRange::OneHour, now).len(), 2);
        assert_eq!(within(&readings, TimeRange::SixHours, now).len(), 7);
        assert_eq!(within(&readings, TimeRange::Day, now).len(), 24);
    }
}
