//! # Vital Classifier
//!
//! Maps the latest reading to a severity level with fixed thresholds.
//!
//! Checks run in a fixed priority, first match wins:
//!
//! | Order | Condition | Severity |
//! |-------|-----------|----------|
//! | 1 | heart rate > 140 bpm | critical |
//! | 2 | heart rate > 120 bpm | warning |
//! | 3 | temperature > 40.0 °C | critical |
//! | 4 | temperature > 39.5 °C | warning |
//! | 5 | SpO2 < 92 % | critical |
//! | 6 | SpO2 < 95 % | warning |
//!
//! Severity only ever looks at one reading. There is no hold or clear
//! threshold, so a value hovering around a boundary will flip between levels
//! on consecutive ticks.

use serde::Serialize;

use crate::models::{AlertStatus, EmergencyAlert, Severity, VitalMetric, VitalReading};

pub const HEART_RATE_CRITICAL: u32 = 140;
pub const HEART_RATE_WARNING: u32 = 120;
pub const TEMPERATURE_CRITICAL: f64 = 40.0;
pub const TEMPERATURE_WARNING: f64 = 39.5;
pub const SPO2_CRITICAL: u32 = 92;
pub const SPO2_WARNING: u32 = 95;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<VitalMetric>,
    pub title: &'static str,
    pub advisory: String,
    pub tips: &'static [&'static str],
}

impl Classification {
    fn normal() -> Self {
        Self {
            severity: Severity::Normal,
            metric: None,
            title: "All Vitals Normal",
            advisory: "Vital signs are currently within normal ranges. Continue to monitor regularly."
                .to_string(),
            tips: &[],
        }
    }

    pub fn is_normal(&self) -> bool {
        self.severity == Severity::Normal
    }

    /// Active alert for the triggering metric, `None` when nothing fired.
    pub fn to_alert(
        &self,
        id: impl Into<String>,
        pet_id: impl Into<String>,
        reading: &VitalReading,
    ) -> Option<EmergencyAlert> {
        let metric = self.metric?;

        Some(EmergencyAlert {
            id: id.into(),
            pet_id: pet_id.into(),
            timestamp: reading.timestamp,
            metric,
            value: metric.value_of(reading),
            status: AlertStatus::Active,
            notes: Some(self.title.to_string()),
        })
    }
}

pub fn classify(reading: &VitalReading) -> Classification {
    let heart_rate = reading.heart_rate;
    let temperature = reading.temperature;
    let sp_o2 = reading.sp_o2;

    if heart_rate > HEART_RATE_CRITICAL {
        Classification {
            severity: Severity::Critical,
            metric: Some(VitalMetric::HeartRate),
            title: "Elevated Heart Rate",
            advisory: format!(
                "Your pet's heart rate is {heart_rate} bpm, which is significantly above the normal range (60-120 bpm)."
            ),
            tips: HEART_RATE_CRITICAL_TIPS,
        }
    } else if heart_rate > HEART_RATE_WARNING {
        Classification {
            severity: Severity::Warning,
            metric: Some(VitalMetric::HeartRate),
            title: "Elevated Heart Rate",
            advisory: format!(
                "Your pet's heart rate is {heart_rate} bpm, which is above the normal range (60-120 bpm)."
            ),
            tips: HEART_RATE_WARNING_TIPS,
        }
    } else if temperature > TEMPERATURE_CRITICAL {
        Classification {
            severity: Severity::Critical,
            metric: Some(VitalMetric::Temperature),
            title: "High Temperature",
            advisory: format!(
                "Your pet's temperature is {temperature:.1}°C, which is significantly above the normal range (37.5-39.5°C)."
            ),
            tips: TEMPERATURE_CRITICAL_TIPS,
        }
    } else if temperature > TEMPERATURE_WARNING {
        Classification {
            severity: Severity::Warning,
            metric: Some(VitalMetric::Temperature),
            title: "Elevated Temperature",
            advisory: format!(
                "Your pet's temperature is {temperature:.1}°C, which is above the normal range (37.5-39.5°C)."
            ),
            tips: TEMPERATURE_WARNING_TIPS,
        }
    } else if sp_o2 < SPO2_CRITICAL {
        Classification {
            severity: Severity::Critical,
            metric: Some(VitalMetric::SpO2),
            title: "Low Oxygen Saturation",
            advisory: format!(
                "Your pet's oxygen saturation is {sp_o2}%, which is significantly below the normal range (95-100%)."
            ),
            tips: SPO2_CRITICAL_TIPS,
        }
    } else if sp_o2 < SPO2_WARNING {
        Classification {
            severity: Severity::Warning,
            metric: Some(VitalMetric::SpO2),
            title: "Low Oxygen Saturation",
            advisory: format!(
                "Your pet's oxygen saturation is {sp_o2}%, which is below the normal range (95-100%)."
            ),
            tips: SPO2_WARNING_TIPS,
        }
    } else {
        Classification::normal()
    }
}

const HEART_RATE_CRITICAL_TIPS: &[&str] = &[
    "Keep your pet calm and in a quiet environment",
    "Ensure they have access to fresh water",
    "Avoid any strenuous activity",
    "Contact your veterinarian immediately",
    "Monitor for other symptoms like difficulty breathing or weakness",
];

const HEART_RATE_WARNING_TIPS: &[&str] = &[
    "Keep your pet calm and in a quiet environment",
    "Ensure they have access to fresh water",
    "Avoid any strenuous activity",
    "Monitor for changes and contact your veterinarian if it persists",
];

const TEMPERATURE_CRITICAL_TIPS: &[&str] = &[
    "Move your pet to a cool, shaded area",
    "Provide fresh, cool water to drink",
    "Apply cool (not cold) water to their paws and ears",
    "Use a fan to increase air circulation",
    "Contact your veterinarian immediately as heat stroke is a medical emergency",
];

const TEMPERATURE_WARNING_TIPS: &[&str] = &[
    "Ensure your pet is in a cool, comfortable environment",
    "Provide plenty of fresh water",
    "Monitor for other symptoms like lethargy or loss of appetite",
    "Contact your veterinarian if the temperature continues to rise or persists",
];

const SPO2_CRITICAL_TIPS: &[&str] = &[
    "Keep your pet calm and restrict movement",
    "Ensure they are in a well-ventilated area",
    "Check for any signs of breathing difficulty or blue gums",
    "Contact your veterinarian immediately as low oxygen is a medical emergency",
];

const SPO2_WARNING_TIPS: &[&str] = &[
    "Keep your pet calm and restrict movement",
    "Ensure they are in a well-ventilated area",
    "Monitor for any signs of breathing difficulty",
    "Contact your veterinarian if the levels continue to drop or other symptoms develop",
];

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn reading(heart_rate: u32, temperature: f64, sp_o2: u32) -> VitalReading {
        VitalReading {
            timestamp: Utc::now(),
            heart_rate,
            temperature,
            sp_o2,
        }
    }

    fn outcome(heart_rate: u32, temperature: f64, sp_o2: u32) -> (Severity, Option<VitalMetric>) {
        let result = classify(&reading(heart_rate, temperature, sp_o2));
        (result.severity, result.metric)
    }

    #[test]
    fn test_normal_reading() {
        let result = classify(&reading(100, 38.0, 98));

        assert_eq!(result.severity, Severity::Normal);
        assert_eq!(result.metric, None);
        assert!(result.tips.is_empty());
        assert!(result.is_normal());
    }

    #[test]
    fn test_heart_rate_warning_band() {
        for heart_rate in 121..=140 {
            assert_eq!(
                outcome(heart_rate, 38.0, 98),
                (Severity::Warning, Some(VitalMetric::HeartRate)),
                "heart rate {heart_rate}"
            );
        }
        assert_eq!(outcome(120, 38.0, 98), (Severity::Normal, None));
    }

    #[test]
    fn test_heart_rate_critical_overrides_everything() {
        assert_eq!(
            outcome(141, 41.0, 80),
            (Severity::Critical, Some(VitalMetric::HeartRate))
        );
        assert_eq!(
            outcome(200, 38.0, 98),
            (Severity::Critical, Some(VitalMetric::HeartRate))
        );
    }

    #[test]
    fn test_heart_rate_warning_beats_critical_temperature() {
        assert_eq!(
            outcome(130, 40.5, 90),
            (Severity::Warning, Some(VitalMetric::HeartRate))
        );
    }

    #[test]
    fn test_temperature_bands() {
        assert_eq!(outcome(90, 39.5, 98), (Severity::Normal, None));
        assert_eq!(
            outcome(90, 39.6, 98),
            (Severity::Warning, Some(VitalMetric::Temperature))
        );
        assert_eq!(
            outcome(90, 40.0, 98),
            (Severity::Warning, Some(VitalMetric::Temperature))
        );
        assert_eq!(
            outcome(90, 40.1, 98),
            (Severity::Critical, Some(VitalMetric::Temperature))
        );
    }

    #[test]
    fn test_temperature_beats_spo2() {
        assert_eq!(
            outcome(90, 39.8, 85),
            (Severity::Warning, Some(VitalMetric::Temperature))
        );
    }

    #[test]
    fn test_spo2_bands() {
        assert_eq!(outcome(90, 38.5, 95), (Severity::Normal, None));
        assert_eq!(
            outcome(90, 38.5, 94),
            (Severity::Warning, Some(VitalMetric::SpO2))
        );
        assert_eq!(
            outcome(90, 38.5, 92),
            (Severity::Warning, Some(VitalMetric::SpO2))
        );
        assert_eq!(
            outcome(90, 38.5, 91),
            (Severity::Critical, Some(VitalMetric::SpO2))
        );
    }

    #[test]
    fn test_out_of_range_values_still_classify() {
        assert_eq!(outcome(0, -5.0, 100), (Severity::Normal, None));
        assert_eq!(
            outcome(0, 38.0, 0),
            (Severity::Critical, Some(VitalMetric::SpO2))
        );
    }

    #[test]
    fn test_advisory_quotes_value() {
        let result = classify(&reading(90, 39.84, 98));

        assert_eq!(result.title, "Elevated Temperature");
        assert!(result.advisory.contains("39.8°C"));
        assert_eq!(result.tips.len(), 4);
    }

    #[test]
    fn test_deterministic() {
        let sample = reading(135, 40.2, 91);

        assert_eq!(classify(&sample), classify(&sample));
    }

    #[test]
    fn test_to_alert() {
        let sample = reading(90, 38.0, 90);
        let alert = classify(&sample).to_alert("alert3", "pet1", &sample).unwrap();

        assert_eq!(alert.metric, VitalMetric::SpO2);
        assert_eq!(alert.value, 90.0);
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(alert.timestamp, sample.timestamp);

        let calm = reading(90, 38.0, 98);
        assert!(classify(&calm).to_alert("alert4", "pet1", &calm).is_none());
    }
}
