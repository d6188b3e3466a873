//! # Health Reports
//!
//! One summary per day. The dashboard ships with a randomized week of
//! reports; [`summarize`] aggregates real readings when they exist.

use chrono::{Duration, NaiveDate};
use rand::{Rng, seq::SliceRandom};

use crate::models::{ActivityLevel, HealthReport, VitalReading};

pub const WEEK: usize = 7;

/// Randomized reports for `days` days ending `today`, newest first.
pub fn generate_reports<R: Rng>(rng: &mut R, days: usize, today: NaiveDate) -> Vec<HealthReport> {
    (0..days)
        .map(|offset| HealthReport {
            date: today - Duration::days(offset as i64),
            average_heart_rate: rng.gen_range(60..100),
            average_temperature: round_tenth(37.0 + rng.gen_range(0.0..1.0)),
            average_sp_o2: rng.gen_range(95..100),
            activity_level: *ActivityLevel::ALL
                .choose(rng)
                .unwrap_or(&ActivityLevel::Moderate),
            alerts: rng.gen_range(0..2),
        })
        .collect()
}

/// Aggregates a day of readings. `None` when there is nothing to average.
pub fn summarize(date: NaiveDate, readings: &[VitalReading], alerts: u32) -> Option<HealthReport> {
    if readings.is_empty() {
        return None;
    }

    let count = readings.len() as f64;
    let heart_rate = readings.iter().map(|r| r.heart_rate as f64).sum::<f64>() / count;
    let temperature = readings.iter().map(|r| r.temperature).sum::<f64>() / count;
    let sp_o2 = readings.iter().map(|r| r.sp_o2 as f64).sum::<f64>() / count;

    Some(HealthReport {
        date,
        average_heart_rate: heart_rate.round() as u32,
        average_temperature: round_tenth(temperature),
        average_sp_o2: sp_o2.round() as u32,
        activity_level: activity_for(heart_rate),
        alerts,
    })
}

/// Coarse activity estimate from mean heart rate.
pub fn activity_for(mean_heart_rate: f64) -> ActivityLevel {
    if mean_heart_rate < 80.0 {
        ActivityLevel::Low
    } else if mean_heart_rate < 100.0 {
        ActivityLevel::Moderate
    } else {
        ActivityLevel::High
    }
}

/// The latest week of newest-first reports, reordered oldest first for charts.
pub fn weekly(reports: &[HealthReport]) -> Vec<HealthReport> {
    reports.iter().take(WEEK).rev().cloned().collect()
}

pub fn find(reports: &[HealthReport], date: NaiveDate) -> Option<&HealthReport> {
    reports.iter().find(|report| report.date == date)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
