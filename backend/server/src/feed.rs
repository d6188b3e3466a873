//! # Live Feed
//!
//! Background ticks that keep the dashboard moving.
//!
//! ## Vitals tick (default every 10 s)
//! - A baseline reading is prepended to the monitoring history
//! - A demo reading with wider ranges replaces the emergency reading
//! - The demo reading is classified and raises an alert if it is abnormal and
//!   no alert for the same metric is still active
//!
//! ## Location tick (default every 15 s)
//! - A jittered point around the base origin is prepended to the tracking history
//!
//! Histories are newest first and capped at `HISTORY_LEN`.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};
use tokio::{task::JoinHandle, time::interval};
use tracing::{info, warn};
use vitals::{
    Classification, GeoPoint, TelemetrySource, VitalRanges, classify,
    models::{AlertStatus, EmergencyAlert, LocationData, VitalReading},
    telemetry::{MockTelemetry, generate_locations, generate_readings, push_newest},
};

use crate::state::State;

pub struct Sources {
    pub monitor: Box<dyn TelemetrySource + Send>,
    pub emergency: Box<dyn TelemetrySource + Send>,
}

impl Sources {
    pub fn mock(origin: GeoPoint) -> Self {
        Self {
            monitor: Box::new(MockTelemetry::new(
                VitalRanges::BASELINE,
                origin,
                StdRng::from_entropy(),
            )),
            emergency: Box::new(MockTelemetry::new(
                VitalRanges::DEMO,
                origin,
                StdRng::from_entropy(),
            )),
        }
    }

    pub fn seeded(origin: GeoPoint, seed: u64) -> Self {
        Self {
            monitor: Box::new(MockTelemetry::new(
                VitalRanges::BASELINE,
                origin,
                StdRng::seed_from_u64(seed),
            )),
            emergency: Box::new(MockTelemetry::new(
                VitalRanges::DEMO,
                origin,
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            )),
        }
    }
}

pub struct LiveFeed {
    pub readings: Vec<VitalReading>,
    pub locations: Vec<LocationData>,
    pub emergency: VitalReading,
}

impl LiveFeed {
    /// Hourly history back from `now`, as if the collar had been worn all day.
    pub fn seed(sources: &mut Sources, history_len: usize, now: DateTime<Utc>) -> Self {
        let hour = chrono::Duration::hours(1);
        let readings = generate_readings(&mut *sources.monitor, history_len, hour, now);
        let locations = generate_locations(&mut *sources.monitor, history_len, hour, now);
        let emergency = match readings.first() {
            Some(latest) => *latest,
            None => sources.monitor.next_reading(now),
        };

        Self {
            readings,
            locations,
            emergency,
        }
    }

    pub fn latest_reading(&self) -> Option<&VitalReading> {
        self.readings.first()
    }

    pub fn latest_location(&self) -> Option<&LocationData> {
        self.locations.first()
    }
}

pub async fn vitals_tick(state: &State, sources: &mut Sources, now: DateTime<Utc>) -> Classification {
    let reading = sources.monitor.next_reading(now);
    let demo = sources.emergency.next_reading(now);
    let classification = classify(&demo);

    {
        let mut feed = state.feed.write().await;
        push_newest(&mut feed.readings, reading, state.config.history_len);
        feed.emergency = demo;
    }

    #[cfg(feature = "verbose")]
    info!(?reading, ?demo, severity = ?classification.severity, "Vitals tick");

    if let Some(alert) = record_alert(state, &classification, &demo).await {
        warn!(
            id = %alert.id,
            metric = %alert.metric,
            value = alert.value,
            severity = ?classification.severity,
            "Emergency alert raised"
        );
    }

    classification
}

pub async fn location_tick(state: &State, sources: &mut Sources, now: DateTime<Utc>) -> LocationData {
    let location = sources.monitor.next_location(now);

    let mut feed = state.feed.write().await;
    push_newest(&mut feed.locations, location, state.config.history_len);

    #[cfg(feature = "verbose")]
    info!(?location, "Location tick");

    location
}

/// Appends an active alert unless one is already open for the same metric.
async fn record_alert(
    state: &State,
    classification: &Classification,
    reading: &VitalReading,
) -> Option<EmergencyAlert> {
    let metric = classification.metric?;
    let mut alerts = state.alerts.write().await;

    let already_open = alerts
        .iter()
        .any(|alert| alert.metric == metric && alert.status == AlertStatus::Active);
    if already_open {
        return None;
    }

    let id = format!("alert{}", alerts.len() + 1);
    let alert = classification.to_alert(id, state.feed_pet_id.clone(), reading)?;
    alerts.push(alert.clone());

    Some(alert)
}

pub fn spawn(state: Arc<State>, mut sources: Sources) -> JoinHandle<()> {
    let vitals_every = Duration::from_secs(state.config.vitals_tick_secs.max(1));
    let location_every = Duration::from_secs(state.config.location_tick_secs.max(1));

    info!(?vitals_every, ?location_every, "Starting live feed");

    tokio::spawn(async move {
        let mut vitals_timer = interval(vitals_every);
        let mut location_timer = interval(location_every);

        // Both intervals fire immediately; the seeded history already covers now.
        vitals_timer.tick().await;
        location_timer.tick().await;

        loop {
            tokio::select! {
                _ = vitals_timer.tick() => {
                    vitals_tick(&state, &mut sources, Utc::now()).await;
                }
                _ = location_timer.tick() => {
                    location_tick(&state, &mut sources, Utc::now()).await;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use vitals::{Severity, VitalMetric, catalog::BASE_ORIGIN};

    use super::*;
    use crate::{config::Config, diet::DietService};

    struct Fixed(VitalReading);

    impl TelemetrySource for Fixed {
        fn next_reading(&mut self, at: DateTime<Utc>) -> VitalReading {
            VitalReading {
                timestamp: at,
                ..self.0
            }
        }

        fn next_location(&mut self, at: DateTime<Utc>) -> LocationData {
            LocationData {
                timestamp: at,
                point: BASE_ORIGIN,
            }
        }
    }

    fn fixed_sources(heart_rate: u32, temperature: f64, sp_o2: u32) -> Sources {
        let reading = VitalReading {
            timestamp: Utc::now(),
            heart_rate,
            temperature,
            sp_o2,
        };

        Sources {
            monitor: Box::new(Fixed(reading)),
            emergency: Box::new(Fixed(reading)),
        }
    }

    fn state() -> Arc<State> {
        State::with_parts(
            Config::default(),
            &mut Sources::seeded(BASE_ORIGIN, 1),
            DietService::new(None, true),
        )
    }

    #[test]
    fn test_seed_history() {
        let now = Utc::now();
        let feed = LiveFeed::seed(&mut Sources::seeded(BASE_ORIGIN, 3), 24, now);

        assert_eq!(feed.readings.len(), 24);
        assert_eq!(feed.locations.len(), 24);
        assert_eq!(feed.latest_reading().map(|r| r.timestamp), Some(now));
        assert_eq!(feed.emergency, feed.readings[0]);
    }

    #[test]
    fn test_seed_without_history() {
        let feed = LiveFeed::seed(&mut Sources::seeded(BASE_ORIGIN, 3), 0, Utc::now());

        assert!(feed.readings.is_empty());
        assert!(feed.latest_location().is_none());
    }

    #[tokio::test]
    async fn test_vitals_tick_caps_history() {
        let state = state();
        let mut sources = fixed_sources(90, 38.5, 97);
        let now = Utc::now();

        let classification = vitals_tick(&state, &mut sources, now).await;

        let feed = state.feed.read().await;
        assert_eq!(classification.severity, Severity::Normal);
        assert_eq!(feed.readings.len(), state.config.history_len);
        assert_eq!(feed.readings[0].timestamp, now);
        assert_eq!(feed.emergency.timestamp, now);
    }

    #[tokio::test]
    async fn test_abnormal_tick_raises_one_alert() {
        let state = state();
        let before = state.alerts.read().await.len();
        let mut sources = fixed_sources(95, 38.0, 90);

        let first = vitals_tick(&state, &mut sources, Utc::now()).await;
        vitals_tick(&state, &mut sources, Utc::now()).await;

        let alerts = state.alerts.read().await;
        assert_eq!(first.severity, Severity::Critical);
        assert_eq!(alerts.len(), before + 1);

        let raised = alerts.last().unwrap();
        assert_eq!(raised.metric, VitalMetric::SpO2);
        assert_eq!(raised.status, AlertStatus::Active);
        assert_eq!(raised.pet_id, "pet1");
    }

    #[tokio::test]
    async fn test_open_alert_suppresses_duplicate() {
        let state = state();
        let before = state.alerts.read().await.len();
        // the catalog already has an active temperature alert
        let mut sources = fixed_sources(95, 39.9, 97);

        let classification = vitals_tick(&state, &mut sources, Utc::now()).await;

        assert_eq!(classification.metric, Some(VitalMetric::Temperature));
        assert_eq!(state.alerts.read().await.len(), before);
    }

    #[tokio::test]
    async fn test_location_tick() {
        let state = state();
        let mut sources = fixed_sources(90, 38.5, 97);
        let now = Utc::now();

        let location = location_tick(&state, &mut sources, now).await;

        let feed = state.feed.read().await;
        assert_eq!(feed.latest_location(), Some(&location));
        assert_eq!(feed.locations.len(), state.config.history_len);
    }
}
