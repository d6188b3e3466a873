//! # Collar Simulation
//!
//! Runs the mock collar offline: generate readings, classify each one, then
//! rank the nearest clinics from where the collar ended up.
//!
//! ## Output
//! - Severity tally printed to stdout
//! - Optional JSON snapshot with every tick, its classification and the
//!   ranked clinics
//!
//! ### Notes
//! - The same `--seed` always produces the same snapshot apart from
//!   `generatedAt` and the tick timestamps, which are anchored to the wall clock.
//! - `--demo` draws from the wider emergency ranges so abnormal readings show up.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use vitals::{
    GeoPoint, Severity, TelemetrySource, VitalMetric, VitalRanges, classify,
    catalog::{BASE_ORIGIN, veterinarians},
    models::{LocationData, Veterinarian, VitalReading},
    rank,
    telemetry::{MockTelemetry, generate_readings},
};

#[derive(Debug, Clone)]
pub struct Options {
    pub ticks: usize,
    pub interval_secs: u64,
    pub seed: Option<u64>,
    pub demo: bool,
    pub limit: usize,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
}

impl Tally {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Normal => self.normal += 1,
            Severity::Warning => self.warning += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.normal + self.warning + self.critical
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub reading: VitalReading,
    pub severity: Severity,
    pub metric: Option<VitalMetric>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub tally: Tally,
    pub ticks: Vec<Tick>,
    pub location: LocationData,
    pub nearest_vets: Vec<Veterinarian>,
}

/// Classifies `ticks` readings oldest first and ranks clinics from the final location.
pub fn simulate<S: TelemetrySource + ?Sized>(
    source: &mut S,
    options: &Options,
    now: DateTime<Utc>,
    pb: &ProgressBar,
) -> Result<Snapshot> {
    let interval = interval(options.interval_secs)?;
    let mut readings = generate_readings(source, options.ticks, interval, now);
    readings.reverse();

    let mut tally = Tally::default();
    let mut ticks = Vec::with_capacity(readings.len());

    for reading in readings {
        pb.set_message(format!("{}", reading.timestamp.format("%H:%M:%S")));

        let classification = classify(&reading);
        tally.record(classification.severity);

        if !classification.is_normal() {
            pb.println(format!(
                "[{}] {}: {}",
                reading.timestamp.format("%H:%M:%S"),
                classification.title,
                classification.advisory
            ));
        }

        ticks.push(Tick {
            reading,
            severity: classification.severity,
            metric: classification.metric,
        });
        pb.inc(1);
    }

    let location = source.next_location(now);
    let nearest_vets = rank(location.point, &veterinarians(), options.limit);

    Ok(Snapshot {
        generated_at: now,
        tally,
        ticks,
        location,
        nearest_vets,
    })
}

fn interval(secs: u64) -> Result<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| anyhow!("--interval-secs {secs} is too large"))
}

pub fn run(options: Options) -> Result<()> {
    let ranges = if options.demo {
        VitalRanges::DEMO
    } else {
        VitalRanges::BASELINE
    };
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut source = MockTelemetry::new(ranges, BASE_ORIGIN, rng);

    println!("Ticks: {}", options.ticks);
    println!("Interval: {}s", options.interval_secs);
    println!("Ranges: {}\n", if options.demo { "demo" } else { "baseline" });

    let pb = ProgressBar::new(options.ticks as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let snapshot = simulate(&mut source, &options, Utc::now(), &pb)?;
    pb.finish_with_message("Done");

    print_summary(&snapshot);

    if let Some(path) = &options.output {
        write_snapshot(&snapshot, path)?;
        println!("\nSnapshot written to {}", path.display());
    }

    Ok(())
}

fn print_summary(snapshot: &Snapshot) {
    let tally = snapshot.tally;
    println!("\nNormal: {}", tally.normal);
    println!("Warning: {}", tally.warning);
    println!("Critical: {}", tally.critical);

    let GeoPoint {
        latitude,
        longitude,
    } = snapshot.location.point;
    println!("\nNearest clinics from ({latitude:.4}, {longitude:.4}):");

    for vet in &snapshot.nearest_vets {
        println!("  {} - {:.2} km", vet.name, vet.distance.unwrap_or_default());
    }
}

pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
