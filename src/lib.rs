//! # PetPulse Documentation
//!
//! Collar-based pet health dashboard.
//!
//! ## Crates
//! - `vitals`: domain types, mock telemetry, classification, clinic ranking, reports
//! - `server`: axum API, sessions, live feed ticker, diet suggestions
//! - `simulate`: offline CLI around the same generator and classifier
//! - `petpulse-backend`: the `petpulse` binary
//!
//! ## Infrastructure
//! - Everything lives in memory and is reseeded from the catalog on start
//! - One collar drives the live feed; every signed-in owner of that pet sees it
//! - Diet plans call an OpenAI-compatible chat endpoint when `DIET_API_KEY` is set
//!
//! ## Notes
//!
//! ### Thresholds
//! - Heart rate: warning above 120 bpm, critical above 140 bpm
//! - Temperature: warning above 39.5°C, critical above 40.0°C
//! - SpO2: warning below 95%, critical below 92%
//! - Heart rate wins over temperature, temperature wins over SpO2

pub mod api;
