//! # Frontend Specifications
//!
//! Payloads exchanged between the dashboard and the backend. All bodies are
//! JSON with camelCase keys. Timestamps are RFC 3339 UTC, dates are `YYYY-MM-DD`.
//!
//! ## Sessions
//! Headers
//! - Authorization: `Bearer <token>` on every route except `/health`, `/auth/login` and `/auth/signup`
//!
//! Tokens are UUID v4 strings held in memory; a restart signs everyone out.
//! They expire after `SESSION_TTL_SECS` and only `MAX_SESSIONS` stay open, oldest evicted first.
//!
//! ### Login
//! To backend
//! - `{ email, password }`, email matched case-insensitively, password not checked
//!
//! From backend
//! - 200 `{ token, user, pet }`
//! - 401 for an unknown email
//!
//! ### Signup
//! To backend
//! - `{ name, email, password }`
//!
//! From backend
//! - 201 `{ token, user, pet: null }`
//! - 400 for an empty name or malformed email, 409 when the email is taken
//!
//! ### Logout
//! - 204, the token stops working immediately
//!
//! ## Profile
//! - `PUT /pet` partial `{ name?, type?, breed?, age?, weight?, sex? }`, returns the pet
//! - `POST /pet/records` `{ type, date, description, veterinarian?, location? }`, 201 with the record
//! - `DELETE /pet/records/{id}` 204, 404 for an unknown id
//! - Record ids continue from the highest `med{n}` in use
//!
//! ## Monitoring
//!
//! ### Vitals / Location
//! - `?range=1h|6h|24h`, defaults to `6h`, anything else is a 400
//! - `{ range, latest, readings }` and `{ range, latest, locations }`, newest first
//! - Reading: `{ timestamp, heartRate, temperature, spO2 }`
//! - Location: `{ timestamp, latitude, longitude }`
//!
//! ### Emergency
//! - `?limit=` nearest clinics, defaults to `NEAREST_VET_LIMIT`
//! - `{ reading, classification, location, nearestVets }`
//! - Classification: `{ severity, metric, title, advisory, tips }`, severity is `normal|warning|critical`
//!
//! ### Nearest Clinics
//! - `?latitude=&longitude=&limit=`
//! - Veterinarian list with `distance` in km rounded to 2 decimals, closest first
//!
//! ## Alerts
//! - `GET /alerts?status=active|resolved&type=heartRate|temperature|spO2`
//! - `POST /alerts/{id}/resolve` returns the updated alert, 404 if it does not belong to the pet
//!
//! ## Reports
//! - `GET /reports?date=YYYY-MM-DD`, defaults to today, 404 when missing
//! - `GET /reports/weekly` seven reports, oldest first for charting
//!
//! ## Diet
//! - `GET /diet` history for the signed-in pet, newest first, starting with the plan on file
//! - `POST /diet` 201 `{ id, petId, timestamp, recommendation, source }`, id is `diet-<uuid>`
//! - `source` is `ai` or `fallback`; with `DIET_FALLBACK=false` an upstream failure is a 502
//!
//! ## Flow
//!
//! - Dashboard polls `/vitals` and `/location` on the same cadence as the live feed ticks
//! - Emergency page polls `/emergency`; a non-normal severity shows the advisory and tips
//! - Calling a clinic is handled client side with the `phone` field
