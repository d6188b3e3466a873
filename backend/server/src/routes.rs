use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use vitals::{
    Classification, GeoPoint, classify,
    models::{
        AlertStatus, DietRecommendation, EmergencyAlert, HealthReport, LocationData,
        MedicalRecord, Pet, TimeRange, User, Veterinarian, VitalMetric, VitalReading, within,
    },
    rank,
    reports::{find, weekly},
};

use crate::{
    auth::Session,
    diet::build_prompt,
    error::AppError,
    profile::{NewRecord, PetUpdate, next_record_id},
    state::State,
    utils::{authorize, bearer_token, pet_id},
};

type Shared = AxumState<Arc<State>>;

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    #[allow(dead_code)]
    password: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    name: String,
    email: String,
    #[allow(dead_code)]
    password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    token: String,
    user: User,
    pet: Option<Pet>,
}

#[derive(Serialize)]
pub struct PetResponse {
    pet: Pet,
    records: Vec<MedicalRecord>,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    range: TimeRange,
}

#[derive(Serialize)]
pub struct VitalsResponse {
    range: TimeRange,
    latest: Option<VitalReading>,
    readings: Vec<VitalReading>,
}

#[derive(Serialize)]
pub struct LocationResponse {
    range: TimeRange,
    latest: Option<LocationData>,
    locations: Vec<LocationData>,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyResponse {
    reading: VitalReading,
    classification: Classification,
    location: GeoPoint,
    nearest_vets: Vec<Veterinarian>,
}

#[derive(Deserialize)]
pub struct NearestQuery {
    latitude: f64,
    longitude: f64,
    limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct AlertQuery {
    status: Option<AlertStatus>,
    #[serde(rename = "type")]
    metric: Option<VitalMetric>,
}

#[derive(Deserialize)]
pub struct ReportQuery {
    date: Option<NaiveDate>,
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn login_handler(
    AxumState(state): Shared,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, pet) = {
        let directory = state.directory.read().await;
        let user = directory
            .find_by_email(&payload.email)
            .cloned()
            .ok_or(AppError::Unauthorized)?;
        let pet = directory.pet_of(&user.id).cloned();

        (user, pet)
    };

    let session = Session {
        user_id: user.id.clone(),
        pet_id: pet.as_ref().map(|pet| pet.id.clone()),
    };
    let token = state.sessions.write().await.open(session, Utc::now());
    info!(user = %user.id, "Signed in");

    Ok(Json(AuthResponse { token, user, pet }))
}

pub async fn signup_handler(
    AxumState(state): Shared,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .directory
        .write()
        .await
        .register(&payload.name, &payload.email)?;

    let session = Session {
        user_id: user.id.clone(),
        pet_id: None,
    };
    let token = state.sessions.write().await.open(session, Utc::now());
    info!(user = %user.id, "Signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user,
            pet: None,
        }),
    ))
}

pub async fn logout_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;

    if state.sessions.write().await.close(token) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Unauthorized)
    }
}

pub async fn pet_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
) -> Result<Json<PetResponse>, AppError> {
    let session = authorize(&state, &headers).await?;
    let pet_id = pet_id(&session)?;

    let pet = state
        .directory
        .read()
        .await
        .pet(pet_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("pet {pet_id}")))?;
    let records = state
        .records
        .read()
        .await
        .iter()
        .filter(|record| record.pet_id == pet.id)
        .cloned()
        .collect();

    Ok(Json(PetResponse { pet, records }))
}

pub async fn update_pet_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Json(update): Json<PetUpdate>,
) -> Result<Json<Pet>, AppError> {
    let session = authorize(&state, &headers).await?;
    let pet_id = pet_id(&session)?;

    let mut directory = state.directory.write().await;
    let pet = directory
        .pet_mut(pet_id)
        .ok_or_else(|| AppError::NotFound(format!("pet {pet_id}")))?;

    update.apply(pet)?;
    info!(pet = %pet.id, "Pet profile updated");

    Ok(Json(pet.clone()))
}

pub async fn add_record_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Json(payload): Json<NewRecord>,
) -> Result<impl IntoResponse, AppError> {
    let session = authorize(&state, &headers).await?;
    let pet_id = pet_id(&session)?;

    let mut records = state.records.write().await;
    let record = payload.into_record(next_record_id(&records), pet_id.to_string())?;
    records.insert(0, record.clone());
    info!(record = %record.id, pet = %pet_id, "Medical record added");

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_record_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Path(record_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session = authorize(&state, &headers).await?;
    let pet_id = pet_id(&session)?;

    let mut records = state.records.write().await;
    let position = records
        .iter()
        .position(|record| record.id == record_id && record.pet_id == pet_id)
        .ok_or_else(|| AppError::NotFound(format!("record {record_id}")))?;

    records.remove(position);
    info!(record = %record_id, "Medical record deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn vitals_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> Result<Json<VitalsResponse>, AppError> {
    let session = authorize(&state, &headers).await?;
    pet_id(&session)?;

    let feed = state.feed.read().await;

    Ok(Json(VitalsResponse {
        range: query.range,
        latest: feed.latest_reading().copied(),
        readings: within(&feed.readings, query.range, Utc::now()),
    }))
}

pub async fn location_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> Result<Json<LocationResponse>, AppError> {
    let session = authorize(&state, &headers).await?;
    pet_id(&session)?;

    let feed = state.feed.read().await;

    Ok(Json(LocationResponse {
        range: query.range,
        latest: feed.latest_location().copied(),
        locations: within(&feed.locations, query.range, Utc::now()),
    }))
}

pub async fn emergency_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Query(query): Query<LimitQuery>,
) -> Result<Json<EmergencyResponse>, AppError> {
    let session = authorize(&state, &headers).await?;
    pet_id(&session)?;

    let (reading, location) = {
        let feed = state.feed.read().await;
        let location = feed
            .latest_location()
            .map(|latest| latest.point)
            .unwrap_or(state.config.base_origin);

        (feed.emergency, location)
    };
    let limit = query.limit.unwrap_or(state.config.nearest_vet_limit);

    Ok(Json(EmergencyResponse {
        classification: classify(&reading),
        reading,
        location,
        nearest_vets: rank(location, &state.vets, limit),
    }))
}

pub async fn nearest_vets_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Query(query): Query<NearestQuery>,
) -> Result<Json<Vec<Veterinarian>>, AppError> {
    authorize(&state, &headers).await?;

    let origin = GeoPoint::new(query.latitude, query.longitude);
    let limit = query.limit.unwrap_or(state.config.nearest_vet_limit);

    Ok(Json(rank(origin, &state.vets, limit)))
}

pub async fn alerts_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Vec<EmergencyAlert>>, AppError> {
    let session = authorize(&state, &headers).await?;
    let pet_id = pet_id(&session)?;

    let alerts = state
        .alerts
        .read()
        .await
        .iter()
        .filter(|alert| alert.pet_id == pet_id)
        .filter(|alert| query.status.is_none_or(|status| alert.status == status))
        .filter(|alert| query.metric.is_none_or(|metric| alert.metric == metric))
        .cloned()
        .collect();

    Ok(Json(alerts))
}

pub async fn resolve_alert_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Path(alert_id): Path<String>,
) -> Result<Json<EmergencyAlert>, AppError> {
    let session = authorize(&state, &headers).await?;
    let pet_id = pet_id(&session)?;

    let mut alerts = state.alerts.write().await;
    let alert = alerts
        .iter_mut()
        .find(|alert| alert.id == alert_id && alert.pet_id == pet_id)
        .ok_or_else(|| AppError::NotFound(format!("alert {alert_id}")))?;

    alert.status = AlertStatus::Resolved;
    info!(alert = %alert.id, "Alert resolved");

    Ok(Json(alert.clone()))
}

pub async fn report_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Json<HealthReport>, AppError> {
    let session = authorize(&state, &headers).await?;
    pet_id(&session)?;

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    find(&state.reports, date)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("report for {date}")))
}

pub async fn weekly_reports_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
) -> Result<Json<Vec<HealthReport>>, AppError> {
    let session = authorize(&state, &headers).await?;
    pet_id(&session)?;

    Ok(Json(weekly(&state.reports)))
}

pub async fn diet_list_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
) -> Result<Json<Vec<DietRecommendation>>, AppError> {
    let session = authorize(&state, &headers).await?;
    let pet_id = pet_id(&session)?;

    let recommendations = state
        .recommendations
        .read()
        .await
        .get(pet_id)
        .cloned()
        .unwrap_or_default();

    Ok(Json(recommendations))
}

pub async fn diet_generate_handler(
    AxumState(state): Shared,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let session = authorize(&state, &headers).await?;
    let pet_id = pet_id(&session)?.to_string();

    let pet = state
        .directory
        .read()
        .await
        .pet(&pet_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("pet {pet_id}")))?;
    let report = state
        .reports
        .first()
        .ok_or_else(|| AppError::NotFound("health report".into()))?;

    let prompt = build_prompt(&pet, report);
    let suggestion = state.diet.suggest(&prompt).await?;

    let now = Utc::now();
    let recommendation = DietRecommendation {
        id: format!("diet-{}", Uuid::new_v4()),
        pet_id: pet_id.clone(),
        timestamp: now,
        recommendation: suggestion.content,
        source: suggestion.source,
    };

    state
        .recommendations
        .write()
        .await
        .entry(pet_id)
        .or_default()
        .insert(0, recommendation.clone());
    info!(id = %recommendation.id, source = ?recommendation.source, "Diet plan generated");

    Ok((StatusCode::CREATED, Json(recommendation)))
}
