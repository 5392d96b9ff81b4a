use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    analyze,
    auth::{AdminUser, AuthUser},
    database,
    error::AppError,
    geo::{self, GeoIndex},
    models::{CarbonLogEntry, GeoPoint, RecyclingCenter, WasteLogEntry},
    recommend,
    state::AppState,
};

const SCHEDULE_LIMIT: usize = 20;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius_km: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WastePayload {
    waste_type: String,
    quantity: f64,
    #[serde(default = "default_units")]
    units: String,
    notes: Option<String>,
}

fn default_units() -> String {
    "kg".to_string()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonPayload {
    transport_mode: String,
    distance: f64,
    emissions: f64,
    notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ScheduleQuery {
    location: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterPayload {
    name: String,
    address: String,
    phone: Option<String>,
    #[serde(default)]
    accepted_materials: Vec<String>,
    location: Option<GeoPoint>,
    operating_hours: Option<String>,
    website: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeBreakdown {
    mode: String,
    total_emissions: f64,
    total_distance: f64,
    trips: u32,
}

pub async fn centers_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();
    let index = GeoIndex::new(database::list_centers(&mut con).await?);

    let centers = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => {
            let radius_m = query.radius_km.map_or(geo::DEFAULT_RADIUS_M, |km| km * 1_000.0);

            index.find_nearby(&GeoPoint::new(lng, lat), radius_m, geo::NEARBY_LIMIT)?
        }
        (None, None) => index.newest_first(),
        _ => {
            return Err(AppError::Validation(
                "both lat and lng are required for a proximity search".to_string(),
            ));
        }
    };

    Ok(Json(centers))
}

pub async fn recommendations_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();

    let waste_logs =
        database::list_waste_logs(&mut con, &user_id, Some(recommend::HISTORY_LIMIT)).await?;
    let carbon_logs =
        database::list_carbon_logs(&mut con, &user_id, Some(recommend::HISTORY_LIMIT)).await?;

    let recommendations = recommend::recommend(&waste_logs, &carbon_logs, &mut rand::thread_rng());

    Ok(Json(recommendations))
}

pub async fn log_waste_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<WastePayload>,
) -> Result<impl IntoResponse, AppError> {
    require_label(&payload.waste_type, "wasteType")?;
    if !payload.quantity.is_finite() || payload.quantity <= 0.0 {
        return Err(AppError::Validation("quantity must be positive".to_string()));
    }

    let entry = WasteLogEntry {
        id: Uuid::new_v4(),
        user_id,
        waste_type: payload.waste_type,
        quantity: payload.quantity,
        units: payload.units,
        notes: payload.notes,
        log_date: Utc::now(),
    };

    let mut con = state.redis_connection.clone();
    database::insert_waste_log(&mut con, &entry).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn waste_logs_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();

    Ok(Json(database::list_waste_logs(&mut con, &user_id, None).await?))
}

pub async fn schedules_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(_): AuthUser,
    Query(query): Query<ScheduleQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();
    let mut schedules = database::list_schedules(&mut con, None).await?;

    if let Some(location) = query.location {
        let needle = location.to_lowercase();
        schedules.retain(|s| s.location.to_lowercase().contains(&needle));
    }
    schedules.truncate(SCHEDULE_LIMIT);

    Ok(Json(schedules))
}

pub async fn log_carbon_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CarbonPayload>,
) -> Result<impl IntoResponse, AppError> {
    require_label(&payload.transport_mode, "transportMode")?;
    if !payload.distance.is_finite() || payload.distance < 0.0 {
        return Err(AppError::Validation("distance must be non-negative".to_string()));
    }
    if !payload.emissions.is_finite() || payload.emissions < 0.0 {
        return Err(AppError::Validation("emissions must be non-negative".to_string()));
    }

    let entry = CarbonLogEntry {
        id: Uuid::new_v4(),
        user_id,
        transport_mode: payload.transport_mode,
        distance: payload.distance,
        emissions: payload.emissions,
        notes: payload.notes,
        date: Utc::now(),
    };

    let mut con = state.redis_connection.clone();
    database::insert_carbon_log(&mut con, &entry).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn carbon_logs_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();

    Ok(Json(database::list_carbon_logs(&mut con, &user_id, None).await?))
}

pub async fn carbon_by_mode_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();
    let logs = database::list_carbon_logs(&mut con, &user_id, None).await?;

    let breakdown: Vec<ModeBreakdown> = analyze::mode_totals(&logs)
        .into_iter()
        .map(|(mode, usage)| ModeBreakdown {
            mode,
            total_emissions: usage.emissions,
            total_distance: usage.distance,
            trips: usage.trips,
        })
        .collect();

    Ok(Json(breakdown))
}

pub async fn create_center_handler(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
    Json(payload): Json<CenterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let center = center_from_payload(Uuid::new_v4(), Utc::now(), payload)?;

    let mut con = state.redis_connection.clone();
    database::upsert_center(&mut con, &center).await?;

    Ok((StatusCode::CREATED, Json(center)))
}

pub async fn admin_centers_handler(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();
    let index = GeoIndex::new(database::list_centers(&mut con).await?);

    Ok(Json(index.newest_first()))
}

pub async fn update_center_handler(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CenterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();

    let existing = database::get_center(&mut con, &id)
        .await?
        .ok_or(AppError::NotFound("Recycling center"))?;

    // Whole document replacement, only identity and creation time survive.
    let center = center_from_payload(existing.id, existing.created_at, payload)?;
    database::upsert_center(&mut con, &center).await?;

    Ok(Json(center))
}

pub async fn delete_center_handler(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection.clone();

    if !database::delete_center(&mut con, &id).await? {
        return Err(AppError::NotFound("Recycling center"));
    }

    Ok(Json(serde_json::json!({ "msg": "Recycling center deleted successfully" })))
}

fn center_from_payload(
    id: Uuid,
    created_at: DateTime<Utc>,
    payload: CenterPayload,
) -> Result<RecyclingCenter, AppError> {
    require_label(&payload.name, "name")?;
    require_label(&payload.address, "address")?;

    if let Some(location) = &payload.location {
        location.validate()?;
    }

    Ok(RecyclingCenter {
        id,
        name: payload.name,
        address: payload.address,
        phone: payload.phone,
        accepted_materials: payload.accepted_materials,
        location: payload.location,
        operating_hours: payload.operating_hours,
        website: payload.website,
        created_at,
    })
}

fn require_label(value: &str, field: &'static str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }

    Ok(())
}
