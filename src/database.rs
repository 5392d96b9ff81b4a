//! # Redis
//!
//! Document store for the service.
//!
//! ## Layout
//! - `waste:{userId}` / `carbon:{userId}`: sorted set per user, member is the
//!   JSON log entry, score is its timestamp in milliseconds. Entries carry a
//!   UUID so identical payloads stay distinct members. Reading newest-first is
//!   a reverse range, so ordering follows the stored timestamp rather than
//!   arrival order.
//! - `centers`: hash of center id to JSON document. Replacements are whole
//!   documents written by a single admin actor.
//! - `schedules`: sorted set of collection schedules scored by date.
//!
//! Every write is one command, so the store's per-command atomicity is all the
//! concurrency control needed.

use std::time::Duration;

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{CarbonLogEntry, CollectionSchedule, RecyclingCenter, WasteLogEntry},
};

const CENTERS_KEY: &str = "centers";
const SCHEDULES_KEY: &str = "schedules";

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

fn waste_key(user_id: &str) -> String {
    format!("waste:{user_id}")
}

fn carbon_key(user_id: &str) -> String {
    format!("carbon:{user_id}")
}

pub async fn insert_waste_log(
    con: &mut ConnectionManager,
    entry: &WasteLogEntry,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(entry)?;
    let _: () = con
        .zadd(
            waste_key(&entry.user_id),
            payload,
            entry.log_date.timestamp_millis(),
        )
        .await?;

    Ok(())
}

/// Newest first by logged timestamp. `None` reads the full history.
pub async fn list_waste_logs(
    con: &mut ConnectionManager,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<WasteLogEntry>, AppError> {
    let raw: Vec<String> = con
        .zrevrange(waste_key(user_id), 0, stop_index(limit))
        .await?;

    decode_all(&raw)
}

pub async fn insert_carbon_log(
    con: &mut ConnectionManager,
    entry: &CarbonLogEntry,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(entry)?;
    let _: () = con
        .zadd(
            carbon_key(&entry.user_id),
            payload,
            entry.date.timestamp_millis(),
        )
        .await?;

    Ok(())
}

pub async fn list_carbon_logs(
    con: &mut ConnectionManager,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<CarbonLogEntry>, AppError> {
    let raw: Vec<String> = con
        .zrevrange(carbon_key(user_id), 0, stop_index(limit))
        .await?;

    decode_all(&raw)
}

pub async fn upsert_center(
    con: &mut ConnectionManager,
    center: &RecyclingCenter,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(center)?;
    let _: () = con
        .hset(CENTERS_KEY, center.id.to_string(), payload)
        .await?;

    Ok(())
}

pub async fn get_center(
    con: &mut ConnectionManager,
    id: &Uuid,
) -> Result<Option<RecyclingCenter>, AppError> {
    let raw: Option<String> = con.hget(CENTERS_KEY, id.to_string()).await?;

    raw.map(|payload| serde_json::from_str(&payload).map_err(AppError::from))
        .transpose()
}

pub async fn delete_center(con: &mut ConnectionManager, id: &Uuid) -> Result<bool, AppError> {
    let removed: i64 = con.hdel(CENTERS_KEY, id.to_string()).await?;

    Ok(removed > 0)
}

pub async fn list_centers(con: &mut ConnectionManager) -> Result<Vec<RecyclingCenter>, AppError> {
    let raw: Vec<(String, String)> = con.hgetall(CENTERS_KEY).await?;

    raw.iter()
        .map(|(_, payload)| serde_json::from_str(payload).map_err(AppError::from))
        .collect()
}

pub async fn insert_schedule(
    con: &mut ConnectionManager,
    schedule: &CollectionSchedule,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(schedule)?;
    let _: () = con
        .zadd(SCHEDULES_KEY, payload, schedule.date.timestamp_millis())
        .await?;

    Ok(())
}

/// Soonest first by scheduled date. `None` reads everything.
pub async fn list_schedules(
    con: &mut ConnectionManager,
    limit: Option<usize>,
) -> Result<Vec<CollectionSchedule>, AppError> {
    let raw: Vec<String> = con.zrange(SCHEDULES_KEY, 0, stop_index(limit)).await?;

    decode_all(&raw)
}

fn stop_index(limit: Option<usize>) -> isize {
    limit.map_or(-1, |n| n as isize - 1)
}

fn decode_all<T: serde::de::DeserializeOwned>(raw: &[String]) -> Result<Vec<T>, AppError> {
    raw.iter()
        .map(|payload| serde_json::from_str(payload).map_err(AppError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::stop_index;

    #[test]
    fn test_stop_index() {
        assert_eq!(stop_index(None), -1);
        assert_eq!(stop_index(Some(20)), 19);
        assert_eq!(stop_index(Some(1)), 0);
    }
}
