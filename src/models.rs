use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A `[longitude, latitude]` pair, in that order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            coordinates: [lng, lat],
        }
    }

    pub fn lng(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let (lng, lat) = (self.lng(), self.lat());

        if !lng.is_finite() || !lat.is_finite() || !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::Validation(format!(
                "invalid coordinates [{lng}, {lat}]"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingCenter {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub accepted_materials: Vec<String>,
    pub location: Option<GeoPoint>,
    pub operating_hours: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteLogEntry {
    pub id: Uuid,
    pub user_id: String,
    pub waste_type: String,
    pub quantity: f64,
    pub units: String,
    pub notes: Option<String>,
    pub log_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonLogEntry {
    pub id: Uuid,
    pub user_id: String,
    pub transport_mode: String,
    pub distance: f64,
    pub emissions: f64,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchedule {
    pub location: String,
    pub date: DateTime<Utc>,
    pub waste_type: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Info,
    Warning,
    Suggestion,
    Success,
    Tip,
}

/// Derived per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    #[serde(rename = "type")]
    pub tag: Tag,
    pub title: String,
    pub description: String,
}

impl RecommendationItem {
    pub fn new(tag: Tag, title: &str, description: &str) -> Self {
        Self {
            tag,
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub waste_recommendations: Vec<RecommendationItem>,
    pub carbon_recommendations: Vec<RecommendationItem>,
    pub general_tips: Vec<RecommendationItem>,
}
