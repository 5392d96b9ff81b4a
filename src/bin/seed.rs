//! Loads demo recycling centers and collection schedules into Redis, and
//! optionally mints an admin token for exercising the admin surface.

use chrono::{Duration, Utc};
use clap::Parser;
use uuid::Uuid;

use ecopulse::{
    auth,
    database::{init_redis, insert_schedule, upsert_center},
    models::{CollectionSchedule, GeoPoint, RecyclingCenter},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Redis instance to seed
    #[arg(long, default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Signing key; when set, prints a demo admin token
    #[arg(long)]
    auth_key: Option<String>,
}

fn sample_centers() -> Vec<RecyclingCenter> {
    let center = |name: &str, address: &str, materials: &[&str], lng: f64, lat: f64| RecyclingCenter {
        id: Uuid::new_v4(),
        name: name.to_string(),
        address: address.to_string(),
        phone: None,
        accepted_materials: materials.iter().map(|m| m.to_string()).collect(),
        location: Some(GeoPoint::new(lng, lat)),
        operating_hours: Some("Mon-Sat 9:00-18:00".to_string()),
        website: None,
        created_at: Utc::now(),
    };

    vec![
        center(
            "Indiranagar Dry Waste Collection Center",
            "100 Feet Rd, Indiranagar, Bengaluru",
            &["Plastic", "Paper", "Metal"],
            77.6408,
            12.9719,
        ),
        center(
            "Koramangala Recycling Hub",
            "80 Feet Rd, Koramangala, Bengaluru",
            &["Plastic", "Glass", "E-waste"],
            77.6270,
            12.9352,
        ),
        center(
            "Jayanagar Eco Station",
            "4th Block, Jayanagar, Bengaluru",
            &["Paper", "Organic"],
            77.5938,
            12.9254,
        ),
    ]
}

fn sample_schedules() -> Vec<CollectionSchedule> {
    let schedule = |location: &str, days_ahead: i64, waste_type: &str| CollectionSchedule {
        location: location.to_string(),
        date: Utc::now() + Duration::days(days_ahead),
        waste_type: waste_type.to_string(),
        notes: None,
    };

    vec![
        schedule("Indiranagar", 1, "Plastic"),
        schedule("Koramangala", 2, "Organic"),
        schedule("Jayanagar", 3, "Paper"),
    ]
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut con = init_redis(&args.redis_url).await;

    let centers = sample_centers();
    for center in &centers {
        upsert_center(&mut con, center).await.unwrap();
    }
    println!("Seeded Centers: {}", centers.len());

    let schedules = sample_schedules();
    for schedule in &schedules {
        insert_schedule(&mut con, schedule).await.unwrap();
    }
    println!("Seeded Schedules: {}", schedules.len());

    if let Some(key) = args.auth_key {
        let token = auth::issue_token("demo-admin", auth::ADMIN_ROLE, &key);
        println!("Admin token: {token}");
    }
}
