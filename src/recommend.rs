//! # Recommendations
//!
//! Turns a user's recent waste and carbon history into advice.
//!
//! Waste and carbon are scored independently from the newest 20 entries of
//! each kind. The category advice lives in static rule tables keyed by label,
//! so a new waste type means a new table row and nothing else. Two general
//! tips are sampled per response from a fixed pool; the RNG is a parameter so
//! tests can pin the selection.

use rand::{Rng, seq::SliceRandom};

use crate::{
    analyze::{self, Trend},
    models::{CarbonLogEntry, RecommendationItem, Recommendations, Tag, WasteLogEntry},
};

/// Log entries fetched per kind when building a response.
pub const HISTORY_LIMIT: usize = 20;

/// General tips returned per response.
pub const TIPS_PER_RESPONSE: usize = 2;

/// Mean Car trip distance below which short-trip advice kicks in.
const SHORT_TRIP_DISTANCE: f64 = 3.0;

const WASTE_ADVICE: &[(&str, Tag, &str, &str)] = &[
    (
        "Plastic",
        Tag::Warning,
        "High plastic waste detected",
        "Consider using reusable containers and bags to reduce plastic waste.",
    ),
    (
        "Paper",
        Tag::Warning,
        "High paper waste detected",
        "Try going digital with bills and documents to reduce paper consumption.",
    ),
    (
        "Organic",
        Tag::Suggestion,
        "Consider composting",
        "Your organic waste could be turned into valuable compost for gardens.",
    ),
];

const GENERAL_TIPS: &[(&str, &str)] = &[
    (
        "Energy conservation",
        "Turn off lights and unplug devices when not in use to reduce electricity consumption.",
    ),
    (
        "Water conservation",
        "Take shorter showers and fix leaky faucets to conserve water.",
    ),
    (
        "Reusable items",
        "Invest in reusable water bottles, shopping bags, and food containers.",
    ),
    (
        "Buy local",
        "Purchase locally grown food to reduce transportation emissions.",
    ),
    (
        "Plant-based meals",
        "Try incorporating more plant-based meals into your diet to reduce your carbon footprint.",
    ),
];

pub fn recommend<R: Rng + ?Sized>(
    waste_logs: &[WasteLogEntry],
    carbon_logs: &[CarbonLogEntry],
    rng: &mut R,
) -> Recommendations {
    Recommendations {
        waste_recommendations: waste_recommendations(waste_logs),
        carbon_recommendations: carbon_recommendations(carbon_logs),
        general_tips: general_tips(rng),
    }
}

pub fn waste_recommendations(logs: &[WasteLogEntry]) -> Vec<RecommendationItem> {
    if logs.is_empty() {
        return vec![RecommendationItem::new(
            Tag::Info,
            "Start tracking your waste",
            "Begin logging your waste to receive personalized recommendations.",
        )];
    }

    let mut items = Vec::new();

    if let Some(dominant) = analyze::dominant_category(logs) {
        if let Some((_, tag, title, description)) =
            WASTE_ADVICE.iter().find(|(label, ..)| *label == dominant)
        {
            items.push(RecommendationItem::new(*tag, title, description));
        }
    }

    if analyze::trend_direction(logs) == Trend::Improving {
        items.push(RecommendationItem::new(
            Tag::Success,
            "Waste reduction progress!",
            "You've reduced your waste compared to previous logs. Keep it up!",
        ));
    }

    items
}

pub fn carbon_recommendations(logs: &[CarbonLogEntry]) -> Vec<RecommendationItem> {
    if logs.is_empty() {
        return vec![RecommendationItem::new(
            Tag::Info,
            "Start tracking your emissions",
            "Begin logging your travel to receive personalized carbon recommendations.",
        )];
    }

    let mut items = Vec::new();
    let totals = analyze::mode_totals(logs);

    let trips = |mode: &str| totals.get(mode).map_or(0, |usage| usage.trips);

    if let Some(car) = totals.get("Car") {
        if car.trips > trips("Bus") + trips("Train") + trips("Bike") {
            items.push(RecommendationItem::new(
                Tag::Warning,
                "High car usage detected",
                "Consider carpooling, public transport, or cycling for shorter trips to reduce emissions.",
            ));

            if car.distance / f64::from(car.trips) < SHORT_TRIP_DISTANCE {
                items.push(RecommendationItem::new(
                    Tag::Suggestion,
                    "Short car trips",
                    "Your car trips are quite short. Consider walking or cycling for these distances.",
                ));
            }
        }
    }

    if trips("Bike") == 0 {
        items.push(RecommendationItem::new(
            Tag::Suggestion,
            "Try cycling",
            "You haven't logged any bicycle trips. Cycling is a zero-emission way to travel short distances.",
        ));
    }

    if analyze::trend_direction(logs) == Trend::Improving {
        items.push(RecommendationItem::new(
            Tag::Success,
            "Emissions reduction progress!",
            "You've reduced your carbon emissions compared to previous trips. Great work!",
        ));
    }

    items
}

/// Two distinct tips from the pool, sampled without replacement.
pub fn general_tips<R: Rng + ?Sized>(rng: &mut R) -> Vec<RecommendationItem> {
    GENERAL_TIPS
        .choose_multiple(rng, TIPS_PER_RESPONSE)
        .map(|(title, description)| RecommendationItem::new(Tag::Tip, title, description))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::{SeedableRng, rngs::SmallRng};
    use uuid::Uuid;

    use super::*;

    fn waste(waste_type: &str, quantity: f64) -> WasteLogEntry {
        WasteLogEntry {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            waste_type: waste_type.to_string(),
            quantity,
            units: "kg".to_string(),
            notes: None,
            log_date: Utc::now(),
        }
    }

    fn carbon(mode: &str, distance: f64, emissions: f64) -> CarbonLogEntry {
        CarbonLogEntry {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            transport_mode: mode.to_string(),
            distance,
            emissions,
            notes: None,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history_placeholders() {
        let mut rng = SmallRng::seed_from_u64(1);
        let result = recommend(&[], &[], &mut rng);

        assert_eq!(result.waste_recommendations.len(), 1);
        assert_eq!(result.waste_recommendations[0].tag, Tag::Info);
        assert_eq!(result.carbon_recommendations.len(), 1);
        assert_eq!(result.carbon_recommendations[0].tag, Tag::Info);
        assert_eq!(result.general_tips.len(), TIPS_PER_RESPONSE);
    }

    #[test]
    fn test_plastic_dominant_warning() {
        let logs = vec![waste("Plastic", 5.0), waste("Paper", 2.0)];
        let items = waste_recommendations(&logs);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tag, Tag::Warning);
        assert_eq!(items[0].title, "High plastic waste detected");
    }

    #[test]
    fn test_organic_dominant_suggestion() {
        let logs = vec![waste("Organic", 3.0)];
        let items = waste_recommendations(&logs);

        assert_eq!(items[0].tag, Tag::Suggestion);
        assert_eq!(items[0].title, "Consider composting");
    }

    #[test]
    fn test_unknown_category_no_table_item() {
        let logs = vec![waste("Glass", 3.0), waste("Glass", 1.0)];

        assert!(waste_recommendations(&logs).is_empty());
    }

    #[test]
    fn test_improving_waste_trend_adds_success() {
        let quantities = [1.0, 1.0, 1.0, 1.0, 1.0, 4.0, 4.0, 4.0, 4.0, 4.0];
        let logs: Vec<WasteLogEntry> = quantities.iter().map(|&q| waste("Plastic", q)).collect();

        let items = waste_recommendations(&logs);

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].tag, Tag::Success);
    }

    #[test]
    fn test_car_heavy_history_warns() {
        let logs = vec![
            carbon("Car", 10.0, 2.4),
            carbon("Car", 8.0, 1.9),
            carbon("Bus", 5.0, 0.5),
        ];
        let items = carbon_recommendations(&logs);

        assert!(items.iter().any(|i| i.title == "High car usage detected"));
        // Long average car trips, so no short-trip advice.
        assert!(!items.iter().any(|i| i.title == "Short car trips"));
        // No bike trips logged either.
        assert!(items.iter().any(|i| i.title == "Try cycling"));
    }

    #[test]
    fn test_short_car_trips_suggestion() {
        let logs = vec![carbon("Car", 1.0, 0.3), carbon("Car", 2.0, 0.5)];
        let items = carbon_recommendations(&logs);

        assert!(items.iter().any(|i| i.title == "Short car trips"));
    }

    #[test]
    fn test_bike_user_skips_cycling_nudge() {
        let logs = vec![carbon("Bike", 4.0, 0.0), carbon("Bus", 10.0, 1.0)];
        let items = carbon_recommendations(&logs);

        assert!(!items.iter().any(|i| i.title == "Try cycling"));
        assert!(!items.iter().any(|i| i.title == "High car usage detected"));
    }

    #[test]
    fn test_improving_emissions_adds_success() {
        let emissions = [0.5, 0.5, 0.5, 0.5, 0.5, 2.0, 2.0, 2.0, 2.0, 2.0];
        let logs: Vec<CarbonLogEntry> = emissions.iter().map(|&e| carbon("Bike", 3.0, e)).collect();

        let items = carbon_recommendations(&logs);

        assert!(items.iter().any(|i| i.tag == Tag::Success));
    }

    #[test]
    fn test_tips_distinct_and_from_pool() {
        let mut rng = SmallRng::seed_from_u64(42);
        let tips = general_tips(&mut rng);

        assert_eq!(tips.len(), TIPS_PER_RESPONSE);
        assert_ne!(tips[0].title, tips[1].title);
        for tip in &tips {
            assert_eq!(tip.tag, Tag::Tip);
            assert!(GENERAL_TIPS.iter().any(|(title, _)| *title == tip.title));
        }
    }

    #[test]
    fn test_tips_reproducible_with_seed() {
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);

        assert_eq!(general_tips(&mut a), general_tips(&mut b));
    }
}
