//! Sample catalog used by the `ceylon-seed` tool and local development.

use serde_json::json;
use tracing::info;

use ceylon_catalog::{CatalogItem, CatalogKind, NewCatalogItem};
use ceylon_core::{CatalogRepository, CoreResult};

fn item(
    name: &str,
    category: &str,
    price: f64,
    city: &str,
    description: &str,
    details: serde_json::Value,
) -> NewCatalogItem {
    NewCatalogItem {
        name: name.to_string(),
        category: category.to_string(),
        price: Some(price),
        available: Some(true),
        description: Some(description.to_string()),
        city: Some(city.to_string()),
        image: None,
        details: Some(details),
    }
}

pub fn sample_catalog() -> Vec<(CatalogKind, NewCatalogItem)> {
    use CatalogKind::*;

    vec![
        (Location, item("Sigiriya Rock Fortress", "historical", 30.0, "Sigiriya",
            "Fifth-century rock citadel with frescoes and water gardens.", json!({ "best_time": "early morning" }))),
        (Location, item("Temple of the Tooth", "religious", 10.0, "Kandy",
            "Royal palace complex housing the sacred tooth relic.", json!({ "dress_code": "shoulders and knees covered" }))),
        (Location, item("Galle Fort", "historical", 0.0, "Galle",
            "Dutch colonial fort on the southern coast.", json!({}))),
        (Location, item("Mirissa Beach", "beach", 0.0, "Mirissa",
            "Crescent beach known for whale watching.", json!({ "season": "November to April" }))),
        (Location, item("Yala National Park", "wildlife", 25.0, "Tissamaharama",
            "Dry-zone park with the highest leopard density in the world.", json!({}))),
        (Location, item("Horton Plains", "nature", 20.0, "Nuwara Eliya",
            "Cloud forest plateau ending at World's End.", json!({ "trail_km": 9.5 }))),
        (Accommodation, item("Galle Fort Hotel", "boutique", 180.0, "Galle",
            "Restored merchant mansion inside the fort walls.", json!({ "star_rating": 5, "amenities": ["pool", "wifi"] }))),
        (Accommodation, item("Kandy Hills Guesthouse", "guesthouse", 45.0, "Kandy",
            "Family-run rooms overlooking the lake.", json!({ "star_rating": 3 }))),
        (Accommodation, item("Ella Eco Lodge", "eco_lodge", 95.0, "Ella",
            "Off-grid cabins in a tea estate.", json!({ "star_rating": 4 }))),
        (Accommodation, item("Mirissa Beach Resort", "resort", 150.0, "Mirissa",
            "Beachfront resort with ocean-view suites.", json!({ "star_rating": 4, "amenities": ["pool", "spa"] }))),
        (Activity, item("Whale Watching Cruise", "wildlife", 60.0, "Mirissa",
            "Morning boat trip to spot blue whales.", json!({ "duration_hours": 4 }))),
        (Activity, item("Kandy Cooking Class", "culinary", 35.0, "Kandy",
            "Market visit and rice-and-curry lesson.", json!({ "duration_hours": 3 }))),
        (Activity, item("Kitulgala White Water Rafting", "water_sports", 45.0, "Kitulgala",
            "Grade 3 rapids on the Kelani river.", json!({ "duration_hours": 2, "min_age": 12 }))),
        (Activity, item("Ayurveda Spa Day", "wellness", 80.0, "Bentota",
            "Full-day traditional treatment programme.", json!({ "duration_hours": 6 }))),
        (Transport, item("Private Car with Driver", "car", 55.0, "Colombo",
            "Air-conditioned sedan, up to three passengers.", json!({ "capacity": 3 }))),
        (Transport, item("Hill Country Van", "van", 80.0, "Kandy",
            "Nine-seat van for family and group tours.", json!({ "capacity": 9 }))),
        (Transport, item("Colombo Tuk Tuk", "tuk_tuk", 15.0, "Colombo",
            "City hops by three-wheeler.", json!({ "capacity": 2 }))),
        (Transport, item("Kandy to Ella Observation Car", "train", 12.0, "Kandy",
            "Reserved seat on the scenic hill-country line.", json!({ "capacity": 1 }))),
    ]
}

/// Replaces the whole catalog with [`sample_catalog`]. Returns the number of
/// items written.
pub async fn seed_catalog(repo: &dyn CatalogRepository) -> CoreResult<usize> {
    let removed = repo.clear().await?;
    info!(removed, "Cleared catalog");

    let mut created = 0;
    for (kind, input) in sample_catalog() {
        let item = CatalogItem::new(kind, input)?;
        repo.create_item(&item).await?;
        created += 1;
    }
    info!(created, "Seeded catalog");
    Ok(created)
}
