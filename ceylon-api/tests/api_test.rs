use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ceylon_api::{app, auth::issue_token, AppState, AuthConfig};
use ceylon_catalog::{CatalogItem, CatalogKind, NewCatalogItem, PricingConfig};
use ceylon_core::memory::{InMemoryBookingRepository, InMemoryCatalogRepository};
use ceylon_core::CatalogRepository;

struct TestApp {
    router: Router,
    auth: AuthConfig,
    catalog: Arc<InMemoryCatalogRepository>,
    bookings: Arc<InMemoryBookingRepository>,
}

impl TestApp {
    fn new() -> Self {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let auth = AuthConfig { secret: "test-secret".to_string(), expiration: 3600 };
        let state = AppState::new(catalog.clone(), bookings.clone(), PricingConfig::default(), auth.clone());
        Self { router: app(state), auth, catalog, bookings }
    }

    fn admin_token(&self) -> String {
        issue_token(&self.auth, "admin-1", "ADMIN").unwrap()
    }

    async fn add(&self, kind: CatalogKind, name: &str, category: &str, price: f64, available: bool) -> CatalogItem {
        let item = CatalogItem::new(
            kind,
            NewCatalogItem {
                name: name.to_string(),
                category: category.to_string(),
                price: Some(price),
                available: Some(available),
                city: Some("Kandy".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        self.catalog.create_item(&item).await.unwrap();
        item
    }

    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn json(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, token, body).await;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }
}

fn contact() -> Value {
    json!({
        "customer_name": "Nimal Perera",
        "customer_email": "nimal@example.com",
        "customer_phone": "+94 77 123 4567"
    })
}

fn with_contact(extra: Value) -> Value {
    let mut body = contact();
    if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    body
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.json("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_catalog_listing_and_filters() {
    let app = TestApp::new();
    app.add(CatalogKind::Activity, "Kandy Cooking Class", "culinary", 35.0, true).await;
    app.add(CatalogKind::Activity, "Rafting", "water_sports", 45.0, true).await;
    app.add(CatalogKind::Location, "Temple of the Tooth", "religious", 10.0, true).await;

    let (status, body) = app.json("GET", "/v1/activities", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.json("GET", "/v1/activities?name=COOKING&max_price=40", None, None).await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Kandy Cooking Class"]);

    let (status, _) = app.json("GET", "/v1/activities?max_price=cheap", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.json("GET", "/v1/spaceships", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_item_scoped_to_resource() {
    let app = TestApp::new();
    let temple = app.add(CatalogKind::Location, "Temple of the Tooth", "religious", 10.0, true).await;

    let (status, body) = app.json("GET", &format!("/v1/locations/{}", temple.id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Temple of the Tooth");

    let (status, _) = app.json("GET", &format!("/v1/activities/{}", temple.id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.json("GET", "/v1/locations/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new();
    let body = json!({ "name": "Ella Eco Lodge", "category": "eco_lodge", "price": 95.0 });

    let (status, _) = app.json("POST", "/v1/admin/accommodations", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let guest = issue_token(&app.auth, "guest-1", "GUEST").unwrap();
    let (status, _) = app.json("POST", "/v1/admin/accommodations", Some(&guest), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.json("POST", "/v1/admin/accommodations", Some("garbage"), Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = app.admin_token();
    let (status, created) = app.json("POST", "/v1/admin/accommodations", Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["kind"], "accommodation");
    assert_eq!(created["available"], true);
}

#[tokio::test]
async fn test_admin_catalog_update_and_delete() {
    let app = TestApp::new();
    let admin = app.admin_token();
    let van = app.add(CatalogKind::Transport, "Hill Country Van", "van", 80.0, true).await;
    let uri = format!("/v1/admin/transport/{}", van.id);

    let (status, updated) = app.json("PUT", &uri, Some(&admin), Some(json!({ "price": 90.0, "available": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 90.0);
    assert_eq!(updated["name"], "Hill Country Van");

    let (status, body) = app.json("POST", "/v1/admin/transport", Some(&admin), Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"].as_array().unwrap().contains(&json!("name")));

    let (status, _) = app.json("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.json("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transport_booking_total_and_reference() {
    let app = TestApp::new();
    let van = app.add(CatalogKind::Transport, "Hill Country Van", "van", 80.0, true).await;

    let body = with_contact(json!({
        "provider_id": van.id,
        "travel_date": "2026-12-20",
        "passengers": 2,
        "total_price": 1.0
    }));
    let (status, booking) = app.json("POST", "/v1/bookings/transport", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["total_price"], 160.0);
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["item_name"], "Hill Country Van");
    let reference = booking["reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("CEY"));

    let (status, fetched) = app.json("GET", &format!("/v1/bookings/{}", reference), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], booking["id"]);
}

#[tokio::test]
async fn test_accommodation_booking_uses_nights() {
    let app = TestApp::new();
    let hotel = app.add(CatalogKind::Accommodation, "Galle Fort Hotel", "boutique", 100.0, true).await;

    let body = with_contact(json!({
        "accommodation_id": hotel.id,
        "check_in": "2026-12-20",
        "check_out": "2026-12-23",
        "guests": 2
    }));
    let (status, booking) = app.json("POST", "/v1/bookings/accommodation", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["total_price"], 300.0);
    assert!(booking["reference"].as_str().unwrap().starts_with("ACY"));
}

#[tokio::test]
async fn test_unavailable_transport_is_conflict_and_not_persisted() {
    let app = TestApp::new();
    let van = app.add(CatalogKind::Transport, "Hill Country Van", "van", 80.0, false).await;

    let body = with_contact(json!({ "provider_id": van.id, "travel_date": "2026-12-20", "passengers": 2 }));
    let (status, error) = app.json("POST", "/v1/bookings/transport", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["error"].as_str().unwrap().contains("not available"));
    assert_eq!(app.bookings.len().await, 0);
}

#[tokio::test]
async fn test_unknown_item_is_not_found_and_not_persisted() {
    let app = TestApp::new();
    let body = with_contact(json!({
        "activity_id": "6f1c1d1e-8f3a-4d8e-9a43-0d2c5c0b7a11",
        "activity_date": "2026-12-20",
        "participants": 2
    }));
    let (status, _) = app.json("POST", "/v1/bookings/activity", None, Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.bookings.len().await, 0);
}

#[tokio::test]
async fn test_validation_lists_missing_fields() {
    let app = TestApp::new();
    let (status, body) = app
        .json("POST", "/v1/bookings/location", None, Some(json!({ "customer_name": "Nimal" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["fields"].as_array().unwrap().iter().map(|f| f.as_str().unwrap()).collect();
    assert_eq!(fields, vec!["customer_email", "customer_phone", "date", "item_id", "quantity"]);

    let (status, _) = app.json("POST", "/v1/bookings/cruise", None, Some(contact())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comprehensive_booking_flow() {
    let app = TestApp::new();
    let sigiriya = app.add(CatalogKind::Location, "Sigiriya", "historical", 30.0, true).await;
    let van = app.add(CatalogKind::Transport, "Van", "van", 80.0, true).await;
    let villa = app.add(CatalogKind::Accommodation, "Villa", "villa", 100.0, true).await;
    let lodge = app.add(CatalogKind::Accommodation, "Lodge", "eco_lodge", 120.0, true).await;
    let safari = app.add(CatalogKind::Activity, "Safari", "wildlife", 45.0, true).await;
    let walk = app.add(CatalogKind::Activity, "Walk", "sightseeing", 0.0, true).await;

    let guest_token = {
        let (status, body) = app.json("POST", "/v1/auth/guest", None, None).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    };

    let body = with_contact(json!({
        "user_id": "spoofed",
        "location_ids": [sigiriya.id],
        "transport_id": van.id,
        "accommodation_ids": [villa.id, lodge.id],
        "activity_ids": [safari.id, walk.id],
        "payment": {
            "cardholder_name": "N PERERA",
            "card_number": "4111 1111 1111 1881",
            "expiry": "12/28",
            "cvv": "123"
        },
        "total_price": 1.0
    }));
    let (status, trip) = app.json("POST", "/v1/bookings/comprehensive", Some(&guest_token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trip["total_price"], 945.0);
    assert_eq!(trip["legs"].as_array().unwrap().len(), 6);
    assert!(trip["user_id"].as_str().unwrap().starts_with("guest-"));
    let reference = trip["reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("CBY"));
    assert!(trip.get("payment").is_none());
    assert_eq!(trip["card_last4"], "**** 1881");

    let (status, bytes) = app
        .send("GET", &format!("/v1/bookings/comprehensive/{}", reference), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(!text.contains("4111 1111 1111 1881"));
    assert!(!text.contains("cvv"));
    assert!(!text.contains("12/28"));
    let fetched: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(fetched["cardholder_name"], "N PERERA");
    assert_eq!(fetched["card_last4"], "**** 1881");

    let (status, bytes) = app
        .send("GET", &format!("/v1/bookings/comprehensive/{}/receipt", reference), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.starts_with(b"%PDF-1.4"));

    let admin = app.admin_token();
    let (status, listed) = app.json("GET", "/v1/admin/bookings/comprehensive", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_comprehensive_requires_a_location() {
    let app = TestApp::new();
    let (status, body) = app.json("POST", "/v1/bookings/comprehensive", None, Some(contact())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["location_ids"]));

    let (status, _) = app
        .json("POST", "/v1/bookings/comprehensive", Some("not-a-token"), Some(contact()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_status_lifecycle() {
    let app = TestApp::new();
    let admin = app.admin_token();
    let class = app.add(CatalogKind::Activity, "Cooking Class", "culinary", 35.0, true).await;

    let body = with_contact(json!({ "activity_id": class.id, "activity_date": "2026-12-21", "participants": 2 }));
    let (_, booking) = app.json("POST", "/v1/bookings/activity", None, Some(body)).await;
    let reference = booking["reference"].as_str().unwrap().to_string();
    let status_uri = format!("/v1/admin/bookings/{}/status", reference);

    let (status, updated) =
        app.json("PATCH", &status_uri, Some(&admin), Some(json!({ "status": "confirmed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "confirmed");

    let (status, _) = app.json("PATCH", &status_uri, Some(&admin), Some(json!({ "status": "pending" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.json("PATCH", &status_uri, Some(&admin), Some(json!({ "status": "archived" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = app
        .json("GET", "/v1/admin/bookings?kind=activity&status=confirmed", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, bytes) = app.send("GET", &format!("/v1/bookings/{}/receipt", reference), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.starts_with(b"%PDF"));

    let (status, _) = app.json("DELETE", &format!("/v1/admin/bookings/{}", reference), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.json("GET", &format!("/v1/bookings/{}", reference), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
