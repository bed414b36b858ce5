use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ceylon_booking::{
    BookingKind, BookingLeg, BookingRecord, BookingStatus, CategoryBookingRequest, ComprehensiveBooking,
    ComprehensiveBookingRequest, Customer, Receipt,
};
use ceylon_core::BookingFilter;

use crate::{error::AppError, middleware::MaybeCustomer, state::AppState};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

/// Comprehensive booking as returned by the API. Card data never leaves
/// storage; only the holder name and the last four digits are shown.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub reference: String,
    pub user_id: Option<String>,
    pub customer: Customer,
    pub legs: Vec<BookingLeg>,
    pub cardholder_name: String,
    pub card_last4: String,
    pub total_price: f64,
    pub status: BookingStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComprehensiveBooking> for TripResponse {
    fn from(trip: ComprehensiveBooking) -> Self {
        Self {
            card_last4: trip.payment.card_number.tail(4),
            cardholder_name: trip.payment.cardholder_name,
            id: trip.id,
            reference: trip.reference,
            user_id: trip.user_id,
            customer: trip.customer,
            legs: trip.legs,
            total_price: trip.total_price,
            status: trip.status,
            submitted_at: trip.submitted_at,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

/// Public booking routes.
///
/// `/v1/bookings/{reference}` doubles as the per-category create route: on
/// `POST` the segment is the booking kind.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings/comprehensive", post(create_trip))
        .route("/v1/bookings/comprehensive/{reference}", get(get_trip))
        .route("/v1/bookings/comprehensive/{reference}/receipt", get(trip_receipt))
        .route("/v1/bookings/{reference}", post(create_booking).get(get_booking))
        .route("/v1/bookings/{reference}/receipt", get(booking_receipt))
}

/// Admin booking routes, mounted under `/v1/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings))
        .route("/bookings/comprehensive", get(list_trips))
        .route("/bookings/comprehensive/{reference}", delete(delete_trip))
        .route("/bookings/comprehensive/{reference}/status", patch(update_trip_status))
        .route("/bookings/{reference}", delete(delete_booking))
        .route("/bookings/{reference}/status", patch(update_booking_status))
}

async fn create_booking(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    customer: MaybeCustomer,
    payload: Result<Json<CategoryBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingRecord>), AppError> {
    let kind = kind
        .parse::<BookingKind>()
        .map_err(|_| AppError::NotFoundError(format!("Unknown booking kind: {}", kind)))?;
    let Json(request) = payload?;

    let booking = state.bookings.create_booking(kind, request, customer.user_id()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn create_trip(
    State(state): State<AppState>,
    customer: MaybeCustomer,
    payload: Result<Json<ComprehensiveBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let Json(request) = payload?;
    let trip = state.bookings.create_trip(request, customer.user_id()).await?;
    Ok((StatusCode::CREATED, Json(trip.into())))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<BookingRecord>, AppError> {
    Ok(Json(state.bookings.get_booking(&reference).await?))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<TripResponse>, AppError> {
    Ok(Json(state.bookings.get_trip(&reference).await?.into()))
}

fn receipt_response(state: &AppState, receipt: &Receipt) -> Response {
    let body = state.receipts.render(receipt);
    (
        [
            (header::CONTENT_TYPE, state.receipts.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"receipt-{}.pdf\"", receipt.reference),
            ),
        ],
        body,
    )
        .into_response()
}

async fn booking_receipt(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Response, AppError> {
    let receipt = state.bookings.booking_receipt(&reference).await?;
    Ok(receipt_response(&state, &receipt))
}

async fn trip_receipt(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Response, AppError> {
    let receipt = state.bookings.trip_receipt(&reference).await?;
    Ok(receipt_response(&state, &receipt))
}

async fn list_bookings(
    State(state): State<AppState>,
    filter: Result<Query<BookingFilter>, QueryRejection>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let Query(filter) = filter?;
    Ok(Json(state.bookings.list_bookings(&filter).await?))
}

async fn list_trips(State(state): State<AppState>) -> Result<Json<Vec<TripResponse>>, AppError> {
    let trips = state.bookings.list_trips().await?;
    Ok(Json(trips.into_iter().map(TripResponse::from).collect()))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<BookingRecord>, AppError> {
    let Json(update) = payload?;
    Ok(Json(state.bookings.update_booking_status(&reference, update.status).await?))
}

async fn update_trip_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<TripResponse>, AppError> {
    let Json(update) = payload?;
    Ok(Json(state.bookings.update_trip_status(&reference, update.status).await?.into()))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<StatusCode, AppError> {
    state.bookings.delete_booking(&reference).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<StatusCode, AppError> {
    state.bookings.delete_trip(&reference).await?;
    Ok(StatusCode::NO_CONTENT)
}
