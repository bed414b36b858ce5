use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use ceylon_booking::{
    BookingKind, BookingLeg, BookingRecord, BookingStatus, ComprehensiveBooking, Customer, PaymentDetails, Schedule,
};
use ceylon_core::{BookingFilter, BookingRepository, RepoResult, RepositoryError};

use crate::database::{corrupt, db_error};

const BOOKING_COLUMNS: &str = "id, reference, kind, item_id, item_name, item_category, customer_name, \
     customer_email, customer_phone, schedule, quantity, unit_price, total_price, status, special_requests, \
     user_id, created_at, updated_at";

const TRIP_COLUMNS: &str = "id, reference, user_id, customer_name, customer_email, customer_phone, legs, \
     payment, total_price, status, submitted_at, created_at, updated_at";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    reference: String,
    kind: String,
    item_id: Uuid,
    item_name: String,
    item_category: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    schedule: Json<Schedule>,
    quantity: i32,
    unit_price: f64,
    total_price: f64,
    status: String,
    special_requests: Option<String>,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for BookingRecord {
    type Error = RepositoryError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<BookingKind>().map_err(|_| corrupt("kind", &row.kind))?;
        let status = parse_status(&row.status)?;
        let quantity = u32::try_from(row.quantity).map_err(|_| corrupt("quantity", &row.quantity.to_string()))?;

        Ok(BookingRecord {
            id: row.id,
            reference: row.reference,
            kind,
            item_id: row.item_id,
            item_name: row.item_name,
            item_category: row.item_category,
            customer: Customer {
                name: row.customer_name,
                email: row.customer_email.into(),
                phone: row.customer_phone.into(),
            },
            schedule: row.schedule.0,
            quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
            status,
            special_requests: row.special_requests,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    reference: String,
    user_id: Option<String>,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    legs: Json<Vec<BookingLeg>>,
    payment: Json<PaymentDetails>,
    total_price: f64,
    status: String,
    submitted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TripRow> for ComprehensiveBooking {
    type Error = RepositoryError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        Ok(ComprehensiveBooking {
            status: parse_status(&row.status)?,
            id: row.id,
            reference: row.reference,
            user_id: row.user_id,
            customer: Customer {
                name: row.customer_name,
                email: row.customer_email.into(),
                phone: row.customer_phone.into(),
            },
            legs: row.legs.0,
            payment: row.payment.0,
            total_price: row.total_price,
            submitted_at: row.submitted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_status(value: &str) -> RepoResult<BookingStatus> {
    value.parse::<BookingStatus>().map_err(|_| corrupt("status", value))
}

fn list_bookings_query(filter: &BookingFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE TRUE"));
    if let Some(kind) = filter.kind {
        query.push(" AND kind = ").push_bind(kind.as_str());
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    query.push(" ORDER BY created_at DESC");
    query
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert_booking(&self, booking: &BookingRecord) -> RepoResult<()> {
        let quantity =
            i32::try_from(booking.quantity).map_err(|_| corrupt("quantity", &booking.quantity.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO bookings (id, reference, kind, item_id, item_name, item_category, customer_name,
                customer_email, customer_phone, schedule, quantity, unit_price, total_price, status,
                special_requests, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(booking.id)
        .bind(&booking.reference)
        .bind(booking.kind.as_str())
        .bind(booking.item_id)
        .bind(&booking.item_name)
        .bind(&booking.item_category)
        .bind(&booking.customer.name)
        .bind(booking.customer.email.expose())
        .bind(booking.customer.phone.expose())
        .bind(Json(&booking.schedule))
        .bind(quantity)
        .bind(booking.unit_price)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(&booking.special_requests)
        .bind(&booking.user_id)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_booking(&self, reference: &str) -> RepoResult<Option<BookingRecord>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE reference = $1"))
                .bind(reference)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(BookingRecord::try_from).transpose()
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> RepoResult<Vec<BookingRecord>> {
        let mut query = list_bookings_query(filter);
        let rows: Vec<BookingRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(BookingRecord::try_from).collect()
    }

    async fn update_booking_status(
        &self,
        reference: &str,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE bookings SET status = $2, updated_at = $3 WHERE reference = $1")
            .bind(reference)
            .bind(status.as_str())
            .bind(updated_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_booking(&self, reference: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE reference = $1")
            .bind(reference)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_trip(&self, trip: &ComprehensiveBooking) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comprehensive_bookings (id, reference, user_id, customer_name, customer_email,
                customer_phone, legs, payment, total_price, status, submitted_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(trip.id)
        .bind(&trip.reference)
        .bind(&trip.user_id)
        .bind(&trip.customer.name)
        .bind(trip.customer.email.expose())
        .bind(trip.customer.phone.expose())
        .bind(Json(&trip.legs))
        .bind(Json(&trip.payment))
        .bind(trip.total_price)
        .bind(trip.status.as_str())
        .bind(trip.submitted_at)
        .bind(trip.created_at)
        .bind(trip.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_trip(&self, reference: &str) -> RepoResult<Option<ComprehensiveBooking>> {
        let row: Option<TripRow> =
            sqlx::query_as(&format!("SELECT {TRIP_COLUMNS} FROM comprehensive_bookings WHERE reference = $1"))
                .bind(reference)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(ComprehensiveBooking::try_from).transpose()
    }

    async fn list_trips(&self) -> RepoResult<Vec<ComprehensiveBooking>> {
        let rows: Vec<TripRow> =
            sqlx::query_as(&format!("SELECT {TRIP_COLUMNS} FROM comprehensive_bookings ORDER BY created_at DESC"))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        rows.into_iter().map(ComprehensiveBooking::try_from).collect()
    }

    async fn update_trip_status(
        &self,
        reference: &str,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE comprehensive_bookings SET status = $2, updated_at = $3 WHERE reference = $1")
                .bind(reference)
                .bind(status.as_str())
                .bind(updated_at)
                .execute(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_trip(&self, reference: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM comprehensive_bookings WHERE reference = $1")
            .bind(reference)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
