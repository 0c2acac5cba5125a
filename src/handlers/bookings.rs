use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::slot::parse_time;
use crate::models::{Booking, BookingStatus, DerivedStatus, Slot};
use crate::services::pricing::Quote;
use crate::services::status;
use crate::state::AppState;

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub court_id: String,
    pub court_name: Option<String>,
    pub customer_name: Option<String>,
    /// "YYYY-MM-DD"
    pub booking_date: String,
    /// "HH:MM"
    pub start_time: String,
    pub duration_minutes: i32,
    pub players: i32,
    pub time_slots: Vec<Slot>,
    pub coupon_code: Option<String>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    court_id: String,
    court_name: Option<String>,
    customer_name: Option<String>,
    booking_date: String,
    start_time: String,
    end_time: Option<String>,
    duration_minutes: i32,
    players: i32,
    time_slots: Vec<Slot>,
    coupon_code: Option<String>,
    discount_amount: f64,
    total_amount: f64,
    status: String,
    derived_status: String,
    created_at: String,
    updated_at: String,
}

fn booking_response(booking: Booking, derived: DerivedStatus) -> BookingResponse {
    BookingResponse {
        booking_date: booking.booking_date.format("%Y-%m-%d").to_string(),
        created_at: booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        updated_at: booking.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        id: booking.id,
        court_id: booking.court_id,
        court_name: booking.court_name,
        customer_name: booking.customer_name,
        start_time: booking.start_time,
        end_time: booking.end_time,
        duration_minutes: booking.duration_minutes,
        players: booking.players,
        time_slots: booking.time_slots,
        coupon_code: booking.coupon_code,
        discount_amount: booking.discount_amount,
        total_amount: booking.total_amount,
        status: booking.status.as_str().to_string(),
        derived_status: derived.as_str().to_string(),
    }
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking_date = NaiveDate::parse_from_str(&body.booking_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid booking_date: {}", body.booking_date)))?;
    let (start_hour, start_minute) = parse_time(&body.start_time)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if body.duration_minutes < 1 {
        return Err(AppError::Validation(
            "duration_minutes must be at least 1".to_string(),
        ));
    }

    // Local preconditions run before any remote call.
    let mut quote = Quote::build(&body.time_slots, body.players, state.config.service_fee_rate)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Coupon is re-validated here no matter what the client previewed. On
    // rejection nothing is persisted; on transport failure no discount is
    // ever assumed.
    if let Some(code) = body.coupon_code.as_deref().filter(|c| !c.trim().is_empty()) {
        let outcome = state
            .coupons
            .validate(code, quote.subtotal())
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        quote
            .apply_outcome(code, &outcome)
            .map_err(AppError::CouponRejected)?;
    }

    let end_total = start_hour * 60 + start_minute + body.duration_minutes as u32;
    let end_time = format!("{:02}:{:02}", (end_total / 60) % 24, end_total % 60);

    let now = chrono::Utc::now().naive_utc();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        court_id: body.court_id,
        court_name: body.court_name,
        customer_name: body.customer_name,
        booking_date,
        start_time: body.start_time,
        end_time: Some(end_time),
        duration_minutes: body.duration_minutes,
        players: body.players,
        time_slots: body.time_slots,
        coupon_code: quote.coupon_code.clone(),
        discount_amount: quote.discount_amount,
        total_amount: quote.total(),
        status: BookingStatus::Confirmed,
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_booking(&db, &booking)?;
    }

    tracing::info!(
        booking_id = %booking.id,
        total = booking.total_amount,
        discount = booking.discount_amount,
        "booking created"
    );

    Ok(Json(booking_response(booking, DerivedStatus::Upcoming)))
}

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    /// Filters on the derived status ("upcoming" | "completed" | "cancelled").
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let limit = query.limit.unwrap_or(50);
    let status_filter = query
        .status
        .as_deref()
        .and_then(DerivedStatus::from_str);

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_all_bookings(&db, limit)?
    };

    let now = chrono::Local::now().naive_local();
    let response: Vec<BookingResponse> = status::classify_all(bookings, now)
        .into_iter()
        .filter(|(_, derived)| status_filter.map_or(true, |want| *derived == want))
        .map(|(booking, derived)| booking_response(booking, derived))
        .collect();

    Ok(Json(response))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_booking_status(&db, &id, &BookingStatus::Cancelled)?
    };

    if updated {
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        Err(AppError::NotFound(format!("booking {id}")))
    }
}
