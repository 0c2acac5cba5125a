use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Review;
use crate::state::AppState;

// GET /api/bookings/:id/review
pub async fn review_exists(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let exists = {
        let db = state.db.lock().unwrap();
        queries::review_exists(&db, &id)?
    };
    Ok(Json(serde_json::json!({ "exists": exists })))
}

// POST /api/bookings/:id/review
#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::Validation("rating must be between 1 and 5".to_string()));
    }

    let db = state.db.lock().unwrap();

    if queries::get_booking(&db, &id)?.is_none() {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    if queries::review_exists(&db, &id)? {
        return Err(AppError::Validation(
            "a review has already been submitted for this booking".to_string(),
        ));
    }

    let review = Review {
        id: Uuid::new_v4().to_string(),
        booking_id: id,
        rating: body.rating,
        comment: body.comment,
        created_at: chrono::Utc::now().naive_utc(),
    };
    queries::create_review(&db, &review)?;

    Ok(Json(serde_json::json!({ "ok": true, "id": review.id })))
}
