use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::coupons::ValidationOutcome;
use crate::state::AppState;

// POST /api/coupons/validate
#[derive(Deserialize)]
pub struct ValidateCouponRequest {
    pub coupon_code: String,
    pub total_amount: f64,
}

pub async fn validate_coupon(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateCouponRequest>,
) -> Result<Json<ValidationOutcome>, AppError> {
    if body.coupon_code.trim().is_empty() {
        return Err(AppError::Validation("coupon_code must not be empty".to_string()));
    }
    if body.total_amount < 0.0 {
        return Err(AppError::Validation("total_amount must not be negative".to_string()));
    }

    let outcome = state
        .coupons
        .validate(&body.coupon_code, body.total_amount)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(outcome))
}

// GET /api/coupons
#[derive(Serialize)]
pub struct CouponResponse {
    code: String,
    discount_type: String,
    discount_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_order_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

pub async fn list_coupons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CouponResponse>>, AppError> {
    let coupons = state
        .coupons
        .available()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let response: Vec<CouponResponse> = coupons
        .into_iter()
        .map(|c| CouponResponse {
            code: c.code,
            discount_type: c.discount_type.as_str().to_string(),
            discount_value: c.discount_value,
            min_order_value: c.min_order_value,
            description: c.description,
        })
        .collect();

    Ok(Json(response))
}
