pub mod local;
pub mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::Coupon;

/// Wire shape of a coupon validation result. The same shape is returned by
/// the remote promotions service and by our own validate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_amount: Option<f64>,
}

impl ValidationOutcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            discount_percentage: None,
            discount_amount: None,
            final_amount: None,
        }
    }
}

/// The only authority on coupon validity. The pricing engine never invents
/// a discount; it only commits outcomes produced here.
#[async_trait]
pub trait CouponValidator: Send + Sync {
    /// Checks a code against an order total. Codes are normalized to upper
    /// case before lookup. An `Err` is a transport-level failure and is
    /// treated as fail-closed by callers; an ineligible coupon is an `Ok`
    /// outcome with `valid: false` and a human-readable message.
    async fn validate(&self, code: &str, total_amount: f64) -> anyhow::Result<ValidationOutcome>;

    /// Ordered list of coupons currently offered.
    async fn available(&self) -> anyhow::Result<Vec<Coupon>>;
}
