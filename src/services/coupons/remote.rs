use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{CouponValidator, ValidationOutcome};
use crate::models::Coupon;

/// Validator backed by the platform's promotions service.
pub struct RemoteCouponValidator {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RemoteCouponValidator {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }
}

#[async_trait]
impl CouponValidator for RemoteCouponValidator {
    async fn validate(&self, code: &str, total_amount: f64) -> anyhow::Result<ValidationOutcome> {
        let url = format!("{}/coupons/validate", self.base_url);
        let body = json!({
            "coupon_code": code.trim().to_uppercase(),
            "total_amount": total_amount,
        });

        let mut req = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req
            .send()
            .await
            .context("failed to call promotions service")?
            .error_for_status()
            .context("promotions service returned error")?;

        let outcome: ValidationOutcome = resp
            .json()
            .await
            .context("failed to parse coupon validation response")?;
        Ok(outcome)
    }

    async fn available(&self) -> anyhow::Result<Vec<Coupon>> {
        let url = format!("{}/coupons", self.base_url);

        let mut req = self.client.get(&url);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req
            .send()
            .await
            .context("failed to call promotions service")?
            .error_for_status()
            .context("promotions service returned error")?;

        let coupons: Vec<Coupon> = resp
            .json()
            .await
            .context("failed to parse coupon listing response")?;
        Ok(coupons)
    }
}
