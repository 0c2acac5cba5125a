use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Service fee as a fraction of the slots cost (0.05 = 5%). Deployment
    /// policy; defaults to no fee.
    pub service_fee_rate: f64,
    /// "local" validates against our own coupons table; "remote" calls the
    /// promotions service at `promotions_url`.
    pub coupon_provider: String,
    pub promotions_url: String,
    pub promotions_api_key: String,
    pub coupon_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "courtbook.db".to_string()),
            service_fee_rate: env::var("SERVICE_FEE_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0),
            coupon_provider: env::var("COUPON_PROVIDER").unwrap_or_else(|_| "local".to_string()),
            promotions_url: env::var("PROMOTIONS_URL").unwrap_or_default(),
            promotions_api_key: env::var("PROMOTIONS_API_KEY").unwrap_or_default(),
            coupon_timeout_secs: env::var("COUPON_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
