use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use super::{CouponValidator, ValidationOutcome};
use crate::db::queries;
use crate::models::Coupon;

/// Validator backed by the local coupons table. Used for deployments that
/// do not run a separate promotions service.
pub struct LocalCouponValidator {
    db: Arc<Mutex<Connection>>,
}

impl LocalCouponValidator {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CouponValidator for LocalCouponValidator {
    async fn validate(&self, code: &str, total_amount: f64) -> anyhow::Result<ValidationOutcome> {
        let normalized = code.trim().to_uppercase();

        let coupon = {
            let db = self.db.lock().unwrap();
            queries::get_coupon(&db, &normalized)?
        };

        let Some(coupon) = coupon else {
            return Ok(ValidationOutcome::rejected("Invalid coupon code"));
        };
        if !coupon.is_active {
            return Ok(ValidationOutcome::rejected("This coupon is no longer active"));
        }
        if let Some(min) = coupon.min_order_value {
            if total_amount < min {
                return Ok(ValidationOutcome::rejected(format!(
                    "A minimum order of {min:.2} is required for this coupon"
                )));
            }
        }

        let discount = coupon.discount_for(total_amount).clamp(0.0, total_amount);
        Ok(ValidationOutcome {
            valid: true,
            message: "Coupon applied".to_string(),
            discount_percentage: None,
            discount_amount: Some(discount),
            final_amount: Some((total_amount - discount).max(0.0)),
        })
    }

    async fn available(&self) -> anyhow::Result<Vec<Coupon>> {
        let db = self.db.lock().unwrap();
        queries::list_coupons(&db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{Coupon, DiscountType};

    fn setup() -> LocalCouponValidator {
        let conn = db::init_db(":memory:").unwrap();
        LocalCouponValidator::new(Arc::new(Mutex::new(conn)))
    }

    fn save(validator: &LocalCouponValidator, coupon: &Coupon) {
        let db = validator.db.lock().unwrap();
        queries::save_coupon(&db, coupon).unwrap();
    }

    fn coupon(code: &str, discount_type: DiscountType, value: f64, min: Option<f64>) -> Coupon {
        Coupon {
            code: code.to_string(),
            discount_type,
            discount_value: value,
            min_order_value: min,
            description: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_unknown_code_rejected() {
        let validator = setup();
        let outcome = validator.validate("NOPE", 400.0).await.unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "Invalid coupon code");
    }

    #[tokio::test]
    async fn test_fixed_coupon_applies() {
        let validator = setup();
        save(&validator, &coupon("SAVE50", DiscountType::Fixed, 50.0, None));

        let outcome = validator.validate("save50", 400.0).await.unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.discount_amount, Some(50.0));
        assert_eq!(outcome.final_amount, Some(350.0));
    }

    #[tokio::test]
    async fn test_percentage_coupon_applies() {
        let validator = setup();
        save(&validator, &coupon("TEN", DiscountType::Percentage, 10.0, None));

        let outcome = validator.validate("TEN", 400.0).await.unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.discount_amount, Some(40.0));
        assert_eq!(outcome.final_amount, Some(360.0));
    }

    #[tokio::test]
    async fn test_below_minimum_order_rejected() {
        let validator = setup();
        save(
            &validator,
            &coupon("BIG", DiscountType::Fixed, 100.0, Some(500.0)),
        );

        let outcome = validator.validate("BIG", 400.0).await.unwrap();
        assert!(!outcome.valid);
        assert!(outcome.message.contains("minimum order"));
    }

    #[tokio::test]
    async fn test_inactive_coupon_rejected() {
        let validator = setup();
        let mut c = coupon("OLD", DiscountType::Fixed, 50.0, None);
        c.is_active = false;
        save(&validator, &c);

        let outcome = validator.validate("OLD", 400.0).await.unwrap();
        assert!(!outcome.valid);
    }

    #[tokio::test]
    async fn test_oversized_fixed_discount_clamped() {
        let validator = setup();
        save(&validator, &coupon("MEGA", DiscountType::Fixed, 1000.0, None));

        let outcome = validator.validate("MEGA", 400.0).await.unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.discount_amount, Some(400.0));
        assert_eq!(outcome.final_amount, Some(0.0));
    }
}
