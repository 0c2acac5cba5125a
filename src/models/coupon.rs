use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_order_value: Option<f64>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "percentage" => DiscountType::Percentage,
            _ => DiscountType::Fixed,
        }
    }
}

impl Coupon {
    /// Discount this coupon grants against a subtotal. Percentage values are
    /// interpreted as 10 = 10%. Eligibility (active flag, minimum order) is
    /// checked by the validator, not here.
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        match self.discount_type {
            DiscountType::Percentage => subtotal * self.discount_value / 100.0,
            DiscountType::Fixed => self.discount_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(discount_type: DiscountType, value: f64) -> Coupon {
        Coupon {
            code: "SAVE".to_string(),
            discount_type,
            discount_value: value,
            min_order_value: None,
            description: None,
            is_active: true,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let c = coupon(DiscountType::Percentage, 10.0);
        assert_eq!(c.discount_for(400.0), 40.0);
    }

    #[test]
    fn test_fixed_discount() {
        let c = coupon(DiscountType::Fixed, 50.0);
        assert_eq!(c.discount_for(400.0), 50.0);
    }
}
