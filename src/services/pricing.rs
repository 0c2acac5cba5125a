use crate::models::slot::validate_selection;
use crate::models::Slot;
use crate::services::coupons::ValidationOutcome;

#[derive(Debug)]
pub enum PricingError {
    EmptySelection,
    InvalidPlayerCount(i32),
    InvalidSlot(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::EmptySelection => {
                write!(f, "Please select at least one time slot before checking out.")
            }
            PricingError::InvalidPlayerCount(n) => {
                write!(f, "Player count must be at least 1 (got {n}).")
            }
            PricingError::InvalidSlot(reason) => write!(f, "Invalid slot selection: {reason}"),
        }
    }
}

/// Cost of the slot selection before fees and discounts: per-slot prices
/// summed, multiplied by the player count. Rejects empty selections,
/// non-positive player counts, and overlapping slot times before any
/// network call is made.
pub fn slots_cost(slots: &[Slot], players: i32) -> Result<f64, PricingError> {
    if slots.is_empty() {
        return Err(PricingError::EmptySelection);
    }
    if players < 1 {
        return Err(PricingError::InvalidPlayerCount(players));
    }
    validate_selection(slots).map_err(|e| PricingError::InvalidSlot(e.to_string()))?;

    let sum: f64 = slots.iter().map(|s| s.price).sum();
    Ok(sum * players as f64)
}

/// Fee surcharge as a fraction of the subtotal (0.05 = 5%). The rate is a
/// deployment policy, not a constant; a zero or negative rate means no fee.
pub fn service_fee(slots_cost: f64, rate: f64) -> f64 {
    if rate <= 0.0 {
        0.0
    } else {
        slots_cost * rate
    }
}

/// The computed, not-yet-committed pricing result for a candidate booking.
/// Holds at most one applied coupon; applying another replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub slots_cost: f64,
    pub service_fee: f64,
    pub discount_amount: f64,
    pub coupon_code: Option<String>,
}

impl Quote {
    pub fn build(slots: &[Slot], players: i32, fee_rate: f64) -> Result<Self, PricingError> {
        let cost = slots_cost(slots, players)?;
        Ok(Self {
            slots_cost: cost,
            service_fee: service_fee(cost, fee_rate),
            discount_amount: 0.0,
            coupon_code: None,
        })
    }

    pub fn subtotal(&self) -> f64 {
        self.slots_cost + self.service_fee
    }

    /// Commits a validator response to this quote. A valid outcome replaces
    /// any previously applied discount (coupons never stack); the amount is
    /// taken from `discount_amount`, or converted from `discount_percentage`
    /// against the current subtotal, and clamped to the subtotal. A rejected
    /// outcome resets the discount to zero (fail closed) and hands back the
    /// service's message.
    pub fn apply_outcome(
        &mut self,
        code: &str,
        outcome: &ValidationOutcome,
    ) -> Result<f64, String> {
        if !outcome.valid {
            self.remove_coupon();
            return Err(if outcome.message.is_empty() {
                "Invalid coupon code".to_string()
            } else {
                outcome.message.clone()
            });
        }

        let raw = match (outcome.discount_amount, outcome.discount_percentage) {
            (Some(amount), _) => amount,
            (None, Some(pct)) => self.subtotal() * pct / 100.0,
            (None, None) => 0.0,
        };

        self.discount_amount = raw.clamp(0.0, self.subtotal());
        self.coupon_code = Some(code.trim().to_uppercase());
        Ok(self.discount_amount)
    }

    /// Resets discount and code. Used both for explicit removal and as the
    /// fail-closed path when a validation attempt errors out.
    pub fn remove_coupon(&mut self) {
        self.discount_amount = 0.0;
        self.coupon_code = None;
    }

    /// Final payable amount, floored at zero regardless of discount size.
    pub fn total(&self) -> f64 {
        (self.subtotal() - self.discount_amount).max(0.0)
    }
}

/// Monotonic token issuer for in-flight coupon validations. A user can edit
/// the selection or re-tap apply while a validation round-trip is pending;
/// only the outcome carrying the most recently issued token may be committed,
/// stale responses are discarded.
#[derive(Debug, Default)]
pub struct ApplyGuard {
    latest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyToken(u64);

impl ApplyGuard {
    pub fn begin(&mut self) -> ApplyToken {
        self.latest += 1;
        ApplyToken(self.latest)
    }

    pub fn is_current(&self, token: ApplyToken) -> bool {
        token.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(time: &str, price: f64) -> Slot {
        Slot {
            time: time.to_string(),
            display_time: time.to_string(),
            price,
            court_id: None,
            court_name: None,
        }
    }

    fn valid_outcome(amount: f64) -> ValidationOutcome {
        ValidationOutcome {
            valid: true,
            message: "Coupon applied".to_string(),
            discount_percentage: None,
            discount_amount: Some(amount),
            final_amount: None,
        }
    }

    fn rejected_outcome(message: &str) -> ValidationOutcome {
        ValidationOutcome {
            valid: false,
            message: message.to_string(),
            discount_percentage: None,
            discount_amount: None,
            final_amount: None,
        }
    }

    #[test]
    fn test_slots_cost_multiplies_players() {
        // slots = [{price:200}], players=2 -> 400
        let cost = slots_cost(&[slot("10:00", 200.0)], 2).unwrap();
        assert_eq!(cost, 400.0);
    }

    #[test]
    fn test_slots_cost_empty_selection_rejected() {
        assert!(matches!(
            slots_cost(&[], 2),
            Err(PricingError::EmptySelection)
        ));
    }

    #[test]
    fn test_slots_cost_invalid_player_count_rejected() {
        assert!(matches!(
            slots_cost(&[slot("10:00", 200.0)], 0),
            Err(PricingError::InvalidPlayerCount(0))
        ));
        assert!(slots_cost(&[slot("10:00", 200.0)], -3).is_err());
    }

    #[test]
    fn test_slots_cost_duplicate_time_rejected() {
        let slots = vec![slot("10:00", 200.0), slot("10:00", 300.0)];
        assert!(matches!(
            slots_cost(&slots, 1),
            Err(PricingError::InvalidSlot(_))
        ));
    }

    #[test]
    fn test_slots_cost_monotone_in_slots_and_players() {
        let one = vec![slot("10:00", 150.0)];
        let two = vec![slot("10:00", 150.0), slot("11:00", 150.0)];
        assert!(slots_cost(&two, 2).unwrap() >= slots_cost(&one, 2).unwrap());
        assert!(slots_cost(&one, 3).unwrap() >= slots_cost(&one, 2).unwrap());
    }

    #[test]
    fn test_service_fee_rate() {
        assert_eq!(service_fee(1000.0, 0.05), 50.0);
        assert_eq!(service_fee(1000.0, 0.0), 0.0);
        assert_eq!(service_fee(1000.0, -0.05), 0.0);
    }

    #[test]
    fn test_quote_without_coupon() {
        // slots = [{price:200}], players=2, fee 0 -> total 400
        let quote = Quote::build(&[slot("10:00", 200.0)], 2, 0.0).unwrap();
        assert_eq!(quote.slots_cost, 400.0);
        assert_eq!(quote.total(), 400.0);
    }

    #[test]
    fn test_apply_fixed_discount() {
        // discount_amount=50 on 400 -> 350
        let mut quote = Quote::build(&[slot("10:00", 200.0)], 2, 0.0).unwrap();
        quote.apply_outcome("save50", &valid_outcome(50.0)).unwrap();
        assert_eq!(quote.discount_amount, 50.0);
        assert_eq!(quote.coupon_code.as_deref(), Some("SAVE50"));
        assert_eq!(quote.total(), 350.0);
    }

    #[test]
    fn test_apply_percentage_discount_against_subtotal() {
        let mut quote = Quote::build(&[slot("10:00", 200.0)], 2, 0.05).unwrap();
        let outcome = ValidationOutcome {
            valid: true,
            message: String::new(),
            discount_percentage: Some(10.0),
            discount_amount: None,
            final_amount: None,
        };
        quote.apply_outcome("TEN", &outcome).unwrap();
        // subtotal = 400 + 20 fee = 420; 10% = 42
        assert_eq!(quote.discount_amount, 42.0);
        assert_eq!(quote.total(), 378.0);
    }

    #[test]
    fn test_oversized_discount_clamps_total_to_zero() {
        // discount_amount=1000 on 400 -> total 0, never negative
        let mut quote = Quote::build(&[slot("10:00", 200.0)], 2, 0.0).unwrap();
        quote.apply_outcome("MEGA", &valid_outcome(1000.0)).unwrap();
        assert!(quote.discount_amount <= quote.subtotal());
        assert_eq!(quote.total(), 0.0);
    }

    #[test]
    fn test_second_coupon_replaces_first() {
        let mut quote = Quote::build(&[slot("10:00", 200.0)], 2, 0.0).unwrap();
        quote.apply_outcome("FIRST", &valid_outcome(50.0)).unwrap();
        quote.apply_outcome("SECOND", &valid_outcome(30.0)).unwrap();
        assert_eq!(quote.discount_amount, 30.0);
        assert_eq!(quote.coupon_code.as_deref(), Some("SECOND"));
    }

    #[test]
    fn test_rejection_fails_closed() {
        let mut quote = Quote::build(&[slot("10:00", 200.0)], 2, 0.0).unwrap();
        quote.apply_outcome("GOOD", &valid_outcome(50.0)).unwrap();

        let err = quote
            .apply_outcome("BAD", &rejected_outcome("Coupon has expired"))
            .unwrap_err();
        assert_eq!(err, "Coupon has expired");
        assert_eq!(quote.discount_amount, 0.0);
        assert_eq!(quote.coupon_code, None);
        assert_eq!(quote.total(), 400.0);
    }

    #[test]
    fn test_remove_then_apply_matches_clean_apply() {
        let slots = vec![slot("10:00", 200.0)];
        let mut a = Quote::build(&slots, 2, 0.0).unwrap();
        a.apply_outcome("OLD", &valid_outcome(80.0)).unwrap();
        a.remove_coupon();
        a.apply_outcome("NEW", &valid_outcome(25.0)).unwrap();

        let mut b = Quote::build(&slots, 2, 0.0).unwrap();
        b.apply_outcome("NEW", &valid_outcome(25.0)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_apply_guard_discards_stale_tokens() {
        let mut guard = ApplyGuard::default();
        let first = guard.begin();
        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }
}
