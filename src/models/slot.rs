use serde::{Deserialize, Serialize};

/// One bookable hour of court time as selected by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Wall-clock start, "HH:MM".
    pub time: String,
    pub display_time: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_name: Option<String>,
}

impl Slot {
    pub fn validate(&self) -> anyhow::Result<()> {
        parse_time(&self.time)?;
        if self.price < 0.0 {
            return Err(anyhow::anyhow!("negative price for slot {}", self.time));
        }
        Ok(())
    }
}

/// Validates a slot selection for one booking attempt: every slot must carry
/// a well-formed non-negative price and no two slots may share a start time.
pub fn validate_selection(slots: &[Slot]) -> anyhow::Result<()> {
    let mut seen: Vec<&str> = Vec::with_capacity(slots.len());
    for slot in slots {
        slot.validate()?;
        if seen.contains(&slot.time.as_str()) {
            return Err(anyhow::anyhow!("duplicate slot time: {}", slot.time));
        }
        seen.push(&slot.time);
    }
    Ok(())
}

pub fn parse_time(s: &str) -> anyhow::Result<(u32, u32)> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(anyhow::anyhow!("invalid time format: {s}"));
    }
    let hour: u32 = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid hour in: {s}"))?;
    let minute: u32 = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid minute in: {s}"))?;
    if hour > 23 || minute > 59 {
        return Err(anyhow::anyhow!("time out of range: {s}"));
    }
    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(time: &str, price: f64) -> Slot {
        Slot {
            time: time.to_string(),
            display_time: format!("{time} - test"),
            price,
            court_id: None,
            court_name: None,
        }
    }

    #[test]
    fn test_valid_selection() {
        let slots = vec![slot("10:00", 200.0), slot("11:00", 200.0)];
        assert!(validate_selection(&slots).is_ok());
    }

    #[test]
    fn test_duplicate_time_rejected() {
        let slots = vec![slot("10:00", 200.0), slot("10:00", 250.0)];
        assert!(validate_selection(&slots).is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let slots = vec![slot("10:00", -5.0)];
        assert!(validate_selection(&slots).is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:30").unwrap(), (9, 30));
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("09:60").is_err());
        assert!(parse_time("0930").is_err());
    }
}
