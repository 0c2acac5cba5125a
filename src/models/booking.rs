use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Slot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub court_id: String,
    pub court_name: Option<String>,
    pub customer_name: Option<String>,
    pub booking_date: NaiveDate,
    /// "HH:MM" wall-clock start of the first slot.
    pub start_time: String,
    /// "HH:MM" wall-clock end; absent on some freshly created records.
    pub end_time: Option<String>,
    pub duration_minutes: i32,
    pub players: i32,
    pub time_slots: Vec<Slot>,
    pub coupon_code: Option<String>,
    pub discount_amount: f64,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Raw status as persisted. Only `Cancelled` is authoritative; everything
/// else is superseded by the derived status on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Pending,
        }
    }
}

/// Lifecycle state computed from date/time comparison at read time. Never
/// written back to storage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DerivedStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl DerivedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedStatus::Upcoming => "upcoming",
            DerivedStatus::Completed => "completed",
            DerivedStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(DerivedStatus::Upcoming),
            "completed" => Some(DerivedStatus::Completed),
            "cancelled" => Some(DerivedStatus::Cancelled),
            _ => None,
        }
    }
}
