use chrono::{NaiveDateTime, NaiveTime};

use crate::models::{Booking, BookingStatus, DerivedStatus};

/// Derives the lifecycle state for one booking at the given instant. The
/// stored status wins only for cancellation; everything else is decided by
/// comparing `booking_date + end_time` against `now`. Records without a
/// usable end time (freshly created bookings) count as upcoming.
pub fn classify(booking: &Booking, now: NaiveDateTime) -> DerivedStatus {
    if booking.status == BookingStatus::Cancelled {
        return DerivedStatus::Cancelled;
    }

    match end_timestamp(booking) {
        Some(end) if end < now => DerivedStatus::Completed,
        _ => DerivedStatus::Upcoming,
    }
}

/// Classifies a fetched list and orders it most-recent-first by booking date.
/// The sort is stable, ties keep their fetch order.
pub fn classify_all(
    bookings: Vec<Booking>,
    now: NaiveDateTime,
) -> Vec<(Booking, DerivedStatus)> {
    let mut classified: Vec<(Booking, DerivedStatus)> = bookings
        .into_iter()
        .map(|b| {
            let derived = classify(&b, now);
            (b, derived)
        })
        .collect();

    classified.sort_by(|a, b| b.0.booking_date.cmp(&a.0.booking_date));
    classified
}

fn end_timestamp(booking: &Booking) -> Option<NaiveDateTime> {
    let end_time = booking.end_time.as_deref()?;
    let time = NaiveTime::parse_from_str(end_time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(end_time, "%H:%M:%S"))
        .ok()?;
    Some(booking.booking_date.and_time(time))
}
