use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};

use crate::models::{Booking, BookingStatus, Coupon, DiscountType, Review, Slot};

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let time_slots = serde_json::to_string(&booking.time_slots)?;
    let booking_date = booking.booking_date.format("%Y-%m-%d").to_string();
    let created_at = booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let updated_at = booking.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO bookings (id, court_id, court_name, customer_name, booking_date, start_time, end_time,
                               duration_minutes, players, time_slots, coupon_code, discount_amount,
                               total_amount, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            booking.id,
            booking.court_id,
            booking.court_name,
            booking.customer_name,
            booking_date,
            booking.start_time,
            booking.end_time,
            booking.duration_minutes,
            booking.players,
            time_slots,
            booking.coupon_code,
            booking.discount_amount,
            booking.total_amount,
            booking.status.as_str(),
            created_at,
            updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id], |row| Ok(parse_booking_row(row)));
    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_bookings(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC LIMIT ?1"
    ))?;

    let rows = stmt.query_map(params![limit], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
) -> anyhow::Result<bool> {
    let updated_at = chrono::Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), updated_at, id],
    )?;
    Ok(count > 0)
}

const BOOKING_COLUMNS: &str = "id, court_id, court_name, customer_name, booking_date, start_time, end_time, \
     duration_minutes, players, time_slots, coupon_code, discount_amount, total_amount, \
     status, created_at, updated_at";

fn parse_booking_row(row: &Row) -> anyhow::Result<Booking> {
    let booking_date_str: String = row.get(4)?;
    let time_slots_json: String = row.get(9)?;
    let status_str: String = row.get(13)?;
    let created_at_str: String = row.get(14)?;
    let updated_at_str: String = row.get(15)?;

    let time_slots: Vec<Slot> = serde_json::from_str(&time_slots_json).unwrap_or_default();

    Ok(Booking {
        id: row.get(0)?,
        court_id: row.get(1)?,
        court_name: row.get(2)?,
        customer_name: row.get(3)?,
        booking_date: NaiveDate::parse_from_str(&booking_date_str, "%Y-%m-%d")?,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        duration_minutes: row.get(7)?,
        players: row.get(8)?,
        time_slots,
        coupon_code: row.get(10)?,
        discount_amount: row.get(11)?,
        total_amount: row.get(12)?,
        status: BookingStatus::from_str(&status_str),
        created_at: NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")?,
        updated_at: NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")?,
    })
}

// ── Coupons ──

pub fn get_coupon(conn: &Connection, code: &str) -> anyhow::Result<Option<Coupon>> {
    let mut stmt = conn.prepare(
        "SELECT code, discount_type, discount_value, min_order_value, description, is_active
         FROM coupons WHERE code = ?1",
    )?;

    let result = stmt.query_row(params![code], |row| {
        let discount_type: String = row.get(1)?;
        Ok(Coupon {
            code: row.get(0)?,
            discount_type: DiscountType::from_str(&discount_type),
            discount_value: row.get(2)?,
            min_order_value: row.get(3)?,
            description: row.get(4)?,
            is_active: row.get(5)?,
        })
    });

    match result {
        Ok(coupon) => Ok(Some(coupon)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_coupons(conn: &Connection) -> anyhow::Result<Vec<Coupon>> {
    let mut stmt = conn.prepare(
        "SELECT code, discount_type, discount_value, min_order_value, description, is_active
         FROM coupons WHERE is_active = 1 ORDER BY code ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        let discount_type: String = row.get(1)?;
        Ok(Coupon {
            code: row.get(0)?,
            discount_type: DiscountType::from_str(&discount_type),
            discount_value: row.get(2)?,
            min_order_value: row.get(3)?,
            description: row.get(4)?,
            is_active: row.get(5)?,
        })
    })?;

    let mut coupons = vec![];
    for row in rows {
        coupons.push(row?);
    }
    Ok(coupons)
}

pub fn save_coupon(conn: &Connection, coupon: &Coupon) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO coupons (code, discount_type, discount_value, min_order_value, description, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(code) DO UPDATE SET
           discount_type = excluded.discount_type,
           discount_value = excluded.discount_value,
           min_order_value = excluded.min_order_value,
           description = excluded.description,
           is_active = excluded.is_active",
        params![
            coupon.code.trim().to_uppercase(),
            coupon.discount_type.as_str(),
            coupon.discount_value,
            coupon.min_order_value,
            coupon.description,
            coupon.is_active,
        ],
    )?;
    Ok(())
}

// ── Reviews ──

pub fn review_exists(conn: &Connection, booking_id: &str) -> anyhow::Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM reviews WHERE booking_id = ?1",
        params![booking_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn create_review(conn: &Connection, review: &Review) -> anyhow::Result<()> {
    let created_at = review.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    conn.execute(
        "INSERT INTO reviews (id, booking_id, rating, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            review.id,
            review.booking_id,
            review.rating,
            review.comment,
            created_at,
        ],
    )?;
    Ok(())
}
