pub mod bookings;
pub mod coupons;
pub mod health;
pub mod reviews;
