pub mod booking;
pub mod coupon;
pub mod review;
pub mod slot;

pub use booking::{Booking, BookingStatus, DerivedStatus};
pub use coupon::{Coupon, DiscountType};
pub use review::Review;
pub use slot::Slot;
