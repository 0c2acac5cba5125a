pub mod coupons;
pub mod pricing;
pub mod status;
