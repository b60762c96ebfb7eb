//! Data models shared across database access and API handlers.

pub mod clothing_item;
pub mod customer_session;
pub mod qr_session;
pub mod store;
pub mod try_on;
pub mod usage_log;
pub mod user;
