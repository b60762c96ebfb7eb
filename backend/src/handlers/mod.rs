pub mod auth;
pub mod customer_sessions;
pub mod health;
pub mod items;
pub mod qr_sessions;
pub mod stores;
pub mod try_on;
pub mod upload;
pub mod usage_logs;
