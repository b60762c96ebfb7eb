//! Reusable validation rules for request payloads.

pub mod rules;

pub use validator::Validate;
