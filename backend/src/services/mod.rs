pub mod auth;
pub mod authorization;
pub mod customer_session;
pub mod image_generator;
pub mod inventory;
pub mod photo_cleanup;
pub mod qr_issuer;
pub mod session_validator;
pub mod stores;
pub mod try_on;
pub mod usage_log;

pub use auth::AuthService;
pub use authorization::{AuthError, AuthorizationGate, Principal};
pub use customer_session::CustomerSessionManager;
pub use image_generator::{GenerationError, HttpImageGenerator, ImageGenerator};
pub use inventory::InventoryService;
pub use photo_cleanup::PhotoCleanupService;
pub use qr_issuer::QrSessionIssuer;
pub use session_validator::SessionValidator;
pub use stores::StoreService;
pub use try_on::TryOnOrchestrator;
pub use usage_log::UsageLogService;
