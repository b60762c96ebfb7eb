//! Storage seams. Each entity has a trait, a Postgres implementation, and
//! [`MemoryStore`] implements all of them for tests and local runs.

pub mod clothing_item;
pub mod customer_session;
pub mod memory;
pub mod qr_session;
pub mod store;
pub mod transaction;
pub mod try_on;
pub mod usage_log;
pub mod user;

use std::sync::Arc;

use sqlx::PgPool;

pub use clothing_item::{ClothingItemRepository, PgClothingItemRepository};
pub use customer_session::{CustomerSessionRepository, PgCustomerSessionRepository};
pub use memory::MemoryStore;
pub use qr_session::{PgQrSessionRepository, QrSessionRepository};
pub use store::{PgStoreRepository, StoreRepository};
pub use transaction::*;
pub use try_on::{PgTryOnRepository, TryOnRepository};
pub use usage_log::{PgUsageLogRepository, UsageLogRepository};
pub use user::{PgUserRepository, UserRepository};

/// The full set of repositories handed to services through `AppState`.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub stores: Arc<dyn StoreRepository>,
    pub items: Arc<dyn ClothingItemRepository>,
    pub qr_sessions: Arc<dyn QrSessionRepository>,
    pub customer_sessions: Arc<dyn CustomerSessionRepository>,
    pub try_ons: Arc<dyn TryOnRepository>,
    pub usage_logs: Arc<dyn UsageLogRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            stores: Arc::new(PgStoreRepository::new(pool.clone())),
            items: Arc::new(PgClothingItemRepository::new(pool.clone())),
            qr_sessions: Arc::new(PgQrSessionRepository::new(pool.clone())),
            customer_sessions: Arc::new(PgCustomerSessionRepository::new(pool.clone())),
            try_ons: Arc::new(PgTryOnRepository::new(pool.clone())),
            usage_logs: Arc::new(PgUsageLogRepository::new(pool)),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            stores: store.clone(),
            items: store.clone(),
            qr_sessions: store.clone(),
            customer_sessions: store.clone(),
            try_ons: store.clone(),
            usage_logs: store,
        }
    }
}
