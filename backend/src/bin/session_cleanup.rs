use chrono::Utc;
use tryon_backend::{
    config::{Config, StorageBackend},
    db::connection::create_pool,
    repositories::{CustomerSessionRepository, PgCustomerSessionRepository},
    services::PhotoCleanupService,
    utils::storage::FileStorage,
};

use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tryon_backend=info,session_cleanup=info".into()),
        )
        .init();

    let config = Config::load()?;
    if config.storage_backend == StorageBackend::Memory {
        tracing::warn!("STORAGE_BACKEND=memory has no persisted sessions; nothing to clean up");
        return Ok(());
    }

    let pool = create_pool(&config.database_url).await?;
    let sessions: Arc<dyn CustomerSessionRepository> =
        Arc::new(PgCustomerSessionRepository::new(pool.clone()));
    let cleanup = PhotoCleanupService::new(sessions, FileStorage::new(config.upload_dir.clone()));

    let purged = cleanup.purge_expired_photos(Utc::now()).await?;
    tracing::info!("Purged photos from {} expired customer sessions", purged);

    sqlx::query("VACUUM (ANALYZE) customer_sessions")
        .execute(&pool)
        .await?;

    Ok(())
}
