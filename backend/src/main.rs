use std::{net::SocketAddr, sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tryon_backend::{
    config::{Config, StorageBackend},
    db::connection::{create_pool, run_migrations},
    repositories::{MemoryStore, Repositories},
    routes::build_router,
    services::HttpImageGenerator,
    state::AppState,
    utils::{Clock, SystemClock},
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tryon_backend=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        storage_backend = ?config.storage_backend,
        jwt_secret = %mask_secret(&config.jwt_secret),
        upload_dir = %config.upload_dir.display(),
        public_base_url = %config.public_base_url,
        generation_enabled = config.generation_enabled(),
        photo_cleanup_interval_seconds = config.photo_cleanup_interval_seconds,
        "Loaded configuration from environment/.env"
    );

    let repos = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            Repositories::postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all data is lost on restart");
            Repositories::memory(Arc::new(MemoryStore::new()))
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let generator = HttpImageGenerator::from_config(&config)?;
    if !generator.is_configured() {
        tracing::warn!("AI_API_URL/AI_API_KEY not set; try-ons will return placeholder images");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::new(config.clone(), repos, clock, Arc::new(generator));

    if let (Some(email), Some(password)) = (&config.owner_email, &config.owner_password) {
        if state.auth_service().ensure_owner(email, password).await? {
            tracing::info!(email = %email, "Created initial owner account");
        }
    }

    if config.photo_cleanup_interval_seconds > 0 {
        spawn_photo_reaper(
            state.clone(),
            Duration::from_secs(config.photo_cleanup_interval_seconds),
        );
    }

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_photo_reaper(state: AppState, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let now = state.clock.now();
            if let Err(err) = state.photo_cleanup().purge_expired_photos(now).await {
                tracing::error!(error = %err, "Photo cleanup run failed");
            }
        }
    });
}
