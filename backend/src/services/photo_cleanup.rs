//! Removes customer photos and the try-on composites made from them once their
//! session has expired.
//!
//! Expiry itself stays lazy: sessions are never deleted and every access still
//! checks `expires_at`. This only reclaims the image files.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    repositories::CustomerSessionRepository,
    services::try_on::RESULTS_KIND,
    utils::storage::{scope_prefix, FileStorage},
};

#[derive(Clone)]
pub struct PhotoCleanupService {
    sessions: Arc<dyn CustomerSessionRepository>,
    storage: FileStorage,
}

impl PhotoCleanupService {
    pub fn new(sessions: Arc<dyn CustomerSessionRepository>, storage: FileStorage) -> Self {
        Self { sessions, storage }
    }

    /// Returns the number of sessions whose photo was purged. Generated results under
    /// `results/<session>/` go in the same pass.
    pub async fn purge_expired_photos(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let expired = self.sessions.list_expired_with_photo(now).await?;
        let mut purged = 0;
        for session in expired {
            let Some(photo_ref) = session.photo_ref.as_deref() else {
                continue;
            };
            let results = scope_prefix(RESULTS_KIND, session.id);
            if let Err(err) = self.storage.delete_dir(&results).await {
                tracing::warn!(error = ?err, session_id = %session.id, "Failed to delete expired try-on results");
                continue;
            }
            if let Err(err) = self.storage.delete(photo_ref).await {
                tracing::warn!(error = ?err, session_id = %session.id, "Failed to delete expired photo");
                continue;
            }
            let replaced = self.sessions.replace_photo(session.id, None).await?;
            if let Some(late) = replaced.filter(|current| current != photo_ref) {
                if let Err(err) = self.storage.delete(&late).await {
                    tracing::warn!(error = ?err, session_id = %session.id, "Failed to delete expired photo");
                }
            }
            purged += 1;
        }
        if purged > 0 {
            tracing::info!(purged, "Expired customer photos removed");
        }
        Ok(purged)
    }
}
