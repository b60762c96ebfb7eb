use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::AppError,
    models::usage_log::{UsageAction, UsageLog, UsageLogResponse},
    repositories::UsageLogRepository,
    types::StoreId,
    utils::Clock,
};

#[derive(Clone)]
pub struct UsageLogService {
    repo: Arc<dyn UsageLogRepository>,
    clock: Arc<dyn Clock>,
}

impl UsageLogService {
    pub fn new(repo: Arc<dyn UsageLogRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Builds an entry stamped with the current time without persisting it.
    pub fn entry(&self, store_id: StoreId, action: UsageAction, metadata: Option<Value>) -> UsageLog {
        UsageLog::new(store_id, action, metadata, self.clock.now())
    }

    pub async fn record(
        &self,
        store_id: StoreId,
        action: UsageAction,
        metadata: Option<Value>,
    ) -> Result<(), AppError> {
        let log = self.entry(store_id, action, metadata);
        self.repo.insert(&log).await?;
        tracing::debug!(store_id = %store_id, action = action.as_str(), "Usage event recorded");
        Ok(())
    }

    pub async fn list(
        &self,
        store_id: Option<StoreId>,
        limit: i64,
    ) -> Result<Vec<UsageLogResponse>, AppError> {
        let logs = self.repo.list(store_id, limit).await?;
        Ok(logs.into_iter().map(UsageLogResponse::from).collect())
    }
}
