//! Config Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::UpdateUserConfig;
use crate::application::error::ApplicationError;
use crate::application::ports::UserConfigRepositoryPort;
use crate::application::queries::handlers::UserConfigResponse;

/// UpdateUserConfig Handler
pub struct UpdateUserConfigHandler {
    config_repo: Arc<dyn UserConfigRepositoryPort>,
}

impl UpdateUserConfigHandler {
    pub fn new(config_repo: Arc<dyn UserConfigRepositoryPort>) -> Self {
        Self { config_repo }
    }

    pub async fn handle(
        &self,
        command: UpdateUserConfig,
    ) -> Result<UserConfigResponse, ApplicationError> {
        if command.patch.is_empty() {
            return Err(ApplicationError::validation("No valid fields to update"));
        }

        let mut record = self.config_repo.find_or_create(command.user_id).await?;
        record.preferences.apply(&command.patch)?;
        record.updated_at = Utc::now();
        self.config_repo.save(&record).await?;

        tracing::debug!(user_id = %command.user_id, "Updated user config");

        Ok(UserConfigResponse::from(record))
    }
}
