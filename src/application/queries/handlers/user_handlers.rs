//! User Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::require_user;
use crate::application::commands::handlers::UserResponse;
use crate::application::error::ApplicationError;
use crate::application::ports::{UserConfigRecord, UserConfigRepositoryPort, UserRepositoryPort};
use crate::application::queries::{GetCurrentUser, GetUserConfig};
use crate::domain::UserPreferences;

/// 用户播放配置响应
#[derive(Debug, Clone, Serialize)]
pub struct UserConfigResponse {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub preferences: UserPreferences,
    pub updated_at: String,
}

impl From<UserConfigRecord> for UserConfigResponse {
    fn from(record: UserConfigRecord) -> Self {
        Self {
            user_id: record.user_id,
            preferences: record.preferences,
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// GetCurrentUser Handler
pub struct GetCurrentUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl GetCurrentUserHandler {
    pub fn new(user_repo: Arc<dyn UserRepositoryPort>) -> Self {
        Self { user_repo }
    }

    pub async fn handle(&self, query: GetCurrentUser) -> Result<UserResponse, ApplicationError> {
        let user = require_user(self.user_repo.as_ref(), query.user_id).await?;
        Ok(UserResponse::from(user))
    }
}

/// GetUserConfig Handler
pub struct GetUserConfigHandler {
    config_repo: Arc<dyn UserConfigRepositoryPort>,
}

impl GetUserConfigHandler {
    pub fn new(config_repo: Arc<dyn UserConfigRepositoryPort>) -> Self {
        Self { config_repo }
    }

    pub async fn handle(
        &self,
        query: GetUserConfig,
    ) -> Result<UserConfigResponse, ApplicationError> {
        let record = self.config_repo.find_or_create(query.user_id).await?;
        Ok(UserConfigResponse::from(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Plan;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn test_current_user() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ana@example.com", Plan::Premium).await;
        let handler = GetCurrentUserHandler::new(ctx.users.clone());

        let me = handler
            .handle(GetCurrentUser { user_id: user.id })
            .await
            .unwrap();
        assert_eq!(me.email, "ana@example.com");
        assert_eq!(me.plan, Plan::Premium);

        let err = handler
            .handle(GetCurrentUser {
                user_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_config_is_created_with_defaults() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ana@example.com", Plan::Free).await;

        let config = GetUserConfigHandler::new(ctx.user_configs.clone())
            .handle(GetUserConfig { user_id: user.id })
            .await
            .unwrap();
        assert_eq!(config.preferences, UserPreferences::default());

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["binaural_base_freq"], 200);
        assert_eq!(json["gap_between_sec"], 2);
    }
}
