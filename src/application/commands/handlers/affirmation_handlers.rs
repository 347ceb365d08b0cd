//! Affirmation Command Handlers

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::require_premium;
use crate::application::commands::{
    BatchUpdateAffirmations, CreateCustomAffirmation, DeleteCustomAffirmation, UpdateAffirmation,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AffirmationRepositoryPort, AudioStoragePort, CategoryRepositoryPort, OverlaySettings,
    UserAffirmationRecord, UserAffirmationRepositoryPort, UserRepositoryPort,
};
use crate::application::queries::handlers::UserAffirmationItem;
use crate::domain::{AffirmationError, AffirmationText, AudioSource};

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedAffirmationResponse {
    pub id: Uuid,
    pub user_affirmation_id: Uuid,
    pub enabled: bool,
    pub order: Option<i64>,
    pub is_custom: bool,
}

impl UpdatedAffirmationResponse {
    fn new(id: Uuid, record: UserAffirmationRecord) -> Self {
        Self {
            id,
            user_affirmation_id: record.id,
            enabled: record.enabled,
            order: record.order,
            is_custom: record.is_custom(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateResponse {
    pub updated: usize,
}

fn validate_order(order: Option<i64>) -> Result<(), ApplicationError> {
    match order {
        Some(order) if order < 0 => Err(AffirmationError::InvalidOrder(order).into()),
        _ => Ok(()),
    }
}

// ============================================================================
// UpdateAffirmation
// ============================================================================

/// UpdateAffirmation Handler
///
/// 系统肯定语：创建或更新覆盖层；自定义肯定语：直接更新（仅限本人）
pub struct UpdateAffirmationHandler {
    affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
    user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
}

impl UpdateAffirmationHandler {
    pub fn new(
        affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
        user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
    ) -> Self {
        Self {
            affirmation_repo,
            user_affirmation_repo,
        }
    }

    pub async fn handle(
        &self,
        command: UpdateAffirmation,
    ) -> Result<UpdatedAffirmationResponse, ApplicationError> {
        let settings = OverlaySettings {
            enabled: command.enabled,
            order: command.order,
        };
        if settings.is_empty() {
            return Err(ApplicationError::validation("No valid fields to update"));
        }
        validate_order(settings.order)?;

        if let Some(affirmation) = self.affirmation_repo.find_by_id(command.id).await? {
            let overlay = self
                .user_affirmation_repo
                .upsert_overlay_settings(command.user_id, &affirmation, settings)
                .await?;
            return Ok(UpdatedAffirmationResponse::new(command.id, overlay));
        }

        match self.user_affirmation_repo.find_by_id(command.id).await? {
            Some(record) if record.user_id == command.user_id && record.is_custom() => {
                let updated = self
                    .user_affirmation_repo
                    .update_settings(record.id, settings)
                    .await?;
                Ok(UpdatedAffirmationResponse::new(command.id, updated))
            }
            _ => Err(ApplicationError::not_found("Affirmation", command.id)),
        }
    }
}

// ============================================================================
// BatchUpdateAffirmations
// ============================================================================

/// BatchUpdateAffirmations Handler
pub struct BatchUpdateAffirmationsHandler {
    update: UpdateAffirmationHandler,
}

impl BatchUpdateAffirmationsHandler {
    pub fn new(
        affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
        user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
    ) -> Self {
        Self {
            update: UpdateAffirmationHandler::new(affirmation_repo, user_affirmation_repo),
        }
    }

    pub async fn handle(
        &self,
        command: BatchUpdateAffirmations,
    ) -> Result<BatchUpdateResponse, ApplicationError> {
        let mut updated = 0;

        for entry in command.updates {
            let Some(id) = entry.id else {
                continue;
            };

            let result = self
                .update
                .handle(UpdateAffirmation {
                    user_id: command.user_id,
                    id,
                    enabled: entry.enabled,
                    order: entry.order,
                })
                .await;

            match result {
                Ok(_) => updated += 1,
                Err(e) => tracing::debug!(id = %id, error = %e, "Skipping batch update entry"),
            }
        }

        Ok(BatchUpdateResponse { updated })
    }
}

// ============================================================================
// CreateCustomAffirmation
// ============================================================================

/// CreateCustomAffirmation Handler
pub struct CreateCustomAffirmationHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    category_repo: Arc<dyn CategoryRepositoryPort>,
    user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl CreateCustomAffirmationHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        category_repo: Arc<dyn CategoryRepositoryPort>,
        user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            user_repo,
            category_repo,
            user_affirmation_repo,
            storage,
        }
    }

    pub async fn handle(
        &self,
        command: CreateCustomAffirmation,
    ) -> Result<UserAffirmationItem, ApplicationError> {
        require_premium(self.user_repo.as_ref(), command.user_id).await?;

        let text = AffirmationText::new(command.text)?;
        validate_order(command.order)?;

        let category = self
            .category_repo
            .find_by_id(command.category_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Category", command.category_id))?;

        let now = Utc::now();
        let record = UserAffirmationRecord {
            id: Uuid::new_v4(),
            user_id: command.user_id,
            affirmation_id: None,
            category_id: category.id,
            custom_text: Some(text.into_inner()),
            enabled: true,
            order: command.order,
            audio_path: None,
            audio_source: AudioSource::System,
            audio_duration_ms: None,
            created_at: now,
            updated_at: now,
        };
        self.user_affirmation_repo.create_custom(&record).await?;

        tracing::info!(
            user_id = %command.user_id,
            id = %record.id,
            category = category.category.slug(),
            "Custom affirmation created"
        );

        Ok(UserAffirmationItem::custom(
            &record,
            category.category,
            self.storage.as_ref(),
        ))
    }
}

// ============================================================================
// DeleteCustomAffirmation
// ============================================================================

/// DeleteCustomAffirmation Handler
pub struct DeleteCustomAffirmationHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl DeleteCustomAffirmationHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            user_repo,
            user_affirmation_repo,
            storage,
        }
    }

    pub async fn handle(&self, command: DeleteCustomAffirmation) -> Result<(), ApplicationError> {
        require_premium(self.user_repo.as_ref(), command.user_id).await?;

        let record = match self.user_affirmation_repo.find_by_id(command.id).await? {
            Some(record) if record.user_id == command.user_id && record.is_custom() => record,
            _ => return Err(ApplicationError::not_found("Custom affirmation", command.id)),
        };

        self.user_affirmation_repo.delete(record.id).await?;

        // 只有用户录音归该记录独有
        if let (Some(path), AudioSource::Recorded) = (&record.audio_path, record.audio_source) {
            if let Err(e) = self.storage.delete(path).await {
                tracing::warn!(path = %path, error = %e, "Failed to delete recorded audio");
            }
        }

        tracing::info!(user_id = %command.user_id, id = %record.id, "Custom affirmation deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::AffirmationUpdate;
    use crate::application::ports::LinkedAudio;
    use crate::domain::Plan;
    use crate::test_support::TestContext;

    fn create(ctx: &TestContext) -> CreateCustomAffirmationHandler {
        CreateCustomAffirmationHandler::new(
            ctx.users.clone(),
            ctx.categories.clone(),
            ctx.user_affirmations.clone(),
            ctx.storage.clone(),
        )
    }

    async fn first_category_id(ctx: &TestContext) -> Uuid {
        ctx.categories.find_all().await.unwrap()[0].id
    }

    #[tokio::test]
    async fn test_update_requires_fields_and_valid_order() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ana@example.com", Plan::Free).await;
        let first = ctx.affirmations.find_all().await.unwrap().remove(0);
        let handler =
            UpdateAffirmationHandler::new(ctx.affirmations.clone(), ctx.user_affirmations.clone());

        let err = handler
            .handle(UpdateAffirmation {
                user_id: user.id,
                id: first.id,
                enabled: None,
                order: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(ref m) if m == "No valid fields to update"));

        let err = handler
            .handle(UpdateAffirmation {
                user_id: user.id,
                id: first.id,
                enabled: None,
                order: Some(-1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = handler
            .handle(UpdateAffirmation {
                user_id: user.id,
                id: Uuid::new_v4(),
                enabled: Some(true),
                order: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));

        let updated = handler
            .handle(UpdateAffirmation {
                user_id: user.id,
                id: first.id,
                enabled: Some(false),
                order: None,
            })
            .await
            .unwrap();
        assert!(!updated.enabled);
        assert!(!updated.is_custom);
    }

    #[tokio::test]
    async fn test_batch_skips_invalid_entries() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("ana@example.com", Plan::Free).await;
        let all = ctx.affirmations.find_all().await.unwrap();

        let response =
            BatchUpdateAffirmationsHandler::new(ctx.affirmations.clone(), ctx.user_affirmations.clone())
                .handle(BatchUpdateAffirmations {
                    user_id: user.id,
                    updates: vec![
                        AffirmationUpdate {
                            id: Some(all[0].id),
                            enabled: Some(false),
                            order: None,
                        },
                        AffirmationUpdate {
                            id: Some(all[1].id),
                            enabled: None,
                            order: Some(5),
                        },
                        // 没有 ID
                        AffirmationUpdate {
                            id: None,
                            enabled: Some(true),
                            order: None,
                        },
                        // 没有字段
                        AffirmationUpdate {
                            id: Some(all[2].id),
                            ..Default::default()
                        },
                        // 未知 ID
                        AffirmationUpdate {
                            id: Some(Uuid::new_v4()),
                            enabled: Some(true),
                            order: None,
                        },
                    ],
                })
                .await
                .unwrap();

        assert_eq!(response.updated, 2);
        assert_eq!(ctx.user_affirmations.find_by_user(user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_custom_requires_premium() {
        let ctx = TestContext::new().await;
        let free = ctx.create_user("free@example.com", Plan::Free).await;
        let category_id = first_category_id(&ctx).await;

        let err = create(&ctx)
            .handle(CreateCustomAffirmation {
                user_id: free.id,
                category_id,
                text: "Eu sou abundante.".to_string(),
                order: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_create_custom_validates_text_and_category() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("vip@example.com", Plan::Premium).await;
        let category_id = first_category_id(&ctx).await;

        for text in ["   ".to_string(), "a".repeat(501)] {
            let err = create(&ctx)
                .handle(CreateCustomAffirmation {
                    user_id: user.id,
                    category_id,
                    text,
                    order: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::ValidationError(_)));
        }

        let err = create(&ctx)
            .handle(CreateCustomAffirmation {
                user_id: user.id,
                category_id: Uuid::new_v4(),
                text: "Eu sou abundante.".to_string(),
                order: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));

        let item = create(&ctx)
            .handle(CreateCustomAffirmation {
                user_id: user.id,
                category_id,
                text: "  Eu sou abundante.  ".to_string(),
                order: None,
            })
            .await
            .unwrap();
        assert!(item.is_custom);
        assert_eq!(item.text, "Eu sou abundante.");
        assert_eq!(item.order, 999);
    }

    #[tokio::test]
    async fn test_delete_custom_removes_recording() {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user("vip@example.com", Plan::Premium).await;
        let other = ctx.create_user("other@example.com", Plan::Premium).await;
        let category_id = first_category_id(&ctx).await;

        let item = create(&ctx)
            .handle(CreateCustomAffirmation {
                user_id: owner.id,
                category_id,
                text: "Eu confio em mim.".to_string(),
                order: Some(3),
            })
            .await
            .unwrap();

        let path = format!("uploads/{}/take.webm", owner.id);
        ctx.storage.save(&path, b"webm").await.unwrap();
        ctx.user_affirmations
            .set_audio(
                item.id,
                Some(&LinkedAudio {
                    path: path.clone(),
                    source: AudioSource::Recorded,
                    duration_ms: None,
                }),
            )
            .await
            .unwrap();

        let handler = DeleteCustomAffirmationHandler::new(
            ctx.users.clone(),
            ctx.user_affirmations.clone(),
            ctx.storage.clone(),
        );

        // 不能删除别人的
        let err = handler
            .handle(DeleteCustomAffirmation {
                user_id: other.id,
                id: item.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));

        handler
            .handle(DeleteCustomAffirmation {
                user_id: owner.id,
                id: item.id,
            })
            .await
            .unwrap();
        assert!(!ctx.storage.exists(&path).await);
        assert!(ctx.user_affirmations.find_by_id(item.id).await.unwrap().is_none());
    }
}
