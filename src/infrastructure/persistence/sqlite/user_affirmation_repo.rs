//! SQLite User Affirmation Repository
//!
//! 每个用户对系统肯定语最多一条覆盖层（UNIQUE(user_id, affirmation_id)），
//! 覆盖层通过 `ON CONFLICT` 原子地创建或更新。

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_error, parse_time, parse_uuid, DbPool};
use crate::application::ports::{
    AffirmationRecord, LinkedAudio, OverlaySettings, RepositoryError, UserAffirmationRecord,
    UserAffirmationRepositoryPort,
};
use crate::domain::AudioSource;

/// SQLite User Affirmation Repository
pub struct SqliteUserAffirmationRepository {
    pool: DbPool,
}

impl SqliteUserAffirmationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn require(&self, id: Uuid) -> Result<UserAffirmationRecord, RepositoryError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("User affirmation {}", id)))
    }

    async fn require_overlay(
        &self,
        user_id: Uuid,
        affirmation_id: Uuid,
    ) -> Result<UserAffirmationRecord, RepositoryError> {
        self.find_overlay(user_id, affirmation_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Overlay for affirmation {}", affirmation_id))
            })
    }
}

#[derive(FromRow)]
struct UserAffirmationRow {
    id: String,
    user_id: String,
    affirmation_id: Option<String>,
    category_id: String,
    custom_text: Option<String>,
    enabled: bool,
    sort_order: Option<i64>,
    audio_path: Option<String>,
    audio_source: String,
    audio_duration_ms: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserAffirmationRow> for UserAffirmationRecord {
    type Error = RepositoryError;

    fn try_from(row: UserAffirmationRow) -> Result<Self, Self::Error> {
        Ok(UserAffirmationRecord {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            affirmation_id: row.affirmation_id.as_deref().map(parse_uuid).transpose()?,
            category_id: parse_uuid(&row.category_id)?,
            custom_text: row.custom_text,
            enabled: row.enabled,
            order: row.sort_order,
            audio_path: row.audio_path,
            audio_source: AudioSource::from_str(&row.audio_source).ok_or_else(|| {
                RepositoryError::SerializationError(format!(
                    "Unknown audio source: {}",
                    row.audio_source
                ))
            })?,
            audio_duration_ms: row.audio_duration_ms.map(|d| d as u64),
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

const SELECT_USER_AFFIRMATION: &str = r#"
    SELECT id, user_id, affirmation_id, category_id, custom_text, enabled, sort_order,
           audio_path, audio_source, audio_duration_ms, created_at, updated_at
    FROM user_affirmations
"#;

#[async_trait]
impl UserAffirmationRepositoryPort for SqliteUserAffirmationRepository {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserAffirmationRecord>, RepositoryError> {
        let rows: Vec<UserAffirmationRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = ? ORDER BY created_at",
            SELECT_USER_AFFIRMATION
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(UserAffirmationRecord::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAffirmationRecord>, RepositoryError> {
        let row: Option<UserAffirmationRow> =
            sqlx::query_as(&format!("{} WHERE id = ?", SELECT_USER_AFFIRMATION))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(UserAffirmationRecord::try_from).transpose()
    }

    async fn find_overlay(
        &self,
        user_id: Uuid,
        affirmation_id: Uuid,
    ) -> Result<Option<UserAffirmationRecord>, RepositoryError> {
        let row: Option<UserAffirmationRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = ? AND affirmation_id = ?",
            SELECT_USER_AFFIRMATION
        ))
        .bind(user_id.to_string())
        .bind(affirmation_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(UserAffirmationRecord::try_from).transpose()
    }

    async fn upsert_overlay_settings(
        &self,
        user_id: Uuid,
        affirmation: &AffirmationRecord,
        settings: OverlaySettings,
    ) -> Result<UserAffirmationRecord, RepositoryError> {
        let now = Utc::now().to_rfc3339();

        // 未提供的字段保持原值
        sqlx::query(
            r#"
            INSERT INTO user_affirmations
                (id, user_id, affirmation_id, category_id, enabled, sort_order,
                 audio_source, created_at, updated_at)
            VALUES (?, ?, ?, ?, COALESCE(?, 1), ?, 'system', ?, ?)
            ON CONFLICT(user_id, affirmation_id) DO UPDATE SET
                enabled = COALESCE(?, user_affirmations.enabled),
                sort_order = COALESCE(?, user_affirmations.sort_order),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(affirmation.id.to_string())
        .bind(affirmation.category_id.to_string())
        .bind(settings.enabled)
        .bind(settings.order)
        .bind(&now)
        .bind(&now)
        .bind(settings.enabled)
        .bind(settings.order)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        self.require_overlay(user_id, affirmation.id).await
    }

    async fn upsert_overlay_audio(
        &self,
        user_id: Uuid,
        affirmation: &AffirmationRecord,
        audio: &LinkedAudio,
    ) -> Result<UserAffirmationRecord, RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO user_affirmations
                (id, user_id, affirmation_id, category_id, enabled, audio_path,
                 audio_source, audio_duration_ms, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, affirmation_id) DO UPDATE SET
                audio_path = excluded.audio_path,
                audio_source = excluded.audio_source,
                audio_duration_ms = excluded.audio_duration_ms,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(affirmation.id.to_string())
        .bind(affirmation.category_id.to_string())
        .bind(&audio.path)
        .bind(audio.source.as_str())
        .bind(audio.duration_ms.map(|d| d as i64))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        self.require_overlay(user_id, affirmation.id).await
    }

    async fn create_custom(&self, record: &UserAffirmationRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_affirmations
                (id, user_id, affirmation_id, category_id, custom_text, enabled, sort_order,
                 audio_path, audio_source, audio_duration_ms, created_at, updated_at)
            VALUES (?, ?, NULL, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(record.category_id.to_string())
        .bind(&record.custom_text)
        .bind(record.enabled)
        .bind(record.order)
        .bind(&record.audio_path)
        .bind(record.audio_source.as_str())
        .bind(record.audio_duration_ms.map(|d| d as i64))
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn update_settings(
        &self,
        id: Uuid,
        settings: OverlaySettings,
    ) -> Result<UserAffirmationRecord, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE user_affirmations SET
                enabled = COALESCE(?, enabled),
                sort_order = COALESCE(?, sort_order),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(settings.enabled)
        .bind(settings.order)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("User affirmation {}", id)));
        }

        self.require(id).await
    }

    async fn set_audio(&self, id: Uuid, audio: Option<&LinkedAudio>) -> Result<(), RepositoryError> {
        let (path, source, duration) = match audio {
            Some(audio) => (
                Some(audio.path.as_str()),
                audio.source,
                audio.duration_ms.map(|d| d as i64),
            ),
            None => (None, AudioSource::System, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE user_affirmations SET
                audio_path = ?,
                audio_source = ?,
                audio_duration_ms = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(path)
        .bind(source.as_str())
        .bind(duration)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("User affirmation {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM user_affirmations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CategoryRecord, CategoryRepositoryPort, UserRepositoryPort};
    use crate::domain::Category;
    use crate::infrastructure::persistence::sqlite::user_repo::tests::{setup, user};
    use crate::infrastructure::persistence::sqlite::{
        SqliteCategoryRepository, SqliteUserRepository,
    };

    struct Fixture {
        repo: SqliteUserAffirmationRepository,
        user_id: Uuid,
        affirmation: AffirmationRecord,
    }

    async fn fixture() -> Fixture {
        let pool = setup().await;
        let user = user("ana@example.com");
        SqliteUserRepository::new(pool.clone()).create(&user).await.unwrap();

        let category = CategoryRecord {
            id: Uuid::new_v4(),
            category: Category::Sono,
            name: "Sono".to_string(),
            order: 2,
            is_system: true,
        };
        SqliteCategoryRepository::new(pool.clone())
            .save_all(std::slice::from_ref(&category))
            .await
            .unwrap();

        Fixture {
            repo: SqliteUserAffirmationRepository::new(pool),
            user_id: user.id,
            affirmation: AffirmationRecord {
                id: Uuid::new_v4(),
                category_id: category.id,
                category: Category::Sono,
                text: "Eu durmo em paz.".to_string(),
                order: 0,
            },
        }
    }

    #[tokio::test]
    async fn test_overlay_settings_upsert_keeps_unset_fields() {
        let f = fixture().await;

        let first = f
            .repo
            .upsert_overlay_settings(
                f.user_id,
                &f.affirmation,
                OverlaySettings {
                    enabled: Some(false),
                    order: None,
                },
            )
            .await
            .unwrap();
        assert!(!first.enabled);
        assert_eq!(first.order, None);

        let second = f
            .repo
            .upsert_overlay_settings(
                f.user_id,
                &f.affirmation,
                OverlaySettings {
                    enabled: None,
                    order: Some(7),
                },
            )
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert!(!second.enabled);
        assert_eq!(second.order, Some(7));

        assert_eq!(f.repo.find_by_user(f.user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_overlay_audio_then_unlink() {
        let f = fixture().await;
        let audio = LinkedAudio {
            path: "voices/v1/affirmations/sono/x.mp3".to_string(),
            source: AudioSource::Elevenlabs,
            duration_ms: Some(1500),
        };

        let overlay = f
            .repo
            .upsert_overlay_audio(f.user_id, &f.affirmation, &audio)
            .await
            .unwrap();
        assert!(overlay.enabled);
        assert_eq!(overlay.audio_source, AudioSource::Elevenlabs);
        assert_eq!(overlay.audio_duration_ms, Some(1500));

        f.repo.set_audio(overlay.id, None).await.unwrap();
        let cleared = f.repo.find_by_id(overlay.id).await.unwrap().unwrap();
        assert_eq!(cleared.audio_path, None);
        assert_eq!(cleared.audio_source, AudioSource::System);
    }

    #[tokio::test]
    async fn test_custom_affirmations_do_not_conflict() {
        let f = fixture().await;
        let now = Utc::now();

        for text in ["Primeira", "Segunda"] {
            let record = UserAffirmationRecord {
                id: Uuid::new_v4(),
                user_id: f.user_id,
                affirmation_id: None,
                category_id: f.affirmation.category_id,
                custom_text: Some(text.to_string()),
                enabled: true,
                order: None,
                audio_path: None,
                audio_source: AudioSource::System,
                audio_duration_ms: None,
                created_at: now,
                updated_at: now,
            };
            f.repo.create_custom(&record).await.unwrap();
        }

        let all = f.repo.find_by_user(f.user_id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r.is_custom()));

        let updated = f
            .repo
            .update_settings(
                all[0].id,
                OverlaySettings {
                    enabled: Some(false),
                    order: Some(3),
                },
            )
            .await
            .unwrap();
        assert!(!updated.enabled);
        assert_eq!(updated.order, Some(3));

        f.repo.delete(all[0].id).await.unwrap();
        assert!(f.repo.find_by_id(all[0].id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let f = fixture().await;
        let err = f
            .repo
            .update_settings(Uuid::new_v4(), OverlaySettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
