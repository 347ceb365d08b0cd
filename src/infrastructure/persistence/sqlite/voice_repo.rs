//! SQLite Voice Repository

use async_trait::async_trait;
use sqlx::FromRow;

use super::{db_error, parse_time, parse_uuid, DbPool};
use crate::application::ports::{RepositoryError, VoiceRecord, VoiceRepositoryPort};

/// SQLite Voice Repository
pub struct SqliteVoiceRepository {
    pool: DbPool,
}

impl SqliteVoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct VoiceRow {
    id: String,
    provider_voice_id: String,
    slug: String,
    name: String,
    display_name: String,
    gender: String,
    is_default: bool,
    is_active: bool,
    sort_order: i64,
    preview_url: Option<String>,
    created_at: String,
}

impl TryFrom<VoiceRow> for VoiceRecord {
    type Error = RepositoryError;

    fn try_from(row: VoiceRow) -> Result<Self, Self::Error> {
        Ok(VoiceRecord {
            id: parse_uuid(&row.id)?,
            provider_voice_id: row.provider_voice_id,
            slug: row.slug,
            name: row.name,
            display_name: row.display_name,
            gender: row.gender,
            is_default: row.is_default,
            is_active: row.is_active,
            order: row.sort_order,
            preview_url: row.preview_url,
            created_at: parse_time(&row.created_at)?,
        })
    }
}

const SELECT_VOICE: &str = r#"
    SELECT id, provider_voice_id, slug, name, display_name, gender,
           is_default, is_active, sort_order, preview_url, created_at
    FROM voices
"#;

#[async_trait]
impl VoiceRepositoryPort for SqliteVoiceRepository {
    async fn save(&self, voice: &VoiceRecord) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 同一时间只有一个默认音色
        if voice.is_default {
            sqlx::query("UPDATE voices SET is_default = 0 WHERE provider_voice_id != ?")
                .bind(&voice.provider_voice_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        sqlx::query(
            r#"
            INSERT INTO voices
                (id, provider_voice_id, slug, name, display_name, gender,
                 is_default, is_active, sort_order, preview_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(provider_voice_id) DO UPDATE SET
                slug = excluded.slug,
                name = excluded.name,
                display_name = excluded.display_name,
                gender = excluded.gender,
                is_default = excluded.is_default,
                is_active = excluded.is_active,
                sort_order = excluded.sort_order,
                preview_url = excluded.preview_url
            "#,
        )
        .bind(voice.id.to_string())
        .bind(&voice.provider_voice_id)
        .bind(&voice.slug)
        .bind(&voice.name)
        .bind(&voice.display_name)
        .bind(&voice.gender)
        .bind(voice.is_default)
        .bind(voice.is_active)
        .bind(voice.order)
        .bind(&voice.preview_url)
        .bind(voice.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM voices")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count as u64)
    }

    async fn find_active(&self) -> Result<Vec<VoiceRecord>, RepositoryError> {
        let rows: Vec<VoiceRow> = sqlx::query_as(&format!(
            "{} WHERE is_active = 1 ORDER BY sort_order, name",
            SELECT_VOICE
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(VoiceRecord::try_from).collect()
    }

    async fn find_default(&self) -> Result<Option<VoiceRecord>, RepositoryError> {
        let row: Option<VoiceRow> = sqlx::query_as(&format!(
            "{} WHERE is_default = 1 AND is_active = 1 LIMIT 1",
            SELECT_VOICE
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(VoiceRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::user_repo::tests::setup;
    use chrono::Utc;
    use uuid::Uuid;

    fn voice(provider_voice_id: &str, slug: &str, is_default: bool, order: i64) -> VoiceRecord {
        VoiceRecord {
            id: Uuid::new_v4(),
            provider_voice_id: provider_voice_id.to_string(),
            slug: slug.to_string(),
            name: slug.to_string(),
            display_name: slug.to_uppercase(),
            gender: "male".to_string(),
            is_default,
            is_active: true,
            order,
            preview_url: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_new_default_unsets_previous() {
        let repo = SqliteVoiceRepository::new(setup().await);
        repo.save(&voice("p1", "harrison", true, 0)).await.unwrap();
        repo.save(&voice("p2", "daniel", true, 1)).await.unwrap();

        let default = repo.find_default().await.unwrap().unwrap();
        assert_eq!(default.provider_voice_id, "p2");

        let active = repo.find_active().await.unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active.iter().filter(|v| v.is_default).count(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_inactive_voices_are_hidden() {
        let repo = SqliteVoiceRepository::new(setup().await);
        let mut hidden = voice("p1", "harrison", true, 0);
        hidden.is_active = false;
        repo.save(&hidden).await.unwrap();
        repo.save(&voice("p2", "daniel", false, 1)).await.unwrap();

        assert!(repo.find_default().await.unwrap().is_none());
        let active = repo.find_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].slug, "daniel");
    }
}
