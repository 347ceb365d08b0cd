//! SQLite Affirmation Audio Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_error, parse_time, parse_uuid, DbPool};
use crate::application::ports::{
    AffirmationAudioRecord, AffirmationAudioRepositoryPort, RepositoryError,
};

/// SQLite Affirmation Audio Repository
pub struct SqliteAffirmationAudioRepository {
    pool: DbPool,
}

impl SqliteAffirmationAudioRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AffirmationAudioRow {
    affirmation_id: String,
    voice_id: String,
    path: String,
    text_hash: String,
    duration_ms: Option<i64>,
    size_bytes: i64,
    created_at: String,
}

impl TryFrom<AffirmationAudioRow> for AffirmationAudioRecord {
    type Error = RepositoryError;

    fn try_from(row: AffirmationAudioRow) -> Result<Self, Self::Error> {
        Ok(AffirmationAudioRecord {
            affirmation_id: parse_uuid(&row.affirmation_id)?,
            voice_id: row.voice_id,
            path: row.path,
            text_hash: row.text_hash,
            duration_ms: row.duration_ms.map(|d| d as u64),
            size_bytes: row.size_bytes as u64,
            created_at: parse_time(&row.created_at)?,
        })
    }
}

#[async_trait]
impl AffirmationAudioRepositoryPort for SqliteAffirmationAudioRepository {
    async fn upsert(&self, record: &AffirmationAudioRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO affirmation_audio
                (affirmation_id, voice_id, path, text_hash, duration_ms, size_bytes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(affirmation_id, voice_id) DO UPDATE SET
                path = excluded.path,
                text_hash = excluded.text_hash,
                duration_ms = excluded.duration_ms,
                size_bytes = excluded.size_bytes,
                created_at = excluded.created_at
            "#,
        )
        .bind(record.affirmation_id.to_string())
        .bind(&record.voice_id)
        .bind(&record.path)
        .bind(&record.text_hash)
        .bind(record.duration_ms.map(|d| d as i64))
        .bind(record.size_bytes as i64)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find(
        &self,
        affirmation_id: Uuid,
        voice_id: &str,
    ) -> Result<Option<AffirmationAudioRecord>, RepositoryError> {
        let row: Option<AffirmationAudioRow> = sqlx::query_as(
            r#"
            SELECT affirmation_id, voice_id, path, text_hash, duration_ms, size_bytes, created_at
            FROM affirmation_audio
            WHERE affirmation_id = ? AND voice_id = ?
            "#,
        )
        .bind(affirmation_id.to_string())
        .bind(voice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(AffirmationAudioRecord::try_from).transpose()
    }

    async fn find_by_voice(
        &self,
        voice_id: &str,
    ) -> Result<Vec<AffirmationAudioRecord>, RepositoryError> {
        let rows: Vec<AffirmationAudioRow> = sqlx::query_as(
            r#"
            SELECT affirmation_id, voice_id, path, text_hash, duration_ms, size_bytes, created_at
            FROM affirmation_audio
            WHERE voice_id = ?
            "#,
        )
        .bind(voice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(AffirmationAudioRecord::try_from).collect()
    }
}
