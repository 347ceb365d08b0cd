//! SQLite User Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_error, parse_time, parse_uuid, DbPool};
use crate::application::ports::{RepositoryError, UserRecord, UserRepositoryPort};
use crate::domain::Plan;

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    plan: String,
    elevenlabs_voice_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: parse_uuid(&row.id)?,
            email: row.email,
            password_hash: row.password_hash,
            plan: Plan::from_str(&row.plan).ok_or_else(|| {
                RepositoryError::SerializationError(format!("Unknown plan: {}", row.plan))
            })?,
            elevenlabs_voice_id: row.elevenlabs_voice_id,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

const SELECT_USER: &str = "SELECT id, email, password_hash, plan, elevenlabs_voice_id, created_at, updated_at FROM users";

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn create(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, plan, elevenlabs_voice_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.plan.as_str())
        .bind(&user.elevenlabs_voice_id)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match db_error(e) {
            RepositoryError::Duplicate(_) => {
                RepositoryError::Duplicate("Email already registered".to_string())
            }
            other => other,
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_USER))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE email = ?", SELECT_USER))
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn update_plan(&self, id: Uuid, plan: Plan) -> Result<UserRecord, RepositoryError> {
        let result = sqlx::query("UPDATE users SET plan = ?, updated_at = ? WHERE id = ?")
            .bind(plan.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("User {}", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("User {}", id)))
    }
}
