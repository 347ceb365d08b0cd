//! SQLite Catalog Repositories - 分类与系统默认肯定语

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_error, parse_uuid, DbPool};
use crate::application::ports::{
    AffirmationRecord, AffirmationRepositoryPort, CategoryRecord, CategoryRepositoryPort,
    RepositoryError,
};
use crate::domain::Category;

fn parse_category(slug: &str) -> Result<Category, RepositoryError> {
    Category::from_slug(slug)
        .ok_or_else(|| RepositoryError::SerializationError(format!("Unknown category: {}", slug)))
}

// ============================================================================
// Category Repository
// ============================================================================

/// SQLite Category Repository
pub struct SqliteCategoryRepository {
    pool: DbPool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: String,
    slug: String,
    name: String,
    sort_order: i64,
    is_system: bool,
}

impl TryFrom<CategoryRow> for CategoryRecord {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(CategoryRecord {
            id: parse_uuid(&row.id)?,
            category: parse_category(&row.slug)?,
            name: row.name,
            order: row.sort_order,
            is_system: row.is_system,
        })
    }
}

#[async_trait]
impl CategoryRepositoryPort for SqliteCategoryRepository {
    async fn save_all(&self, categories: &[CategoryRecord]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for category in categories {
            sqlx::query(
                r#"
                INSERT INTO categories (id, slug, name, sort_order, is_system)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(slug) DO UPDATE SET
                    name = excluded.name,
                    sort_order = excluded.sort_order
                "#,
            )
            .bind(category.id.to_string())
            .bind(category.category.slug())
            .bind(&category.name)
            .bind(category.order)
            .bind(category.is_system)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, slug, name, sort_order, is_system FROM categories ORDER BY sort_order",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(CategoryRecord::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            "SELECT id, slug, name, sort_order, is_system FROM categories WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(CategoryRecord::try_from).transpose()
    }
}

// ============================================================================
// Affirmation Repository
// ============================================================================

/// SQLite Affirmation Repository
pub struct SqliteAffirmationRepository {
    pool: DbPool,
}

impl SqliteAffirmationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AffirmationRow {
    id: String,
    category_id: String,
    slug: String,
    text: String,
    sort_order: i64,
}

impl TryFrom<AffirmationRow> for AffirmationRecord {
    type Error = RepositoryError;

    fn try_from(row: AffirmationRow) -> Result<Self, Self::Error> {
        Ok(AffirmationRecord {
            id: parse_uuid(&row.id)?,
            category_id: parse_uuid(&row.category_id)?,
            category: parse_category(&row.slug)?,
            text: row.text,
            order: row.sort_order,
        })
    }
}

const SELECT_AFFIRMATION: &str = r#"
    SELECT a.id, a.category_id, c.slug, a.text, a.sort_order
    FROM affirmations a
    JOIN categories c ON c.id = a.category_id
"#;

#[async_trait]
impl AffirmationRepositoryPort for SqliteAffirmationRepository {
    async fn save_all(&self, affirmations: &[AffirmationRecord]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for affirmation in affirmations {
            sqlx::query(
                r#"
                INSERT INTO affirmations (id, category_id, text, sort_order)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    text = excluded.text,
                    sort_order = excluded.sort_order
                "#,
            )
            .bind(affirmation.id.to_string())
            .bind(affirmation.category_id.to_string())
            .bind(&affirmation.text)
            .bind(affirmation.order)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM affirmations")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count as u64)
    }

    async fn find_all(&self) -> Result<Vec<AffirmationRecord>, RepositoryError> {
        let rows: Vec<AffirmationRow> = sqlx::query_as(&format!(
            "{} ORDER BY c.sort_order, a.sort_order",
            SELECT_AFFIRMATION
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(AffirmationRecord::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AffirmationRecord>, RepositoryError> {
        let row: Option<AffirmationRow> =
            sqlx::query_as(&format!("{} WHERE a.id = ?", SELECT_AFFIRMATION))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(AffirmationRecord::try_from).transpose()
    }

    async fn find_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<AffirmationRecord>, RepositoryError> {
        let rows: Vec<AffirmationRow> = sqlx::query_as(&format!(
            "{} WHERE c.slug = ? ORDER BY a.sort_order",
            SELECT_AFFIRMATION
        ))
        .bind(category.slug())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(AffirmationRecord::try_from).collect()
    }
}
