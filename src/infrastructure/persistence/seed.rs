//! 初始数据 - 分类、系统默认肯定语与默认音色
//!
//! 每一部分只在对应的表为空时写入，可以在每次启动时执行

use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::{
    AffirmationRecord, AffirmationRepositoryPort, CategoryRecord, CategoryRepositoryPort,
    RepositoryError, VoiceRecord, VoiceRepositoryPort,
};
use crate::domain::{default_affirmations, Category};

/// 默认音色（ElevenLabs 服务商 ID）
pub const DEFAULT_VOICE_ID: &str = "fCxG8OHm4STbIsWe4aT9";

/// 写入结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub affirmations: usize,
    pub voices: usize,
}

/// 写入初始数据
pub async fn seed_catalog(
    categories: &dyn CategoryRepositoryPort,
    affirmations: &dyn AffirmationRepositoryPort,
    voices: &dyn VoiceRepositoryPort,
) -> Result<SeedReport, RepositoryError> {
    let mut report = SeedReport::default();

    let mut existing = categories.find_all().await?;
    if existing.is_empty() {
        let records: Vec<CategoryRecord> = Category::ALL
            .into_iter()
            .map(|category| CategoryRecord {
                id: Uuid::new_v4(),
                category,
                name: category.name().to_string(),
                order: category.order() as i64,
                is_system: true,
            })
            .collect();
        categories.save_all(&records).await?;
        report.categories = records.len();
        existing = records;
    }

    if affirmations.count().await? == 0 {
        let records: Vec<AffirmationRecord> = existing
            .iter()
            .flat_map(|category| {
                default_affirmations(category.category)
                    .iter()
                    .enumerate()
                    .map(move |(i, text)| AffirmationRecord {
                        id: Uuid::new_v4(),
                        category_id: category.id,
                        category: category.category,
                        text: text.to_string(),
                        order: i as i64,
                    })
            })
            .collect();
        affirmations.save_all(&records).await?;
        report.affirmations = records.len();
    }

    if voices.count().await? == 0 {
        voices
            .save(&VoiceRecord {
                id: Uuid::new_v4(),
                provider_voice_id: DEFAULT_VOICE_ID.to_string(),
                slug: "harrison".to_string(),
                name: "Harrison Gale".to_string(),
                display_name: "Voz Masculina Suave".to_string(),
                gender: "male".to_string(),
                is_default: true,
                is_active: true,
                order: 0,
                preview_url: None,
                created_at: Utc::now(),
            })
            .await?;
        report.voices = 1;
    }

    if report != SeedReport::default() {
        tracing::info!(
            categories = report.categories,
            affirmations = report.affirmations,
            voices = report.voices,
            "Seeded initial catalog"
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteAffirmationRepository,
        SqliteCategoryRepository, SqliteVoiceRepository,
    };

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let categories = SqliteCategoryRepository::new(pool.clone());
        let affirmations = SqliteAffirmationRepository::new(pool.clone());
        let voices = SqliteVoiceRepository::new(pool);

        let first = seed_catalog(&categories, &affirmations, &voices).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                categories: 5,
                affirmations: 100,
                voices: 1
            }
        );

        let second = seed_catalog(&categories, &affirmations, &voices).await.unwrap();
        assert_eq!(second, SeedReport::default());

        assert_eq!(affirmations.count().await.unwrap(), 100);
        for category in Category::ALL {
            let list = affirmations.find_by_category(category).await.unwrap();
            assert_eq!(list.len(), 20);
            assert_eq!(list[0].order, 0);
        }

        let default = voices.find_default().await.unwrap().unwrap();
        assert_eq!(default.provider_voice_id, DEFAULT_VOICE_ID);
        assert_eq!(default.display_name, "Voz Masculina Suave");
    }
}
