//! Affirmation Context - Category

use serde::{Deserialize, Serialize};

/// 肯定语分类
///
/// 封闭且有序的五个分类，顺序即展示顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Financeiro,
    Saude,
    Sono,
    Autoestima,
    Produtividade,
}

impl Category {
    /// 全部分类（按展示顺序）
    pub const ALL: [Category; 5] = [
        Category::Financeiro,
        Category::Saude,
        Category::Sono,
        Category::Autoestima,
        Category::Produtividade,
    ];

    /// 展示名称
    pub fn name(&self) -> &'static str {
        match self {
            Category::Financeiro => "Financeiro",
            Category::Saude => "Saúde",
            Category::Sono => "Sono",
            Category::Autoestima => "Autoestima",
            Category::Produtividade => "Produtividade",
        }
    }

    /// 路径 / URL 中使用的 slug
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Financeiro => "financeiro",
            Category::Saude => "saude",
            Category::Sono => "sono",
            Category::Autoestima => "autoestima",
            Category::Produtividade => "produtividade",
        }
    }

    pub fn order(&self) -> u32 {
        match self {
            Category::Financeiro => 0,
            Category::Saude => 1,
            Category::Sono => 2,
            Category::Autoestima => 3,
            Category::Produtividade => 4,
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == slug.trim().to_lowercase())
    }

    /// 按名称或 slug 查找（忽略大小写与重音）
    pub fn from_name(name: &str) -> Option<Self> {
        let folded = super::fold_accents(name.trim()).to_lowercase();
        Self::ALL.into_iter().find(|c| c.slug() == folded)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_closed_and_ordered() {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["Financeiro", "Saúde", "Sono", "Autoestima", "Produtividade"]
        );

        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.order() as usize, i);
        }
    }

    #[test]
    fn test_slug_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_slug(category.slug()), Some(category));
        }
        assert_eq!(Category::from_slug("unknown"), None);
    }

    #[test]
    fn test_from_name_ignores_accents_and_case() {
        assert_eq!(Category::from_name("Saúde"), Some(Category::Saude));
        assert_eq!(Category::from_name("SAUDE"), Some(Category::Saude));
        assert_eq!(Category::from_name(" sono "), Some(Category::Sono));
        assert_eq!(Category::from_name("Relacionamentos"), None);
    }
}
