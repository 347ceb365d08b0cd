//! Catalog Queries - 分类与肯定语列表

use uuid::Uuid;

/// 列出全部分类
#[derive(Debug, Clone, Default)]
pub struct ListCategories;

/// 列出系统默认肯定语
#[derive(Debug, Clone, Default)]
pub struct ListDefaultAffirmations;

/// 列出用户合并后的肯定语
#[derive(Debug, Clone)]
pub struct ListUserAffirmations {
    pub user_id: Uuid,
}
