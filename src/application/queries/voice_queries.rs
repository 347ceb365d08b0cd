//! Voice Queries - 服务商音色与已配置音色

use uuid::Uuid;

/// 服务商音色（按类别分组）
#[derive(Debug, Clone, Default)]
pub struct ListProviderVoices;

/// 已配置音色；免费用户只能看到默认音色
#[derive(Debug, Clone)]
pub struct ListConfiguredVoices {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct GetDefaultVoice;

/// 推荐音色（男声 / 女声）
#[derive(Debug, Clone, Default)]
pub struct ListRecommendedVoices;

/// 服务商订阅额度
#[derive(Debug, Clone, Default)]
pub struct GetSubscriptionInfo;

/// 音色试听地址
#[derive(Debug, Clone)]
pub struct GetVoicePreview {
    pub voice_id: String,
}
