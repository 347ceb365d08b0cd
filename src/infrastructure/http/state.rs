//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    BatchGenerateHandler, BatchUpdateAffirmationsHandler, CreateCustomAffirmationHandler,
    DeleteAudioHandler, DeleteCustomAffirmationHandler, GenerateAffirmationAudioHandler,
    LoginHandler, PreviewSpeechHandler, RefreshTokenHandler, RegisterHandler,
    UpdateAffirmationHandler, UpdateUserConfigHandler, UploadAudioHandler,
    // Query handlers
    EstimateUsageHandler, GetAudioFileHandler, GetCurrentUserHandler, GetDefaultVoiceHandler,
    GetSubscriptionInfoHandler, GetUserConfigHandler, GetVoicePreviewHandler,
    ListCategoriesHandler, ListConfiguredVoicesHandler, ListDefaultAffirmationsHandler,
    ListProviderVoicesHandler, ListRecommendedVoicesHandler, ListUserAffirmationsHandler,
    // Services
    AudioMaterializer, TargetResolver,
    // Ports
    AffirmationAudioRepositoryPort, AffirmationRepositoryPort, AudioProbePort, AudioStoragePort,
    CategoryRepositoryPort, PasswordHasherPort, TokenServicePort, TtsEnginePort,
    UserAffirmationRepositoryPort, UserConfigRepositoryPort, UserRepositoryPort,
    VoiceRepositoryPort,
};

/// 所有端口实现（由 bootstrap 组装，HTTP 与 CLI 共用）
#[derive(Clone)]
pub struct AppPorts {
    pub users: Arc<dyn UserRepositoryPort>,
    pub user_configs: Arc<dyn UserConfigRepositoryPort>,
    pub categories: Arc<dyn CategoryRepositoryPort>,
    pub affirmations: Arc<dyn AffirmationRepositoryPort>,
    pub audio_repo: Arc<dyn AffirmationAudioRepositoryPort>,
    pub voices: Arc<dyn VoiceRepositoryPort>,
    pub user_affirmations: Arc<dyn UserAffirmationRepositoryPort>,
    pub tts_engine: Arc<dyn TtsEnginePort>,
    pub storage: Arc<dyn AudioStoragePort>,
    pub probe: Arc<dyn AudioProbePort>,
    pub hasher: Arc<dyn PasswordHasherPort>,
    pub tokens: Arc<dyn TokenServicePort>,
}

impl AppPorts {
    /// 创建音频物化服务
    pub fn materializer(&self) -> AudioMaterializer {
        AudioMaterializer::new(
            self.tts_engine.clone(),
            self.storage.clone(),
            self.probe.clone(),
            self.audio_repo.clone(),
        )
    }

    pub fn resolver(&self) -> TargetResolver {
        TargetResolver::new(
            self.affirmations.clone(),
            self.categories.clone(),
            self.user_affirmations.clone(),
        )
    }
}

/// 处理器参数
#[derive(Debug, Clone)]
pub struct HandlerLimits {
    /// 批量生成并发上限
    pub max_concurrent: usize,
    /// 上传文件大小上限（字节）
    pub max_upload_size: usize,
}

impl Default for HandlerLimits {
    fn default() -> Self {
        Self {
            max_concurrent: 2,
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub tokens: Arc<dyn TokenServicePort>,
    pub max_upload_size: usize,

    // ========== Command Handlers ==========
    pub register_handler: RegisterHandler,
    pub login_handler: LoginHandler,
    pub refresh_token_handler: RefreshTokenHandler,
    pub update_affirmation_handler: UpdateAffirmationHandler,
    pub batch_update_affirmations_handler: BatchUpdateAffirmationsHandler,
    pub create_custom_affirmation_handler: CreateCustomAffirmationHandler,
    pub delete_custom_affirmation_handler: DeleteCustomAffirmationHandler,
    pub generate_audio_handler: GenerateAffirmationAudioHandler,
    pub preview_speech_handler: PreviewSpeechHandler,
    pub batch_generate_handler: BatchGenerateHandler,
    pub upload_audio_handler: UploadAudioHandler,
    pub delete_audio_handler: DeleteAudioHandler,
    pub update_config_handler: UpdateUserConfigHandler,

    // ========== Query Handlers ==========
    pub current_user_handler: GetCurrentUserHandler,
    pub list_categories_handler: ListCategoriesHandler,
    pub list_default_affirmations_handler: ListDefaultAffirmationsHandler,
    pub list_user_affirmations_handler: ListUserAffirmationsHandler,
    pub estimate_usage_handler: EstimateUsageHandler,
    pub list_provider_voices_handler: ListProviderVoicesHandler,
    pub list_configured_voices_handler: ListConfiguredVoicesHandler,
    pub default_voice_handler: GetDefaultVoiceHandler,
    pub recommended_voices_handler: ListRecommendedVoicesHandler,
    pub subscription_handler: GetSubscriptionInfoHandler,
    pub voice_preview_handler: GetVoicePreviewHandler,
    pub audio_file_handler: GetAudioFileHandler,
    pub get_config_handler: GetUserConfigHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(ports: AppPorts, limits: HandlerLimits) -> Self {
        let materializer = Arc::new(ports.materializer());
        let resolver = ports.resolver();

        Self {
            // Ports
            tokens: ports.tokens.clone(),
            max_upload_size: limits.max_upload_size,

            // Command handlers
            register_handler: RegisterHandler::new(
                ports.users.clone(),
                ports.hasher.clone(),
                ports.tokens.clone(),
            ),
            login_handler: LoginHandler::new(
                ports.users.clone(),
                ports.hasher.clone(),
                ports.tokens.clone(),
            ),
            refresh_token_handler: RefreshTokenHandler::new(
                ports.users.clone(),
                ports.tokens.clone(),
            ),
            update_affirmation_handler: UpdateAffirmationHandler::new(
                ports.affirmations.clone(),
                ports.user_affirmations.clone(),
            ),
            batch_update_affirmations_handler: BatchUpdateAffirmationsHandler::new(
                ports.affirmations.clone(),
                ports.user_affirmations.clone(),
            ),
            create_custom_affirmation_handler: CreateCustomAffirmationHandler::new(
                ports.users.clone(),
                ports.categories.clone(),
                ports.user_affirmations.clone(),
                ports.storage.clone(),
            ),
            delete_custom_affirmation_handler: DeleteCustomAffirmationHandler::new(
                ports.users.clone(),
                ports.user_affirmations.clone(),
                ports.storage.clone(),
            ),
            generate_audio_handler: GenerateAffirmationAudioHandler::new(
                ports.users.clone(),
                resolver.clone(),
                materializer.clone(),
                ports.tts_engine.clone(),
                ports.storage.clone(),
            ),
            preview_speech_handler: PreviewSpeechHandler::new(ports.tts_engine.clone()),
            batch_generate_handler: BatchGenerateHandler::new(
                ports.users.clone(),
                resolver.clone(),
                materializer.clone(),
                ports.tts_engine.clone(),
                ports.storage.clone(),
                limits.max_concurrent,
            ),
            upload_audio_handler: UploadAudioHandler::new(
                ports.users.clone(),
                resolver.clone(),
                ports.storage.clone(),
                ports.probe.clone(),
                limits.max_upload_size,
            ),
            delete_audio_handler: DeleteAudioHandler::new(
                resolver.clone(),
                ports.user_affirmations.clone(),
                ports.storage.clone(),
            ),
            update_config_handler: UpdateUserConfigHandler::new(ports.user_configs.clone()),

            // Query handlers
            current_user_handler: GetCurrentUserHandler::new(ports.users.clone()),
            list_categories_handler: ListCategoriesHandler::new(ports.categories.clone()),
            list_default_affirmations_handler: ListDefaultAffirmationsHandler::new(
                ports.affirmations.clone(),
                ports.voices.clone(),
                ports.audio_repo.clone(),
                ports.storage.clone(),
            ),
            list_user_affirmations_handler: ListUserAffirmationsHandler::new(
                ports.affirmations.clone(),
                ports.categories.clone(),
                ports.user_affirmations.clone(),
                ports.voices.clone(),
                ports.audio_repo.clone(),
                ports.storage.clone(),
            ),
            estimate_usage_handler: EstimateUsageHandler::new(
                ports.affirmations.clone(),
                resolver,
                materializer,
                ports.tts_engine.clone(),
            ),
            list_provider_voices_handler: ListProviderVoicesHandler::new(
                ports.tts_engine.clone(),
            ),
            list_configured_voices_handler: ListConfiguredVoicesHandler::new(
                ports.voices.clone(),
                ports.users.clone(),
            ),
            default_voice_handler: GetDefaultVoiceHandler::new(ports.voices.clone()),
            recommended_voices_handler: ListRecommendedVoicesHandler::new(
                ports.tts_engine.clone(),
            ),
            subscription_handler: GetSubscriptionInfoHandler::new(ports.tts_engine.clone()),
            voice_preview_handler: GetVoicePreviewHandler::new(ports.tts_engine.clone()),
            audio_file_handler: GetAudioFileHandler::new(ports.storage.clone()),
            get_config_handler: GetUserConfigHandler::new(ports.user_configs.clone()),
        }
    }
}
